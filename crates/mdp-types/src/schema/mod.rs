//! Compiled field tables for built-in schemas.
//!
//! Each submodule is the hand-compiled output of one schema: `'static`
//! descriptor arrays plus a `TEMPLATES` slice that a
//! [`TemplateRegistry`](crate::TemplateRegistry) loads in one pass.

pub mod mdp3;

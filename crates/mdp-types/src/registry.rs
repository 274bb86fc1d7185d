use std::collections::HashMap;

use crate::descriptor::Template;
use crate::error::TypeError;
use crate::schema::mdp3;

/// Static mapping from template id to its compiled field table.
///
/// The registry is populated once, before decoding starts. After that it
/// is only read, so one registry can be shared by any number of decoding
/// threads without locking. Each lookup hands back a `&'static Template`;
/// nothing is cloned or allocated per message.
#[derive(Clone, Debug)]
pub struct TemplateRegistry {
    schema_id: u16,
    schema_version: u16,
    templates: HashMap<u16, &'static Template>,
}

impl TemplateRegistry {
    /// An empty registry for the given schema.
    #[must_use]
    pub fn new(schema_id: u16, schema_version: u16) -> Self {
        Self {
            schema_id,
            schema_version,
            templates: HashMap::new(),
        }
    }

    /// A registry holding the built-in MDP 3.0 templates.
    ///
    /// The built-in tables go through [`register`](Self::register) like
    /// any other, so a table failing validation is left out and resolves
    /// as unknown.
    #[must_use]
    pub fn mdp3() -> Self {
        let mut registry = Self::new(mdp3::SCHEMA_ID, mdp3::SCHEMA_VERSION);
        for &template in mdp3::TEMPLATES {
            let _ = registry.register(template);
        }
        registry
    }

    /// Register a template, returning the one it replaced (if any).
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidTemplate`] if the table fails
    /// [`Template::validate`].
    pub fn register(
        &mut self,
        template: &'static Template,
    ) -> Result<Option<&'static Template>, TypeError> {
        template.validate()?;
        Ok(self.templates.insert(template.id, template))
    }

    #[must_use]
    pub fn get(&self, template_id: u16) -> Option<&'static Template> {
        self.templates.get(&template_id).copied()
    }

    /// Look up a template, failing with a distinct error when it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::UnknownTemplate`] if no table is registered.
    pub fn resolve(&self, template_id: u16) -> Result<&'static Template, TypeError> {
        self.get(template_id)
            .ok_or(TypeError::UnknownTemplate { template_id })
    }

    #[must_use]
    pub fn schema_id(&self) -> u16 {
        self.schema_id
    }

    /// Highest schema version the registered tables describe.
    #[must_use]
    pub fn schema_version(&self) -> u16 {
        self.schema_version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All registered templates, ordered by id.
    #[must_use]
    pub fn templates(&self) -> Vec<&'static Template> {
        let mut all: Vec<_> = self.templates.values().copied().collect();
        all.sort_by_key(|t| t.id);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldKind;
    use crate::descriptor::FieldDescriptor;

    #[test]
    fn builtin_registry_resolves_limits_banding() {
        let registry = TemplateRegistry::mdp3();
        let template = registry.resolve(50).unwrap();
        assert_eq!(template.name, "MDIncrementalRefreshLimitsBanding50");
        assert_eq!(registry.schema_id(), 1);
        assert_eq!(registry.schema_version(), 13);
    }

    #[test]
    fn builtin_templates_are_valid() {
        for template in mdp3::TEMPLATES {
            template
                .validate()
                .unwrap_or_else(|e| panic!("{} failed validation: {e}", template.name));
        }
    }

    #[test]
    fn builtin_registry_holds_every_template() {
        let registry = TemplateRegistry::mdp3();
        assert_eq!(registry.len(), mdp3::TEMPLATES.len());
        for template in mdp3::TEMPLATES {
            assert_eq!(registry.resolve(template.id).unwrap().name, template.name);
        }
    }

    #[test]
    fn templates_are_sorted() {
        let ids: Vec<u16> = TemplateRegistry::mdp3()
            .templates()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![4, 30, 46, 48, 50]);
    }

    #[test]
    fn unknown_template_is_distinct_error() {
        let registry = TemplateRegistry::mdp3();
        assert_eq!(
            registry.resolve(10),
            Err(TypeError::UnknownTemplate { template_id: 10 })
        );
    }

    static BAD_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new("Wide", 1, 2, FieldKind::U64)];
    static BAD: Template = Template {
        id: 900,
        name: "Bad",
        block_length: 4,
        since_version: 0,
        fields: &BAD_FIELDS,
        groups: &[],
    };
    static GOOD: Template = Template {
        id: 900,
        name: "Good",
        block_length: 10,
        since_version: 0,
        fields: &BAD_FIELDS,
        groups: &[],
    };

    #[test]
    fn register_validates_and_replaces() {
        let mut registry = TemplateRegistry::new(7, 1);
        assert!(registry.is_empty());
        assert!(registry.register(&BAD).is_err());
        assert!(registry.get(900).is_none());

        assert_eq!(registry.register(&GOOD).unwrap(), None);
        assert_eq!(registry.register(&GOOD).unwrap().map(|t| t.name), Some("Good"));
        assert_eq!(registry.len(), 1);
    }
}

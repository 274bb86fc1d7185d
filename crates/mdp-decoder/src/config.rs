use mdp_types::schema::mdp3;

/// What a [`PacketDecoder`](crate::PacketDecoder) does with a message
/// whose template id has no registered field table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownTemplatePolicy {
    /// Fail the decode with [`DecodeError::UnknownTemplate`](crate::DecodeError::UnknownTemplate).
    #[default]
    Reject,
    /// Record the message as skipped and carry on with the next frame.
    ///
    /// MsgSize framing makes this safe: the next message can be located
    /// without understanding this one.
    Skip,
}

/// Decoder settings.
///
/// The default accepts any schema id and rejects unknown templates.
/// [`mdp3`](Self::mdp3) pins the schema id to MDP 3.0 and skips
/// templates outside the built-in subset, which is what a feed handler
/// that only cares about a few message types wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Reject messages whose header carries a different schema id.
    pub expected_schema_id: Option<u16>,
    pub unknown_templates: UnknownTemplatePolicy,
}

impl DecoderConfig {
    #[must_use]
    pub fn mdp3() -> Self {
        Self {
            expected_schema_id: Some(mdp3::SCHEMA_ID),
            unknown_templates: UnknownTemplatePolicy::Skip,
        }
    }

    #[must_use]
    pub fn with_expected_schema_id(self, schema_id: Option<u16>) -> Self {
        Self {
            expected_schema_id: schema_id,
            ..self
        }
    }

    #[must_use]
    pub fn with_unknown_templates(self, policy: UnknownTemplatePolicy) -> Self {
        Self {
            unknown_templates: policy,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_permissive_on_schema_strict_on_templates() {
        let config = DecoderConfig::default();
        assert_eq!(config.expected_schema_id, None);
        assert_eq!(config.unknown_templates, UnknownTemplatePolicy::Reject);
    }

    #[test]
    fn mdp3_preset() {
        let config = DecoderConfig::mdp3();
        assert_eq!(config.expected_schema_id, Some(1));
        assert_eq!(config.unknown_templates, UnknownTemplatePolicy::Skip);

        let strict = config.with_unknown_templates(UnknownTemplatePolicy::Reject);
        assert_eq!(strict.unknown_templates, UnknownTemplatePolicy::Reject);
        assert_eq!(strict.with_expected_schema_id(None).expected_schema_id, None);
    }
}

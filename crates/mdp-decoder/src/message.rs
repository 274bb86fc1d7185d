use mdp_types::{FieldDescriptor, FieldValue, FromFieldValue, Template, TemplateRegistry};
use mdp_wire::{MESSAGE_HEADER_SIZE, MessageHeader};

use crate::block::{BlockReader, FieldRead};
use crate::error::DecodeError;
use crate::group::{GroupReader, Groups};

/// A decoded view over one SBE message, bound to its template's field
/// table.
///
/// The reader is a pure function of its inputs: it borrows the buffer,
/// allocates nothing, and every accessor can be called any number of
/// times with the same result. It is `Copy`, so handing it to typed views
/// or other threads costs nothing.
///
/// ```text
///   buf: ┌────────────┬────────────────────────┬──────────┬──────────┐
///        │ SBE header │ root block             │ group 0  │ group 1  │
///        │ 8 bytes    │ acting_block_length    │          │          │
///        └────────────┴────────────────────────┴──────────┴──────────┘
///                     ▲ offset                 ▲ offset + acting_block_length
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MessageReader<'a> {
    buf: &'a [u8],
    offset: usize,
    template: &'static Template,
    root: BlockReader<'a>,
}

impl<'a> MessageReader<'a> {
    /// Bind `template` to the root block starting at `offset` in `buf`.
    ///
    /// `acting_block_length` and `acting_version` come from the message
    /// header of this particular buffer, not from the template.
    #[must_use]
    pub fn wrap_for_decode(
        buf: &'a [u8],
        offset: usize,
        acting_block_length: u16,
        acting_version: u16,
        template: &'static Template,
    ) -> Self {
        let root = BlockReader::new(
            buf,
            offset,
            usize::from(acting_block_length),
            acting_version,
            template.name,
            template.fields,
        );
        Self {
            buf,
            offset,
            template,
            root,
        }
    }

    /// Read the SBE header at the start of `buf`, resolve its template,
    /// and wrap the body.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidHeader`] if `buf` is shorter than the header.
    /// - [`DecodeError::UnknownTemplate`] if `registry` has no table for
    ///   the template id.
    pub fn wrap(buf: &'a [u8], registry: &TemplateRegistry) -> Result<Self, DecodeError> {
        let header = MessageHeader::read_at(buf, 0).map_err(DecodeError::InvalidHeader)?;
        let template = registry
            .get(header.template_id)
            .ok_or(DecodeError::UnknownTemplate {
                template_id: header.template_id,
                schema_id: header.schema_id,
                version: header.version,
            })?;
        Ok(Self::wrap_for_decode(
            buf,
            MESSAGE_HEADER_SIZE,
            header.block_length,
            header.version,
            template,
        ))
    }

    #[must_use]
    pub fn template(&self) -> &'static Template {
        self.template
    }

    #[must_use]
    pub fn template_id(&self) -> u16 {
        self.template.id
    }

    #[must_use]
    pub fn acting_version(&self) -> u16 {
        self.root.acting_version()
    }

    #[must_use]
    pub fn acting_block_length(&self) -> usize {
        self.root.acting_block_length()
    }

    /// Offset of the root block in the wrapped buffer.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Accessor for the root block.
    #[must_use]
    pub fn root(&self) -> &BlockReader<'a> {
        &self.root
    }

    /// Read a root-block field by name under the default policy.
    ///
    /// # Errors
    ///
    /// See [`BlockReader::field`].
    pub fn field(&self, name: &str) -> Result<Option<FieldValue<'a>>, DecodeError> {
        self.root.field(name)
    }

    /// See [`BlockReader::get`].
    ///
    /// # Errors
    ///
    /// See [`BlockReader::read`].
    pub fn get(&self, desc: &FieldDescriptor) -> Result<Option<FieldValue<'a>>, DecodeError> {
        self.root.get(desc)
    }

    /// See [`BlockReader::read`].
    ///
    /// # Errors
    ///
    /// Bounds errors when the buffer ends inside the acting block.
    pub fn read(&self, desc: &FieldDescriptor) -> Result<FieldRead<'a>, DecodeError> {
        self.root.read(desc)
    }

    /// See [`BlockReader::required`].
    ///
    /// # Errors
    ///
    /// See [`BlockReader::required`].
    pub fn required<T: FromFieldValue>(&self, desc: &FieldDescriptor) -> Result<T, DecodeError> {
        self.root.required(desc)
    }

    /// Walk the message's repeating groups in schema order.
    #[must_use]
    pub fn groups(&self) -> Groups<'a> {
        Groups::new(
            self.buf,
            self.offset + self.acting_block_length(),
            self.acting_version(),
            self.template.groups,
        )
    }

    /// The group called `name`.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnknownGroup`] if the template has no such group.
    /// - Bounds errors if this group's or an earlier group's dimension
    ///   header is missing from the buffer.
    pub fn group(&self, name: &str) -> Result<GroupReader<'a>, DecodeError> {
        for group in self.groups() {
            let group = group?;
            if group.name() == name {
                return Ok(group);
            }
        }
        Err(DecodeError::UnknownGroup {
            template: self.template.name,
            group: name.to_owned(),
        })
    }

    /// Bytes taken by the root block and every group, excluding the SBE
    /// header.
    ///
    /// # Errors
    ///
    /// Bounds errors if a dimension header is missing from the buffer.
    pub fn encoded_length(&self) -> Result<usize, DecodeError> {
        self.groups()
            .try_fold(self.acting_block_length(), |total, group| {
                Ok(total + group?.encoded_length())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdp_encoder::MessageEncoder;
    use mdp_types::schema::mdp3::incremental_refresh_limits_banding_50 as limits;
    use mdp_types::Decimal;
    use mdp_wire::WireError;

    use crate::block::Absence;

    fn limits_message(version: u16) -> Vec<u8> {
        let mut encoder = MessageEncoder::new(&limits::TEMPLATE, 1, version);
        encoder
            .set("TransactTime", FieldValue::U64(1_633_099_253_937_623_627))
            .set("MatchEventIndicator", FieldValue::U8(0));
        encoder.entry("NoMDEntries", |e| {
            e.set_null("HighLimitPrice")
                .set(
                    "LowLimitPrice",
                    FieldValue::Decimal(Decimal::new(9_000_000_000_000, -9)),
                )
                .set(
                    "MaxPriceVariation",
                    FieldValue::Decimal(Decimal::new(10_000_000_000, -9)),
                )
                .set("SecurityID", FieldValue::I32(5620))
                .set("RptSeq", FieldValue::U32(1869));
        });
        encoder.encode().unwrap()
    }

    #[test]
    fn wrap_reads_root_and_group() {
        let buf = limits_message(9);
        let registry = TemplateRegistry::mdp3();
        let reader = MessageReader::wrap(&buf, &registry).unwrap();

        assert_eq!(reader.template_id(), 50);
        assert_eq!(reader.acting_version(), 9);
        assert_eq!(
            reader.required::<u64>(&limits::TRANSACT_TIME).unwrap(),
            1_633_099_253_937_623_627
        );

        let entries = reader.group("NoMDEntries").unwrap();
        assert_eq!(entries.len(), 1);
        let entry = entries.entry(0).unwrap();
        assert_eq!(entry.required::<i32>(&limits::SECURITY_ID).unwrap(), 5620);
        assert_eq!(entry.required::<u32>(&limits::RPT_SEQ).unwrap(), 1869);
        assert_eq!(entry.value::<Decimal>(&limits::HIGH_LIMIT_PRICE).unwrap(), None);
        assert_eq!(entry.required::<char>(&limits::MD_ENTRY_TYPE).unwrap(), 'g');
    }

    #[test]
    fn encoded_length_covers_groups() {
        let buf = limits_message(9);
        let reader = MessageReader::wrap(&buf, &TemplateRegistry::mdp3()).unwrap();
        assert_eq!(reader.encoded_length().unwrap(), 11 + 3 + 32);
        assert_eq!(buf.len(), MESSAGE_HEADER_SIZE + 11 + 3 + 32);
    }

    #[test]
    fn unknown_template_is_not_a_bounds_error() {
        let mut buf = limits_message(9);
        buf[2] = 10;
        assert_eq!(
            MessageReader::wrap(&buf, &TemplateRegistry::mdp3()).unwrap_err(),
            DecodeError::UnknownTemplate {
                template_id: 10,
                schema_id: 1,
                version: 9
            }
        );
    }

    #[test]
    fn short_header_is_invalid() {
        assert!(matches!(
            MessageReader::wrap(&[0x0B, 0x00, 0x32], &TemplateRegistry::mdp3()),
            Err(DecodeError::InvalidHeader(WireError::MalformedHeader { .. }))
        ));
    }

    #[test]
    fn block_length_from_header_not_template() {
        // A newer producer with a 16-byte root block: the group moves.
        let buf = limits_message(9);
        let mut newer = buf[..MESSAGE_HEADER_SIZE + 11].to_vec();
        newer.extend_from_slice(&[0xAB; 5]);
        newer.extend_from_slice(&buf[MESSAGE_HEADER_SIZE + 11..]);
        newer[0] = 16;

        let reader = MessageReader::wrap(&newer, &TemplateRegistry::mdp3()).unwrap();
        assert_eq!(reader.acting_block_length(), 16);
        let entry = reader.group("NoMDEntries").unwrap().entry(0).unwrap();
        assert_eq!(entry.required::<i32>(&limits::SECURITY_ID).unwrap(), 5620);
    }

    #[test]
    fn unknown_group_name() {
        let buf = limits_message(9);
        let reader = MessageReader::wrap(&buf, &TemplateRegistry::mdp3()).unwrap();
        assert!(matches!(
            reader.group("NoOrderIDEntries"),
            Err(DecodeError::UnknownGroup { .. })
        ));
    }

    #[test]
    fn acting_version_override_reads_same_values() {
        let buf = limits_message(9);
        let reader =
            MessageReader::wrap_for_decode(&buf, MESSAGE_HEADER_SIZE, 11, 13, &limits::TEMPLATE);
        assert_eq!(reader.acting_version(), 13);
        let entry = reader.group("NoMDEntries").unwrap().entry(0).unwrap();
        assert_eq!(entry.required::<i32>(&limits::SECURITY_ID).unwrap(), 5620);
    }

    #[test]
    fn root_field_past_acting_block_is_absent() {
        let buf = limits_message(9);
        let reader =
            MessageReader::wrap_for_decode(&buf, MESSAGE_HEADER_SIZE, 8, 9, &limits::TEMPLATE);
        assert_eq!(
            reader.read(&limits::MATCH_EVENT_INDICATOR).unwrap(),
            FieldRead::Absent(Absence::BeyondBlock)
        );
        assert_eq!(reader.field("MatchEventIndicator").unwrap(), Some(FieldValue::U8(0)));
    }
}

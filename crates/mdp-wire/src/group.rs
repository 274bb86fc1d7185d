use crate::error::WireError;
use crate::view::ByteView;

/// How a repeating group's dimension header is laid out on the wire.
///
/// ```text
/// ┌──────────────────────┬───────┬──────────────────────────────────────────┐
/// │ Encoding             │ Bytes │ Layout                                   │
/// ├──────────────────────┼───────┼──────────────────────────────────────────┤
/// │ GroupSize            │ 3     │ blockLength u16 │ numInGroup u8          │
/// │ GroupSize8Byte       │ 8     │ blockLength u16 │ 5 pad │ numInGroup u8  │
/// │ GroupSizeEncoding    │ 4     │ blockLength u16 │ numInGroup u16         │
/// └──────────────────────┴───────┴──────────────────────────────────────────┘
/// ```
///
/// MDP 3.0 uses the first two; the last is the plain SBE default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupDimension {
    GroupSize,
    GroupSize8Byte,
    GroupSizeEncoding,
}

impl GroupDimension {
    /// Width of the dimension header in bytes.
    #[must_use]
    pub const fn encoded_length(self) -> usize {
        match self {
            Self::GroupSize => 3,
            Self::GroupSize8Byte => 8,
            Self::GroupSizeEncoding => 4,
        }
    }

    /// Largest entry count this encoding can carry.
    #[must_use]
    pub const fn max_count(self) -> usize {
        match self {
            Self::GroupSize | Self::GroupSize8Byte => u8::MAX as usize,
            Self::GroupSizeEncoding => u16::MAX as usize,
        }
    }

    const fn count_offset(self) -> usize {
        match self {
            Self::GroupSize | Self::GroupSizeEncoding => 2,
            Self::GroupSize8Byte => 7,
        }
    }
}

/// A decoded repeating-group dimension header.
///
/// `block_length` is the size of every entry as written by the producer.
/// It plays the same role for entries that the message header's block
/// length plays for the root block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupHeader {
    pub block_length: u16,
    pub num_in_group: u16,
}

impl GroupHeader {
    /// Total bytes occupied by the entries (excluding the dimension header).
    #[must_use]
    pub fn entries_length(&self) -> usize {
        usize::from(self.block_length) * usize::from(self.num_in_group)
    }

    /// Decode a dimension header at `offset` in `view`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedHeader`] if the header does not fit.
    pub fn read_from(
        view: &ByteView<'_>,
        offset: usize,
        dimension: GroupDimension,
    ) -> Result<Self, WireError> {
        let needed = dimension.encoded_length();
        let available = view.len().saturating_sub(offset);
        if available < needed {
            return Err(WireError::MalformedHeader {
                what: "group",
                needed,
                available,
            });
        }

        let block_length = view.u16_at(offset)?;
        let count_at = offset + dimension.count_offset();
        let num_in_group = match dimension {
            GroupDimension::GroupSizeEncoding => view.u16_at(count_at)?,
            GroupDimension::GroupSize | GroupDimension::GroupSize8Byte => {
                u16::from(view.u8_at(count_at)?)
            }
        };

        Ok(Self {
            block_length,
            num_in_group,
        })
    }

    /// Write the dimension header into the start of `buf`.
    ///
    /// Padding bytes of [`GroupDimension::GroupSize8Byte`] are zeroed.
    ///
    /// # Errors
    ///
    /// - [`WireError::MalformedHeader`] if `buf` is too short.
    /// - [`WireError::CountOverflow`] if `num_in_group` exceeds the
    ///   encoding's maximum.
    pub fn write_to(&self, buf: &mut [u8], dimension: GroupDimension) -> Result<(), WireError> {
        let needed = dimension.encoded_length();
        if buf.len() < needed {
            return Err(WireError::MalformedHeader {
                what: "group",
                needed,
                available: buf.len(),
            });
        }
        let count = usize::from(self.num_in_group);
        if count > dimension.max_count() {
            return Err(WireError::CountOverflow {
                count,
                max: dimension.max_count(),
            });
        }

        buf[..needed].fill(0);
        buf[0..2].copy_from_slice(&self.block_length.to_le_bytes());
        let count_at = dimension.count_offset();
        match dimension {
            GroupDimension::GroupSizeEncoding => {
                buf[count_at..count_at + 2].copy_from_slice(&self.num_in_group.to_le_bytes());
            }
            GroupDimension::GroupSize | GroupDimension::GroupSize8Byte => {
                // Count was checked against u8::MAX above.
                buf[count_at] = self.num_in_group as u8;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_group_size() {
        // blockLength=32, numInGroup=1 (from a LimitsBanding capture)
        let buf = [0x20, 0x00, 0x01];
        let header =
            GroupHeader::read_from(&ByteView::new(&buf), 0, GroupDimension::GroupSize).unwrap();
        assert_eq!(header.block_length, 32);
        assert_eq!(header.num_in_group, 1);
        assert_eq!(header.entries_length(), 32);
    }

    #[test]
    fn reads_group_size_8_byte() {
        let buf = [0x18, 0x00, 0, 0, 0, 0, 0, 0x03];
        let header =
            GroupHeader::read_from(&ByteView::new(&buf), 0, GroupDimension::GroupSize8Byte)
                .unwrap();
        assert_eq!(header.block_length, 24);
        assert_eq!(header.num_in_group, 3);
    }

    #[test]
    fn roundtrip_each_dimension() {
        for dim in [
            GroupDimension::GroupSize,
            GroupDimension::GroupSize8Byte,
            GroupDimension::GroupSizeEncoding,
        ] {
            let header = GroupHeader {
                block_length: 16,
                num_in_group: 200,
            };
            let mut buf = vec![0xFF; dim.encoded_length()];
            header.write_to(&mut buf, dim).unwrap();
            let parsed = GroupHeader::read_from(&ByteView::new(&buf), 0, dim).unwrap();
            assert_eq!(parsed, header, "failed for {dim:?}");
        }
    }

    #[test]
    fn truncated_header_is_malformed() {
        let buf = [0x20, 0x00];
        let result = GroupHeader::read_from(&ByteView::new(&buf), 0, GroupDimension::GroupSize);
        assert!(matches!(
            result,
            Err(WireError::MalformedHeader {
                what: "group",
                needed: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn count_overflow_rejected() {
        let header = GroupHeader {
            block_length: 8,
            num_in_group: 256,
        };
        let mut buf = [0u8; 3];
        assert!(matches!(
            header.write_to(&mut buf, GroupDimension::GroupSize),
            Err(WireError::CountOverflow { count: 256, max: 255 })
        ));
    }
}

use mdp_types::GroupDescriptor;
use mdp_wire::{ByteView, GroupHeader};

use crate::block::BlockReader;
use crate::error::DecodeError;

/// One repeating group of a message: its dimension header plus the
/// entries that follow it.
///
/// ```text
/// ┌──────────────────┬───────────┬───────────┬─────┬───────────────┐
/// │ dimension header │ entry 0   │ entry 1   │ ... │ entry n-1     │
/// │ (3, 4 or 8 B)    │ blockLen  │ blockLen  │     │ blockLen      │
/// └──────────────────┴───────────┴───────────┴─────┴───────────────┘
/// ```
///
/// Each entry is a [`BlockReader`] whose acting block length is the
/// producer's entry size from the dimension header, so entries from
/// older or newer producers obey the same field rule as the root block.
/// A group the acting version predates takes no bytes and has no entries.
#[derive(Clone, Copy, Debug)]
pub struct GroupReader<'a> {
    buf: &'a [u8],
    descriptor: &'static GroupDescriptor,
    header: GroupHeader,
    acting_version: u16,
    /// Offset of the dimension header in `buf`.
    offset: usize,
    present: bool,
}

impl<'a> GroupReader<'a> {
    /// Read the group's dimension header at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Wire`] if the dimension header does not fit
    /// in `buf`.
    pub fn read(
        buf: &'a [u8],
        offset: usize,
        descriptor: &'static GroupDescriptor,
        acting_version: u16,
    ) -> Result<Self, DecodeError> {
        let present = descriptor.exists_in(acting_version);
        let header = if present {
            GroupHeader::read_from(&ByteView::new(buf), offset, descriptor.dimension)?
        } else {
            GroupHeader::default()
        };

        Ok(Self {
            buf,
            descriptor,
            header,
            acting_version,
            offset,
            present,
        })
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static GroupDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    #[must_use]
    pub fn header(&self) -> GroupHeader {
        self.header
    }

    /// Whether the producer's schema version carries this group at all.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Number of entries (`numInGroup`).
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.header.num_in_group)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header.num_in_group == 0
    }

    /// Bytes taken by the dimension header and every entry.
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        if self.present {
            self.descriptor.dimension.encoded_length() + self.header.entries_length()
        } else {
            0
        }
    }

    /// The entry at `index`, or `None` past the end.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<BlockReader<'a>> {
        if index >= self.len() {
            return None;
        }
        let block_length = usize::from(self.header.block_length);
        let start = self.offset + self.descriptor.dimension.encoded_length() + index * block_length;
        Some(BlockReader::new(
            self.buf,
            start,
            block_length,
            self.acting_version,
            self.descriptor.name,
            self.descriptor.fields,
        ))
    }

    #[must_use]
    pub fn iter(&self) -> GroupEntries<'a> {
        GroupEntries {
            group: *self,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for GroupReader<'a> {
    type Item = BlockReader<'a>;
    type IntoIter = GroupEntries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`GroupReader`].
#[derive(Clone, Debug)]
pub struct GroupEntries<'a> {
    group: GroupReader<'a>,
    next: usize,
}

impl<'a> Iterator for GroupEntries<'a> {
    type Item = BlockReader<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.group.entry(self.next)?;
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.group.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for GroupEntries<'_> {}

/// Walks a message's groups in schema order.
///
/// Each group starts where the previous one ends, so locating group `n`
/// means reading the dimension headers of groups `0..n`. After a
/// dimension header fails to read the walk stops, since nothing after it
/// can be located.
#[derive(Clone, Debug)]
pub struct Groups<'a> {
    buf: &'a [u8],
    acting_version: u16,
    pos: usize,
    remaining: std::slice::Iter<'static, GroupDescriptor>,
    failed: bool,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(
        buf: &'a [u8],
        offset: usize,
        acting_version: u16,
        descriptors: &'static [GroupDescriptor],
    ) -> Self {
        Self {
            buf,
            acting_version,
            pos: offset,
            remaining: descriptors.iter(),
            failed: false,
        }
    }
}

impl<'a> Iterator for Groups<'a> {
    type Item = Result<GroupReader<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let descriptor = self.remaining.next()?;
        match GroupReader::read(self.buf, self.pos, descriptor, self.acting_version) {
            Ok(group) => {
                self.pos += group.encoded_length();
                Some(Ok(group))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdp_types::{FieldDescriptor, FieldKind, FieldValue};
    use mdp_wire::{GroupDimension, WireError};

    static ENTRY: [FieldDescriptor; 2] = [
        FieldDescriptor::new("Id", 1, 0, FieldKind::U32),
        FieldDescriptor::new("Extra", 2, 4, FieldKind::U16).since(11),
    ];

    static GROUPS: [GroupDescriptor; 2] = [
        GroupDescriptor {
            name: "First",
            id: 10,
            dimension: GroupDimension::GroupSize,
            block_length: 6,
            since_version: 0,
            fields: &ENTRY,
        },
        GroupDescriptor {
            name: "Second",
            id: 11,
            dimension: GroupDimension::GroupSize8Byte,
            block_length: 6,
            since_version: 12,
            fields: &ENTRY,
        },
    ];

    fn group_bytes(block_length: u16, ids: &[u32]) -> Vec<u8> {
        let mut buf = vec![0u8; 3];
        GroupHeader {
            block_length,
            num_in_group: u16::try_from(ids.len()).unwrap(),
        }
        .write_to(&mut buf, GroupDimension::GroupSize)
        .unwrap();
        for id in ids {
            let mut entry = vec![0u8; usize::from(block_length)];
            entry[..4].copy_from_slice(&id.to_le_bytes());
            buf.extend_from_slice(&entry);
        }
        buf
    }

    #[test]
    fn iterates_entries_with_producer_block_length() {
        // Producer wrote 8-byte entries; the table knows 6.
        let buf = group_bytes(8, &[7, 8, 9]);
        let group = GroupReader::read(&buf, 0, &GROUPS[0], 13).unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.encoded_length(), 3 + 24);

        let ids: Vec<u32> = group
            .iter()
            .map(|e| e.required::<u32>(&ENTRY[0]).unwrap())
            .collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn short_entries_default_trailing_fields() {
        let buf = group_bytes(4, &[1]);
        let group = GroupReader::read(&buf, 0, &GROUPS[0], 13).unwrap();
        let entry = group.entry(0).unwrap();
        assert_eq!(entry.get(&ENTRY[1]).unwrap(), Some(FieldValue::U16(0)));
        assert!(group.entry(1).is_none());
    }

    #[test]
    fn group_newer_than_acting_version_is_empty() {
        let group = GroupReader::read(&[], 0, &GROUPS[1], 11).unwrap();
        assert!(!group.is_present());
        assert!(group.is_empty());
        assert_eq!(group.encoded_length(), 0);
        assert_eq!(group.iter().count(), 0);
    }

    #[test]
    fn walk_locates_groups_in_order() {
        let mut buf = group_bytes(6, &[1, 2]);
        let mut second = vec![0u8; 8];
        GroupHeader {
            block_length: 6,
            num_in_group: 1,
        }
        .write_to(&mut second, GroupDimension::GroupSize8Byte)
        .unwrap();
        second.extend_from_slice(&[42, 0, 0, 0, 0, 0]);
        buf.extend_from_slice(&second);

        let groups: Vec<_> = Groups::new(&buf, 0, 13, &GROUPS)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].name(), "Second");
        let id = groups[1].entry(0).unwrap().required::<u32>(&ENTRY[0]).unwrap();
        assert_eq!(id, 42);
    }

    #[test]
    fn missing_dimension_header_stops_the_walk() {
        let buf = group_bytes(6, &[1]);
        let mut walk = Groups::new(&buf[..2], 0, 13, &GROUPS);
        assert!(matches!(
            walk.next(),
            Some(Err(DecodeError::Wire(WireError::MalformedHeader { .. })))
        ));
        assert!(walk.next().is_none());
    }
}

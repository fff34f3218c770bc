//! Descriptor specifier codec.
//!
//! Builds and parses the byte sequence that identifies a descriptor operand
//! target, as used by `OPEN DESCRIPTOR`, `READ DESCRIPTOR`, `WRITE
//! DESCRIPTOR`, and `CREATE DESCRIPTOR`.

/// Dynamic field widths discovered from the target, governing how wide each
/// multi-byte integer field in a specifier is written/read.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DescriptorSizes {
    pub size_of_list_id: usize,
    pub size_of_object_id: usize,
    pub size_of_entry_position: usize,
}

impl DescriptorSizes {
    pub const DEFAULT_SIZE_OF_LIST_ID: usize = 2;
    pub const DEFAULT_SIZE_OF_OBJECT_ID: usize = 0;
    pub const DEFAULT_SIZE_OF_ENTRY_POSITION: usize = 2;

    fn effective_list_id(&self) -> usize {
        if self.size_of_list_id == 0 {
            Self::DEFAULT_SIZE_OF_LIST_ID
        } else {
            self.size_of_list_id
        }
    }

    fn effective_object_id(&self) -> usize {
        if self.size_of_object_id == 0 {
            Self::DEFAULT_SIZE_OF_OBJECT_ID
        } else {
            self.size_of_object_id
        }
    }

    fn effective_entry_position(&self) -> usize {
        if self.size_of_entry_position == 0 {
            Self::DEFAULT_SIZE_OF_ENTRY_POSITION
        } else {
            self.size_of_entry_position
        }
    }
}

impl Default for DescriptorSizes {
    fn default() -> Self {
        DescriptorSizes {
            size_of_list_id: Self::DEFAULT_SIZE_OF_LIST_ID,
            size_of_object_id: Self::DEFAULT_SIZE_OF_OBJECT_ID,
            size_of_entry_position: Self::DEFAULT_SIZE_OF_ENTRY_POSITION,
        }
    }
}

/// One of the nine descriptor specifier shapes, keyed by leading byte.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DescriptorSpecifier {
    /// `0x00`: identifies the unit or subunit itself, no further operands.
    UnitOrSubunit,
    /// `0x10`: a list identified by its list id.
    ListById { list_id: u64 },
    /// `0x11`: a list identified by its type byte.
    ListByType { list_type: u8 },
    /// `0x20`: an entry identified by position within a list.
    EntryByPosition { list_id: u64, entry_position: u64 },
    /// `0x21`: an entry identified by object id within a typed list root.
    EntryByObjectIdInListTypeRoot {
        root_list_id: u64,
        list_type: u8,
        object_id: u64,
    },
    /// `0x22`: an entry identified by type, for `CREATE DESCRIPTOR`.
    EntryByTypeCreate { entry_type: u8 },
    /// `0x23`: an entry identified by object id, unscoped.
    EntryByObjectIdGeneral { object_id: u64 },
    /// `0x24`: subunit-scoped entry-by-object-id. Size-only support: the
    /// subunit specifier content is not modeled.
    SubunitEntryByObjectId,
    /// `0x25`: subunit-scoped entry-by-object-id within a typed list root.
    /// Size-only support: the subunit specifier content is not modeled.
    SubunitEntryByObjectIdInListTypeRoot,
}

impl DescriptorSpecifier {
    pub const TYPE_UNIT_OR_SUBUNIT: u8 = 0x00;
    pub const TYPE_LIST_BY_ID: u8 = 0x10;
    pub const TYPE_LIST_BY_TYPE: u8 = 0x11;
    pub const TYPE_ENTRY_BY_POSITION: u8 = 0x20;
    pub const TYPE_ENTRY_BY_OBJECT_ID_IN_LIST_TYPE_ROOT: u8 = 0x21;
    pub const TYPE_ENTRY_BY_TYPE_CREATE: u8 = 0x22;
    pub const TYPE_ENTRY_BY_OBJECT_ID_GENERAL: u8 = 0x23;
    pub const TYPE_SUBUNIT_ENTRY_BY_OBJECT_ID: u8 = 0x24;
    pub const TYPE_SUBUNIT_ENTRY_BY_OBJECT_ID_IN_LIST_TYPE_ROOT: u8 = 0x25;

    fn leading_byte(&self) -> u8 {
        match self {
            Self::UnitOrSubunit => Self::TYPE_UNIT_OR_SUBUNIT,
            Self::ListById { .. } => Self::TYPE_LIST_BY_ID,
            Self::ListByType { .. } => Self::TYPE_LIST_BY_TYPE,
            Self::EntryByPosition { .. } => Self::TYPE_ENTRY_BY_POSITION,
            Self::EntryByObjectIdInListTypeRoot { .. } => {
                Self::TYPE_ENTRY_BY_OBJECT_ID_IN_LIST_TYPE_ROOT
            }
            Self::EntryByTypeCreate { .. } => Self::TYPE_ENTRY_BY_TYPE_CREATE,
            Self::EntryByObjectIdGeneral { .. } => Self::TYPE_ENTRY_BY_OBJECT_ID_GENERAL,
            Self::SubunitEntryByObjectId => Self::TYPE_SUBUNIT_ENTRY_BY_OBJECT_ID,
            Self::SubunitEntryByObjectIdInListTypeRoot => {
                Self::TYPE_SUBUNIT_ENTRY_BY_OBJECT_ID_IN_LIST_TYPE_ROOT
            }
        }
    }

    /// Builds the byte sequence for this specifier, or an empty sequence if
    /// the variant has no full content model (the two subunit-scoped kinds).
    pub fn build(&self, sizes: &DescriptorSizes) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            Self::UnitOrSubunit => {
                buf.push(self.leading_byte());
            }
            Self::ListById { list_id } => {
                buf.push(self.leading_byte());
                write_multi_byte(&mut buf, *list_id, sizes.effective_list_id());
            }
            Self::ListByType { list_type } => {
                buf.push(self.leading_byte());
                buf.push(*list_type);
            }
            Self::EntryByPosition {
                list_id,
                entry_position,
            } => {
                buf.push(self.leading_byte());
                write_multi_byte(&mut buf, *list_id, sizes.effective_list_id());
                write_multi_byte(&mut buf, *entry_position, sizes.effective_entry_position());
            }
            Self::EntryByObjectIdInListTypeRoot {
                root_list_id,
                list_type,
                object_id,
            } => {
                buf.push(self.leading_byte());
                write_multi_byte(&mut buf, *root_list_id, sizes.effective_list_id());
                buf.push(*list_type);
                write_multi_byte(&mut buf, *object_id, sizes.effective_object_id());
            }
            Self::EntryByTypeCreate { entry_type } => {
                buf.push(self.leading_byte());
                buf.push(*entry_type);
            }
            Self::EntryByObjectIdGeneral { object_id } => {
                buf.push(self.leading_byte());
                write_multi_byte(&mut buf, *object_id, sizes.effective_object_id());
            }
            Self::SubunitEntryByObjectId | Self::SubunitEntryByObjectIdInListTypeRoot => {
                return Vec::new();
            }
        }
        buf
    }
}

/// Result of [`parse`]: the decoded specifier (if recognized) and how many
/// bytes of the input it consumed, so callers can advance a cursor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedDescriptorSpecifier {
    pub specifier: Option<DescriptorSpecifier>,
    pub consumed_size: usize,
}

/// Parses one descriptor specifier from the front of `buffer`.
pub fn parse(buffer: &[u8], sizes: &DescriptorSizes) -> ParsedDescriptorSpecifier {
    let unknown = ParsedDescriptorSpecifier {
        specifier: None,
        consumed_size: 0,
    };
    if buffer.is_empty() {
        return unknown;
    }

    let list_id_size = sizes.effective_list_id();
    let object_id_size = sizes.effective_object_id();
    let entry_pos_size = sizes.effective_entry_position();

    match buffer[0] {
        DescriptorSpecifier::TYPE_UNIT_OR_SUBUNIT => ParsedDescriptorSpecifier {
            specifier: Some(DescriptorSpecifier::UnitOrSubunit),
            consumed_size: 1,
        },
        DescriptorSpecifier::TYPE_LIST_BY_ID => {
            let total = 1 + list_id_size;
            if buffer.len() < total {
                return unknown;
            }
            let list_id = read_multi_byte(&buffer[1..total], list_id_size);
            ParsedDescriptorSpecifier {
                specifier: Some(DescriptorSpecifier::ListById { list_id }),
                consumed_size: total,
            }
        }
        DescriptorSpecifier::TYPE_LIST_BY_TYPE => {
            if buffer.len() < 2 {
                return unknown;
            }
            ParsedDescriptorSpecifier {
                specifier: Some(DescriptorSpecifier::ListByType {
                    list_type: buffer[1],
                }),
                consumed_size: 2,
            }
        }
        DescriptorSpecifier::TYPE_ENTRY_BY_POSITION => {
            let total = 1 + list_id_size + entry_pos_size;
            if buffer.len() < total {
                return unknown;
            }
            let list_id = read_multi_byte(&buffer[1..1 + list_id_size], list_id_size);
            let entry_position =
                read_multi_byte(&buffer[1 + list_id_size..total], entry_pos_size);
            ParsedDescriptorSpecifier {
                specifier: Some(DescriptorSpecifier::EntryByPosition {
                    list_id,
                    entry_position,
                }),
                consumed_size: total,
            }
        }
        DescriptorSpecifier::TYPE_ENTRY_BY_OBJECT_ID_IN_LIST_TYPE_ROOT => {
            let total = 1 + list_id_size + 1 + object_id_size;
            if buffer.len() < total {
                return unknown;
            }
            let root_list_id = read_multi_byte(&buffer[1..1 + list_id_size], list_id_size);
            let list_type = buffer[1 + list_id_size];
            let object_id_off = 1 + list_id_size + 1;
            let object_id = read_multi_byte(&buffer[object_id_off..total], object_id_size);
            ParsedDescriptorSpecifier {
                specifier: Some(DescriptorSpecifier::EntryByObjectIdInListTypeRoot {
                    root_list_id,
                    list_type,
                    object_id,
                }),
                consumed_size: total,
            }
        }
        DescriptorSpecifier::TYPE_ENTRY_BY_TYPE_CREATE => {
            if buffer.len() < 2 {
                return unknown;
            }
            ParsedDescriptorSpecifier {
                specifier: Some(DescriptorSpecifier::EntryByTypeCreate {
                    entry_type: buffer[1],
                }),
                consumed_size: 2,
            }
        }
        DescriptorSpecifier::TYPE_ENTRY_BY_OBJECT_ID_GENERAL => {
            let total = 1 + object_id_size;
            if buffer.len() < total {
                return unknown;
            }
            let object_id = read_multi_byte(&buffer[1..total], object_id_size);
            ParsedDescriptorSpecifier {
                specifier: Some(DescriptorSpecifier::EntryByObjectIdGeneral { object_id }),
                consumed_size: total,
            }
        }
        DescriptorSpecifier::TYPE_SUBUNIT_ENTRY_BY_OBJECT_ID => ParsedDescriptorSpecifier {
            specifier: Some(DescriptorSpecifier::SubunitEntryByObjectId),
            consumed_size: expected_size(buffer[0], sizes),
        },
        DescriptorSpecifier::TYPE_SUBUNIT_ENTRY_BY_OBJECT_ID_IN_LIST_TYPE_ROOT => {
            ParsedDescriptorSpecifier {
                specifier: Some(DescriptorSpecifier::SubunitEntryByObjectIdInListTypeRoot),
                consumed_size: expected_size(buffer[0], sizes),
            }
        }
        _ => unknown,
    }
}

/// Fixed size in bytes of a specifier of the given leading-byte type, given
/// the dynamic sizes. Returns 0 for the subunit-scoped types, whose layout
/// depends on subunit-specific content this codec does not model.
pub fn expected_size(leading_byte: u8, sizes: &DescriptorSizes) -> usize {
    match leading_byte {
        DescriptorSpecifier::TYPE_UNIT_OR_SUBUNIT => 1,
        DescriptorSpecifier::TYPE_LIST_BY_ID => 1 + sizes.effective_list_id(),
        DescriptorSpecifier::TYPE_LIST_BY_TYPE => 2,
        DescriptorSpecifier::TYPE_ENTRY_BY_POSITION => {
            1 + sizes.effective_list_id() + sizes.effective_entry_position()
        }
        DescriptorSpecifier::TYPE_ENTRY_BY_OBJECT_ID_IN_LIST_TYPE_ROOT => {
            1 + sizes.effective_list_id() + 1 + sizes.effective_object_id()
        }
        DescriptorSpecifier::TYPE_ENTRY_BY_TYPE_CREATE => 2,
        DescriptorSpecifier::TYPE_ENTRY_BY_OBJECT_ID_GENERAL => 1 + sizes.effective_object_id(),
        _ => 0,
    }
}

fn write_multi_byte(buf: &mut Vec<u8>, val: u64, num_bytes: usize) {
    for i in (0..num_bytes).rev() {
        buf.push(((val >> (i * 8)) & 0xff) as u8);
    }
}

fn read_multi_byte(buf: &[u8], num_bytes: usize) -> u64 {
    let mut val = 0u64;
    for i in 0..num_bytes {
        val = (val << 8) | buf[i] as u64;
    }
    val
}

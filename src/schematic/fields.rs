//! Fixed field-name and marker tables.

/// Fields that generic clean-up never deletes.
pub const SPECIAL_FIELDS: &[&str] = &["Reference", "Value", "Footprint", "Datasheet", "Part Number"];

/// Fields a database update may only fill while they are empty.
pub const READ_ONLY_FIELDS: &[&str] = &["Reference", "Value", "Footprint", "Part Number"];

/// Reference substrings marking power/flag symbols.
pub const SPECIAL_REFERENCES: &[&str] = &["#PWR", "#FLG", "#GND", "#SYM"];

/// Value substrings marking non-physical or non-BOM symbols.
pub const SPECIAL_VALUES: &[&str] = &[
    "MountingHole",
    "TestPoint",
    "TEST_PAD",
    "SolderJumper",
    "Logo",
    "Fiducial",
];

/// Prefix of KiCad's own system fields (`ki_keywords`, `ki_fp_filters`, ...).
pub const RESERVED_PREFIX: &str = "ki_";

pub const REFERENCE: &str = "Reference";
pub const VALUE: &str = "Value";

pub fn is_special_field(name: &str) -> bool {
    SPECIAL_FIELDS.contains(&name)
}

pub fn is_read_only_field(name: &str) -> bool {
    READ_ONLY_FIELDS.contains(&name)
}

pub fn is_reserved_field(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// Whether `text` contains any of `markers`.
pub(crate) fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| text.contains(marker))
}

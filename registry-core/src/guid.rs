//! GUID generation and validation.
//!
//! A GUID is a 36-character lowercase hexadecimal string with dashes at
//! positions 8, 13, 18 and 23 — the canonical hyphenated UUID rendering,
//! restricted to lowercase. Anything else is invalid.

use uuid::Uuid;

const LEN: usize = 36;
const DASH_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Generate a fresh, random GUID.
pub fn generate() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Validate that `s` is a syntactically well-formed GUID: 36 characters,
/// lowercase hex digits, dashes at exactly positions 8/13/18/23.
pub fn is_valid(s: &str) -> bool {
    if s.len() != LEN {
        return false;
    }

    for (i, c) in s.char_indices() {
        if DASH_POSITIONS.contains(&i) {
            if c != '-' {
                return false;
            }
        } else if !c.is_ascii_hexdigit() || c.is_ascii_uppercase() {
            return false;
        }
    }

    true
}

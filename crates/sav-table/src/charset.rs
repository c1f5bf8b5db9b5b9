//! Printable-character check for names, labels and category values.

use std::ops::RangeInclusive;

use crate::error::InvalidCharacterError;

/// Sentinel for "no character".
const UNDEFINED_CHAR: char = '\u{FFFF}';

/// The Unicode Specials block.
const SPECIALS: RangeInclusive<char> = '\u{FFF0}'..='\u{FFFF}';

/// Code point ranges that belong to no Unicode block (Unicode 15.0). Gaps inside
/// the Supplementary Multilingual Plane are not listed.
const OUTSIDE_BLOCKS: [RangeInclusive<char>; 5] = [
    '\u{2FE0}'..='\u{2FEF}',
    '\u{2FA20}'..='\u{2FFFF}',
    '\u{323B0}'..='\u{DFFFF}',
    '\u{E0080}'..='\u{E00FF}',
    '\u{E01F0}'..='\u{EFFFF}',
];

/// Fails when `text` contains a control character, the undefined sentinel, a
/// character of the Specials block or a code point outside every Unicode block.
/// Absent and empty text is valid.
pub fn validate(text: Option<&str>) -> Result<(), InvalidCharacterError> {
    let Some(text) = text else {
        return Ok(());
    };
    if text.chars().all(is_printable) {
        Ok(())
    } else {
        Err(InvalidCharacterError {
            value: text.to_string(),
        })
    }
}

/// Shorthand for validating text that is always present.
pub fn validate_str(text: &str) -> Result<(), InvalidCharacterError> {
    validate(Some(text))
}

fn is_printable(ch: char) -> bool {
    !ch.is_control()
        && ch != UNDEFINED_CHAR
        && !SPECIALS.contains(&ch)
        && !OUTSIDE_BLOCKS.iter().any(|range| range.contains(&ch))
}

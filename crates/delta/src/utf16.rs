//! UTF-16 code-unit helpers
//!
//! Insert lengths, diff spans, and iterator slice offsets are all measured in
//! UTF-16 code units rather than Unicode scalar values, matching the
//! convention of the character-diff collaborator (see [`crate::diff`]). A
//! string outside the BMP therefore counts as two units, same as its
//! surrogate pair.

/// Counts the UTF-16 code units a string would occupy.
pub fn len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Extracts the `[offset, offset + length)` code-unit slice of `s`.
///
/// Splitting a surrogate pair across a boundary would indicate a caller
/// computed offsets inconsistently; rather than panic, the half pair is
/// replaced with the Unicode replacement character.
pub fn slice(s: &str, offset: usize, length: usize) -> String {
    let units: Vec<u16> = s.encode_utf16().collect();
    let end = (offset + length).min(units.len());
    let start = offset.min(end);
    String::from_utf16_lossy(&units[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_counts_code_units_not_scalars() {
        assert_eq!(len("abc"), 3);
        // U+1F600 (grinning face) is one scalar value but a surrogate pair.
        assert_eq!(len("\u{1F600}"), 2);
    }

    #[test]
    fn slice_extracts_code_unit_range() {
        assert_eq!(slice("Hello World", 0, 5), "Hello");
        assert_eq!(slice("Hello World", 6, 5), "World");
    }
}

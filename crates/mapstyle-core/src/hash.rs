//! The djb2 string hash used to key feature colours.

const DJB2_SEED: i32 = 5381;

/// Classic djb2 (`hash * 33 + c`) over the UTF-16 code units of `s`.
///
/// Arithmetic wraps at 32 bits (two's complement), so the result matches fixed-width signed
/// integer hashing of the same code units. Characters outside the BMP contribute both halves of
/// their surrogate pair.
pub fn djb2(s: &str) -> i32 {
    s.encode_utf16().fold(DJB2_SEED, |acc, unit| {
        acc.wrapping_shl(5)
            .wrapping_add(acc)
            .wrapping_add(i32::from(unit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_keeps_seed() {
        assert_eq!(djb2(""), 5381);
    }

    #[test]
    fn single_ascii_char() {
        assert_eq!(djb2("A"), 5381 * 33 + 65);
        assert_eq!(djb2("A"), 177_638);
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(djb2("ab"), djb2("ba"));
    }

    #[test]
    fn wraps_instead_of_overflowing() {
        let long = "Z".repeat(64);
        let expected = long
            .bytes()
            .fold(5381i64, |acc, c| (acc * 33 + i64::from(c)) & 0xFFFF_FFFF);
        assert_eq!(djb2(&long), expected as u32 as i32);
    }

    #[test]
    fn non_ascii_uses_utf16_units() {
        // U+00E9 is a single unit, U+1F600 is a surrogate pair.
        assert_eq!(djb2("é"), 5381 * 33 + 0xE9);
        let pair = [0xD83Du16, 0xDE00u16];
        let expected = pair.iter().fold(5381i32, |acc, &u| {
            acc.wrapping_mul(33).wrapping_add(i32::from(u))
        });
        assert_eq!(djb2("\u{1F600}"), expected);
    }
}

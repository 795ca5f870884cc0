//! Label wrapping for point titles.
//!
//! Widths and break positions are counted in UTF-16 code units, matching how browser map
//! libraries measure label strings. Breaks only ever happen at ASCII spaces or hyphens, so a
//! split never lands inside a surrogate pair.

const SPACE: u16 = b' ' as u16;
const HYPHEN: u16 = b'-' as u16;

/// Wraps `text` to lines of at most `width` units where possible.
///
/// Scans backward from index `width` for the nearest space or hyphen. A space is replaced by
/// `separator`; a hyphen stays at the end of the left line and `separator` follows it. The
/// remainder is wrapped the same way. When no break point exists before the limit the rest of the
/// text is kept intact, so long unbroken tokens overflow instead of being split mid-word.
pub fn string_divider(text: &str, width: usize, separator: &str) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut out = String::with_capacity(text.len());
    let mut rest: &[u16] = &units;

    while rest.len() > width {
        let mut p = width;
        while p > 0 && rest[p] != SPACE && rest[p] != HYPHEN {
            p -= 1;
        }
        if p == 0 {
            break;
        }

        let left = if rest[p] == HYPHEN {
            &rest[..=p]
        } else {
            &rest[..p]
        };
        out.push_str(&String::from_utf16_lossy(left));
        out.push_str(separator);
        rest = &rest[p + 1..];
    }

    out.push_str(&String::from_utf16_lossy(rest));
    out
}

/// [`string_divider`] for optional titles; an absent title stays absent.
pub fn wrap_label(text: Option<&str>, width: usize, separator: &str) -> Option<String> {
    text.map(|t| string_divider(t, width, separator))
}

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Hash-derived pair in `[-1, 1]`, stable across runs for the same id.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Characters `encodeURIComponent` leaves alone.
const FRAGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes an entity id the way `encodeURIComponent` does, prefixed with `#`.
pub fn encode_fragment(id: &str) -> String {
    format!("#{}", utf8_percent_encode(id, FRAGMENT))
}

/// Turns a `#fragment` back into an entity id.
///
/// Broken escapes are kept literally and invalid UTF-8 is replaced, so this
/// never fails. An empty result means "nothing selected".
pub fn decode_fragment(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    percent_decode_str(raw)
        .decode_utf8_lossy()
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn stable_pair_is_bounded_and_repeatable() {
        let first = stable_pair("college");
        let second = stable_pair("college");
        assert_eq!(first, second);
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
    }

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode_fragment("essay"), "#essay");
        assert_eq!(encode_fragment("my life"), "#my%20life");
        assert_eq!(encode_fragment("don't!"), "#don't!");
        assert_eq!(encode_fragment("a/b?c"), "#a%2Fb%3Fc");
        assert_eq!(encode_fragment("café"), "#caf%C3%A9");
    }

    #[test]
    fn decodes_encoded_ids() {
        for id in ["essay", "my life", "a/b?c", "café", "100%"] {
            assert_eq!(decode_fragment(&encode_fragment(id)), id);
        }
    }

    #[test]
    fn decode_trims_and_tolerates_broken_escapes() {
        assert_eq!(decode_fragment("#%20%20word%20"), "word");
        assert_eq!(decode_fragment("plain"), "plain");
        assert_eq!(decode_fragment("#50%"), "50%");
        assert_eq!(decode_fragment("#%zzok"), "%zzok");
        assert_eq!(decode_fragment("#"), "");
        assert_eq!(decode_fragment(""), "");
    }

    #[test]
    fn decode_replaces_invalid_utf8() {
        assert_eq!(decode_fragment("#ok%FF"), "ok\u{FFFD}");
        assert_eq!(decode_fragment("#%E2%9C%93"), "\u{2713}");
    }
}

//! Fixed-width text encoding for wavelet fingerprints.
//!
//! Fields are `%5u`-formatted 16-bit words separated by single spaces,
//! exactly one per fingerprint word.

use log::warn;

use crate::error::DecodeStatus;

pub(crate) fn encode(words: &[u16]) -> String {
    let mut out = String::with_capacity(words.len() * 6);
    for (index, word) in words.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{word:5}"));
    }
    out
}

/// Parse whitespace-separated unsigned fields into `out`, in order.
///
/// Unparseable fields decode as zero. Short input keeps the prefix and
/// reports an underrun instead of failing.
pub(crate) fn decode(text: &str, out: &mut [u16]) -> DecodeStatus {
    let mut filled = 0;
    for (slot, field) in out.iter_mut().zip(text.split_ascii_whitespace()) {
        *slot = field.parse().unwrap_or_default();
        filled += 1;
    }
    if filled < out.len() {
        warn!(
            "wavelet fingerprint text shorter than expected: {} of {} fields",
            filled,
            out.len()
        );
        DecodeStatus::Underrun { filled }
    } else {
        DecodeStatus::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uses_five_char_fields() {
        let text = encode(&[969, 22401, 7]);
        assert_eq!(text, "  969 22401     7");
    }

    #[test]
    fn decode_round_trips_encode() {
        let words = [0u16, 65535, 1, 40089];
        let mut out = [0u16; 4];
        let status = decode(&encode(&words), &mut out);
        assert!(status.is_complete());
        assert_eq!(out, words);
    }

    #[test]
    fn decode_reports_underrun_and_keeps_prefix() {
        let mut out = [7u16; 4];
        let status = decode("  969 22401", &mut out);
        assert_eq!(status, DecodeStatus::Underrun { filled: 2 });
        assert_eq!(out, [969, 22401, 7, 7]);
    }
}

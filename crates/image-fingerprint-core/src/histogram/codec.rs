//! Fixed-width text encoding for histogram fingerprints.
//!
//! Fields are `%9.7f`-formatted floats separated by single spaces, exactly
//! one per histogram bin.

use log::warn;

use crate::error::DecodeStatus;

pub(crate) fn encode(values: &[f32]) -> String {
    let mut out = String::with_capacity(values.len() * 10);
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{value:9.7}"));
    }
    out
}

/// Parse whitespace-separated float fields into `out`, in order.
///
/// Unparseable fields decode as zero. Short input keeps the prefix and
/// reports an underrun instead of failing.
pub(crate) fn decode(text: &str, out: &mut [f32]) -> DecodeStatus {
    let mut filled = 0;
    for (slot, field) in out.iter_mut().zip(text.split_ascii_whitespace()) {
        *slot = field.parse().unwrap_or_default();
        filled += 1;
    }
    if filled < out.len() {
        warn!(
            "histogram fingerprint text shorter than expected: {} of {} fields",
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
    fn encode_uses_nine_char_fields() {
        let text = encode(&[0.5, 0.0078125]);
        assert_eq!(text, "0.5000000 0.0078125");
        for field in text.split(' ') {
            assert_eq!(field.len(), 9);
        }
    }

    #[test]
    fn decode_handles_irregular_leading_whitespace() {
        let mut out = [0.0f32; 2];
        let status = decode("   0.2500000 0.7500000", &mut out);
        assert!(status.is_complete());
        assert_eq!(out, [0.25, 0.75]);
    }

    #[test]
    fn decode_reports_underrun_and_keeps_prefix() {
        let mut out = [9.0f32; 4];
        let status = decode("0.1250000 0.8750000", &mut out);
        assert_eq!(status, DecodeStatus::Underrun { filled: 2 });
        assert_eq!(out[0], 0.125);
        assert_eq!(out[1], 0.875);
        assert_eq!(out[2], 9.0);
    }

    #[test]
    fn decode_ignores_extra_fields() {
        let mut out = [0.0f32; 2];
        let status = decode("0.1 0.2 0.3 0.4", &mut out);
        assert!(status.is_complete());
        assert_eq!(out, [0.1, 0.2]);
    }
}

//! Value encoding and decoding
//!
//! Translates between raw hex tokens and readable values for one command.
//!
//! | Command   | decode                          | encode                             |
//! |-----------|---------------------------------|------------------------------------|
//! | slider    | hex → level clamped to 0-100    | decimal → clamped level as hex     |
//! | read-only | table lookup                    | always the status token            |
//! | other     | table lookup                    | inverse table lookup               |
//!
//! On sliders the status token `FF` / name `status` bypasses the numeric
//! path in both directions. Clamping saturates and is never an error.

use crate::command::{
    CommandDefinition, Keycode, Value, SLIDER_MAX, SLIDER_MIN, STATUS_NAME, STATUS_TOKEN,
};
use crate::error::{DecodeError, EncodeError};

/// What to do when a read-only command is asked to encode a non-status value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadOnlyPolicy {
    /// Substitute the status token and report `Keycode::ReadOnlyOverride`
    #[default]
    Override,
    /// Fail with `EncodeError::ReadOnly`
    Reject,
}

impl CommandDefinition {
    /// Translate a raw token into a readable value
    ///
    /// Tokens are matched case-insensitively.
    pub fn decode(&self, raw_token: &str) -> Result<Value, DecodeError> {
        if self.is_slider && !raw_token.eq_ignore_ascii_case(STATUS_TOKEN) {
            return parse_level(raw_token, 16)
                .map(Value::Level)
                .ok_or(DecodeError::InvalidHex);
        }

        // Table tokens are uppercase
        self.values
            .iter()
            .find(|(token, _)| token.eq_ignore_ascii_case(raw_token))
            .map(|&(_, name)| Value::Named(name))
            .ok_or(DecodeError::UnknownToken)
    }

    /// Translate a readable value into a raw token
    ///
    /// Read-only commands answer any request with the status token; see
    /// [`CommandDefinition::encode_with`] to reject such requests instead.
    pub fn encode(&self, value: &str) -> Result<Keycode, EncodeError> {
        self.encode_with(value, ReadOnlyPolicy::Override)
    }

    /// Translate a readable value into a raw token under a read-only policy
    ///
    /// `status` is matched ignoring ASCII case like every other name, so
    /// `STATUS` on a slider yields `FF` rather than a number parse error.
    pub fn encode_with(
        &self,
        value: &str,
        policy: ReadOnlyPolicy,
    ) -> Result<Keycode, EncodeError> {
        let is_status = value.eq_ignore_ascii_case(STATUS_NAME);

        if self.is_slider && !is_status {
            return parse_level(value, 10)
                .map(Keycode::Level)
                .ok_or(EncodeError::InvalidNumber);
        }

        if self.read_only {
            return match (is_status, policy) {
                (true, _) => Ok(Keycode::Token(STATUS_TOKEN)),
                (false, ReadOnlyPolicy::Override) => Ok(Keycode::ReadOnlyOverride),
                (false, ReadOnlyPolicy::Reject) => Err(EncodeError::ReadOnly),
            };
        }

        // Table names are lowercase
        self.inverse
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|(_, &token)| Keycode::Token(token))
            .ok_or(EncodeError::UnknownName)
    }
}

/// Parse a signed integer in `radix` and clamp it to the slider range
///
/// Accepts surrounding whitespace, a leading sign, single `_` separators
/// between digits and, for hex, a `0x` prefix. Magnitudes too large to
/// represent saturate like any other out-of-range value.
pub(crate) fn parse_level(text: &str, radix: u32) -> Option<u8> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let digits = if radix == 16 {
        digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits)
    } else {
        digits
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return None;
    }

    let mut magnitude: u64 = 0;
    let mut after_separator = false;
    for c in digits.chars() {
        if c == '_' {
            if after_separator {
                return None;
            }
            after_separator = true;
            continue;
        }
        after_separator = false;
        let digit = c.to_digit(radix)?;
        magnitude = magnitude
            .saturating_mul(radix as u64)
            .saturating_add(digit as u64);
    }

    if negative {
        Some(SLIDER_MIN)
    } else {
        Some(magnitude.min(SLIDER_MAX as u64) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandSpec;
    use proptest::prelude::*;

    static SWITCH: &[(&str, &str)] = &[("00", "off"), ("01", "on"), ("FF", "status")];
    static LEVEL: &[(&str, &str)] = &[("FF", "status")];
    static ABNORMAL: &[(&str, &str)] = &[
        ("00", "normal"),
        ("01", "no_signal"),
        ("0A", "monitor_off_by_av_board"),
        ("FF", "status"),
    ];

    fn command(
        values: &'static [(&'static str, &'static str)],
        is_slider: bool,
        read_only: bool,
    ) -> CommandDefinition {
        CommandDefinition::new(CommandSpec {
            raw_id: "zz",
            long_name: "test_command",
            values,
            is_slider,
            read_only,
        })
        .unwrap()
    }

    fn encoded(def: &CommandDefinition, value: &str) -> std::string::String {
        def.encode(value).unwrap().to_string()
    }

    #[test]
    fn test_decode_table() {
        let def = command(SWITCH, false, false);
        assert_eq!(def.decode("01"), Ok(Value::Named("on")));
        assert_eq!(def.decode("ff"), Ok(Value::Named("status")));
        assert_eq!(def.decode("02"), Err(DecodeError::UnknownToken));
        assert_eq!(def.decode(""), Err(DecodeError::UnknownToken));
    }

    #[test]
    fn test_encode_table() {
        let def = command(SWITCH, false, false);
        assert_eq!(def.encode("on"), Ok(Keycode::Token("01")));
        assert_eq!(def.encode("OFF"), Ok(Keycode::Token("00")));
        assert_eq!(def.encode("status"), Ok(Keycode::Token("FF")));
        assert_eq!(def.encode("dim"), Err(EncodeError::UnknownName));
    }

    #[test]
    fn test_slider_decode() {
        let def = command(LEVEL, true, false);
        assert_eq!(def.decode("00"), Ok(Value::Level(0)));
        assert_eq!(def.decode("32"), Ok(Value::Level(50)));
        assert_eq!(def.decode("64"), Ok(Value::Level(100)));
        assert_eq!(def.decode("7F"), Ok(Value::Level(100)));
        assert_eq!(def.decode("a"), Ok(Value::Level(10)));
        assert_eq!(def.decode("FF"), Ok(Value::Named("status")));
        assert_eq!(def.decode("ff"), Ok(Value::Named("status")));
        assert_eq!(def.decode("zz"), Err(DecodeError::InvalidHex));
        assert_eq!(def.decode(""), Err(DecodeError::InvalidHex));
    }

    #[test]
    fn test_slider_encode() {
        let def = command(LEVEL, true, false);
        assert_eq!(encoded(&def, "-5"), "0");
        assert_eq!(encoded(&def, "5"), "5");
        assert_eq!(encoded(&def, "50"), "32");
        assert_eq!(encoded(&def, "100"), "64");
        assert_eq!(encoded(&def, "150"), "64");
        assert_eq!(encoded(&def, " 10 "), "a");
        assert_eq!(def.encode("status"), Ok(Keycode::Token("FF")));
        assert_eq!(def.encode("loud"), Err(EncodeError::InvalidNumber));
        assert_eq!(def.encode("1.5"), Err(EncodeError::InvalidNumber));
    }

    #[test]
    fn test_slider_saturates_huge_values() {
        let def = command(LEVEL, true, false);
        assert_eq!(def.encode("99999999999999999999999"), Ok(Keycode::Level(100)));
        assert_eq!(def.encode("-99999999999999999999999"), Ok(Keycode::Level(0)));
        assert_eq!(def.decode("FFFFFFFFFFFFFFFFFFFFFFFF"), Ok(Value::Level(100)));
    }

    #[test]
    fn test_read_only_encode_override() {
        let def = command(ABNORMAL, false, true);
        assert_eq!(def.encode("status"), Ok(Keycode::Token("FF")));
        assert_eq!(def.encode("no_signal"), Ok(Keycode::ReadOnlyOverride));
        assert_eq!(def.encode("anything"), Ok(Keycode::ReadOnlyOverride));
        assert_eq!(encoded(&def, "normal"), "FF");
    }

    #[test]
    fn test_read_only_encode_reject() {
        let def = command(ABNORMAL, false, true);
        assert_eq!(
            def.encode_with("status", ReadOnlyPolicy::Reject),
            Ok(Keycode::Token("FF"))
        );
        assert_eq!(
            def.encode_with("normal", ReadOnlyPolicy::Reject),
            Err(EncodeError::ReadOnly)
        );
    }

    #[test]
    fn test_read_only_decode() {
        let def = command(ABNORMAL, false, true);
        assert_eq!(def.decode("0a"), Ok(Value::Named("monitor_off_by_av_board")));
        assert_eq!(def.decode("0B"), Err(DecodeError::UnknownToken));
    }

    #[test]
    fn test_parse_level_forms() {
        assert_eq!(parse_level("0x20", 16), Some(32));
        assert_eq!(parse_level("0X20", 16), Some(32));
        assert_eq!(parse_level("+7", 10), Some(7));
        assert_eq!(parse_level("-0", 10), Some(0));
        assert_eq!(parse_level("--7", 10), None);
        assert_eq!(parse_level("-+7", 10), None);
        assert_eq!(parse_level("0x", 16), None);
        assert_eq!(parse_level("0x20", 10), None);
    }

    #[test]
    fn test_parse_level_separators() {
        assert_eq!(parse_level("1_0", 10), Some(10));
        assert_eq!(parse_level("-1_0", 10), Some(0));
        assert_eq!(parse_level("2_0", 16), Some(32));
        assert_eq!(parse_level("0x2_0", 16), Some(32));
        assert_eq!(parse_level("1__0", 10), None);
        assert_eq!(parse_level("_10", 10), None);
        assert_eq!(parse_level("10_", 10), None);
        assert_eq!(parse_level("_", 10), None);

        let def = command(LEVEL, true, false);
        assert_eq!(def.encode("5_0"), Ok(Keycode::Level(50)));
        assert_eq!(def.decode("3_2"), Ok(Value::Level(50)));
    }

    #[test]
    fn test_slider_status_ignores_case() {
        let def = command(LEVEL, true, false);
        assert_eq!(def.encode("STATUS"), Ok(Keycode::Token("FF")));
        assert_eq!(def.encode("Status"), Ok(Keycode::Token("FF")));
    }

    proptest! {
        #[test]
        fn prop_slider_encode_in_range(n in any::<i64>()) {
            let def = command(LEVEL, true, false);
            let keycode = def.encode(&n.to_string()).unwrap();
            let level = def.decode(keycode.to_token().unwrap().as_str()).unwrap();
            let expected = n.clamp(SLIDER_MIN as i64, SLIDER_MAX as i64) as u8;
            prop_assert_eq!(level, Value::Level(expected));
        }

        #[test]
        fn prop_slider_decode_any_token(byte in any::<u8>()) {
            let def = command(LEVEL, true, false);
            let token = std::format!("{:02X}", byte);
            let value = def.decode(&token).unwrap();
            if byte == 0xFF {
                prop_assert!(value.is_status());
            } else {
                prop_assert_eq!(value, Value::Level(byte.min(SLIDER_MAX)));
            }
        }

        #[test]
        fn prop_read_only_always_status(value in "\\PC*") {
            let def = command(ABNORMAL, false, true);
            let keycode = def.encode(&value).unwrap();
            prop_assert!(keycode.is_status());
        }
    }
}

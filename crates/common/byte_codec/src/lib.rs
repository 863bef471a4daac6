//! Decode tagged bytes into typed values.
//!
//! Each byte carries a 2-bit kind in bits 7-6 and a 6-bit payload in bits 5-0:
//!
//! | kind | payload | value                          |
//! |------|---------|--------------------------------|
//! | `00` | 0-63    | unsigned integer               |
//! | `01` | 0-63    | signed integer                 |
//! | `10` | 0-63    | letter, `'a' + payload`        |
//! | `11` | ignored | reserved, nothing is produced  |

mod error;
mod value;

pub use crate::error::EncodeError;
pub use crate::value::DecodedValue;
pub use crate::value::Kind;

const KIND_SHIFT: u32 = 6;
const PAYLOAD_MASK: u8 = 0b0011_1111;

/// The largest payload a single byte can carry.
pub const MAX_PAYLOAD: u8 = PAYLOAD_MASK;

/// Extract the 6-bit payload of an encoded byte.
pub fn payload(byte: u8) -> u8 {
    byte & PAYLOAD_MASK
}

/// Decode one byte.
///
/// Returns `None` for a reserved byte: the caller must skip it and emit nothing.
pub fn decode(byte: u8) -> Option<DecodedValue> {
    let payload = payload(byte);
    match Kind::of(byte) {
        Kind::Unsigned => Some(DecodedValue::Unsigned(payload)),
        // The payload is zero-extended into 8 bits before the signed reinterpretation,
        // hence always in 0..=63.
        Kind::Signed => Some(DecodedValue::Signed(payload as i8)),
        Kind::Letter => Some(DecodedValue::Letter(letter(payload))),
        Kind::Reserved => None,
    }
}

/// Encode a value back into a tagged byte.
///
/// This is the inverse of [decode] for every value [decode] can produce.
pub fn encode(value: DecodedValue) -> Result<u8, EncodeError> {
    let payload = match value {
        DecodedValue::Unsigned(n) if n <= MAX_PAYLOAD => n,
        DecodedValue::Unsigned(n) => return Err(EncodeError::UnsignedOutOfRange { value: n }),
        DecodedValue::Signed(n) if (0..=MAX_PAYLOAD as i8).contains(&n) => n as u8,
        DecodedValue::Signed(n) => return Err(EncodeError::SignedOutOfRange { value: n }),
        DecodedValue::Letter(c) => {
            let offset = (c as u32).wrapping_sub('a' as u32);
            if offset > MAX_PAYLOAD as u32 {
                return Err(EncodeError::LetterOutOfRange { letter: c });
            }
            offset as u8
        }
    };

    Ok((value.kind().tag() << KIND_SHIFT) | payload)
}

// Payloads above 25 are not wrapped nor clamped: 'a' + 26 is '{', 'a' + 63 is U+00A0.
fn letter(payload: u8) -> char {
    char::from(b'a' + payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0b0000_0101, Some("5") ; "unsigned five")]
    #[test_case(0b0011_1111, Some("63") ; "largest unsigned")]
    #[test_case(0b0000_0000, Some("0") ; "unsigned zero")]
    #[test_case(0b0100_0111, Some("7") ; "signed seven")]
    #[test_case(0b0111_1111, Some("63") ; "largest signed")]
    #[test_case(0b1000_0000, Some("a") ; "first letter")]
    #[test_case(0b1000_0001, Some("b") ; "second letter")]
    #[test_case(0b1001_1001, Some("z") ; "last letter")]
    #[test_case(0b1001_1010, Some("{") ; "first letter past z")]
    #[test_case(0b1111_1111, None ; "reserved all ones")]
    #[test_case(0b1100_0000, None ; "reserved zero payload")]
    fn decoding_renders_canonical_text(byte: u8, expected: Option<&str>) {
        let rendered = decode(byte).map(|value| value.to_string());
        assert_eq!(rendered.as_deref(), expected);
    }

    #[test]
    fn signed_kind_is_typed_as_signed() {
        assert_eq!(decode(0b0100_0101), Some(DecodedValue::Signed(5)));
        assert_eq!(decode(0b0000_0101), Some(DecodedValue::Unsigned(5)));
    }

    #[test]
    fn letters_past_z_are_kept_as_is() {
        assert_eq!(decode(0b1011_1111), Some(DecodedValue::Letter('\u{a0}')));
    }

    #[test_case(DecodedValue::Unsigned(64) ; "unsigned too large")]
    #[test_case(DecodedValue::Signed(-1) ; "negative signed")]
    #[test_case(DecodedValue::Signed(64) ; "signed too large")]
    #[test_case(DecodedValue::Letter('A') ; "uppercase letter")]
    #[test_case(DecodedValue::Letter('\u{a1}') ; "letter past the payload range")]
    fn unrepresentable_values_are_rejected(value: DecodedValue) {
        assert!(encode(value).is_err());
    }

    #[test]
    fn encode_error_names_the_value() {
        let err = encode(DecodedValue::Signed(-3)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Signed value -3 cannot be encoded, expected 0..=63"
        );
    }

    proptest! {
        #[test]
        fn unsigned_bytes_render_their_payload(p in 0u8..=63) {
            prop_assert_eq!(decode(p).unwrap().to_string(), (p & 0x3F).to_string());
        }

        #[test]
        fn lowercase_letters_survive_encoding(p in 0u8..=25) {
            let byte = encode(DecodedValue::Letter(char::from(b'a' + p))).unwrap();
            prop_assert_eq!(Kind::of(byte), Kind::Letter);
            prop_assert_eq!(decode(byte).unwrap().to_string(), char::from(b'a' + p).to_string());
        }

        #[test]
        fn reserved_bytes_emit_nothing(p in 0u8..=63) {
            prop_assert_eq!(decode(0b1100_0000 | p), None);
        }

        #[test]
        fn decoded_bytes_encode_back(byte in 0u8..0b1100_0000) {
            prop_assert_eq!(encode(decode(byte).unwrap()), Ok(byte));
        }
    }
}

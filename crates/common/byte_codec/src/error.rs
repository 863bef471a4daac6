#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Unsigned value {value} cannot be encoded, expected 0..=63")]
    UnsignedOutOfRange { value: u8 },

    #[error("Signed value {value} cannot be encoded, expected 0..=63")]
    SignedOutOfRange { value: i8 },

    #[error("Letter {letter:?} cannot be encoded, expected 'a' followed by at most 63 code points")]
    LetterOutOfRange { letter: char },
}

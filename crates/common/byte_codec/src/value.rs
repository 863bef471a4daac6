use std::fmt;

/// The type tag held by the two most significant bits of an encoded byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Unsigned,
    Signed,
    Letter,
    Reserved,
}

impl Kind {
    pub fn of(byte: u8) -> Kind {
        match (byte >> 6) & 0b11 {
            0b00 => Kind::Unsigned,
            0b01 => Kind::Signed,
            0b10 => Kind::Letter,
            _ => Kind::Reserved,
        }
    }

    /// The 2-bit value of this tag.
    pub fn tag(self) -> u8 {
        match self {
            Kind::Unsigned => 0b00,
            Kind::Signed => 0b01,
            Kind::Letter => 0b10,
            Kind::Reserved => 0b11,
        }
    }
}

/// A value decoded from a single byte.
///
/// The [Display] implementation gives the canonical text form:
/// the decimal number for integers, a one-character string for letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodedValue {
    Unsigned(u8),
    Signed(i8),
    Letter(char),
}

impl DecodedValue {
    pub fn kind(&self) -> Kind {
        match self {
            DecodedValue::Unsigned(_) => Kind::Unsigned,
            DecodedValue::Signed(_) => Kind::Signed,
            DecodedValue::Letter(_) => Kind::Letter,
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Unsigned(n) => write!(f, "{n}"),
            DecodedValue::Signed(n) => write!(f, "{n}"),
            DecodedValue::Letter(c) => write!(f, "{c}"),
        }
    }
}

use crate::ParseError;

/// A byte whose leading bit is clear (0-127).
///
/// Every payload byte of a channel message is a data byte.
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// Checks for a leading 0 bit.
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte > 0x7F {
            return Err(ParseError::InvalidDataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Does not check the leading bit.
    pub const fn new_unchecked(byte: u8) -> Self {
        Self(byte)
    }

    /// The byte value
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = ParseError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

#[test]
fn leading_bit() {
    assert_eq!(DataByte::new(0x7F).unwrap().value(), 0x7F);
    assert_eq!(DataByte::new(0x80), Err(ParseError::InvalidDataByte(0x80)));
}

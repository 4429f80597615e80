/// A value which occupies exactly one byte (or one nibble, pre-shifted) of a
/// frame, with a fixed bidirectional table between variants and raw values.
pub trait OneByteEncodable: Sized {
    fn encoded_as_byte(&self) -> u8;
    fn decoded_from_byte(byte: u8) -> Option<Self>;
}

/// Implements [`OneByteEncodable`] for a fieldless enum from a single table,
/// so that encoding and decoding can never drift apart.
macro_rules! one_byte_encodable_enum {
    ( $enum:ident { $( $variant:ident = $byte:literal ),* $(,)? } ) => {
        impl $crate::protocol::encoding::OneByteEncodable for $enum {
            fn encoded_as_byte(&self) -> u8 {
                match self {
                    $( $enum::$variant => $byte, )*
                }
            }

            fn decoded_from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $( $byte => Some($enum::$variant), )*
                    _ => None,
                }
            }
        }
    }
}

/// Replaces the bits selected by `mask` in `byte` with the same bits of `value`.
pub fn merge_masked(byte: u8, mask: u8, value: u8) -> u8 {
    (byte & !mask) | (value & mask)
}

/// Sets or clears the bits selected by `mask`.
pub fn set_flag(byte: u8, mask: u8, on: bool) -> u8 {
    if on { byte | mask } else { byte & !mask }
}

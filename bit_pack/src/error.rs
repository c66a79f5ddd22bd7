use bytemuck::PodCastError;
#[cfg(feature = "std")]
use thiserror::Error;

#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitPackError {
    #[cfg_attr(
        feature = "std",
        error("bit width must be in the range 1..=32, got {0}")
    )]
    InvalidBitWidth(u32),

    #[cfg_attr(
        feature = "std",
        error("bit width {bit_width} does not fit in {element_bits}-bit elements")
    )]
    UnsupportedWidth { bit_width: u32, element_bits: u32 },

    #[cfg_attr(feature = "std", error("start bit must be below 16, got {0}"))]
    InvalidStartBit(u32),

    #[cfg_attr(
        feature = "std",
        error("value {value} at index {index} does not fit in {bit_width} bits")
    )]
    ValueOverflow {
        index: usize,
        value: u32,
        bit_width: u32,
    },

    #[cfg_attr(
        feature = "std",
        error("buffer holds {available} bytes, {needed} required")
    )]
    InsufficientBytes { needed: usize, available: usize },

    #[cfg_attr(
        feature = "std",
        error("cannot view raw bytes as {bits}-bit elements: {reason:?}")
    )]
    Cast { bits: u32, reason: PodCastError },
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for BitPackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BitPackError::InvalidBitWidth(w) => {
                write!(f, "bit width must be in the range 1..=32, got {}", w)
            }
            BitPackError::UnsupportedWidth {
                bit_width,
                element_bits,
            } => write!(
                f,
                "bit width {} does not fit in {}-bit elements",
                bit_width, element_bits
            ),
            BitPackError::InvalidStartBit(s) => write!(f, "start bit must be below 16, got {}", s),
            BitPackError::ValueOverflow {
                index,
                value,
                bit_width,
            } => write!(
                f,
                "value {} at index {} does not fit in {} bits",
                value, index, bit_width
            ),
            BitPackError::InsufficientBytes { needed, available } => {
                write!(f, "buffer holds {} bytes, {} required", available, needed)
            }
            BitPackError::Cast { bits, reason } => {
                write!(f, "cannot view raw bytes as {}-bit elements: {:?}", bits, reason)
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, BitPackError>;

use bit_pack::BitPackError;
#[cfg(feature = "std")]
use thiserror::Error;

#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[cfg_attr(
        feature = "std",
        error("Bit width N must be in the range 1..=32, got {0}")
    )]
    InvalidBitWidth(usize),

    #[cfg_attr(feature = "std", error("Value {0} does not fit in {1} bits"))]
    ValueOverflow(u32, usize),

    #[cfg_attr(feature = "std", error("Index {0} is out of bounds for length {1}"))]
    IndexOutOfBounds(usize, usize),

    #[cfg_attr(feature = "std", error("invalid magic bytes in stream header"))]
    InvalidMagic,

    #[cfg_attr(
        feature = "std",
        error("N mismatch: expected {expected}, found {found}")
    )]
    InvalidN { expected: usize, found: u32 },

    #[cfg_attr(feature = "std", error("invalid bit order tag {0}"))]
    InvalidOrder(u8),

    #[cfg_attr(feature = "std", error("buffer too small for header"))]
    StorageTooSmall,

    #[cfg_attr(
        feature = "std",
        error("payload holds {available} bytes, header promises {needed}")
    )]
    Truncated { needed: usize, available: usize },

    #[cfg_attr(feature = "std", error("packing error: {0}"))]
    Pack(#[cfg_attr(feature = "std", from)] BitPackError),
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for StreamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StreamError::InvalidBitWidth(n) => {
                write!(f, "Bit width N must be in the range 1..=32, got {}", n)
            }
            StreamError::ValueOverflow(v, n) => write!(f, "Value {} does not fit in {} bits", v, n),
            StreamError::IndexOutOfBounds(i, l) => {
                write!(f, "Index {} is out of bounds for length {}", i, l)
            }
            StreamError::InvalidMagic => write!(f, "invalid magic bytes in stream header"),
            StreamError::InvalidN { expected, found } => {
                write!(f, "N mismatch: expected {}, found {}", expected, found)
            }
            StreamError::InvalidOrder(tag) => write!(f, "invalid bit order tag {}", tag),
            StreamError::StorageTooSmall => write!(f, "buffer too small for header"),
            StreamError::Truncated { needed, available } => write!(
                f,
                "payload holds {} bytes, header promises {}",
                available, needed
            ),
            StreamError::Pack(e) => write!(f, "packing error: {}", e),
        }
    }
}

#[cfg(not(feature = "std"))]
impl From<BitPackError> for StreamError {
    fn from(err: BitPackError) -> Self {
        StreamError::Pack(err)
    }
}

pub type Result<T> = core::result::Result<T, StreamError>;

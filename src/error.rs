
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersemapError {
    #[error("Unknown reference: {0}")]
    UnknownReference(String),
    #[error("Empty reference")]
    EmptyReference,
    #[error("Cardinality mismatch: {left} spans {left_count} verses whilst {pivot} spans {pivot_count}")]
    CardinalityMismatch { left: String, left_count: u32, pivot: String, pivot_count: u32 },
    #[error("Offset entry without a usable basis")]
    OffsetWithoutBasis,
    #[error("Only single verse look-ups are supported: {0}")]
    UnsupportedMultiVerseLookup(String),
    #[error("Io error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, VersemapError>;

// Helper conversions
impl From<std::io::Error> for VersemapError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}

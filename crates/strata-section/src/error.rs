//! Error types for section loading and mutation.

use thiserror::Error;

use strata_version::VersionError;

use crate::light::LIGHT_BUFFER_LEN;

/// Errors raised by section construction and mutation.
///
/// All failures are synchronous and leave the section in its prior state;
/// none are transient, so callers should abort work on the offending section
/// rather than retry.
#[derive(Debug, Error)]
pub enum SectionError {
    /// The supplied data version stamp is not positive.
    #[error("invalid data version {0}, must be greater than 0")]
    InvalidDataVersion(i32),

    /// A light buffer of the wrong length was supplied.
    #[error("light buffer must be exactly {LIGHT_BUFFER_LEN} bytes, got {0}")]
    InvalidLightBuffer(usize),

    /// A raw block-state array of an illegal length was supplied: the length
    /// must be a multiple of 64 in `[256, 4096]`.
    #[error("block state array length {0} must be a multiple of 64 in [256, 4096]")]
    InvalidBlockStates(usize),

    /// A palette record in a loaded document is not a compound with a
    /// `Name` string.
    #[error("palette entry {index} is malformed")]
    MalformedPaletteEntry {
        /// Position of the offending record in the document's palette list.
        index: usize,
    },

    /// A version transition was refused by the boundary check.
    #[error(transparent)]
    Version(#[from] VersionError),
}

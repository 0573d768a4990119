use std::path::PathBuf;

use crate::board::CopperLayer;
use crate::net::NetId;

/// Errors returned by document construction, connection and saving.
///
/// Every fallible operation validates before it mutates, so a returned
/// error means the document is exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no placed instance with reference `{reference}`")]
    UnknownReference { reference: String },

    #[error("`{reference}` has no pin or pad numbered `{pin}`")]
    UnknownPin { reference: String, pin: String },

    #[error("reference `{reference}` is already placed in this document")]
    DuplicateReference { reference: String },

    #[error("component `{definition}` declares pin `{pin}` more than once")]
    DuplicatePin { definition: String, pin: String },

    #[error("board outline needs at least 3 distinct points, got {points}")]
    MalformedOutline { points: usize },

    #[error("net {0} is not registered on this board")]
    UnknownNet(NetId),

    #[error("copper layer count must be even and between 2 and 32, got {0}")]
    InvalidLayerCount(u8),

    #[error("layer {0} does not exist on this board")]
    UnknownLayer(CopperLayer),

    #[error("invalid {what}: {value}")]
    InvalidDimension { what: &'static str, value: f64 },

    #[error("invalid generator configuration: {0}")]
    Config(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject zero, negative and non-finite sizes.
pub(crate) fn ensure_positive(what: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidDimension { what, value })
    }
}

/// Reject NaN and infinite coordinates or angles.
pub(crate) fn ensure_finite(what: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidDimension { what, value })
    }
}

//! Reflector errors

use reflector_store::{MetadataKey, Target};
use thiserror::Error;

/// Result type for fallible reflector operations
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Errors raised while converting annotation values
///
/// Absence is never an error; lookups report it as `None`.
#[derive(Debug, Error)]
pub enum ReflectError {
    /// A decorator parameter could not be represented as an annotation value
    #[error("Cannot serialize value for metadata key '{key}': {source}")]
    Serialize {
        /// Key of the decorator being called
        key: MetadataKey,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// A stored value did not match the requested type
    #[error("Metadata '{key}' on {target:?} has an unexpected shape: {source}")]
    Deserialize {
        /// Key that was read
        key: MetadataKey,
        /// Target the value came from, if it came from a single target
        target: Option<Target>,
        /// Underlying serde error
        source: serde_json::Error,
    },
}

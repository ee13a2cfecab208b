//! Metadata Keys
//!
//! A [`MetadataKey`] names one kind of annotation. Keys are either supplied
//! by the caller (`"roles"`) or generated by a [`KeyGenerator`] when a
//! decorator is created without one.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use rand::Rng;

/// Length of generated keys
pub const DEFAULT_KEY_LENGTH: usize = 21;

/// URL-safe alphabet used for generated keys (64 symbols)
const KEY_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Opaque annotation key
///
/// Cloning is cheap; the string is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetadataKey(Arc<str>);

impl MetadataKey {
    /// Create a key from any string
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// Generate a fresh random key of [`DEFAULT_KEY_LENGTH`] characters
    pub fn generate() -> Self {
        KeyGenerator::default().generate()
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetadataKey({:?})", &*self.0)
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MetadataKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MetadataKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MetadataKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MetadataKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&String> for MetadataKey {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for MetadataKey {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for MetadataKey {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Random key generator
///
/// Keys are drawn uniformly from a 64-symbol alphabet, so the default
/// length gives 126 bits of entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGenerator {
    length: usize,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_KEY_LENGTH,
        }
    }
}

impl KeyGenerator {
    /// Create a generator producing keys of `length` characters
    pub fn with_length(length: usize) -> Self {
        Self { length }
    }

    /// Configured key length
    pub fn length(&self) -> usize {
        self.length
    }

    /// Produce a new key
    pub fn generate(&self) -> MetadataKey {
        let mut rng = rand::thread_rng();
        let key: String = (0..self.length)
            .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
            .collect();
        MetadataKey::from(key)
    }
}

//! Checksum computation utilities.
//!
//! This module provides the two integrity values carried by a DEX header.
//!
//! # Adler-32
//!
//! The DEX `checksum` field is an Adler-32 over everything after the field
//! itself, i.e. bytes `[12, end)`.
//!
//! # SHA-1
//!
//! The DEX `signature` field is a 20-byte SHA-1 over bytes `[32, end)`.
//!
//! # Example
//!
//! ```rust
//! use dexzip::checksum::{Adler32, Checksum, Sha1};
//!
//! // Incremental
//! let mut adler = Adler32::new();
//! adler.update(b"Wiki");
//! adler.update(b"pedia");
//! assert_eq!(adler.finalize(), 0x11E6_0398);
//!
//! // One-shot
//! let digest = Sha1::compute(b"abc");
//! assert_eq!(digest[0], 0xA9);
//! ```

/// Common trait for checksum computation.
pub trait Checksum: Default + Clone {
    /// The output type of this checksum.
    type Output: Copy + Eq + std::fmt::Debug;

    /// Creates a new checksum calculator.
    fn new() -> Self;

    /// Updates the checksum with additional data.
    fn update(&mut self, data: &[u8]);

    /// Finishes the checksum computation and returns the value.
    fn finalize(&self) -> Self::Output;

    /// Resets the checksum to its initial state.
    fn reset(&mut self);

    /// Computes the checksum of a single slice in one call.
    fn compute(data: &[u8]) -> Self::Output {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Adler-32 rolling checksum calculator.
///
/// Standard zlib Adler-32 (modulus 65521), as used by the DEX header.
///
/// ```rust
/// use dexzip::checksum::{Adler32, Checksum};
///
/// assert_eq!(Adler32::compute(b""), 1);
/// assert_eq!(Adler32::compute(b"Wikipedia"), 0x11E6_0398);
/// ```
#[derive(Clone)]
pub struct Adler32 {
    hasher: adler2::Adler32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Adler32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adler32")
            .field("current", &self.hasher.checksum())
            .finish()
    }
}

impl Checksum for Adler32 {
    type Output = u32;

    fn new() -> Self {
        Self {
            hasher: adler2::Adler32::new(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        self.hasher.write_slice(data);
    }

    fn finalize(&self) -> u32 {
        self.hasher.checksum()
    }

    fn reset(&mut self) {
        self.hasher = adler2::Adler32::new();
    }
}

/// Length of a SHA-1 digest in bytes.
pub const SHA1_LEN: usize = 20;

/// SHA-1 digest calculator.
#[derive(Clone, Default)]
pub struct Sha1 {
    hasher: sha1::Sha1,
}

impl std::fmt::Debug for Sha1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha1")
            .field("current", &to_hex(&self.finalize()))
            .finish()
    }
}

impl Checksum for Sha1 {
    type Output = [u8; SHA1_LEN];

    fn new() -> Self {
        Self {
            hasher: <sha1::Sha1 as sha1::Digest>::new(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        sha1::Digest::update(&mut self.hasher, data);
    }

    fn finalize(&self) -> [u8; SHA1_LEN] {
        let digest = sha1::Digest::finalize(self.hasher.clone());
        let mut out = [0u8; SHA1_LEN];
        out.copy_from_slice(&digest);
        out
    }

    fn reset(&mut self) {
        sha1::Digest::reset(&mut self.hasher);
    }
}

/// Formats bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}

//! Error types for DEX/ZIP merge operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes of the merge pipeline, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Errors
//! are deterministic: the pipeline is a pure function of its inputs, so
//! retrying with the same bytes always fails the same way.
//!
//! ```rust
//! use dexzip::{Error, ErrorCategory, merge_polyglot};
//!
//! let inner = vec![0u8; 0x70];
//! let outer = b"definitely not a zip".to_vec();
//!
//! match merge_polyglot(&inner, &outer) {
//!     Ok(merged) => println!("merged {} bytes", merged.len()),
//!     Err(e) if e.category() == ErrorCategory::Format => {
//!         eprintln!("outer archive is not a ZIP: {}", e);
//!     }
//!     Err(e) => eprintln!("merge failed: {}", e),
//! }
//! ```

use std::io;

/// Coarse classification of an [`Error`].
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | `Format` | [`MarkerNotFound`][Error::MarkerNotFound], [`NoEntryHeaders`][Error::NoEntryHeaders], [`CorruptDirectory`][Error::CorruptDirectory], [`NotDex`][Error::NotDex] | A required signature is absent |
/// | `Bounds` | [`OutOfBounds`][Error::OutOfBounds], [`OffsetOverflow`][Error::OffsetOverflow] | Fixed-offset field outside the buffer or 32-bit range |
/// | `Resource` | [`ResourceLimitExceeded`][Error::ResourceLimitExceeded] | Input larger than the configured limits |
/// | `Io` | [`Io`][Error::Io] | File system operations in the glue layer |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// A required signature or structure is missing.
    Format,
    /// A field read or write would leave the buffer or the 32-bit offset range.
    Bounds,
    /// A configured resource limit was exceeded.
    Resource,
    /// An I/O error outside the core transform.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format => write!(f, "format"),
            Self::Bounds => write!(f, "bounds"),
            Self::Resource => write!(f, "resource"),
            Self::Io => write!(f, "I/O"),
        }
    }
}

/// The main error type for merge operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading inputs or writing the output.
    ///
    /// The core transform never performs I/O; this variant is produced by
    /// [`merge_files`](crate::merge_files) and the CLI.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required signature was not found in the buffer.
    ///
    /// Returned when the outer archive has no end-of-central-directory
    /// record, which usually means it is not a ZIP file at all.
    #[error("{what} signature not found")]
    MarkerNotFound {
        /// Name of the structure whose signature is missing.
        what: &'static str,
    },

    /// The central directory is non-empty but holds no file headers.
    #[error("no central directory file headers between {start:#x} and {end:#x}")]
    NoEntryHeaders {
        /// Directory start offset.
        start: usize,
        /// Directory end offset.
        end: usize,
    },

    /// The directory start recorded in the end record lies past the end record.
    #[error("central directory start {start:#x} lies beyond its end record at {end:#x}")]
    CorruptDirectory {
        /// Directory start offset decoded from the end record.
        start: usize,
        /// Offset of the end record.
        end: usize,
    },

    /// The inner blob does not carry a DEX magic and DEX input was required.
    #[error("inner blob is not a DEX image")]
    NotDex,

    /// A fixed-width field would extend past the end of the buffer.
    #[error("{field} at {offset:#x} (+{width}) is outside a buffer of {len} bytes")]
    OutOfBounds {
        /// Name of the field being accessed.
        field: &'static str,
        /// Offset of the field.
        offset: usize,
        /// Width of the field in bytes.
        width: usize,
        /// Length of the buffer.
        len: usize,
    },

    /// A shifted offset or a length does not fit in 32 bits.
    #[error("{field} {value:#x} + {delta:#x} exceeds the 32-bit offset range")]
    OffsetOverflow {
        /// Name of the field being shifted.
        field: &'static str,
        /// Value before the shift.
        value: u64,
        /// Amount added.
        delta: u64,
    },

    /// An input exceeds the configured [`MergeLimits`](crate::MergeLimits).
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),
}

impl Error {
    /// Returns the coarse category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Io,
            Error::MarkerNotFound { .. }
            | Error::NoEntryHeaders { .. }
            | Error::CorruptDirectory { .. }
            | Error::NotDex => ErrorCategory::Format,
            Error::OutOfBounds { .. } | Error::OffsetOverflow { .. } => ErrorCategory::Bounds,
            Error::ResourceLimitExceeded(_) => ErrorCategory::Resource,
        }
    }

    /// Returns `true` if a required signature or structure was missing.
    pub fn is_format_error(&self) -> bool {
        self.category() == ErrorCategory::Format
    }

    /// Returns `true` if a field access left the buffer or the 32-bit range.
    pub fn is_bounds_error(&self) -> bool {
        self.category() == ErrorCategory::Bounds
    }

    /// Creates an [`Error::OutOfBounds`] for a field.
    pub fn out_of_bounds(field: &'static str, offset: usize, width: usize, len: usize) -> Self {
        Error::OutOfBounds {
            field,
            offset,
            width,
            len,
        }
    }

    /// Creates an [`Error::OffsetOverflow`] for a field.
    pub fn offset_overflow(field: &'static str, value: u64, delta: u64) -> Self {
        Error::OffsetOverflow {
            field,
            value,
            delta,
        }
    }
}

/// A specialized Result type for merge operations.
pub type Result<T> = std::result::Result<T, Error>;

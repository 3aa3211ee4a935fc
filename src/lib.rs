//! # dexzip
//!
//! A pure-Rust library for building DEX/ZIP polyglot files.
//!
//! A polyglot produced by this crate is a DEX image followed by a ZIP-family
//! archive (ZIP, JAR, APK). Both halves stay valid: ZIP readers find the
//! central directory through offsets shifted by the DEX length, and DEX
//! readers see a header whose length, SHA-1 signature and Adler-32 checksum
//! describe the whole merged file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dexzip::{Result, merge_files};
//!
//! fn main() -> Result<()> {
//!     let report = merge_files("classes.dex", "app.apk", "merged.apk")?;
//!     println!(
//!         "merged {} bytes, {} entries shifted by {}",
//!         report.total_size, report.patch.entries_patched, report.patch.delta
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### In Memory
//!
//! ```rust,ignore
//! use dexzip::{MergeBuilder, MergeLimits};
//! use dexzip::progress::LogObserver;
//!
//! let merged = MergeBuilder::new()
//!     .limits(MergeLimits::new().max_inner_size(64 << 20))
//!     .require_dex(true)
//!     .observer(LogObserver)
//!     .build(&dex, &apk)?;
//!
//! assert_eq!(merged.data.len() as u64, merged.report.total_size);
//! ```
//!
//! ### Verifying
//!
//! ```rust,ignore
//! use dexzip::verify_merged;
//!
//! let verification = verify_merged(&merged, dex.len())?;
//! assert!(verification.is_ok());
//! ```
//!
//! ## Pipeline
//!
//! 1. Locate the end of central directory record and the directory start.
//! 2. Shift the directory start and every local header offset by the
//!    inner length.
//! 3. Concatenate inner and outer.
//! 4. Write the merged length into the DEX `file_size` field.
//! 5. Write the SHA-1 signature, then the Adler-32 checksum over it.
//!
//! The core transform is a pure function of its inputs and performs no I/O.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. Malformed input is always reported
//! as an [`Error`], never as a panic:
//!
//! ```rust
//! use dexzip::{Error, merge_polyglot};
//!
//! let err = merge_polyglot(&[0u8; 0x70], b"not an archive").unwrap_err();
//! assert!(matches!(err, Error::MarkerNotFound { .. }));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod checksum;
pub mod dex;
pub mod error;
pub mod format;
pub mod merge;
pub mod progress;
pub mod zip;

pub use error::{Error, ErrorCategory, Result};

// Re-export merge API at crate root for convenience
pub use merge::{
    MergeBuilder, MergeLimits, MergeOptions, MergeReport, MergedArtifact, Verification, merge,
    merge_files, merge_polyglot, verify_merged,
};

// Re-export the two containers
pub use dex::{DexHeader, InnerFormat};
pub use zip::{ContainerIndex, EntryRecord, OuterArchive, PatchReport};

// Re-export progress API
pub use progress::{
    Checkpoint, ClosureObserver, LogObserver, MergeObserver, NoProgress, RecordingObserver,
    observer_fn,
};

//! DEX/ZIP polyglot creation.
//!
//! This module combines an inner blob (normally a DEX image) with an outer
//! ZIP-family archive so the result is valid under both formats.
//!
//! # Example
//!
//! ```rust,ignore
//! use dexzip::merge::{MergeBuilder, MergeLimits, MergeOptions};
//! use dexzip::progress::LogObserver;
//!
//! let dex = std::fs::read("classes.dex")?;
//! let apk = std::fs::read("app.apk")?;
//!
//! let merged = MergeBuilder::new()
//!     .options(MergeOptions::new().require_dex(true))
//!     .observer(LogObserver)
//!     .build(&dex, &apk)?;
//!
//! println!("{} entries shifted by {} bytes",
//!     merged.report.patch.entries_patched, merged.report.patch.delta);
//! std::fs::write("merged.apk", &merged.data)?;
//! ```
//!
//! # Architecture
//!
//! ```text
//! +------------------+  0
//! |   Inner (DEX)    |  <- header length, signature and checksum rewritten
//! +------------------+  inner.len()
//! |   Outer (ZIP)    |  <- every absolute offset shifted by inner.len()
//! +------------------+
//! ```
//!
//! The pipeline works on an owned copy of the outer archive and only hands
//! back bytes once every step has succeeded, so a failure never yields a
//! partially patched output.

pub mod options;
pub mod verify;

pub use options::{MergeLimits, MergeOptions};
pub use verify::{Verification, verify_merged};

use std::path::Path;

use crate::checksum::{SHA1_LEN, to_hex};
use crate::dex::{InnerFormat, repair_checksums, repair_length};
use crate::format::fields;
use crate::progress::{MergeObserver, NoProgress};
use crate::zip::{ContainerIndex, OuterArchive, PatchReport};
use crate::{Error, Result};

/// Summary of a completed merge.
#[must_use = "merge report should be checked to verify the merge completed as expected"]
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Detected format of the inner blob.
    pub inner_format: InnerFormat,
    /// Size of the inner blob in bytes.
    pub inner_size: u64,
    /// Size of the outer archive in bytes.
    pub outer_size: u64,
    /// Size of the merged output in bytes.
    pub total_size: u64,
    /// Central directory anchors in the outer archive, before the merge.
    pub directory: ContainerIndex,
    /// Offset rewrite summary.
    pub patch: PatchReport,
    /// SHA-1 signature written into the header.
    pub signature: [u8; SHA1_LEN],
    /// Adler-32 checksum written into the header.
    pub checksum: u32,
}

impl MergeReport {
    /// Returns the signature as lowercase hex.
    pub fn signature_hex(&self) -> String {
        to_hex(&self.signature)
    }

    /// Returns the inner blob as a percentage of the merged size.
    pub fn inner_percent(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.inner_size as f64 / self.total_size as f64) * 100.0
        }
    }
}

/// A merged polyglot file and its report.
#[derive(Debug, Clone)]
pub struct MergedArtifact {
    /// The merged bytes.
    pub data: Vec<u8>,
    /// What the merge did.
    pub report: MergeReport,
}

/// Builder for DEX/ZIP merges.
#[derive(Debug, Default)]
pub struct MergeBuilder<O = NoProgress> {
    options: MergeOptions,
    observer: O,
}

impl MergeBuilder<NoProgress> {
    /// Creates a new merge builder with default options and no observer.
    pub fn new() -> Self {
        Self {
            options: MergeOptions::default(),
            observer: NoProgress,
        }
    }
}

impl<O: MergeObserver> MergeBuilder<O> {
    /// Sets the merge options.
    pub fn options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the resource limits.
    pub fn limits(mut self, limits: MergeLimits) -> Self {
        self.options.limits = limits;
        self
    }

    /// Sets whether the inner blob must carry a DEX magic.
    ///
    /// Default is false: a non-DEX blob is merged with a warning.
    pub fn require_dex(mut self, require: bool) -> Self {
        self.options.require_dex = require;
        self
    }

    /// Sets the observer notified at each pipeline checkpoint.
    pub fn observer<P: MergeObserver>(self, observer: P) -> MergeBuilder<P> {
        MergeBuilder {
            options: self.options,
            observer,
        }
    }

    /// Merges `inner` in front of `outer`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input exceeds the configured limits
    /// - The inner blob is not DEX and DEX input is required
    /// - The outer archive has no end record, or its directory is corrupt
    /// - A shifted offset or the merged length overflows 32 bits
    /// - The merged output is shorter than a DEX header's fixed fields
    pub fn build(mut self, inner: &[u8], outer: &[u8]) -> Result<MergedArtifact> {
        let limits = &self.options.limits;
        limits.check_inputs(inner.len(), outer.len())?;

        let inner_format = InnerFormat::detect(inner);
        if !inner_format.is_dex() {
            if self.options.require_dex {
                return Err(Error::NotDex);
            }
            let message = "inner blob has no DEX magic, merging it as an opaque prefix";
            log::warn!("{}", message);
            self.observer.on_warning(message);
        }

        let delta = fields::len_to_u32(inner.len(), "inner length")?;

        let mut archive = OuterArchive::new(outer.to_vec())?;
        let directory = archive.index();
        self.observer.on_directory_located(&directory);

        limits.check_entries(archive.entry_count())?;
        let patch = archive.shift(delta)?;
        self.observer.on_offsets_patched(&patch);

        let mut data = merge(inner, archive.as_bytes());

        let total_len = repair_length(&mut data)?;
        self.observer.on_length_repaired(total_len);

        let (signature, checksum) = repair_checksums(&mut data)?;
        self.observer.on_checksums_repaired(&signature, checksum);

        log::debug!(
            "merged {} + {} bytes, {} entries shifted",
            inner.len(),
            outer.len(),
            patch.entries_patched
        );

        let report = MergeReport {
            inner_format,
            inner_size: inner.len() as u64,
            outer_size: outer.len() as u64,
            total_size: data.len() as u64,
            directory,
            patch,
            signature,
            checksum,
        };

        Ok(MergedArtifact { data, report })
    }

    /// Reads both inputs from disk, merges them and writes the output.
    ///
    /// The output file is only created once the merge has succeeded.
    pub fn build_to_path(
        self,
        inner_path: impl AsRef<Path>,
        outer_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<MergeReport> {
        let inner = std::fs::read(inner_path).map_err(Error::Io)?;
        let outer = std::fs::read(outer_path).map_err(Error::Io)?;

        let merged = self.build(&inner, &outer)?;
        std::fs::write(output_path, &merged.data).map_err(Error::Io)?;

        Ok(merged.report)
    }
}

/// Concatenates `inner` and `outer` without touching either.
pub fn merge(inner: &[u8], outer: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(inner.len() + outer.len());
    data.extend_from_slice(inner);
    data.extend_from_slice(outer);
    data
}

/// Limits for the convenience functions: only the 32-bit size field.
fn format_limits() -> MergeLimits {
    MergeLimits::unlimited().max_total_size(u32::MAX as u64)
}

/// Merges `inner` in front of `outer`.
///
/// This is the whole pipeline: offsets shifted, length, signature and
/// checksum repaired. No size caps apply beyond the 32-bit length field;
/// use [`MergeBuilder`] with [`MergeLimits`] to bound untrusted input.
pub fn merge_polyglot(inner: &[u8], outer: &[u8]) -> Result<Vec<u8>> {
    MergeBuilder::new()
        .limits(format_limits())
        .build(inner, outer)
        .map(|merged| merged.data)
}

/// Merges two files and writes the result.
///
/// Like [`merge_polyglot`], only the 32-bit length field bounds the inputs.
pub fn merge_files(
    inner_path: impl AsRef<Path>,
    outer_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<MergeReport> {
    MergeBuilder::new()
        .limits(format_limits())
        .build_to_path(inner_path, outer_path, output_path)
}

//! Progress reporting for the merge pipeline.
//!
//! The pipeline reports four checkpoints, in order:
//!
//! 1. central directory located
//! 2. archive offsets patched
//! 3. DEX length repaired
//! 4. DEX signature and checksum repaired
//!
//! Warnings (for example, an inner blob without a DEX magic) are reported
//! through [`MergeObserver::on_warning`].
//!
//! # Example
//!
//! ```rust,ignore
//! use dexzip::progress::{Checkpoint, observer_fn};
//! use dexzip::MergeBuilder;
//!
//! let merged = MergeBuilder::new()
//!     .observer(observer_fn(|checkpoint: &Checkpoint| println!("{}", checkpoint)))
//!     .build(&dex, &apk)?;
//! ```

use crate::checksum::{SHA1_LEN, to_hex};
use crate::zip::{ContainerIndex, PatchReport};

/// Observer trait for merge checkpoints.
///
/// Every method has an empty default, so implementors only override the
/// checkpoints they care about.
pub trait MergeObserver {
    /// Called once the outer archive's central directory is located.
    fn on_directory_located(&mut self, index: &ContainerIndex) {
        let _ = index;
    }

    /// Called after every offset in the outer archive has been shifted.
    fn on_offsets_patched(&mut self, report: &PatchReport) {
        let _ = report;
    }

    /// Called after the merged length has been written.
    fn on_length_repaired(&mut self, total_len: u32) {
        let _ = total_len;
    }

    /// Called after the signature and checksum have been written.
    fn on_checksums_repaired(&mut self, signature: &[u8; SHA1_LEN], checksum: u32) {
        let _ = (signature, checksum);
    }

    /// Called on any warning during processing.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }
}

impl<T: MergeObserver + ?Sized> MergeObserver for &mut T {
    fn on_directory_located(&mut self, index: &ContainerIndex) {
        (**self).on_directory_located(index);
    }

    fn on_offsets_patched(&mut self, report: &PatchReport) {
        (**self).on_offsets_patched(report);
    }

    fn on_length_repaired(&mut self, total_len: u32) {
        (**self).on_length_repaired(total_len);
    }

    fn on_checksums_repaired(&mut self, signature: &[u8; SHA1_LEN], checksum: u32) {
        (**self).on_checksums_repaired(signature, checksum);
    }

    fn on_warning(&mut self, message: &str) {
        (**self).on_warning(message);
    }
}

impl<T: MergeObserver + ?Sized> MergeObserver for Box<T> {
    fn on_directory_located(&mut self, index: &ContainerIndex) {
        (**self).on_directory_located(index);
    }

    fn on_offsets_patched(&mut self, report: &PatchReport) {
        (**self).on_offsets_patched(report);
    }

    fn on_length_repaired(&mut self, total_len: u32) {
        (**self).on_length_repaired(total_len);
    }

    fn on_checksums_repaired(&mut self, signature: &[u8; SHA1_LEN], checksum: u32) {
        (**self).on_checksums_repaired(signature, checksum);
    }

    fn on_warning(&mut self, message: &str) {
        (**self).on_warning(message);
    }
}

/// A single pipeline event, as recorded by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkpoint {
    /// Central directory located.
    DirectoryLocated {
        /// Directory start offset in the outer archive.
        start: usize,
        /// End record offset in the outer archive.
        end: usize,
    },
    /// Archive offsets shifted.
    OffsetsPatched {
        /// Directory start before patching.
        old_start: u32,
        /// Directory start after patching.
        new_start: u32,
        /// Number of file headers shifted.
        entries: usize,
    },
    /// Merged length written.
    LengthRepaired {
        /// Total merged length.
        total_len: u32,
    },
    /// Signature and checksum written.
    ChecksumsRepaired {
        /// SHA-1 signature.
        signature: [u8; SHA1_LEN],
        /// Adler-32 checksum.
        checksum: u32,
    },
    /// Non-fatal warning.
    Warning(String),
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryLocated { start, end } => {
                write!(f, "Central directory located: {:#x}..{:#x}", start, end)
            }
            Self::OffsetsPatched {
                old_start,
                new_start,
                entries,
            } => write!(
                f,
                "Start of the central directory offset updated: {} ---> {} ({} local header offsets updated)",
                old_start, new_start, entries
            ),
            Self::LengthRepaired { total_len } => {
                write!(f, "Updating data length to {}", total_len)
            }
            Self::ChecksumsRepaired {
                signature,
                checksum,
            } => write!(
                f,
                "Updating checksum: adler32 {:08x}, sha1 {}",
                checksum,
                to_hex(signature)
            ),
            Self::Warning(message) => write!(f, "Warning: {}", message),
        }
    }
}

/// An observer that does nothing (null object pattern).
#[derive(Debug, Default, Clone)]
pub struct NoProgress;

impl MergeObserver for NoProgress {}

/// An observer that forwards checkpoints to the `log` facade.
#[derive(Debug, Default, Clone)]
pub struct LogObserver;

impl MergeObserver for LogObserver {
    fn on_directory_located(&mut self, index: &ContainerIndex) {
        log::info!(
            "{}",
            Checkpoint::DirectoryLocated {
                start: index.directory_start,
                end: index.directory_end,
            }
        );
    }

    fn on_offsets_patched(&mut self, report: &PatchReport) {
        log::info!("{}", Checkpoint::from(report));
    }

    fn on_length_repaired(&mut self, total_len: u32) {
        log::info!("{}", Checkpoint::LengthRepaired { total_len });
    }

    fn on_checksums_repaired(&mut self, signature: &[u8; SHA1_LEN], checksum: u32) {
        log::info!(
            "{}",
            Checkpoint::ChecksumsRepaired {
                signature: *signature,
                checksum,
            }
        );
    }

    fn on_warning(&mut self, message: &str) {
        log::warn!("{}", message);
    }
}

impl From<&PatchReport> for Checkpoint {
    fn from(report: &PatchReport) -> Self {
        Checkpoint::OffsetsPatched {
            old_start: report.old_directory_start,
            new_start: report.new_directory_start,
            entries: report.entries_patched,
        }
    }
}

/// An observer that records every checkpoint.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    /// Checkpoints in the order they were reported.
    pub checkpoints: Vec<Checkpoint>,
}

impl RecordingObserver {
    /// Creates a new recording observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.checkpoints.iter().filter_map(|c| match c {
            Checkpoint::Warning(message) => Some(message.as_str()),
            _ => None,
        })
    }
}

impl MergeObserver for RecordingObserver {
    fn on_directory_located(&mut self, index: &ContainerIndex) {
        self.checkpoints.push(Checkpoint::DirectoryLocated {
            start: index.directory_start,
            end: index.directory_end,
        });
    }

    fn on_offsets_patched(&mut self, report: &PatchReport) {
        self.checkpoints.push(Checkpoint::from(report));
    }

    fn on_length_repaired(&mut self, total_len: u32) {
        self.checkpoints
            .push(Checkpoint::LengthRepaired { total_len });
    }

    fn on_checksums_repaired(&mut self, signature: &[u8; SHA1_LEN], checksum: u32) {
        self.checkpoints.push(Checkpoint::ChecksumsRepaired {
            signature: *signature,
            checksum,
        });
    }

    fn on_warning(&mut self, message: &str) {
        self.checkpoints
            .push(Checkpoint::Warning(message.to_string()));
    }
}

/// An observer that calls a closure with each checkpoint.
pub struct ClosureObserver<F> {
    callback: F,
}

impl<F> ClosureObserver<F>
where
    F: FnMut(&Checkpoint),
{
    /// Creates an observer from a closure.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> MergeObserver for ClosureObserver<F>
where
    F: FnMut(&Checkpoint),
{
    fn on_directory_located(&mut self, index: &ContainerIndex) {
        (self.callback)(&Checkpoint::DirectoryLocated {
            start: index.directory_start,
            end: index.directory_end,
        });
    }

    fn on_offsets_patched(&mut self, report: &PatchReport) {
        (self.callback)(&Checkpoint::from(report));
    }

    fn on_length_repaired(&mut self, total_len: u32) {
        (self.callback)(&Checkpoint::LengthRepaired { total_len });
    }

    fn on_checksums_repaired(&mut self, signature: &[u8; SHA1_LEN], checksum: u32) {
        (self.callback)(&Checkpoint::ChecksumsRepaired {
            signature: *signature,
            checksum,
        });
    }

    fn on_warning(&mut self, message: &str) {
        (self.callback)(&Checkpoint::Warning(message.to_string()));
    }
}

/// Creates a closure-based observer.
pub fn observer_fn<F>(f: F) -> ClosureObserver<F>
where
    F: FnMut(&Checkpoint),
{
    ClosureObserver::new(f)
}

/// Formats bytes as a human-readable string using IEC units (KiB, MiB, GiB).
pub fn format_bytes_iec(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < MIB {
        format!("{:.1} KiB", b / KIB)
    } else if b < GIB {
        format!("{:.1} MiB", b / MIB)
    } else {
        format!("{:.1} GiB", b / GIB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ContainerIndex {
        ContainerIndex {
            directory_start: 50,
            directory_end: 90,
        }
    }

    fn report() -> PatchReport {
        PatchReport {
            delta: 10,
            old_directory_start: 50,
            new_directory_start: 60,
            entries_patched: 1,
        }
    }

    #[test]
    fn test_no_progress() {
        let mut observer = NoProgress;
        observer.on_directory_located(&index());
        observer.on_warning("ignored");
    }

    #[test]
    fn test_recording_observer() {
        let mut observer = RecordingObserver::new();
        observer.on_directory_located(&index());
        observer.on_offsets_patched(&report());
        observer.on_length_repaired(110);
        observer.on_warning("not a DEX image");

        assert_eq!(observer.checkpoints.len(), 4);
        assert_eq!(
            observer.checkpoints[1],
            Checkpoint::OffsetsPatched {
                old_start: 50,
                new_start: 60,
                entries: 1
            }
        );
        assert_eq!(observer.warnings().collect::<Vec<_>>(), vec!["not a DEX image"]);
    }

    #[test]
    fn test_observer_fn() {
        let mut seen = Vec::new();
        {
            let mut observer = observer_fn(|c: &Checkpoint| seen.push(c.clone()));
            observer.on_length_repaired(42);
            observer.on_checksums_repaired(&[0; 20], 7);
        }
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Checkpoint::LengthRepaired { total_len: 42 });
    }

    #[test]
    fn test_mut_ref_forwarding() {
        let mut recording = RecordingObserver::new();
        {
            let mut by_ref: &mut RecordingObserver = &mut recording;
            MergeObserver::on_length_repaired(&mut by_ref, 9);
        }
        assert_eq!(
            recording.checkpoints,
            vec![Checkpoint::LengthRepaired { total_len: 9 }]
        );
    }

    #[test]
    fn test_checkpoint_display() {
        assert_eq!(
            Checkpoint::from(&report()).to_string(),
            "Start of the central directory offset updated: 50 ---> 60 (1 local header offsets updated)"
        );
        assert_eq!(
            Checkpoint::LengthRepaired { total_len: 110 }.to_string(),
            "Updating data length to 110"
        );
        assert!(
            Checkpoint::ChecksumsRepaired {
                signature: [0xAB; 20],
                checksum: 0x1234
            }
            .to_string()
            .contains("00001234")
        );
    }

    #[test]
    fn test_format_bytes_iec() {
        assert_eq!(format_bytes_iec(512), "512 B");
        assert_eq!(format_bytes_iec(1536), "1.5 KiB");
        assert_eq!(format_bytes_iec(3 * 1024 * 1024), "3.0 MiB");
    }
}

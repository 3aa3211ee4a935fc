//! Progress lines for CLI operations.

use dexzip::checksum::SHA1_LEN;
use dexzip::progress::{Checkpoint, MergeObserver};
use dexzip::{ContainerIndex, PatchReport};

/// Prints each pipeline checkpoint on its own line.
pub struct CliProgress {
    quiet: bool,
}

impl CliProgress {
    /// Creates a new progress printer
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn print(&self, checkpoint: Checkpoint) {
        if !self.quiet {
            println!("{}", checkpoint);
        }
    }
}

impl MergeObserver for CliProgress {
    fn on_directory_located(&mut self, index: &ContainerIndex) {
        self.print(Checkpoint::DirectoryLocated {
            start: index.directory_start,
            end: index.directory_end,
        });
    }

    fn on_offsets_patched(&mut self, report: &PatchReport) {
        self.print(Checkpoint::from(report));
    }

    fn on_length_repaired(&mut self, total_len: u32) {
        self.print(Checkpoint::LengthRepaired { total_len });
    }

    fn on_checksums_repaired(&mut self, signature: &[u8; SHA1_LEN], checksum: u32) {
        self.print(Checkpoint::ChecksumsRepaired {
            signature: *signature,
            checksum,
        });
    }

    fn on_warning(&mut self, message: &str) {
        // warnings go to stderr even when progress is hidden
        eprintln!("Warning: {}", message);
    }
}

//! The outer ZIP-family archive and its offset rewrite.
//!
//! Only the central directory is touched. Local headers, entry data and
//! compression are never inspected.
//!
//! # Example
//!
//! ```rust,ignore
//! use dexzip::zip::OuterArchive;
//!
//! let mut apk = OuterArchive::new(std::fs::read("app.apk")?)?;
//! println!("{} entries", apk.entry_count());
//!
//! let report = apk.shift(0x70)?;
//! assert_eq!(report.new_directory_start, report.old_directory_start + 0x70);
//! ```

pub mod index;
pub mod patch;
pub mod walker;

pub use index::{ContainerIndex, find_directory_end, read_directory_start};
pub use patch::{PatchReport, patch_all, shift_directory_start, shift_entry_back_reference};
pub use walker::{EntryHeaders, next_entry_header};

use crate::Result;
use crate::format::fields;
use crate::format::zip::CDFH_LOCAL_HEADER_OFFSET;

/// A central directory file header as seen by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRecord {
    /// Offset of the `PK\x01\x02` signature.
    pub header_offset: usize,
    /// Local header offset stored in the record.
    pub local_header_offset: u32,
}

/// An outer archive buffer with its located central directory.
#[derive(Debug, Clone)]
pub struct OuterArchive {
    data: Vec<u8>,
    index: ContainerIndex,
}

impl OuterArchive {
    /// Takes ownership of `data` and locates its central directory.
    ///
    /// # Errors
    ///
    /// Propagates [`ContainerIndex::locate`] errors.
    pub fn new(data: Vec<u8>) -> Result<Self> {
        let index = ContainerIndex::locate(&data)?;
        Ok(Self { data, index })
    }

    /// Returns the located anchors.
    pub fn index(&self) -> ContainerIndex {
        self.index
    }

    /// Returns the central directory start offset.
    pub fn directory_start(&self) -> usize {
        self.index.directory_start
    }

    /// Returns the end of central directory record offset.
    pub fn directory_end(&self) -> usize {
        self.index.directory_end
    }

    /// Returns the archive bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterates file header offsets in the central directory.
    pub fn headers(&self) -> EntryHeaders<'_> {
        EntryHeaders::new(
            &self.data,
            self.index.directory_start,
            self.index.directory_end,
        )
    }

    /// Returns the number of file headers found by the walk.
    pub fn entry_count(&self) -> usize {
        self.headers().count()
    }

    /// Reads every file header with its local header offset.
    pub fn entries(&self) -> Result<Vec<EntryRecord>> {
        self.headers()
            .map(|header_offset| {
                let local_header_offset = fields::read_u32_le(
                    &self.data,
                    header_offset + CDFH_LOCAL_HEADER_OFFSET,
                    "local header offset",
                )?;
                Ok(EntryRecord {
                    header_offset,
                    local_header_offset,
                })
            })
            .collect()
    }

    /// Shifts every absolute offset by `delta` in place.
    ///
    /// The anchors keep pointing at the same bytes of this buffer; only the
    /// offset values they hold change.
    pub fn shift(&mut self, delta: u32) -> Result<PatchReport> {
        patch_all(
            &mut self.data,
            self.index.directory_start,
            self.index.directory_end,
            delta,
        )
    }

    /// Consumes the archive and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

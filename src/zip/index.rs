//! Locating the central directory of a ZIP-family archive.

use crate::format::fields;
use crate::format::zip::{EOCD_CD_OFFSET, EOCD_SIGNATURE};
use crate::{Error, Result};

/// Finds the end of central directory record.
///
/// Returns the offset of the first occurrence of `PK\x05\x06`. A comment or
/// stored entry containing the marker earlier in the file wins, which is the
/// lookup behaviour the merge relies on.
///
/// # Errors
///
/// Returns [`Error::MarkerNotFound`] if the marker is absent.
pub fn find_directory_end(buf: &[u8]) -> Result<usize> {
    fields::find(buf, EOCD_SIGNATURE, 0, buf.len()).ok_or(Error::MarkerNotFound {
        what: "end of central directory",
    })
}

/// Decodes the central directory start offset stored at `end + 16`.
///
/// # Errors
///
/// Returns [`Error::OutOfBounds`] if `end + 20` exceeds the buffer.
pub fn read_directory_start(buf: &[u8], end: usize) -> Result<usize> {
    let offset = end
        .checked_add(EOCD_CD_OFFSET)
        .ok_or_else(|| Error::out_of_bounds("central directory offset", end, 4, buf.len()))?;
    let start = fields::read_u32_le(buf, offset, "central directory offset")?;
    Ok(start as usize)
}

/// The two structural anchors of an outer archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerIndex {
    /// Start of the central directory, as recorded in the end record.
    pub directory_start: usize,
    /// Offset of the end of central directory record.
    pub directory_end: usize,
}

impl ContainerIndex {
    /// Locates both anchors in `buf`.
    ///
    /// # Errors
    ///
    /// - [`Error::MarkerNotFound`] if there is no end record
    /// - [`Error::OutOfBounds`] if the end record is truncated
    /// - [`Error::CorruptDirectory`] if the recorded start lies past the end record
    pub fn locate(buf: &[u8]) -> Result<Self> {
        let directory_end = find_directory_end(buf)?;
        let directory_start = read_directory_start(buf, directory_end)?;

        if directory_start > directory_end {
            return Err(Error::CorruptDirectory {
                start: directory_start,
                end: directory_end,
            });
        }

        log::debug!(
            "central directory spans {:#x}..{:#x} in {} bytes",
            directory_start,
            directory_end,
            buf.len()
        );

        Ok(Self {
            directory_start,
            directory_end,
        })
    }

    /// Returns the size of the central directory in bytes.
    ///
    /// Zero for an index whose start lies past its end.
    pub fn directory_len(&self) -> usize {
        self.directory_end.saturating_sub(self.directory_start)
    }

    /// Returns true if the directory holds no bytes (an archive with no entries).
    pub fn is_empty(&self) -> bool {
        self.directory_len() == 0
    }
}

//! Shifting the absolute offsets held by the central directory.
//!
//! Prepending `delta` bytes to an archive moves every local header and the
//! central directory itself by `delta`. Two kinds of field record those
//! positions:
//!
//! - the central directory offset in the end record (`end + 16`)
//! - the local header offset in each file header (`header + 42`)
//!
//! Patching is not idempotent: applying the same delta twice shifts every
//! offset twice.

use crate::format::fields;
use crate::format::zip::{CDFH_LOCAL_HEADER_OFFSET, EOCD_CD_OFFSET};
use crate::zip::walker::EntryHeaders;
use crate::{Error, Result};

const DIRECTORY_START_FIELD: &str = "central directory offset";
const BACK_REFERENCE_FIELD: &str = "local header offset";

/// Summary of a [`patch_all`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchReport {
    /// Amount added to every offset.
    pub delta: u32,
    /// Directory start before patching.
    pub old_directory_start: u32,
    /// Directory start after patching.
    pub new_directory_start: u32,
    /// Number of file headers whose local header offset was shifted.
    pub entries_patched: usize,
}

/// Adds `delta` to the directory start field of the end record at `end`.
///
/// Returns the `(old, new)` field values.
pub fn shift_directory_start(buf: &mut [u8], end: usize, delta: u32) -> Result<(u32, u32)> {
    let offset = end
        .checked_add(EOCD_CD_OFFSET)
        .ok_or_else(|| Error::out_of_bounds(DIRECTORY_START_FIELD, end, 4, buf.len()))?;
    fields::shift_u32_le_at(buf, offset, delta, DIRECTORY_START_FIELD)
}

/// Adds `delta` to the local header offset of the file header at `header`.
///
/// Returns the `(old, new)` field values.
pub fn shift_entry_back_reference(buf: &mut [u8], header: usize, delta: u32) -> Result<(u32, u32)> {
    let offset = header
        .checked_add(CDFH_LOCAL_HEADER_OFFSET)
        .ok_or_else(|| Error::out_of_bounds(BACK_REFERENCE_FIELD, header, 4, buf.len()))?;
    fields::shift_u32_le_at(buf, offset, delta, BACK_REFERENCE_FIELD)
}

/// Shifts the directory start and every file header's local header offset.
///
/// Every field is read and checked before the first write, so on error the
/// buffer is left exactly as it was.
///
/// # Errors
///
/// - [`Error::OutOfBounds`] if a field lies past the buffer end
/// - [`Error::OffsetOverflow`] if a shifted value exceeds `u32::MAX`
/// - [`Error::NoEntryHeaders`] if the directory is non-empty but holds no headers
pub fn patch_all(buf: &mut [u8], start: usize, end: usize, delta: u32) -> Result<PatchReport> {
    let headers: Vec<usize> = EntryHeaders::new(buf, start, end).collect();
    if headers.is_empty() && start < end {
        return Err(Error::NoEntryHeaders { start, end });
    }

    // Validate every field up front.
    let directory_offset = end
        .checked_add(EOCD_CD_OFFSET)
        .ok_or_else(|| Error::out_of_bounds(DIRECTORY_START_FIELD, end, 4, buf.len()))?;
    let old_directory_start = fields::read_u32_le(buf, directory_offset, DIRECTORY_START_FIELD)?;
    let new_directory_start = fields::shift_u32(old_directory_start, delta, DIRECTORY_START_FIELD)?;
    for &header in &headers {
        let offset = header
            .checked_add(CDFH_LOCAL_HEADER_OFFSET)
            .ok_or_else(|| Error::out_of_bounds(BACK_REFERENCE_FIELD, header, 4, buf.len()))?;
        let value = fields::read_u32_le(buf, offset, BACK_REFERENCE_FIELD)?;
        fields::shift_u32(value, delta, BACK_REFERENCE_FIELD)?;
    }

    shift_directory_start(buf, end, delta)?;
    for &header in &headers {
        let (old, new) = shift_entry_back_reference(buf, header, delta)?;
        log::trace!(
            "file header at {:#x}: local header {:#x} -> {:#x}",
            header,
            old,
            new
        );
    }

    log::debug!(
        "central directory offset {:#x} -> {:#x}, {} file headers shifted by {}",
        old_directory_start,
        new_directory_start,
        headers.len(),
        delta
    );

    Ok(PatchReport {
        delta,
        old_directory_start,
        new_directory_start,
        entries_patched: headers.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fields::read_u32_le;
    use crate::format::zip::{CDFH_SIGNATURE, EOCD_SIGNATURE};

    /// Two file headers at 0 and 50, end record at 100.
    fn two_entry_directory() -> Vec<u8> {
        let mut buf = vec![0u8; 122];
        for (h, back_ref) in [(0usize, 7u32), (50, 300)] {
            buf[h..h + 4].copy_from_slice(CDFH_SIGNATURE);
            buf[h + 42..h + 46].copy_from_slice(&back_ref.to_le_bytes());
        }
        buf[100..104].copy_from_slice(EOCD_SIGNATURE);
        buf[116..120].copy_from_slice(&0u32.to_le_bytes());
        buf
    }

    #[test]
    fn test_shift_directory_start() {
        let mut buf = two_entry_directory();
        assert_eq!(shift_directory_start(&mut buf, 100, 16).unwrap(), (0, 16));
        assert_eq!(read_u32_le(&buf, 116, "").unwrap(), 16);
    }

    #[test]
    fn test_shift_entry_back_reference() {
        let mut buf = two_entry_directory();
        assert_eq!(
            shift_entry_back_reference(&mut buf, 50, 1000).unwrap(),
            (300, 1300)
        );
        assert_eq!(read_u32_le(&buf, 92, "").unwrap(), 1300);
    }

    #[test]
    fn test_shift_entry_back_reference_out_of_bounds() {
        let mut buf = vec![0u8; 45];
        assert!(shift_entry_back_reference(&mut buf, 0, 1).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_patch_all() {
        let mut buf = two_entry_directory();
        let report = patch_all(&mut buf, 0, 100, 0x70).unwrap();

        assert_eq!(report.entries_patched, 2);
        assert_eq!(report.old_directory_start, 0);
        assert_eq!(report.new_directory_start, 0x70);
        assert_eq!(read_u32_le(&buf, 42, "").unwrap(), 7 + 0x70);
        assert_eq!(read_u32_le(&buf, 92, "").unwrap(), 300 + 0x70);
        assert_eq!(read_u32_le(&buf, 116, "").unwrap(), 0x70);
    }

    #[test]
    fn test_patch_all_zero_delta() {
        let original = two_entry_directory();
        let mut buf = original.clone();
        let report = patch_all(&mut buf, 0, 100, 0).unwrap();
        assert_eq!(report.entries_patched, 2);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_patching_twice_corrupts() {
        let mut buf = two_entry_directory();
        patch_all(&mut buf, 0, 100, 10).unwrap();
        patch_all(&mut buf, 0, 100, 10).unwrap();
        assert_eq!(read_u32_le(&buf, 42, "").unwrap(), 27);
        assert_eq!(read_u32_le(&buf, 116, "").unwrap(), 20);
    }

    #[test]
    fn test_patch_all_no_headers() {
        let mut buf = two_entry_directory();
        buf[0..4].copy_from_slice(b"XXXX");
        buf[50..54].copy_from_slice(b"XXXX");
        assert!(matches!(
            patch_all(&mut buf, 0, 100, 1),
            Err(Error::NoEntryHeaders { start: 0, end: 100 })
        ));
    }

    #[test]
    fn test_patch_all_empty_directory() {
        let mut buf = vec![0u8; 22];
        buf[0..4].copy_from_slice(EOCD_SIGNATURE);
        let report = patch_all(&mut buf, 0, 0, 64).unwrap();
        assert_eq!(report.entries_patched, 0);
        assert_eq!(read_u32_le(&buf, 16, "").unwrap(), 64);
    }

    #[test]
    fn test_patch_all_overflow_leaves_buffer_untouched() {
        let mut buf = two_entry_directory();
        buf[92..96].copy_from_slice(&(u32::MAX - 3).to_le_bytes());
        let before = buf.clone();

        let err = patch_all(&mut buf, 0, 100, 4).unwrap_err();
        assert!(matches!(err, Error::OffsetOverflow { .. }));
        assert_eq!(buf, before);
    }
}

//! Checking a merged file against both formats.

use crate::checksum::SHA1_LEN;
use crate::dex::{DexHeader, compute_checksum, compute_signature};
use crate::format::fields;
use crate::format::zip::{CDFH_LOCAL_HEADER_OFFSET, EOCD_SIGNATURE, LFH_SIGNATURE};
use crate::zip::{EntryHeaders, next_entry_header, read_directory_start};
use crate::{Error, Result};

/// Outcome of [`verify_merged`].
#[derive(Debug, Clone)]
pub struct Verification {
    /// Header fields as stored in the merged file.
    pub header: DexHeader,
    /// Actual length of the merged file.
    pub actual_len: u64,
    /// SHA-1 recomputed over `[32, end)`.
    pub expected_signature: [u8; SHA1_LEN],
    /// Adler-32 recomputed over `[12, end)`.
    pub expected_checksum: u32,
    /// Whether the recorded directory start lies in the outer archive and
    /// leads to a file header.
    pub directory_start_ok: bool,
    /// Number of file headers walked.
    pub entries_checked: usize,
    /// File headers whose local header offset does not land on `PK\x03\x04`.
    pub misplaced_entries: Vec<usize>,
}

impl Verification {
    /// Returns true if the stored length matches the file length.
    pub fn length_ok(&self) -> bool {
        u64::from(self.header.file_size) == self.actual_len
    }

    /// Returns true if the stored signature matches.
    pub fn signature_ok(&self) -> bool {
        self.header.signature == self.expected_signature
    }

    /// Returns true if the stored checksum matches.
    pub fn checksum_ok(&self) -> bool {
        self.header.checksum == self.expected_checksum
    }

    /// Returns true if every archive offset lands on the right signature.
    pub fn archive_ok(&self) -> bool {
        self.directory_start_ok && self.misplaced_entries.is_empty()
    }

    /// Returns true if both formats check out.
    pub fn is_ok(&self) -> bool {
        self.length_ok() && self.signature_ok() && self.checksum_ok() && self.archive_ok()
    }
}

/// Verifies a merged file.
///
/// `inner_len` is the length of the prepended blob; the end record is
/// searched for from that point so a marker inside the blob is not mistaken
/// for the archive's.
///
/// # Errors
///
/// - [`Error::OutOfBounds`] if the file is too small to hold a DEX header
/// - [`Error::MarkerNotFound`] if no end record follows the blob
pub fn verify_merged(merged: &[u8], inner_len: usize) -> Result<Verification> {
    let header = DexHeader::parse(merged)?;
    let expected_signature = compute_signature(merged)?;
    let expected_checksum = compute_checksum(merged)?;

    let end = fields::find(merged, EOCD_SIGNATURE, inner_len, merged.len()).ok_or(
        Error::MarkerNotFound {
            what: "end of central directory",
        },
    )?;
    let start = read_directory_start(merged, end)?;

    // the directory must sit inside the outer half and, unless empty,
    // reach a file header before the end record
    let directory_start_ok = start >= inner_len
        && (start == end || (start < end && next_entry_header(merged, start, end).is_some()));

    let mut entries_checked = 0;
    let mut misplaced_entries = Vec::new();
    if start <= end {
        for h in EntryHeaders::new(merged, start, end) {
            entries_checked += 1;
            let lands = fields::read_u32_le(merged, h + CDFH_LOCAL_HEADER_OFFSET, "")
                .ok()
                .and_then(|target| fields::window(merged, target as usize, 4, "").ok())
                == Some(&LFH_SIGNATURE[..]);
            if !lands {
                misplaced_entries.push(h);
            }
        }
    }

    let verification = Verification {
        header,
        actual_len: merged.len() as u64,
        expected_signature,
        expected_checksum,
        directory_start_ok,
        entries_checked,
        misplaced_entries,
    };

    if !verification.is_ok() {
        log::warn!(
            "merged file failed verification: length {}, signature {}, checksum {}, archive {}",
            verification.length_ok(),
            verification.signature_ok(),
            verification.checksum_ok(),
            verification.archive_ok()
        );
    }

    Ok(verification)
}

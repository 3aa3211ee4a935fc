//! Rewriting the DEX length, signature and checksum fields.

use crate::checksum::{Adler32, Checksum, SHA1_LEN, Sha1};
use crate::format::dex::{CHECKSUM_OFFSET, FILE_SIZE_OFFSET, MIN_REPAIRABLE_SIZE, SIGNATURE_OFFSET};
use crate::format::fields;
use crate::{Error, Result};

/// Writes `buf.len()` into the `file_size` field at `[32, 36)`.
///
/// Returns the written length.
///
/// # Errors
///
/// - [`Error::OutOfBounds`] if the buffer is shorter than 36 bytes
/// - [`Error::OffsetOverflow`] if the length does not fit in 32 bits
pub fn repair_length(buf: &mut [u8]) -> Result<u32> {
    if buf.len() < MIN_REPAIRABLE_SIZE {
        return Err(Error::out_of_bounds("file size", FILE_SIZE_OFFSET, 4, buf.len()));
    }
    let len = fields::len_to_u32(buf.len(), "file size")?;
    fields::write_u32_le(buf, FILE_SIZE_OFFSET, len, "file size")?;
    Ok(len)
}

/// Computes the SHA-1 signature over `[32, end)`.
pub fn compute_signature(buf: &[u8]) -> Result<[u8; SHA1_LEN]> {
    let covered = buf
        .get(FILE_SIZE_OFFSET..)
        .ok_or_else(|| Error::out_of_bounds("signature range", FILE_SIZE_OFFSET, 0, buf.len()))?;
    Ok(Sha1::compute(covered))
}

/// Computes the Adler-32 checksum over `[12, end)`.
pub fn compute_checksum(buf: &[u8]) -> Result<u32> {
    let covered = buf
        .get(SIGNATURE_OFFSET..)
        .ok_or_else(|| Error::out_of_bounds("checksum range", SIGNATURE_OFFSET, 0, buf.len()))?;
    Ok(Adler32::compute(covered))
}

/// Rewrites the SHA-1 signature and then the Adler-32 checksum.
///
/// The checksum range `[12, end)` covers the signature, so the signature is
/// written first and the checksum computed over the updated bytes.
///
/// Returns the written `(signature, checksum)`.
///
/// # Errors
///
/// Returns [`Error::OutOfBounds`] if the buffer is shorter than 36 bytes.
pub fn repair_checksums(buf: &mut [u8]) -> Result<([u8; SHA1_LEN], u32)> {
    if buf.len() < MIN_REPAIRABLE_SIZE {
        return Err(Error::out_of_bounds("signature", SIGNATURE_OFFSET, SHA1_LEN, buf.len()));
    }

    let signature = compute_signature(buf)?;
    buf[SIGNATURE_OFFSET..SIGNATURE_OFFSET + SHA1_LEN].copy_from_slice(&signature);

    let checksum = compute_checksum(buf)?;
    fields::write_u32_le(buf, CHECKSUM_OFFSET, checksum, "checksum")?;

    Ok((signature, checksum))
}

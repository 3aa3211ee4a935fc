//! Bounds-checked fixed-width field access on byte buffers.

use crate::{Error, Result};

/// Reads a little-endian u32 at `offset`.
///
/// # Errors
///
/// Returns [`Error::OutOfBounds`] if `offset + 4` exceeds the buffer.
pub fn read_u32_le(buf: &[u8], offset: usize, field: &'static str) -> Result<u32> {
    let bytes = window(buf, offset, 4, field)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Writes a little-endian u32 at `offset`.
///
/// # Errors
///
/// Returns [`Error::OutOfBounds`] if `offset + 4` exceeds the buffer.
pub fn write_u32_le(buf: &mut [u8], offset: usize, value: u32, field: &'static str) -> Result<()> {
    let len = buf.len();
    match offset.checked_add(4) {
        Some(end) if end <= len => {
            buf[offset..end].copy_from_slice(&value.to_le_bytes());
            Ok(())
        }
        _ => Err(Error::out_of_bounds(field, offset, 4, len)),
    }
}

/// Adds `delta` to a 32-bit offset field value.
///
/// # Errors
///
/// Returns [`Error::OffsetOverflow`] if the sum does not fit in a u32.
pub fn shift_u32(value: u32, delta: u32, field: &'static str) -> Result<u32> {
    value
        .checked_add(delta)
        .ok_or_else(|| Error::offset_overflow(field, value as u64, delta as u64))
}

/// Reads the u32 at `offset`, adds `delta` and writes it back.
///
/// Returns the `(old, new)` values. The buffer is untouched on error.
pub fn shift_u32_le_at(
    buf: &mut [u8],
    offset: usize,
    delta: u32,
    field: &'static str,
) -> Result<(u32, u32)> {
    let old = read_u32_le(buf, offset, field)?;
    let new = shift_u32(old, delta, field)?;
    write_u32_le(buf, offset, new, field)?;
    Ok((old, new))
}

/// Borrows `width` bytes at `offset`.
pub fn window<'a>(
    buf: &'a [u8],
    offset: usize,
    width: usize,
    field: &'static str,
) -> Result<&'a [u8]> {
    offset
        .checked_add(width)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| Error::out_of_bounds(field, offset, width, buf.len()))
}

/// Finds the first occurrence of `needle` lying entirely inside `buf[from..to]`.
///
/// Returns the absolute offset. An empty, inverted or out-of-range window
/// yields `None`, mirroring a bounded substring search.
pub fn find(buf: &[u8], needle: &[u8], from: usize, to: usize) -> Option<usize> {
    let to = to.min(buf.len());
    if needle.is_empty() || from >= to || to - from < needle.len() {
        return None;
    }
    buf[from..to]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| from + pos)
}

/// Converts a buffer length to a 32-bit field value.
///
/// # Errors
///
/// Returns [`Error::OffsetOverflow`] if `len` exceeds `u32::MAX`.
pub fn len_to_u32(len: usize, field: &'static str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::offset_overflow(field, len as u64, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_u32() {
        let mut buf = vec![0u8; 8];
        write_u32_le(&mut buf, 2, 0xDEAD_BEEF, "test").unwrap();
        assert_eq!(&buf[2..6], &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(read_u32_le(&buf, 2, "test").unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_read_at_exact_end() {
        let buf = [1u8, 0, 0, 0];
        assert_eq!(read_u32_le(&buf, 0, "test").unwrap(), 1);
        assert!(read_u32_le(&buf, 1, "test").is_err());
    }

    #[test]
    fn test_write_out_of_bounds() {
        let mut buf = vec![0u8; 5];
        let err = write_u32_le(&mut buf, 2, 7, "field").unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfBounds {
                field: "field",
                offset: 2,
                width: 4,
                len: 5
            }
        ));
        assert_eq!(buf, vec![0u8; 5]);
    }

    #[test]
    fn test_offset_near_usize_max() {
        let buf = [0u8; 4];
        assert!(read_u32_le(&buf, usize::MAX - 1, "test").is_err());
    }

    #[test]
    fn test_shift_u32_overflow() {
        assert_eq!(shift_u32(5, 10, "x").unwrap(), 15);
        assert!(matches!(
            shift_u32(u32::MAX, 1, "x"),
            Err(Error::OffsetOverflow { .. })
        ));
    }

    #[test]
    fn test_shift_in_place() {
        let mut buf = 40u32.to_le_bytes().to_vec();
        assert_eq!(shift_u32_le_at(&mut buf, 0, 2, "x").unwrap(), (40, 42));
        assert_eq!(read_u32_le(&buf, 0, "x").unwrap(), 42);
    }

    #[test]
    fn test_shift_overflow_leaves_buffer() {
        let mut buf = u32::MAX.to_le_bytes().to_vec();
        assert!(shift_u32_le_at(&mut buf, 0, 1, "x").is_err());
        assert_eq!(buf, u32::MAX.to_le_bytes());
    }

    #[test]
    fn test_find() {
        let buf = b"xxPKxxPKyy";
        assert_eq!(find(buf, b"PK", 0, buf.len()), Some(2));
        assert_eq!(find(buf, b"PK", 3, buf.len()), Some(6));
        assert_eq!(find(buf, b"PK", 3, 7), None);
        assert_eq!(find(buf, b"PK", 3, 8), Some(6));
        assert_eq!(find(buf, b"PK", 8, 4), None);
        assert_eq!(find(buf, b"PK", 0, 1000), Some(2));
    }

    #[test]
    fn test_len_to_u32() {
        assert_eq!(len_to_u32(110, "len").unwrap(), 110);
    }
}

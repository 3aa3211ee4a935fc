//! Walking central directory file headers.
//!
//! File headers have a fixed 46-byte prefix followed by a variable-length
//! name, extra field and comment, so the walk re-scans for the next
//! signature instead of stepping by a fixed stride.

use std::iter::FusedIterator;

use crate::format::fields;
use crate::format::zip::{CDFH_FIXED_SIZE, CDFH_SIGNATURE};

/// Returns the offset of the next file header signature within `[from, to)`.
pub fn next_entry_header(buf: &[u8], from: usize, to: usize) -> Option<usize> {
    fields::find(buf, CDFH_SIGNATURE, from, to)
}

/// Iterator over central directory file header offsets.
///
/// The first header is the first signature at or after the directory start;
/// each subsequent one is searched from `current + 46`. Iteration stops when
/// no signature remains before the directory end.
#[derive(Debug, Clone)]
pub struct EntryHeaders<'a> {
    buf: &'a [u8],
    next: Option<usize>,
    end: usize,
}

impl<'a> EntryHeaders<'a> {
    /// Creates an iterator over the headers in `buf[start..end]`.
    pub fn new(buf: &'a [u8], start: usize, end: usize) -> Self {
        Self {
            buf,
            next: next_entry_header(buf, start, end),
            end,
        }
    }
}

impl Iterator for EntryHeaders<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next.take()?;
        if current >= self.end {
            return None;
        }
        self.next = current
            .checked_add(CDFH_FIXED_SIZE)
            .and_then(|from| next_entry_header(self.buf, from, self.end));
        Some(current)
    }
}

impl FusedIterator for EntryHeaders<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(header_offsets: &[usize], len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        for &h in header_offsets {
            buf[h..h + 4].copy_from_slice(CDFH_SIGNATURE);
        }
        buf
    }

    #[test]
    fn test_next_entry_header() {
        let buf = directory(&[10], 64);
        assert_eq!(next_entry_header(&buf, 0, 64), Some(10));
        assert_eq!(next_entry_header(&buf, 10, 64), Some(10));
        assert_eq!(next_entry_header(&buf, 11, 64), None);
    }

    #[test]
    fn test_next_entry_header_respects_upper_bound() {
        let buf = directory(&[10], 64);
        assert_eq!(next_entry_header(&buf, 0, 13), None);
        assert_eq!(next_entry_header(&buf, 0, 14), Some(10));
    }

    #[test]
    fn test_walk_variable_stride() {
        // Second header has a 7-byte name after its fixed part
        let buf = directory(&[0, 46, 99], 200);
        let headers: Vec<_> = EntryHeaders::new(&buf, 0, 150).collect();
        assert_eq!(headers, vec![0, 46, 99]);
    }

    #[test]
    fn test_walk_skips_signature_inside_fixed_part() {
        // A signature-looking byte run inside the first header's fixed part
        let buf = directory(&[0, 20, 60], 120);
        let headers: Vec<_> = EntryHeaders::new(&buf, 0, 110).collect();
        assert_eq!(headers, vec![0, 60]);
    }

    #[test]
    fn test_walk_stops_at_end() {
        let buf = directory(&[0, 50, 100], 200);
        let headers: Vec<_> = EntryHeaders::new(&buf, 0, 100).collect();
        assert_eq!(headers, vec![0, 50]);
    }

    #[test]
    fn test_walk_empty_range() {
        let buf = directory(&[0], 64);
        assert_eq!(EntryHeaders::new(&buf, 0, 0).count(), 0);
    }

    #[test]
    fn test_walk_is_fused() {
        let buf = directory(&[0], 64);
        let mut walk = EntryHeaders::new(&buf, 0, 60);
        assert_eq!(walk.next(), Some(0));
        assert_eq!(walk.next(), None);
        assert_eq!(walk.next(), None);
    }
}

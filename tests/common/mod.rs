//! Shared test utilities for integration tests.
//!
//! Builds synthetic ZIP archives and DEX images byte by byte, so tests can
//! assert on exact offsets without depending on a ZIP writer.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

/// Size of a DEX header.
pub const DEX_HEADER_SIZE: usize = 0x70;

/// A synthetic archive with the offsets it was built with.
#[derive(Debug, Clone)]
pub struct ZipFixture {
    /// Archive bytes.
    pub bytes: Vec<u8>,
    /// Offset of each local file header.
    pub local_offsets: Vec<u32>,
    /// Offset of each central directory file header.
    pub header_offsets: Vec<usize>,
    /// Offset of the first central directory file header.
    pub directory_start: usize,
    /// Offset of the end of central directory record.
    pub directory_end: usize,
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Builds a stored (uncompressed) ZIP archive.
///
/// CRC fields are left zero; the merge never reads them.
pub fn build_zip(entries: &[(&str, &[u8])]) -> ZipFixture {
    build_zip_with_comment(entries, b"")
}

/// Builds a stored ZIP archive with an archive comment.
pub fn build_zip_with_comment(entries: &[(&str, &[u8])], comment: &[u8]) -> ZipFixture {
    let mut bytes = Vec::new();
    let mut local_offsets = Vec::with_capacity(entries.len());

    for (name, data) in entries {
        local_offsets.push(bytes.len() as u32);
        bytes.extend_from_slice(b"PK\x03\x04");
        push_u16(&mut bytes, 20); // version needed
        push_u16(&mut bytes, 0); // flags
        push_u16(&mut bytes, 0); // stored
        push_u16(&mut bytes, 0); // time
        push_u16(&mut bytes, 0); // date
        push_u32(&mut bytes, 0); // crc
        push_u32(&mut bytes, data.len() as u32);
        push_u32(&mut bytes, data.len() as u32);
        push_u16(&mut bytes, name.len() as u16);
        push_u16(&mut bytes, 0); // extra
        bytes.extend_from_slice(name.as_bytes());
        bytes.extend_from_slice(data);
    }

    let directory_start = bytes.len();
    let mut header_offsets = Vec::with_capacity(entries.len());

    for ((name, data), local_offset) in entries.iter().zip(&local_offsets) {
        header_offsets.push(bytes.len());
        bytes.extend_from_slice(b"PK\x01\x02");
        push_u16(&mut bytes, 20); // version made by
        push_u16(&mut bytes, 20); // version needed
        push_u16(&mut bytes, 0); // flags
        push_u16(&mut bytes, 0); // stored
        push_u16(&mut bytes, 0); // time
        push_u16(&mut bytes, 0); // date
        push_u32(&mut bytes, 0); // crc
        push_u32(&mut bytes, data.len() as u32);
        push_u32(&mut bytes, data.len() as u32);
        push_u16(&mut bytes, name.len() as u16);
        push_u16(&mut bytes, 0); // extra
        push_u16(&mut bytes, 0); // comment
        push_u16(&mut bytes, 0); // disk
        push_u16(&mut bytes, 0); // internal attributes
        push_u32(&mut bytes, 0); // external attributes
        push_u32(&mut bytes, *local_offset);
        bytes.extend_from_slice(name.as_bytes());
    }

    let directory_end = bytes.len();
    let directory_size = (directory_end - directory_start) as u32;

    bytes.extend_from_slice(b"PK\x05\x06");
    push_u16(&mut bytes, 0); // this disk
    push_u16(&mut bytes, 0); // directory disk
    push_u16(&mut bytes, entries.len() as u16);
    push_u16(&mut bytes, entries.len() as u16);
    push_u32(&mut bytes, directory_size);
    push_u32(&mut bytes, directory_start as u32);
    push_u16(&mut bytes, comment.len() as u16);
    bytes.extend_from_slice(comment);

    ZipFixture {
        bytes,
        local_offsets,
        header_offsets,
        directory_start,
        directory_end,
    }
}

/// A small archive with three entries of different name lengths.
pub fn sample_zip() -> ZipFixture {
    build_zip(&[
        ("AndroidManifest.xml", b"<manifest/>"),
        ("res/a.png", &[0x89, b'P', b'N', b'G', 0, 1, 2, 3]),
        ("classes.dex", b"placeholder"),
    ])
}

/// The minimal one-entry layout used by the worked example: local header
/// at 5, directory start at 50, first file header at 60, end record at 106.
pub fn scenario_outer() -> Vec<u8> {
    let mut buf = vec![0u8; 128];
    buf[5..9].copy_from_slice(b"PK\x03\x04");
    buf[60..64].copy_from_slice(b"PK\x01\x02");
    buf[102..106].copy_from_slice(&5u32.to_le_bytes());
    buf[106..110].copy_from_slice(b"PK\x05\x06");
    buf[122..126].copy_from_slice(&50u32.to_le_bytes());
    buf
}

/// Builds a DEX image: a 0x70-byte header followed by `payload_len` bytes.
pub fn build_dex(version: &[u8; 3], payload_len: usize) -> Vec<u8> {
    let total = DEX_HEADER_SIZE + payload_len;
    let mut dex = vec![0u8; total];
    dex[0..4].copy_from_slice(b"dex\n");
    dex[4..7].copy_from_slice(version);
    dex[7] = 0;
    dex[32..36].copy_from_slice(&(total as u32).to_le_bytes());
    dex[36..40].copy_from_slice(&(DEX_HEADER_SIZE as u32).to_le_bytes()); // header_size
    dex[40..44].copy_from_slice(&0x1234_5678u32.to_le_bytes()); // endian_tag
    for (i, b) in dex[DEX_HEADER_SIZE..].iter_mut().enumerate() {
        *b = (i * 7 % 256) as u8;
    }
    dex
}

/// A version 035 DEX image with a small payload.
pub fn sample_dex() -> Vec<u8> {
    build_dex(b"035", 64)
}

/// Reads a little-endian u32.
pub fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

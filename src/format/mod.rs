//! Format constants and low-level field access for the two containers.
//!
//! The outer container is a ZIP-family archive (ZIP, JAR, APK). Only the
//! structures that hold absolute offsets are described here: the
//! end-of-central-directory record and the central directory file headers.
//!
//! The inner container is a DEX image whose header carries a checksum, a
//! SHA-1 signature and the file size at fixed offsets.
//!
//! All integers are little-endian.

pub mod fields;

/// ZIP structure constants.
pub mod zip {
    /// End of central directory record signature (`PK\x05\x06`).
    pub const EOCD_SIGNATURE: &[u8; 4] = b"PK\x05\x06";

    /// Central directory file header signature (`PK\x01\x02`).
    pub const CDFH_SIGNATURE: &[u8; 4] = b"PK\x01\x02";

    /// Local file header signature (`PK\x03\x04`). Only used to verify
    /// that a shifted back-reference still lands on a local header.
    pub const LFH_SIGNATURE: &[u8; 4] = b"PK\x03\x04";

    /// Offset of the central directory start field inside the end record.
    pub const EOCD_CD_OFFSET: usize = 16;

    /// Offset of the relative local header offset inside a file header.
    pub const CDFH_LOCAL_HEADER_OFFSET: usize = 42;

    /// Fixed part of a central directory file header, before the
    /// variable-length name, extra and comment fields.
    pub const CDFH_FIXED_SIZE: usize = 46;
}

/// DEX header constants.
pub mod dex {
    /// Leading bytes of every DEX magic (`dex\n`).
    pub const MAGIC_PREFIX: &[u8; 4] = b"dex\n";

    /// Full length of the DEX magic (`dex\n035\0`).
    pub const MAGIC_LEN: usize = 8;

    /// Offset of the Adler-32 checksum field.
    pub const CHECKSUM_OFFSET: usize = 8;

    /// Offset of the SHA-1 signature field.
    pub const SIGNATURE_OFFSET: usize = 12;

    /// Offset of the `file_size` field.
    pub const FILE_SIZE_OFFSET: usize = 32;

    /// Smallest buffer that holds every field the merge rewrites.
    pub const MIN_REPAIRABLE_SIZE: usize = FILE_SIZE_OFFSET + 4;

    /// Size of a complete DEX header.
    pub const HEADER_SIZE: usize = 0x70;
}

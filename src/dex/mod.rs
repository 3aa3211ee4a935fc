//! The inner DEX image and its header repair.
//!
//! After the merge the DEX header must describe the whole merged file:
//!
//! ```text
//! +------------------+  0
//! |  magic           |
//! +------------------+  8
//! |  checksum        |  <- Adler-32 of [12, end)
//! +------------------+  12
//! |  signature       |  <- SHA-1 of [32, end)
//! +------------------+  32
//! |  file_size       |  <- total merged length
//! +------------------+  36
//! |  rest of DEX     |
//! +------------------+
//! |  ZIP archive     |  <- offsets shifted by the DEX length
//! +------------------+
//! ```

pub mod repair;

pub use repair::{compute_checksum, compute_signature, repair_checksums, repair_length};

use crate::checksum::SHA1_LEN;
use crate::format::dex::{
    CHECKSUM_OFFSET, FILE_SIZE_OFFSET, MAGIC_LEN, MAGIC_PREFIX, MIN_REPAIRABLE_SIZE,
    SIGNATURE_OFFSET,
};
use crate::format::fields;
use crate::{Error, Result};

/// Format of the inner blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerFormat {
    /// A DEX image with the given format version (e.g. 35, 39).
    Dex {
        /// Decimal version from the `dex\nNNN\0` magic.
        version: u16,
    },
    /// Anything else. Only its length matters to the merge.
    Generic,
}

impl InnerFormat {
    /// Detects the format from the leading magic bytes.
    pub fn detect(data: &[u8]) -> Self {
        if data.len() < MAGIC_LEN || &data[0..4] != MAGIC_PREFIX || data[7] != 0 {
            return Self::Generic;
        }

        let digits = &data[4..7];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Self::Generic;
        }

        let version = digits
            .iter()
            .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
        Self::Dex { version }
    }

    /// Returns true for a recognised DEX image.
    pub fn is_dex(&self) -> bool {
        matches!(self, Self::Dex { .. })
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> String {
        match self {
            Self::Dex { version } => format!("DEX v{:03}", version),
            Self::Generic => "Generic".to_string(),
        }
    }
}

/// The header fields the merge reads and rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexHeader {
    /// Detected format.
    pub format: InnerFormat,
    /// Stored Adler-32 checksum.
    pub checksum: u32,
    /// Stored SHA-1 signature.
    pub signature: [u8; SHA1_LEN],
    /// Stored file size.
    pub file_size: u32,
}

impl DexHeader {
    /// Parses the header fields from the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `buf` is shorter than 36 bytes.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < MIN_REPAIRABLE_SIZE {
            return Err(Error::out_of_bounds("DEX header", 0, MIN_REPAIRABLE_SIZE, buf.len()));
        }

        let mut signature = [0u8; SHA1_LEN];
        signature.copy_from_slice(fields::window(buf, SIGNATURE_OFFSET, SHA1_LEN, "signature")?);

        Ok(Self {
            format: InnerFormat::detect(buf),
            checksum: fields::read_u32_le(buf, CHECKSUM_OFFSET, "checksum")?,
            signature,
            file_size: fields::read_u32_le(buf, FILE_SIZE_OFFSET, "file size")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_dex_035() {
        let mut data = vec![0u8; 0x70];
        data[..8].copy_from_slice(b"dex\n035\0");
        assert_eq!(InnerFormat::detect(&data), InnerFormat::Dex { version: 35 });
        assert!(InnerFormat::detect(&data).is_dex());
        assert_eq!(InnerFormat::detect(&data).name(), "DEX v035");
    }

    #[test]
    fn test_detect_dex_039() {
        assert_eq!(
            InnerFormat::detect(b"dex\n039\0"),
            InnerFormat::Dex { version: 39 }
        );
    }

    #[test]
    fn test_detect_generic() {
        assert_eq!(InnerFormat::detect(b"PK\x03\x04abcd"), InnerFormat::Generic);
        assert_eq!(InnerFormat::detect(b"dex\n03"), InnerFormat::Generic);
        assert_eq!(InnerFormat::detect(b"dex\n0x5\0"), InnerFormat::Generic);
        assert_eq!(InnerFormat::detect(b"dex\n035!"), InnerFormat::Generic);
        assert_eq!(InnerFormat::detect(&[]), InnerFormat::Generic);
    }

    #[test]
    fn test_parse_header() {
        let mut data = vec![0u8; 0x70];
        data[..8].copy_from_slice(b"dex\n035\0");
        data[8..12].copy_from_slice(&0xCAFEBABEu32.to_le_bytes());
        data[12..32].copy_from_slice(&[0xAB; 20]);
        data[32..36].copy_from_slice(&0x70u32.to_le_bytes());

        let header = DexHeader::parse(&data).unwrap();
        assert_eq!(header.format, InnerFormat::Dex { version: 35 });
        assert_eq!(header.checksum, 0xCAFEBABE);
        assert_eq!(header.signature, [0xAB; 20]);
        assert_eq!(header.file_size, 0x70);
    }

    #[test]
    fn test_parse_header_too_small() {
        let err = DexHeader::parse(&[0u8; 35]).unwrap_err();
        assert!(err.is_bounds_error());
    }
}

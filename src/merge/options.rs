//! Merge configuration types.

use crate::{Error, Result};

/// Resource limits applied before any buffer is copied.
///
/// The merge holds both inputs and the output in memory at once, so callers
/// that accept untrusted input should keep these bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeLimits {
    /// Maximum size of the inner blob in bytes.
    pub max_inner_size: u64,
    /// Maximum size of the outer archive in bytes.
    pub max_outer_size: u64,
    /// Maximum size of the merged output in bytes.
    pub max_total_size: u64,
    /// Maximum number of central directory file headers.
    pub max_entries: usize,
}

impl Default for MergeLimits {
    /// Creates merge limits with the following default values:
    ///
    /// | Limit | Default Value | Description |
    /// |-------|---------------|-------------|
    /// | `max_inner_size` | 256 MiB | Largest prepended blob |
    /// | `max_outer_size` | 2 GiB | Largest outer archive |
    /// | `max_total_size` | 4 GiB - 1 | Merged length must fit the 32-bit size field |
    /// | `max_entries` | 1,000,000 | Largest central directory |
    fn default() -> Self {
        Self {
            max_inner_size: 256 << 20,
            max_outer_size: 2 << 30,
            max_total_size: u32::MAX as u64,
            max_entries: 1_000_000,
        }
    }
}

impl MergeLimits {
    /// Creates merge limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates merge limits with no restrictions.
    ///
    /// The 32-bit offset fields still cap the merged size; exceeding them
    /// is reported as [`Error::OffsetOverflow`].
    pub fn unlimited() -> Self {
        Self {
            max_inner_size: u64::MAX,
            max_outer_size: u64::MAX,
            max_total_size: u64::MAX,
            max_entries: usize::MAX,
        }
    }

    /// Sets the maximum inner blob size.
    pub fn max_inner_size(mut self, max: u64) -> Self {
        self.max_inner_size = max;
        self
    }

    /// Sets the maximum outer archive size.
    pub fn max_outer_size(mut self, max: u64) -> Self {
        self.max_outer_size = max;
        self
    }

    /// Sets the maximum merged size.
    pub fn max_total_size(mut self, max: u64) -> Self {
        self.max_total_size = max;
        self
    }

    /// Sets the maximum number of central directory entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Checks input sizes against the limits.
    pub fn check_inputs(&self, inner_len: usize, outer_len: usize) -> Result<()> {
        let inner = inner_len as u64;
        let outer = outer_len as u64;

        if inner > self.max_inner_size {
            return Err(Error::ResourceLimitExceeded(format!(
                "inner blob is {} bytes, limit is {}",
                inner, self.max_inner_size
            )));
        }
        if outer > self.max_outer_size {
            return Err(Error::ResourceLimitExceeded(format!(
                "outer archive is {} bytes, limit is {}",
                outer, self.max_outer_size
            )));
        }
        let total = inner.saturating_add(outer);
        if total > self.max_total_size {
            return Err(Error::ResourceLimitExceeded(format!(
                "merged output would be {} bytes, limit is {}",
                total, self.max_total_size
            )));
        }
        Ok(())
    }

    /// Checks a central directory entry count against the limit.
    pub fn check_entries(&self, entries: usize) -> Result<()> {
        if entries > self.max_entries {
            return Err(Error::ResourceLimitExceeded(format!(
                "central directory has {} entries, limit is {}",
                entries, self.max_entries
            )));
        }
        Ok(())
    }
}

/// Options controlling a merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Resource limits.
    pub limits: MergeLimits,
    /// Reject inner blobs without a DEX magic instead of warning.
    pub require_dex: bool,
}

impl MergeOptions {
    /// Creates default merge options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource limits.
    pub fn limits(mut self, limits: MergeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Requires the inner blob to carry a DEX magic.
    pub fn require_dex(mut self, require: bool) -> Self {
        self.require_dex = require;
        self
    }
}

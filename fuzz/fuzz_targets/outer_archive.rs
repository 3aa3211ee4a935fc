//! Fuzz target for central directory location and walking.
//!
//! Run with: cargo +nightly fuzz run outer_archive
//!
//! Properties checked:
//! - Locating never panics on malformed end records
//! - The walk terminates and stays inside the directory
//! - Shifting never panics and either fully succeeds or leaves the buffer alone

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut archive) = dexzip::OuterArchive::new(data.to_vec()) else {
        return;
    };

    let start = archive.directory_start();
    let end = archive.directory_end();
    for header in archive.headers() {
        assert!(header >= start && header < end);
    }
    let _ = archive.entries();

    let before = archive.as_bytes().to_vec();
    if archive.shift(0x70).is_err() {
        assert_eq!(archive.as_bytes(), &before[..]);
    }
});

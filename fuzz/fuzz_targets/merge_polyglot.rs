//! Fuzz target for the full merge pipeline with arbitrary input.
//!
//! The first byte picks how much of the input becomes the inner blob; the
//! rest is the outer archive. Any outcome is fine except a panic or hang.
//!
//! Run with: cargo +nightly fuzz run merge_polyglot

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = (split as usize).min(rest.len());
    let (inner, outer) = rest.split_at(split);

    if let Ok(merged) = dexzip::merge_polyglot(inner, outer) {
        // A successful merge must verify its own header fields
        let verification = dexzip::verify_merged(&merged, inner.len())
            .expect("merged output must parse");
        assert!(verification.length_ok());
        assert!(verification.signature_ok());
        assert!(verification.checksum_ok());
    }
});

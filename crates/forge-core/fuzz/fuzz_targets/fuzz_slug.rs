#![no_main]
use forge_core::slug::normalize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any UTF-8 input must normalize without panicking, and the result must
    // be stable under a second pass.
    if let Ok(text) = std::str::from_utf8(data) {
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
    }
});

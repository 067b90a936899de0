#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Conversion must either succeed or fail cleanly, never panic
    let mut out = Vec::new();
    match exiftags::listx::TagConverter::new().convert(data, &mut out) {
        Ok(_) => {
            // A successful run always produces a parseable document
            let value: serde_json::Value =
                serde_json::from_slice(&out).expect("converter produced invalid JSON");
            assert!(value["tags"].is_array());
        }
        Err(_) => {
            // Nothing past the failure point, so the closing literal is missing
            assert!(!out.ends_with(b"]}"));
        }
    }
});

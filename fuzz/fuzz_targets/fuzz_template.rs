#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let vars = serde_json::json!({ "order": { "code": "ORD1", "lines": [1, 2] } });
        let _ = qrfaktura::notify::render_template(s, &vars);
    }
});

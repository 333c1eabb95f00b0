#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; a valid IBAN must format and re-validate.
        if let Ok(iban) = qrfaktura::core::validate_iban(s) {
            let again = qrfaktura::core::validate_iban(&iban.formatted()).unwrap();
            assert_eq!(again, iban);
        }
    }
});

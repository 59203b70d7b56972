#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if let Ok(doc) = richdoc::deserialize_json(&input) {
        let encoded = richdoc::serialize_json(&doc).expect("decoded documents re-encode");
        let again = richdoc::deserialize_json(&encoded).expect("re-encoded snapshot decodes");
        assert_eq!(again, doc);
        let _ = richdoc::serialize_html(&again);
    }
});

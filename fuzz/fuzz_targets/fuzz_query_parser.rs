#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing may reject the input but must never panic
    let _ = docsift::query::parse_query(data);
});

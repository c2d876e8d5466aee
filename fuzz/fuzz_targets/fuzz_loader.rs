#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    raw: &'a str,
    query: &'a str,
    limit: i8,
}

fuzz_target!(|input: Input<'_>| {
    // Malformed indexes must come back as errors, never panics
    let Ok(store) = docsift::DocumentStore::load(input.raw) else {
        return;
    };

    let options = docsift::SearchOptions::default().with_limit(input.limit as i64);
    if let Ok(matches) = docsift::search(&store, input.query, &options) {
        for result in docsift::format(&matches) {
            assert!(result.snippet.chars().count() <= docsift::output::DEFAULT_SNIPPET_WIDTH);
        }
    }
});

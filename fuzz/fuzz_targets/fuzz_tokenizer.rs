#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let tokens = docsift::utils::normalize(data);
    let spans = docsift::utils::token_spans(data);
    assert_eq!(tokens.len(), spans.len());

    for (token, span) in tokens.iter().zip(&spans) {
        assert_eq!(*token, span.token);
        assert!(token.chars().count() >= docsift::utils::MIN_TOKEN_CHARS);
        // Spans must slice the input on char boundaries
        let _ = &data[span.range.clone()];
    }

    let _ = docsift::output::build_snippet(data, &tokens, 40);
});

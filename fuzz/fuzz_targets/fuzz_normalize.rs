#![no_main]

use libfuzzer_sys::fuzz_target;
use zapier_schema_core::{
    build_document, build_document_from_str, normalize, NormalizeOptions, Normalizer,
    ShapePolicy,
};

// Arbitrary bytes -> JSON -> normalize() and build_document().
// Goal: no panics, and the rejecting normalizer never disagrees with the
// plain one on input it accepts.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = build_document_from_str(text, &NormalizeOptions::default());

    if let Ok(node) = serde_json::from_str::<serde_json::Value>(text) {
        let plain = normalize(&node);

        let strict = Normalizer::new(NormalizeOptions {
            shape_policy: ShapePolicy::Reject,
            ..NormalizeOptions::default()
        });
        if let Ok(checked) = strict.normalize(&node) {
            assert_eq!(checked, plain);
        }

        let _ = build_document(&node, strict.options());
    }
});

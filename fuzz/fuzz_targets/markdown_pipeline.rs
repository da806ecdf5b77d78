#![no_main]

use libfuzzer_sys::fuzz_target;
use markdown::Markdown;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(markdown) = Markdown::new(text, None) else {
        return;
    };
    if let Err(err) = markdown.to_html() {
        panic!("conversion failed with {:?}: {err}", err.kind());
    }
});

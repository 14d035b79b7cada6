#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let once = html::to_html(&html::parse(input));
    let twice = html::to_html(&html::parse(&once));
    assert_eq!(once, twice, "serialization is not a fixed point");
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use spv_graph::front::spv::{parse_words, Options};

fuzz_target!(|data: Vec<u32>| {
    // Ensure the parser can handle potentially malformed data without crashing.
    let mut words = vec![spirv::MAGIC_NUMBER];
    words.extend(data);
    let _result = parse_words(&words, &Options::default());
});

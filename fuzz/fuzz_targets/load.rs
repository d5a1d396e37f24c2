#![no_main]

use fyaml::{yaml_parser_new, yaml_parser_set_input_string, Document};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| fuzz_target(data));

fn fuzz_target(mut data: &[u8]) {
    let mut parser = yaml_parser_new();
    yaml_parser_set_input_string(&mut parser, &mut data);

    while let Ok(mut document) = Document::load(&mut parser) {
        let done = document.get_root_node().is_none();
        if done {
            break;
        }
    }
}

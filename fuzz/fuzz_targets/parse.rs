#![no_main]

use fyaml::{EventData, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| fuzz_target(data));

fn fuzz_target(mut data: &[u8]) {
    let mut parser = Parser::new();
    parser.set_input_string(&mut data);

    while let Ok(event) = parser.parse() {
        let is_end = matches!(event.data, EventData::StreamEnd);
        if is_end {
            break;
        }
    }
}

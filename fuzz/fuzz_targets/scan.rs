#![no_main]

use fyaml::{Scanner, TokenData};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| fuzz_target(data));

fn fuzz_target(mut data: &[u8]) {
    let mut scanner = Scanner::new();
    scanner.set_input_string(&mut data);

    while let Ok(token) = Scanner::scan(&mut scanner) {
        let is_end = matches!(token.data, TokenData::StreamEnd);
        if is_end {
            break;
        }
    }
}

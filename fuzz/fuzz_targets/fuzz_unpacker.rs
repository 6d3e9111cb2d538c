#![no_main]

use libfuzzer_sys::fuzz_target;
use sdc::codec::SubstringUnpacker;
use sdc::encoding::replay_tokens;

fuzz_target!(|input: (&[u8], &[u8])| {
    // Arbitrary bytes as a token stream: the decoder may reject them but
    // must not panic or read out of bounds
    let (dict, stream) = input;
    let mut unpacker = SubstringUnpacker::new(dict);
    let _ = replay_tokens(stream, &mut unpacker);
});

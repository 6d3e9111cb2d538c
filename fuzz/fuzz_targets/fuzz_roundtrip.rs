#![no_main]

use libfuzzer_sys::fuzz_target;
use sdc::codec::{SubstringPacker, SubstringUnpacker};

fuzz_target!(|input: (&[u8], &[u8])| {
    // Any (dictionary, document) pair must round-trip exactly
    let (dict, doc) = input;
    let packer = SubstringPacker::new(dict);
    let mut unpacker = SubstringUnpacker::new(dict);
    packer.pack(doc, &mut unpacker).unwrap();
    assert_eq!(unpacker.take_document(), doc);
});

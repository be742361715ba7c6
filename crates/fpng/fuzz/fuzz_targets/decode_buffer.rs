#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let opts = fpng::DecoderOptions::new_fast()
        .set_max_width(1 << 12)
        .set_max_height(1 << 12);

    let mut decoder = fpng::PngDecoder::new_with_options(data, opts);
    let _ = decoder.decode_raw();
});

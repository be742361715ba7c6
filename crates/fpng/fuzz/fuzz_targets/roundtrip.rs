#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 2
    {
        let flags = fpng::CompressionFlags::from_bits_truncate(u32::from(data[0]));
        let channels = 3 + usize::from(data[1] & 1);
        let pixels = &data[2..];

        let width = (pixels.len() / channels).max(1);
        let pixels = &pixels[..(pixels.len() / channels) * channels];

        if pixels.is_empty()
        {
            return;
        }
        let png = fpng::encode(pixels, width, 1, channels, flags)
            .expect("Failed to encode a valid image");
        let decoded = fpng::decode(&png, channels).expect("Failed to decode our own output");

        assert!(
            decoded.pixels == pixels,
            "The decoded pixels don't match the original pixels"
        );
    }
});

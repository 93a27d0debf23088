#![no_main]

use libfuzzer_sys::fuzz_target;

// The first byte selects the restart handling, the rest is the JPEG stream.
fuzz_target!(|data: &[u8]| {
    let Some((&flags, data)) = data.split_first() else {
        return;
    };

    let settings = lumen_ljpeg::DecodeSettings {
        strict_restarts: flags & 1 != 0,
    };

    if let Ok(image) = lumen_ljpeg::decode(data, &settings) {
        let expected = usize::from(image.width) * usize::from(image.height) * image.num_components;
        assert_eq!(image.samples.len(), expected);
    }
});

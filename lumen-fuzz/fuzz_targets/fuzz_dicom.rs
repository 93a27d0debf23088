#![no_main]

use libfuzzer_sys::fuzz_target;
use lumen_dicom::{LoadSettings, MissingPixelPolicy};

fuzz_target!(|data: &[u8]| {
    let settings = LoadSettings {
        missing_pixels: MissingPixelPolicy::Error,
        max_pixels: 1 << 20,
        ..LoadSettings::default()
    };

    if let Ok(image) = lumen_dicom::load(data, &settings) {
        let expected = image.width() as usize * image.height() as usize * 4;
        assert_eq!(image.display.data.len(), expected);
    }

    let _ = lumen_dicom::scan(data);
});

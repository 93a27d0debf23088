//! Marker codes (ITU-T T.81, Table B.1), without the leading `0xFF`.

pub(crate) const SOF0: u8 = 0xC0;
pub(crate) const SOF3: u8 = 0xC3;
pub(crate) const SOF15: u8 = 0xCF;
pub(crate) const DHT: u8 = 0xC4;
pub(crate) const JPG: u8 = 0xC8;
pub(crate) const DAC: u8 = 0xCC;
pub(crate) const RST0: u8 = 0xD0;
pub(crate) const RST7: u8 = 0xD7;
pub(crate) const SOI: u8 = 0xD8;
pub(crate) const EOI: u8 = 0xD9;
pub(crate) const SOS: u8 = 0xDA;
pub(crate) const DQT: u8 = 0xDB;
pub(crate) const DNL: u8 = 0xDC;
pub(crate) const DRI: u8 = 0xDD;
pub(crate) const APP0: u8 = 0xE0;
pub(crate) const APP15: u8 = 0xEF;
pub(crate) const COM: u8 = 0xFE;

#[inline]
pub(crate) fn is_rst(marker: u8) -> bool {
    (RST0..=RST7).contains(&marker)
}

/// Whether the marker starts a frame of any coding process.
#[inline]
pub(crate) fn is_sof(marker: u8) -> bool {
    (SOF0..=SOF15).contains(&marker) && !matches!(marker, DHT | JPG | DAC)
}

#[inline]
pub(crate) fn is_app(marker: u8) -> bool {
    (APP0..=APP15).contains(&marker)
}

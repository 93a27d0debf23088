//! CRC-32 (IEEE 802.3, reflected polynomial `0xEDB88320`).

/// The lookup table for byte-wise CRC-32 computation.
pub const CRC_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0; 256];
    let mut i = 0;

    while i < 256 {
        let mut c = i as u32;
        let mut k = 0;

        while k < 8 {
            c = if c & 1 != 0 {
                0xEDB8_8320 ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }

        table[i] = c;
        i += 1;
    }

    table
}

/// Compute the CRC-32 checksum of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let crc = data.iter().fold(0xFFFF_FFFF_u32, |crc, &b| {
        CRC_TABLE[((crc ^ u32::from(b)) & 0xff) as usize] ^ (crc >> 8)
    });

    crc ^ 0xFFFF_FFFF
}

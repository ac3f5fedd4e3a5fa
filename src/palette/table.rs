use crate::foundation::error::{StitchError, StitchResult};

/// Base colors of the standard map palette, in protocol order. A color
/// index is `base * 4 + shade`; base 0 is fully transparent.
const BASE_COLORS: [[u8; 3]; 62] = [
    [0, 0, 0],
    [127, 178, 56],
    [247, 233, 163],
    [199, 199, 199],
    [255, 0, 0],
    [160, 160, 255],
    [167, 167, 167],
    [0, 124, 0],
    [255, 255, 255],
    [164, 168, 184],
    [151, 109, 77],
    [112, 112, 112],
    [64, 64, 255],
    [143, 119, 72],
    [255, 252, 245],
    [216, 127, 51],
    [178, 76, 216],
    [102, 153, 216],
    [229, 229, 51],
    [126, 229, 55],
    [242, 127, 165],
    [76, 76, 76],
    [153, 153, 153],
    [76, 127, 153],
    [127, 63, 178],
    [51, 76, 178],
    [102, 76, 51],
    [102, 127, 51],
    [153, 51, 51],
    [25, 25, 25],
    [250, 238, 77],
    [92, 219, 213],
    [74, 128, 255],
    [0, 217, 58],
    [129, 86, 49],
    [112, 2, 0],
    [209, 177, 161],
    [159, 82, 36],
    [149, 87, 108],
    [112, 108, 138],
    [186, 133, 36],
    [103, 117, 53],
    [160, 77, 78],
    [57, 41, 35],
    [135, 107, 98],
    [87, 92, 92],
    [122, 73, 88],
    [76, 62, 92],
    [76, 50, 35],
    [76, 82, 42],
    [142, 60, 46],
    [37, 22, 16],
    [189, 48, 49],
    [148, 63, 97],
    [92, 25, 29],
    [22, 126, 134],
    [58, 142, 140],
    [86, 44, 62],
    [20, 180, 133],
    [100, 100, 100],
    [216, 175, 147],
    [127, 167, 150],
];

/// Per-shade brightness multipliers, applied as `floor(c * m / 255)`.
const SHADE_MULTIPLIERS: [u16; 4] = [180, 220, 255, 135];

/// Fixed color-index to RGBA lookup table.
///
/// Built once and read-only thereafter. The table is meant to be total
/// over every index the protocol emits; hitting a gap during decode is a
/// fatal configuration error, not a per-pixel fallback.
#[derive(Clone, Debug)]
pub struct Palette {
    entries: [Option<[u8; 4]>; 256],
}

impl Palette {
    /// Build the standard palette: each base color times the four shade
    /// multipliers, with base 0 fully transparent.
    pub fn standard() -> Self {
        let mut entries = [None; 256];
        for (base, rgb) in BASE_COLORS.iter().enumerate() {
            for (shade, &mult) in SHADE_MULTIPLIERS.iter().enumerate() {
                let rgba = if base == 0 {
                    [0, 0, 0, 0]
                } else {
                    [
                        shade_channel(rgb[0], mult),
                        shade_channel(rgb[1], mult),
                        shade_channel(rgb[2], mult),
                        255,
                    ]
                };
                entries[base * 4 + shade] = Some(rgba);
            }
        }
        Self { entries }
    }

    /// Look up one color index. `None` marks a gap in the table.
    pub fn rgba(&self, index: u8) -> Option<[u8; 4]> {
        self.entries[usize::from(index)]
    }

    /// Decode a flat buffer of color indices into a flat RGBA buffer,
    /// four output bytes per input byte.
    pub fn decode(&self, indices: &[u8]) -> StitchResult<Vec<u8>> {
        let mut out = Vec::with_capacity(indices.len() * 4);
        for &index in indices {
            let rgba = self.rgba(index).ok_or_else(|| {
                StitchError::palette(format!("no palette entry for color index {index}"))
            })?;
            out.extend_from_slice(&rgba);
        }
        Ok(out)
    }
}

fn shade_channel(c: u8, mult: u16) -> u8 {
    ((u16::from(c) * mult) / 255) as u8
}

//! Colormaps for composite layers.
//!
//! Every colormap is a 256-entry lookup table indexed by a display value
//! already normalized and stretched to [0, 1].

use solar_map::ColormapKind;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Source-over compositing of `self` onto `dst`.
    pub fn over(self, dst: Color) -> Color {
        match self.a {
            255 => self,
            0 => dst,
            _ => {
                let sa = self.a as f32 / 255.0;
                let da = dst.a as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                let blend = |s: u8, d: u8| {
                    let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                    v.round().clamp(0.0, 255.0) as u8
                };
                Color::new(
                    blend(self.r, dst.r),
                    blend(self.g, dst.g),
                    blend(self.b, dst.b),
                    (out_a * 255.0).round() as u8,
                )
            }
        }
    }
}

/// Linear interpolation between two colors, `t` clamped to [0, 1].
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Number of entries in every lookup table.
pub const TABLE_SIZE: usize = 256;

/// A 256-entry colormap.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    table: Vec<Color>,
}

impl Colormap {
    /// Lookup table for a layer's colormap.
    pub fn for_kind(kind: ColormapKind) -> Self {
        match kind {
            ColormapKind::Gray => Self::from_channels(ramp, ramp, ramp),
            ColormapKind::RedTemperature => Self::from_channels(red_temp_r, red_temp_g, red_temp_b),
            ColormapKind::Aia(wavelength) => Self::aia(wavelength),
            ColormapKind::KcorNrgf => Self {
                table: KCOR_NRGF_TABLE.iter().map(|[r, g, b]| Color::rgb(*r, *g, *b)).collect(),
            },
        }
    }

    /// Piecewise-linear colormap through `(position, color)` stops.
    pub fn from_stops(stops: &[(f32, Color)]) -> Self {
        let table = (0..TABLE_SIZE)
            .map(|i| {
                let t = i as f32 / (TABLE_SIZE - 1) as f32;
                match stops.iter().position(|(pos, _)| *pos >= t) {
                    None => stops.last().map(|(_, c)| *c).unwrap_or(Color::BLACK),
                    Some(0) => stops[0].1,
                    Some(k) => {
                        let (p0, c0) = stops[k - 1];
                        let (p1, c1) = stops[k];
                        let span = p1 - p0;
                        if span <= 0.0 {
                            c1
                        } else {
                            interpolate_color(c0, c1, (t - p0) / span)
                        }
                    }
                }
            })
            .collect();
        Self { table }
    }

    fn from_channels(r: fn(usize) -> f64, g: fn(usize) -> f64, b: fn(usize) -> f64) -> Self {
        let channel = |f: fn(usize) -> f64, i: usize| f(i).round().clamp(0.0, 255.0) as u8;
        let table = (0..TABLE_SIZE)
            .map(|i| Color::rgb(channel(r, i), channel(g, i), channel(b, i)))
            .collect();
        Self { table }
    }

    /// SDO/AIA channel tables, built from the red temperature table and
    /// power-law ramps. Unrecognized wavelengths fall back to gray.
    fn aia(wavelength: u32) -> Self {
        match wavelength {
            94 => Self::from_channels(square, root_mix, ramp),
            131 => Self::from_channels(red_temp_g, red_temp_r, red_temp_r),
            171 => Self::from_channels(red_temp_r, ramp, red_temp_b),
            193 => Self::from_channels(root, ramp, square),
            211 => Self::from_channels(root, ramp, root_mix),
            304 => Self::from_channels(red_temp_r, red_temp_g, red_temp_b),
            335 => Self::from_channels(square, ramp, root),
            1600 => Self::from_channels(root_mix, root_mix, square),
            1700 => Self::from_channels(root, ramp, ramp),
            4500 => Self::from_channels(ramp, ramp, |i| red_temp_b(i) / 2.0),
            _ => Self::from_channels(ramp, ramp, ramp),
        }
    }

    /// Color for a display value in [0, 1]; values outside are clamped.
    #[inline]
    pub fn lookup(&self, t: f64) -> Color {
        let idx = (t.clamp(0.0, 1.0) * (TABLE_SIZE - 1) as f64).round() as usize;
        self.table[idx.min(self.table.len() - 1)]
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.table
    }
}

fn ramp(i: usize) -> f64 {
    i as f64
}

fn root(i: usize) -> f64 {
    (i as f64 * 255.0).sqrt()
}

fn square(i: usize) -> f64 {
    (i * i) as f64 / 255.0
}

fn root_mix(i: usize) -> f64 {
    (root(i) + i as f64 / 2.0) * 255.0 / 382.5
}

// IDL color table 3 (red temperature)
fn red_temp_r(i: usize) -> f64 {
    (i as f64 * 255.0 / 176.0).min(255.0)
}

fn red_temp_g(i: usize) -> f64 {
    if i < 120 {
        0.0
    } else {
        (i - 120) as f64 * 255.0 / 135.0
    }
}

fn red_temp_b(i: usize) -> f64 {
    if i < 190 {
        0.0
    } else {
        (i - 190) as f64 * 255.0 / 65.0
    }
}

/// Display table for radially filtered K-Cor products.
#[rustfmt::skip]
pub const KCOR_NRGF_TABLE: [[u8; 3]; 256] = [
    [0, 0, 0], [1, 0, 2], [1, 1, 3], [2, 1, 5], [3, 1, 6], [4, 2, 8],
    [4, 2, 10], [5, 2, 11], [6, 2, 13], [6, 3, 14], [7, 3, 16], [8, 3, 18],
    [8, 4, 19], [9, 4, 21], [10, 4, 22], [10, 4, 24], [11, 5, 26], [12, 5, 27],
    [13, 5, 29], [13, 6, 30], [14, 6, 32], [15, 6, 34], [15, 7, 35], [16, 7, 37],
    [17, 7, 38], [18, 8, 40], [18, 8, 42], [19, 8, 43], [20, 8, 45], [20, 9, 46],
    [21, 9, 48], [22, 9, 50], [22, 10, 51], [23, 10, 53], [24, 10, 54], [24, 10, 56],
    [25, 11, 58], [26, 11, 59], [27, 11, 61], [27, 12, 62], [28, 12, 64], [30, 12, 65],
    [31, 13, 66], [33, 13, 67], [34, 14, 68], [36, 14, 69], [37, 14, 70], [39, 15, 71],
    [40, 15, 72], [42, 16, 73], [43, 16, 74], [45, 16, 75], [46, 17, 76], [48, 17, 76],
    [49, 18, 77], [51, 18, 78], [52, 18, 79], [54, 19, 80], [55, 19, 81], [57, 20, 82],
    [58, 20, 83], [60, 20, 84], [61, 21, 85], [63, 21, 86], [64, 22, 87], [66, 22, 88],
    [68, 22, 89], [69, 23, 90], [71, 23, 91], [72, 24, 92], [74, 24, 93], [75, 24, 94],
    [77, 25, 95], [78, 25, 96], [80, 26, 97], [81, 26, 98], [83, 26, 99], [84, 27, 100],
    [86, 27, 100], [87, 28, 101], [89, 28, 102], [90, 28, 103], [92, 29, 104], [93, 29, 105],
    [95, 30, 106], [96, 30, 107], [98, 30, 108], [99, 31, 109], [101, 31, 110], [102, 32, 111],
    [104, 32, 112], [106, 33, 111], [108, 33, 110], [110, 34, 110], [111, 35, 109], [113, 36, 108],
    [115, 36, 107], [117, 37, 106], [119, 38, 106], [121, 38, 105], [122, 39, 104], [124, 40, 103],
    [126, 41, 102], [128, 41, 102], [130, 42, 101], [132, 43, 100], [133, 44, 99], [135, 44, 98],
    [137, 45, 98], [139, 46, 97], [141, 46, 96], [143, 47, 95], [144, 48, 94], [146, 49, 94],
    [148, 49, 93], [150, 50, 92], [152, 51, 91], [154, 51, 90], [156, 52, 90], [157, 53, 89],
    [159, 54, 88], [161, 54, 87], [163, 55, 86], [165, 56, 86], [167, 56, 85], [168, 57, 84],
    [170, 58, 83], [172, 59, 82], [174, 59, 82], [176, 60, 81], [178, 61, 80], [179, 62, 79],
    [181, 62, 78], [183, 63, 78], [185, 64, 77], [187, 64, 76], [189, 65, 75], [190, 66, 74],
    [192, 67, 74], [194, 67, 73], [196, 68, 72], [197, 70, 71], [198, 71, 71], [199, 73, 70],
    [200, 74, 70], [201, 76, 69], [202, 78, 68], [203, 79, 68], [204, 81, 67], [204, 82, 67],
    [205, 84, 66], [206, 86, 65], [207, 87, 65], [208, 89, 64], [209, 90, 64], [210, 92, 63],
    [211, 94, 62], [212, 95, 62], [213, 97, 61], [214, 98, 61], [215, 100, 60], [216, 102, 59],
    [217, 103, 59], [218, 105, 58], [219, 106, 58], [220, 108, 57], [220, 110, 56], [221, 111, 56],
    [222, 113, 55], [223, 114, 55], [224, 116, 54], [225, 118, 53], [226, 119, 53], [227, 121, 52],
    [228, 122, 52], [229, 124, 51], [230, 126, 50], [231, 127, 50], [232, 129, 49], [233, 130, 49],
    [234, 132, 48], [235, 134, 47], [235, 135, 47], [236, 137, 46], [237, 138, 46], [238, 140, 45],
    [239, 142, 44], [240, 143, 44], [241, 145, 43], [242, 146, 43], [243, 148, 42], [243, 150, 44],
    [244, 152, 46], [244, 153, 48], [244, 155, 50], [244, 157, 52], [245, 158, 53], [245, 160, 55],
    [245, 162, 57], [245, 164, 59], [246, 166, 61], [246, 167, 63], [246, 169, 65], [247, 171, 67],
    [247, 172, 69], [247, 174, 70], [247, 176, 72], [248, 178, 74], [248, 180, 76], [248, 181, 78],
    [248, 183, 80], [249, 185, 82], [249, 186, 84], [249, 188, 86], [250, 190, 88], [250, 192, 90],
    [250, 194, 91], [250, 195, 93], [251, 197, 95], [251, 199, 97], [251, 200, 99], [252, 202, 101],
    [252, 204, 103], [252, 206, 105], [252, 208, 107], [253, 209, 108], [253, 211, 110], [253, 213, 112],
    [253, 214, 114], [254, 216, 116], [254, 218, 118], [254, 219, 123], [254, 221, 129], [254, 222, 134],
    [254, 224, 140], [254, 225, 145], [254, 227, 151], [254, 228, 156], [254, 230, 162], [254, 231, 167],
    [254, 233, 173], [254, 234, 178], [254, 236, 184], [255, 237, 189], [255, 239, 195], [255, 240, 200],
    [255, 242, 206], [255, 243, 211], [255, 245, 217], [255, 246, 222], [255, 248, 228], [255, 249, 233],
    [255, 251, 239], [255, 252, 244], [255, 254, 250], [255, 255, 255],
];

use crate::ports::TextMeasure;
use rand::seq::SliceRandom;
use rand::Rng;

/// matplotlib's `tab10` colors.
pub const TAB10: [[u8; 3]; 10] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
    [188, 189, 34],
    [23, 190, 207],
];

#[derive(Debug, Clone, PartialEq)]
pub struct CloudConfig {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub min_font_size: u32,
    /// Size of the most frequent word. Defaults to the canvas height.
    pub max_font_size: Option<u32>,
    pub font_step: u32,
    /// How much frequency differences drive size differences, 0.0 to 1.0.
    pub relative_scaling: f32,
    /// Free pixels kept around each word.
    pub margin: u32,
    pub background: [u8; 3],
    pub palette: Vec<[u8; 3]>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            max_words: 200,
            min_font_size: 4,
            max_font_size: None,
            font_step: 1,
            relative_scaling: 0.5,
            margin: 2,
            background: [255, 255, 255],
            palette: TAB10.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub font_size: u32,
    /// Top-left corner of the word's box.
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudLayout {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub words: Vec<PlacedWord>,
}

/// Lays out `frequencies` (most frequent first) on the configured canvas.
///
/// Each word's size is scaled from the previous word's by their frequency
/// ratio. A word that finds no free spot shrinks until it fits; once it
/// would drop below the minimum size, layout stops.
pub fn layout<M, R>(frequencies: &[(String, usize)], config: &CloudConfig, measure: &M, rng: &mut R) -> CloudLayout
where
    M: TextMeasure + ?Sized,
    R: Rng + ?Sized,
{
    let mut placed = Vec::new();
    let mut canvas = Occupancy::new(config.width, config.height);

    let mut words: Vec<&(String, usize)> = frequencies.iter().filter(|(_, f)| *f > 0).collect();
    words.sort_by(|a, b| b.1.cmp(&a.1));
    words.truncate(config.max_words);

    let max_frequency = match words.first() {
        Some((_, f)) => *f as f32,
        None => return empty_layout(config),
    };

    let step = config.font_step.max(1);
    let scaling = config.relative_scaling.clamp(0.0, 1.0);
    let mut font_size = config.max_font_size.unwrap_or(config.height);
    let mut last_frequency = 1.0_f32;

    for (text, frequency) in words {
        let frequency = *frequency as f32 / max_frequency;
        if scaling != 0.0 {
            let ratio = scaling * (frequency / last_frequency) + (1.0 - scaling);
            font_size = (ratio * font_size as f32).round() as u32;
        }

        let mut spot = None;
        while font_size >= config.min_font_size {
            let (width, height) = measure.measure(text, font_size);
            if width == 0 || height == 0 {
                break;
            }
            if let Some((x, y)) = canvas.sample_free(width + config.margin, height + config.margin, rng) {
                spot = Some((x, y, width, height));
                break;
            }
            font_size = font_size.saturating_sub(step);
        }

        if font_size < config.min_font_size {
            break;
        }
        let Some((x, y, width, height)) = spot else {
            continue;
        };

        canvas.fill(x, y, width + config.margin, height + config.margin);
        placed.push(PlacedWord {
            text: text.clone(),
            font_size,
            x,
            y,
            width,
            height,
            color: config.palette.choose(rng).copied().unwrap_or([0, 0, 0]),
        });
        last_frequency = frequency;
    }

    CloudLayout {
        width: config.width,
        height: config.height,
        background: config.background,
        words: placed,
    }
}

/// Parses `#rrggbb` (the `#` is optional).
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn empty_layout(config: &CloudConfig) -> CloudLayout {
    CloudLayout {
        width: config.width,
        height: config.height,
        background: config.background,
        words: Vec::new(),
    }
}

/// Occupied-pixel mask with a summed-area table for O(1) box queries.
struct Occupancy {
    width: usize,
    height: usize,
    filled: Vec<bool>,
    // (width + 1) * (height + 1), row-major, first row and column zero
    integral: Vec<u32>,
}

impl Occupancy {
    fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            filled: vec![false; width * height],
            integral: vec![0; (width + 1) * (height + 1)],
        }
    }

    fn box_sum(&self, x: usize, y: usize, w: usize, h: usize) -> u32 {
        let stride = self.width + 1;
        let a = self.integral[y * stride + x];
        let b = self.integral[y * stride + x + w];
        let c = self.integral[(y + h) * stride + x];
        let d = self.integral[(y + h) * stride + x + w];
        d + a - b - c
    }

    /// Picks a uniformly random top-left corner where a `w`×`h` box is free.
    fn sample_free<R: Rng + ?Sized>(&self, w: u32, h: u32, rng: &mut R) -> Option<(u32, u32)> {
        let (w, h) = (w as usize, h as usize);
        if w > self.width || h > self.height {
            return None;
        }

        let free = |x: usize, y: usize| self.box_sum(x, y, w, h) == 0;
        let candidates = || {
            (0..=self.height - h).flat_map(move |y| (0..=self.width - w).map(move |x| (x, y)))
        };

        let count = candidates().filter(|&(x, y)| free(x, y)).count();
        if count == 0 {
            return None;
        }
        let pick = rng.gen_range(0..count);
        candidates()
            .filter(|&(x, y)| free(x, y))
            .nth(pick)
            .map(|(x, y)| (x as u32, y as u32))
    }

    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let x_end = (x + w).min(self.width as u32) as usize;
        let y_end = (y + h).min(self.height as u32) as usize;
        for row in y as usize..y_end {
            for col in x as usize..x_end {
                self.filled[row * self.width + col] = true;
            }
        }
        self.rebuild_integral();
    }

    fn rebuild_integral(&mut self) {
        let stride = self.width + 1;
        for row in 0..self.height {
            let mut row_sum = 0;
            for col in 0..self.width {
                row_sum += u32::from(self.filled[row * self.width + col]);
                self.integral[(row + 1) * stride + col + 1] = self.integral[row * stride + col + 1] + row_sum;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Every character is 0.6 em wide and one em tall.
    struct Monospace;

    impl TextMeasure for Monospace {
        fn measure(&self, text: &str, font_size: u32) -> (u32, u32) {
            let chars = text.chars().count() as f32;
            ((chars * font_size as f32 * 0.6).ceil() as u32, font_size)
        }
    }

    fn frequencies(list: &[(&str, usize)]) -> Vec<(String, usize)> {
        list.iter().map(|(w, f)| (w.to_string(), *f)).collect()
    }

    fn small_config() -> CloudConfig {
        CloudConfig {
            width: 200,
            height: 150,
            ..CloudConfig::default()
        }
    }

    fn overlaps(a: &PlacedWord, b: &PlacedWord) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ffffff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("1f77b4"), Some([31, 119, 180]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn test_layout_empty_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let layout = layout(&[], &small_config(), &Monospace, &mut rng);
        assert!(layout.words.is_empty());
        assert_eq!((layout.width, layout.height), (200, 150));
    }

    #[test]
    fn test_layout_words_stay_inside_and_do_not_overlap() {
        let mut rng = StdRng::seed_from_u64(7);
        let freqs = frequencies(&[
            ("rust", 20),
            ("cargo", 12),
            ("crate", 9),
            ("trait", 7),
            ("borrow", 5),
            ("lifetime", 4),
            ("macro", 3),
            ("async", 2),
            ("unsafe", 1),
        ]);
        let config = small_config();
        let layout = layout(&freqs, &config, &Monospace, &mut rng);

        assert!(!layout.words.is_empty());
        for (i, word) in layout.words.iter().enumerate() {
            assert!(word.x + word.width <= config.width);
            assert!(word.y + word.height <= config.height);
            assert!(word.font_size >= config.min_font_size);
            assert!(config.palette.contains(&word.color));
            for other in &layout.words[i + 1..] {
                assert!(!overlaps(word, other), "{} overlaps {}", word.text, other.text);
            }
        }
    }

    #[test]
    fn test_layout_most_frequent_word_is_largest() {
        let mut rng = StdRng::seed_from_u64(3);
        let freqs = frequencies(&[("small", 1), ("big", 10)]);
        let layout = layout(&freqs, &small_config(), &Monospace, &mut rng);

        assert_eq!(layout.words[0].text, "big");
        assert!(layout.words.iter().all(|w| w.font_size <= layout.words[0].font_size));
    }

    #[test]
    fn test_layout_respects_max_words() {
        let mut rng = StdRng::seed_from_u64(5);
        let freqs = frequencies(&[("aa", 3), ("bb", 2), ("cc", 1)]);
        let config = CloudConfig {
            max_words: 2,
            ..small_config()
        };
        let layout = layout(&freqs, &config, &Monospace, &mut rng);

        assert!(layout.words.len() <= 2);
        assert!(layout.words.iter().all(|w| w.text != "cc"));
    }

    #[test]
    fn test_layout_same_seed_same_result() {
        let freqs = frequencies(&[("alpha", 4), ("beta", 2), ("gamma", 1)]);
        let first = layout(&freqs, &small_config(), &Monospace, &mut StdRng::seed_from_u64(42));
        let second = layout(&freqs, &small_config(), &Monospace, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_layout_word_too_wide_for_canvas_shrinks() {
        let mut rng = StdRng::seed_from_u64(9);
        let freqs = frequencies(&[("extraordinarily", 1)]);
        let config = small_config();
        let layout = layout(&freqs, &config, &Monospace, &mut rng);

        assert_eq!(layout.words.len(), 1);
        assert!(layout.words[0].width + config.margin <= config.width);
    }
}

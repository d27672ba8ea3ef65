// Histogram charts shared by the histogram and equalization demos.

use image::RgbImage;
use image::imageops::flip_vertical_in_place;
use imageproc::drawing::draw_line_segment_mut;

use crate::draw::{BLACK, WHITE};

pub const BINS: usize = 256;
pub const CHART_WIDTH: u32 = BINS as u32;
pub const CHART_HEIGHT: u32 = 300;

/// Min/max stretch of the bin counts into [0, 255], rounded half to even.
/// A flat histogram maps to all zeros.
pub fn normalize_bins(counts: &[u32; BINS]) -> [u32; BINS] {
    let lo = counts.iter().copied().min().unwrap_or(0);
    let hi = counts.iter().copied().max().unwrap_or(0);
    let mut out = [0u32; BINS];
    if hi == lo {
        return out;
    }
    let scale = 255.0 / (hi - lo) as f64;
    for (o, &c) in out.iter_mut().zip(counts) {
        *o = ((c - lo) as f64 * scale).round_ties_even() as u32;
    }
    out
}

/// How a histogram is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartStyle {
    /// One vertical bar per bin.
    Bars,
    /// A single line through every bin's height.
    Curve,
}

/// Draw `counts` black on a white 256×300 canvas, bin 0 at the lower left.
pub fn histogram_chart(counts: &[u32; BINS], style: ChartStyle) -> RgbImage {
    let heights = normalize_bins(counts);
    let mut canvas = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, WHITE);

    // drawn with y growing upwards, then flipped
    match style {
        ChartStyle::Bars => {
            for (x, &y) in heights.iter().enumerate() {
                draw_line_segment_mut(&mut canvas, (x as f32, 0.0), (x as f32, y as f32), BLACK);
            }
        }
        ChartStyle::Curve => {
            for (x, pair) in heights.windows(2).enumerate() {
                draw_line_segment_mut(
                    &mut canvas,
                    (x as f32, pair[0] as f32),
                    ((x + 1) as f32, pair[1] as f32),
                    BLACK,
                );
            }
        }
    }
    flip_vertical_in_place(&mut canvas);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_height(chart: &RgbImage, x: u32) -> u32 {
        (0..CHART_HEIGHT).filter(|&y| *chart.get_pixel(x, y) == BLACK).count() as u32
    }

    #[test]
    fn normalization_stretches_to_full_range() {
        let mut counts = [10u32; BINS];
        counts[3] = 1010;
        let out = normalize_bins(&counts);
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 0);
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut counts = [0u32; BINS];
        for (i, c) in counts.iter_mut().enumerate() {
            *c = ((i * 37 + 11) % 1000) as u32;
        }
        let once = normalize_bins(&counts);
        assert_eq!(once.iter().max(), Some(&255));
        assert_eq!(once.iter().min(), Some(&0));
        assert_eq!(normalize_bins(&once), once);
    }

    #[test]
    fn flat_histogram_normalizes_to_zero() {
        assert_eq!(normalize_bins(&[7; BINS]), [0; BINS]);
    }

    #[test]
    fn rounds_half_to_even() {
        let mut counts = [0u32; BINS];
        counts[0] = 2;
        counts[1] = 1; // 127.5 -> 128
        let out = normalize_bins(&counts);
        assert_eq!(out[1], 128);
        counts[0] = 510;
        counts[1] = 1; // 0.5 -> 0
        assert_eq!(normalize_bins(&counts)[1], 0);
    }

    #[test]
    fn bars_grow_from_the_bottom() {
        let mut counts = [0u32; BINS];
        counts[0] = 100;
        counts[200] = 50;
        let chart = histogram_chart(&counts, ChartStyle::Bars);
        assert_eq!(chart.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
        assert_eq!(*chart.get_pixel(0, CHART_HEIGHT - 1), BLACK);
        assert_eq!(column_height(&chart, 0), 256);
        assert_eq!(column_height(&chart, 200), 129); // 127.5 -> 128, plus the base pixel
        assert_eq!(*chart.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn curve_touches_every_bin_height() {
        let mut counts = [0u32; BINS];
        counts[128] = 40;
        let chart = histogram_chart(&counts, ChartStyle::Curve);
        // the peak sits 255 rows above the baseline
        assert_eq!(*chart.get_pixel(128, CHART_HEIGHT - 1 - 255), BLACK);
        assert_eq!(*chart.get_pixel(10, CHART_HEIGHT - 1), BLACK);
        assert_eq!(*chart.get_pixel(10, CHART_HEIGHT - 2), WHITE);
    }
}

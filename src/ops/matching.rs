// Template matching by correlation coefficient (zero-mean normalized
// cross-correlation), built on imageproc's raw cross-correlation sums.
// Visual: a score of 1 means the window is the template up to brightness
// and contrast; flat windows score 0.

use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, integral_squared_image, sum_image_pixels};
use imageproc::template_matching::{MatchTemplateMethod, find_extremes, match_template};

/// One score per template placement; (x, y) is the placement's top-left corner.
pub type ScoreMap = Image<Luma<f32>>;

/// Best placement of a template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    pub location: (u32, u32),
    pub score: f32,
}

/// Score every placement of `template` inside `image`.
///
/// Each score is Σ(I−Ī)(T−T̄) / √(Σ(I−Ī)²·Σ(T−T̄)²) over the window, so it is
/// unchanged when the window gets brighter, darker or more contrasty. The map
/// is (W−w+1)×(H−h+1); it is empty when the template is empty or does not
/// fit. Placements where the window or the template is flat score 0.
pub fn correlate(image: &GrayImage, template: &GrayImage) -> ScoreMap {
    let (iw, ih) = image.dimensions();
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > iw || th > ih {
        return ScoreMap::new(0, 0);
    }

    let n = (tw as u64 * th as u64) as f64;
    let (t_sum, t_sq_sum) = template
        .pixels()
        .fold((0u64, 0u64), |(s, q), p| {
            let v = p[0] as u64;
            (s + v, q + v * v)
        });
    // n·Σ(T−T̄)², exact in integers
    let t_spread = (n * t_sq_sum as f64) - (t_sum as f64).powi(2);

    let sums: Image<Luma<u64>> = integral_image(image);
    let squares: Image<Luma<u64>> = integral_squared_image(image);
    let mut scores = match_template(image, template, MatchTemplateMethod::CrossCorrelation);

    for (x, y, p) in scores.enumerate_pixels_mut() {
        let (right, bottom) = (x + tw - 1, y + th - 1);
        let i_sum = sum_image_pixels(&sums, x, y, right, bottom)[0] as f64;
        let i_sq_sum = sum_image_pixels(&squares, x, y, right, bottom)[0] as f64;
        let i_spread = n * i_sq_sum - i_sum * i_sum;

        let denom = (i_spread * t_spread).sqrt();
        p[0] = if i_spread <= 0.0 || t_spread <= 0.0 || !denom.is_finite() {
            0.0
        } else {
            let numer = n * p[0] as f64 - i_sum * t_sum as f64;
            (numer / denom).clamp(-1.0, 1.0) as f32
        };
    }
    scores
}

/// Global maximum of a score map.
pub fn best_match(scores: &ScoreMap) -> Option<Match> {
    if scores.width() == 0 || scores.height() == 0 {
        return None;
    }
    let extremes = find_extremes(scores);
    Some(Match {
        location: extremes.max_value_location,
        score: extremes.max_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            let v = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
            Luma([(v % 251) as u8 + 2])
        })
    }

    #[test]
    fn finds_cropped_patch_where_it_came_from() {
        let img = textured(60, 50);
        let template = image::imageops::crop_imm(&img, 17, 9, 12, 8).to_image();
        let scores = correlate(&img, &template);
        assert_eq!(scores.dimensions(), (49, 43));
        let best = best_match(&scores).expect("non-empty map");
        assert_eq!(best.location, (17, 9));
        assert!((best.score - 1.0).abs() < 1e-3, "score {}", best.score);
    }

    #[test]
    fn darkened_patch_still_matches_in_place() {
        // two-tone textured template: left half near 100, right half near 200
        let template = GrayImage::from_fn(20, 20, |x, y| {
            let base = if x < 10 { 100 } else { 200 };
            Luma([base + ((x * 7 + y * 13) % 11) as u8])
        });
        // flat scene with the template pasted 90 levels darker at (60, 10)
        let mut scene = GrayImage::from_pixel(100, 40, Luma([200]));
        for (x, y, p) in template.enumerate_pixels() {
            scene.put_pixel(60 + x, 10 + y, Luma([p[0] - 90]));
        }

        let best = best_match(&correlate(&scene, &template)).expect("match");
        assert_eq!(best.location, (60, 10));
        assert!((best.score - 1.0).abs() < 1e-3, "score {}", best.score);
    }

    #[test]
    fn inverted_patch_scores_minus_one() {
        let template = textured(6, 5);
        let inverted = GrayImage::from_fn(6, 5, |x, y| Luma([255 - template.get_pixel(x, y)[0]]));
        let scores = correlate(&inverted, &template);
        assert_eq!(scores.dimensions(), (1, 1));
        assert!((scores.get_pixel(0, 0)[0] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn oversized_template_gives_empty_map() {
        let img = textured(10, 10);
        let template = textured(11, 4);
        let scores = correlate(&img, &template);
        assert_eq!(scores.dimensions(), (0, 0));
        assert!(best_match(&scores).is_none());
    }

    #[test]
    fn flat_windows_and_flat_templates_score_zero() {
        let img = GrayImage::new(8, 8);
        let scores = correlate(&img, &textured(3, 3));
        assert!(scores.pixels().all(|p| p[0] == 0.0));

        let flat_template = GrayImage::from_pixel(3, 3, Luma([9]));
        let scores = correlate(&textured(8, 8), &flat_template);
        assert!(scores.pixels().all(|p| p[0] == 0.0));
    }
}

// Contrast Limited Adaptive Histogram Equalization.
//
// The image is split into a grid of tiles; each tile gets its own clipped
// histogram and CDF lookup table, and every pixel is mapped by bilinear
// interpolation between the four nearest tile tables so tile borders do not
// show.

use image::GrayImage;

const BINS: usize = 256;

/// Equalize `image` with a `tiles`×`tiles` grid.
///
/// `clip_limit` is relative to a flat histogram (2.0 lets a bin hold twice
/// its uniform share); `0` disables clipping. A grid of 0 is treated as 1 and
/// the grid never has more tiles than the image has pixels along an axis.
pub fn clahe(image: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return image.clone();
    }
    let (w, h) = (w as usize, h as usize);
    let tiles_x = (tiles.max(1) as usize).min(w);
    let tiles_y = (tiles.max(1) as usize).min(h);
    let tile_w = w / tiles_x;
    let tile_h = h / tiles_y;
    let grey = image.as_raw();

    // 1. Clipped histogram + CDF lookup table per tile
    let mut maps = vec![[0u8; BINS]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = if tx == tiles_x - 1 { w } else { x0 + tile_w };
            let y1 = if ty == tiles_y - 1 { h } else { y0 + tile_h };
            let tile_pixels = ((x1 - x0) * (y1 - y0)) as u32;

            let mut hist = [0u32; BINS];
            for row in y0..y1 {
                for &v in &grey[row * w + x0..row * w + x1] {
                    hist[v as usize] += 1;
                }
            }

            if clip_limit > 0.0 {
                clip_histogram(&mut hist, clip_limit, tile_pixels);
            }

            let scale = 255.0 / tile_pixels as f32;
            let mut sum = 0u32;
            let lut = &mut maps[ty * tiles_x + tx];
            for (bin, out) in hist.iter().zip(lut.iter_mut()) {
                sum += bin;
                *out = (sum as f32 * scale).round().min(255.0) as u8;
            }
        }
    }

    // 2. Map each pixel by interpolating between the 4 nearest tile tables
    let tw_f = tile_w as f32;
    let th_f = tile_h as f32;
    let last_tx = tiles_x as i32 - 1;
    let last_ty = tiles_y as i32 - 1;

    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        let pixel = grey[y as usize * w + x as usize] as usize;

        let fx = (x as f32 + 0.5) / tw_f - 0.5;
        let fy = (y as f32 + 0.5) / th_f - 0.5;

        let tx0 = (fx.floor() as i32).clamp(0, last_tx) as usize;
        let tx1 = (fx.floor() as i32 + 1).clamp(0, last_tx) as usize;
        let ty0 = (fy.floor() as i32).clamp(0, last_ty) as usize;
        let ty1 = (fy.floor() as i32 + 1).clamp(0, last_ty) as usize;

        let ax = fx - fx.floor();
        let ay = fy - fy.floor();

        let v00 = maps[ty0 * tiles_x + tx0][pixel] as f32;
        let v10 = maps[ty0 * tiles_x + tx1][pixel] as f32;
        let v01 = maps[ty1 * tiles_x + tx0][pixel] as f32;
        let v11 = maps[ty1 * tiles_x + tx1][pixel] as f32;

        let top = v00 * (1.0 - ax) + v10 * ax;
        let bot = v01 * (1.0 - ax) + v11 * ax;
        let val = top * (1.0 - ay) + bot * ay;

        image::Luma([val.round().clamp(0.0, 255.0) as u8])
    })
}

/// Cap every bin at the clip level and spread the excess evenly; the total
/// count is preserved.
fn clip_histogram(hist: &mut [u32; BINS], clip_limit: f32, tile_pixels: u32) {
    let clip = ((clip_limit * tile_pixels as f32 / BINS as f32) as u32).max(1);
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }
    let per_bin = excess / BINS as u32;
    let remainder = (excess % BINS as u32) as usize;
    if remainder == 0 {
        for bin in hist.iter_mut() {
            *bin += per_bin;
        }
        return;
    }
    // Residual counts go to evenly spaced bins so no intensity range is favoured.
    let step = (BINS / remainder).max(1);
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += per_bin;
        if i % step == 0 && i / step < remainder {
            *bin += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_bin(img: &GrayImage) -> u32 {
        let mut hist = [0u32; BINS];
        for p in img.pixels() {
            hist[p[0] as usize] += 1;
        }
        hist.into_iter().max().unwrap_or(0)
    }

    #[test]
    fn preserves_dimensions() {
        let img = GrayImage::from_pixel(80, 60, image::Luma([128]));
        assert_eq!(clahe(&img, 2.0, 8).dimensions(), (80, 60));
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let img = GrayImage::from_pixel(64, 64, image::Luma([128]));
        let out = clahe(&img, 2.0, 8);
        let first = out.get_pixel(0, 0)[0];
        assert!(out.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn empty_image_passes_through() {
        let img = GrayImage::new(0, 0);
        assert_eq!(clahe(&img, 2.0, 8).dimensions(), (0, 0));
    }

    #[test]
    fn zero_grid_and_oversized_grid_do_not_panic() {
        let img = GrayImage::from_fn(10, 6, |x, y| image::Luma([(x * 20 + y) as u8]));
        assert_eq!(clahe(&img, 2.0, 0).dimensions(), (10, 6));
        assert_eq!(clahe(&img, 0.0, 64).dimensions(), (10, 6));
    }

    #[test]
    fn clipping_preserves_total_count() {
        let mut hist = [0u32; BINS];
        hist[100] = 900;
        hist[101] = 300;
        hist[7] = 5;
        let total: u32 = hist.iter().sum();
        clip_histogram(&mut hist, 2.0, total);
        assert_eq!(hist.iter().sum::<u32>(), total);
        assert!(hist[100] < 900);
    }

    #[test]
    fn skewed_ramp_gets_spread() {
        // most pixels sit in the few darkest bins
        let img = GrayImage::from_fn(160, 120, |x, y| image::Luma([(30 + x * y / 300) as u8]));
        let out = clahe(&img, 2.0, 8);
        assert!(max_bin(&out) < max_bin(&img));
    }
}

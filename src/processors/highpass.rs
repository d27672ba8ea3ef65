// High-pass filter demo: zero a disk of low frequencies around the centre of
// the shifted spectrum and transform back.
// Visual: the spectrum window shows a black disk of the chosen radius; the
// filtered image keeps only edges and fine texture.

use image::{GrayImage, Luma};

use crate::driver::FrameProcessor;
use crate::error::Error;
use crate::ops::fourier::{ComplexImage, Direction, normalize_to_u8, optimal_dft_size};
use crate::ops::{NativeToolkit, Toolkit};
use crate::panel::ParameterPanel;
use crate::types::{Frame, View};

use super::LIVE_INPUT;

pub const SPECTRUM: &str = "Fourier Magnitude Spectrum";
pub const FILTERED: &str = "Filtered Image";

pub const RADIUS: &str = "radius";

/// 1 everywhere except a disk of `radius` around (w/2, h/2), which is 0.
pub fn disk_mask(width: usize, height: usize, radius: u32) -> Vec<f32> {
    let (cx, cy) = ((width / 2) as i64, (height / 2) as i64);
    let r2 = radius as i64 * radius as i64;
    let mut mask = Vec::with_capacity(width * height);
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let d2 = (x - cx) * (x - cx) + (y - cy) * (y - cy);
            mask.push(if d2 <= r2 { 0.0 } else { 1.0 });
        }
    }
    mask
}

fn gray_from(width: usize, height: usize, samples: Vec<u8>) -> GrayImage {
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([samples[y as usize * width + x as usize]])
    })
}

pub struct HighPassDemo<T = NativeToolkit> {
    toolkit: T,
    dft_size: Option<(usize, usize)>,
}

impl HighPassDemo {
    pub fn new() -> Self {
        Self::with_toolkit(NativeToolkit::default())
    }
}

impl Default for HighPassDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Toolkit> HighPassDemo<T> {
    pub fn with_toolkit(toolkit: T) -> Self {
        Self {
            toolkit,
            dft_size: None,
        }
    }

    /// Transform size fixed by `configure`.
    pub fn dft_size(&self) -> Option<(usize, usize)> {
        self.dft_size
    }
}

impl<T: Toolkit> FrameProcessor for HighPassDemo<T> {
    fn register_controls(&self, panel: &mut ParameterPanel) {
        panel.attach(SPECTRUM);
        panel.register(RADIUS, 25, 200);
    }

    fn configure(&mut self, width: u32, height: u32) -> Result<(), Error> {
        self.dft_size = Some((
            optimal_dft_size(width) as usize,
            optimal_dft_size(height) as usize,
        ));
        Ok(())
    }

    fn process(&mut self, frame: &Frame, panel: &ParameterPanel) -> Result<Vec<View>, Error> {
        let (pw, ph) = self.dft_size.ok_or(Error::Unconfigured("high-pass filter"))?;
        let gray = frame.to_gray();
        let (w, h) = (gray.width() as usize, gray.height() as usize);

        let mut field = ComplexImage::from_gray_padded(&gray, pw, ph);
        self.toolkit.dft(&mut field, Direction::Forward);
        let mut centred = field.fft_shift();
        centred.apply_mask(&disk_mask(pw, ph, panel.current_value(RADIUS)));

        let log_magnitude: Vec<f32> = centred.magnitude().iter().map(|m| m.ln_1p()).collect();
        let spectrum = gray_from(pw, ph, normalize_to_u8(&log_magnitude));

        let mut back = centred.ifft_shift();
        self.toolkit.dft(&mut back, Direction::Inverse);
        // drop the zero padding before stretching
        let real = back.real();
        let (w, h) = (w.min(pw), h.min(ph));
        let cropped: Vec<f32> = (0..h)
            .flat_map(|y| real[y * pw..y * pw + w].iter().copied())
            .collect();
        let filtered = gray_from(w, h, normalize_to_u8(&cropped));

        Ok(vec![
            View::new(LIVE_INPUT, frame.clone()),
            View::new(SPECTRUM, spectrum),
            View::new(FILTERED, filtered),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(w: u32, h: u32) -> (HighPassDemo, ParameterPanel) {
        let mut demo = HighPassDemo::new();
        let mut panel = ParameterPanel::new();
        demo.register_controls(&mut panel);
        demo.configure(w, h).expect("configure");
        (demo, panel)
    }

    #[test]
    fn mask_is_symmetric_under_half_turn() {
        // even sizes: the centre is (w/2, h/2), so compare within the block
        // [1, w) × [1, h) that a half turn about it maps onto itself
        for &(w, h) in &[(64usize, 48usize), (30, 30), (10, 6)] {
            for radius in [0u32, 1, 3, 25, 200] {
                let mask = disk_mask(w, h, radius);
                let (cx, cy) = (w / 2, h / 2);
                for y in 1..h {
                    for x in 1..w {
                        let (rx, ry) = (2 * cx - x, 2 * cy - y);
                        assert_eq!(mask[y * w + x], mask[ry * w + rx], "{w}x{h} r={radius} at ({x},{y})");
                    }
                }
            }
        }
    }

    #[test]
    fn radius_zero_blocks_only_the_centre() {
        let mask = disk_mask(8, 8, 0);
        assert_eq!(mask.iter().filter(|&&m| m == 0.0).count(), 1);
        assert_eq!(mask[4 * 8 + 4], 0.0);
    }

    #[test]
    fn huge_radius_blocks_everything() {
        assert!(disk_mask(20, 10, 200).iter().all(|&m| m == 0.0));
    }

    #[test]
    fn process_before_configure_fails() {
        let mut demo = HighPassDemo::new();
        let frame = Frame::Gray(GrayImage::new(4, 4));
        let err = demo.process(&frame, &ParameterPanel::new());
        assert!(matches!(err, Err(Error::Unconfigured(_))));
    }

    #[test]
    fn configure_picks_fast_sizes() {
        let (demo, _) = configured(641, 479);
        assert_eq!(demo.dft_size(), Some((648, 480)));
    }

    #[test]
    fn views_have_frame_and_transform_sizes() {
        let (mut demo, panel) = configured(14, 11);
        let frame = Frame::Gray(GrayImage::from_fn(14, 11, |x, y| Luma([((x * 7) ^ (y * 13)) as u8])));
        let views = demo.process(&frame, &panel).expect("process");

        let names: Vec<_> = views.iter().map(|v| v.window).collect();
        assert_eq!(names, [LIVE_INPUT, SPECTRUM, FILTERED]);
        assert_eq!(views[1].image.dimensions(), (15, 12));
        assert_eq!(views[2].image.dimensions(), (14, 11));
    }

    #[test]
    fn spectrum_centre_is_masked_out() {
        let (mut demo, mut panel) = configured(16, 16);
        panel.set_value(RADIUS, 2);
        let frame = Frame::Gray(GrayImage::from_fn(16, 16, |x, y| Luma([((x * 29) ^ (y * 53)) as u8])));
        let views = demo.process(&frame, &panel).expect("process");
        let Frame::Gray(spectrum) = &views[1].image else {
            panic!("spectrum view should be gray");
        };
        assert_eq!(spectrum.get_pixel(8, 8)[0], 0);
        assert!(spectrum.pixels().any(|p| p[0] == 255));
    }
}

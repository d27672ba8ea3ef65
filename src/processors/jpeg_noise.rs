// JPEG noise demo: compress each frame in memory, decompress it, and show
// the per-sample difference scaled up by the amplification slider.

use image::{GrayImage, RgbImage};

use crate::driver::FrameProcessor;
use crate::error::Error;
use crate::ops::codec::{MAX_QUALITY, MIN_QUALITY};
use crate::ops::{NativeToolkit, Toolkit};
use crate::panel::ParameterPanel;
use crate::types::{Frame, View};

use super::LIVE_INPUT;

pub const NOISE: &str = "JPEG compression noise";
pub const COMPRESSED: &str = "JPEG compressed version";

pub const QUALITY: &str = "JPEG quality";
pub const AMPLIFICATION: &str = "amplification";

/// |a − b| · gain, saturating at 255.
fn amplified_difference(a: &[u8], b: &[u8], gain: u8) -> Vec<u8> {
    a.iter()
        .zip(b)
        .map(|(&a, &b)| a.abs_diff(b).saturating_mul(gain))
        .collect()
}

/// Sample-wise noise between a frame and its decoded JPEG.
pub fn compression_noise(original: &Frame, decoded: &Frame, gain: u8) -> Result<Frame, Error> {
    if original.dimensions() != decoded.dimensions() {
        return Err(Error::Codec(format!(
            "decoded {:?}, expected {:?}",
            decoded.dimensions(),
            original.dimensions()
        )));
    }
    let (w, h) = original.dimensions();
    let noise = match (original, decoded) {
        (Frame::Gray(a), Frame::Gray(b)) => {
            GrayImage::from_raw(w, h, amplified_difference(a.as_raw(), b.as_raw(), gain)).map(Frame::Gray)
        }
        (Frame::Color(a), Frame::Color(b)) => {
            RgbImage::from_raw(w, h, amplified_difference(a.as_raw(), b.as_raw(), gain)).map(Frame::Color)
        }
        _ => None,
    };
    noise.ok_or_else(|| Error::Codec("decoded frame has a different channel count".into()))
}

pub struct JpegNoiseDemo<T = NativeToolkit> {
    toolkit: T,
}

impl JpegNoiseDemo {
    pub fn new() -> Self {
        Self::with_toolkit(NativeToolkit::default())
    }
}

impl Default for JpegNoiseDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Toolkit> JpegNoiseDemo<T> {
    pub fn with_toolkit(toolkit: T) -> Self {
        Self { toolkit }
    }
}

impl<T: Toolkit> FrameProcessor for JpegNoiseDemo<T> {
    fn register_controls(&self, panel: &mut ParameterPanel) {
        panel.attach(NOISE);
        panel.register(QUALITY, 90, MAX_QUALITY as u32);
        panel.register(AMPLIFICATION, 0, 255);
    }

    fn process(&mut self, frame: &Frame, panel: &ParameterPanel) -> Result<Vec<View>, Error> {
        let quality = panel
            .current_value(QUALITY)
            .clamp(MIN_QUALITY as u32, MAX_QUALITY as u32) as u8;
        let gain = panel.current_value(AMPLIFICATION).min(255) as u8;

        let bytes = self.toolkit.encode_jpeg(frame, quality)?;
        let decoded = self.toolkit.decode_jpeg(&bytes, frame.is_color())?;
        let noise = compression_noise(frame, &decoded, gain)?;

        Ok(vec![
            View::new(LIVE_INPUT, frame.clone()),
            View::new(NOISE, noise),
            View::new(COMPRESSED, decoded),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn panel() -> ParameterPanel {
        let mut panel = ParameterPanel::new();
        JpegNoiseDemo::new().register_controls(&mut panel);
        panel
    }

    #[test]
    fn difference_saturates() {
        assert_eq!(amplified_difference(&[10, 200, 50], &[20, 100, 50], 3), vec![30, 255, 0]);
    }

    #[test]
    fn zero_gain_is_all_black() {
        let mut demo = JpegNoiseDemo::new();
        let frame = Frame::Color(RgbImage::from_fn(24, 16, |x, y| Rgb([(x * 10) as u8, (y * 15) as u8, 77])));
        let views = demo.process(&frame, &panel()).expect("process");
        let Frame::Color(noise) = &views[1].image else {
            panic!("noise of a color frame should be color");
        };
        assert!(noise.as_raw().iter().all(|&v| v == 0));
        assert_eq!(views[2].image.dimensions(), (24, 16));
    }

    #[test]
    fn quality_zero_still_encodes() {
        let mut demo = JpegNoiseDemo::new();
        let mut panel = panel();
        panel.set_value(QUALITY, 0);
        panel.set_value(AMPLIFICATION, 255);
        let frame = Frame::Gray(GrayImage::from_fn(16, 16, |x, y| Luma([((x + y) * 8) as u8])));
        let views = demo.process(&frame, &panel).expect("process");
        assert_eq!(views[1].window, NOISE);
        assert!(!views[1].image.is_color());
    }

    #[test]
    fn mismatched_frames_are_rejected() {
        let a = Frame::Gray(GrayImage::new(4, 4));
        let b = Frame::Gray(GrayImage::new(4, 5));
        let c = Frame::Color(RgbImage::new(4, 4));
        assert!(compression_noise(&a, &b, 1).is_err());
        assert!(compression_noise(&a, &c, 1).is_err());
    }
}

// Image-processing capabilities the demos delegate to.
//
// Processors only talk to `Toolkit`; `NativeToolkit` backs it with
// `image`, `imageproc` and `rustfft`.

pub mod clahe;
pub mod codec;
pub mod fourier;
pub mod matching;

use image::GrayImage;
use imageproc::stats;

use crate::error::Error;
use crate::types::Frame;
use fourier::{ComplexImage, Direction, Fourier};
use matching::ScoreMap;

pub trait Toolkit {
    /// Contrast limited adaptive histogram equalization on a `tiles`×`tiles` grid.
    fn clahe(&mut self, image: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage;

    /// In-place 2-D DFT with complex output; the inverse is scaled by 1/(w·h).
    fn dft(&mut self, field: &mut ComplexImage, direction: Direction);

    /// Normalized cross-correlation score of every template placement.
    fn match_template(&mut self, image: &GrayImage, template: &GrayImage) -> ScoreMap;

    fn encode_jpeg(&mut self, frame: &Frame, quality: u8) -> Result<Vec<u8>, Error>;

    fn decode_jpeg(&mut self, bytes: &[u8], color: bool) -> Result<Frame, Error>;

    /// 256-bin intensity histogram.
    fn histogram(&mut self, image: &GrayImage) -> [u32; 256];
}

#[derive(Default)]
pub struct NativeToolkit {
    fourier: Fourier,
}

impl Toolkit for NativeToolkit {
    fn clahe(&mut self, image: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage {
        clahe::clahe(image, clip_limit, tiles)
    }

    fn dft(&mut self, field: &mut ComplexImage, direction: Direction) {
        self.fourier.dft(field, direction);
    }

    fn match_template(&mut self, image: &GrayImage, template: &GrayImage) -> ScoreMap {
        matching::correlate(image, template)
    }

    fn encode_jpeg(&mut self, frame: &Frame, quality: u8) -> Result<Vec<u8>, Error> {
        codec::encode_jpeg(frame, quality)
    }

    fn decode_jpeg(&mut self, bytes: &[u8], color: bool) -> Result<Frame, Error> {
        codec::decode_jpeg(bytes, color)
    }

    fn histogram(&mut self, image: &GrayImage) -> [u32; 256] {
        stats::histogram(image).channels[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn histogram_counts_every_pixel_once() {
        let img = GrayImage::from_fn(16, 4, |x, _| Luma([(x * 16) as u8]));
        let hist = NativeToolkit::default().histogram(&img);
        assert_eq!(hist.iter().sum::<u32>(), 64);
        assert_eq!(hist[0], 4);
        assert_eq!(hist[240], 4);
        assert_eq!(hist[1], 0);
    }
}

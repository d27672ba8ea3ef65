// CLAHE demo: the grayscale frame is equalized tile by tile; histograms of
// the input and the output are shown next to the images.

use crate::driver::FrameProcessor;
use crate::error::Error;
use crate::ops::{NativeToolkit, Toolkit};
use crate::panel::ParameterPanel;
use crate::render::{ChartStyle, histogram_chart};
use crate::types::{Frame, View};

use super::LIVE_INPUT;

pub const INPUT_HISTOGRAM: &str = "Input Histogram";
pub const OUTPUT: &str = "Processed Output";
pub const OUTPUT_HISTOGRAM: &str = "Output Histogram";

pub const CLIP_LIMIT: &str = "clip limit";
pub const TILE_SIZE: &str = "tile size";

pub struct EqualizeDemo<T = NativeToolkit> {
    toolkit: T,
}

impl EqualizeDemo {
    pub fn new() -> Self {
        Self::with_toolkit(NativeToolkit::default())
    }
}

impl Default for EqualizeDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Toolkit> EqualizeDemo<T> {
    pub fn with_toolkit(toolkit: T) -> Self {
        Self { toolkit }
    }
}

impl<T: Toolkit> FrameProcessor for EqualizeDemo<T> {
    fn register_controls(&self, panel: &mut ParameterPanel) {
        panel.attach(OUTPUT_HISTOGRAM);
        panel.register(CLIP_LIMIT, 2, 25);
        panel.register(TILE_SIZE, 8, 64);
    }

    fn process(&mut self, frame: &Frame, panel: &ParameterPanel) -> Result<Vec<View>, Error> {
        let gray = frame.to_gray();
        let clip_limit = panel.current_value(CLIP_LIMIT) as f32;
        let tiles = panel.current_value(TILE_SIZE);

        let output = self.toolkit.clahe(&gray, clip_limit, tiles);
        let input_hist = self.toolkit.histogram(&gray);
        let output_hist = self.toolkit.histogram(&output);

        Ok(vec![
            View::new(LIVE_INPUT, frame.clone()),
            View::new(INPUT_HISTOGRAM, histogram_chart(&input_hist, ChartStyle::Bars)),
            View::new(OUTPUT, output),
            View::new(OUTPUT_HISTOGRAM, histogram_chart(&output_hist, ChartStyle::Bars)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CHART_HEIGHT, CHART_WIDTH};
    use image::{GrayImage, Luma};

    fn panel(demo: &EqualizeDemo) -> ParameterPanel {
        let mut panel = ParameterPanel::new();
        demo.register_controls(&mut panel);
        panel
    }

    #[test]
    fn controls_start_at_their_defaults() {
        let panel = panel(&EqualizeDemo::new());
        assert_eq!(panel.window(), Some(OUTPUT_HISTOGRAM));
        assert_eq!(panel.current_value(CLIP_LIMIT), 2);
        assert_eq!(panel.current_value(TILE_SIZE), 8);
    }

    #[test]
    fn emits_four_views_in_order() {
        let mut demo = EqualizeDemo::new();
        let panel = panel(&demo);
        let frame = Frame::Gray(GrayImage::from_fn(40, 30, |x, y| Luma([(x * 3 + y) as u8])));
        let views = demo.process(&frame, &panel).expect("process");

        let names: Vec<_> = views.iter().map(|v| v.window).collect();
        assert_eq!(names, [LIVE_INPUT, INPUT_HISTOGRAM, OUTPUT, OUTPUT_HISTOGRAM]);
        assert_eq!(views[2].image.dimensions(), (40, 30));
        assert!(!views[2].image.is_color());
        assert_eq!(views[1].image.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
    }

    #[test]
    fn zero_tiles_and_zero_clip_still_work() {
        let mut demo = EqualizeDemo::new();
        let mut panel = panel(&demo);
        panel.set_value(CLIP_LIMIT, 0);
        panel.set_value(TILE_SIZE, 0);
        let frame = Frame::Gray(GrayImage::from_fn(16, 16, |x, _| Luma([(x * 16) as u8])));
        let views = demo.process(&frame, &panel).expect("process");
        assert_eq!(views[2].image.dimensions(), (16, 16));
    }
}

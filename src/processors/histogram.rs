// Grayscale histogram demo: the same 256 bins drawn as bars and as a line.

use crate::driver::FrameProcessor;
use crate::error::Error;
use crate::ops::{NativeToolkit, Toolkit};
use crate::panel::ParameterPanel;
use crate::render::{ChartStyle, histogram_chart};
use crate::types::{Frame, View};

pub const GRAY_INPUT: &str = "Live Camera Input (as Greyscale)";
pub const BAR_GRAPH: &str = "Histogram (bar graph)";
pub const LINE_GRAPH: &str = "Histogram (line graph)";

pub struct HistogramDemo<T = NativeToolkit> {
    toolkit: T,
}

impl HistogramDemo {
    pub fn new() -> Self {
        Self::with_toolkit(NativeToolkit::default())
    }
}

impl Default for HistogramDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Toolkit> HistogramDemo<T> {
    pub fn with_toolkit(toolkit: T) -> Self {
        Self { toolkit }
    }
}

impl<T: Toolkit> FrameProcessor for HistogramDemo<T> {
    fn process(&mut self, frame: &Frame, _panel: &ParameterPanel) -> Result<Vec<View>, Error> {
        let gray = frame.to_gray();
        let counts = self.toolkit.histogram(&gray);
        Ok(vec![
            View::new(GRAY_INPUT, gray),
            View::new(BAR_GRAPH, histogram_chart(&counts, ChartStyle::Bars)),
            View::new(LINE_GRAPH, histogram_chart(&counts, ChartStyle::Curve)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn color_input_is_shown_gray() {
        let mut demo = HistogramDemo::new();
        let frame = Frame::Color(RgbImage::from_pixel(12, 7, Rgb([200, 10, 10])));
        let views = demo.process(&frame, &ParameterPanel::new()).expect("process");

        assert_eq!(views.len(), 3);
        assert_eq!(views[0].window, GRAY_INPUT);
        assert!(!views[0].image.is_color());
        assert_eq!(views[0].image.dimensions(), (12, 7));
        assert_eq!(views[1].window, BAR_GRAPH);
        assert_eq!(views[2].window, LINE_GRAPH);
    }
}

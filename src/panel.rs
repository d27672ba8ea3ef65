// Parameter panel: named integer sliders drawn as a strip under one window's image.
// Visual: each control is a 16-pixel row; the filled part of the row shows the
// value and the label reads "name: value". Press or drag inside a row to set it.

use image::{Rgb, RgbImage, imageops};

use crate::draw::{WHITE, draw_text_5x7};
use crate::types::{Frame, PointerEvent};

pub const ROW_HEIGHT: u32 = 16;
/// Narrow images (histogram charts) still get sliders wide enough to use.
pub const MIN_STRIP_WIDTH: u32 = 256;

const TRACK_BG: Rgb<u8> = Rgb([40, 40, 40]);
const TRACK_FILL: Rgb<u8> = Rgb([70, 110, 160]);

#[derive(Clone, Debug, PartialEq, Eq)]
struct Control {
    name: &'static str,
    value: u32,
    max: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ParameterPanel {
    window: Option<&'static str>,
    controls: Vec<Control>,
    dragging: Option<usize>, // row grabbed by the last press
}

impl ParameterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the controls beneath the image of `window`.
    pub fn attach(&mut self, window: &'static str) {
        self.window = Some(window);
    }

    pub fn window(&self) -> Option<&'static str> {
        self.window
    }

    /// Create a control ranging over [0, max]; registering a name twice replaces it.
    pub fn register(&mut self, name: &'static str, initial: u32, max: u32) {
        let control = Control {
            name,
            value: initial.min(max),
            max,
        };
        match self.controls.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = control,
            None => self.controls.push(control),
        }
    }

    /// Present value of `name`; unknown names read as 0.
    pub fn current_value(&self, name: &str) -> u32 {
        self.controls
            .iter()
            .find(|c| c.name == name)
            .map_or(0, |c| c.value)
    }

    /// Set `name` to `value` clamped into its range. Returns false for unknown names.
    pub fn set_value(&mut self, name: &str, value: i64) -> bool {
        match self.controls.iter_mut().find(|c| c.name == name) {
            Some(c) => {
                c.value = value.clamp(0, c.max as i64) as u32;
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn strip_height(&self) -> u32 {
        ROW_HEIGHT * self.controls.len() as u32
    }

    /// `image` with the slider strip appended below it.
    pub fn compose(&self, image: &Frame) -> Frame {
        if self.controls.is_empty() {
            return image.clone();
        }
        let (iw, ih) = image.dimensions();
        let width = iw.max(MIN_STRIP_WIDTH);
        let mut canvas = RgbImage::from_pixel(width, ih + self.strip_height(), TRACK_BG);
        imageops::replace(&mut canvas, &image.to_rgb(), 0, 0);

        for (row, control) in self.controls.iter().enumerate() {
            let y0 = ih + row as u32 * ROW_HEIGHT;
            let fill = if control.max == 0 {
                0
            } else {
                (width as u64 * control.value as u64 / control.max as u64) as u32
            };
            for y in y0 + 1..y0 + ROW_HEIGHT - 1 {
                for x in 0..fill {
                    canvas.put_pixel(x, y, TRACK_FILL);
                }
            }
            let label = format!("{}: {}", control.name, control.value);
            draw_text_5x7(&mut canvas, 4, (y0 + 4) as i32, &label, WHITE);
        }
        Frame::Color(canvas)
    }

    /// Feed a pointer event from the panel's window.
    ///
    /// `image_height` is the height of the image above the strip and `width`
    /// the width of the composed frame. Returns true when the event landed on
    /// (or is dragging) a slider.
    pub fn handle_pointer(&mut self, event: PointerEvent, image_height: u32, width: u32) -> bool {
        let (x, y) = event.position();
        match event {
            PointerEvent::Press { .. } => {
                self.dragging = self.row_at(y, image_height);
                match self.dragging {
                    Some(row) => {
                        self.slide(row, x, width);
                        true
                    }
                    None => false,
                }
            }
            PointerEvent::Drag { .. } => match self.dragging {
                Some(row) => {
                    self.slide(row, x, width);
                    true
                }
                None => false,
            },
            PointerEvent::Release { .. } => match self.dragging.take() {
                Some(row) => {
                    self.slide(row, x, width);
                    true
                }
                None => false,
            },
        }
    }

    fn row_at(&self, y: u32, image_height: u32) -> Option<usize> {
        if y < image_height {
            return None;
        }
        let row = ((y - image_height) / ROW_HEIGHT) as usize;
        (row < self.controls.len()).then_some(row)
    }

    fn slide(&mut self, row: usize, x: u32, width: u32) {
        let control = &mut self.controls[row];
        let span = width.saturating_sub(1).max(1) as u64;
        let x = (x as u64).min(span);
        control.value = ((x * control.max as u64 + span / 2) / span) as u32;
    }
}

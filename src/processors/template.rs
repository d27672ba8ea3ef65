// Template matching demo.
// Visual: drag left to right on the live window to draw a green box; on
// release that region becomes the template and from then on a red box marks
// where it matches best in each new frame.

use image::{GrayImage, Luma};
use tracing::info;

use crate::draw::{GREEN, RED, draw_box};
use crate::driver::FrameProcessor;
use crate::error::Error;
use crate::ops::matching::{ScoreMap, best_match};
use crate::ops::{NativeToolkit, Toolkit};
use crate::panel::ParameterPanel;
use crate::types::{Frame, PointerEvent, View};

use super::LIVE_INPUT;

pub const CORRELATION: &str = "Correlation Output";
pub const SELECTED: &str = "selected";

pub const USAGE: &str = "USAGE: click and drag left to right to select an image region";

const BOX_THICKNESS: u32 = 2;

/// A dragged rectangle, corner exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRegion {
    pub origin: (u32, u32),
    pub corner: (u32, u32),
}

impl SelectionRegion {
    /// Only drags down and to the right select anything.
    pub fn is_valid(&self) -> bool {
        self.corner.0 > self.origin.0 && self.corner.1 > self.origin.1
    }

    pub fn size(&self) -> (u32, u32) {
        (
            self.corner.0.saturating_sub(self.origin.0),
            self.corner.1.saturating_sub(self.origin.1),
        )
    }
}

/// Pointer state of one drag gesture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    origin: Option<(u32, u32)>,
    pointer: (u32, u32),
    dragging: bool,
    pending: Option<SelectionRegion>,
}

impl Selection {
    pub fn handle(&mut self, event: PointerEvent) {
        let pos = event.position();
        self.pointer = pos;
        match event {
            PointerEvent::Press { .. } => {
                self.origin = Some(pos);
                self.dragging = true;
                self.pending = None;
            }
            PointerEvent::Drag { .. } => {}
            PointerEvent::Release { .. } => {
                if !self.dragging {
                    return;
                }
                self.dragging = false;
                if let Some(origin) = self.origin {
                    let region = SelectionRegion { origin, corner: pos };
                    if region.is_valid() {
                        self.pending = Some(region);
                    }
                }
            }
        }
    }

    /// The rectangle being dragged right now, origin to pointer.
    pub fn live_rect(&self) -> Option<((u32, u32), (u32, u32))> {
        match (self.dragging, self.origin) {
            (true, Some(origin)) => Some((origin, self.pointer)),
            _ => None,
        }
    }

    /// A finished valid region not yet turned into a template.
    pub fn take_pending(&mut self) -> Option<SelectionRegion> {
        self.pending.take()
    }
}

pub struct TemplateDemo<T = NativeToolkit> {
    toolkit: T,
    selection: Selection,
    template: Option<Frame>,
}

impl TemplateDemo {
    pub fn new() -> Self {
        Self::with_toolkit(NativeToolkit::default())
    }
}

impl Default for TemplateDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Toolkit> TemplateDemo<T> {
    pub fn with_toolkit(toolkit: T) -> Self {
        Self {
            toolkit,
            selection: Selection::default(),
            template: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn template(&self) -> Option<&Frame> {
        self.template.as_ref()
    }

    /// Crop the pending region (clamped to the frame) as the new template.
    fn take_template(&mut self, frame: &Frame) {
        let Some(region) = self.selection.take_pending() else {
            return;
        };
        let (fw, fh) = frame.dimensions();
        let (x, y) = region.origin;
        if x >= fw || y >= fh {
            return;
        }
        let (w, h) = region.size();
        let (w, h) = (w.min(fw - x), h.min(fh - y));
        info!(x, y, width = w, height = h, "template selected");
        self.template = Some(frame.crop(x, y, w, h));
    }
}

/// Scores in [0, 1] stretched to [0, 255]; anything outside is clamped.
fn score_image(scores: &ScoreMap) -> GrayImage {
    GrayImage::from_fn(scores.width(), scores.height(), |x, y| {
        let s = scores.get_pixel(x, y)[0].clamp(0.0, 1.0);
        Luma([(s * 255.0).round() as u8])
    })
}

impl<T: Toolkit> FrameProcessor for TemplateDemo<T> {
    fn process(&mut self, frame: &Frame, _panel: &ParameterPanel) -> Result<Vec<View>, Error> {
        self.take_template(frame);

        let mut shown = frame.to_rgb();
        if let Some((origin, pointer)) = self.selection.live_rect() {
            let a = (origin.0 as i32, origin.1 as i32);
            let b = (pointer.0 as i32, pointer.1 as i32);
            draw_box(&mut shown, a, b, GREEN, BOX_THICKNESS);
        }

        let mut views = Vec::with_capacity(3);
        let mut extra = Vec::with_capacity(2);
        if let Some(template) = &self.template {
            let scores = self.toolkit.match_template(&frame.to_gray(), &template.to_gray());
            if let Some(best) = best_match(&scores) {
                let (x, y) = (best.location.0 as i32, best.location.1 as i32);
                let (tw, th) = template.dimensions();
                draw_box(&mut shown, (x, y), (x + tw as i32, y + th as i32), RED, BOX_THICKNESS);
            }
            // a frame smaller than the template has no placements to show
            if scores.width() > 0 && scores.height() > 0 {
                extra.push(View::new(CORRELATION, score_image(&scores)));
            }
            extra.push(View::new(SELECTED, template.clone()));
        }
        views.push(View::new(LIVE_INPUT, shown));
        views.extend(extra);
        Ok(views)
    }

    fn pointer_window(&self) -> Option<&'static str> {
        Some(LIVE_INPUT)
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        self.selection.handle(event);
    }

    fn usage(&self) -> Option<&'static str> {
        Some(USAGE)
    }
}

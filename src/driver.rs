// The capture → process → display loop shared by every demo.
// One tick: read a frame, let the processor turn it into views, show them
// (the panel strip goes under its window), then wait for input for whatever
// is left of the frame budget and route that input.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::display::{DisplaySink, QUIT_KEY};
use crate::error::Error;
use crate::pacing::{FRAME_BUDGET, MIN_WAIT, wait_timeout};
use crate::panel::ParameterPanel;
use crate::source::FrameSource;
use crate::types::{Frame, PointerEvent, View};

/// Consecutive read failures tolerated before a run is abandoned.
pub const MAX_READ_FAILURES: u32 = 50;

/// One demo variant.
pub trait FrameProcessor {
    /// Add this demo's controls to `panel` and attach it to a window.
    fn register_controls(&self, _panel: &mut ParameterPanel) {}

    /// Called once, with the dimensions of the first frame.
    fn configure(&mut self, _width: u32, _height: u32) -> Result<(), Error> {
        Ok(())
    }

    /// Turn one frame into the views to show this tick.
    fn process(&mut self, frame: &Frame, panel: &ParameterPanel) -> Result<Vec<View>, Error>;

    /// Window whose pointer events (outside the panel strip) go to [`Self::handle_pointer`].
    fn pointer_window(&self) -> Option<&'static str> {
        None
    }

    fn handle_pointer(&mut self, _event: PointerEvent) {}

    /// Printed once before the loop starts.
    fn usage(&self) -> Option<&'static str> {
        None
    }
}

/// Loop state: the quit flag is set once and never reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Session {
    quit: bool,
    ticks: u64,
}

impl Session {
    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Frames processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The quit key was pressed or a window was closed.
    Quit,
    /// A file source ran out of frames.
    EndOfStream,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub reason: EndReason,
}

pub struct Driver {
    panel: ParameterPanel,
    session: Session,
    budget: Duration,
    min_wait: Duration,
    configured: bool,
    // Height of the image above the strip and width of the composed panel frame.
    panel_geometry: Option<(u32, u32)>,
}

impl Driver {
    /// A driver with the processor's controls registered.
    pub fn new(processor: &impl FrameProcessor) -> Self {
        Self::with_pacing(processor, FRAME_BUDGET, MIN_WAIT)
    }

    pub fn with_pacing(processor: &impl FrameProcessor, budget: Duration, min_wait: Duration) -> Self {
        let mut panel = ParameterPanel::new();
        processor.register_controls(&mut panel);
        Self {
            panel,
            session: Session::default(),
            budget,
            min_wait,
            configured: false,
            panel_geometry: None,
        }
    }

    pub fn panel(&self) -> &ParameterPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ParameterPanel {
        &mut self.panel
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until quit, end of stream, or too many failed reads in a row.
    pub fn run<P, D>(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut D,
        processor: &mut P,
    ) -> Result<RunSummary, Error>
    where
        P: FrameProcessor + ?Sized,
        D: DisplaySink + ?Sized,
    {
        let mut failures = 0u32;
        loop {
            if self.session.quit_requested() {
                return Ok(self.summary(EndReason::Quit));
            }
            // only processing counts against the budget, not the blocking read
            let mut processing = Duration::ZERO;
            match source.next_frame() {
                Ok(Some(frame)) => {
                    failures = 0;
                    let started = Instant::now();
                    self.tick(&frame, sink, processor)?;
                    processing = started.elapsed();
                }
                Ok(None) => {
                    info!(source = %source.describe(), "end of stream");
                    return Ok(self.summary(EndReason::EndOfStream));
                }
                Err(e) => {
                    failures += 1;
                    warn!(failures, "frame read failed: {e}");
                    if failures >= MAX_READ_FAILURES {
                        return Err(e);
                    }
                }
            }

            let wait = wait_timeout(processing, self.budget, self.min_wait);
            let input = sink.poll_input(wait)?;
            if input.key == Some(QUIT_KEY) || input.closed {
                debug!(key = ?input.key, closed = input.closed, "quit requested");
                self.session.request_quit();
            }
            for (window, event) in input.pointer {
                self.route_pointer(&window, event, processor);
            }
        }
    }

    fn tick<P, D>(&mut self, frame: &Frame, sink: &mut D, processor: &mut P) -> Result<(), Error>
    where
        P: FrameProcessor + ?Sized,
        D: DisplaySink + ?Sized,
    {
        if !self.configured {
            let (w, h) = frame.dimensions();
            processor.configure(w, h)?;
            self.configured = true;
            debug!(width = w, height = h, "processor configured");
        }

        for view in processor.process(frame, &self.panel)? {
            if Some(view.window) == self.panel.window() {
                let composed = self.panel.compose(&view.image);
                self.panel_geometry = Some((view.image.height(), composed.width()));
                sink.show(view.window, &composed)?;
            } else {
                sink.show(view.window, &view.image)?;
            }
        }
        self.session.ticks += 1;
        Ok(())
    }

    fn route_pointer<P>(&mut self, window: &str, event: PointerEvent, processor: &mut P)
    where
        P: FrameProcessor + ?Sized,
    {
        if self.panel.window() == Some(window) {
            if let Some((image_height, width)) = self.panel_geometry {
                if self.panel.handle_pointer(event, image_height, width) {
                    return;
                }
            }
        }
        if processor.pointer_window() == Some(window) {
            processor.handle_pointer(event);
        }
    }

    fn summary(&self, reason: EndReason) -> RunSummary {
        RunSummary {
            ticks: self.session.ticks,
            reason,
        }
    }
}

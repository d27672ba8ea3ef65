// Headless display: keeps every view and replays scripted input.

use std::collections::VecDeque;
use std::time::Duration;

use super::DisplaySink;
use crate::error::Error;
use crate::types::{Frame, Input};

#[derive(Default)]
pub struct RecordingSink {
    shown: Vec<(String, Frame)>,
    waits: Vec<Duration>,
    script: VecDeque<Input>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs returned by successive polls; once used up, polls return nothing.
    pub fn with_script(script: impl IntoIterator<Item = Input>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every (window, image) pair shown so far, in order.
    pub fn shown(&self) -> &[(String, Frame)] {
        &self.shown
    }

    /// Images shown in one window, in order.
    pub fn frames_in(&self, window: &str) -> Vec<&Frame> {
        self.shown
            .iter()
            .filter(|(name, _)| name == window)
            .map(|(_, frame)| frame)
            .collect()
    }

    /// Timeouts the loop asked for, one per poll.
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl DisplaySink for RecordingSink {
    fn show(&mut self, window: &str, image: &Frame) -> Result<(), Error> {
        self.shown.push((window.to_string(), image.clone()));
        Ok(())
    }

    fn poll_input(&mut self, timeout: Duration) -> Result<Input, Error> {
        self.waits.push(timeout);
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

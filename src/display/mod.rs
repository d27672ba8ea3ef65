// Where views go and where input comes from.

mod recording;
mod window;

pub use recording::RecordingSink;
pub use window::WindowSink;

use std::time::Duration;

use crate::error::Error;
use crate::types::{Frame, Input};

/// Key code that ends a run.
pub const QUIT_KEY: u8 = b'x';

pub trait DisplaySink {
    /// Render `image` into the window named `window`, creating it on first use.
    fn show(&mut self, window: &str, image: &Frame) -> Result<(), Error>;

    /// Wait up to `timeout` for input. Returns early once a key is pressed.
    fn poll_input(&mut self, timeout: Duration) -> Result<Input, Error>;
}

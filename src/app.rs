// Entry point shared by the demo binaries: parse the command line, open a
// source, then hand everything to the driver until the user quits.

use clap::Parser;
use tracing::info;

use crate::config::{self, Args, Config};
use crate::display::WindowSink;
use crate::driver::{Driver, FrameProcessor};
use crate::error::Error;
use crate::source::open_source;

/// Printed when neither the given file nor the camera can be opened.
pub const NO_SOURCE: &str = "No video file specified or camera connected.";

pub fn run<P: FrameProcessor>(mut processor: P) -> Result<(), Error> {
    config::init_logging();
    let config = Config::from_args(Args::parse())?;

    let mut source = match open_source(config.video.as_deref(), config.camera) {
        Ok(source) => source,
        Err(Error::SourceUnavailable) => {
            println!("{NO_SOURCE}");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if let Some(usage) = processor.usage() {
        println!("{usage}");
    }

    let mut sink = WindowSink::new();
    let mut driver = Driver::with_pacing(&processor, config.frame_budget, config.min_wait);
    let summary = driver.run(source.as_mut(), &mut sink, &mut processor)?;
    info!(ticks = summary.ticks, reason = ?summary.reason, "run finished");
    Ok(())
}

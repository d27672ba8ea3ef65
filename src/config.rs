// Command line, environment and logging setup shared by the demo binaries.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::error::Error;
use crate::pacing::{FRAME_BUDGET, MIN_WAIT};

/// Selects the camera used when no (readable) video is given.
pub const CAMERA_ENV: &str = "FRAMELAB_CAMERA";

#[derive(Debug, Default, Parser)]
#[command(version, about = "Live image-processing demo: camera or video in, windows out. Press x to quit.")]
pub struct Args {
    /// Animated GIF/APNG, directory of images, or still image. Falls back to the camera.
    pub video: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub video: Option<PathBuf>,
    pub camera: u32,
    pub frame_budget: Duration,
    pub min_wait: Duration,
}

impl Config {
    /// Merge parsed arguments with the process environment.
    pub fn from_args(args: Args) -> Result<Self, Error> {
        let camera = std::env::var(CAMERA_ENV).ok();
        Self::resolve(args, camera.as_deref())
    }

    /// `camera` is the raw value of [`CAMERA_ENV`], if set.
    pub fn resolve(args: Args, camera: Option<&str>) -> Result<Self, Error> {
        let camera = match camera.map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("{CAMERA_ENV}={raw:?}: {e}")))?,
        };
        Ok(Self {
            video: args.video,
            camera,
            frame_budget: FRAME_BUDGET,
            min_wait: MIN_WAIT,
        })
    }
}

/// Install the global `tracing` subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_path_is_optional() {
        let args = Args::try_parse_from(["demo"]).expect("parse");
        assert!(args.video.is_none());
        let args = Args::try_parse_from(["demo", "clip.gif"]).expect("parse");
        assert_eq!(args.video, Some(PathBuf::from("clip.gif")));
        assert!(Args::try_parse_from(["demo", "a.gif", "b.gif"]).is_err());
    }

    #[test]
    fn camera_index_defaults_to_zero() {
        let config = Config::resolve(Args::default(), None).expect("config");
        assert_eq!(config.camera, 0);
        assert_eq!(config.frame_budget, FRAME_BUDGET);
        assert_eq!(Config::resolve(Args::default(), Some(" ")).expect("config").camera, 0);
    }

    #[test]
    fn camera_index_from_environment() {
        assert_eq!(Config::resolve(Args::default(), Some("2")).expect("config").camera, 2);
        assert!(matches!(
            Config::resolve(Args::default(), Some("front")),
            Err(Error::Config(_))
        ));
    }
}

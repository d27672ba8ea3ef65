// Live image-processing demos: frames from a camera or a file go through one
// processor per tick and come out as named windows with slider controls.
//
// Each binary in `src/bin` runs one `processors` variant through
// `app::run`.

pub mod app;
pub mod camera;
pub mod config;
pub mod display;
pub mod draw;
pub mod driver;
pub mod error;
pub mod ops;
pub mod pacing;
pub mod panel;
pub mod processors;
pub mod render;
pub mod source;
pub mod types;
#[cfg(feature = "video")]
pub mod video;

pub use error::Error;

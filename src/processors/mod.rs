// The five demo variants. Each one is generic over a `Toolkit`
// and defaults to the native one.

pub mod equalize;
pub mod highpass;
pub mod histogram;
pub mod jpeg_noise;
pub mod template;

pub use equalize::EqualizeDemo;
pub use highpass::HighPassDemo;
pub use histogram::HistogramDemo;
pub use jpeg_noise::JpegNoiseDemo;
pub use template::{Selection, SelectionRegion, TemplateDemo};

/// Window showing the unprocessed frame.
pub const LIVE_INPUT: &str = "Live Camera Input";

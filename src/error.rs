// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Neither the given path nor the fallback camera could be opened.
    #[error("no video file specified or camera connected")]
    SourceUnavailable,
    #[error("window init error: {0}")]
    WindowInit(String), // Creating a window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing a buffer to a window failed
    #[error("camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a camera frame failed
    #[error("video file error: {0}")]
    File(String), // Opening/decoding a video file or image sequence failed
    #[error("codec error: {0}")]
    Codec(String), // JPEG encode/decode failed
    #[error("{0} used before configure()")]
    Unconfigured(&'static str),
    #[error("config error: {0}")]
    Config(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::File(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::File(err.to_string())
    }
}

#[cfg(feature = "video")]
impl From<opencv::Error> for Error {
    fn from(err: opencv::Error) -> Self {
        Error::File(err.to_string())
    }
}

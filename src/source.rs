// Where frames come from: a video file, an image sequence, a camera, or memory.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat};
use tracing::{info, warn};

use crate::camera::CameraSource;
use crate::error::Error;
use crate::types::Frame;

/// Requested camera resolution; the device picks the closest it supports.
pub const CAMERA_WIDTH: u32 = 640;
pub const CAMERA_HEIGHT: u32 = 480;

pub trait FrameSource {
    /// Next frame, or `None` once a finite source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, Error>;

    /// Short human-readable name for logs.
    fn describe(&self) -> String;
}

/// Open `path` if given, otherwise (or if that fails) camera `camera`.
///
/// There is no retry: when neither opens the result is
/// [`Error::SourceUnavailable`].
pub fn open_source(path: Option<&Path>, camera: u32) -> Result<Box<dyn FrameSource>, Error> {
    if let Some(path) = path {
        match open_file(path) {
            Ok(src) => {
                info!(source = %src.describe(), "opened video file");
                return Ok(src);
            }
            Err(e) => warn!("cannot open {}: {e}; trying camera {camera}", path.display()),
        }
    }
    match CameraSource::open(camera, CAMERA_WIDTH, CAMERA_HEIGHT) {
        Ok(cam) => {
            info!(source = %cam.describe(), "opened camera");
            Ok(Box::new(cam))
        }
        Err(e) => {
            warn!("{e}");
            Err(Error::SourceUnavailable)
        }
    }
}

fn open_file(path: &Path) -> Result<Box<dyn FrameSource>, Error> {
    match FileSource::open(path) {
        Ok(src) => Ok(Box::new(src)),
        Err(e) => open_container(path, e),
    }
}

/// Anything the image decoders reject goes to OpenCV.
#[cfg(feature = "video")]
fn open_container(path: &Path, not_an_image: Error) -> Result<Box<dyn FrameSource>, Error> {
    tracing::debug!("{}: {not_an_image}; trying a video decoder", path.display());
    Ok(Box::new(crate::video::VideoSource::open(path)?))
}

#[cfg(not(feature = "video"))]
fn open_container(_path: &Path, not_an_image: Error) -> Result<Box<dyn FrameSource>, Error> {
    Err(not_an_image)
}

type FrameIter = Box<dyn Iterator<Item = Result<Frame, Error>>>;

/// Frames decoded from disk: an animated GIF/APNG, a directory of images
/// (read in file-name order), or a single still image.
pub struct FileSource {
    path: PathBuf,
    kind: &'static str,
    frames: FrameIter,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let (kind, frames): (&'static str, FrameIter) = if path.is_dir() {
            ("image sequence", sequence_frames(path)?)
        } else {
            let format = ImageFormat::from_path(path)?;
            match format {
                ImageFormat::Gif => {
                    let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
                    ("animated gif", animation_frames(decoder.into_frames()))
                }
                ImageFormat::Png => {
                    let decoder = PngDecoder::new(BufReader::new(File::open(path)?))?;
                    if decoder.is_apng()? {
                        ("animated png", animation_frames(decoder.apng()?.into_frames()))
                    } else {
                        ("still image", still_frame(path)?)
                    }
                }
                _ => ("still image", still_frame(path)?),
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            kind,
            frames,
        })
    }
}

impl FrameSource for FileSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Error> {
        self.frames.next().transpose()
    }

    fn describe(&self) -> String {
        format!("{} {}", self.kind, self.path.display())
    }
}

/// Keep gray images gray; everything else becomes RGB.
pub fn to_frame(img: DynamicImage) -> Frame {
    if img.color().has_color() {
        Frame::Color(img.to_rgb8())
    } else {
        Frame::Gray(img.to_luma8())
    }
}

fn animation_frames(frames: image::Frames<'static>) -> FrameIter {
    Box::new(frames.map(|f| {
        f.map(|frame| to_frame(DynamicImage::ImageRgba8(frame.into_buffer())))
            .map_err(Error::from)
    }))
}

fn still_frame(path: &Path) -> Result<FrameIter, Error> {
    let frame = to_frame(image::open(path)?);
    Ok(Box::new(std::iter::once(Ok(frame))))
}

fn sequence_frames(dir: &Path) -> Result<FrameIter, Error> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && ImageFormat::from_path(p).is_ok())
        .collect();
    if files.is_empty() {
        return Err(Error::File(format!("no images in {}", dir.display())));
    }
    files.sort();
    Ok(Box::new(
        files
            .into_iter()
            .map(|p| image::open(&p).map(to_frame).map_err(Error::from)),
    ))
}

/// A fixed list of frames, played once.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    frames: VecDeque<Frame>,
}

impl FrameSequence {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for FrameSequence {
    fn next_frame(&mut self) -> Result<Option<Frame>, Error> {
        Ok(self.frames.pop_front())
    }

    fn describe(&self) -> String {
        format!("in-memory sequence ({} frames left)", self.frames.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn sequence_plays_once() {
        let mut seq = FrameSequence::new((0..3).map(|i| Frame::Gray(GrayImage::from_pixel(2, 2, Luma([i])))));
        for i in 0..3 {
            let f = seq.next_frame().expect("no error").expect("frame");
            assert_eq!(f, Frame::Gray(GrayImage::from_pixel(2, 2, Luma([i]))));
        }
        assert!(seq.next_frame().expect("no error").is_none());
        assert!(seq.next_frame().expect("no error").is_none());
    }

    #[test]
    fn directory_is_read_in_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, v) in [("b.png", 20u8), ("a.png", 10), ("c.png", 30)] {
            GrayImage::from_pixel(4, 3, Luma([v])).save(dir.path().join(name)).expect("save");
        }
        fs::write(dir.path().join("notes.txt"), "not a frame").expect("write");

        let mut src = FileSource::open(dir.path()).expect("open");
        let mut seen = Vec::new();
        while let Some(frame) = src.next_frame().expect("decode") {
            match frame {
                Frame::Gray(img) => seen.push(img.get_pixel(0, 0)[0]),
                Frame::Color(_) => panic!("gray png decoded as color"),
            }
        }
        assert_eq!(seen, vec![10, 20, 30]);
    }

    #[test]
    fn still_color_image_is_one_frame() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("still.png");
        RgbImage::from_pixel(5, 5, Rgb([1, 2, 3])).save(&path).expect("save");

        let mut src = FileSource::open(&path).expect("open");
        assert!(src.describe().starts_with("still image"));
        assert!(src.next_frame().expect("decode").expect("frame").is_color());
        assert!(src.next_frame().expect("decode").is_none());
    }

    #[test]
    fn unknown_extension_fails_to_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.mp4");
        fs::write(&path, b"\0\0\0\x18ftypmp42").expect("write");
        assert!(FileSource::open(&path).is_err());
        assert!(FileSource::open(&dir.path().join("missing.png")).is_err());
    }

    #[cfg(not(feature = "video"))]
    #[test]
    fn containers_need_the_video_feature() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.mp4");
        fs::write(&path, b"\0\0\0\x18ftypmp42").expect("write");
        assert!(matches!(open_file(&path), Err(Error::File(_))));
    }

    #[cfg(feature = "video")]
    #[test]
    fn truncated_container_fails_in_both_decoders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.mp4");
        fs::write(&path, b"\0\0\0\x18ftypmp42").expect("write");
        assert!(open_file(&path).is_err());
    }

    #[test]
    fn empty_directory_fails_to_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(FileSource::open(dir.path()), Err(Error::File(_))));
    }
}

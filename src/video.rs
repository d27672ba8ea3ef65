// Video containers (MP4, AVI, MKV, ...) read through OpenCV's videoio.
// Only built with the `video` feature; the default build stays pure Rust
// and plays GIF/APNG, image directories and stills instead.

use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use opencv::core::{CV_8U, Mat};
use opencv::imgproc::{self, COLOR_BGR2RGB, COLOR_BGRA2RGB};
use opencv::prelude::*;
use opencv::videoio::{CAP_ANY, VideoCapture};
use tracing::debug;

use crate::error::Error;
use crate::source::FrameSource;
use crate::types::Frame;

pub struct VideoSource {
    path: PathBuf,
    capture: VideoCapture,
    bgr: Mat,
    frames_read: u64,
}

impl VideoSource {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let name = path
            .to_str()
            .ok_or_else(|| Error::File(format!("{}: path is not valid UTF-8", path.display())))?;
        let capture = VideoCapture::from_file(name, CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::File(format!("{}: no decoder could open it", path.display())));
        }
        Ok(Self {
            path: path.to_path_buf(),
            capture,
            bgr: Mat::default(),
            frames_read: 0,
        })
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Error> {
        // an empty read is the end of the stream
        if !self.capture.read(&mut self.bgr)? || self.bgr.empty() {
            debug!(frames = self.frames_read, "video exhausted");
            return Ok(None);
        }
        self.frames_read += 1;
        mat_to_frame(&self.bgr).map(Some)
    }

    fn describe(&self) -> String {
        format!("video {}", self.path.display())
    }
}

/// 8-bit gray, BGR or BGRA mat into a `Frame`.
fn mat_to_frame(mat: &Mat) -> Result<Frame, Error> {
    if mat.depth() != CV_8U {
        return Err(Error::File(format!("unsupported frame depth {}", mat.depth())));
    }
    let (w, h) = (mat.cols() as u32, mat.rows() as u32);
    let code = match mat.channels() {
        1 => {
            let gray = GrayImage::from_raw(w, h, continuous_bytes(mat)?)
                .ok_or_else(|| Error::File("short gray frame".into()))?;
            return Ok(Frame::Gray(gray));
        }
        3 => COLOR_BGR2RGB,
        4 => COLOR_BGRA2RGB,
        n => return Err(Error::File(format!("unsupported channel count {n}"))),
    };
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(mat, &mut rgb, code)?;
    let rgb = RgbImage::from_raw(w, h, continuous_bytes(&rgb)?)
        .ok_or_else(|| Error::File("short color frame".into()))?;
    Ok(Frame::Color(rgb))
}

fn continuous_bytes(mat: &Mat) -> Result<Vec<u8>, Error> {
    if mat.is_continuous() {
        return Ok(mat.data_bytes()?.to_vec());
    }
    Ok(mat.try_clone()?.data_bytes()?.to_vec())
}

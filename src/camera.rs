// Opens a numbered camera and hands out RGB frames.
// Visual expectation: when the loop calls `next_frame()`, you get the latest
// camera image as an RgbImage, ready for a processor.

use image::RgbImage;

use crate::error::Error;
use crate::source::FrameSource;
use crate::types::Frame;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// A small wrapper around nokhwa::Camera so the loop stays clean.
pub struct CameraSource {
    cam: Camera,
    index: u32,
    width: u32,
    height: u32,
}

impl CameraSource {
    /// Try to open camera `index` at a target resolution (falls back if not exact).
    /// On success nothing is shown yet; we just hold an open stream.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames, prioritizing the format closest to our request.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // This fails if no device exists at that index.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera {index}: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream {index}: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();

        Ok(Self {
            cam,
            index,
            width: actual.width(),
            height: actual.height(),
        })
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl FrameSource for CameraSource {
    /// Blocks until the camera delivers a frame. A camera never ends, so this
    /// is always `Some` or a (possibly transient) error.
    fn next_frame(&mut self) -> Result<Option<Frame>, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // Decode to an ImageBuffer<Rgb<u8>, Vec<u8>> (handles various raw formats safely).
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // Rebuild from raw bytes so we do not depend on nokhwa's `image` version.
        let (w, h) = rgb.dimensions();
        let img = RgbImage::from_raw(w, h, rgb.into_raw())
            .ok_or_else(|| Error::CameraFrame(format!("Short RGB buffer for {w}x{h}")))?;

        Ok(Some(Frame::Color(img)))
    }

    fn describe(&self) -> String {
        format!("camera {} ({}x{})", self.index, self.width, self.height)
    }
}

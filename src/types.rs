// Core types shared by sources, processors, the panel and the display.

use image::{DynamicImage, GrayImage, RgbImage, imageops};

/// One captured (or derived) image: grayscale or RGB, origin top-left.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Gray(GrayImage),
    Color(RgbImage),
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Frame::Gray(img) => img.dimensions(),
            Frame::Color(img) => img.dimensions(),
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, Frame::Color(_))
    }

    /// Luma view of the frame (a copy for gray frames).
    pub fn to_gray(&self) -> GrayImage {
        match self {
            Frame::Gray(img) => img.clone(),
            Frame::Color(img) => imageops::grayscale(img),
        }
    }

    /// RGB view of the frame; gray samples are replicated into all channels.
    pub fn to_rgb(&self) -> RgbImage {
        match self {
            Frame::Gray(img) => DynamicImage::ImageLuma8(img.clone()).to_rgb8(),
            Frame::Color(img) => img.clone(),
        }
    }

    /// Copy of the rectangle at (x, y) of size w×h, clipped to the frame.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Frame {
        match self {
            Frame::Gray(img) => Frame::Gray(imageops::crop_imm(img, x, y, w, h).to_image()),
            Frame::Color(img) => Frame::Color(imageops::crop_imm(img, x, y, w, h).to_image()),
        }
    }
}

impl From<GrayImage> for Frame {
    fn from(img: GrayImage) -> Self {
        Frame::Gray(img)
    }
}

impl From<RgbImage> for Frame {
    fn from(img: RgbImage) -> Self {
        Frame::Color(img)
    }
}

/// Pixels packed the way minifb wants them.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the image is on screen (pixels)
    pub height: usize,    // how tall the image is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl From<&Frame> for FrameBuffer {
    fn from(frame: &Frame) -> Self {
        let (w, h) = frame.dimensions();
        let mut out = Vec::with_capacity((w as usize) * (h as usize));
        match frame {
            Frame::Gray(img) => {
                for pixel in img.pixels() {
                    let v = pixel[0] as u32;
                    out.push((v << 16) | (v << 8) | v);
                }
            }
            Frame::Color(img) => {
                for pixel in img.pixels() {
                    // Each `pixel` is Rgb<u8>. We pack it as 0x00RRGGBB.
                    let r = pixel[0] as u32;
                    let g = pixel[1] as u32;
                    let b = pixel[2] as u32;
                    out.push((r << 16) | (g << 8) | b);
                }
            }
        }
        FrameBuffer {
            width: w as usize,
            height: h as usize,
            pixels: out,
        }
    }
}

/// A named image a processor wants on screen this tick.
#[derive(Clone, Debug)]
pub struct View {
    pub window: &'static str,
    pub image: Frame,
}

impl View {
    pub fn new(window: &'static str, image: impl Into<Frame>) -> Self {
        Self {
            window,
            image: image.into(),
        }
    }
}

/// Left-button pointer activity in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Press { x: u32, y: u32 },
    Drag { x: u32, y: u32 },
    Release { x: u32, y: u32 },
}

impl PointerEvent {
    pub fn position(&self) -> (u32, u32) {
        match *self {
            PointerEvent::Press { x, y }
            | PointerEvent::Drag { x, y }
            | PointerEvent::Release { x, y } => (x, y),
        }
    }
}

/// Everything one poll of the display collected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Input {
    /// Lowest-order key code of the first key pressed (letters are lowercase ASCII).
    pub key: Option<u8>,
    /// Pointer events in arrival order, tagged with the window they happened in.
    pub pointer: Vec<(String, PointerEvent)>,
    /// A window was closed by the user.
    pub closed: bool,
}

impl Input {
    pub fn key(key: u8) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    pub fn pointer(window: &str, events: impl IntoIterator<Item = PointerEvent>) -> Self {
        Self {
            pointer: events
                .into_iter()
                .map(|ev| (window.to_string(), ev))
                .collect(),
            ..Self::default()
        }
    }
}

// On-screen windows via minifb: one resizable window per view name.
// Visual: each named view gets its own window; dragging the left mouse
// button inside a window produces press/drag/release events in image pixels.

use std::thread;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};
use tracing::debug;

use super::DisplaySink;
use crate::error::Error;
use crate::types::{Frame, FrameBuffer, Input, PointerEvent};

/// Input is sampled this often while waiting, so short clicks are not missed.
const POLL_SLICE: Duration = Duration::from_millis(4);

struct Surface {
    name: String,
    window: Window,          // the on-screen window you see
    size: (usize, usize),    // size of the last buffer pushed
    button_down: bool,       // left button state at the previous sample
    last_pos: Option<(u32, u32)>,
}

impl Surface {
    fn open(name: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        };
        let window = Window::new(name, width.max(1), height.max(1), options)
            .map_err(|e| Error::WindowInit(format!("{name}: {e}")))?;
        Ok(Self {
            name: name.to_string(),
            window,
            size: (width, height),
            button_down: false,
            last_pos: None,
        })
    }

    /// Push the pixels to the screen (this also pumps the window's events).
    fn present(&mut self, fb: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&fb.pixels, fb.width, fb.height)
            .map_err(|e| Error::WindowUpdate(format!("{}: {e}", self.name)))?;
        self.size = (fb.width, fb.height);
        Ok(())
    }

    /// Mouse position mapped from window pixels to image pixels.
    fn mouse_pos(&self) -> Option<(u32, u32)> {
        let (mx, my) = self.window.get_unscaled_mouse_pos(MouseMode::Clamp)?;
        let (ww, wh) = self.window.get_size();
        let (bw, bh) = self.size;
        if ww == 0 || wh == 0 || bw == 0 || bh == 0 {
            return None;
        }
        let x = (mx.max(0.0) * bw as f32 / ww as f32) as usize;
        let y = (my.max(0.0) * bh as f32 / wh as f32) as usize;
        Some((x.min(bw - 1) as u32, y.min(bh - 1) as u32))
    }

    /// Compare the left button against the previous sample and emit what changed.
    fn sample_pointer(&mut self, out: &mut Vec<(String, PointerEvent)>) {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pos = self.mouse_pos();
        let event = match (self.button_down, down, pos) {
            (false, true, Some((x, y))) => Some(PointerEvent::Press { x, y }),
            (true, true, Some((x, y))) if pos != self.last_pos => Some(PointerEvent::Drag { x, y }),
            (true, false, _) => pos
                .or(self.last_pos)
                .map(|(x, y)| PointerEvent::Release { x, y }),
            _ => None,
        };
        if let Some(ev) = event {
            out.push((self.name.clone(), ev));
        }
        self.button_down = down;
        if pos.is_some() {
            self.last_pos = pos;
        }
    }
}

/// Lowest-order key code for a key: letters and digits as lowercase ASCII.
fn key_code(key: Key) -> Option<u8> {
    let code = match key {
        Key::A => b'a', Key::B => b'b', Key::C => b'c', Key::D => b'd',
        Key::E => b'e', Key::F => b'f', Key::G => b'g', Key::H => b'h',
        Key::I => b'i', Key::J => b'j', Key::K => b'k', Key::L => b'l',
        Key::M => b'm', Key::N => b'n', Key::O => b'o', Key::P => b'p',
        Key::Q => b'q', Key::R => b'r', Key::S => b's', Key::T => b't',
        Key::U => b'u', Key::V => b'v', Key::W => b'w', Key::X => b'x',
        Key::Y => b'y', Key::Z => b'z',
        Key::Key0 => b'0', Key::Key1 => b'1', Key::Key2 => b'2', Key::Key3 => b'3',
        Key::Key4 => b'4', Key::Key5 => b'5', Key::Key6 => b'6', Key::Key7 => b'7',
        Key::Key8 => b'8', Key::Key9 => b'9',
        Key::Space => b' ',
        Key::Enter => b'\r',
        Key::Escape => 27,
        _ => return None,
    };
    Some(code)
}

/// All windows of one run.
#[derive(Default)]
pub struct WindowSink {
    surfaces: Vec<Surface>,
}

impl WindowSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for WindowSink {
    fn show(&mut self, window: &str, image: &Frame) -> Result<(), Error> {
        let fb = FrameBuffer::from(image);
        let idx = match self.surfaces.iter().position(|s| s.name == window) {
            Some(idx) => idx,
            None => {
                debug!(window, width = fb.width, height = fb.height, "opening window");
                self.surfaces.push(Surface::open(window, fb.width, fb.height)?);
                self.surfaces.len() - 1
            }
        };
        self.surfaces[idx].present(&fb)
    }

    fn poll_input(&mut self, timeout: Duration) -> Result<Input, Error> {
        let deadline = Instant::now() + timeout;
        let mut input = Input::default();
        loop {
            for surface in &mut self.surfaces {
                surface.window.update();
                if !surface.window.is_open() {
                    input.closed = true;
                    continue;
                }
                if input.key.is_none() {
                    input.key = surface
                        .window
                        .get_keys_pressed(KeyRepeat::No)
                        .into_iter()
                        .find_map(key_code);
                }
                surface.sample_pointer(&mut input.pointer);
            }

            let now = Instant::now();
            if input.key.is_some() || input.closed || now >= deadline {
                return Ok(input);
            }
            thread::sleep(POLL_SLICE.min(deadline - now));
        }
    }
}

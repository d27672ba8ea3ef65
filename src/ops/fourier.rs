// 2-D discrete Fourier transform on top of `rustfft`.
//
// Rows are transformed first, then columns. The inverse transform is scaled
// by 1/(w·h) so forward + inverse returns the input.

use image::GrayImage;
use rustfft::num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};

/// Dense row-major grid of complex samples.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Complex<f32>>,
}

impl ComplexImage {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Complex::new(0.0, 0.0); width * height],
        }
    }

    /// Copy `img` into the top-left corner of a zero-filled `width`×`height` grid.
    /// Samples of `img` beyond that size are dropped.
    pub fn from_gray_padded(img: &GrayImage, width: usize, height: usize) -> Self {
        let mut out = Self::zeros(width, height);
        let copy_w = (img.width() as usize).min(width);
        let copy_h = (img.height() as usize).min(height);
        for y in 0..copy_h {
            for x in 0..copy_w {
                out.data[y * width + x].re = img.get_pixel(x as u32, y as u32)[0] as f32;
            }
        }
        out
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Complex<f32> {
        self.data[y * self.width + x]
    }

    /// Move the zero frequency from (0,0) to (w/2, h/2).
    pub fn fft_shift(&self) -> Self {
        self.rolled(self.width / 2, self.height / 2)
    }

    /// Undo [`fft_shift`](Self::fft_shift), also for odd sizes.
    pub fn ifft_shift(&self) -> Self {
        self.rolled(self.width - self.width / 2, self.height - self.height / 2)
    }

    /// Cyclic roll: sample (x, y) moves to ((x + dx) % w, (y + dy) % h).
    fn rolled(&self, dx: usize, dy: usize) -> Self {
        let (w, h) = (self.width, self.height);
        let mut out = Self::zeros(w, h);
        if w == 0 || h == 0 {
            return out;
        }
        for y in 0..h {
            let ny = (y + dy) % h;
            for x in 0..w {
                let nx = (x + dx) % w;
                out.data[ny * w + nx] = self.data[y * w + x];
            }
        }
        out
    }

    /// Element-wise product with a real mask of the same size.
    pub fn apply_mask(&mut self, mask: &[f32]) {
        for (c, &m) in self.data.iter_mut().zip(mask) {
            *c *= m;
        }
    }

    pub fn real(&self) -> Vec<f32> {
        self.data.iter().map(|c| c.re).collect()
    }

    pub fn magnitude(&self) -> Vec<f32> {
        self.data.iter().map(|c| c.norm()).collect()
    }
}

/// Forward or inverse transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Caches FFT plans between frames; every frame of a run has the same size.
pub struct Fourier {
    planner: FftPlanner<f32>,
}

impl Default for Fourier {
    fn default() -> Self {
        Self::new()
    }
}

impl Fourier {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Transform `field` in place.
    pub fn dft(&mut self, field: &mut ComplexImage, direction: Direction) {
        let (w, h) = (field.width, field.height);
        if w == 0 || h == 0 {
            return;
        }
        let dir = match direction {
            Direction::Forward => FftDirection::Forward,
            Direction::Inverse => FftDirection::Inverse,
        };

        // rows are contiguous, so one call handles all of them
        let row_fft = self.planner.plan_fft(w, dir);
        row_fft.process(&mut field.data);

        let col_fft = self.planner.plan_fft(h, dir);
        let mut column = vec![Complex::new(0.0, 0.0); h];
        for x in 0..w {
            for y in 0..h {
                column[y] = field.data[y * w + x];
            }
            col_fft.process(&mut column);
            for y in 0..h {
                field.data[y * w + x] = column[y];
            }
        }

        if direction == Direction::Inverse {
            let scale = 1.0 / (w * h) as f32;
            for c in field.data.iter_mut() {
                *c *= scale;
            }
        }
    }
}

/// Smallest n' ≥ n whose only prime factors are 2, 3 and 5; FFTs of such
/// sizes run fastest.
pub fn optimal_dft_size(n: u32) -> u32 {
    let mut m = n.max(1);
    while !is_5_smooth(m) {
        m += 1;
    }
    m
}

fn is_5_smooth(mut n: u32) -> bool {
    for p in [2, 3, 5] {
        while n % p == 0 {
            n /= p;
        }
    }
    n == 1
}

/// Stretch `values` linearly so min → 0 and max → 255. A flat input maps to 0.
pub fn normalize_to_u8(values: &[f32]) -> Vec<u8> {
    let (lo, hi) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = hi - lo;
    if !(range > 0.0) {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|&v| ((v - lo) / range * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect()
}

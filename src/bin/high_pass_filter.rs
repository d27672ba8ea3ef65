// Fourier high-pass filter with an adjustable stop radius.

use framelab::processors::HighPassDemo;

fn main() -> Result<(), framelab::Error> {
    framelab::app::run(HighPassDemo::new())
}

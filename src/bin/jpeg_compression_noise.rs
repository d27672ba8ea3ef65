// Amplified JPEG compression noise at an adjustable quality.

use framelab::processors::JpegNoiseDemo;

fn main() -> Result<(), framelab::Error> {
    framelab::app::run(JpegNoiseDemo::new())
}

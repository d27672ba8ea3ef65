// Contrast limited adaptive histogram equalization on a live feed.

use framelab::processors::EqualizeDemo;

fn main() -> Result<(), framelab::Error> {
    framelab::app::run(EqualizeDemo::new())
}

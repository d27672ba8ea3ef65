// Grayscale histogram of a live feed, as bars and as a line.

use framelab::processors::HistogramDemo;

fn main() -> Result<(), framelab::Error> {
    framelab::app::run(HistogramDemo::new())
}

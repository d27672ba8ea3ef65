// Drag a region on the live feed, then watch it being tracked.

use framelab::processors::TemplateDemo;

fn main() -> Result<(), framelab::Error> {
    framelab::app::run(TemplateDemo::new())
}

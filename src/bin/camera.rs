//! Camera lesson

use blocks_lessons::lessons::camera;

fn main() -> anyhow::Result<()> {
    let settings = blocks_lessons::bootstrap("Camera lesson");
    camera::run(&settings)
}

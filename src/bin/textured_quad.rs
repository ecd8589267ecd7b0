//! Textured quad lesson

use blocks_lessons::lessons::textured_quad;

fn main() -> anyhow::Result<()> {
    let settings = blocks_lessons::bootstrap("Textured quad lesson");
    textured_quad::run(&settings)
}

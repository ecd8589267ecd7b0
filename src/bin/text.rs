//! Text lesson

use blocks_lessons::lessons::text;

fn main() -> anyhow::Result<()> {
    let settings = blocks_lessons::bootstrap("Text lesson");
    text::run(&settings)
}

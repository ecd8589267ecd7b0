//! Triangle lesson

use blocks_lessons::lessons::triangle;

fn main() -> anyhow::Result<()> {
    let settings = blocks_lessons::bootstrap("Triangle lesson");
    triangle::run(&settings)
}

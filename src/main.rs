//! Blocks game entry point

use blocks_lessons::lessons::blocks;

fn main() -> anyhow::Result<()> {
    let settings = blocks_lessons::bootstrap("Blocks game");
    blocks::run(&settings)?;
    log::info!("Bye");
    Ok(())
}

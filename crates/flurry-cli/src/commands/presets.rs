//! Presets command - lists built-in scenes

use crate::presets::PRESETS;
use anyhow::Result;

pub fn run() -> Result<()> {
    for (name, description, _) in PRESETS {
        println!("{:<10} {}", name, description);
    }
    Ok(())
}

//! Test image generator
//!
//! Writes the 64-byte program image the demo scripts expect: 32 ascending
//! text bytes followed by 32 data bytes, each segment page-aligned under
//! the default 16-byte page geometry.

use anyhow::Context;
use clap::Parser;
use std::fs;

#[derive(Debug, Parser)]
#[clap(name = "genimage")]
#[clap(about = "Generates a small program image for simulator scripts", long_about = None)]
struct Cli {
    /// Output path
    #[clap(default_value = "program.bin", value_parser)]
    path: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut image = Vec::with_capacity(64);
    image.extend(1..=32u8);
    image.extend((0..32u8).map(|i| 0xA1 + i));
    fs::write(&cli.path, &image).with_context(|| format!("writing {}", cli.path))?;
    println!(
        "Wrote {} ({} bytes total: 32B text + 32B data)",
        cli.path,
        image.len()
    );
    Ok(())
}

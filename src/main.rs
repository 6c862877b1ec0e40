use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod font;
mod icon_gen;

#[derive(Debug, Parser)]
#[clap(
    name = "krigzis-icon-gen",
    about = "Generate the Krigzis application icon set"
)]
struct Args {
    /// Output directory for the generated PNG files.
    #[clap(short, long, value_name = "DIR", default_value = "assets")]
    output: PathBuf,

    /// Letter drawn in the middle of the icon.
    #[clap(short, long, value_name = "CHAR", default_value = "K")]
    letter: char,

    /// Gradient color at the disk edge (CSS color format).
    #[clap(long, value_name = "COLOR", default_value = "#00D4AA")]
    edge_color: String,

    /// Gradient color at the disk center (CSS color format).
    #[clap(long, value_name = "COLOR", default_value = "#7B3FF2")]
    center_color: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(icon_gen::Options {
        output: args.output,
        letter: args.letter,
        edge_color: args.edge_color,
        center_color: args.center_color,
    })
}

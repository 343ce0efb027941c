use std::path::PathBuf;

use clap::Parser;
use viewcube::{Options, Viewer};

#[derive(Parser)]
#[command(name = "viewcube")]
#[command(about = "Orbit-camera viewer with a clickable view cube")]
struct Cli {
    /// TOML options file; missing keys keep their defaults
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Window title
    #[arg(long, default_value = "View Cube")]
    title: String,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = match cli.options.as_deref() {
        Some(path) => match Options::load(path) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let viewer = Viewer::builder()
        .with_options(options)
        .with_title(cli.title)
        .build();
    if let Err(e) = viewer.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

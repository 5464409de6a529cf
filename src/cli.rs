use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lele-count", about = "Catfish fry counter using contour segmentation and rotated template matching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// History CSV file.
    #[arg(long, default_value = lele_counter::history::DEFAULT_HISTORY_PATH, global = true)]
    pub history: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Count fry in one image.
    Detect {
        /// Input image (any format the `image` crate decodes).
        #[arg(required = true)]
        input: PathBuf,
        /// Directory of reference silhouettes.
        #[arg(long, default_value = "edited")]
        templates: PathBuf,
        /// Fraction of pixels that must agree for a match.
        #[arg(long, default_value = "0.5")]
        threshold: f64,
        /// Where to write the annotated image.
        #[arg(long, default_value = "lele_annotated.png")]
        output: PathBuf,
        /// Skip template files that fail to decode instead of aborting.
        #[arg(long)]
        skip_bad_templates: bool,
        /// Do not append the count to the history file.
        #[arg(long)]
        no_history: bool,
    },
    /// Print the detection history.
    History,
}

use clap::Subcommand;
use std::path::PathBuf;
use std::str::FromStr;

use crate::formats::ModelFormat;

pub mod batch;
pub mod convert;
mod execute;
pub mod inspect;
pub mod json;

/// Source layout argument: `auto`, `317`/`osrs` or `667`
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatArg(pub Option<ModelFormat>);

impl FromStr for FormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(FormatArg(None));
        }
        s.parse::<ModelFormat>()
            .map(|format| FormatArg(Some(format)))
            .map_err(|_| format!("Invalid format '{s}'. Valid values: auto, 317/osrs, 667"))
    }
}

/// Target layout argument: `317`/`osrs` or `667`
#[derive(Debug, Clone, Copy)]
pub struct TargetArg(pub ModelFormat);

impl FromStr for TargetArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ModelFormat>()
            .map(TargetArg)
            .map_err(|_| format!("Invalid target format '{s}'. Valid values: 317/osrs, 667"))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the footer and attribute summary of a model
    Inspect {
        /// Model file
        source: PathBuf,

        /// Model layout (auto, 317, 667)
        #[arg(short, long, default_value = "auto")]
        format: FormatArg,
    },

    /// Convert a model between the 317 and 667 layouts
    Convert {
        /// Source model
        source: PathBuf,

        /// Destination model
        destination: PathBuf,

        /// Source layout (auto, 317, 667)
        #[arg(long, default_value = "auto")]
        from: FormatArg,

        /// Target layout (317, 667)
        #[arg(long, default_value = "317")]
        to: TargetArg,
    },

    /// Dump a model as JSON
    #[command(name = "to-json")]
    ToJson {
        /// Source model
        source: PathBuf,

        /// Destination JSON file
        destination: PathBuf,

        /// Source layout (auto, 317, 667)
        #[arg(long, default_value = "auto")]
        from: FormatArg,
    },

    /// Build a model from a JSON dump
    #[command(name = "from-json")]
    FromJson {
        /// Source JSON file
        source: PathBuf,

        /// Destination model
        destination: PathBuf,

        /// Target layout (317, 667)
        #[arg(long, default_value = "317")]
        to: TargetArg,
    },

    /// Convert every .dat model in a directory tree
    Batch {
        /// Source directory
        source: PathBuf,

        /// Output directory
        destination: PathBuf,

        /// Source layout (auto, 317, 667)
        #[arg(long, default_value = "auto")]
        from: FormatArg,

        /// Target layout (317, 667)
        #[arg(long, default_value = "317")]
        to: TargetArg,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },
}

//! Command execution implementations

use super::Commands;
use super::{batch, convert, inspect, json};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Inspect { source, format } => inspect::execute(source, format.0),
            Commands::Convert {
                source,
                destination,
                from,
                to,
            } => convert::execute(source, destination, from.0, to.0),
            Commands::ToJson {
                source,
                destination,
                from,
            } => json::to_json(source, destination, from.0),
            Commands::FromJson {
                source,
                destination,
                to,
            } => json::from_json(source, destination, to.0),
            Commands::Batch {
                source,
                destination,
                from,
                to,
                quiet,
            } => batch::execute(source, destination, from.0, to.0, *quiet),
        }
    }
}

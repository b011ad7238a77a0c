use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "symgraph", version, about = "Code-property-graph indexer for Kotlin, Java, TypeScript and JavaScript")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Parse, resolve, and write a project's code-property graph
    Index {
        /// Root directory of the project to index
        path: PathBuf,

        /// Human-readable project name stored on the Project node (defaults
        /// to the directory's file name)
        #[arg(long)]
        name: Option<String>,

        /// Path to the SQLite database file (overrides the config file and
        /// the `symgraph.sqlite` default)
        #[arg(long)]
        database: Option<String>,

        /// Delete the whole graph before writing this pass, instead of a
        /// scoped clear of this project's own file paths
        #[arg(long)]
        clear: bool,

        /// Skip domain analysis even if a domains config is present
        #[arg(long)]
        no_domains: bool,

        /// Path to a domains config file (overrides `.symgraph/symgraph.json`)
        #[arg(long)]
        domains_config: Option<PathBuf>,

        /// Upsert batch size (overrides the config file and the default of 100)
        #[arg(long)]
        batch_size: Option<usize>,

        /// Emit the write summary as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

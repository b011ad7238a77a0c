//! symgraph CLI — builds a code-property graph for a Kotlin/Java/TypeScript/
//! JavaScript project and writes it to a SQLite-backed store.

use clap::Parser;

mod cli_args;
mod commands;

use cli_args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Index {
            path,
            name,
            database,
            clear,
            no_domains,
            domains_config,
            batch_size,
            json,
        } => commands::index::run(path, name, database, clear, no_domains, domains_config, batch_size, json),
    };

    std::process::exit(exit_code);
}

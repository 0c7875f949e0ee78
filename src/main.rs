//! gdexport CLI entry point.

use clap::Parser;
use gdexport::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Generate(args) => cli::run_generate(args),
        Commands::ListDocs(args) => cli::run_list_docs(args),
        Commands::EntryPoint(args) => cli::run_entry_point(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("An unknown error occurred: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

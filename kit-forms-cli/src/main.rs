mod commands;
mod templates;

use clap::{Parser, Subcommand};
use console::style;

#[derive(Parser)]
#[command(name = "kit-forms")]
#[command(about = "Scaffolding for kit-forms applications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new form request
    #[command(name = "make:request")]
    MakeRequest {
        /// Name of the request (e.g., UpdatePost, posts)
        name: String,

        /// Directory to write into (default: $KIT_REQUESTS_PATH or src/requests)
        #[arg(long)]
        path: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::MakeRequest { name, path } => commands::make_request::run(name, path),
    };

    if let Err(message) = result {
        eprintln!("{} {}", style("Error:").red().bold(), message);
        std::process::exit(1);
    }
}

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
use commands::{execute_serve_command, execute_validate_command, ServeArgs, ValidateArgs};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee - in-memory movie catalog over HTTP")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the movie API
    Serve(ServeCommandArgs),
    /// Validate a movie payload file without starting the server
    Validate(ValidateCommandArgs),
}

#[derive(Args)]
pub struct ServeCommandArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = marquee_adapters::DEFAULT_PORT)]
    pub port: u16,
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
    /// Origin allowed cross-origin access (repeatable; replaces the built-in list)
    #[arg(long = "origin", value_name = "ORIGIN")]
    pub origins: Vec<String>,
    /// JSON file to seed the collection from instead of the bundled dataset
    #[arg(long)]
    pub seed: Option<String>,
}

#[derive(Args)]
pub struct ValidateCommandArgs {
    /// Path to the JSON payload
    pub payload: String,
    /// Validate as a partial (PATCH) payload
    #[arg(long)]
    pub partial: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let serve_args = ServeArgs {
                host: args.host,
                port: args.port,
                origins: args.origins,
                seed: args.seed,
            };
            execute_serve_command(serve_args).await
        }
        Commands::Validate(args) => execute_validate_command(ValidateArgs {
            payload: args.payload,
            partial: args.partial,
        }),
    }
}

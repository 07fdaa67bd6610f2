//! odata-erd command line interface

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use odata_erd::cli::CliError;
use odata_erd::cli::commands::inspect::handle_inspect;
use odata_erd::cli::commands::render::{RenderOptions, handle_render};
use odata_erd::import::ImportError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Convert OData metadata into Mermaid entity-relationship diagrams
#[derive(Parser, Debug)]
#[command(name = "odata-erd", version)]
#[command(about = "Convert OData metadata into Mermaid ER diagrams", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a metadata document as an erDiagram
    Render {
        /// Metadata file (use "-" for stdin)
        #[arg(value_name = "FILE")]
        input: String,

        /// Write the diagram to a file instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Wrap the diagram in a ```mermaid fence
        #[arg(long)]
        fenced: bool,

        /// Drop relationships guessed from navigation names
        #[arg(long)]
        strict: bool,

        /// Comma separated entity names to render
        #[arg(long, value_name = "A,B")]
        entities: Option<String>,

        /// Also render entities directly related to the selection
        #[arg(long, requires = "entities")]
        include_related: bool,

        /// TOML configuration file
        #[arg(long, value_name = "CFG")]
        config: Option<PathBuf>,
    },
    /// Dump the normalized model, keys, navigation rows, tags and findings
    Inspect {
        /// Metadata file (use "-" for stdin)
        #[arg(value_name = "FILE")]
        input: String,

        /// Output format
        #[arg(long, default_value = "summary", value_parser = ["json", "yaml", "summary"])]
        format: String,

        /// TOML configuration file
        #[arg(long, value_name = "CFG")]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Render {
            input,
            output,
            fenced,
            strict,
            entities,
            include_related,
            config,
        } => {
            let options = RenderOptions {
                input: input.clone(),
                output,
                fenced,
                strict,
                entities,
                include_related,
                config,
            };
            handle_render(&options).with_context(|| format!("Failed to render {}", input))
        }
        Commands::Inspect { input, format, config } => {
            handle_inspect(&input, &format, config.as_ref()).with_context(|| format!("Failed to inspect {}", input))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(CliError::Import(ImportError::SchemaNotFound)) = err.downcast_ref::<CliError>() {
                eprintln!("Error: the input is not OData metadata (no Schema element found)");
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

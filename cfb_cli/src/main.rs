mod cmds;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "cfbc")]
#[command(about = "FlatBuffers builder generator - layout resolution and Rust codegen")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a builder source file from a decoded schema (the default)
    Generate(GenerateArgs),

    /// Print the resolved layout of every record without writing files
    Analyze {
        /// Decoded schema (JSON or YAML)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Report structs without trailing fillers
        #[arg(long = "no-trailing-padding")]
        no_trailing_padding: bool,

        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Decoded schema (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    schema: Option<PathBuf>,

    /// Output directory, defaults to the schema's directory
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Stop structs right after their last field
    #[arg(long = "no-trailing-padding")]
    no_trailing_padding: bool,

    /// Runtime crate path used in generated `use` lines
    #[arg(long = "runtime-crate", value_name = "PATH", default_value = "cfb")]
    runtime_crate: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    init_tracing(args.verbose);
    let schema = args
        .schema
        .ok_or_else(|| anyhow::anyhow!("missing SCHEMA argument (see `cfbc --help`)"))?;
    cmds::generate::run(
        schema,
        args.output_dir,
        args.no_trailing_padding,
        args.runtime_crate,
    )
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Analyze {
            schema,
            no_trailing_padding,
            verbose,
        }) => {
            init_tracing(verbose);
            cmds::analyze::run(schema, no_trailing_padding)
        }
        None => run_generate(cli.generate),
    }
}

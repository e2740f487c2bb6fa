use clap::{Parser, Subcommand};

#[cfg(not(feature = "dhat-heap"))]
use mimalloc::MiMalloc;

use crate::{
    compare::CompareArgs, config::ConfigArgs, schema::SchemaKind, sensitivity::SensitivityArgs,
    solve::SolveArgs,
};

mod compare;
mod config;
mod file_utils;
mod parsers;
mod schema;
mod sensitivity;
mod solve;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[cfg(not(feature = "dhat-heap"))]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    config: ConfigArgs,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Route the orders of a request
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Solve what-if scenarios and compare them to the baseline
    Compare {
        #[command(flatten)]
        args: CompareArgs,
    },
    /// Sweep one parameter over a range
    Sensitivity {
        #[command(flatten)]
        args: SensitivityArgs,
    },
    /// Print the JSON schema of an input file
    Schema {
        #[arg(value_enum, default_value_t)]
        kind: SchemaKind,
    },
}

fn main() -> Result<(), anyhow::Error> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = cli.config.engine_config();

    match cli.command {
        Some(Commands::Solve { args }) => solve::run(args, &config)?,
        Some(Commands::Compare { args }) => compare::run(args, &config)?,
        Some(Commands::Sensitivity { args }) => sensitivity::run(args, &config)?,
        Some(Commands::Schema { kind }) => schema::run(kind)?,
        None => {}
    }

    Ok(())
}

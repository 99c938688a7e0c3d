use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use gitviz::{GitvizOptions, RenderArgs, RepoArgs, emit, run_main};
use gitviz_error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "gitviz",
    about = "gitviz: draw the objects of a git repository as a graph",
    version
)]
pub struct Cli {
    /// Draw only the tree this reference resolves to (e.g. HEAD^{tree}).
    /// Without it, every object in the repository is drawn.
    #[arg(value_name = "REFERENCE")]
    reference: Option<String>,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    repo: RepoArgs,

    #[command(flatten)]
    render: RenderArgs,

    /// Log phase timings and counts to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    let opts = GitvizOptions::new()
        .with_reference(args.reference)
        .with_output(args.output)
        .with_repo(args.repo)
        .with_render(args.render);

    let dot = run_main(&opts)?;
    emit(&opts, &dot)?;

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

pub fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            tracing::error!(error = %err, "execution failed");
            ExitCode::FAILURE
        }
    }
}

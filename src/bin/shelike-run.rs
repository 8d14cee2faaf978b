//! CLI driver for common chains built from the library's stages.
//!
//! Usage:
//!   shelike-run grep <pattern> <files...> [--sep SEP] [-o output]
//!   shelike-run find <topdir> <pattern>
//!   shelike-run shell <cmd> <files...> [-o output]
//!   shelike-run demo

use std::io::{self, Write};
use std::process;

use clap::{Parser, Subcommand};
use shelike_rs::{Pipeline, PipeError, Value, collect, stages};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Chain text processing stages the way a shell pipe would.
#[derive(Parser)]
#[command(name = "shelike-run")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// cat FILES | grep PATTERN | printlines
    Grep {
        /// Regular expression matched at the start of each line
        pattern: String,

        /// Files to read, in order
        #[arg(required = true)]
        files: Vec<String>,

        /// Separator written between lines (lines keep their own newline)
        #[arg(long, default_value = "")]
        sep: String,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// find TOPDIR PATTERN | aslist, one path per line
    Find {
        /// Directory to walk
        topdir: String,

        /// Shell glob matched against file names
        pattern: String,
    },
    /// cat FILES | shell CMD | printlines
    Shell {
        /// Command line passed to the platform shell
        cmd: String,

        /// Files whose lines become the command's standard input
        #[arg(required = true)]
        files: Vec<String>,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the built-in demonstration chains
    Demo,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose >= 2)
        .init();
}

fn run_demo() -> Result<(), PipeError> {
    // users whose login shell is bash
    println!("# cat /etc/passwd | grep '.*/bin/bash' | printlines");
    Pipeline::start(stages::cat("/etc/passwd"))
        .through(stages::grep(".*/bin/bash")?)
        .through(stages::printlines("", None)?)
        .finish()?;

    println!("# names | grep '__r' | aslist");
    let names = vec!["__add__", "__radd__", "__rsub__", "__sub__", "__rmul__"];
    let found = Pipeline::new(names)
        .through(stages::grep("__r")?)
        .through(&collect::ASLIST)
        .finish()?
        .materialize()?;
    println!("{found}");

    println!("# 'lambda' | enumerate | asdict");
    let map = Pipeline::new("lambda")
        .through(&collect::ENUMERATE)
        .through(&collect::ASDICT)
        .finish()?
        .materialize()?;
    println!("{map}");
    Ok(())
}

/// One path per line. Nothing at all when no path was found.
fn path_listing(found: Value) -> Result<String, PipeError> {
    let mut output = found
        .into_items()?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn run(command: Commands) -> Result<(), PipeError> {
    match command {
        Commands::Grep {
            pattern,
            files,
            sep,
            output,
        } => {
            debug!(pattern = %pattern, files = files.len(), "running grep chain");
            Pipeline::start(stages::cat(files))
                .through(stages::grep(pattern.as_str())?)
                .through(stages::printlines(&sep, output.as_deref())?)
                .finish()?;
        }
        Commands::Find { topdir, pattern } => {
            let found = Pipeline::start(stages::find(&topdir, &pattern))
                .through(&collect::ASLIST)
                .finish()?
                .materialize()?;
            let output = path_listing(found)?;
            io::stdout()
                .write_all(output.as_bytes())
                .map_err(PipeError::Stdout)?;
        }
        Commands::Shell { cmd, files, output } => {
            debug!(cmd = %cmd, files = files.len(), "running shell chain");
            Pipeline::start(stages::cat(files))
                .through(stages::shell(&cmd)?)
                .through(stages::printlines("", output.as_deref())?)
                .finish()?;
        }
        Commands::Demo => run_demo()?,
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Pipeline error: {e}");
        process::exit(1);
    }

    if let Err(e) = io::stdout().flush() {
        eprintln!("Error writing output: {e}");
        process::exit(1);
    }
}

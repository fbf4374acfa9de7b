use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use powerbb::{BuildOptions, InspectOptions};
use std::io::Read;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

/// Build PowerPoint decks from JSON and inspect existing decks.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a .pptx from a deck JSON file (`-` reads standard input)
    Build {
        input: String,
        #[arg(short, long)]
        output: PathBuf,
        /// Directory image paths are relative to
        #[arg(long)]
        base_dir: Option<PathBuf>,
        /// Accept comments, code fences and trailing commas
        #[arg(long)]
        lenient: bool,
    },
    /// One line per slide: index, layout, title and shape count
    List { file: PathBuf },
    /// Describe one slide (1-based)
    Show { file: PathBuf, slide: usize },
    /// Print the deck as JSON
    Dump {
        file: PathBuf,
        /// Only this slide (1-based)
        #[arg(long)]
        slide: Option<usize>,
        /// Write the JSON here instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Extract embedded images into this directory
        #[arg(long)]
        media_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output,
            base_dir,
            lenient,
        } => {
            let mut options = BuildOptions::new().with_lenient(lenient);
            if let Some(dir) = base_dir {
                options = options.with_base_dir(dir);
            }
            if input == "-" {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("reading deck JSON from standard input")?;
                powerbb::build_from_json(&text, &output, &options)?;
            } else {
                powerbb::build_from_file(&input, &output, &options)?;
            }
            info!("wrote {}", output.display());
        },
        Commands::List { file } => {
            for summary in powerbb::list(&file)? {
                println!("{summary}");
            }
        },
        Commands::Show { file, slide } => {
            print!("{}", powerbb::show(&file, slide)?);
        },
        Commands::Dump {
            file,
            slide,
            output,
            media_dir,
        } => {
            let mut options = InspectOptions::new();
            if let Some(dir) = media_dir {
                options = options.with_media_dir(dir);
            }
            let inspection = powerbb::inspect(&file, slide, &options)?;
            let json = inspection
                .deck
                .to_json_pretty()
                .context("serializing the deck")?;
            match output {
                Some(path) => std::fs::write(&path, json + "\n")
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
        },
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings plus whatever `-v` asks for.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("powerbb={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use pgn_tree::Game;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

type Result<T> = anyhow::Result<T>;

/// Reads a study export and prints its move trees.
#[derive(Parser)]
#[clap(version, about)]
struct Opts {
    /// the PGN export to read, `-` or nothing reads stdin
    input: Option<PathBuf>,
    /// print the trees as JSON instead of an outline
    #[clap(long)]
    json: bool,
    /// only print the game at this index, starting at 0
    #[clap(short, long)]
    game: Option<usize>,
    /// name of the study in error messages, the file name by default
    #[clap(short, long)]
    study: Option<String>,
    /// log more, can be repeated. RUST_LOG takes precedence
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    let text = read_input(opts.input.as_deref())?;
    let study = opts.study.clone().unwrap_or_else(|| {
        opts.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
            .and_then(Path::file_stem)
            .map_or("stdin".to_owned(), |stem| stem.to_string_lossy().into_owned())
    });

    let games = pgn_tree::parse(&text).with_context(|| format!("failed to parse study {study}"))?;
    info!(%study, games = games.len(), "parsed study");

    let selected: &[Game] = match opts.game {
        Some(index) => std::slice::from_ref(games.get(index).with_context(|| {
            format!("study {study} has {} games, there is no game {index}", games.len())
        })?),
        None => &games,
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(selected)?);
    } else {
        for (i, game) in selected.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", render::outline(game));
        }
    }

    Ok(())
}

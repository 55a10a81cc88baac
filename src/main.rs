//! Corsair -- a client engine for the pirates contest protocol.
//!
//! Reads the game engine's protocol from stdin and answers on stdout. The
//! built-in bot issues no orders, which makes the binary a protocol
//! conformance stub: every setup and every turn is acknowledged with `go`.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Env, Target};
use log::{error, LevelFilter};

use corsair::{Engine, IdleBot};

#[derive(Debug, Parser)]
#[command(name = "corsair", version, about = "Pirates protocol client engine")]
struct Args {
    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr. RUST_LOG wins.
    let fallback = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(fallback.to_string()))
        .target(Target::Stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut engine = Engine::new(IdleBot);

    match engine.run(stdin.lock(), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

mod cli;
mod commands;
mod config;
mod handlers;
mod progress;
mod remote;
mod store;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use std::io;

use cli::{Cli, Command};
use commands::Session;
use config::Config;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "obsync", &mut io::stdout());
            Ok(())
        }
        Command::Config(cmd) => commands::configs::run(cmd),
        command => {
            let config = Config::load(cli.url, cli.token)?;

            match command {
                Command::Apply(args) => {
                    let session = Session::new(config, args.dir.clone());
                    commands::apply::run(&ctx, &session, args)
                }
                Command::Diff(args) => {
                    let session = Session::new(config, args.dir.clone());
                    commands::diff::run(&ctx, &session, args)
                }
                Command::Status(args) => {
                    let session = Session::new(config, args.dir.clone());
                    commands::status::run(&ctx, &session, args)
                }
                Command::Pull(args) => {
                    let session = Session::new(config, args.dir.clone());
                    commands::pull::run(&ctx, &session, args)
                }
                Command::Config(..) | Command::Completions { .. } => unreachable!(),
            }
        }
    }
}

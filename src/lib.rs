pub mod cli;
pub mod config;
pub mod error;
pub mod format;
mod git;
pub mod process;

use config::Config;
use error::Error;
use git::parse::status::collect_one;
use std::{io::BufRead, path::Path};

pub use git::{
    parse::status::StatusParser,
    status::{DefaultEntryFactory, StatusEntry, StatusEntryFactory, StatusKind, StatusSnapshot},
};

const APP_NAME: &str = "gitu-status";
pub const LOG_FILE_NAME: &str = "gitu-status.log";

pub type Res<T> = Result<T, Error>;

pub fn run(args: &cli::Args, config: &Config) -> Res<StatusSnapshot> {
    if args.stdin {
        log::debug!("Reading status from stdin");
        return read_status(std::io::stdin().lock());
    }

    let dir = args.dir.as_deref().unwrap_or(Path::new("."));
    log::debug!("Running git status in {:?}", dir);
    git_status(config, dir)
}

/// Parses one complete porcelain status from `reader`.
pub fn read_status(reader: impl BufRead) -> Res<StatusSnapshot> {
    collect_one(|parser| {
        process::stream_reader(reader, Error::ReadInput, |line| parser.consume_line(line))
    })
}

/// Runs `git status --porcelain --branch` in `dir`, parsing the output as it streams in.
pub fn git_status(config: &Config, dir: &Path) -> Res<StatusSnapshot> {
    collect_one(|parser| {
        process::stream_cmd(git::status_cmd(config, dir), |line| {
            parser.consume_line(line)
        })
    })
}

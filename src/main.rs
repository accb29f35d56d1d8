use clap::Parser;
use gitu_status::{LOG_FILE_NAME, Res, cli::Args, config, error::Error, format};
use log::LevelFilter;
use std::process::ExitCode;

const VERSION: &str = git_version::git_version!(
    args = ["--tags", "--always", "--dirty=-modified"],
    fallback = env!("CARGO_PKG_VERSION")
);

fn main() -> ExitCode {
    let args = Args::parse();

    if args.version {
        println!("gitu-status {VERSION}");
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Res<()> {
    if args.log {
        simple_logging::log_to_file(LOG_FILE_NAME, LevelFilter::Trace)
            .map_err(Error::OpenLogFile)?;
    }

    log::debug!("Initializing config");
    let config = config::init_config(args.config.as_deref())?;

    let status = gitu_status::run(args, &config)?;
    print!("{}", format::format_status(&status, args.format)?);
    Ok(())
}

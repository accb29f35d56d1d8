use std::{fmt::Display, io};

#[derive(Debug)]
pub enum Error {
    UnparseableLine { line: String, expected: &'static str },
    NoStatusEmitted,
    Config(figment::Error),
    SpawnCmd(io::Error),
    CouldntReadCmdOutput(io::Error),
    CouldntAwaitCmd(io::Error),
    CmdBadExit(String, Option<i32>, String),
    ReadInput(io::Error),
    OpenLogFile(io::Error),
    SerializeToml(toml::ser::Error),
}

impl Error {
    pub(crate) fn unparseable(line: &str, expected: &'static str) -> Self {
        Error::UnparseableLine {
            line: line.to_string(),
            expected,
        }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnparseableLine { line, expected } => f.write_fmt(format_args!(
                "Unexpected input (expected {}): {:?}",
                expected, line
            )),
            Error::NoStatusEmitted => f.write_str("Status output ended without a status"),
            Error::Config(e) => f.write_fmt(format_args!("Configuration error: {}", e)),
            Error::SpawnCmd(e) => f.write_fmt(format_args!("Failed to spawn command: {}", e)),
            Error::CouldntReadCmdOutput(e) => {
                f.write_fmt(format_args!("Couldn't read command output: {}", e))
            }
            Error::CouldntAwaitCmd(e) => f.write_fmt(format_args!("Couldn't await command: {}", e)),
            Error::CmdBadExit(args, code, stderr) => {
                f.write_fmt(format_args!(
                    "'{}' exited with code: {}",
                    args,
                    code.map(|c| c.to_string())
                        .unwrap_or_else(|| "".to_string())
                ))?;
                if !stderr.is_empty() {
                    f.write_fmt(format_args!("\n{}", stderr))?;
                }
                Ok(())
            }
            Error::ReadInput(e) => f.write_fmt(format_args!("Couldn't read input: {}", e)),
            Error::OpenLogFile(e) => f.write_fmt(format_args!("Couldn't open log file: {}", e)),
            Error::SerializeToml(e) => {
                f.write_fmt(format_args!("Couldn't serialize status: {}", e))
            }
        }
    }
}

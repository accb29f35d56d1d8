use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Default, Debug, Parser)]
#[command(name = crate::APP_NAME)]
pub struct Args {
    /// Parse porcelain status from stdin instead of running git
    #[clap(long, action)]
    pub stdin: bool,
    /// Run git as if it was started in this directory
    #[clap(short = 'C', value_name = "DIR")]
    pub dir: Option<PathBuf>,
    #[clap(long, value_enum, default_value_t = OutputFormat::Short)]
    pub format: OutputFormat,
    /// Config file merged on top of the user config
    #[clap(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Enable logging to 'gitu-status.log'
    #[clap(long, action)]
    pub log: bool,

    #[clap(long, action)]
    /// Print version
    pub version: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Short,
    Toml,
}

use crate::config::Config;
use std::{path::Path, process::Command};

pub(crate) mod parse;
pub mod status;

pub(crate) fn status_cmd(config: &Config, dir: &Path) -> Command {
    let mut cmd = Command::new(&config.git.program);
    cmd.current_dir(dir);
    cmd.args(["status", "--porcelain", "--branch"]);

    if !config.status.untracked {
        cmd.arg("--untracked-files=no");
    }

    cmd
}

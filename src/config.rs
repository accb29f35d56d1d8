use crate::{APP_NAME, Res, error::Error};
use etcetera::BaseStrategy;
use figment::{
    Figment,
    providers::{Format, Toml},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize)]
pub struct Config {
    pub git: GitConfig,
    pub status: StatusConfig,
}

#[derive(Debug, Deserialize)]
pub struct GitConfig {
    pub program: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusConfig {
    pub untracked: bool,
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("Failed to parse default_config.toml")
    }
}

pub fn init_config(extra: Option<&Path>) -> Res<Config> {
    load(user_config_path(), extra)
}

fn user_config_path() -> Option<PathBuf> {
    match etcetera::choose_base_strategy() {
        Ok(strategy) => Some(strategy.config_dir().join(APP_NAME).join("config.toml")),
        Err(err) => {
            log::warn!("Couldn't find config dir: {}", err);
            None
        }
    }
}

pub(crate) fn load(user_file: Option<PathBuf>, extra: Option<&Path>) -> Res<Config> {
    let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

    if let Some(path) = user_file {
        log::debug!("Merging config {:?}", path);
        figment = figment.merge(Toml::file(path));
    }

    if let Some(path) = extra {
        if !path.exists() {
            log::warn!("Config file {:?} doesn't exist", path);
        }
        figment = figment.merge(Toml::file(path));
    }

    figment.extract().map_err(Error::Config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use temp_dir::TempDir;

    #[test]
    fn defaults() {
        let config = load(None, None).unwrap();
        assert_eq!(config.git.program, "git");
        assert!(config.status.untracked);
    }

    #[test]
    fn default_impl_matches_embedded_file() {
        let config = Config::default();
        assert_eq!(config.git.program, "git");
    }

    #[test]
    fn later_files_override_earlier() {
        let dir = TempDir::new().unwrap();
        let user = dir.child("user.toml");
        let extra = dir.child("extra.toml");
        fs::write(&user, "[git]\nprogram = \"/usr/bin/git\"\n[status]\nuntracked = false\n")
            .unwrap();
        fs::write(&extra, "[status]\nuntracked = true\n").unwrap();

        let config = load(Some(user), Some(&extra)).unwrap();
        assert_eq!(config.git.program, "/usr/bin/git");
        assert!(config.status.untracked);
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let config = load(Some(dir.child("nope.toml")), None).unwrap();
        assert_eq!(config.git.program, "git");
    }

    #[test]
    fn wrong_type_is_an_error() {
        let dir = TempDir::new().unwrap();
        let extra = dir.child("bad.toml");
        fs::write(&extra, "[status]\nuntracked = \"sometimes\"\n").unwrap();

        assert!(matches!(load(None, Some(&extra)), Err(Error::Config(_))));
    }
}

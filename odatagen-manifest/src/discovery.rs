//! Locating the configuration file.
//!
//! Discovery runs an ordered list of named strategies. Each one either finds
//! a file or explains why it did not; the first hit wins, and running out of
//! strategies yields [`Error::ConfigurationNotFound`] listing every attempt.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{Error, FILE_NAMES, Result};

/// Environment variable naming a configuration file or directory.
pub const CONFIG_ENV: &str = "ODATAGEN_CONFIG";

/// Directory under the per-user config directory searched by [`Strategy::User`].
pub const USER_DIR_NAME: &str = "odatagen";

/// One way of finding the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// A path given on the command line
    Explicit(PathBuf),
    /// The value of [`CONFIG_ENV`], if set
    Environment(Option<OsString>),
    /// The per-user configuration directory, if the platform has one
    User(Option<PathBuf>),
    /// The given directory and each of its ancestors
    WalkUp(PathBuf),
}

/// Outcome of running a single strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Found(PathBuf),
    NotFound(String),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Explicit(_) => "explicit",
            Self::Environment(_) => "environment",
            Self::User(_) => "user",
            Self::WalkUp(_) => "walk-up",
        }
    }

    pub fn probe(&self) -> Probe {
        match self {
            Self::Explicit(path) => probe_path(path),
            Self::Environment(None) => Probe::NotFound(format!("{CONFIG_ENV} is not set")),
            Self::Environment(Some(value)) if value.is_empty() => {
                Probe::NotFound(format!("{CONFIG_ENV} is empty"))
            }
            Self::Environment(Some(value)) => probe_path(Path::new(value)),
            Self::User(None) => Probe::NotFound("no per-user config directory".to_string()),
            Self::User(Some(dir)) => probe_dir(dir),
            Self::WalkUp(start) => {
                for dir in start.ancestors() {
                    if let Some(found) = config_in(dir) {
                        return Probe::Found(found);
                    }
                }
                Probe::NotFound(format!("nothing in {} or its parents", start.display()))
            }
        }
    }
}

fn probe_path(path: &Path) -> Probe {
    if path.is_dir() {
        probe_dir(path)
    } else if path.is_file() {
        Probe::Found(path.to_path_buf())
    } else {
        Probe::NotFound(format!("{} does not exist", path.display()))
    }
}

fn probe_dir(dir: &Path) -> Probe {
    match config_in(dir) {
        Some(found) => Probe::Found(found),
        None => Probe::NotFound(format!("nothing in {}", dir.display())),
    }
}

fn config_in(dir: &Path) -> Option<PathBuf> {
    FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// An ordered list of strategies.
#[derive(Debug, Clone)]
pub struct Discovery {
    strategies: Vec<Strategy>,
}

impl Discovery {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// The standard order: explicit, environment, user, walk-up.
    ///
    /// An explicit path is authoritative; when one is given no other strategy
    /// runs, so a mistyped `--config` never silently picks up another file.
    pub fn standard(explicit: Option<&Path>, cwd: &Path) -> Self {
        if let Some(path) = explicit {
            return Self::new(vec![Strategy::Explicit(cwd.join(path))]);
        }

        Self::new(vec![
            Strategy::Environment(std::env::var_os(CONFIG_ENV)),
            Strategy::User(dirs::config_dir().map(|dir| dir.join(USER_DIR_NAME))),
            Strategy::WalkUp(cwd.to_path_buf()),
        ])
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Run the strategies in order and return the first file found.
    pub fn find(&self) -> Result<PathBuf> {
        let mut tried = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match strategy.probe() {
                Probe::Found(path) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        path = %path.display(),
                        "found configuration"
                    );
                    return Ok(path);
                }
                Probe::NotFound(reason) => {
                    tracing::debug!(strategy = strategy.name(), %reason, "no configuration");
                    tried.push(format!("{} ({})", strategy.name(), reason));
                }
            }
        }

        Err(Box::new(Error::ConfigurationNotFound {
            tried: tried.join(", "),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_walk_up_finds_ancestor_config() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("odataconfig.json"));
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = Discovery::new(vec![Strategy::WalkUp(nested)]).find().unwrap();

        assert_eq!(found, temp.path().join("odataconfig.json"));
    }

    #[test]
    fn test_walk_up_prefers_toml_in_same_dir() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("odataconfig.json"));
        touch(&temp.path().join("odatagen.toml"));

        let found = Discovery::new(vec![Strategy::WalkUp(temp.path().to_path_buf())])
            .find()
            .unwrap();

        assert_eq!(found, temp.path().join("odatagen.toml"));
    }

    #[test]
    fn test_walk_up_nearest_wins() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("odatagen.toml"));
        let nested = temp.path().join("svc");
        touch(&nested.join("odataconfig.json"));

        let found = Discovery::new(vec![Strategy::WalkUp(nested.clone())])
            .find()
            .unwrap();

        assert_eq!(found, nested.join("odataconfig.json"));
    }

    #[test]
    fn test_first_strategy_wins() {
        let temp = TempDir::new().unwrap();
        let env_file = temp.path().join("env").join("custom.toml");
        touch(&env_file);
        touch(&temp.path().join("odatagen.toml"));

        let discovery = Discovery::new(vec![
            Strategy::Environment(Some(env_file.clone().into_os_string())),
            Strategy::WalkUp(temp.path().to_path_buf()),
        ]);

        assert_eq!(discovery.find().unwrap(), env_file);
    }

    #[test]
    fn test_environment_directory_is_searched() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("odatagen.toml"));

        let probe = Strategy::Environment(Some(temp.path().as_os_str().to_owned())).probe();

        assert_eq!(probe, Probe::Found(temp.path().join("odatagen.toml")));
    }

    #[test]
    fn test_user_strategy_checks_both_names() {
        let temp = TempDir::new().unwrap();
        let user_dir = temp.path().join("odatagen");
        touch(&user_dir.join("odataconfig.json"));

        let probe = Strategy::User(Some(user_dir.clone())).probe();

        assert_eq!(probe, Probe::Found(user_dir.join("odataconfig.json")));
    }

    #[test]
    fn test_exhaustion_lists_every_strategy() {
        let temp = TempDir::new().unwrap();
        let discovery = Discovery::new(vec![
            Strategy::Environment(None),
            Strategy::User(None),
            Strategy::User(Some(temp.path().join("odatagen"))),
        ]);

        let err = discovery.find().unwrap_err();

        match *err {
            Error::ConfigurationNotFound { tried } => {
                assert!(tried.starts_with("environment (ODATAGEN_CONFIG is not set)"));
                assert!(tried.contains("user (no per-user config directory)"));
                assert_eq!(tried.matches("user (").count(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_standard_with_explicit_runs_only_explicit() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("odatagen.toml"));

        let discovery = Discovery::standard(Some(Path::new("missing.toml")), temp.path());

        assert_eq!(discovery.strategies().len(), 1);
        assert_eq!(discovery.strategies()[0].name(), "explicit");
        let err = discovery.find().unwrap_err();
        assert!(matches!(*err, Error::ConfigurationNotFound { .. }));
    }

    #[test]
    fn test_standard_order_without_explicit() {
        let temp = TempDir::new().unwrap();
        let names: Vec<_> = Discovery::standard(None, temp.path())
            .strategies()
            .iter()
            .map(Strategy::name)
            .collect();

        assert_eq!(names, ["environment", "user", "walk-up"]);
    }

    #[test]
    fn test_explicit_relative_path_joins_cwd() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("conf").join("odataconfig.json"));

        let found = Discovery::standard(Some(Path::new("conf/odataconfig.json")), temp.path())
            .find()
            .unwrap();

        assert_eq!(found, temp.path().join("conf").join("odataconfig.json"));
    }
}

use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;

pub const BINARY_KEY: &str = "ACTION_RUNNER_BINARY";
pub const SCRIPT_KEY: &str = "ACTION_RUNNER_SCRIPT";
pub const INPUT_VAR_KEY: &str = "ACTION_RUNNER_INPUT_VAR";
pub const LOG_KEY: &str = "ACTION_RUNNER_LOG";

pub const DEFAULT_BINARY: &str = "/usr/local/bin/php";
pub const DEFAULT_SCRIPT: &str = "/action/runner.php";
pub const DEFAULT_INPUT_VAR: &str = "WHISK_INPUT";
pub const DEFAULT_LOG_FILTER: &str = "action_runner=warn";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path())
    }

    /// Defaults, then the rc file at `config_path`, then the process environment.
    pub fn load_from(config_path: PathBuf) -> Self {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    if let Some((k, v)) = parse_line(&line) {
                        map.insert(k, v);
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars_os() {
            if let (Ok(k), Ok(v)) = (k.into_string(), v.into_string()) {
                if is_config_key(&k) {
                    map.insert(k, v);
                }
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    pub fn binary_path(&self) -> PathBuf {
        self.get_path(BINARY_KEY)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY))
    }

    pub fn script_path(&self) -> PathBuf {
        self.get_path(SCRIPT_KEY)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT))
    }

    pub fn input_var(&self) -> String {
        self.get(INPUT_VAR_KEY)
            .unwrap_or_else(|| DEFAULT_INPUT_VAR.to_string())
    }

    pub fn log_filter(&self) -> String {
        self.get(LOG_KEY)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }

    /// Sorted `KEY=VALUE` lines of every runner setting.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out: Vec<_> = self
            .inner
            .iter()
            .filter(|(k, _)| is_config_key(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        out.sort();
        out
    }

    pub fn rc_exists(&self) -> bool {
        Path::new(&self.config_path).is_file()
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (k, v) = line.split_once('=')?;
    Some((k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("ACTION_RUNNER_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("action_runner").join(".runnerrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert(BINARY_KEY.into(), DEFAULT_BINARY.into());
    m.insert(SCRIPT_KEY.into(), DEFAULT_SCRIPT.into());
    m.insert(INPUT_VAR_KEY.into(), DEFAULT_INPUT_VAR.into());
    m.insert(LOG_KEY.into(), DEFAULT_LOG_FILTER.into());
    m
}

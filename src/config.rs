//! Configuration management for docbridge
//!
//! Loads `config.toml` (optional) with `DOCBRIDGE_` environment overrides, and
//! reads/writes the single-line working-directory file that names the base
//! directory exposed by the provider.

use config::{Config, Environment, File};
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Complete application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub bridge: BridgeConfig,
}

/// Settings for the tree-browsing provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// File whose first line is the absolute base directory
    pub working_dir_file: String,

    /// Search never descends into paths outside this directory.
    /// Empty means the data directory holding `working_dir_file`.
    pub private_storage_root: String,

    /// Title reported for the single root
    pub title: String,

    pub max_search_results: usize,
}

/// Settings for the document protocol server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub max_clients: usize,
    /// Longest accepted command line, in bytes
    pub max_line_length: usize,
}

/// Settings for the scoped storage bridge
#[derive(Debug, Deserialize, Clone)]
pub struct BridgeConfig {
    /// Content-tree address granted by the host's folder picker
    pub scoped_root: String,

    /// Buffer size for streamed copies
    pub copy_buffer_size: usize,
}

pub const DEFAULT_CONFIG_PATH: &str = "config";
pub const ENV_PREFIX: &str = "DOCBRIDGE";

impl AppConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from `path` (extension optional) with environment overrides
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("provider.working_dir_file", "files/working_dir")?
            .set_default("provider.private_storage_root", "")?
            .set_default("provider.title", "docbridge")?
            .set_default("provider.max_search_results", 50_i64)?
            .set_default("server.bind_address", "127.0.0.1")?
            .set_default("server.port", 2323_i64)?
            .set_default("server.max_clients", 10_i64)?
            .set_default("server.max_line_length", 4096_i64)?
            .set_default("bridge.scoped_root", "")?
            .set_default("bridge.copy_buffer_size", 8192_i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.provider.working_dir_file.is_empty() {
            return Err(config::ConfigError::Message(
                "provider.working_dir_file cannot be empty".into(),
            ));
        }

        if self.provider.max_search_results == 0 {
            return Err(config::ConfigError::Message(
                "provider.max_search_results must be greater than 0".into(),
            ));
        }

        if self.server.port == 0 {
            return Err(config::ConfigError::Message("server.port cannot be 0".into()));
        }

        if self.server.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "server.max_clients must be greater than 0".into(),
            ));
        }

        if self.bridge.copy_buffer_size == 0 {
            return Err(config::ConfigError::Message(
                "bridge.copy_buffer_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl ProviderConfig {
    /// Reads the base directory from the working-directory file
    pub fn base_dir(&self) -> Option<PathBuf> {
        read_working_dir(Path::new(&self.working_dir_file))
    }

    /// The search boundary.
    ///
    /// Falls back to the grandparent of the working-directory file, the data
    /// directory that `files/working_dir` lives in.
    pub fn private_storage_path(&self) -> PathBuf {
        if !self.private_storage_root.is_empty() {
            return PathBuf::from(&self.private_storage_root);
        }
        let file = Path::new(&self.working_dir_file);
        let file = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());
        file.parent()
            .and_then(Path::parent)
            .or_else(|| file.parent())
            .map(Path::to_path_buf)
            .unwrap_or(file)
    }
}

impl ServerConfig {
    /// Bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Reads the first line of the working-directory file.
///
/// Returns `None` if the file is missing, unreadable or has an empty first line.
pub fn read_working_dir(file: &Path) -> Option<PathBuf> {
    let handle = match fs::File::open(file) {
        Ok(handle) => handle,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Working directory file {} not readable: {}", file.display(), e);
            return None;
        }
    };

    let mut line = String::new();
    if let Err(e) = BufReader::new(handle).read_line(&mut line) {
        warn!("Working directory file {} not readable: {}", file.display(), e);
        return None;
    }

    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return None;
    }
    Some(PathBuf::from(line))
}

/// Persists `dir` as the working directory, replacing any previous choice.
pub fn write_working_dir(file: &Path, dir: &Path) -> io::Result<()> {
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut out = fs::File::create(file)?;
    writeln!(out, "{}", dir.display())?;
    out.flush()?;
    info!("Working directory set to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_dir_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("files/working_dir");
        write_working_dir(&file, Path::new("/storage/emulated/0/Game")).unwrap();
        assert_eq!(
            read_working_dir(&file),
            Some(PathBuf::from("/storage/emulated/0/Game"))
        );
    }

    #[test]
    fn only_first_line_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("working_dir");
        fs::write(&file, "/first\n/second\n").unwrap();
        assert_eq!(read_working_dir(&file), Some(PathBuf::from("/first")));
    }

    #[test]
    fn missing_or_empty_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_working_dir(&dir.path().join("absent")), None);

        let empty = dir.path().join("empty");
        fs::write(&empty, "").unwrap();
        assert_eq!(read_working_dir(&empty), None);
    }

    #[test]
    fn load_applies_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docbridge.toml");
        fs::write(
            &path,
            "[server]\nport = 4040\n\n[bridge]\nscoped_root = \"content://x/tree/y\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 4040);
        assert_eq!(config.server.max_clients, 10);
        assert_eq!(config.bridge.scoped_root, "content://x/tree/y");
        assert_eq!(config.provider.max_search_results, 50);
    }

    fn provider_config(working_dir_file: &str, private_storage_root: &str) -> ProviderConfig {
        ProviderConfig {
            working_dir_file: working_dir_file.into(),
            private_storage_root: private_storage_root.into(),
            title: "docbridge".into(),
            max_search_results: 50,
        }
    }

    #[test]
    fn boundary_defaults_to_the_data_dir_of_the_working_dir_file() {
        let config = provider_config("/data/data/org.game/files/working_dir", "");
        assert_eq!(
            config.private_storage_path(),
            PathBuf::from("/data/data/org.game")
        );
    }

    #[test]
    fn explicit_boundary_wins() {
        let config = provider_config("/data/data/org.game/files/working_dir", "/storage");
        assert_eq!(config.private_storage_path(), PathBuf::from("/storage"));
    }

    #[test]
    fn default_boundary_ignores_the_current_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("files/working_dir");
        let config = provider_config(file.to_str().unwrap(), "");
        assert_eq!(config.private_storage_path(), dir.path());
        assert!(AppConfig::load_from("definitely-missing-docbridge-config")
            .unwrap()
            .provider
            .private_storage_root
            .is_empty());
    }

    #[test]
    fn zero_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[bridge]\ncopy_buffer_size = 0\n").unwrap();
        assert!(AppConfig::load_from(path.to_str().unwrap()).is_err());
    }
}

use std::path::{Path, PathBuf};

use eyre::{eyre, WrapErr};
use serde::Deserialize;

use crate::cli::Cli;

/// Config file read when `--config` is not given. Its absence is not an error.
pub const DEFAULT_CONFIG_PATH: &str = "conf/coinrelay.toml";

/// Endpoint used when neither the CLI nor the config file names one.
pub const DEFAULT_RPC_ADDR: &str = "127.0.0.1:8332";

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Node endpoint, `host:port` or URL.
    pub rpc_addr: Option<String>,
    pub rpc_user: Option<String>,
    pub rpc_pass: Option<String>,
    pub rpc_cookie_file: Option<PathBuf>,
}

/// Resolved node connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub endpoint: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub cookie_file: Option<PathBuf>,
}

/// Read the config file named on the command line, or the default one if it
/// exists.
pub fn load_file_config(explicit: Option<&Path>) -> eyre::Result<FileConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                tracing::debug!(path = DEFAULT_CONFIG_PATH, "no config file, using defaults");
                return Ok(FileConfig::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config file {}", path.display()))?;
    let config = parse_file_config(&content)
        .wrap_err_with(|| format!("parse config file {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

pub fn parse_file_config(content: &str) -> eyre::Result<FileConfig> {
    toml::from_str(content).map_err(|e| eyre!(e))
}

/// Merge the command line over the config file. Command-line values (and
/// their environment variables) win.
pub fn resolve(cli: &Cli, file: FileConfig) -> NodeConfig {
    NodeConfig {
        endpoint: cli
            .rpc_url
            .clone()
            .or(file.rpc_addr)
            .unwrap_or_else(|| DEFAULT_RPC_ADDR.to_owned()),
        user: cli.rpc_user.clone().or(file.rpc_user),
        pass: cli.rpc_pass.clone().or(file.rpc_pass),
        cookie_file: cli.rpc_cookie_file.clone().or(file.rpc_cookie_file),
    }
}

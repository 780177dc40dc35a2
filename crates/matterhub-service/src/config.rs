//! Configuration vault – reads/writes `~/.matterhub/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted gateway configuration stored in `~/.matterhub/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the external commissioning stack keeps its own
    /// persistent state in (fabric credentials, commissioning storage).
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Fabric index the gateway commissions peers onto.
    #[serde(default = "default_fabric_index")]
    pub fabric_index: u8,

    /// The gateway's own node id, hexadecimal string form.
    #[serde(default = "default_local_node_id")]
    pub local_node_id: String,

    /// Gateway endpoints exposed to commissioned peers, written into
    /// each peer's binding list in this order.
    #[serde(default = "default_exposed_endpoints")]
    pub exposed_endpoints: Vec<u16>,

    /// Path of the uinput device node for synthetic key injection.
    #[serde(default = "default_uinput_path")]
    pub uinput_path: PathBuf,

    /// Base URL of the HTTP application-control endpoint.
    #[serde(default = "default_launcher_url")]
    pub launcher_url: String,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("/var/lib/matterhub/storage")
}
fn default_fabric_index() -> u8 {
    matterhub_commission::DEFAULT_FABRIC_INDEX
}
fn default_local_node_id() -> String {
    "000000000000AA01".to_string()
}
fn default_exposed_endpoints() -> Vec<u16> {
    vec![1, 3]
}
fn default_uinput_path() -> PathBuf {
    PathBuf::from("/dev/uinput")
}
fn default_launcher_url() -> String {
    "http://127.0.0.1:8008".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            fabric_index: default_fabric_index(),
            local_node_id: default_local_node_id(),
            exposed_endpoints: default_exposed_endpoints(),
            uinput_path: default_uinput_path(),
            launcher_url: default_launcher_url(),
        }
    }
}

/// Return the path to `~/.matterhub/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".matterhub").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `MATTERHUB_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `MATTERHUB_STORAGE_DIR` | `storage_dir` |
/// | `MATTERHUB_FABRIC_INDEX` | `fabric_index` |
/// | `MATTERHUB_UINPUT_PATH` | `uinput_path` |
/// | `MATTERHUB_LAUNCHER_URL` | `launcher_url` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("MATTERHUB_STORAGE_DIR") {
        cfg.storage_dir = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("MATTERHUB_FABRIC_INDEX")
        && let Ok(index) = v.parse::<u8>()
    {
        cfg.fabric_index = index;
    }
    if let Ok(v) = std::env::var("MATTERHUB_UINPUT_PATH") {
        cfg.uinput_path = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("MATTERHUB_LAUNCHER_URL") {
        cfg.launcher_url = v;
    }
}

/// Save the config to disk, creating `~/.matterhub/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Restrict the config directory to the owner only (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    // Write the file with owner-only read/write (rw-------) on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config::default();
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.fabric_index, 1);
        assert_eq!(loaded.local_node_id, "000000000000AA01");
        assert_eq!(loaded.exposed_endpoints, vec![1, 3]);
        assert_eq!(loaded.uinput_path, PathBuf::from("/dev/uinput"));
    }

    #[test]
    fn config_path_points_to_matterhub_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".matterhub"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config::default();
        save_to(&cfg, &path).expect("save");

        let file_meta = std::fs::metadata(&path).expect("file metadata");
        assert_eq!(file_meta.permissions().mode() & 0o777, 0o600);

        let dir_meta = std::fs::metadata(path.parent().unwrap()).expect("dir metadata");
        assert_eq!(dir_meta.permissions().mode() & 0o777, 0o700);
    }

    #[test]
    fn apply_env_overrides_changes_launcher_url() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("MATTERHUB_LAUNCHER_URL", "http://stb:9005") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.launcher_url, "http://stb:9005");
        unsafe { std::env::remove_var("MATTERHUB_LAUNCHER_URL") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_fabric_index() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("MATTERHUB_FABRIC_INDEX", "not-a-number") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.fabric_index, 1);
        unsafe { std::env::remove_var("MATTERHUB_FABRIC_INDEX") };
    }
}

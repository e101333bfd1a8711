//! Configuration management for `kanban_board`.
//!
//! Configuration is loaded from YAML files with support for:
//! - User config (~/.config/kanban/config.yaml)
//! - Workspace config (.kanban/config.yaml)
//! - Environment variable overrides (`KB_BOARD`, `KB_PROJECT`, `KB_ACTOR`)
//! - CLI flags
//!
//! Later layers win field by field.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use board_lib::{BoardError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Workspace directory holding the board file and workspace config.
pub const KANBAN_DIR: &str = ".kanban";
/// Board file name inside [`KANBAN_DIR`].
pub const BOARD_FILE: &str = "board.jsonl";
/// Config file name inside [`KANBAN_DIR`] and the user config directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// One source of settings. Unset fields defer to earlier layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

impl ConfigLayer {
    /// Load a YAML layer. A missing file is an empty layer.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| BoardError::Config(format!("Failed to read {}: {e}", path.display())))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| BoardError::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Layer from `KB_BOARD`, `KB_PROJECT` and `KB_ACTOR`.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            board_path: var("KB_BOARD").map(PathBuf::from),
            project_key: var("KB_PROJECT"),
            actor: var("KB_ACTOR"),
        }
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: Self) {
        if other.board_path.is_some() {
            self.board_path = other.board_path;
        }
        if other.project_key.is_some() {
            self.project_key = other.project_key;
        }
        if other.actor.is_some() {
            self.actor = other.actor;
        }
    }
}

/// Effective configuration after all layers are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Workspace root the relative paths resolve against.
    pub root: PathBuf,
    pub board_path: PathBuf,
    /// `None` means "infer from the board's issue IDs".
    pub project_key: Option<String>,
    pub actor: String,
}

impl Config {
    /// Default board path for a workspace root.
    #[must_use]
    pub fn default_board_path(root: &Path) -> PathBuf {
        root.join(KANBAN_DIR).join(BOARD_FILE)
    }

    #[must_use]
    pub fn kanban_dir(&self) -> PathBuf {
        self.root.join(KANBAN_DIR)
    }
}

/// User config path (`~/.config/kanban/config.yaml` on Linux).
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kanban").join(CONFIG_FILE))
}

/// Workspace config path for `root`.
#[must_use]
pub fn workspace_config_path(root: &Path) -> PathBuf {
    root.join(KANBAN_DIR).join(CONFIG_FILE)
}

/// Resolve the effective config for the workspace at `root`.
///
/// # Errors
///
/// Returns `Config` if a config file is malformed.
pub fn resolve(root: &Path, cli: ConfigLayer) -> Result<Config> {
    resolve_layers(root, user_config_path().as_deref(), ConfigLayer::from_env(), cli)
}

/// Resolve with explicit user-config path and environment layer.
///
/// # Errors
///
/// Returns `Config` if a config file is malformed.
pub fn resolve_layers(
    root: &Path,
    user_config: Option<&Path>,
    env_layer: ConfigLayer,
    cli: ConfigLayer,
) -> Result<Config> {
    let mut merged = ConfigLayer::default();
    if let Some(path) = user_config {
        merged.merge(ConfigLayer::load(path)?);
    }
    merged.merge(ConfigLayer::load(&workspace_config_path(root))?);
    merged.merge(env_layer);
    merged.merge(cli);

    let board_path = merged.board_path.map_or_else(
        || Config::default_board_path(root),
        |path| if path.is_absolute() { path } else { root.join(path) },
    );
    let actor = merged
        .actor
        .or_else(|| env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string());

    let config = Config {
        root: root.to_path_buf(),
        board_path,
        project_key: merged.project_key,
        actor,
    };
    debug!(board = %config.board_path.display(), project = ?config.project_key, "config resolved");
    Ok(config)
}

/// Workspace root: the nearest ancestor of `start` holding `.kanban/`, or
/// `start` itself when there is none.
#[must_use]
pub fn discover_root(start: &Path) -> PathBuf {
    let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    start
        .ancestors()
        .find(|dir| dir.join(KANBAN_DIR).is_dir())
        .map_or_else(|| start.clone(), Path::to_path_buf)
}

/// Template written by `kb init`.
#[must_use]
pub fn workspace_config_template(project_key: &str) -> String {
    format!(
        "# Kanban workspace configuration\n\
         project_key: {project_key}\n\
         # board_path: .kanban/board.jsonl\n\
         # actor: alice\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_layers(
            dir.path(),
            None,
            ConfigLayer::default(),
            ConfigLayer {
                actor: Some("ana".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.board_path, dir.path().join(".kanban/board.jsonl"));
        assert!(config.project_key.is_none());
        assert_eq!(config.actor, "ana");
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user/config.yaml");
        write(&user, "project_key: USER\nactor: from-user\nboard_path: user.jsonl\n");
        write(
            &workspace_config_path(dir.path()),
            "project_key: WORK\n",
        );

        let env_layer = ConfigLayer {
            actor: Some("from-env".to_string()),
            ..Default::default()
        };
        let config = resolve_layers(dir.path(), Some(&user), env_layer, ConfigLayer::default())
            .unwrap();
        assert_eq!(config.project_key.as_deref(), Some("WORK"));
        assert_eq!(config.actor, "from-env");
        assert_eq!(config.board_path, dir.path().join("user.jsonl"));

        let cli = ConfigLayer {
            project_key: Some("CLI".to_string()),
            ..Default::default()
        };
        let config = resolve_layers(dir.path(), Some(&user), ConfigLayer::default(), cli).unwrap();
        assert_eq!(config.project_key.as_deref(), Some("CLI"));
        assert_eq!(config.actor, "from-user");
    }

    #[test]
    fn test_absolute_board_path_kept() {
        let dir = tempfile::tempdir().unwrap();
        let abs = dir.path().join("elsewhere/board.jsonl");
        let cli = ConfigLayer {
            board_path: Some(abs.clone()),
            ..Default::default()
        };
        let config = resolve_layers(dir.path(), None, ConfigLayer::default(), cli).unwrap();
        assert_eq!(config.board_path, abs);
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        write(&workspace_config_path(dir.path()), "project_key: [unclosed\n");
        let err = resolve_layers(dir.path(), None, ConfigLayer::default(), ConfigLayer::default())
            .unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
    }

    #[test]
    fn test_template_parses() {
        let layer: ConfigLayer = serde_yaml::from_str(&workspace_config_template("WEB")).unwrap();
        assert_eq!(layer.project_key.as_deref(), Some("WEB"));
        assert!(layer.board_path.is_none());
    }

    #[test]
    fn test_discover_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".kanban")).unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        let root = discover_root(&nested);
        assert_eq!(root, dunce::canonicalize(dir.path()).unwrap());
    }
}

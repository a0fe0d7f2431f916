use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::io::{ProjectIoError, read_yaml_file, write_yaml_file};

pub const CONFIG_FILE_NAME: &str = "kura_editor.yaml";

/// Editor settings persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub last_project: Option<PathBuf>,
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_window_width() -> f32 {
    1280.0
}

fn default_window_height() -> f32 {
    800.0
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            last_project: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl EditorConfig {
    /// Loads the config file, falling back to defaults when it is missing or
    /// unreadable. A broken config never blocks the editor from starting.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read_yaml_file(path) {
            Ok(config) => config,
            Err(ProjectIoError::Missing { .. }) => Self::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable editor config");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectIoError> {
        write_yaml_file(path, self)
    }
}

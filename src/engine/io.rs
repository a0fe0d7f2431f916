use std::{
    fmt, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

/// File system errors surfaced to the editor tooling.
#[derive(Debug)]
pub enum ProjectIoError {
    Missing {
        path: PathBuf,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    CorruptYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    SerializeYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl fmt::Display for ProjectIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectIoError::Missing { path } => {
                write!(f, "missing file: {}", path.display())
            }
            ProjectIoError::Io { path, source } => {
                write!(f, "I/O error for {}: {}", path.display(), source)
            }
            ProjectIoError::Corrupt { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            ProjectIoError::Serialize { path, source } => {
                write!(f, "failed to serialize {}: {}", path.display(), source)
            }
            ProjectIoError::CorruptYaml { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            ProjectIoError::SerializeYaml { path, source } => {
                write!(f, "failed to serialize {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ProjectIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectIoError::Missing { .. } => None,
            ProjectIoError::Io { source, .. } => Some(source),
            ProjectIoError::Corrupt { source, .. } => Some(source),
            ProjectIoError::Serialize { source, .. } => Some(source),
            ProjectIoError::CorruptYaml { source, .. } => Some(source),
            ProjectIoError::SerializeYaml { source, .. } => Some(source),
        }
    }
}

/// Reads a JSON file and returns the parsed payload.
pub fn read_json_file<T>(path: impl AsRef<Path>) -> Result<T, ProjectIoError>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let data = read_raw(path)?;
    serde_json::from_str(&data).map_err(|source| ProjectIoError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a JSON file, creating parent directories when needed.
pub fn write_json_file<T>(path: impl AsRef<Path>, value: &T) -> Result<(), ProjectIoError>
where
    T: Serialize,
{
    let path = path.as_ref();
    ensure_parent(path)?;

    let payload =
        serde_json::to_string_pretty(value).map_err(|source| ProjectIoError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

    write_raw(path, &payload)
}

/// Reads a YAML file (editor configuration) into the given type.
pub fn read_yaml_file<T>(path: impl AsRef<Path>) -> Result<T, ProjectIoError>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let data = read_raw(path)?;
    serde_yaml::from_str(&data).map_err(|source| ProjectIoError::CorruptYaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a YAML file, creating parent directories when needed.
pub fn write_yaml_file<T>(path: impl AsRef<Path>, value: &T) -> Result<(), ProjectIoError>
where
    T: Serialize,
{
    let path = path.as_ref();
    ensure_parent(path)?;

    let payload = serde_yaml::to_string(value).map_err(|source| ProjectIoError::SerializeYaml {
        path: path.to_path_buf(),
        source,
    })?;

    write_raw(path, &payload)
}

fn read_raw(path: &Path) -> Result<String, ProjectIoError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(raw),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(ProjectIoError::Missing {
            path: path.to_path_buf(),
        }),
        Err(err) => Err(ProjectIoError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

fn write_raw(path: &Path, payload: &str) -> Result<(), ProjectIoError> {
    fs::write(path, payload).map_err(|source| ProjectIoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(path: &Path) -> Result<(), ProjectIoError> {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            return Err(ProjectIoError::Io {
                path: parent.to_path_buf(),
                source: err,
            });
        }
    }
    Ok(())
}

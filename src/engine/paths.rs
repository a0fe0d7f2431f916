use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::engine::io::ProjectIoError;

/// Expresses `full` relative to `base` when `full` lives under it.
///
/// Paths outside `base` come back unchanged; definition files reference them
/// absolutely in that case.
pub fn make_relative_path(full: &Path, base: &Path) -> PathBuf {
    full.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| full.to_path_buf())
}

/// Copies `source` into `dir` (created if needed), keeping its file name.
/// Returns the destination path.
pub fn copy_into_dir(source: &Path, dir: &Path) -> Result<PathBuf, ProjectIoError> {
    let Some(file_name) = source.file_name() else {
        return Err(ProjectIoError::Missing {
            path: source.to_path_buf(),
        });
    };

    fs::create_dir_all(dir).map_err(|err| ProjectIoError::Io {
        path: dir.to_path_buf(),
        source: err,
    })?;

    let dest = dir.join(file_name);
    fs::copy(source, &dest).map_err(|err| ProjectIoError::Io {
        path: source.to_path_buf(),
        source: err,
    })?;

    Ok(dest)
}

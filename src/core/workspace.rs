use crate::utils::error::{AgentError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DIRECTORIES: [&str; 2] = ["logs", "data"];

/// Creates each directory under `root` if it is missing and returns their full paths.
///
/// Existing directories are left untouched. A path occupied by something
/// other than a directory, or any other filesystem failure, is an error.
pub fn prepare_workspace<S: AsRef<str>>(root: &Path, directories: &[S]) -> Result<Vec<PathBuf>> {
    let mut prepared = Vec::with_capacity(directories.len());

    for dir in directories {
        let full_path = root.join(dir.as_ref());

        fs::create_dir_all(&full_path).map_err(|source| AgentError::WorkspaceError {
            path: full_path.clone(),
            source,
        })?;

        tracing::debug!("Workspace directory ready: {}", full_path.display());
        prepared.push(full_path);
    }

    Ok(prepared)
}

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("script {} failed to compile: {message}", path.display())]
    ScriptCompile { path: PathBuf, message: String },
    #[error("script {} raised an error: {message}", path.display())]
    ScriptRuntime { path: PathBuf, message: String },
    #[error("{kind} not found: {}", path.display())]
    MissingResource { kind: &'static str, path: PathBuf },
    #[error("handle refers to an element of a cleared layout")]
    StaleHandle,
    #[error(transparent)]
    Lua(#[from] mlua::Error),
}

impl PresentError {
    /// Classifies an interpreter error raised while running `path`.
    pub fn from_lua(path: &Path, err: mlua::Error) -> Self {
        match err {
            mlua::Error::SyntaxError { message, .. } => PresentError::ScriptCompile {
                path: path.to_path_buf(),
                message,
            },
            other => PresentError::ScriptRuntime {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        }
    }
}

pub type PresentResult<T> = Result<T, PresentError>;

use std::{io, path::PathBuf, process::ExitStatus};

use rayon::ThreadPoolBuildError;
use thiserror::Error;

use crate::ConfigError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("source directory '{0}' does not exist")]
    MissingSource(PathBuf),
    #[error("could not clear output directory '{1}'")]
    ClearOutput(#[source] io::Error, PathBuf),
    #[error("could not create output directory '{1}'")]
    CreateOutput(#[source] io::Error, PathBuf),
    #[error("walking the source directory failed")]
    Walk(#[from] walkdir::Error),
    #[error("could not start the worker pool")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not start compiler '{1}'")]
    Spawn(#[source] io::Error, PathBuf),
    #[error("compiler failed with {status}")]
    Exit {
        status: ExitStatus,
        diagnostic: String,
    },
    #[error("could not create output directory '{1}'")]
    CreateDir(#[source] io::Error, PathBuf),
    #[error("could not copy to '{1}'")]
    Copy(#[source] io::Error, PathBuf),
}

impl FileError {
    /// Output the compiler printed before failing, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Exit { diagnostic, .. } if !diagnostic.is_empty() => Some(diagnostic),
            _ => None,
        }
    }
}

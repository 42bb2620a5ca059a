use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use crate::FileError;

#[derive(Debug)]
pub enum FileOutcome {
    Compiled,
    Copied,
    Skipped,
    Failed(FileError),
}

#[derive(Debug)]
pub struct Entry {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Per-file outcomes of a run, ordered by relative path.
#[derive(Debug, Default)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn new(mut entries: Vec<Entry>) -> Self {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn outcome(&self, path: impl AsRef<Path>) -> Option<&FileOutcome> {
        self.entries
            .iter()
            .find(|entry| entry.path == path.as_ref())
            .map(|entry| &entry.outcome)
    }

    pub fn compiled(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Compiled))
    }

    pub fn copied(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Copied))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &FileError)> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            FileOutcome::Failed(error) => Some((entry.path.as_path(), error)),
            _ => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, f: impl Fn(&FileOutcome) -> bool) -> usize {
        self.entries.iter().filter(|entry| f(&entry.outcome)).count()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} compiled, {} copied, {} skipped, {} failed",
            self.compiled(),
            self.copied(),
            self.skipped(),
            self.failed()
        )
    }
}

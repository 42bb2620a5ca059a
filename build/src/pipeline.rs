use std::{
    ffi::OsStr,
    fs::{copy, create_dir_all, remove_dir_all},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use rayon::{prelude::*, ThreadPoolBuilder};

use crate::{
    output_base, walk_sources, Classification, Classifier, Config, Entry, FileError, FileOutcome,
    Invocation, Invoke, PipelineError, Report,
};

pub struct Build<'a, I> {
    config: &'a Config,
    classifier: Classifier<'a>,
    invoker: &'a I,
    dry_run: bool,
}

impl<'a, I: Invoke> Build<'a, I> {
    pub fn new(config: &'a Config, invoker: &'a I) -> Self {
        Self {
            config,
            classifier: Classifier::new(config),
            invoker,
            dry_run: false,
        }
    }

    /// Logs what would happen without touching the output tree or spawning anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self) -> Result<Report, PipelineError> {
        self.config.validate()?;
        let source_root = &self.config.source_root;
        let output_root = self.config.output_root();
        if !source_root.is_dir() {
            return Err(PipelineError::MissingSource(source_root.clone()));
        }
        info!(
            "Building {} into {} with {} (shader model {})",
            source_root.display(),
            output_root.display(),
            self.config.compiler().display(),
            self.config.shader_model()
        );
        if !self.dry_run {
            self.prepare_output(&output_root)?;
        }
        let exclude = self
            .config
            .nested_output()?
            .map(|relative| source_root.join(relative));
        let files = walk_sources(source_root, exclude.as_deref());
        let entries = if self.config.jobs == 1 {
            files
                .map(|relative| -> Result<Entry, PipelineError> {
                    Ok(self.entry(relative?, &output_root))
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            let files = files.collect::<Result<Vec<_>, _>>()?;
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()?;
            pool.install(|| {
                files
                    .into_par_iter()
                    .map(|relative| self.entry(relative, &output_root))
                    .collect::<Vec<_>>()
            })
        };
        let report = Report::new(entries);
        info!("{}", report);
        Ok(report)
    }

    fn prepare_output(&self, output_root: &Path) -> Result<(), PipelineError> {
        if self.config.pipeline.clears_output() && output_root.exists() {
            remove_dir_all(output_root)
                .map_err(|e| PipelineError::ClearOutput(e, output_root.to_path_buf()))?;
        }
        create_dir_all(output_root)
            .map_err(|e| PipelineError::CreateOutput(e, output_root.to_path_buf()))
    }

    fn entry(&self, path: PathBuf, output_root: &Path) -> Entry {
        let outcome = self.process(&path, output_root);
        if let FileOutcome::Failed(error) = &outcome {
            warn!("Processing {} failed: {}", path.display(), error);
            if let Some(diagnostic) = error.diagnostic() {
                diagnostic.lines().for_each(|line| warn!("{}", line));
            }
        }
        Entry { path, outcome }
    }

    fn process(&self, relative: &Path, output_root: &Path) -> FileOutcome {
        let classification = match relative.file_name().and_then(OsStr::to_str) {
            Some(name) => self.classifier.classify(name),
            None => Classification::Skip,
        };
        let source = self.config.source_root.join(relative);
        match classification {
            Classification::Skip => {
                debug!("Skipping {}", relative.display());
                FileOutcome::Skipped
            }
            Classification::Passthrough => {
                let target = output_root.join(relative);
                if self.dry_run {
                    info!("Would copy {} to {}", source.display(), target.display());
                    return FileOutcome::Copied;
                }
                match self.passthrough(&source, &target) {
                    Ok(()) => FileOutcome::Copied,
                    Err(error) => FileOutcome::Failed(error),
                }
            }
            Classification::Compile { stage, model } => {
                let base = output_root.join(output_base(relative));
                let invocation = Invocation::new(self.config, &source, stage, &model, &base);
                if self.dry_run {
                    info!("Would run {}", invocation);
                    return FileOutcome::Compiled;
                }
                debug!("Running {}", invocation);
                match self.compile(&invocation) {
                    Ok(()) => FileOutcome::Compiled,
                    Err(error) => FileOutcome::Failed(error),
                }
            }
        }
    }

    fn passthrough(&self, source: &Path, target: &Path) -> Result<(), FileError> {
        create_parent(target)?;
        copy(source, target).map_err(|e| FileError::Copy(e, target.to_path_buf()))?;
        Ok(())
    }

    fn compile(&self, invocation: &Invocation) -> Result<(), FileError> {
        create_parent(&invocation.binary)?;
        self.invoker.invoke(invocation)
    }
}

fn create_parent(path: &Path) -> Result<(), FileError> {
    match path.parent() {
        Some(parent) => {
            create_dir_all(parent).map_err(|e| FileError::CreateDir(e, parent.to_path_buf()))
        }
        None => Ok(()),
    }
}

/// Runs a complete build of `config`.
pub fn run(config: &Config, invoker: &impl Invoke) -> Result<Report, PipelineError> {
    Build::new(config, invoker).run()
}

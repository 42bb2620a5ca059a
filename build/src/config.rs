use std::{
    env::current_dir,
    fs::{canonicalize, File},
    io,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::from_reader;
use thiserror::Error;

use crate::Stage;

const MODERN_STAGES: [Stage; 8] = [
    Stage::Pixel,
    Stage::Vertex,
    Stage::Compute,
    Stage::Hull,
    Stage::Domain,
    Stage::Geometry,
    Stage::Mesh,
    Stage::Amplification,
];

const LEGACY_STAGES: [Stage; 2] = [Stage::Pixel, Stage::Vertex];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// Shader model 6.x through `dxc`.
    Modern,
    /// Shader model 5.1 through `fxc`.
    Legacy,
}

impl Pipeline {
    pub fn default_compiler(self) -> &'static str {
        match self {
            Self::Modern => "dxc.exe",
            Self::Legacy => "fxc.exe",
        }
    }

    pub fn default_shader_model(self) -> &'static str {
        match self {
            Self::Modern => "6_5",
            Self::Legacy => "5_1",
        }
    }

    pub fn stages(self) -> &'static [Stage] {
        match self {
            Self::Modern => &MODERN_STAGES,
            Self::Legacy => &LEGACY_STAGES,
        }
    }

    pub fn compiler_flags(self) -> &'static [&'static str] {
        match self {
            Self::Modern => &["/Od", "/Zi", "/all_resources_bound", "/Qembed_debug"],
            Self::Legacy => &["/Zi"],
        }
    }

    /// Whether files named `*rts.<ext>` are copied instead of compiled.
    pub fn has_passthrough(self) -> bool {
        matches!(self, Self::Modern)
    }

    /// Whether the output directory is removed before a build.
    pub fn clears_output(self) -> bool {
        matches!(self, Self::Modern)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::Modern
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not open configuration file '{1}'")]
    Open(#[source] io::Error, PathBuf),
    #[error("could not parse configuration file '{1}'")]
    Parse(#[source] serde_json::Error, PathBuf),
    #[error("entry point must not be empty")]
    EmptyEntryPoint,
    #[error("shader model must not be empty")]
    EmptyShaderModel,
    #[error("source extension must not be empty")]
    EmptySourceExtension,
    #[error("at least one job is required")]
    NoJobs,
    #[error("could not resolve path '{1}'")]
    Resolve(#[source] io::Error, PathBuf),
    #[error("output directory '{0}' is the source directory")]
    OutputIsSource(PathBuf),
    #[error("output directory '{0}' contains the source directory")]
    OutputContainsSource(PathBuf),
}

/// Absolute `path` with symlinks resolved as far as it exists.
///
/// Components below the deepest existing ancestor are appended lexically.
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir()?.join(path)
    };
    let existing = absolute
        .ancestors()
        .find(|ancestor| ancestor.exists())
        .unwrap_or_else(|| absolute.as_path());
    let mut resolved = canonicalize(existing)?;
    let rest = absolute.strip_prefix(existing).unwrap_or_else(|_| Path::new(""));
    for component in rest.components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => resolved.push(name),
            _ => {}
        }
    }
    Ok(resolved)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: Pipeline,
    pub source_root: PathBuf,
    /// Defaults to `bin` inside the source root.
    pub output_root: Option<PathBuf>,
    /// Defaults to the pipeline's compiler.
    pub compiler: Option<PathBuf>,
    /// Defaults to the pipeline's shader model.
    pub shader_model: Option<String>,
    pub entry_point: String,
    pub extra_flags: Vec<String>,
    pub source_extension: String,
    pub header_extension: String,
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::default(),
            source_root: Path::new("..").join("shaders"),
            output_root: None,
            compiler: None,
            shader_model: None,
            entry_point: "main".to_owned(),
            extra_flags: Vec::new(),
            source_extension: "hlsl".to_owned(),
            header_extension: "hlsli".to_owned(),
            jobs: 1,
        }
    }
}

impl Config {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ConfigError::Open(e, path.to_path_buf()))?;
        from_reader(file).map_err(|e| ConfigError::Parse(e, path.to_path_buf()))
    }

    pub fn output_root(&self) -> PathBuf {
        match &self.output_root {
            Some(output_root) => output_root.clone(),
            None => self.source_root.join("bin"),
        }
    }

    pub fn compiler(&self) -> &Path {
        match &self.compiler {
            Some(compiler) => compiler,
            None => Path::new(self.pipeline.default_compiler()),
        }
    }

    pub fn shader_model(&self) -> &str {
        match &self.shader_model {
            Some(shader_model) => shader_model,
            None => self.pipeline.default_shader_model(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_point.is_empty() {
            return Err(ConfigError::EmptyEntryPoint);
        }
        if self.shader_model().is_empty() {
            return Err(ConfigError::EmptyShaderModel);
        }
        if self.source_extension.is_empty() {
            return Err(ConfigError::EmptySourceExtension);
        }
        if self.jobs == 0 {
            return Err(ConfigError::NoJobs);
        }
        let (source, output) = self.resolved_roots()?;
        if output == source {
            return Err(ConfigError::OutputIsSource(self.output_root()));
        }
        if source.starts_with(&output) {
            return Err(ConfigError::OutputContainsSource(self.output_root()));
        }
        Ok(())
    }

    /// Output root relative to the source root when it lies inside it.
    pub fn nested_output(&self) -> Result<Option<PathBuf>, ConfigError> {
        let (source, output) = self.resolved_roots()?;
        Ok(output.strip_prefix(&source).ok().map(Path::to_path_buf))
    }

    fn resolved_roots(&self) -> Result<(PathBuf, PathBuf), ConfigError> {
        let output_root = self.output_root();
        let source = resolve_path(&self.source_root)
            .map_err(|e| ConfigError::Resolve(e, self.source_root.clone()))?;
        let output =
            resolve_path(&output_root).map_err(|e| ConfigError::Resolve(e, output_root.clone()))?;
        Ok((source, output))
    }
}

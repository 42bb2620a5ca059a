use std::path::PathBuf;

use build::{Config, ConfigError, Pipeline};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "shaderbin",
    about = "Compiles a shader source tree into a mirrored bin directory"
)]
pub struct Opt {
    /// Build for shader model 5.1 with fxc instead of shader model 6.x with dxc
    #[structopt(long)]
    pub legacy: bool,
    /// JSON configuration file, overridden by the options below
    #[structopt(long, parse(from_os_str))]
    pub config: Option<PathBuf>,
    /// Shader source directory [default: ../shaders]
    #[structopt(long, parse(from_os_str))]
    pub source: Option<PathBuf>,
    /// Output directory [default: <source>/bin]
    #[structopt(long, parse(from_os_str))]
    pub output: Option<PathBuf>,
    /// Compiler executable [default: dxc.exe, or fxc.exe with --legacy]
    #[structopt(long, parse(from_os_str))]
    pub compiler: Option<PathBuf>,
    /// Base shader model, e.g. 6_6
    #[structopt(long)]
    pub shader_model: Option<String>,
    /// Shader entry point [default: main]
    #[structopt(long)]
    pub entry_point: Option<String>,
    /// Number of files compiled at the same time
    #[structopt(short, long)]
    pub jobs: Option<usize>,
    /// Extra compiler flag, may be repeated
    #[structopt(long = "flag", number_of_values = 1, allow_hyphen_values = true)]
    pub flags: Vec<String>,
    /// Print the compiler invocations without running them
    #[structopt(long)]
    pub dry_run: bool,
}

impl Opt {
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if self.legacy {
            config.pipeline = Pipeline::Legacy;
        }
        if let Some(source) = &self.source {
            config.source_root = source.clone();
        }
        if let Some(output) = &self.output {
            config.output_root = Some(output.clone());
        }
        if let Some(compiler) = &self.compiler {
            config.compiler = Some(compiler.clone());
        }
        if let Some(shader_model) = &self.shader_model {
            config.shader_model = Some(shader_model.clone());
        }
        if let Some(entry_point) = &self.entry_point {
            config.entry_point = entry_point.clone();
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        config.extra_flags.extend(self.flags.iter().cloned());
        config.validate()?;
        Ok(config)
    }
}

use std::{
    ffi::{OsStr, OsString},
    fmt::{self, Display},
    path::{Path, PathBuf},
    process::Command,
};

use crate::{base_name, Config, Stage};

/// Relative path with the file name cut at its first `.`.
///
/// Directory components are kept as they are, so `v1.2/x_vs.hlsl` becomes
/// `v1.2/x_vs`.
pub fn output_base(relative: &Path) -> PathBuf {
    match relative.file_name().and_then(OsStr::to_str) {
        Some(name) => relative.with_file_name(base_name(name)),
        None => relative.to_path_buf(),
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut path = path.as_os_str().to_owned();
    path.push(suffix);
    path.into()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub binary: PathBuf,
    pub symbols: PathBuf,
}

impl Invocation {
    pub fn new(
        config: &Config,
        source: &Path,
        stage: Stage,
        model: &str,
        output_base: &Path,
    ) -> Self {
        let binary = with_suffix(output_base, ".cso");
        let symbols = with_suffix(output_base, ".pdb");
        let mut args: Vec<OsString> = vec![
            "/nologo".into(),
            "/E".into(),
            config.entry_point.as_str().into(),
            "/T".into(),
            stage.profile(model).into(),
            "/Fo".into(),
            binary.clone().into(),
            "/Fd".into(),
            symbols.clone().into(),
        ];
        args.extend(config.pipeline.compiler_flags().iter().map(OsString::from));
        args.extend(config.extra_flags.iter().map(OsString::from));
        args.push(source.into());
        Self {
            program: config.compiler().to_path_buf(),
            args,
            binary,
            symbols,
        }
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_quoted(f, self.program.as_os_str())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_quoted(f, arg)?;
        }
        Ok(())
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, arg: &OsStr) -> fmt::Result {
    let arg = arg.to_string_lossy();
    if arg.contains(' ') {
        write!(f, "\"{}\"", arg)
    } else {
        f.write_str(&arg)
    }
}

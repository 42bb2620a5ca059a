use std::process::Output;

use log::debug;

use crate::{FileError, Invocation};

pub trait Invoke: Sync {
    fn invoke(&self, invocation: &Invocation) -> Result<(), FileError>;
}

/// Runs the compiler as a child process and waits for it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessInvoker;

impl Invoke for ProcessInvoker {
    fn invoke(&self, invocation: &Invocation) -> Result<(), FileError> {
        let output = invocation
            .command()
            .output()
            .map_err(|e| FileError::Spawn(e, invocation.program.clone()))?;
        if output.status.success() {
            log_output(&output);
            Ok(())
        } else {
            Err(FileError::Exit {
                status: output.status,
                diagnostic: diagnostic(&output),
            })
        }
    }
}

fn log_output(output: &Output) {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .chain(String::from_utf8_lossy(&output.stderr).lines())
        .filter(|line| !line.trim().is_empty())
        .for_each(|line| debug!("{}", line));
}

fn diagnostic(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    match (stdout.trim(), stderr.trim()) {
        ("", stderr) => stderr.to_owned(),
        (stdout, "") => stdout.to_owned(),
        (stdout, stderr) => format!("{}\n{}", stdout, stderr),
    }
}

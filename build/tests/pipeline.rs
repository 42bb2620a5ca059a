#![cfg(unix)]

use std::{
    env::current_dir,
    fs::{create_dir_all, read, write},
    path::{Path, PathBuf},
};

use shaderbin_build::{
    run, Config, ConfigError, FileError, FileOutcome, Pipeline, PipelineError, ProcessInvoker,
};
use tempfile::{tempdir, TempDir};

fn source_tree() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path().join("shaders");
    create_dir_all(root.join("foo")).unwrap();
    create_dir_all(root.join("empty")).unwrap();
    write(root.join("foo/bar_ps.hlsl"), "").unwrap();
    write(root.join("foo/bar_vs.hlsl"), "").unwrap();
    write(root.join("mesh_ms.hlsl"), "").unwrap();
    write(root.join("lib.hlsli"), "").unwrap();
    write(root.join("gen_rts.hlsl"), "shader table").unwrap();
    dir
}

fn relative_to_cwd(path: &Path) -> PathBuf {
    let cwd = current_dir().unwrap();
    let mut relative: PathBuf = cwd.components().skip(1).map(|_| "..").collect();
    relative.push(path.strip_prefix("/").unwrap());
    relative
}

fn config(dir: &TempDir, pipeline: Pipeline, compiler: &str) -> Config {
    Config {
        source_root: dir.path().join("shaders"),
        compiler: Some(PathBuf::from(compiler)),
        ..Config::new(pipeline)
    }
}

#[test]
fn modern_build_succeeds_with_working_compiler() {
    let dir = source_tree();
    let config = config(&dir, Pipeline::Modern, "true");
    let report = run(&config, &ProcessInvoker).unwrap();

    assert!(report.is_success());
    assert_eq!(report.compiled(), 3);
    assert_eq!(report.copied(), 1);
    assert_eq!(report.skipped(), 1);
    assert!(matches!(
        report.outcome("lib.hlsli"),
        Some(FileOutcome::Skipped)
    ));

    let output_root = config.output_root();
    assert!(output_root.join("foo").is_dir());
    assert!(!output_root.join("empty").exists());
    assert_eq!(
        read(output_root.join("gen_rts.hlsl")).unwrap(),
        b"shader table".to_vec()
    );
}

#[test]
fn modern_build_clears_stale_output() {
    let dir = source_tree();
    let config = config(&dir, Pipeline::Modern, "true");
    let output_root = config.output_root();
    create_dir_all(output_root.join("old")).unwrap();
    write(output_root.join("old/removed_ps.cso"), "").unwrap();

    run(&config, &ProcessInvoker).unwrap();
    run(&config, &ProcessInvoker).unwrap();

    assert!(!output_root.join("old").exists());
    assert!(output_root.join("gen_rts.hlsl").exists());
}

#[test]
fn legacy_build_keeps_existing_output() {
    let dir = source_tree();
    let config = config(&dir, Pipeline::Legacy, "true");
    let output_root = config.output_root();
    create_dir_all(&output_root).unwrap();
    write(output_root.join("manual.txt"), "keep").unwrap();

    let report = run(&config, &ProcessInvoker).unwrap();
    run(&config, &ProcessInvoker).unwrap();

    assert_eq!(report.compiled(), 2);
    assert_eq!(report.copied(), 0);
    assert_eq!(report.skipped(), 3);
    assert_eq!(read(output_root.join("manual.txt")).unwrap(), b"keep".to_vec());
    assert!(!output_root.join("gen_rts.hlsl").exists());
}

#[test]
fn failures_are_collected_and_do_not_stop_the_run() {
    let dir = source_tree();
    let config = config(&dir, Pipeline::Modern, "false");
    let report = run(&config, &ProcessInvoker).unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed(), 3);
    assert_eq!(report.copied(), 1);
    let failed: Vec<&Path> = report.failures().map(|(path, _)| path).collect();
    assert_eq!(
        failed,
        vec![
            Path::new("foo/bar_ps.hlsl"),
            Path::new("foo/bar_vs.hlsl"),
            Path::new("mesh_ms.hlsl"),
        ]
    );
    assert!(report
        .failures()
        .all(|(_, error)| matches!(error, FileError::Exit { .. })));
}

#[test]
fn missing_compiler_is_a_per_file_failure() {
    let dir = source_tree();
    let config = config(&dir, Pipeline::Modern, "/nonexistent/shaderbin/dxc.exe");
    let report = run(&config, &ProcessInvoker).unwrap();

    assert_eq!(report.failed(), 3);
    assert!(report
        .failures()
        .all(|(_, error)| matches!(error, FileError::Spawn(..))));
}

#[test]
fn missing_source_root_aborts() {
    let dir = tempdir().unwrap();
    let config = config(&dir, Pipeline::Modern, "true");
    assert!(matches!(
        run(&config, &ProcessInvoker),
        Err(PipelineError::MissingSource(_))
    ));
}

#[test]
fn output_equal_to_relative_source_is_rejected() {
    let dir = source_tree();
    let source = dir.path().join("shaders");
    let config = Config {
        source_root: relative_to_cwd(&source),
        output_root: Some(source.clone()),
        ..config(&dir, Pipeline::Modern, "true")
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutputIsSource(_))
    ));
    assert!(matches!(
        run(&config, &ProcessInvoker),
        Err(PipelineError::Config(ConfigError::OutputIsSource(_)))
    ));
    assert!(source.join("foo/bar_ps.hlsl").exists());
}

#[test]
fn output_above_source_is_rejected() {
    let dir = source_tree();
    let config = Config {
        output_root: Some(dir.path().to_path_buf()),
        ..config(&dir, Pipeline::Modern, "true")
    };

    assert!(matches!(
        run(&config, &ProcessInvoker),
        Err(PipelineError::Config(ConfigError::OutputContainsSource(_)))
    ));
    assert!(dir.path().join("shaders/foo/bar_ps.hlsl").exists());
}

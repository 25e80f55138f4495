// tests/settings_resolution.rs

mod common;
use crate::common::TestResult;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use testrun::cli::CliArgs;
use testrun::config::{DirSource, ResolveContext, discover_project_root, resolve_settings};
use testrun::errors::{ErrorKind, TestrunError};
use testrun::fs::mock::MockFileSystem;
use testrun::types::ExitCodePolicy;

fn ctx<'a>(fs: &'a MockFileSystem, cwd: &str, env: &[(&str, &str)]) -> ResolveContext<'a> {
    let env: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ResolveContext {
        fs,
        cwd: PathBuf::from(cwd),
        env: Box::new(move |key: &str| env.get(key).cloned()),
    }
}

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("testrun").chain(argv.iter().copied()))
        .expect("valid CLI arguments")
}

#[test]
fn defaults_without_config_or_markers() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_dir("/work/app");

    let settings = resolve_settings(&args(&[]), &ctx(&fs, "/work/app", &[]))?;

    assert_eq!(settings.spec.program, "npm");
    assert_eq!(settings.spec.args, vec!["run", "test:ci"]);
    assert_eq!(settings.spec.cwd, PathBuf::from("/work/app"));
    assert_eq!(settings.dir_source, DirSource::CurrentDir);
    assert_eq!(settings.spec.timeout, Duration::from_secs(120));
    assert_eq!(settings.spec.kill_grace, Duration::from_secs(5));
    assert_eq!(settings.spec.shell, cfg!(windows));
    assert_eq!(settings.exit_code, ExitCodePolicy::Report);
    assert!(settings.config_path.is_none());
    Ok(())
}

#[test]
fn project_root_is_discovered_from_nested_directory() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/work/front/package.json", "{}");
    fs.add_dir("/work/front/src/components");

    let settings = resolve_settings(&args(&[]), &ctx(&fs, "/work/front/src/components", &[]))?;

    assert_eq!(settings.spec.cwd, PathBuf::from("/work/front"));
    assert_eq!(settings.dir_source, DirSource::Discovered);
    Ok(())
}

#[test]
fn discovery_returns_nearest_marker_and_honours_custom_markers() {
    let fs = MockFileSystem::new();
    fs.add_file("/repo/package.json", "{}");
    fs.add_file("/repo/packages/web/package.json", "{}");
    fs.add_file("/repo/deno.json", "{}");

    let npm = vec!["package.json".to_string()];
    assert_eq!(
        discover_project_root(&fs, Path::new("/repo/packages/web/src"), &npm),
        Some(PathBuf::from("/repo/packages/web"))
    );

    let deno = vec!["deno.json".to_string()];
    assert_eq!(
        discover_project_root(&fs, Path::new("/repo/packages/web/src"), &deno),
        Some(PathBuf::from("/repo"))
    );

    let none = vec!["Cargo.toml".to_string()];
    assert_eq!(discover_project_root(&fs, Path::new("/repo"), &none), None);
}

#[test]
fn config_cwd_is_relative_to_config_file() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/work/Testrun.toml",
        r#"
[runner]
command = ["yarn", "test"]
cwd = "front"
timeout = "30s"
exit_code = "propagate"

[runner.env]
CI = "true"
"#,
    );

    let settings = resolve_settings(&args(&[]), &ctx(&fs, "/work", &[]))?;

    assert_eq!(settings.config_path, Some(PathBuf::from("/work/Testrun.toml")));
    assert_eq!(settings.spec.program, "yarn");
    assert_eq!(settings.spec.args, vec!["test"]);
    assert_eq!(settings.spec.cwd, PathBuf::from("/work/front"));
    assert_eq!(settings.dir_source, DirSource::Config);
    assert_eq!(settings.spec.timeout, Duration::from_secs(30));
    assert_eq!(settings.exit_code, ExitCodePolicy::Propagate);
    assert_eq!(settings.spec.env.get("CI").map(String::as_str), Some("true"));
    Ok(())
}

#[test]
fn explicit_config_path_is_used_and_must_exist() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/etc/ci/frontend.toml", "[runner]\ncwd = \"/srv/front\"\n");

    let settings = resolve_settings(
        &args(&["--config", "/etc/ci/frontend.toml"]),
        &ctx(&fs, "/home/me", &[]),
    )?;
    assert_eq!(settings.spec.cwd, PathBuf::from("/srv/front"));

    let err = resolve_settings(
        &args(&["--config", "missing.toml"]),
        &ctx(&fs, "/home/me", &[]),
    )
    .expect_err("missing explicit config");
    match err {
        TestrunError::ConfigError(msg) => assert!(msg.contains("missing.toml")),
        e => panic!("Expected ConfigError, got: {:?}", e),
    }
    Ok(())
}

#[test]
fn dir_precedence_is_flag_then_env_then_config() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/work/Testrun.toml", "[runner]\ncwd = \"from-config\"\n");

    let env = [("TESTRUN_DIR", "/from/env")];

    let settings = resolve_settings(&args(&["--dir", "/from/flag"]), &ctx(&fs, "/work", &env))?;
    assert_eq!(settings.spec.cwd, PathBuf::from("/from/flag"));
    assert_eq!(settings.dir_source, DirSource::Flag);

    let settings = resolve_settings(&args(&[]), &ctx(&fs, "/work", &env))?;
    assert_eq!(settings.spec.cwd, PathBuf::from("/from/env"));
    assert_eq!(settings.dir_source, DirSource::Env);

    // Blank env values are ignored.
    let settings = resolve_settings(&args(&[]), &ctx(&fs, "/work", &[("TESTRUN_DIR", " ")]))?;
    assert_eq!(settings.spec.cwd, PathBuf::from("/work/from-config"));
    assert_eq!(settings.dir_source, DirSource::Config);

    // Relative --dir is taken from the invocation directory.
    let settings = resolve_settings(&args(&["--dir", "web"]), &ctx(&fs, "/work", &[]))?;
    assert_eq!(settings.spec.cwd, PathBuf::from("/work/web"));
    Ok(())
}

#[test]
fn timeout_precedence_and_validation() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/work/Testrun.toml", "[runner]\ntimeout = \"10m\"\n");

    let settings = resolve_settings(&args(&[]), &ctx(&fs, "/work", &[]))?;
    assert_eq!(settings.spec.timeout, Duration::from_secs(600));

    let env = [("TESTRUN_TIMEOUT", "45")];
    let settings = resolve_settings(&args(&[]), &ctx(&fs, "/work", &env))?;
    assert_eq!(settings.spec.timeout, Duration::from_secs(45));

    let settings = resolve_settings(&args(&["--timeout", "2s"]), &ctx(&fs, "/work", &env))?;
    assert_eq!(settings.spec.timeout, Duration::from_secs(2));

    let err = resolve_settings(
        &args(&[]),
        &ctx(&fs, "/work", &[("TESTRUN_TIMEOUT", "soon")]),
    )
    .expect_err("bad env timeout");
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = resolve_settings(&args(&["--timeout", "0"]), &ctx(&fs, "/work", &[]))
        .expect_err("zero timeout");
    assert_eq!(err.kind(), ErrorKind::Config);
    Ok(())
}

#[test]
fn trailing_command_overrides_config() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("/work/Testrun.toml", "[runner]\ncommand = [\"npm\", \"test\"]\n");

    let settings = resolve_settings(
        &args(&["--shell", "--exit-code", "propagate", "--", "pnpm", "vitest", "run"]),
        &ctx(&fs, "/work", &[]),
    )?;

    assert_eq!(settings.spec.program, "pnpm");
    assert_eq!(settings.spec.args, vec!["vitest", "run"]);
    assert!(settings.spec.shell);
    assert_eq!(settings.exit_code, ExitCodePolicy::Propagate);

    let err = resolve_settings(&args(&["--", ""]), &ctx(&fs, "/work", &[]))
        .expect_err("empty program");
    assert!(matches!(err, TestrunError::ConfigError(_)));
    Ok(())
}

#[test]
fn cli_flag_overrides_config_exit_policy_and_grace() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/work/Testrun.toml",
        "[runner]\nexit_code = \"propagate\"\nkill_grace = \"10s\"\n",
    );

    let settings = resolve_settings(
        &args(&["--exit-code", "report", "--kill-grace", "250ms"]),
        &ctx(&fs, "/work", &[]),
    )?;

    assert_eq!(settings.exit_code, ExitCodePolicy::Report);
    assert_eq!(settings.spec.kill_grace, Duration::from_millis(250));
    Ok(())
}

#[test]
fn invalid_cli_values_are_rejected_by_clap() {
    let argv = ["testrun", "--timeout", "forever"];
    assert!(CliArgs::try_parse_from(argv).is_err());

    let argv = ["testrun", "--exit-code", "sometimes"];
    assert!(CliArgs::try_parse_from(argv).is_err());
}

#[test]
fn directory_named_like_config_is_not_loaded() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_dir("/work/Testrun.toml");
    fs.add_file("/work/package.json", "{}");

    let settings = resolve_settings(&args(&[]), &ctx(&fs, "/work", &[]))?;

    assert!(settings.config_path.is_none());
    assert_eq!(settings.dir_source, DirSource::Discovered);
    Ok(())
}

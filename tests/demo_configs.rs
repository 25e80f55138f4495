use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use testrun::config::load_and_validate;
use testrun::types::ExitCodePolicy;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn frontend_demo_config_loads() -> TestResult {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest.join("demos/frontend.toml"))?;

    let command = cfg.runner.command.ok_or("command missing")?;
    assert_eq!(command, vec!["npm", "run", "test:ci"]);
    assert_eq!(cfg.runner.timeout, Some(Duration::from_secs(120)));
    assert_eq!(cfg.runner.exit_code, Some(ExitCodePolicy::Propagate));
    assert_eq!(cfg.runner.env.get("CI").map(String::as_str), Some("true"));
    Ok(())
}

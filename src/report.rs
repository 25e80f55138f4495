// src/report.rs

//! Console report for a finished (or cut-short) run.

use std::io::{self, Write};

use crate::config::RunSettings;
use crate::errors::PartialOutput;
use crate::exec::ProcessResult;

/// Write the three-section report:
///
/// ```text
/// STDOUT:
/// <stdout>
///
/// STDERR:
/// <stderr>
///
/// Return code: <code>
/// ```
pub fn write_report(out: &mut dyn Write, result: &ProcessResult) -> io::Result<()> {
    writeln!(out, "STDOUT:")?;
    writeln!(out, "{}", result.stdout)?;
    writeln!(out, "\nSTDERR:")?;
    writeln!(out, "{}", result.stderr)?;
    writeln!(out, "\nReturn code: {}", result.exit_code)?;
    out.flush()
}

/// Output captured before a timeout or interruption. There is no return code.
pub fn write_partial_report(out: &mut dyn Write, partial: &PartialOutput) -> io::Result<()> {
    writeln!(out, "STDOUT (partial):")?;
    writeln!(out, "{}", partial.stdout)?;
    writeln!(out, "\nSTDERR (partial):")?;
    writeln!(out, "{}", partial.stderr)?;
    out.flush()
}

/// Render the report into a `String`.
pub fn render_report(result: &ProcessResult) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_report(&mut buf, result);
    String::from_utf8_lossy(&buf).into_owned()
}

/// `--dry-run` output: what would run, and where each setting came from.
pub fn write_dry_run(out: &mut dyn Write, settings: &RunSettings) -> io::Result<()> {
    let spec = &settings.spec;

    writeln!(out, "testrun dry-run")?;
    match &settings.config_path {
        Some(path) => writeln!(out, "  config: {}", path.display())?,
        None => writeln!(out, "  config: (none)")?,
    }
    writeln!(out, "  command: {}", spec.display())?;
    writeln!(out, "  cwd: {} ({})", spec.cwd.display(), settings.dir_source)?;
    writeln!(out, "  timeout: {:?}", spec.timeout)?;
    writeln!(out, "  kill_grace: {:?}", spec.kill_grace)?;
    writeln!(out, "  shell: {}", spec.shell)?;
    writeln!(out, "  exit_code: {:?}", settings.exit_code)?;
    if !spec.env.is_empty() {
        writeln!(out, "  env:")?;
        for (key, value) in &spec.env {
            writeln!(out, "    {key}={value}")?;
        }
    }
    out.flush()
}

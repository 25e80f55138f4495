use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

/// What the tool's own exit status should be after a completed run.
///
/// - `Report`: print the child's exit code but always exit 0 (default).
/// - `Propagate`: exit with the child's exit code, so the tool can gate CI.
///
/// Failures (timeout, launch errors, ...) never exit 0 under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExitCodePolicy {
    #[default]
    Report,
    Propagate,
}

impl ExitCodePolicy {
    /// Map a child's exit code to this tool's exit status.
    ///
    /// Negative codes mean "killed by signal N" and map to `128 + N`, like a
    /// shell would report them. Anything else outside `0..=255` becomes 1.
    pub fn exit_status_for(self, child_code: i32) -> i32 {
        match self {
            ExitCodePolicy::Report => 0,
            ExitCodePolicy::Propagate => match child_code {
                0..=255 => child_code,
                -127..=-1 => 128 - child_code,
                _ => 1,
            },
        }
    }
}

impl FromStr for ExitCodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "report" => Ok(ExitCodePolicy::Report),
            "propagate" => Ok(ExitCodePolicy::Propagate),
            other => Err(format!(
                "invalid exit_code policy: {other} (expected \"report\" or \"propagate\")"
            )),
        }
    }
}

/// Parse a duration string such as `"500ms"`, `"120s"`, `"2m"` or `"1h"`.
///
/// A bare integer is taken as seconds, so `--timeout 120` works.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if idx == 0 {
        return Err(format!("duration '{s}' must start with a number"));
    }

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };
    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`. Used for log fields.
pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

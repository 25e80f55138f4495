// src/exec/terminate.rs

//! Stopping a child and everything it spawned.
//!
//! On unix the child leads its own process group (see `runner.rs`), so
//! signalling `-pid` reaches npm, node and any workers below it.

use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, warn};

/// Terminate `child`: SIGTERM the group, wait up to `grace`, then SIGKILL the
/// group and reap the child. On other platforms the child is killed directly.
pub(crate) async fn terminate(child: &mut Child, pid: Option<u32>, grace: Duration) {
    #[cfg(unix)]
    {
        if let Some(pid) = pid {
            signal_process_group(pid, libc::SIGTERM);
            match tokio::time::timeout(grace, child.wait()).await {
                Ok(Ok(status)) => {
                    debug!(pid, ?status, "process exited after SIGTERM");
                    // Descendants that ignored SIGTERM.
                    signal_process_group(pid, libc::SIGKILL);
                    return;
                }
                Ok(Err(e)) => warn!(pid, error = %e, "waiting after SIGTERM failed"),
                Err(_) => warn!(
                    pid,
                    grace_ms = crate::types::duration_ms(grace),
                    "process did not exit within grace period; sending SIGKILL"
                ),
            }
            signal_process_group(pid, libc::SIGKILL);
        }
    }

    #[cfg(not(unix))]
    let _ = (pid, grace);

    if let Err(e) = child.kill().await {
        warn!(pid, error = %e, "failed to kill child process");
    }
}

/// Kill whatever is left in the child's process group.
///
/// Used after a normal exit when leftover descendants still hold the output
/// pipes open. No-op off unix.
pub(crate) fn kill_leftovers(pid: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pid) = pid {
            signal_process_group(pid, libc::SIGKILL);
        }
    }

    #[cfg(not(unix))]
    let _ = pid;
}

#[cfg(unix)]
fn signal_process_group(pid: u32, signal: libc::c_int) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        warn!(pid, "pid out of range for process group signal");
        return;
    };

    // SAFETY: kill(2) with a negative pid only sends a signal; no memory is
    // shared with the callee.
    let rc = unsafe { libc::kill(-pgid, signal) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ESRCH) {
            debug!(pid, signal, "process group already gone");
        } else {
            warn!(pid, signal, error = %err, "failed to signal process group");
        }
    } else {
        debug!(pid, signal, "signalled process group");
    }
}

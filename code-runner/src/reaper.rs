//! Termination of every process an execution started

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

/// Set on every child; inherited by descendants that keep their environment
pub const SANDBOX_ENV: &str = "CODE_RUNNER_SANDBOX";

/// Kills a child's process group, and any descendant that left the group but
/// still belongs to the sandbox, no later than when the guard is dropped.
///
/// Dropping the guard covers executions whose future is cancelled midway.
pub struct ProcessGuard {
    group: Option<Pid>,
    sandbox_id: String,
    root_dir: PathBuf,
    stdin_task: Option<JoinHandle<()>>,
    terminated: bool,
}

impl ProcessGuard {
    pub fn new(group: Option<Pid>, sandbox_id: &str, root_dir: &Path) -> Self {
        Self {
            group,
            sandbox_id: sandbox_id.to_string(),
            root_dir: root_dir.to_path_buf(),
            stdin_task: None,
            terminated: false,
        }
    }

    pub fn set_stdin_task(&mut self, task: JoinHandle<()>) {
        self.stdin_task = Some(task);
    }

    /// Kill the whole tree now. Later calls do nothing.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        if let Some(task) = self.stdin_task.take() {
            task.abort();
        }
        if let Some(pgid) = self.group {
            // ESRCH just means every member already exited
            let _ = killpg(pgid, Signal::SIGKILL);
        }
        sweep(&self.sandbox_id, &self.root_dir);
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(target_os = "linux")]
const SWEEP_ROUNDS: usize = 3;

/// Kill processes that escaped the group (setsid, setpgid) but still carry the
/// sandbox marker in their environment or run inside the work area.
#[cfg(target_os = "linux")]
fn sweep(sandbox_id: &str, root_dir: &Path) {
    use nix::sys::signal::kill;
    use tracing::debug;

    let marker = format!("{}={}", SANDBOX_ENV, sandbox_id);
    for _ in 0..SWEEP_ROUNDS {
        let stray = members(marker.as_bytes(), root_dir);
        if stray.is_empty() {
            return;
        }
        for pid in stray {
            debug!("Killing leftover process {} of sandbox {}", pid, sandbox_id);
            let _ = kill(pid, Signal::SIGKILL);
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn sweep(_sandbox_id: &str, _root_dir: &Path) {}

#[cfg(target_os = "linux")]
fn members(marker: &[u8], root_dir: &Path) -> Vec<Pid> {
    let own = std::process::id() as i32;
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return Vec::new();
    };

    entries
        .flatten()
        .filter_map(|entry| entry.file_name().to_str()?.parse::<i32>().ok())
        .filter(|pid| *pid != own && belongs_to(*pid, marker, root_dir))
        .map(Pid::from_raw)
        .collect()
}

/// Zombies and processes of other users read as non-members
#[cfg(target_os = "linux")]
fn belongs_to(pid: i32, marker: &[u8], root_dir: &Path) -> bool {
    let proc_dir = PathBuf::from(format!("/proc/{}", pid));

    if let Ok(cwd) = std::fs::read_link(proc_dir.join("cwd")) {
        if cwd.starts_with(root_dir) {
            return true;
        }
    }

    match std::fs::read(proc_dir.join("environ")) {
        Ok(environ) => environ.split(|byte| *byte == 0).any(|var| var == marker),
        Err(_) => false,
    }
}

use nix::sys::resource::{getrlimit, setrlimit, Resource};
use nix::unistd::Pid;
use std::io::ErrorKind;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::{
    fs,
    io::AsyncWriteExt,
    process::Command,
    time::{self, Duration},
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::{
    error::Error,
    languages::{resolve_tool, toolchain_missing},
    output::{
        bound_text, byte_cap_for, read_into, Captured, STDERR_TRUNCATION_MARKER,
        STDOUT_TRUNCATION_MARKER,
    },
    reaper::{ProcessGuard, SANDBOX_ENV},
    types::{ProcessOutput, ResourceLimits},
};

/// How long output readers may keep going once the process tree is gone
const READER_GRACE: Duration = Duration::from_secs(2);

/// Isolated work area for a single execution.
///
/// The directory is created by [`Sandbox::new`] and removed when the sandbox is
/// dropped, on every exit path.
pub struct Sandbox {
    /// Root directory for the sandbox
    pub root_dir: PathBuf,
    /// Unique ID for this sandbox instance
    id: String,
}

impl Sandbox {
    /// Create a new sandbox directory under `work_root`
    pub async fn new(work_root: &Path) -> Result<Self, Error> {
        let id = Uuid::new_v4().to_string();
        let root_dir = work_root.join(format!("sandbox-{}", id));

        fs::create_dir_all(&root_dir)
            .await
            .map_err(|e| Error::Sandbox(format!("Failed to create sandbox directory: {}", e)))?;

        // /proc reports working directories as resolved paths
        let root_dir = match fs::canonicalize(&root_dir).await {
            Ok(resolved) => resolved,
            Err(e) => {
                let _ = fs::remove_dir_all(&root_dir).await;
                return Err(Error::Sandbox(format!(
                    "Failed to resolve sandbox directory: {}",
                    e
                )));
            }
        };

        debug!("Created sandbox {} at {}", id, root_dir.display());
        Ok(Sandbox { root_dir, id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Write the source file verbatim into the sandbox root
    pub async fn write_source(&self, file_name: &str, code: &str) -> Result<PathBuf, Error> {
        let path = self.root_dir.join(file_name);
        fs::write(&path, code)
            .await
            .map_err(|e| Error::Sandbox(format!("Failed to write source file: {}", e)))?;
        Ok(path)
    }

    /// Run one command inside the sandbox.
    ///
    /// The child leads its own process group so the whole tree can be killed,
    /// and carries the sandbox id in its environment so descendants that leave
    /// the group are still found. `input` is piped to stdin and stdin is then
    /// closed. Output is captured concurrently and bounded to
    /// `max_output_chars` per stream.
    pub async fn execute(
        &self,
        program: &str,
        args: &[String],
        input: &str,
        timeout: Duration,
        limits: &ResourceLimits,
        max_output_chars: usize,
    ) -> Result<ProcessOutput, Error> {
        debug!("Sandbox execute - Command: {}", program);
        debug!("Sandbox execute - Args: {:?}", args);
        debug!("Sandbox execute - Root dir: {:?}", self.root_dir);

        // Artifacts are absolute paths inside the sandbox; tools come from PATH
        let is_artifact = Path::new(program).is_absolute();
        let cmd_path = if is_artifact {
            PathBuf::from(program)
        } else {
            resolve_tool(program)?
        };

        let mut command = Command::new(&cmd_path);
        command
            .args(args)
            .current_dir(&self.root_dir)
            .env(SANDBOX_ENV, &self.id)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true);

        let file_size = limits.file_size;
        let cpu_time = limits.cpu_time;

        unsafe {
            command.pre_exec(move || {
                lower_limit(Resource::RLIMIT_FSIZE, file_size)?;
                lower_limit(Resource::RLIMIT_CPU, cpu_time)?;
                Ok(())
            });
        }

        let mut child = command.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound if !is_artifact => toolchain_missing(program),
            _ => Error::Sandbox(format!("Failed to spawn process {}: {}", program, e)),
        })?;

        // From here on every exit path, including cancellation, kills the tree
        let mut guard = ProcessGuard::new(
            child.id().map(|id| Pid::from_raw(id as i32)),
            &self.id,
            &self.root_dir,
        );

        if let Some(mut stdin) = child.stdin.take() {
            let input = input.as_bytes().to_vec();
            guard.set_stdin_task(tokio::spawn(async move {
                // Programs that never read stdin close the pipe early
                if let Err(e) = stdin.write_all(&input).await {
                    if e.kind() != ErrorKind::BrokenPipe {
                        debug!("Failed to write input: {}", e);
                    }
                }
            }));
        }

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(Error::Sandbox("Child output pipes were not captured".to_string()));
        };

        let byte_cap = byte_cap_for(max_output_chars);
        let mut stdout_buf = Captured::default();
        let mut stderr_buf = Captured::default();

        let status = {
            let reading = async {
                let (out, err) = tokio::join!(
                    read_into(stdout, byte_cap, &mut stdout_buf),
                    read_into(stderr, byte_cap, &mut stderr_buf),
                );
                out.and(err)
            };
            tokio::pin!(reading);
            let mut drained = false;

            let waited = time::timeout(timeout, async {
                loop {
                    tokio::select! {
                        status = child.wait() => break status,
                        read = &mut reading, if !drained => {
                            drained = true;
                            if let Err(e) = read {
                                debug!("Output capture ended early: {}", e);
                            }
                        }
                    }
                }
            })
            .await;

            let status = match waited {
                Ok(Ok(status)) => status,
                Ok(Err(e)) => return Err(Error::Sandbox(format!("Process error: {}", e))),
                Err(_) => {
                    warn!(
                        "Process {} exceeded {:?} in sandbox {}, killing process group",
                        program, timeout, self.id
                    );
                    guard.terminate();
                    if let Err(e) = child.wait().await {
                        error!("Failed to reap timed out process: {}", e);
                    }
                    return Err(Error::Timeout(timeout));
                }
            };

            // Descendants must not outlive the execution
            guard.terminate();

            if !drained {
                match time::timeout(READER_GRACE, &mut reading).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => debug!("Output capture ended early: {}", e),
                    Err(_) => warn!(
                        "Output of sandbox {} stayed open after exit, keeping what was captured",
                        self.id
                    ),
                }
            }

            status
        };

        Ok(ProcessOutput {
            exit_code: status.code(),
            signal: status.signal(),
            stdout: bound_text(&stdout_buf, max_output_chars, STDOUT_TRUNCATION_MARKER),
            stderr: bound_text(&stderr_buf, max_output_chars, STDERR_TRUNCATION_MARKER),
        })
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        // Clean up sandbox directory
        if let Err(e) = std::fs::remove_dir_all(&self.root_dir) {
            if e.kind() != ErrorKind::NotFound {
                error!("Failed to clean up sandbox directory: {}", e);
            }
        } else {
            debug!("Removed sandbox {}", self.id);
        }
    }
}

/// Unprivileged processes may lower limits but never raise the hard limit
fn lower_limit(resource: Resource, value: u64) -> nix::Result<()> {
    let (_, hard) = getrlimit(resource)?;
    let value = value.min(hard);
    setrlimit(resource, value, value)
}

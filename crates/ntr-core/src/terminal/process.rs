//! Terminals backed by interactive shell child processes.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, warn};

use super::{Terminal, TerminalError, TerminalHost, TerminalId, TerminalOptions};

/// Spawns one shell per terminal.
///
/// The shell reads commands from a pipe and shares the host's stdout and
/// stderr. On unix it leads its own process group, so disposing a terminal
/// also kills whatever the shell started. When a shell exits, for whatever
/// reason, its id is sent on the channel returned by
/// [`ProcessTerminalHost::new`].
pub struct ProcessTerminalHost {
    shell: String,
    next_id: AtomicU64,
    closed_tx: mpsc::UnboundedSender<TerminalId>,
}

impl ProcessTerminalHost {
    /// Creates a host and the receiver of its closure notifications.
    pub fn new(shell: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<TerminalId>) {
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();
        let host = Self {
            shell: shell.into(),
            next_id: AtomicU64::new(1),
            closed_tx,
        };
        (host, closed_rx)
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }
}

#[async_trait]
impl TerminalHost for ProcessTerminalHost {
    type Terminal = ProcessTerminal;

    async fn create_terminal(&self, options: TerminalOptions) -> Result<ProcessTerminal, TerminalError> {
        let id = TerminalId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut command = Command::new(&self.shell);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(cwd) = &options.cwd {
            command.current_dir(cwd);
        }
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|source| TerminalError::Spawn {
            program: self.shell.clone(),
            source,
        })?;
        let stdin = child.stdin.take();
        let (kill_tx, kill_rx) = oneshot::channel();

        debug!(%id, name = %options.name, pid = ?child.id(), "spawned terminal shell");
        tokio::spawn(watch_child(id, child, kill_rx, self.closed_tx.clone()));

        Ok(ProcessTerminal {
            id,
            name: options.name,
            stdin: Mutex::new(stdin),
            kill: Mutex::new(Some(kill_tx)),
        })
    }
}

/// Waits for the shell to exit or to be killed, then reports the closure.
async fn watch_child(
    id: TerminalId,
    mut child: Child,
    kill_rx: oneshot::Receiver<()>,
    closed_tx: mpsc::UnboundedSender<TerminalId>,
) {
    tokio::select! {
        status = child.wait() => match status {
            Ok(status) => debug!(%id, %status, "terminal shell exited"),
            Err(err) => warn!(%id, error = %err, "failed waiting for terminal shell"),
        },
        _ = kill_rx => {
            kill_process_group(id, child.id());
            if let Err(err) = child.kill().await {
                warn!(%id, error = %err, "failed to kill terminal shell");
            }
        }
    }

    // Nobody listening means the host is shutting down.
    let _ = closed_tx.send(id);
}

/// Kill the group led by a still-running shell.
#[cfg(unix)]
fn kill_process_group(id: TerminalId, pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|pid| i32::try_from(pid).ok()).filter(|pid| *pid > 0) else {
        warn!(%id, ?pid, "no process group to signal");
        return;
    };

    // SAFETY: plain syscall; the shell has not been reaped, so `pgid` is still its group.
    if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
        debug!(%id, pgid, error = %std::io::Error::last_os_error(), "failed to signal process group");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_id: TerminalId, _pid: Option<u32>) {}

/// A shell child process.
pub struct ProcessTerminal {
    id: TerminalId,
    name: String,
    stdin: Mutex<Option<ChildStdin>>,
    kill: Mutex<Option<oneshot::Sender<()>>>,
}

#[async_trait]
impl Terminal for ProcessTerminal {
    fn id(&self) -> TerminalId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn send_text(&self, text: &str, add_newline: bool) -> Result<(), TerminalError> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard.as_mut().ok_or(TerminalError::Closed(self.id))?;

        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|e| TerminalError::io(self.id, e))?;
        if add_newline {
            stdin
                .write_all(b"\n")
                .await
                .map_err(|e| TerminalError::io(self.id, e))?;
        }
        stdin.flush().await.map_err(|e| TerminalError::io(self.id, e))
    }

    async fn show(&self, preserve_focus: bool) -> Result<(), TerminalError> {
        // Output already goes to the host's own terminal.
        debug!(id = %self.id, name = %self.name, preserve_focus, "showing terminal");
        Ok(())
    }

    async fn dispose(&self) -> Result<(), TerminalError> {
        self.stdin.lock().await.take();
        if let Some(kill) = self.kill.lock().await.take() {
            // The watcher is gone once the shell has exited.
            let _ = kill.send(());
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_dispose_reports_closure() {
        let (host, mut closed) = ProcessTerminalHost::new("sh");
        let terminal = host
            .create_terminal(TerminalOptions::new("Node Test Runner"))
            .await
            .unwrap();
        assert_eq!(terminal.name(), "Node Test Runner");

        terminal.dispose().await.unwrap();
        let id = tokio::time::timeout(Duration::from_secs(5), closed.recv())
            .await
            .unwrap();
        assert_eq!(id, Some(terminal.id()));

        assert!(matches!(
            terminal.send_text("true", true).await,
            Err(TerminalError::Closed(_))
        ));
        terminal.dispose().await.unwrap();
    }

    #[tokio::test]
    async fn test_exit_reports_closure() {
        let (host, mut closed) = ProcessTerminalHost::new("sh");
        let terminal = host.create_terminal(TerminalOptions::new("t")).await.unwrap();

        terminal.send_text("exit 0", true).await.unwrap();
        let id = tokio::time::timeout(Duration::from_secs(5), closed.recv())
            .await
            .unwrap();
        assert_eq!(id, Some(terminal.id()));
    }

    #[cfg(target_os = "linux")]
    fn is_running(pid: &str) -> bool {
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            // State follows the parenthesized command name.
            Ok(stat) => !stat.rsplit(')').next().is_some_and(|rest| rest.trim_start().starts_with('Z')),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_dispose_kills_started_commands() {
        let dir = tempfile::TempDir::new().unwrap();
        let pid_file = dir.path().join("pid");
        let (host, mut closed) = ProcessTerminalHost::new("sh");
        let terminal = host.create_terminal(TerminalOptions::new("t")).await.unwrap();

        terminal
            .send_text(&format!("sleep 424242 & echo $! > {}; wait", pid_file.display()), true)
            .await
            .unwrap();

        let mut pid = String::new();
        for _ in 0..100 {
            pid = std::fs::read_to_string(&pid_file).unwrap_or_default().trim().to_string();
            if !pid.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(is_running(&pid), "command never started");

        terminal.dispose().await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), closed.recv())
            .await
            .unwrap();

        let mut alive = true;
        for _ in 0..100 {
            alive = is_running(&pid);
            if !alive {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(!alive, "command {pid} survived dispose");
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let (host, _closed) = ProcessTerminalHost::new("/nonexistent/shell-for-ntr-tests");
        let result = host.create_terminal(TerminalOptions::new("t")).await;
        assert!(matches!(result, Err(TerminalError::Spawn { .. })));
    }
}

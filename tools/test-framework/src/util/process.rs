/*!
   Long running child processes owned by a test.
*/

use std::fs::File;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

use crate::error::{handle_exec_error, Error};

/**
   A wrapper around [`Child`] that kills and reaps the process when
   dropped, so that no node or relayer outlives the test that spawned
   it.
*/
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    waited: bool,
}

impl ChildProcess {
    pub fn new(child: Child) -> Self {
        Self {
            child,
            waited: false,
        }
    }

    /**
       Spawn `command_path` with `args`, sending its stdout and stderr to
       `<log_dir>/<name>.stdout` and `<log_dir>/<name>.stderr`.
    */
    pub fn spawn_logged(
        name: &str,
        command_path: &str,
        args: &[&str],
        log_dir: &Path,
    ) -> Result<Self, Error> {
        std::fs::create_dir_all(log_dir)?;

        let stdout = File::create(log_dir.join(format!("{name}.stdout")))?;
        let stderr = File::create(log_dir.join(format!("{name}.stderr")))?;

        debug!(
            "spawning {}: {} {}",
            name,
            command_path,
            itertools::join(args, " ")
        );

        let child = Command::new(command_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(handle_exec_error(command_path))?;

        Ok(Self::new(child))
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Whether the process is still running.
    pub fn is_running(&mut self) -> bool {
        !self.waited && matches!(self.child.try_wait(), Ok(None))
    }

    pub fn wait(&mut self) -> Result<(), Error> {
        if !self.waited {
            self.waited = true;
            self.child.wait()?;
        }

        Ok(())
    }

    pub fn kill(&mut self) -> Result<(), Error> {
        if self.waited {
            return Ok(());
        }

        if let Err(e) = self.child.kill() {
            // the process may have exited on its own
            warn!("failed to kill process {}: {}", self.child.id(), e);
        }

        self.wait()
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        if !self.waited {
            let _ = self.kill();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn kill_stops_process() {
        let dir = std::env::temp_dir().join(format!(
            "child-process-{}",
            crate::util::random::random_string()
        ));

        let mut process = ChildProcess::spawn_logged("sleeper", "sleep", &["30"], &dir).unwrap();
        assert!(process.is_running());

        process.kill().unwrap();
        assert!(!process.is_running());

        let _ = std::fs::remove_dir_all(dir);
    }
}

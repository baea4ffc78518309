/*!
   Execution of chain and relayer command line tools.
*/

use eyre::eyre;
use std::process::{Command, Output};
use std::str;
use tracing::{debug, trace};

use crate::error::{handle_exec_error, handle_generic_error, Error};

#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/**
   Run `command_path` with `args` to completion.

   A non-zero exit status is an error carrying the captured stderr.
   `desc` identifies the chain or relayer the command is run for in the
   logs.
*/
pub fn simple_exec(desc: &str, command_path: &str, args: &[&str]) -> Result<ExecOutput, Error> {
    debug!(
        "[{}] executing: {} {}",
        desc,
        command_path,
        itertools::join(args, " ")
    );

    let output = Command::new(command_path)
        .args(args)
        .output()
        .map_err(handle_exec_error(command_path))?;

    let exec_output = decode_output(&output)?;

    if !output.status.success() {
        return Err(Error::generic(eyre!(
            "command `{} {}` exited with status {:?}: {}",
            command_path,
            args.first().unwrap_or(&""),
            output.status.code(),
            exec_output.stderr.trim()
        )));
    }

    trace!(
        "[{}] command succeeded with stdout: {}, stderr: {}",
        desc,
        exec_output.stdout,
        exec_output.stderr
    );

    Ok(exec_output)
}

fn decode_output(output: &Output) -> Result<ExecOutput, Error> {
    let stdout = str::from_utf8(&output.stdout)
        .map_err(handle_generic_error)?
        .to_string();

    let stderr = str::from_utf8(&output.stderr)
        .map_err(handle_generic_error)?
        .to_string();

    Ok(ExecOutput { stdout, stderr })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorDetail;

    #[test]
    fn missing_command_is_reported_by_name() {
        let err = simple_exec("test", "surely-not-an-installed-binary", &["version"]).unwrap_err();

        match err.detail() {
            ErrorDetail::CommandNotFound(e) => {
                assert_eq!(e.command, "surely-not-an-installed-binary")
            }
            other => panic!("expected command not found, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout() {
        let output = simple_exec("test", "echo", &["hello"]).unwrap();

        assert_eq!(output.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_error() {
        assert!(simple_exec("test", "false", &[]).is_err());
    }
}

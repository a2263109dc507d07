use anyhow::Result;
use log::debug;
use std::path::Path;
use std::process::{Command, Output};

/// Execute a command with debug logging, optionally inside `dir` with extra environment variables
pub fn execute_command_in(
    cmd: &str,
    args: &[&str],
    dir: Option<&Path>,
    envs: &[(&str, &str)],
) -> Result<Output> {
    debug!("Executing command: {} {}", cmd, args.join(" "));

    let mut command = Command::new(cmd);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    for (key, value) in envs {
        debug!("env: {}={}", key, value);
        command.env(key, value);
    }

    let output = command.output()?;

    if output.status.success() {
        debug!("Command succeeded: {} {}", cmd, args.join(" "));
    } else {
        debug!(
            "Command failed: {} {} (exit code: {:?})",
            cmd,
            args.join(" "),
            output.status.code()
        );
    }
    if !output.stdout.is_empty() {
        debug!("stdout: {}", String::from_utf8_lossy(&output.stdout).trim());
    }
    if !output.stderr.is_empty() {
        debug!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim());
    }

    Ok(output)
}

/// Stderr of a failed command, falling back to stdout when git wrote nothing there
pub fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        format!("exit code {:?}", output.status.code())
    } else {
        stdout
    }
}

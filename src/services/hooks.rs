//! Post-render hook invocation.

use anyhow::{Context, Result};
use std::process::Command;

/// Runs an application's post-render hook as a shell command.
///
/// Does nothing when the hook is empty. In dry-run mode the hook is
/// reported but not executed.
///
/// # Errors
///
/// Returns an error if the command cannot be started or exits non-zero.
/// Callers report hook failures and continue; they never abort the
/// remaining applications.
pub fn run_hook(app: &str, hook: &str, dry_run: bool) -> Result<()> {
    if hook.is_empty() {
        return Ok(());
    }

    if dry_run {
        println!("Not running hook for '{app}', dry-run enabled: {hook}");
        return Ok(());
    }

    println!("[hook]: running for '{app}': {hook}");

    let status = Command::new("sh")
        .arg("-c")
        .arg(hook)
        .status()
        .context(format!("Failed to start hook for '{app}': {hook}"))?;

    if !status.success() {
        anyhow::bail!(
            "Hook for '{app}' exited with {}: {hook}",
            status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string())
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hook_is_a_no_op() {
        assert!(run_hook("app", "", false).is_ok());
    }

    #[test]
    fn test_dry_run_skips_execution() {
        // A command that would fail if executed
        assert!(run_hook("app", "exit 1", true).is_ok());
    }

    #[test]
    fn test_successful_hook() {
        assert!(run_hook("app", "true", false).is_ok());
    }

    #[test]
    fn test_failing_hook_reports_exit_code() {
        let err = run_hook("app", "exit 3", false).unwrap_err();
        assert!(err.to_string().contains("exited with 3"));
    }

    #[test]
    fn test_hook_side_effect_runs() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let hook = format!("touch {}", marker.display());

        run_hook("app", &hook, false).unwrap();
        assert!(marker.exists());

        // Dry-run must not produce the side effect
        let marker2 = dir.path().join("ran2");
        let hook2 = format!("touch {}", marker2.display());
        run_hook("app", &hook2, true).unwrap();
        assert!(!marker2.exists());
    }
}

use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use crate::{
    error::AppError,
    profile::{CURRENT_PROFILE_NAME, Profile},
};

/// Configuration scope a profile is applied to or read from
#[derive(Debug, Clone)]
pub enum Scope {
    /// The repository at the given working directory
    Repository(PathBuf),
    /// User-wide git configuration
    Global,
}

fn git_config(scope: &Scope, tail: &[&str]) -> Result<Output, AppError> {
    let mut cmd = Command::new("git");
    match scope {
        Scope::Repository(path) => {
            cmd.arg("-C").arg(path);
            cmd.args(["config", "--local"]);
        }
        Scope::Global => {
            cmd.args(["config", "--global"]);
        }
    }
    cmd.args(tail);
    cmd.output()
        .map_err(|e| AppError::ExternalTool(format!("failed to invoke git: {e}")))
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn set_key(scope: &Scope, key: &str, value: &str) -> Result<(), AppError> {
    let output = git_config(scope, &[key, value])?;
    if !output.status.success() {
        return Err(AppError::Apply(format!(
            "could not set {key}: {}",
            stderr_text(&output)
        )));
    }
    Ok(())
}

fn unset_key(scope: &Scope, key: &str) -> Result<(), AppError> {
    let output = git_config(scope, &["--unset", key])?;
    // Exit status 5 means the key was not set to begin with.
    match output.status.code() {
        Some(0) | Some(5) => Ok(()),
        _ => Err(AppError::Apply(format!(
            "could not unset {key}: {}",
            stderr_text(&output)
        ))),
    }
}

fn get_key(scope: &Scope, key: &str) -> Result<Option<String>, AppError> {
    let output = git_config(scope, &["--get", key])?;
    if output.status.success() {
        Ok(Some(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
        ))
    } else if output.status.code() == Some(1) {
        Ok(None)
    } else {
        Err(AppError::ExternalTool(format!(
            "could not read {key}: {}",
            stderr_text(&output)
        )))
    }
}

fn get_bool_key(scope: &Scope, key: &str) -> Result<bool, AppError> {
    // git canonicalizes the stored spelling; decode the exact token only.
    let output = git_config(scope, &["--type=bool", "--get", key])?;
    if output.status.success() {
        match String::from_utf8_lossy(&output.stdout).trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(AppError::ExternalTool(format!(
                "unexpected boolean '{other}' for {key}"
            ))),
        }
    } else if output.status.code() == Some(1) {
        Ok(false)
    } else {
        Err(AppError::ExternalTool(format!(
            "could not read {key}: {}",
            stderr_text(&output)
        )))
    }
}

fn bool_token(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Projects a profile onto git configuration at the given scope
///
/// Repository-scope callers must have verified the path with
/// [`is_inside_git_repo`] first; the check is not repeated here. A failure
/// part way leaves the keys written so far in place.
pub fn apply_profile(profile: &Profile, scope: &Scope) -> Result<(), AppError> {
    set_key(scope, "user.name", &profile.user_name)?;
    set_key(scope, "user.email", &profile.user_email)?;

    match &profile.signing_key {
        Some(key) => {
            set_key(scope, "user.signingkey", key)?;
            // Written even when the preference is false: the narrower scope
            // has to override a broader "always sign" configuration.
            set_key(scope, "commit.gpgsign", bool_token(profile.auto_sign))?;
        }
        None => {
            // Drop any stale key rather than leaving it behind.
            unset_key(scope, "user.signingkey")?;
            set_key(scope, "commit.gpgsign", bool_token(false))?;
        }
    }

    Ok(())
}

/// Reads the identity currently configured at the given scope into a
/// transient profile named [`CURRENT_PROFILE_NAME`]
pub fn read_current_profile(scope: &Scope) -> Result<Profile, AppError> {
    let user_name = get_key(scope, "user.name")?.unwrap_or_default();
    let user_email = get_key(scope, "user.email")?.unwrap_or_default();
    // An empty key reads back as no key at all.
    let signing_key = get_key(scope, "user.signingkey")?.filter(|key| !key.is_empty());
    let auto_sign = get_bool_key(scope, "commit.gpgsign")?;

    Ok(Profile::new(
        CURRENT_PROFILE_NAME,
        user_name,
        user_email,
        signing_key,
        auto_sign,
    ))
}

/// Checks if the given directory is inside a Git repository
pub fn is_inside_git_repo(path: &Path) -> Result<bool, AppError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .args(["rev-parse", "--is-inside-work-tree"])
        .output()
        .map_err(|e| AppError::ExternalTool(format!("failed to invoke git: {e}")))?;

    Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
}

/// Checks if the git executable is installed and reachable
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

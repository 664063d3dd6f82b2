//! gitprof is a git profile switcher. It keeps named identity profiles
//! (user name, email, optional signing key) in a dotfile and applies one
//! of them to a repository's or the user's git configuration.

pub mod cli;
pub mod error;
pub mod git;
pub mod menu;
pub mod profile;
pub mod storage;
pub mod validation;

use std::{env, io, path::PathBuf};

use colored::Colorize;
use inquire::Confirm;

use crate::{
    cli::{Cli, Commands},
    error::AppError,
    git::Scope,
    profile::Profile,
    storage::ProfileStore,
};

/// Menu entry reserved for backing out of a selection; never a valid
/// profile name
pub const BACK_OPTION: &str = "back";

/// Dispatches a parsed command line, falling back to the interactive menu
pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Some(command) => run_command(command),
        None => run_interactive(),
    }
}

fn run_command(command: Commands) -> Result<(), AppError> {
    let store = ProfileStore::open_default()?;
    match command {
        Commands::Switch { profile_name, path } => switch_profile(&store, &profile_name, path),
        Commands::Global { profile_name } => set_global_profile(&store, &profile_name),
        Commands::Add {
            profile_name,
            user_name,
            user_email,
            signing_key,
            auto_sign,
        } => add_profile(
            &store,
            Profile::new(profile_name, user_name, user_email, signing_key, auto_sign),
        ),
        Commands::Delete { profile_name } => delete_profile(&store, &profile_name),
        Commands::Mirror { profile_name, path } => mirror_profile(&store, &profile_name, path),
        Commands::Current { path } => show_current(&store, path),
        Commands::List => list_profiles(&store),
    }
}

fn run_interactive() -> Result<(), AppError> {
    println!("{}", "gitprof: a git profile switcher".blue().bold());

    let store = ProfileStore::open_default()?;
    if !store.is_initialized() {
        println!(
            "{} {} does not exist yet",
            "note:".yellow(),
            store.path().display()
        );
        let create = Confirm::new("create the profile store now?")
            .with_default(true)
            .prompt()?;
        if !create {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("cannot continue without {}", store.path().display()),
            )));
        }
        store.init()?;
        println!("{}", "profile store created".green());
    }

    if !git::git_available() {
        return Err(AppError::ExternalTool(
            "git is not installed on this machine".to_string(),
        ));
    }

    list_profiles(&store)?;
    menu::run_menu(&store)
}

/// Applies a stored profile to the repository at `path`
/// (default: current directory)
pub fn switch_profile(
    store: &ProfileStore,
    name: &str,
    path: Option<PathBuf>,
) -> Result<(), AppError> {
    let path = match path {
        Some(path) => path,
        None => env::current_dir()?,
    };
    if !git::is_inside_git_repo(&path)? {
        return Err(AppError::NotInGitRepository);
    }

    let profile = store.find(name)?;
    git::apply_profile(&profile, &Scope::Repository(path))?;
    println!("{} {}", "switched to profile:".green(), profile.name);
    Ok(())
}

/// Applies a stored profile to the user-wide git configuration
pub fn set_global_profile(store: &ProfileStore, name: &str) -> Result<(), AppError> {
    let profile = store.find(name)?;
    git::apply_profile(&profile, &Scope::Global)?;
    println!("{} {}", "set global profile:".green(), profile.name);
    Ok(())
}

/// Validates and stores a new profile, initializing the store if needed
pub fn add_profile(store: &ProfileStore, profile: Profile) -> Result<(), AppError> {
    store.init()?;

    validation::validate_profile_name(&profile.name, &[])?;
    validation::validate_user_name(&profile.user_name)?;
    validation::validate_email(&profile.user_email)?;
    match &profile.signing_key {
        Some(key) => validation::validate_signing_key(key)?,
        None if profile.auto_sign => {
            return Err(AppError::InvalidField(
                "auto sign requires a signing key".to_string(),
            ));
        }
        None => {}
    }

    if store.contains(&profile.name)? {
        return Err(AppError::DuplicateProfile(profile.name));
    }

    store.save(&profile)?;
    println!("{} {}", "added profile:".green(), profile.name);
    Ok(())
}

/// Replaces a stored profile; an update never edits a line in place
pub fn update_profile(
    store: &ProfileStore,
    old_name: &str,
    updated: Profile,
) -> Result<(), AppError> {
    if updated.name != old_name && store.contains(&updated.name)? {
        return Err(AppError::DuplicateProfile(updated.name));
    }
    store.delete(old_name)?;
    store.save(&updated)?;
    println!("{} {}", "updated profile:".green(), updated.name);
    Ok(())
}

/// Deletes a stored profile by name
pub fn delete_profile(store: &ProfileStore, name: &str) -> Result<(), AppError> {
    if !store.contains(name)? {
        return Err(AppError::ProfileNotFound(name.to_string()));
    }
    store.delete(name)?;
    println!("{} {}", "deleted profile:".green(), name);
    Ok(())
}

/// Saves the currently configured identity under a new profile name
pub fn mirror_profile(
    store: &ProfileStore,
    name: &str,
    path: Option<PathBuf>,
) -> Result<(), AppError> {
    let scope = resolve_read_scope(path)?;
    let current = git::read_current_profile(&scope)?;
    add_profile(
        store,
        Profile::new(
            name,
            current.user_name,
            current.user_email,
            current.signing_key,
            current.auto_sign,
        ),
    )
}

/// Shows the identity configured at the resolved scope
pub fn show_current(store: &ProfileStore, path: Option<PathBuf>) -> Result<(), AppError> {
    let scope = resolve_read_scope(path)?;
    let current = git::read_current_profile(&scope)?;

    let scope_label = match &scope {
        Scope::Repository(path) => format!("repository {}", path.display()),
        Scope::Global => "global".to_string(),
    };
    println!(
        "{} {} <{}> ({scope_label})",
        "current identity:".blue(),
        current.user_name,
        current.user_email
    );
    match &current.signing_key {
        Some(key) => println!(
            "{} {}, autosign {}",
            "signing key:".blue(),
            key,
            if current.auto_sign { "enabled" } else { "disabled" }
        ),
        None => println!("{} none", "signing key:".blue()),
    }

    if store.is_initialized() {
        if let Some(saved) = store
            .list()?
            .into_iter()
            .find(|profile| profile.equivalent(&current))
        {
            println!("{} {}", "matches saved profile:".blue(), saved.name);
        }
    }
    Ok(())
}

/// Lists all stored profiles
pub fn list_profiles(store: &ProfileStore) -> Result<(), AppError> {
    let profiles = store.list()?;
    if profiles.is_empty() {
        println!("{}", "no profiles saved yet, use 'add' to create one".yellow());
        return Ok(());
    }

    for profile in profiles {
        println!("{} {}", format!("{}:", profile.name).cyan().bold(), profile.summary());
    }
    Ok(())
}

/// Resolves the scope reads run against: an explicit repository path, the
/// current directory when it is a repository, or the global configuration
fn resolve_read_scope(path: Option<PathBuf>) -> Result<Scope, AppError> {
    match path {
        Some(path) => {
            if !git::is_inside_git_repo(&path)? {
                return Err(AppError::NotInGitRepository);
            }
            Ok(Scope::Repository(path))
        }
        None => {
            let cwd = env::current_dir()?;
            if git::is_inside_git_repo(&cwd)? {
                Ok(Scope::Repository(cwd))
            } else {
                Ok(Scope::Global)
            }
        }
    }
}

use colored::Colorize;
use inquire::{Confirm, Select};

use crate::{
    BACK_OPTION, add_profile, delete_profile, error::AppError, list_profiles, mirror_profile,
    profile::Profile, set_global_profile, show_current, storage::ProfileStore, switch_profile,
    update_profile,
    validation::{
        prompt_until_valid, validate_email, validate_profile_name, validate_signing_key,
        validate_user_name,
    },
};

/// Runs the interactive menu interface
pub fn run_menu(store: &ProfileStore) -> Result<(), AppError> {
    loop {
        let actions: Vec<&'static str> = vec![
            "switch profile (repository)",
            "switch profile (global)",
            "add profile",
            "update profile",
            "delete profile",
            "mirror current identity",
            "show current identity",
            "list profiles",
            "quit",
        ];

        let action_selected: &'static str =
            Select::new(&format!("{}", "select action".blue()), actions).prompt()?;

        let outcome = match action_selected {
            "switch profile (repository)" => menu_switch_profile(store),
            "switch profile (global)" => menu_global_profile(store),
            "add profile" => menu_add_profile(store),
            "update profile" => menu_update_profile(store),
            "delete profile" => menu_delete_profile(store),
            "mirror current identity" => menu_mirror_profile(store),
            "show current identity" => show_current(store, None),
            "list profiles" => list_profiles(store),
            "quit" => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        };

        // A failed action is reported and the menu keeps running; a torn
        // down prompt ends the session.
        if let Err(err) = outcome {
            if matches!(err, AppError::Inquire(_)) {
                return Err(err);
            }
            println!("{} {}", "error:".red(), err);
        }
    }
}

/// Menu for applying a profile to the current repository
fn menu_switch_profile(store: &ProfileStore) -> Result<(), AppError> {
    let Some(name) = select_profile_name(store, "select profile to apply:")? else {
        return Ok(());
    };
    switch_profile(store, &name, None)
}

/// Menu for applying a profile to the global configuration
fn menu_global_profile(store: &ProfileStore) -> Result<(), AppError> {
    let Some(name) = select_profile_name(store, "select profile to set globally:")? else {
        return Ok(());
    };
    set_global_profile(store, &name)
}

/// Menu for adding a new profile
fn menu_add_profile(store: &ProfileStore) -> Result<(), AppError> {
    let profiles: Vec<Profile> = if store.is_initialized() {
        store.list()?
    } else {
        Vec::new()
    };

    // Input validation
    let name: String = prompt_until_valid(
        &format!("{}", "enter profile name:".blue()),
        |input| validate_profile_name(input, &profiles),
    )?;

    let user_name: String = prompt_until_valid(
        &format!("{}", "enter git user name:".blue()),
        |input| validate_user_name(input),
    )?;

    let user_email: String = prompt_until_valid(
        &format!("{}", "enter git email:".blue()),
        |input| validate_email(input),
    )?;

    let (signing_key, auto_sign) = prompt_signing_details()?;

    add_profile(
        store,
        Profile::new(name, user_name, user_email, signing_key, auto_sign),
    )
}

/// Menu for updating a profile, modeled as delete followed by save
fn menu_update_profile(store: &ProfileStore) -> Result<(), AppError> {
    let Some(old_name) = select_profile_name(store, "select profile to update:")? else {
        return Ok(());
    };
    let old = store.find(&old_name)?;
    println!("{} {}", "updating".blue(), old);

    let others: Vec<Profile> = store
        .list()?
        .into_iter()
        .filter(|profile| profile.name != old_name)
        .collect();

    let name: String = prompt_until_valid(
        &format!("{}", "enter new profile name:".blue()),
        |input| validate_profile_name(input, &others),
    )?;

    let user_name: String = prompt_until_valid(
        &format!("{}", "enter git user name:".blue()),
        |input| validate_user_name(input),
    )?;

    let user_email: String = prompt_until_valid(
        &format!("{}", "enter git email:".blue()),
        |input| validate_email(input),
    )?;

    let (signing_key, auto_sign) = prompt_signing_details()?;

    update_profile(
        store,
        &old_name,
        Profile::new(name, user_name, user_email, signing_key, auto_sign),
    )
}

/// Menu for deleting a profile
fn menu_delete_profile(store: &ProfileStore) -> Result<(), AppError> {
    let Some(name) = select_profile_name(store, "select profile to delete:")? else {
        return Ok(());
    };
    let profile = store.find(&name)?;

    let confirmed = Confirm::new(&format!("delete {profile}?"))
        .with_default(false)
        .prompt()?;
    if confirmed {
        delete_profile(store, &name)
    } else {
        println!("{}", "kept profile".yellow());
        Ok(())
    }
}

/// Menu for saving the currently configured identity as a profile
fn menu_mirror_profile(store: &ProfileStore) -> Result<(), AppError> {
    let profiles: Vec<Profile> = if store.is_initialized() {
        store.list()?
    } else {
        Vec::new()
    };

    let name: String = prompt_until_valid(
        &format!("{}", "enter a name for the mirrored profile:".blue()),
        |input| validate_profile_name(input, &profiles),
    )?;

    mirror_profile(store, &name, None)
}

/// Asks whether the profile signs commits and with which key
fn prompt_signing_details() -> Result<(Option<String>, bool), AppError> {
    if Confirm::new("use a gpg signing key?")
        .with_default(false)
        .prompt()?
    {
        let key: String = prompt_until_valid(
            &format!("{}", "enter signing key:".blue()),
            |input| validate_signing_key(input),
        )?;
        let auto_sign = Confirm::new("sign every commit automatically?")
            .with_default(false)
            .prompt()?;
        Ok((Some(key), auto_sign))
    } else {
        Ok((None, false))
    }
}

/// Builds the option list for a profile selection prompt, with a reserved
/// back entry; returns `None` when the user backs out
fn select_profile_name(
    store: &ProfileStore,
    message: &str,
) -> Result<Option<String>, AppError> {
    let profiles = store.list()?;
    if profiles.is_empty() {
        println!("{}", "no profiles saved yet".yellow());
        return Ok(None);
    }

    let mut names: Vec<String> = profiles.iter().map(|profile| profile.name.clone()).collect();
    names.push(BACK_OPTION.to_string());

    let chosen: String = Select::new(&format!("{}", message.blue()), names).prompt()?;
    if chosen == BACK_OPTION {
        Ok(None)
    } else {
        Ok(Some(chosen))
    }
}

use colored::Colorize;
use inquire::Text;
use validator::ValidateEmail;

use crate::{
    BACK_OPTION,
    error::AppError,
    profile::{FIELD_DELIMITER, Profile},
};

/// Maximum length for a profile name
const MAX_PROFILE_NAME_LENGTH: usize = 30;
/// Maximum length for a Git user name
const MAX_USER_NAME_LENGTH: usize = 30;
/// Maximum length for a Git email address
const MAX_EMAIL_LENGTH: usize = 100;
/// Maximum length for a GPG signing key
const MAX_SIGNING_KEY_LENGTH: usize = 64;

/// Prompts the user for input until valid input is provided
pub fn prompt_until_valid<F>(prompt_message: &str, input_validation: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input: String = Text::new(prompt_message).prompt()?;
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::InvalidField(msg)) => println!("{}", msg.red()),
            Err(e) => return Err(e),
        }
    }
}

// Validate input helper functions

/// Validates a profile name against the store's naming rules and the
/// profiles already present
pub fn validate_profile_name(name: &str, existing: &[Profile]) -> Result<(), AppError> {
    if name.is_empty() {
        Err(AppError::InvalidField("profile name cannot be empty".to_string()))
    } else if name.len() > MAX_PROFILE_NAME_LENGTH {
        Err(AppError::InvalidField(format!(
            "profile name too long, max {MAX_PROFILE_NAME_LENGTH} characters"
        )))
    } else if name.contains(FIELD_DELIMITER) {
        Err(AppError::InvalidField("profile name cannot contain a comma".to_string()))
    } else if name == BACK_OPTION {
        Err(AppError::InvalidField(format!(
            "profile name cannot be '{BACK_OPTION}'"
        )))
    } else if existing.iter().any(|profile| profile.name == name) {
        Err(AppError::InvalidField(format!("profile '{name}' already exists")))
    } else {
        Ok(())
    }
}

/// Validates a Git user name input
pub fn validate_user_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        Err(AppError::InvalidField("user name cannot be empty".to_string()))
    } else if name.len() > MAX_USER_NAME_LENGTH {
        Err(AppError::InvalidField(format!(
            "user name too long, max {MAX_USER_NAME_LENGTH} characters"
        )))
    } else if name.contains(FIELD_DELIMITER) {
        Err(AppError::InvalidField("user name cannot contain a comma".to_string()))
    } else {
        Ok(())
    }
}

/// Validates an email input
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        Err(AppError::InvalidField("email cannot be empty".to_string()))
    } else if email.len() > MAX_EMAIL_LENGTH {
        Err(AppError::InvalidField(format!(
            "email too long, max {MAX_EMAIL_LENGTH} characters"
        )))
    } else if email.contains(FIELD_DELIMITER) {
        Err(AppError::InvalidField("email cannot contain a comma".to_string()))
    } else if !email.validate_email() {
        Err(AppError::InvalidField("invalid email format".to_string()))
    } else {
        Ok(())
    }
}

/// Validates a signing key input
pub fn validate_signing_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() {
        Err(AppError::InvalidField("signing key cannot be empty".to_string()))
    } else if key.len() > MAX_SIGNING_KEY_LENGTH {
        Err(AppError::InvalidField(format!(
            "signing key too long, max {MAX_SIGNING_KEY_LENGTH} characters"
        )))
    } else if key.contains(FIELD_DELIMITER) {
        Err(AppError::InvalidField("signing key cannot contain a comma".to_string()))
    } else {
        Ok(())
    }
}

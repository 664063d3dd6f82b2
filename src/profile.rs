use std::fmt;

use crate::error::AppError;

/// Field delimiter of the store's line format
pub const FIELD_DELIMITER: char = ',';
/// Token written in place of an absent signing key
const NO_SIGNING_KEY: &str = "none";
/// Name carried by the transient profile read back from git configuration
pub const CURRENT_PROFILE_NAME: &str = "current";

/// Represents a Git identity profile stored in the profiles file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Unique profile name
    pub name: String,
    /// Git user name (user.name)
    pub user_name: String,
    /// Git email address (user.email)
    pub user_email: String,
    /// GPG signing key (user.signingkey), if any
    pub signing_key: Option<String>,
    /// Whether every commit is signed automatically (commit.gpgsign)
    pub auto_sign: bool,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        user_name: impl Into<String>,
        user_email: impl Into<String>,
        signing_key: Option<String>,
        auto_sign: bool,
    ) -> Self {
        Self {
            name: name.into(),
            user_name: user_name.into(),
            user_email: user_email.into(),
            signing_key,
            auto_sign,
        }
    }

    /// Decodes one store line into a profile
    ///
    /// # Arguments
    /// * `line` - One non-comment line of the store file
    pub fn from_line(line: &str) -> Result<Self, AppError> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != 5 {
            return Err(AppError::CorruptStore(format!(
                "expected 5 fields, found {}",
                fields.len()
            )));
        }

        let signing_key = match fields[3] {
            NO_SIGNING_KEY => None,
            key => Some(key.to_string()),
        };

        // Only the exact "true" token is true; any other non-empty string
        // must not be treated as truthy.
        let auto_sign = match fields[4] {
            "true" => true,
            "false" => false,
            other => {
                return Err(AppError::CorruptStore(format!(
                    "invalid auto_sign token '{other}'"
                )));
            }
        };

        Ok(Self {
            name: fields[0].to_string(),
            user_name: fields[1].to_string(),
            user_email: fields[2].to_string(),
            signing_key,
            auto_sign,
        })
    }

    /// Encodes the profile as one store line, without trailing newline
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.name,
            self.user_name,
            self.user_email,
            self.signing_key.as_deref().unwrap_or(NO_SIGNING_KEY),
            self.auto_sign
        )
    }

    /// Checks whether two profiles carry the same identity, i.e. every
    /// field except the name matches
    pub fn equivalent(&self, other: &Self) -> bool {
        self.user_name == other.user_name
            && self.user_email == other.user_email
            && self.signing_key == other.signing_key
            && self.auto_sign == other.auto_sign
    }

    /// One-line summary of the profile fields, without its name
    pub fn summary(&self) -> String {
        match &self.signing_key {
            Some(key) => format!(
                "{}, {}, key {}, autosign {}",
                self.user_name,
                self.user_email,
                key,
                if self.auto_sign { "enabled" } else { "disabled" }
            ),
            None => format!("{}, {}, no signing key", self.user_name, self.user_email),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.summary())
    }
}

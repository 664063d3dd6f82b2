use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(name = "gitprof", version, about = "Manage and switch Git identity profiles")]
pub struct Cli {
    /// Subcommand chosen to execute; the interactive menu runs when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Applies a profile to the repository at PATH
    Switch {
        /// Name of the profile to apply
        profile_name: String,
        /// Repository working directory (default: current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Applies a profile to the user-wide git configuration
    Global {
        /// Name of the profile to apply
        profile_name: String,
    },
    /// Adds a new profile
    Add {
        /// Unique profile name
        profile_name: String,
        /// Git user name
        user_name: String,
        /// Git email
        user_email: String,
        /// GPG key used to sign commits
        #[arg(long)]
        signing_key: Option<String>,
        /// Sign every commit automatically (requires --signing-key)
        #[arg(long)]
        auto_sign: bool,
    },
    /// Deletes a profile
    Delete {
        /// Name of the profile to delete
        profile_name: String,
    },
    /// Saves the currently configured identity as a new profile
    Mirror {
        /// Name for the new profile
        profile_name: String,
        /// Repository to read from (default: current directory, falling
        /// back to the global configuration outside a repository)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Displays the currently configured identity
    Current {
        /// Repository to read from (default: current directory, falling
        /// back to the global configuration outside a repository)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Displays all stored profiles
    List,
}

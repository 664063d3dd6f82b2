use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use tempfile::NamedTempFile;

use crate::{error::AppError, profile::Profile};

/// Profiles dotfile in the user's home directory
const STORE_FILE: &str = ".gitprof";
/// Marker starting a comment line in the store file
const COMMENT_MARKER: char = '#';

/// Header block written when a new store file is created
const STORE_HEADER: &str = "\
# gitprof profile store
# One profile per line, five comma separated fields:
# name,user_name,user_email,signing_key,auto_sign
# A signing_key of \"none\" means the profile has no key
";

const LOCK_RETRIES: u32 = 50;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(20);

/// File-backed collection of profiles, addressable by name
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Opens the store at its default location, `~/.gitprof`
    pub fn open_default() -> Result<Self, AppError> {
        let home_dir: PathBuf = dirs::home_dir().ok_or_else(|| {
            AppError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "failed to find the home directory",
            ))
        })?;
        Ok(Self {
            path: home_dir.join(STORE_FILE),
        })
    }

    /// Opens a store backed by an arbitrary file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.path.exists()
    }

    /// Creates the backing file with its header block. Safe to call on an
    /// existing store: profile lines already present are left untouched.
    pub fn init(&self) -> Result<(), AppError> {
        let _lock = StoreLock::acquire(&self.path)?;
        if self.path.exists() {
            return Ok(());
        }
        fs::write(&self.path, STORE_HEADER)?;
        Ok(())
    }

    /// Returns every stored profile, sorted ascending by name
    pub fn list(&self) -> Result<Vec<Profile>, AppError> {
        let contents = fs::read_to_string(&self.path)?;

        let mut profiles = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if is_profile_line(line) {
                profiles.push(Profile::from_line(line).map_err(|e| corrupt_at(idx + 1, e))?);
            }
        }

        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    /// Returns the profile whose name matches exactly
    ///
    /// # Arguments
    /// * `name` - Profile name, compared case-sensitively
    pub fn find(&self, name: &str) -> Result<Profile, AppError> {
        self.list()?
            .into_iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| AppError::ProfileNotFound(name.to_string()))
    }

    /// Checks whether a profile with the given name is stored, swallowing
    /// only the not-found case
    pub fn contains(&self, name: &str) -> Result<bool, AppError> {
        match self.find(name) {
            Ok(_) => Ok(true),
            Err(AppError::ProfileNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Appends one profile line to the store
    ///
    /// Callers must have checked `contains` first: the store itself does not
    /// enforce name uniqueness.
    pub fn save(&self, profile: &Profile) -> Result<(), AppError> {
        let _lock = StoreLock::acquire(&self.path)?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", profile.to_line())?;
        Ok(())
    }

    /// Removes the profile with the given name, rewriting the file in place.
    /// Comment lines and the order of the remaining entries are preserved.
    /// Deleting an absent name is a no-op.
    pub fn delete(&self, name: &str) -> Result<(), AppError> {
        let _lock = StoreLock::acquire(&self.path)?;
        let contents = fs::read_to_string(&self.path)?;

        let dir = self.path.parent().unwrap_or(Path::new("."));
        let mut replacement = NamedTempFile::new_in(dir)?;
        for (idx, line) in contents.lines().enumerate() {
            if is_profile_line(line) {
                let profile = Profile::from_line(line).map_err(|e| corrupt_at(idx + 1, e))?;
                if profile.name == name {
                    continue;
                }
            }
            writeln!(replacement, "{line}")?;
        }

        replacement
            .persist(&self.path)
            .map_err(|e| AppError::Io(e.error))?;
        Ok(())
    }
}

fn is_profile_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with(COMMENT_MARKER)
}

fn corrupt_at(line: usize, err: AppError) -> AppError {
    match err {
        AppError::CorruptStore(reason) => {
            AppError::CorruptStore(format!("line {line}: {reason}"))
        }
        other => other,
    }
}

/// Advisory lock guarding a read-modify-write sequence on the store file,
/// held as a sibling `.lock` file for the lifetime of the guard
struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    fn acquire(store_path: &Path) -> Result<Self, AppError> {
        let mut lock_name = store_path.as_os_str().to_owned();
        lock_name.push(".lock");
        let path = PathBuf::from(lock_name);

        for _ in 0..LOCK_RETRIES {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(Self { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("store lock {} held by another process", path.display()),
        )))
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn sample(name: &str) -> Profile {
        Profile::new(name, "Jane Doe", "jane@example.com", None, false)
    }

    fn signer(name: &str) -> Profile {
        Profile::new(
            name,
            "Sig Ner",
            "sig@example.com",
            Some("1234567A".to_string()),
            true,
        )
    }

    #[test]
    fn init_writes_the_header_block() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents.lines().count(), 4);
        assert!(contents.lines().all(|line| line.starts_with('#')));
        assert_eq!(store.list().unwrap(), vec![]);
    }

    #[test]
    fn init_is_idempotent_on_an_existing_store() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();
        store.save(&sample("work")).unwrap();

        store.init().unwrap();
        assert_eq!(store.list().unwrap(), vec![sample("work")]);
    }

    #[test]
    fn save_then_find_round_trips_every_field() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();

        store.save(&sample("work")).unwrap();
        store.save(&signer("signed")).unwrap();

        assert_eq!(store.find("work").unwrap(), sample("work"));
        assert_eq!(store.find("signed").unwrap(), signer("signed"));
    }

    #[test]
    fn find_matches_names_case_sensitively() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();
        store.save(&sample("Work")).unwrap();

        assert!(matches!(
            store.find("work"),
            Err(AppError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn list_is_sorted_ascending_by_name() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();
        store.save(&sample("zulu")).unwrap();
        store.save(&sample("alpha")).unwrap();
        store.save(&sample("mike")).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn listing_a_missing_store_is_an_io_error() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("absent"));
        assert!(matches!(store.list(), Err(AppError::Io(_))));
    }

    #[test]
    fn contains_swallows_only_the_not_found_case() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();
        store.save(&sample("work")).unwrap();

        assert!(store.contains("work").unwrap());
        assert!(!store.contains("personal").unwrap());

        let missing = ProfileStore::at(dir.path().join("absent"));
        assert!(matches!(missing.contains("work"), Err(AppError::Io(_))));
    }

    #[test]
    fn duplicate_names_are_caught_by_the_caller_side_check() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();

        assert!(!store.contains("work").unwrap());
        store.save(&sample("work")).unwrap();
        // The second save never happens: the precondition check fails first.
        assert!(store.contains("work").unwrap());
    }

    #[test]
    fn delete_removes_only_the_named_profile() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();
        store.save(&sample("alpha")).unwrap();
        store.save(&signer("bravo")).unwrap();
        store.save(&sample("charlie")).unwrap();

        store.delete("bravo").unwrap();

        assert!(!store.contains("bravo").unwrap());
        assert_eq!(
            store.list().unwrap(),
            vec![sample("alpha"), sample("charlie")]
        );

        // Header comments and the order of the surviving lines are intact.
        let contents = fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        let header: Vec<&str> = STORE_HEADER.lines().collect();
        assert_eq!(lines[..4], header[..]);
        assert!(lines[4].starts_with("alpha,"));
        assert!(lines[5].starts_with("charlie,"));
    }

    #[test]
    fn delete_of_an_absent_name_is_a_noop() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();
        store.save(&sample("work")).unwrap();

        store.delete("personal").unwrap();
        assert_eq!(store.list().unwrap(), vec![sample("work")]);
    }

    #[test]
    fn malformed_line_fails_the_whole_read() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();
        store.save(&sample("work")).unwrap();

        let mut contents = fs::read_to_string(store.path()).unwrap();
        contents.push_str("broken,line\n");
        fs::write(store.path(), contents).unwrap();

        assert!(matches!(store.list(), Err(AppError::CorruptStore(_))));
    }

    #[test]
    fn empty_store_lists_an_empty_sequence() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles"));
        store.init().unwrap();
        assert_eq!(store.list().unwrap(), vec![]);
    }
}

use std::{env, fs, process::Command};

use tempfile::tempdir;

use gitprof::{
    add_profile, delete_profile, mirror_profile, set_global_profile, switch_profile,
    error::AppError,
    git::{Scope, apply_profile, git_available, is_inside_git_repo, read_current_profile},
    profile::{CURRENT_PROFILE_NAME, Profile},
    storage::ProfileStore,
};

// The whole scenario runs in one test so the git environment overrides are
// set once, before any git process is spawned.
#[test]
fn apply_and_read_back_scenarios() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let home = tempdir().unwrap();
    let repo = tempdir().unwrap();
    let plain = tempdir().unwrap();

    // Keep global-scope writes away from the real user configuration.
    unsafe {
        env::set_var("GIT_CONFIG_GLOBAL", home.path().join("gitconfig"));
        env::set_var("GIT_CONFIG_NOSYSTEM", "1");
    }

    let init = Command::new("git")
        .arg("-C")
        .arg(repo.path())
        .arg("init")
        .output()
        .unwrap();
    assert!(init.status.success());

    assert!(is_inside_git_repo(repo.path()).unwrap());
    assert!(!is_inside_git_repo(plain.path()).unwrap());

    let store = ProfileStore::at(home.path().join("profiles"));
    let repo_scope = Scope::Repository(repo.path().to_path_buf());

    let work = Profile::new("work", "Jane Doe", "jane@example.com", None, false);
    let signer = Profile::new(
        "signer",
        "Sig Ner",
        "sig@example.com",
        Some("ABC123DEF".to_string()),
        true,
    );
    add_profile(&store, work.clone()).unwrap();
    add_profile(&store, signer.clone()).unwrap();

    // A duplicate name is rejected before anything reaches the store.
    assert!(matches!(
        add_profile(&store, work.clone()),
        Err(AppError::DuplicateProfile(_))
    ));

    // Repository-scope switch requires a repository.
    assert!(matches!(
        switch_profile(&store, "work", Some(plain.path().to_path_buf())),
        Err(AppError::NotInGitRepository)
    ));

    // Keyless profile applied to a fresh repository reads back intact.
    switch_profile(&store, "work", Some(repo.path().to_path_buf())).unwrap();
    let current = read_current_profile(&repo_scope).unwrap();
    assert_eq!(current.name, CURRENT_PROFILE_NAME);
    assert_eq!(current.user_name, "Jane Doe");
    assert_eq!(current.user_email, "jane@example.com");
    assert_eq!(current.signing_key, None);
    assert!(!current.auto_sign);
    assert!(work.equivalent(&current));

    // A signing profile applied globally reads back with key and preference.
    set_global_profile(&store, "signer").unwrap();
    let global_now = read_current_profile(&Scope::Global).unwrap();
    assert_eq!(global_now.signing_key.as_deref(), Some("ABC123DEF"));
    assert!(global_now.auto_sign);

    // A keyless repository profile on top of the signing global one must
    // suppress both the key and the sign preference at repository scope.
    switch_profile(&store, "work", Some(repo.path().to_path_buf())).unwrap();
    let repo_now = read_current_profile(&repo_scope).unwrap();
    assert_eq!(repo_now.signing_key, None);
    assert!(!repo_now.auto_sign);

    // gpgsign stays written even when the preference is off.
    let signed_quiet = Profile::new(
        "squiet",
        "Jane Doe",
        "jane@example.com",
        Some("FEEDBEEF".to_string()),
        false,
    );
    apply_profile(&signed_quiet, &repo_scope).unwrap();
    assert_eq!(
        read_current_profile(&repo_scope).unwrap().signing_key.as_deref(),
        Some("FEEDBEEF")
    );
    let local_config = fs::read_to_string(repo.path().join(".git/config")).unwrap();
    assert!(local_config.contains("gpgsign = false"));

    // Switching back to the keyless profile leaves no stale key behind.
    apply_profile(&work, &repo_scope).unwrap();
    assert_eq!(read_current_profile(&repo_scope).unwrap().signing_key, None);

    // Mirroring the repository's identity creates an equivalent profile.
    mirror_profile(&store, "mirrored", Some(repo.path().to_path_buf())).unwrap();
    let mirrored = store.find("mirrored").unwrap();
    assert!(mirrored.equivalent(&work));

    delete_profile(&store, "mirrored").unwrap();
    assert!(!store.contains("mirrored").unwrap());
}

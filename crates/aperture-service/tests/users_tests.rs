use aperture_service::{AccessGuard, Config, Service};
use aperture_types::Error;

fn service() -> (Service, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: ":memory:".into(),
        media_root: dir.path().join("media"),
        token_secret: "test-secret".to_string(),
        token_ttl: chrono::Duration::hours(1),
    };
    (Service::new(&config).unwrap(), dir)
}

#[test]
fn test_login_creates_account_and_issues_token() {
    let (svc, _dir) = service();

    let session = svc.login("frida").unwrap();
    assert_eq!(session.user.username, "frida");
    assert!(!session.token.is_empty());

    // Logging in again returns the same account.
    let again = svc.login("frida").unwrap();
    assert_eq!(again.user.id, session.user.id);
}

#[test]
fn test_login_rejects_malformed_usernames() {
    let (svc, _dir) = service();

    assert!(matches!(svc.login("ab"), Err(Error::InvalidUsername)));
    assert!(matches!(
        svc.login("not valid"),
        Err(Error::InvalidUsername)
    ));
    assert!(matches!(
        svc.login("abcdefghijklmnopq"),
        Err(Error::InvalidUsername)
    ));
}

#[test]
fn test_concurrent_logins_share_one_account() {
    let (svc, _dir) = service();
    let barrier = std::sync::Barrier::new(2);

    let sessions = std::thread::scope(|s| {
        let handles = [
            s.spawn(|| {
                barrier.wait();
                svc.login("frida")
            }),
            s.spawn(|| {
                barrier.wait();
                svc.login("frida")
            }),
        ];
        handles.map(|h| h.join().unwrap())
    });

    // Losing the creation race must not fail the login.
    let [a, b] = sessions.map(|r| r.unwrap());
    assert_eq!(a.user.id, b.user.id);
    assert_eq!(a.user.username, "frida");
}

#[test]
fn test_user_lookup_by_username() {
    let (svc, _dir) = service();
    let session = svc.login("frida").unwrap();

    let user = svc.user_by_username("frida").unwrap();
    assert_eq!(user, session.user);
    assert!(matches!(
        svc.user_by_username("nobody"),
        Err(Error::UserNotFound)
    ));
}

#[test]
fn test_rename_requires_the_owners_credential() {
    let (svc, _dir) = service();
    let alice = svc.login("alice").unwrap();
    let bob = svc.login("bobby").unwrap();

    assert!(matches!(
        svc.rename_user(&alice.token, bob.user.id, "hijack"),
        Err(Error::InvalidCredential)
    ));

    svc.rename_user(&alice.token, alice.user.id, "alicia").unwrap();
    assert_eq!(svc.user_by_username("alicia").unwrap().id, alice.user.id);
    assert!(matches!(
        svc.user_by_username("alice"),
        Err(Error::UserNotFound)
    ));
}

#[test]
fn test_rename_to_taken_or_invalid_name_fails() {
    let (svc, _dir) = service();
    let alice = svc.login("alice").unwrap();
    svc.login("bobby").unwrap();

    assert!(matches!(
        svc.rename_user(&alice.token, alice.user.id, "bobby"),
        Err(Error::UsernameTaken)
    ));
    assert!(matches!(
        svc.rename_user(&alice.token, alice.user.id, "no"),
        Err(Error::InvalidUsername)
    ));
    // The failed renames left the original name in place.
    assert_eq!(svc.user_by_username("alice").unwrap().id, alice.user.id);
}

#[test]
fn test_foreign_tokens_are_rejected() {
    let (svc, _dir) = service();
    let alice = svc.login("alice").unwrap();

    let forged = AccessGuard::new("not-the-secret", chrono::Duration::hours(1))
        .issue(alice.user.id)
        .unwrap();
    assert!(matches!(
        svc.rename_user(&forged, alice.user.id, "alicia"),
        Err(Error::InvalidCredential)
    ));
    assert!(matches!(
        svc.rename_user("42", alice.user.id, "alicia"),
        Err(Error::InvalidCredential)
    ));
}

#[test]
fn test_ping() {
    let (svc, _dir) = service();
    svc.ping().unwrap();
}

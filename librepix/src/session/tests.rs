use super::*;
use crate::credentials::MISSING_CREDENTIALS;
use crate::status::StatusLevel;

fn complete_form() -> CredentialForm {
    CredentialForm::new("ghp_test", "octocat", "pictures", "images/")
}

#[test]
fn test_new_session_is_empty() {
    let session = Session::new(complete_form());
    assert!(session.credentials().is_none());
    assert!(session.pending().is_none());
    assert!(session.files().is_empty());
    assert_eq!(session.listing(), &ListingView::Loading);
    assert!(session.preview().is_none());
    assert_eq!(session.file_name(), "");
}

#[test]
fn test_validate_credentials_caches_normalized_folder() {
    let mut session = Session::new(complete_form());
    assert!(session.validate_credentials());
    assert_eq!(session.credentials().unwrap().folder(), "images");
}

#[test]
fn test_validate_credentials_failure_posts_error() {
    let mut session = Session::new(CredentialForm::new("", "octocat", "pictures", ""));
    assert!(!session.validate_credentials());
    assert!(session.credentials().is_none());

    let status = session.status().latest().unwrap();
    assert_eq!(status.level, StatusLevel::Error);
    assert_eq!(status.text, MISSING_CREDENTIALS);
}

#[test]
fn test_revalidation_picks_up_form_changes() {
    let mut session = Session::new(complete_form());
    assert!(session.validate_credentials());

    session.form_mut().token = "  ".to_string();
    assert!(!session.validate_credentials());
    assert!(session.credentials().is_none());
}

#[test]
fn test_select_file_fills_file_name_and_replaces_pending() {
    let mut session = Session::new(complete_form());
    session.select_file(PendingFile::from_bytes("cat.png", b"1"));
    session.select_file(PendingFile::from_bytes("dog.png", b"22"));

    assert_eq!(session.file_name(), "dog.png");
    assert_eq!(session.pending().unwrap().display_name(), "dog.png");
    assert_eq!(
        session.status().latest().unwrap().text,
        "File selected: dog.png"
    );
}

#[test]
fn test_renaming_keeps_pending_file() {
    let mut session = Session::new(complete_form());
    session.select_file(PendingFile::from_bytes("cat.png", b"1"));
    session.set_file_name("kitten.png");

    assert_eq!(session.file_name(), "kitten.png");
    assert_eq!(session.pending().unwrap().display_name(), "cat.png");
}

#[test]
fn test_clear_pending_resets_file_name() {
    let mut session = Session::new(complete_form());
    session.select_file(PendingFile::from_bytes("cat.png", b"1"));
    session.clear_pending();

    assert!(session.pending().is_none());
    assert_eq!(session.file_name(), "");
}

#[test]
fn test_find_file_by_name() {
    let mut session = Session::new(complete_form());
    let entry = RemoteFileEntry {
        name: "cat.png".to_string(),
        path: "images/cat.png".to_string(),
        size: 10,
        download_url: None,
        sha: "abc".to_string(),
    };
    session.set_listing(ListingView::Empty, vec![entry.clone()]);

    assert_eq!(session.find_file("cat.png"), Some(&entry));
    assert!(session.find_file("dog.png").is_none());
}

#[test]
fn test_replace_preview_releases_previous_file() {
    let mut session = Session::new(complete_form());
    let first = session
        .replace_preview(Preview::create("a.png", b"a").unwrap())
        .path()
        .to_path_buf();
    session.replace_preview(Preview::create("b.png", b"b").unwrap());

    assert!(!first.exists());
    assert_eq!(session.preview().unwrap().file_name(), "b.png");
}

#[test]
fn test_dropping_session_releases_preview() {
    let mut session = Session::new(complete_form());
    let path = session
        .replace_preview(Preview::create("a.png", b"a").unwrap())
        .path()
        .to_path_buf();

    drop(session);
    assert!(!path.exists());
}

#[test]
fn test_closure_confirms() {
    let mut asked = Vec::new();
    let mut confirm = |prompt: &str| {
        asked.push(prompt.to_string());
        true
    };
    assert!(Confirm::confirm(&mut confirm, "Delete?"));
    assert_eq!(asked, vec!["Delete?".to_string()]);
}

#[test]
fn test_status_ttl_is_configurable() {
    let session = Session::new(complete_form()).with_status_ttl(Duration::from_secs(1));
    assert_eq!(session.status().ttl(), Duration::from_secs(1));
}

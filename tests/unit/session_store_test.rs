use gove::managers::session_store::{BookmarkOutcome, SessionState, SessionStoreTrait};
use gove::types::download::{Download, DownloadId, DownloadState};

fn completed(url: &str) -> Download {
    Download {
        id: DownloadId::new(),
        source_url: url.to_string(),
        file_name: "file.bin".to_string(),
        path: None,
        progress_percent: 100,
        state: DownloadState::Completed,
    }
}

#[test]
fn test_new_session_is_empty() {
    let session = SessionState::new();
    assert!(session.history().is_empty());
    assert!(session.bookmarks().is_empty());
    assert!(session.downloads().is_empty());
    assert!(!session.private_mode_active());
}

#[test]
fn test_history_keeps_order_and_duplicates() {
    let mut session = SessionState::new();
    session.record_visit("https://a.test/");
    session.record_visit("https://b.test/");
    session.record_visit("https://a.test/");

    assert_eq!(
        session.history(),
        ["https://a.test/", "https://b.test/", "https://a.test/"]
    );
}

#[test]
fn test_bookmark_is_deduplicated() {
    let mut session = SessionState::new();

    assert_eq!(session.add_bookmark("https://a.test/"), BookmarkOutcome::Added);
    assert_eq!(
        session.add_bookmark("https://a.test/"),
        BookmarkOutcome::AlreadyBookmarked
    );
    assert_eq!(session.bookmarks(), ["https://a.test/"]);
}

#[test]
fn test_bookmarks_keep_insertion_order() {
    let mut session = SessionState::new();
    session.add_bookmark("https://c.test/");
    session.add_bookmark("https://a.test/");
    session.add_bookmark("https://b.test/");

    assert_eq!(
        session.bookmarks(),
        ["https://c.test/", "https://a.test/", "https://b.test/"]
    );
}

#[test]
fn test_bookmark_outcome_messages() {
    assert!(BookmarkOutcome::Added.is_new());
    assert!(!BookmarkOutcome::AlreadyBookmarked.is_new());
    assert_eq!(
        BookmarkOutcome::Added.message("https://a.test/"),
        "Bookmarked: https://a.test/"
    );
    assert_eq!(
        BookmarkOutcome::AlreadyBookmarked.message("https://a.test/"),
        "URL already bookmarked"
    );
}

#[test]
fn test_record_download_appends() {
    let mut session = SessionState::new();
    let first = completed("https://a.test/one.zip");
    let second = completed("https://a.test/two.zip");

    session.record_download(first.clone());
    session.record_download(second.clone());

    assert_eq!(session.downloads(), [first, second]);
}

#[test]
fn test_private_mode_flag() {
    let mut session = SessionState::new();
    session.set_private_mode(true);
    assert!(session.private_mode_active());
    session.set_private_mode(false);
    assert!(!session.private_mode_active());
}

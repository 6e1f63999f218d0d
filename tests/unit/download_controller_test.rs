//! Download state machine: progress clamping, terminal states and the
//! open-folder check against the filesystem.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gove::engine::{DownloadHandle, DownloadRequest};
use gove::managers::download_controller::{DownloadController, DownloadControllerTrait};
use gove::types::download::{DownloadId, DownloadState};
use gove::types::errors::DownloadError;
use rstest::rstest;
use tempfile::TempDir;

struct FlagHandle(Arc<AtomicBool>);

impl DownloadHandle for FlagHandle {
    fn cancel(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn start(
    controller: &mut DownloadController,
    url: &str,
    path: Option<PathBuf>,
) -> (DownloadId, Arc<AtomicBool>) {
    let flag = Arc::new(AtomicBool::new(false));
    let id = controller.begin(DownloadRequest {
        id: DownloadId::new(),
        source_url: url.to_string(),
        path,
        handle: Box::new(FlagHandle(flag.clone())),
    });
    (id, flag)
}

#[test]
fn test_begin_tracks_in_progress_download() {
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/files/report.pdf", None);

    let download = controller.get(id).unwrap();
    assert_eq!(download.file_name, "report.pdf");
    assert_eq!(download.source_url, "https://a.test/files/report.pdf");
    assert_eq!(download.progress_percent, 0);
    assert_eq!(download.state, DownloadState::InProgress);
    assert_eq!(controller.list().len(), 1);
}

#[rstest]
#[case(-20, 0)]
#[case(0, 0)]
#[case(42, 42)]
#[case(100, 100)]
#[case(250, 100)]
fn test_progress_is_clamped(#[case] reported: i32, #[case] expected: u8) {
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/f", None);

    assert_eq!(controller.on_progress(id, reported), Ok(expected));
    assert_eq!(controller.get(id).unwrap().progress_percent, expected);
}

#[test]
fn test_finish_completes_at_full_progress() {
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/f", None);
    controller.on_progress(id, 30).unwrap();

    assert_eq!(controller.on_finished(id), Ok(Some(DownloadState::Completed)));
    let download = controller.get(id).unwrap();
    assert_eq!(download.progress_percent, 100);
    assert_eq!(download.state, DownloadState::Completed);
}

#[test]
fn test_cancel_beats_late_finish() {
    let mut controller = DownloadController::new();
    let (id, flag) = start(&mut controller, "https://a.test/f", None);

    assert_eq!(controller.cancel(id), Ok(Some(DownloadState::Cancelled)));
    assert!(flag.load(Ordering::SeqCst), "engine handle must be told to cancel");

    assert_eq!(controller.on_finished(id), Ok(None));
    assert_eq!(controller.get(id).unwrap().state, DownloadState::Cancelled);
}

#[test]
fn test_cancel_is_idempotent() {
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/f", None);

    controller.cancel(id).unwrap();
    assert_eq!(controller.cancel(id), Ok(None));
}

#[test]
fn test_cancel_after_completion_does_nothing() {
    let mut controller = DownloadController::new();
    let (id, flag) = start(&mut controller, "https://a.test/f", None);
    controller.on_finished(id).unwrap();

    assert_eq!(controller.cancel(id), Ok(None));
    assert!(!flag.load(Ordering::SeqCst));
    assert_eq!(controller.get(id).unwrap().state, DownloadState::Completed);
}

#[test]
fn test_failure_records_reason_once() {
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/f", None);

    assert_eq!(
        controller.on_failed(id, "network error"),
        Ok(Some(DownloadState::Failed("network error".to_string())))
    );
    assert_eq!(controller.on_finished(id), Ok(None));
    assert_eq!(controller.on_failed(id, "again"), Ok(None));
    assert_eq!(
        controller.get(id).unwrap().state,
        DownloadState::Failed("network error".to_string())
    );
}

#[test]
fn test_progress_after_terminal_state_is_rejected() {
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/f", None);
    controller.cancel(id).unwrap();

    assert_eq!(
        controller.on_progress(id, 50),
        Err(DownloadError::NotInProgress(id))
    );
}

#[test]
fn test_unknown_download_is_not_found() {
    let mut controller = DownloadController::new();
    let id = DownloadId::new();

    assert_eq!(controller.cancel(id), Err(DownloadError::NotFound(id)));
    assert_eq!(controller.on_finished(id), Err(DownloadError::NotFound(id)));
    assert_eq!(controller.on_progress(id, 5), Err(DownloadError::NotFound(id)));
    assert_eq!(controller.download_folder(id), Err(DownloadError::NotFound(id)));
    assert!(controller.get(id).is_none());
}

#[test]
fn test_download_folder_is_parent_of_existing_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("report.pdf");
    std::fs::write(&file, b"%PDF").unwrap();
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/report.pdf", Some(file));
    controller.on_finished(id).unwrap();

    assert_eq!(controller.download_folder(id), Ok(dir.path().to_path_buf()));
}

#[test]
fn test_download_folder_reports_deleted_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("gone.zip");
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/gone.zip", Some(file.clone()));
    controller.on_finished(id).unwrap();

    assert_eq!(
        controller.download_folder(id),
        Err(DownloadError::FileMissing(file.display().to_string()))
    );
}

#[test]
fn test_download_folder_without_path_is_missing() {
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/nowhere.bin", None);

    assert!(matches!(
        controller.download_folder(id),
        Err(DownloadError::FileMissing(_))
    ));
}

#[rstest]
#[case(0, "f.bin [--------------------] 0%")]
#[case(50, "f.bin [##########----------] 50%")]
#[case(100, "f.bin [####################] 100%")]
fn test_progress_label_fills_with_percent(#[case] percent: i32, #[case] label: &str) {
    let mut controller = DownloadController::new();
    let (id, _) = start(&mut controller, "https://a.test/f.bin", None);
    controller.on_progress(id, percent).unwrap();

    assert_eq!(controller.get(id).unwrap().progress_label(), label);
}

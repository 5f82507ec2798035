//! Integration tests for document retrieval against a stub backend

mod support;

use std::sync::Arc;

use chartfile::app::bulk;
use chartfile::app::client::DocumentsClient;
use chartfile::app::models::{Document, DocumentId, PatientId};
use chartfile::errors::DownloadError;
use chrono::Utc;

use support::StubServer;

fn doc(id: &str, file_name: &str) -> Document {
    Document {
        id: DocumentId::new(id),
        file_name: file_name.to_string(),
        file_path: format!("/media/documents/{file_name}"),
        patient_id: PatientId::new("42"),
        uploaded_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_download_saves_under_display_name() {
    let server = StubServer::start(Arc::new(|req: &support::RecordedRequest| {
        assert_eq!(req.method, "GET");
        (200, "file content here".to_string())
    }))
    .await;

    let client = DocumentsClient::new(&server.base_url()).expect("client");
    let dir = tempfile::tempdir().expect("tempdir");

    let path = client
        .download_document(&doc("doc-1", "scan.png"), dir.path(), false)
        .await
        .expect("download should succeed");

    assert_eq!(path, dir.path().join("scan.png"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "file content here");
    assert_eq!(server.hits()[0].target, "/media/documents/scan.png");
    // No temp file left behind
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_force_overwrites_existing_file() {
    let server = StubServer::start(Arc::new(|_: &support::RecordedRequest| {
        (200, "new content".to_string())
    }))
    .await;

    let client = DocumentsClient::new(&server.base_url()).expect("client");
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("scan.png"), "old content").unwrap();

    let document = doc("doc-1", "scan.png");
    let without_force = client
        .download_document(&document, dir.path(), false)
        .await;
    assert!(matches!(without_force, Err(DownloadError::FileExists { .. })));

    client
        .download_document(&document, dir.path(), true)
        .await
        .expect("forced download should succeed");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("scan.png")).unwrap(),
        "new content"
    );
}

#[tokio::test]
async fn test_server_error_leaves_no_file() {
    let server = StubServer::start(Arc::new(|_: &support::RecordedRequest| {
        (404, String::new())
    }))
    .await;

    let client = DocumentsClient::new(&server.base_url()).expect("client");
    let dir = tempfile::tempdir().expect("tempdir");

    let result = client
        .download_document(&doc("doc-1", "scan.png"), dir.path(), false)
        .await;
    assert!(matches!(
        result,
        Err(DownloadError::ServerError { status: 404 })
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_bulk_download_fetches_every_document() {
    let server = StubServer::start(Arc::new(|req: &support::RecordedRequest| {
        (200, format!("content for {}", req.target))
    }))
    .await;

    let client = Arc::new(DocumentsClient::new(&server.base_url()).expect("client"));
    let dir = tempfile::tempdir().expect("tempdir");

    let documents = vec![
        doc("doc-1", "one.pdf"),
        doc("doc-2", "two.pdf"),
        doc("doc-3", "three.pdf"),
    ];
    let handles = bulk::bulk_download(client, documents, dir.path().to_path_buf(), false);
    assert_eq!(handles.len(), 3);
    for handle in handles {
        handle.await.expect("download task should not panic");
    }

    for name in ["one.pdf", "two.pdf", "three.pdf"] {
        assert!(dir.path().join(name).exists(), "missing {name}");
    }
    assert_eq!(server.hits().len(), 3);
}

#[tokio::test]
async fn test_bulk_download_failures_do_not_affect_others() {
    let server = StubServer::start(Arc::new(|req: &support::RecordedRequest| {
        if req.target.ends_with("two.pdf") {
            (500, String::new())
        } else {
            (200, "ok".to_string())
        }
    }))
    .await;

    let client = Arc::new(DocumentsClient::new(&server.base_url()).expect("client"));
    let dir = tempfile::tempdir().expect("tempdir");

    let documents = vec![doc("doc-1", "one.pdf"), doc("doc-2", "two.pdf"), doc("doc-3", "three.pdf")];
    for handle in bulk::bulk_download(client, documents, dir.path().to_path_buf(), false) {
        handle.await.expect("task should not panic");
    }

    assert!(dir.path().join("one.pdf").exists());
    assert!(!dir.path().join("two.pdf").exists());
    assert!(dir.path().join("three.pdf").exists());
}

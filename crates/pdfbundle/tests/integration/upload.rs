//! Integration tests for archive upload and candidate discovery.

use pdfbundle::error::PdfBundleError;
use pdfbundle::ingest::FileKind;
use pdfbundle::session::SessionContext;

use crate::common::{Harness, pdf_with_widths, png, zip_of};

#[tokio::test]
async fn test_upload_extracts_into_folder_named_before_first_dot() {
    let harness = Harness::new();
    let zip = zip_of(&[("doc.pdf", pdf_with_widths(&[612]))]);

    let (ctx, folder) = harness
        .upload(&SessionContext::new(), zip, "report.v2.zip")
        .await;

    let session_id = ctx.session_id.clone().expect("session assigned");
    assert_eq!(
        folder.as_str(),
        format!("uploaded_files/{session_id}/report")
    );
    assert!(harness.path_of(folder.as_str()).join("doc.pdf").is_file());
}

#[tokio::test]
async fn test_nested_candidates_are_found_case_insensitively() {
    let harness = Harness::new();
    let zip = zip_of(&[
        ("scans/", Vec::new()),
        ("scans/page1.PDF", pdf_with_widths(&[612])),
        ("scans/deep/photo.Png", png(4, 4)),
        ("notes.txt", b"not a candidate".to_vec()),
        ("photo.jpg", b"jpeg bytes".to_vec()),
    ]);

    let (ctx, folder) = harness.upload(&SessionContext::new(), zip, "bundle.zip").await;

    let mut names: Vec<_> = ctx.candidates.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["page1.PDF", "photo.Png"]);
    assert!(ctx.candidates.iter().all(|c| c.key.starts_with(&folder)));

    let photo = ctx.candidates.iter().find(|c| c.name == "photo.Png").unwrap();
    assert_eq!(photo.kind, FileKind::Image);
    assert_eq!(photo.key.as_str(), format!("{folder}/scans/deep/photo.Png"));

    // Non-candidates are still extracted.
    assert!(harness.path_of(folder.as_str()).join("notes.txt").is_file());
}

#[tokio::test]
async fn test_reupload_overwrites_and_keeps_candidates_unique() {
    let harness = Harness::new();
    let first = zip_of(&[("a.pdf", pdf_with_widths(&[100]))]);
    let second = zip_of(&[
        ("a.pdf", pdf_with_widths(&[200])),
        ("b.png", png(2, 2)),
    ]);

    let (ctx, folder) = harness.upload(&SessionContext::new(), first, "data.zip").await;
    let (ctx, again) = harness.upload(&ctx, second, "data.zip").await;

    assert_eq!(folder, again);
    assert_eq!(ctx.candidates.len(), 2);

    let stored = std::fs::read(harness.path_of(folder.as_str()).join("a.pdf")).unwrap();
    assert_eq!(stored, pdf_with_widths(&[200]));
}

#[tokio::test]
async fn test_invalid_archive_stores_nothing() {
    let harness = Harness::new();
    let ctx = SessionContext::new();

    let result = harness
        .app
        .upload_archive(&ctx, b"PK but not really".to_vec(), "broken.zip")
        .await;

    assert!(matches!(result, Err(PdfBundleError::InvalidArchive { .. })));
    let stored_files = walkdir::WalkDir::new(harness.dir.path())
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count();
    assert_eq!(stored_files, 0);
}

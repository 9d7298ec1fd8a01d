//! Integration tests for session isolation and the shared artifact namespace.

use pdfbundle::error::PdfBundleError;
use pdfbundle::session::SessionContext;

use crate::common::{Harness, page_widths, pdf_with_widths, zip_of};

#[tokio::test]
async fn test_sessions_do_not_see_each_other() {
    let harness = Harness::new();
    let other_app = harness.second_app();

    let (alice, _) = harness
        .upload(
            &SessionContext::new(),
            zip_of(&[("a.pdf", pdf_with_widths(&[100]))]),
            "same.zip",
        )
        .await;
    let (bob, _) = other_app
        .upload_archive(
            &SessionContext::new(),
            zip_of(&[("b.pdf", pdf_with_widths(&[200]))]),
            "same.zip",
        )
        .await
        .unwrap();

    assert_ne!(alice.session_id, bob.session_id);
    assert_eq!(alice.candidates.len(), 1);
    assert_eq!(bob.candidates.len(), 1);

    // A session cannot select or delete another session's file.
    let foreign = bob.candidates[0].key.clone();
    assert!(matches!(
        harness.app.select_files(&alice, std::slice::from_ref(&foreign)),
        Err(PdfBundleError::UnknownSelection { .. })
    ));
    assert!(matches!(
        harness.app.request_delete_file(&alice, &foreign).await,
        Err(PdfBundleError::NotFound { .. })
    ));
    assert!(harness.path_of(foreign.as_str()).exists());
}

#[tokio::test]
async fn test_artifacts_are_shared_across_sessions() {
    let harness = Harness::new();
    let other_app = harness.second_app();

    let (ctx, _) = harness
        .upload(
            &SessionContext::new(),
            zip_of(&[("a.pdf", pdf_with_widths(&[321]))]),
            "a.zip",
        )
        .await;
    let ctx = harness.select_names(&ctx, &["a.pdf"]);
    harness.app.request_merge(&ctx, "shared.pdf").await.unwrap();

    let (_, effect) = other_app
        .open_artifact(&SessionContext::new(), "shared.pdf")
        .await
        .unwrap();
    let pdfbundle::app::Effect::Download { bytes, .. } = effect else {
        panic!("expected a download");
    };
    assert_eq!(page_widths(&bytes), vec![321.0]);
}

#[tokio::test]
async fn test_uploads_accumulate_candidates_within_session() {
    let harness = Harness::new();

    let (ctx, first) = harness
        .upload(
            &SessionContext::new(),
            zip_of(&[("a.pdf", pdf_with_widths(&[100]))]),
            "first.zip",
        )
        .await;
    let (ctx, second) = harness
        .upload(
            &ctx,
            zip_of(&[("b.pdf", pdf_with_widths(&[200]))]),
            "second.zip",
        )
        .await;

    assert_ne!(first, second);
    assert_eq!(first.parent(), second.parent());
    assert_eq!(ctx.candidates.len(), 2);

    let ctx = harness.select_names(&ctx, &["b.pdf", "a.pdf"]);
    harness.app.request_merge(&ctx, "both.pdf").await.unwrap();
    let bytes = std::fs::read(harness.path_of("combined_pdfs/both.pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![200.0, 100.0]);
}

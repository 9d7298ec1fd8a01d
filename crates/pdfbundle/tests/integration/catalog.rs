//! Integration tests for listing, downloading and deleting stored files.

use pdfbundle::app::Effect;
use pdfbundle::error::PdfBundleError;
use pdfbundle::session::SessionContext;

use crate::common::{Harness, pdf_with_widths, zip_of};

#[tokio::test]
async fn test_artifacts_are_listed_and_downloadable() {
    let harness = Harness::new();
    let zip = zip_of(&[("a.pdf", pdf_with_widths(&[100]))]);
    let (ctx, _) = harness.upload(&SessionContext::new(), zip, "a.zip").await;
    let ctx = harness.select_names(&ctx, &["a.pdf"]);

    for name in ["zeta.pdf", "alpha.pdf"] {
        harness.app.request_merge(&ctx, name).await.unwrap();
    }

    let (_, effect) = harness.app.list_artifacts(&ctx).await.unwrap();
    let Effect::Artifacts { artifacts } = effect else {
        panic!("expected artifacts");
    };
    let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["alpha.pdf", "zeta.pdf"]);
    assert!(artifacts.iter().all(|a| a.size > 0));

    let (_, effect) = harness.app.open_artifact(&ctx, "alpha.pdf").await.unwrap();
    let Effect::Download { bytes, .. } = effect else {
        panic!("expected a download");
    };
    assert_eq!(
        bytes,
        std::fs::read(harness.path_of("combined_pdfs/alpha.pdf")).unwrap()
    );
}

#[tokio::test]
async fn test_download_missing_artifact_is_not_found() {
    let harness = Harness::new();
    let result = harness
        .app
        .open_artifact(&SessionContext::new(), "missing.pdf")
        .await;
    assert!(matches!(result, Err(PdfBundleError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_removes_file_and_candidate() {
    let harness = Harness::new();
    let zip = zip_of(&[
        ("a.pdf", pdf_with_widths(&[100])),
        ("b.pdf", pdf_with_widths(&[200])),
    ]);
    let (ctx, _) = harness.upload(&SessionContext::new(), zip, "pair.zip").await;
    let ctx = harness.select_names(&ctx, &["a.pdf", "b.pdf"]);
    let target = ctx
        .candidates
        .iter()
        .find(|c| c.name == "a.pdf")
        .unwrap()
        .key
        .clone();

    let (ctx, effect) = harness.app.request_delete_file(&ctx, &target).await.unwrap();
    assert!(matches!(effect, Effect::Deleted { ref key } if *key == target));
    assert!(!harness.path_of(target.as_str()).exists());
    assert!(ctx.candidates.iter().all(|c| c.key != target));
    assert!(ctx.selection.iter().all(|c| c.key != target));

    let again = harness.app.request_delete_file(&ctx, &target).await;
    assert!(matches!(again, Err(PdfBundleError::NotFound { .. })));
}

#[tokio::test]
async fn test_session_files_listing_is_flat() {
    let harness = Harness::new();
    let zip = zip_of(&[("nested/a.pdf", pdf_with_widths(&[100]))]);
    let (ctx, _) = harness.upload(&SessionContext::new(), zip, "a.zip").await;

    let (_, effect) = harness.app.list_session_files(&ctx).await.unwrap();
    let Effect::SessionFiles { namespace, files } = effect else {
        panic!("expected session files");
    };
    assert_eq!(
        namespace.as_str(),
        format!("uploaded_files/{}", ctx.session_id.unwrap())
    );
    assert!(files.is_empty());
}

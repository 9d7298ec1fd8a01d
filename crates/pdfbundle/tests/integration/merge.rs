//! Integration tests for merging selections into artifacts.

use pdfbundle::app::Effect;
use pdfbundle::error::PdfBundleError;
use pdfbundle::session::SessionContext;
use rstest::rstest;

use crate::common::{Harness, page_widths, pdf_with_widths, png, zip_of};

#[tokio::test]
async fn test_image_and_pdf_merge_in_selection_order() {
    let harness = Harness::new();
    let zip = zip_of(&[
        ("doc.pdf", pdf_with_widths(&[300, 400])),
        ("pic.png", png(50, 80)),
    ]);
    let (ctx, _) = harness.upload(&SessionContext::new(), zip, "mixed.zip").await;
    let ctx = harness.select_names(&ctx, &["pic.png", "doc.pdf"]);

    let (_, effect) = harness.app.request_merge(&ctx, "combined.pdf").await.unwrap();
    let Effect::Merged { result } = effect else {
        panic!("expected a merge");
    };

    assert_eq!(result.artifact.key.as_str(), "combined_pdfs/combined.pdf");
    assert_eq!(result.statistics.total_pages, 3);
    assert_eq!(result.statistics.image_inputs, 1);
    assert_eq!(result.statistics.pdf_inputs, 1);

    let bytes = std::fs::read(harness.path_of("combined_pdfs/combined.pdf")).unwrap();
    assert_eq!(bytes.len() as u64, result.artifact.size);
    assert_eq!(page_widths(&bytes), vec![50.0, 300.0, 400.0]);
}

#[tokio::test]
async fn test_duplicate_selection_repeats_pages() {
    let harness = Harness::new();
    let zip = zip_of(&[("one.pdf", pdf_with_widths(&[111]))]);
    let (ctx, _) = harness.upload(&SessionContext::new(), zip, "dup.zip").await;
    let ctx = harness.select_names(&ctx, &["one.pdf", "one.pdf"]);

    harness.app.request_merge(&ctx, "twice.pdf").await.unwrap();

    let bytes = std::fs::read(harness.path_of("combined_pdfs/twice.pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![111.0, 111.0]);
}

#[tokio::test]
async fn test_merge_with_same_name_overwrites() {
    let harness = Harness::new();
    let zip = zip_of(&[
        ("a.pdf", pdf_with_widths(&[100])),
        ("b.pdf", pdf_with_widths(&[200, 210])),
    ]);
    let (ctx, _) = harness.upload(&SessionContext::new(), zip, "set.zip").await;

    let first = harness.select_names(&ctx, &["a.pdf"]);
    harness.app.request_merge(&first, "out.pdf").await.unwrap();
    let second = harness.select_names(&ctx, &["b.pdf"]);
    harness.app.request_merge(&second, "out.pdf").await.unwrap();

    let bytes = std::fs::read(harness.path_of("combined_pdfs/out.pdf")).unwrap();
    assert_eq!(page_widths(&bytes), vec![200.0, 210.0]);
}

#[tokio::test]
async fn test_failed_merge_leaves_existing_artifact_untouched() {
    let harness = Harness::new();
    let zip = zip_of(&[
        ("good.pdf", pdf_with_widths(&[100])),
        ("broken.pdf", b"not a pdf".to_vec()),
    ]);
    let (ctx, _) = harness.upload(&SessionContext::new(), zip, "mix.zip").await;

    let good = harness.select_names(&ctx, &["good.pdf"]);
    harness.app.request_merge(&good, "final.pdf").await.unwrap();
    let before = std::fs::read(harness.path_of("combined_pdfs/final.pdf")).unwrap();

    let bad = harness.select_names(&ctx, &["good.pdf", "broken.pdf"]);
    let result = harness.app.request_merge(&bad, "final.pdf").await;
    assert!(matches!(result, Err(PdfBundleError::UnreadablePdf { .. })));

    let after = std::fs::read(harness.path_of("combined_pdfs/final.pdf")).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_merge_without_selection_publishes_nothing() {
    let harness = Harness::new();

    let result = harness
        .app
        .request_merge(&SessionContext::new(), "empty.pdf")
        .await;

    assert!(matches!(result, Err(PdfBundleError::NoFilesToMerge)));
    assert!(!harness.path_of("combined_pdfs/empty.pdf").exists());
}

#[rstest]
#[case("../escape.pdf")]
#[case("nested/out.pdf")]
#[case("..")]
#[case("")]
#[tokio::test]
async fn test_output_name_cannot_escape_namespace(#[case] name: &str) {
    let harness = Harness::new();
    let zip = zip_of(&[("a.pdf", pdf_with_widths(&[100]))]);
    let (ctx, _) = harness.upload(&SessionContext::new(), zip, "a.zip").await;
    let ctx = harness.select_names(&ctx, &["a.pdf"]);

    let result = harness.app.request_merge(&ctx, name).await;

    assert!(matches!(result, Err(PdfBundleError::InvalidOutputName { .. })));
    assert!(!harness.dir.path().join("escape.pdf").exists());
    assert!(!harness.path_of("combined_pdfs").exists());
}

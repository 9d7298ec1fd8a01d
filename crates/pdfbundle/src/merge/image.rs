//! Raster images as PDF pages.
//!
//! Each image becomes a single-page document whose page is exactly the size
//! of the image at 72 dpi (one pixel per point), with the image drawn over
//! the whole page. Pixels are stored as 8-bit DeviceRGB; any alpha channel
//! is discarded.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tokio::task;

use crate::error::{PdfBundleError, Result};
use crate::store::BlobKey;

/// Resource name of the image inside the page's XObject dictionary.
const IMAGE_RESOURCE: &str = "Im0";

/// Decode an image and wrap it in a one-page PDF document.
///
/// # Errors
///
/// Returns [`PdfBundleError::UnreadableImage`] if the bytes cannot be
/// decoded or the image has no pixels.
pub fn image_document(key: &BlobKey, bytes: &[u8]) -> Result<Document> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| PdfBundleError::unreadable_image(key.clone(), e.to_string()))?;

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(PdfBundleError::unreadable_image(key.clone(), "image has no pixels"));
    }
    let (width, height) = (i64::from(width), i64::from(height));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.into_raw(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![width.into(), 0.into(), 0.into(), height.into(), 0.into(), 0.into()],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content
        .encode()
        .map_err(|e| PdfBundleError::merge_failed(format!("Failed to encode page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_RESOURCE => image_id,
            },
        },
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// [`image_document`] on the blocking thread pool.
pub async fn load_image_document(key: &BlobKey, bytes: Vec<u8>) -> Result<Document> {
    let key = key.clone();
    task::spawn_blocking(move || image_document(&key, &bytes))
        .await
        .map_err(|e| PdfBundleError::other(format!("Image task failed: {e}")))?
}

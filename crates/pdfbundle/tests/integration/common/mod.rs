//! Shared fixtures for the integration tests.
//!
//! Archives, PDFs and images are built in memory so the tests need no
//! fixture files on disk.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, RgbImage};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::{Cursor, Write};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use pdfbundle::app::{App, Effect};
use pdfbundle::config::StorageLayout;
use pdfbundle::session::SessionContext;
use pdfbundle::store::{BlobKey, FsBlobStore};

/// An [`App`] over a directory store that is removed on drop.
pub struct Harness {
    pub dir: TempDir,
    pub app: App<FsBlobStore>,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let app = App::new(FsBlobStore::new(dir.path()), StorageLayout::default());
        Self { dir, app }
    }

    /// A second `App` sharing the same directory, like another server worker.
    pub fn second_app(&self) -> App<FsBlobStore> {
        App::new(FsBlobStore::new(self.dir.path()), StorageLayout::default())
    }

    /// Upload `zip` and return the new context with its extraction folder.
    pub async fn upload(
        &self,
        ctx: &SessionContext,
        zip: Vec<u8>,
        name: &str,
    ) -> (SessionContext, BlobKey) {
        let (ctx, effect) = self
            .app
            .upload_archive(ctx, zip, name)
            .await
            .expect("upload failed");
        match effect {
            Effect::Extracted { folder, .. } => (ctx, folder),
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    /// Select candidates by file name, in the given order.
    pub fn select_names(&self, ctx: &SessionContext, names: &[&str]) -> SessionContext {
        let keys: Vec<BlobKey> = names
            .iter()
            .map(|name| {
                ctx.candidates
                    .iter()
                    .find(|c| c.name == *name)
                    .unwrap_or_else(|| panic!("no candidate named {name}"))
                    .key
                    .clone()
            })
            .collect();
        self.app.select_files(ctx, &keys).expect("selection failed").0
    }

    /// Path of a key inside the temp directory.
    pub fn path_of(&self, key: &str) -> std::path::PathBuf {
        self.dir.path().join(key)
    }
}

/// A ZIP archive holding `entries` in order.
pub fn zip_of(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(name.to_string(), SimpleFileOptions::default())
                .unwrap();
        } else {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(bytes).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// A PDF with one page per entry of `widths`, each page that many points wide.
pub fn pdf_with_widths(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for &width in widths {
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"q Q".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
            "Resources" => dictionary! {},
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A solid-color PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, image::Rgb([20, 120, 220]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Width of every page of the PDF in `bytes`, in page order.
pub fn page_widths(bytes: &[u8]) -> Vec<f32> {
    let doc = Document::load_mem(bytes).expect("output is not a PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_object(page_id).and_then(Object::as_dict).unwrap();
            let media_box = page.get(b"MediaBox").and_then(Object::as_array).unwrap();
            media_box[2].as_float().unwrap()
        })
        .collect()
}

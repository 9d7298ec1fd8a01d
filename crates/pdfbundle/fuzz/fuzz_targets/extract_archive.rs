#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfbundle::ingest::ArchiveIngestor;
use pdfbundle::store::{BlobKey, BlobStore, MemoryBlobStore};
use std::sync::{Arc, OnceLock};
use tokio::runtime::{Builder, Runtime};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Builder::new_current_thread().enable_all().build().unwrap())
}

fuzz_target!(|data: &[u8]| {
    let store = Arc::new(MemoryBlobStore::new());
    let ingestor = ArchiveIngestor::new(store.clone());
    let namespace = BlobKey::new("uploaded_files/fuzz").unwrap();

    runtime().block_on(async {
        let Ok(folder) = ingestor.extract(data.to_vec(), "fuzz.zip", &namespace).await else {
            return;
        };

        // Whatever the archive holds, nothing lands outside the extraction folder.
        for key in store.walk(&BlobKey::new("uploaded_files").unwrap()).await.unwrap() {
            assert!(key.starts_with(&folder), "{key} escaped {folder}");
        }
        ingestor.list_candidates(&folder).await.unwrap();
    });
});

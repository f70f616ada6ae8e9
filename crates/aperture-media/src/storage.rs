use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};
use uuid::Uuid;

use aperture_types::Result;

use crate::codec::ImageFormat;

/// Filesystem-backed blob storage for photo bytes.
///
/// Each blob lives at `{root}/{owner_id}/{uuid}.{ext}`; the relative path
/// doubles as the opaque storage ref recorded next to the photo row.
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("Blob storage directory: {}", root.display());
        Ok(Self { root })
    }

    fn blob_path(&self, blob_ref: &str) -> PathBuf {
        self.root.join(blob_ref)
    }

    /// Writes photo bytes under the owner's namespace and returns the ref.
    pub fn put(&self, owner_id: i64, bytes: &[u8], format: ImageFormat) -> Result<String> {
        let blob_ref = format!("{}/{}.{}", owner_id, Uuid::new_v4(), format.extension());
        let path = self.blob_path(&blob_ref);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(blob_ref)
    }

    pub fn read(&self, blob_ref: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.blob_path(blob_ref))?)
    }

    /// Removes a blob. A ref whose file is already gone is not an error.
    pub fn delete(&self, blob_ref: &str) -> Result<()> {
        match fs::remove_file(self.blob_path(blob_ref)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Blob {} already gone", blob_ref);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

pub mod codec;
pub mod storage;

pub use codec::{ImageFormat, ImageSource, RawImage};
pub use storage::BlobStore;

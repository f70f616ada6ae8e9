use aperture_types::{Error, Result};

/// Image formats the content store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    /// Parses the MIME content type sent by upload clients.
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        match content_type {
            "image/jpeg" => Ok(ImageFormat::Jpeg),
            "image/png" => Ok(ImageFormat::Png),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    /// Sniffs the format from magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else {
            None
        }
    }
}

/// An image the content store can ask to render itself in a given format.
/// Transcoding lives behind this seam; the store only moves bytes.
pub trait ImageSource {
    fn encode(&self, format: ImageFormat) -> Result<Vec<u8>>;
}

/// Already-encoded image bytes. Construction verifies the bytes really
/// carry the declared format.
pub struct RawImage {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl RawImage {
    /// `Decode` when the bytes match no known format; `UnsupportedFormat`
    /// when they decode to something other than the declared format.
    pub fn new(bytes: Vec<u8>, format: ImageFormat) -> Result<Self> {
        match ImageFormat::detect(&bytes) {
            Some(detected) if detected == format => Ok(Self { bytes, format }),
            Some(_) => Err(Error::UnsupportedFormat(format.content_type().to_string())),
            None => Err(Error::Decode),
        }
    }
}

impl ImageSource for RawImage {
    fn encode(&self, format: ImageFormat) -> Result<Vec<u8>> {
        if format == self.format {
            Ok(self.bytes.clone())
        } else {
            Err(Error::UnsupportedFormat(format.content_type().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_bytes() -> Vec<u8> {
        let mut b = vec![0xFF, 0xD8, 0xFF, 0xE0];
        b.extend_from_slice(&[0u8; 16]);
        b
    }

    fn png_bytes() -> Vec<u8> {
        let mut b = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        b.extend_from_slice(&[0u8; 16]);
        b
    }

    #[test]
    fn detects_formats_from_magic_bytes() {
        assert_eq!(ImageFormat::detect(&jpeg_bytes()), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::detect(&png_bytes()), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::detect(b"not an image"), None);
        assert_eq!(ImageFormat::detect(&[]), None);
    }

    #[test]
    fn parses_known_content_types() {
        assert_eq!(
            ImageFormat::from_content_type("image/jpeg").unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(
            ImageFormat::from_content_type("image/png").unwrap(),
            ImageFormat::Png
        );
        assert!(matches!(
            ImageFormat::from_content_type("image/gif"),
            Err(Error::UnsupportedFormat(t)) if t == "image/gif"
        ));
    }

    #[test]
    fn raw_image_rejects_mismatched_declaration() {
        assert!(RawImage::new(jpeg_bytes(), ImageFormat::Jpeg).is_ok());
        // Real JPEG bytes declared as PNG: decodable, wrong declaration.
        assert!(matches!(
            RawImage::new(jpeg_bytes(), ImageFormat::Png),
            Err(Error::UnsupportedFormat(t)) if t == "image/png"
        ));
        assert!(matches!(
            RawImage::new(png_bytes(), ImageFormat::Jpeg),
            Err(Error::UnsupportedFormat(t)) if t == "image/jpeg"
        ));
        // Bytes no decoder recognizes at all.
        assert!(matches!(
            RawImage::new(b"garbage".to_vec(), ImageFormat::Jpeg),
            Err(Error::Decode)
        ));
    }

    #[test]
    fn raw_image_encodes_only_its_own_format() {
        let img = RawImage::new(png_bytes(), ImageFormat::Png).unwrap();
        assert_eq!(img.encode(ImageFormat::Png).unwrap(), png_bytes());
        assert!(matches!(
            img.encode(ImageFormat::Jpeg),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}

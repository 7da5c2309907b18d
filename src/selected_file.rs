use image::RgbaImage;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// One user-provided image file: its display name and raw, still-encoded bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self::new(name, bytes))
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub fn decode(&self) -> Result<RgbaImage, image::ImageError> {
        Ok(image::load_from_memory(&self.bytes)?.to_rgba8())
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
pub mod test_images {
    use super::SelectedFile;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    pub fn png(name: &str, width: u32, height: u32) -> SelectedFile {
        let image = ImageBuffer::from_pixel(width, height, Rgba([40u8, 40, 40, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        SelectedFile::new(name, bytes.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png_keeps_native_size() {
        let file = test_images::png("a.png", 64, 32);
        let image = file.decode().unwrap();
        assert_eq!(image.dimensions(), (64, 32));
    }

    #[test]
    fn test_decode_garbage_is_an_error() {
        let file = SelectedFile::new("broken.png", vec![1u8, 2, 3, 4]);
        assert!(file.decode().is_err());
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(SelectedFile::new("a.png", Vec::<u8>::new()).mime_type(), "image/png");
        assert_eq!(SelectedFile::new("b.JPG", Vec::<u8>::new()).mime_type(), "image/jpeg");
        assert_eq!(
            SelectedFile::new("noext", Vec::<u8>::new()).mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boat.png");
        std::fs::write(&path, test_images::png("boat.png", 4, 4).bytes.as_ref()).unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "boat.png");
        assert_eq!(file.decode().unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn test_debug_hides_bytes() {
        let file = SelectedFile::new("a.png", vec![0u8; 1000]);
        assert_eq!(
            format!("{:?}", file),
            "SelectedFile { name: \"a.png\", bytes: 1000 }"
        );
    }
}

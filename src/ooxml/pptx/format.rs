//! Format types shared by the slide reader and writer.

use crate::ooxml::opc::constants::content_type as ct;

/// Raster formats a picture part may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => ct::PNG,
            Self::Jpeg => ct::JPEG,
            Self::Gif => ct::GIF,
            Self::Bmp => ct::BMP,
            Self::Tiff => ct::TIFF,
        }
    }

    /// Extension used for the media partname.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Sniff the format from magic numbers; file names are not trusted.
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        const SIGNATURES: &[(&[u8], ImageFormat)] = &[
            (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], ImageFormat::Png),
            (&[0xFF, 0xD8, 0xFF], ImageFormat::Jpeg),
            (b"GIF87a", ImageFormat::Gif),
            (b"GIF89a", ImageFormat::Gif),
            (b"BM", ImageFormat::Bmp),
            (&[0x49, 0x49, 0x2A, 0x00], ImageFormat::Tiff),
            (&[0x4D, 0x4D, 0x00, 0x2A], ImageFormat::Tiff),
        ];

        SIGNATURES
            .iter()
            .find(|(magic, _)| bytes.starts_with(magic))
            .map(|&(_, format)| format)
    }
}

/// Character formatting of one `a:r`, as found in its `a:rPr`.
///
/// `None` means the attribute was absent and the value is inherited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFormat {
    /// `a:latin/@typeface`
    pub font: Option<String>,
    /// Points (`@sz` / 100)
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Any `@u` other than `none`
    pub underline: Option<bool>,
    /// `RRGGBB` from `a:solidFill/a:srgbClr`
    pub color: Option<String>,
}

impl TextFormat {
    /// True when nothing is set, so `a:rPr` can carry only `lang`.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_bytes() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(ImageFormat::detect_from_bytes(&png), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect_from_bytes(b"<svg/>"), None);
        assert_eq!(ImageFormat::detect_from_bytes(&[]), None);
    }

    #[test]
    fn test_mime_and_extension() {
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
    }
}

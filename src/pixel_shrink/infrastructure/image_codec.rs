use crate::domain::error::EncodeFailure;
use crate::domain::image_codec_trait::{ImageDecoder, LossyEncoder};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, RgbImage};
use std::io::Cursor;

// image クレートによるデコード + JPEG エンコード
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImageCodec;

impl DefaultImageCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for DefaultImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, EncodeFailure> {
        let reader = image::io::Reader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| EncodeFailure::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(EncodeFailure::Decode("unrecognized image format".to_string()));
        }
        reader.decode().map_err(|e| EncodeFailure::Decode(e.to_string()))
    }
}

impl LossyEncoder for DefaultImageCodec {
    fn encode_at(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeFailure> {
        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        encoder
            .encode(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)
            .map_err(|e| EncodeFailure::Encode(e.to_string()))?;
        Ok(buffer)
    }

    fn extension(&self) -> &'static str {
        "jpg"
    }

    fn content_type(&self) -> &'static str {
        "image/jpeg"
    }
}

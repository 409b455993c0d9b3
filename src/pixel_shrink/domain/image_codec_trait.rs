use crate::domain::error::EncodeFailure;
use image::{DynamicImage, RgbImage};

#[cfg(test)]
use mockall::automock;

// 入力バイト列をラスター画像に変換する (フォーマット判定は実装側の責務)
#[cfg_attr(test, automock)]
pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, EncodeFailure>;
}

// 品質スカラーを持つ非可逆コーデック
#[cfg_attr(test, automock)]
pub trait LossyEncoder {
    /// Encodes an already-normalized image at `quality` (1-100).
    fn encode_at(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeFailure>;

    fn extension(&self) -> &'static str;

    fn content_type(&self) -> &'static str;
}

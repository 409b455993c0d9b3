pub mod color_normalizer;
pub mod encode_request;
pub mod encode_result;
pub mod error;
pub mod image_codec_trait;
pub mod size_targeted_encoder;

pub mod archive;
pub mod axum_handler;
pub mod config;
pub mod error;
pub mod image_codec;

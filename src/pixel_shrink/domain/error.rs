use thiserror::Error;

// サイズ指定エンコードの失敗種別。どれも入力に対して決定的なのでリトライしない
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeFailure {
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Image decoding failed: {0}")]
    Decode(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),
}

impl EncodeFailure {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EncodeFailure::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

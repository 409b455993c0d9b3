use super::error::ApplicationError;
use crate::domain::encode_request::EncodeRequest;
use crate::domain::error::EncodeFailure;
use crate::infrastructure::config::EncodeDefaults;

/// Raw numeric form fields as sent by the client. `None` or blank means
/// "use the configured default".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormParams {
    pub target_size: Option<String>,
    pub quality: Option<String>,
    pub min_quality: Option<String>,
    pub quality_step: Option<String>,
}

impl FormParams {
    /// Stores a multipart text field if it is one of ours. Returns false for
    /// unknown field names.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "target_size" => &mut self.target_size,
            "quality" => &mut self.quality,
            "min_quality" => &mut self.min_quality,
            "quality_step" => &mut self.quality_step,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn into_request(self, defaults: &EncodeDefaults) -> Result<EncodeRequest, ApplicationError> {
        let target_size_kb = parse_field("target_size", self.target_size.as_deref())?
            .unwrap_or(i64::try_from(defaults.target_size_kb).unwrap_or(i64::MAX));
        let target_size_bytes = u64::try_from(target_size_kb)
            .ok()
            .and_then(|kb| kb.checked_mul(1024))
            .ok_or_else(|| {
                EncodeFailure::invalid(
                    "targetSizeBytes",
                    format!("{} KiB is not a representable byte count", target_size_kb),
                )
            })?;

        let start_quality = to_u8(
            "startQuality",
            parse_field("quality", self.quality.as_deref())?,
            defaults.quality,
            "is outside the codec quality range 1-100",
        )?;
        let min_quality = to_u8(
            "minQuality",
            parse_field("min_quality", self.min_quality.as_deref())?,
            defaults.min_quality,
            "is outside the codec quality range 1-100",
        )?;
        let quality_step = to_u8(
            "qualityStep",
            parse_field("quality_step", self.quality_step.as_deref())?,
            defaults.quality_step,
            "is not a valid quality step (1-255)",
        )?;

        Ok(EncodeRequest::new(target_size_bytes, start_quality, min_quality, quality_step))
    }
}

fn parse_field(field: &str, raw: Option<&str>) -> Result<Option<i64>, ApplicationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApplicationError::InvalidFormField {
                field: field.to_string(),
                value: value.to_string(),
            }),
    }
}

// 範囲外の整数はドメインの InvalidParameter として扱う
fn to_u8(field: &'static str, value: Option<i64>, default: u8, reason: &str) -> Result<u8, EncodeFailure> {
    match value {
        None => Ok(default),
        Some(v) => u8::try_from(v).map_err(|_| EncodeFailure::invalid(field, format!("{} {}", v, reason))),
    }
}

use crate::domain::error::EncodeFailure;

pub const MIN_CODEC_QUALITY: u8 = 1;
pub const MAX_CODEC_QUALITY: u8 = 100;

pub const DEFAULT_TARGET_SIZE_BYTES: u64 = 250 * 1024;
pub const DEFAULT_START_QUALITY: u8 = 95;
pub const DEFAULT_MIN_QUALITY: u8 = 10;
pub const DEFAULT_QUALITY_STEP: u8 = 5;

/// Parameters for one size-targeted encode. Built per call and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeRequest {
    pub target_size_bytes: u64,
    pub start_quality: u8,
    pub min_quality: u8,
    pub quality_step: u8,
}

impl Default for EncodeRequest {
    fn default() -> Self {
        Self {
            target_size_bytes: DEFAULT_TARGET_SIZE_BYTES,
            start_quality: DEFAULT_START_QUALITY,
            min_quality: DEFAULT_MIN_QUALITY,
            quality_step: DEFAULT_QUALITY_STEP,
        }
    }
}

impl EncodeRequest {
    pub fn new(target_size_bytes: u64, start_quality: u8, min_quality: u8, quality_step: u8) -> Self {
        Self {
            target_size_bytes,
            start_quality,
            min_quality,
            quality_step,
        }
    }

    /// Checks every precondition of the encode loop, reporting the first
    /// offending field.
    pub fn validate(&self) -> Result<(), EncodeFailure> {
        if self.target_size_bytes == 0 {
            return Err(EncodeFailure::invalid("targetSizeBytes", "must be greater than 0"));
        }
        check_quality_range("startQuality", self.start_quality)?;
        check_quality_range("minQuality", self.min_quality)?;
        if self.min_quality > self.start_quality {
            return Err(EncodeFailure::invalid(
                "minQuality",
                format!(
                    "{} must not exceed startQuality ({})",
                    self.min_quality, self.start_quality
                ),
            ));
        }
        if self.quality_step == 0 {
            return Err(EncodeFailure::invalid("qualityStep", "must be greater than 0"));
        }
        Ok(())
    }

    /// Upper bound on encode passes: ceil((start - min) / step) + 1.
    pub fn max_passes(&self) -> u32 {
        let span = u32::from(self.start_quality.saturating_sub(self.min_quality));
        let step = u32::from(self.quality_step.max(1));
        (span + step - 1) / step + 1
    }
}

fn check_quality_range(field: &'static str, quality: u8) -> Result<(), EncodeFailure> {
    if !(MIN_CODEC_QUALITY..=MAX_CODEC_QUALITY).contains(&quality) {
        return Err(EncodeFailure::invalid(
            field,
            format!(
                "{} is outside the codec range {}-{}",
                quality, MIN_CODEC_QUALITY, MAX_CODEC_QUALITY
            ),
        ));
    }
    Ok(())
}

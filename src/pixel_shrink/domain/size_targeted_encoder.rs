//! Quality search that fits an encoded image under a byte ceiling.
//!
//! Starting at `start_quality`, the image is encoded, measured and, while the
//! output is over the ceiling, re-encoded `quality_step` lower. The search never
//! goes below `min_quality`, so it runs at most
//! `ceil((start_quality - min_quality) / quality_step) + 1` passes.

use crate::domain::color_normalizer::normalize;
use crate::domain::encode_request::EncodeRequest;
use crate::domain::encode_result::EncodeResult;
use crate::domain::error::EncodeFailure;
use crate::domain::image_codec_trait::LossyEncoder;
use image::DynamicImage;
use tracing::debug;

/// Encodes `image` with `codec`, lowering quality until the output fits
/// `request.target_size_bytes` or the quality floor is reached.
///
/// On reaching the floor the last buffer produced is returned with
/// `met_target == false`. The caller's image is only read.
pub fn encode<E: LossyEncoder + ?Sized>(
    codec: &E,
    image: &DynamicImage,
    request: &EncodeRequest,
) -> Result<EncodeResult, EncodeFailure> {
    request.validate()?;

    let rgb = normalize(image);
    let mut quality = request.start_quality;
    let mut passes = 0u32;

    loop {
        let buffer = codec.encode_at(&rgb, quality)?;
        passes += 1;
        debug_assert!(passes <= request.max_passes());
        let size = buffer.len() as u64;
        debug!(quality, size, passes, target = request.target_size_bytes, "encode pass");

        if size <= request.target_size_bytes {
            return Ok(EncodeResult {
                buffer,
                quality,
                met_target: true,
                passes,
            });
        }

        match quality.checked_sub(request.quality_step) {
            Some(next) if next >= request.min_quality => quality = next,
            _ => {
                debug!(quality, size, "quality floor reached without meeting target");
                return Ok(EncodeResult {
                    buffer,
                    quality,
                    met_target: false,
                    passes,
                });
            }
        }
    }
}

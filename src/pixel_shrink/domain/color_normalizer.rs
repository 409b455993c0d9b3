use image::{DynamicImage, RgbImage};
use std::borrow::Cow;

/// Returns the image as 8-bit RGB. Already-RGB8 images are borrowed as is;
/// anything else (alpha, grayscale, 16-bit, float) is converted once and any
/// alpha channel is dropped.
pub fn normalize(image: &DynamicImage) -> Cow<'_, RgbImage> {
    match image {
        DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
        other => Cow::Owned(other.to_rgb8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, Rgba, RgbaImage};

    #[test]
    fn test_rgb_input_is_borrowed() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([10, 20, 30])));
        let normalized = normalize(&image);
        assert!(matches!(normalized, Cow::Borrowed(_)));
        assert_eq!(normalized.dimensions(), (4, 3));
    }

    #[test]
    fn test_rgba_input_drops_alpha() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 0])));
        let normalized = normalize(&image);
        assert!(matches!(normalized, Cow::Owned(_)));
        assert_eq!(normalized.get_pixel(1, 1), &Rgb([200, 100, 50]));
    }

    #[test]
    fn test_grayscale_input_expands_to_three_channels() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 1, Luma([77])));
        let normalized = normalize(&image);
        assert_eq!(normalized.get_pixel(0, 0), &Rgb([77, 77, 77]));
    }

    #[test]
    fn test_input_image_is_left_untouched() {
        let source = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        let image = DynamicImage::ImageRgba8(source.clone());
        let _ = normalize(&image);
        assert_eq!(image.as_rgba8(), Some(&source));
    }
}

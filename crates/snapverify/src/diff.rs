//! Pixel-level image comparison.
//!
//! Pure functions over decoded images: no capture, no filesystem. Two images
//! of equal size are compared at identical coordinates with a
//! [`PixelComparator`]; the result carries the counts and a highlight image in
//! which differing pixels are red and matching pixels keep the baseline colour.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba};

/// Colour used to mark differing pixels
pub const HIGHLIGHT: Rgb<u8> = Rgb([255, 0, 0]);

/// Decides whether two pixels at the same coordinate differ
pub trait PixelComparator: std::fmt::Debug {
    /// `true` when `current` counts as different from `baseline`
    fn differs(&self, baseline: Rgba<u8>, current: Rgba<u8>) -> bool;
}

/// Binary equality over all four channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactMatch;

impl PixelComparator for ExactMatch {
    fn differs(&self, baseline: Rgba<u8>, current: Rgba<u8>) -> bool {
        baseline != current
    }
}

/// Tolerates small colour shifts from anti-aliasing or font hinting.
///
/// Pixels differ when the summed absolute RGB channel difference exceeds
/// `max_channel_sum`. Alpha is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTolerance {
    /// Largest summed channel difference still counted as equal (0-765)
    pub max_channel_sum: u32,
}

impl ColorTolerance {
    /// Create a tolerance comparator
    #[must_use]
    pub const fn new(max_channel_sum: u32) -> Self {
        Self { max_channel_sum }
    }
}

impl PixelComparator for ColorTolerance {
    fn differs(&self, baseline: Rgba<u8>, current: Rgba<u8>) -> bool {
        channel_distance(baseline, current) > self.max_channel_sum
    }
}

/// Sum of absolute RGB channel differences
#[must_use]
pub fn channel_distance(a: Rgba<u8>, b: Rgba<u8>) -> u32 {
    let Rgba([r1, g1, b1, _]) = a;
    let Rgba([r2, g2, b2, _]) = b;

    let dr = i32::from(r1) - i32::from(r2);
    let dg = i32::from(g1) - i32::from(g2);
    let db = i32::from(b1) - i32::from(b2);

    dr.unsigned_abs() + dg.unsigned_abs() + db.unsigned_abs()
}

/// Outcome of comparing two same-size images
#[derive(Debug, Clone)]
pub struct ImageDiff {
    /// Number of differing pixels
    pub diff_pixels: u64,
    /// Number of compared pixels
    pub total_pixels: u64,
    /// Baseline with differing pixels painted [`HIGHLIGHT`]
    pub highlight: RgbImage,
}

impl ImageDiff {
    /// Fraction of differing pixels in `[0, 1]`; 0 for empty images
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.diff_pixels as f64 / self.total_pixels as f64
        }
    }

    /// Whether the ratio is strictly above `threshold`
    #[must_use]
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.ratio() > threshold
    }

    /// Check if images are identical
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.diff_pixels == 0
    }
}

/// Compare two images of equal dimensions pixel by pixel.
///
/// Returns `None` when the dimensions differ; callers report that as a
/// dimension mismatch without looking at pixel content.
#[must_use]
pub fn diff_images(
    baseline: &DynamicImage,
    current: &DynamicImage,
    comparator: &dyn PixelComparator,
) -> Option<ImageDiff> {
    let (width, height) = baseline.dimensions();
    if current.dimensions() != (width, height) {
        return None;
    }

    let baseline_rgba = baseline.to_rgba8();
    let current_rgba = current.to_rgba8();
    let mut highlight = RgbImage::new(width, height);
    let mut diff_pixels = 0u64;

    for (x, y, expected) in baseline_rgba.enumerate_pixels() {
        let actual = current_rgba.get_pixel(x, y);
        if comparator.differs(*expected, *actual) {
            diff_pixels += 1;
            highlight.put_pixel(x, y, HIGHLIGHT);
        } else {
            let Rgba([r, g, b, _]) = *expected;
            highlight.put_pixel(x, y, Rgb([r, g, b]));
        }
    }

    Some(ImageDiff {
        diff_pixels,
        total_pixels: u64::from(width) * u64::from(height),
        highlight,
    })
}

/// Blank (black) image covering both sizes, written when dimensions differ
#[must_use]
pub fn placeholder_diff(baseline: (u32, u32), current: (u32, u32)) -> RgbImage {
    RgbImage::new(baseline.0.max(current.0), baseline.1.max(current.1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use proptest::prelude::*;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
    }

    const GREY: Rgba<u8> = Rgba([100, 100, 100, 255]);

    mod comparator_tests {
        use super::*;

        #[test]
        fn test_exact_match() {
            assert!(!ExactMatch.differs(GREY, GREY));
            assert!(ExactMatch.differs(GREY, Rgba([100, 100, 101, 255])));
            assert!(ExactMatch.differs(GREY, Rgba([100, 100, 100, 254])));
        }

        #[test]
        fn test_channel_distance() {
            let white = Rgba([255, 255, 255, 255]);
            let black = Rgba([0, 0, 0, 255]);
            let red = Rgba([255, 0, 0, 255]);

            assert_eq!(channel_distance(white, white), 0);
            assert_eq!(channel_distance(white, black), 255 * 3);
            assert_eq!(channel_distance(red, black), 255);
        }

        #[test]
        fn test_color_tolerance() {
            let tolerance = ColorTolerance::new(15);
            assert!(!tolerance.differs(GREY, Rgba([105, 105, 105, 255])));
            assert!(tolerance.differs(GREY, Rgba([106, 105, 105, 255])));
            assert!(!tolerance.differs(GREY, Rgba([100, 100, 100, 0])));
        }
    }

    mod diff_tests {
        use super::*;

        #[test]
        fn test_identical_images() {
            let img = solid(4, 4, GREY);
            let diff = diff_images(&img, &img, &ExactMatch).unwrap();
            assert!(diff.is_identical());
            assert_eq!(diff.total_pixels, 16);
            assert!((diff.ratio() - 0.0).abs() < f64::EPSILON);
            assert!(!diff.exceeds(0.0));
        }

        #[test]
        fn test_dimension_mismatch() {
            let a = solid(2, 2, GREY);
            let b = solid(3, 2, GREY);
            assert!(diff_images(&a, &b, &ExactMatch).is_none());
        }

        #[test]
        fn test_highlight_marks_only_differences() {
            let baseline = solid(3, 1, Rgba([10, 20, 30, 255]));
            let mut current = baseline.to_rgba8();
            current.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
            let current = DynamicImage::ImageRgba8(current);

            let diff = diff_images(&baseline, &current, &ExactMatch).unwrap();
            assert_eq!(diff.diff_pixels, 1);
            assert_eq!(diff.highlight.get_pixel(0, 0), &Rgb([10, 20, 30]));
            assert_eq!(diff.highlight.get_pixel(1, 0), &HIGHLIGHT);
            assert_eq!(diff.highlight.get_pixel(2, 0), &Rgb([10, 20, 30]));
        }

        #[test]
        fn test_tolerance_changes_count() {
            let baseline = solid(2, 2, GREY);
            let current = solid(2, 2, Rgba([103, 100, 100, 255]));
            let exact = diff_images(&baseline, &current, &ExactMatch).unwrap();
            let tolerant = diff_images(&baseline, &current, &ColorTolerance::new(10)).unwrap();
            assert_eq!(exact.diff_pixels, 4);
            assert_eq!(tolerant.diff_pixels, 0);
        }

        #[test]
        fn test_threshold_boundary_is_inclusive() {
            let baseline = solid(10, 10, GREY);
            let mut current = baseline.to_rgba8();
            for x in 0..5 {
                current.put_pixel(x, 0, Rgba([0, 0, 0, 255]));
            }
            let diff =
                diff_images(&baseline, &DynamicImage::ImageRgba8(current), &ExactMatch).unwrap();
            assert!((diff.ratio() - 0.05).abs() < f64::EPSILON);
            assert!(!diff.exceeds(0.05));
            assert!(diff.exceeds(0.04));
        }

        #[test]
        fn test_different_pixel_formats_compare_equal() {
            let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([100, 100, 100])));
            let rgba = solid(2, 2, GREY);
            let diff = diff_images(&rgb, &rgba, &ExactMatch).unwrap();
            assert!(diff.is_identical());
        }

        #[test]
        fn test_placeholder_diff_size() {
            let img = placeholder_diff((800, 600), (1024, 500));
            assert_eq!(img.dimensions(), (1024, 600));
            assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        }
    }

    proptest! {
        #[test]
        fn prop_ratio_is_k_over_n(width in 1u32..16, height in 1u32..16, seed in any::<u64>()) {
            let n = u64::from(width) * u64::from(height);
            let k = seed % (n + 1);
            let baseline = RgbaImage::from_pixel(width, height, GREY);
            let mut current = baseline.clone();
            for i in 0..k {
                let i = i as u32;
                current.put_pixel(i % width, i / width, Rgba([0, 0, 0, 255]));
            }
            let diff = diff_images(
                &DynamicImage::ImageRgba8(baseline),
                &DynamicImage::ImageRgba8(current),
                &ExactMatch,
            ).unwrap();
            prop_assert_eq!(diff.diff_pixels, k);
            prop_assert!((diff.ratio() - k as f64 / n as f64).abs() < 1e-12);
            let threshold = 0.25;
            prop_assert_eq!(!diff.exceeds(threshold), (k as f64 / n as f64) <= threshold);
        }
    }
}

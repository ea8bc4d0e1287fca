//! Screenshot source abstraction.
//!
//! The browser automation driver is an external collaborator. Capture and
//! verification only need two things from it: a PNG of the whole viewport and
//! a PNG bounded to one element. [`ScreenshotSource`] is that seam.
//!
//! - [`MockSource`] serves a fixed in-memory frame and crops elements out of
//!   it; used for unit tests and offline checks.
//! - `ChromiumSource` (feature `browser`) captures from a live chromium page.

use crate::result::{VerifyError, VerifyResult};
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::io::Cursor;

/// On-screen rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp to an image of `width` x `height` and round to whole pixels.
    ///
    /// Returns `None` when nothing of the box is inside the image.
    #[must_use]
    pub fn to_pixels(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0.0).floor() as u32;
        let y0 = self.y.max(0.0).floor() as u32;
        let x1 = ((self.x + self.width).ceil().max(0.0) as u32).min(width);
        let y1 = ((self.y + self.height).ceil().max(0.0) as u32).min(height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1 - x0, y1 - y0))
    }
}

/// Handle to a located element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Selector the element was located with
    pub selector: String,
    /// Bounding box if the element is rendered
    pub bounding_box: Option<BoundingBox>,
}

impl ElementHandle {
    /// Create a handle for `selector` with no known box
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            bounding_box: None,
        }
    }

    /// Attach a bounding box
    #[must_use]
    pub const fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Check if element is visible
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.bounding_box.is_some()
    }
}

/// Something that can produce PNG screenshots
pub trait ScreenshotSource {
    /// Whether the source can currently capture. A closed or detached
    /// browser reports `false`.
    fn is_available(&self) -> bool {
        true
    }

    /// Capture the full viewport as PNG bytes
    fn capture_viewport(&self) -> VerifyResult<Vec<u8>>;

    /// Capture the area of `element` as PNG bytes
    fn capture_element(&self, element: &ElementHandle) -> VerifyResult<Vec<u8>>;
}

impl<S: ScreenshotSource + ?Sized> ScreenshotSource for &S {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn capture_viewport(&self) -> VerifyResult<Vec<u8>> {
        (**self).capture_viewport()
    }

    fn capture_element(&self, element: &ElementHandle) -> VerifyResult<Vec<u8>> {
        (**self).capture_element(element)
    }
}

/// Encode an image as PNG bytes
pub(crate) fn encode_png(image: &DynamicImage) -> VerifyResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// In-memory screenshot source
#[derive(Debug)]
pub struct MockSource {
    frame: DynamicImage,
    available: bool,
    fail_with: Option<String>,
    captures: Cell<usize>,
}

impl MockSource {
    /// Serve `frame` for every capture
    #[must_use]
    pub const fn new(frame: DynamicImage) -> Self {
        Self {
            frame,
            available: true,
            fail_with: None,
            captures: Cell::new(0),
        }
    }

    /// Serve a frame decoded from PNG bytes
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a decodable image
    pub fn from_png(bytes: &[u8]) -> VerifyResult<Self> {
        let frame = image::load_from_memory(bytes)
            .map_err(|e| VerifyError::decode("<memory>", e.to_string()))?;
        Ok(Self::new(frame))
    }

    /// Mark the source as closed
    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Make every capture fail with `message`
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Replace the served frame
    pub fn set_frame(&mut self, frame: DynamicImage) {
        self.frame = frame;
    }

    /// Number of captures served so far
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.captures.get()
    }

    fn check(&self) -> VerifyResult<()> {
        if let Some(ref message) = self.fail_with {
            return Err(VerifyError::capture(message.clone()));
        }
        self.captures.set(self.captures.get() + 1);
        Ok(())
    }
}

impl ScreenshotSource for MockSource {
    fn is_available(&self) -> bool {
        self.available
    }

    fn capture_viewport(&self) -> VerifyResult<Vec<u8>> {
        self.check()?;
        encode_png(&self.frame)
    }

    fn capture_element(&self, element: &ElementHandle) -> VerifyResult<Vec<u8>> {
        self.check()?;
        let bounds = element.bounding_box.ok_or_else(|| {
            VerifyError::capture(format!("element {} is not rendered", element.selector))
        })?;
        let (width, height) = self.frame.dimensions();
        let (x, y, w, h) = bounds.to_pixels(width, height).ok_or_else(|| {
            VerifyError::capture(format!("element {} is outside the viewport", element.selector))
        })?;
        encode_png(&self.frame.crop_imm(x, y, w, h))
    }
}

//! Shared domain models for the textcap workspace.
//!
//! This crate centralizes the lightweight data structures passed between the
//! capture, OCR and pipeline crates. Keep it backend-agnostic so every crate
//! can depend on it without pulling in screen-capture or OCR engine features.

mod magic;
mod ocr;

use std::fmt;

use image::RgbImage;
use serde::Serialize;

pub use magic::Magic;
pub use ocr::{OcrResult, Word, WordBox};

/// Placement of a monitor on the virtual desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScreenPosition {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenPosition {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// One screenshot per physical monitor.
#[derive(Clone)]
pub struct Shot {
    pub monitor: usize,
    pub image: RgbImage,
    pub position: ScreenPosition,
}

impl Shot {
    pub fn new(monitor: usize, image: RgbImage, position: ScreenPosition) -> Self {
        Self {
            monitor,
            image,
            position,
        }
    }
}

impl fmt::Debug for Shot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shot")
            .field("monitor", &self.monitor)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("position", &self.position)
            .finish()
    }
}

/// Selected rectangle in monitor-local pixel coordinates.
///
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub monitor: usize,
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Region {
    pub fn new(monitor: usize, left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            monitor,
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Clamp the rectangle to an image of the given size.
    ///
    /// Returns `None` when nothing of the region remains visible.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Region> {
        let left = self.left.min(width);
        let top = self.top.min(height);
        let right = self.right.min(width).max(left);
        let bottom = self.bottom.min(height).max(top);
        let clamped = Region::new(self.monitor, left, top, right, bottom);
        if clamped.width() == 0 || clamped.height() == 0 {
            None
        } else {
            Some(clamped)
        }
    }
}

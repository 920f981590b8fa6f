use std::borrow::Cow;

use image::RgbImage;
use image::imageops::{self, FilterType};

use textcap_types::WordBox;

/// Preprocessing applied to screenshots before recognition.
///
/// Screen text is small compared to scanned documents, so upscaling and a
/// uniform border noticeably improve recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhanceSettings {
    pub scale_factor: f32,
    pub padding: u32,
}

impl Default for EnhanceSettings {
    fn default() -> Self {
        Self {
            scale_factor: 2.0,
            padding: 20,
        }
    }
}

impl EnhanceSettings {
    pub fn none() -> Self {
        Self {
            scale_factor: 1.0,
            padding: 0,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.scale() <= 1.0 && self.padding == 0
    }

    fn scale(&self) -> f32 {
        if self.scale_factor.is_finite() {
            self.scale_factor
        } else {
            1.0
        }
    }

    /// Map a box found on the enhanced image back onto the original image.
    pub fn map_box(&self, bbox: WordBox) -> WordBox {
        let scale = self.scale().max(1.0);
        let unscale = |value: u32| (value as f32 / scale).round() as u32;
        WordBox {
            left: unscale(bbox.left.saturating_sub(self.padding)),
            top: unscale(bbox.top.saturating_sub(self.padding)),
            width: unscale(bbox.width),
            height: unscale(bbox.height),
        }
    }
}

pub fn enhance<'a>(image: &'a RgbImage, settings: &EnhanceSettings) -> Cow<'a, RgbImage> {
    if settings.is_identity() || image.width() == 0 || image.height() == 0 {
        return Cow::Borrowed(image);
    }

    let scale = settings.scale();
    let scaled = if scale > 1.0 {
        let width = (image.width() as f32 * scale).round() as u32;
        let height = (image.height() as f32 * scale).round() as u32;
        imageops::resize(image, width, height, FilterType::CatmullRom)
    } else {
        image.clone()
    };

    if settings.padding == 0 {
        return Cow::Owned(scaled);
    }

    let padding = settings.padding;
    let grown = |side: u32| padding.checked_mul(2).and_then(|border| side.checked_add(border));
    let (Some(width), Some(height)) = (grown(scaled.width()), grown(scaled.height())) else {
        log::warn!("padding {padding} overflows the canvas size; recognizing unpadded image");
        return Cow::Owned(scaled);
    };

    let background = *scaled.get_pixel(0, 0);
    let mut canvas = RgbImage::from_pixel(width, height, background);
    imageops::replace(&mut canvas, &scaled, i64::from(padding), i64::from(padding));
    Cow::Owned(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn identity_settings_borrow_the_input() {
        let image = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let out = enhance(&image, &EnhanceSettings::none());
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn scale_and_padding_grow_the_canvas() {
        let mut image = RgbImage::from_pixel(10, 5, Rgb([255, 255, 255]));
        image.put_pixel(5, 2, Rgb([0, 0, 0]));
        let settings = EnhanceSettings {
            scale_factor: 2.0,
            padding: 3,
        };
        let out = enhance(&image, &settings);
        assert_eq!(out.dimensions(), (26, 16));
        assert_eq!(out.get_pixel(0, 0), out.get_pixel(3, 3));
        assert_eq!(out.get_pixel(25, 15), out.get_pixel(3, 3));
    }

    #[test]
    fn oversized_padding_keeps_the_unpadded_image() {
        let image = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        let settings = EnhanceSettings {
            scale_factor: 1.0,
            padding: 3_000_000_000,
        };
        let out = enhance(&image, &settings);
        assert_eq!(out.dimensions(), (4, 4));

        let settings = EnhanceSettings {
            scale_factor: 1.0,
            padding: u32::MAX / 2,
        };
        assert_eq!(enhance(&image, &settings).dimensions(), (4, 4));
    }

    #[test]
    fn boxes_map_back_to_source_coordinates() {
        let settings = EnhanceSettings {
            scale_factor: 2.0,
            padding: 20,
        };
        let mapped = settings.map_box(WordBox {
            left: 40,
            top: 30,
            width: 50,
            height: 20,
        });
        assert_eq!(
            mapped,
            WordBox {
                left: 10,
                top: 5,
                width: 25,
                height: 10,
            }
        );
    }
}

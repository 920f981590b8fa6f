use image::RgbImage;

use crate::args::TessArgs;

/// OCR invocation metadata.
#[derive(Debug)]
pub struct OcrRequest<'a> {
    image: &'a RgbImage,
    args: &'a TessArgs,
}

impl<'a> OcrRequest<'a> {
    pub fn new(image: &'a RgbImage, args: &'a TessArgs) -> Self {
        Self { image, args }
    }

    pub fn image(&self) -> &'a RgbImage {
        self.image
    }

    pub fn args(&self) -> &'a TessArgs {
        self.args
    }
}

// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Output side of the decoder.
//!
//! [`ImageSink`] is what the decoder writes into; [`Image`] is the owned
//! RGB buffer shipped with the crate.

/// One 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Destination for decoded pixels and metadata.
pub trait ImageSink {
    /// Called once, from SOF, before any pixel is written.
    fn set_size(&mut self, width: usize, height: usize);
    /// Write the pixel at `row`, `col`. Coordinates are always in bounds.
    fn set_pixel(&mut self, row: usize, col: usize, rgb: Rgb);
    /// Called for every COM section.
    fn set_comment(&mut self, comment: String);
    fn width(&self) -> usize;
    fn height(&self) -> usize;
}

/// Decoded image: row-major RGB pixels plus the last COM text, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    comment: Option<String>,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at (`row`, `col`), or `None` outside the image.
    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgb> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Interleaved `RGBRGB...` bytes, row-major.
    pub fn as_raw(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }

    /// Convert into an [`image::RgbImage`].
    #[cfg(feature = "image")]
    pub fn into_rgb_image(self) -> ::image::RgbImage {
        ::image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let p = self.pixels[y as usize * self.width + x as usize];
            ::image::Rgb([p.r, p.g, p.b])
        })
    }
}

impl ImageSink for Image {
    fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgb::default(); width * height];
    }

    fn set_pixel(&mut self, row: usize, col: usize, rgb: Rgb) {
        self.pixels[row * self.width + col] = rgb;
    }

    fn set_comment(&mut self, comment: String) {
        self.comment = Some(comment);
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_pixels() {
        let mut img = Image::new();
        img.set_size(3, 2);
        assert_eq!(img.pixels().len(), 6);
        let red = Rgb { r: 255, g: 0, b: 0 };
        img.set_pixel(1, 2, red);
        assert_eq!(img.pixel(1, 2), Some(red));
        assert_eq!(img.pixel(0, 0), Some(Rgb::default()));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(0, 3), None);
    }

    #[test]
    fn raw_bytes_are_interleaved() {
        let mut img = Image::new();
        img.set_size(2, 1);
        img.set_pixel(0, 1, Rgb { r: 1, g: 2, b: 3 });
        assert_eq!(img.as_raw(), vec![0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn comment_round_trip() {
        let mut img = Image::new();
        assert_eq!(img.comment(), None);
        img.set_comment("hello".to_string());
        assert_eq!(img.comment(), Some("hello"));
    }
}

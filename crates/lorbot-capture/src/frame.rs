//! Captured window raster and pixel probes.

use image::{GrayImage, Luma, RgbImage};
use lorbot_core::{Error, HsvRange, Rect, Result, Size};

use crate::color::rgb_to_hsv;

/// One captured frame of the game window.
///
/// Stored as RGB internally; capture backends that produce BGR rows go
/// through [`Frame::from_bgr`].
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wrap an RGB image.
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Build a frame from tightly packed BGR bytes.
    pub fn from_bgr(width: u32, height: u32, bgr: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if bgr.len() != expected {
            return Err(Error::Capture(format!(
                "BGR buffer has {} bytes, expected {expected} for {width}x{height}",
                bgr.len()
            )));
        }

        let mut rgb = Vec::with_capacity(expected);
        for px in bgr.chunks_exact(3) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }

        RgbImage::from_raw(width, height, rgb)
            .map(Self::new)
            .ok_or_else(|| Error::Capture("BGR buffer does not fit the frame".into()))
    }

    /// Load a frame from an image file.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(image::open(path)?.to_rgb8()))
    }

    /// Underlying RGB image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Frame size.
    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    /// Copy out a region, clipped to the frame.
    ///
    /// Returns `None` when the region lies entirely outside the frame.
    pub fn crop(&self, rect: Rect) -> Option<Frame> {
        let clipped = rect.clamp_to(self.size())?;
        let view = image::imageops::crop_imm(
            &self.image,
            clipped.x as u32,
            clipped.y as u32,
            clipped.width,
            clipped.height,
        );
        Some(Frame::new(view.to_image()))
    }

    /// Binary mask of pixels inside `range` (255 inside, 0 outside).
    pub fn hsv_mask(&self, range: &HsvRange) -> GrayImage {
        GrayImage::from_fn(self.image.width(), self.image.height(), |x, y| {
            let [r, g, b] = self.image.get_pixel(x, y).0;
            if range.contains(rgb_to_hsv(r, g, b)) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    /// Number of pixels inside `range`.
    pub fn count_in_hsv(&self, range: &HsvRange) -> u32 {
        self.image
            .pixels()
            .filter(|px| {
                let [r, g, b] = px.0;
                range.contains(rgb_to_hsv(r, g, b))
            })
            .count() as u32
    }

    /// Number of pixels inside `range` within a region of the frame.
    ///
    /// Regions outside the frame count zero pixels.
    pub fn count_in_hsv_region(&self, rect: Rect, range: &HsvRange) -> u32 {
        let Some(clipped) = rect.clamp_to(self.size()) else {
            return 0;
        };

        let mut count = 0;
        for y in clipped.y as u32..clipped.bottom() as u32 {
            for x in clipped.x as u32..clipped.right() as u32 {
                let [r, g, b] = self.image.get_pixel(x, y).0;
                if range.contains(rgb_to_hsv(r, g, b)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Grayscale copy of the frame.
    pub fn gray(&self) -> GrayImage {
        image::imageops::grayscale(&self.image)
    }

    /// Binary edge map from the Sobel gradient magnitude.
    ///
    /// Pixels whose magnitude reaches `threshold` are 255, all others 0. The
    /// one-pixel border is always 0.
    pub fn edges(&self, threshold: f32) -> GrayImage {
        sobel_edges(&self.gray(), threshold)
    }
}

/// Binary Sobel edge map of a grayscale image.
pub fn sobel_edges(gray: &GrayImage, threshold: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = GrayImage::new(width, height);
    if width < 3 || height < 3 {
        return out;
    }

    let at = |x: u32, y: u32| gray.get_pixel(x, y).0[0] as f32;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let gx = (at(x + 1, y - 1) + 2.0 * at(x + 1, y) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2.0 * at(x - 1, y) + at(x - 1, y + 1));
            let gy = (at(x - 1, y + 1) + 2.0 * at(x, y + 1) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2.0 * at(x, y - 1) + at(x + 1, y - 1));
            if (gx * gx + gy * gy).sqrt() >= threshold {
                out.put_pixel(x, y, Luma([255]));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use lorbot_core::Hsv;

    fn blue_square() -> Frame {
        let mut image = RgbImage::new(20, 10);
        for y in 2..6 {
            for x in 4..9 {
                image.put_pixel(x, y, Rgb([0, 0, 255]));
            }
        }
        Frame::new(image)
    }

    fn blue_range() -> HsvRange {
        HsvRange::new(Hsv::new(5, 200, 200), Hsv::new(260, 255, 255))
    }

    #[test]
    fn test_from_bgr_swaps_channels() {
        let frame = Frame::from_bgr(1, 1, &[10, 20, 30]).unwrap();
        assert_eq!(frame.image().get_pixel(0, 0).0, [30, 20, 10]);
    }

    #[test]
    fn test_from_bgr_rejects_short_buffer() {
        let result = Frame::from_bgr(2, 2, &[0; 5]);
        assert!(matches!(result, Err(Error::Capture(_))));
    }

    #[test]
    fn test_count_in_hsv() {
        let frame = blue_square();
        assert_eq!(frame.count_in_hsv(&blue_range()), 20);
    }

    #[test]
    fn test_count_in_hsv_region_clips() {
        let frame = blue_square();
        assert_eq!(frame.count_in_hsv_region(Rect::new(0, 0, 6, 4), &blue_range()), 4);
        assert_eq!(frame.count_in_hsv_region(Rect::new(-10, -10, 16, 14), &blue_range()), 4);
        assert_eq!(frame.count_in_hsv_region(Rect::new(50, 50, 5, 5), &blue_range()), 0);
    }

    #[test]
    fn test_crop_clips_to_frame() {
        let frame = blue_square();
        let crop = frame.crop(Rect::new(15, 5, 10, 10)).unwrap();
        assert_eq!(crop.size(), Size::new(5, 5));
        assert!(frame.crop(Rect::new(20, 0, 3, 3)).is_none());
    }

    #[test]
    fn test_hsv_mask() {
        let mask = blue_square().hsv_mask(&blue_range());
        assert_eq!(mask.get_pixel(4, 2).0, [255]);
        assert_eq!(mask.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_edges_on_flat_image_are_empty() {
        let frame = Frame::new(RgbImage::from_pixel(8, 8, Rgb([90, 90, 90])));
        assert!(frame.edges(100.0).pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_edges_find_step() {
        let gray = GrayImage::from_fn(8, 8, |x, _| if x < 4 { Luma([0]) } else { Luma([255]) });
        let edges = sobel_edges(&gray, 100.0);
        assert_eq!(edges.get_pixel(3, 4).0, [255]);
        assert_eq!(edges.get_pixel(4, 4).0, [255]);
        assert_eq!(edges.get_pixel(1, 4).0, [0]);
        assert_eq!(edges.get_pixel(0, 4).0, [0]);
    }
}

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbaImage};
use screenlate_config::capture::PreprocessConfig;
use screenlate_types::Frame;

/// Normalize a captured frame for recognition: optional upscale, then
/// grayscale and binarization. Returns `None` for empty or malformed frames.
pub fn preprocess(frame: &Frame, config: &PreprocessConfig) -> Option<DynamicImage> {
    if frame.is_empty() {
        return None;
    }

    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())?;
    let mut image = DynamicImage::ImageRgba8(rgba);

    if (config.scale - 1.0).abs() > f32::EPSILON {
        let width = scaled(frame.width, config.scale);
        let height = scaled(frame.height, config.scale);
        image = image.resize_exact(width, height, FilterType::Triangle);
    }

    if !config.grayscale {
        return Some(image);
    }

    let mut gray = image.to_luma8();
    let threshold = config.threshold.unwrap_or_else(|| otsu_threshold(&gray));
    binarize(&mut gray, threshold, config.invert);

    Some(DynamicImage::ImageLuma8(gray))
}

fn scaled(size: u32, factor: f32) -> u32 {
    ((size as f32) * factor).round().max(1.0) as u32
}

/// Pixels brighter than `threshold` become white, the rest black
pub fn binarize(image: &mut GrayImage, threshold: u8, invert: bool) {
    for pixel in image.pixels_mut() {
        let lit = (pixel.0[0] > threshold) != invert;
        pixel.0[0] = if lit { 255 } else { 0 };
    }
}

/// Threshold maximizing between-class variance of the luma histogram
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total = (image.width() as u64 * image.height() as u64) as f64;
    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0.0;
    let mut background_sum = 0.0;
    let mut best = (0u8, 0.0f64);

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count as f64;
        if background_weight == 0.0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0.0 {
            break;
        }

        background_sum += level as f64 * count as f64;
        let background_mean = background_sum / background_weight;
        let foreground_mean = (weighted_sum - background_sum) / foreground_weight;
        let variance =
            background_weight * foreground_weight * (background_mean - foreground_mean).powi(2);

        if variance > best.1 {
            best = (level as u8, variance);
        }
    }

    best.0
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    /// Left half dark, right half bright
    fn two_tone(width: u32, height: u32, dark: u8, bright: u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _y in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { dark } else { bright };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Frame::new(width, height, data)
    }

    #[test]
    fn test_otsu_splits_two_tones() {
        let gray = GrayImage::from_fn(10, 4, |x, _| Luma([if x < 5 { 20 } else { 200 }]));
        let threshold = otsu_threshold(&gray);
        assert!((20..200).contains(&threshold), "threshold {threshold}");
    }

    #[test]
    fn test_preprocess_binarizes() {
        let frame = two_tone(8, 2, 30, 220);
        let image = preprocess(&frame, &PreprocessConfig::default()).unwrap();
        let gray = image.as_luma8().unwrap();

        assert_eq!(gray.get_pixel(0, 0).0[0], 0);
        assert_eq!(gray.get_pixel(7, 1).0[0], 255);
    }

    #[test]
    fn test_invert_swaps_colors() {
        let frame = two_tone(8, 2, 30, 220);
        let config = PreprocessConfig {
            threshold: Some(128),
            invert: true,
            ..Default::default()
        };
        let image = preprocess(&frame, &config).unwrap();
        let gray = image.as_luma8().unwrap();

        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(7, 0).0[0], 0);
    }

    #[test]
    fn test_scale_resizes() {
        let frame = two_tone(8, 2, 30, 220);
        let config = PreprocessConfig {
            scale: 2.0,
            ..Default::default()
        };
        let image = preprocess(&frame, &config).unwrap();
        assert_eq!((image.width(), image.height()), (16, 4));
    }

    #[test]
    fn test_grayscale_off_keeps_color() {
        let frame = two_tone(4, 4, 10, 250);
        let config = PreprocessConfig {
            grayscale: false,
            ..Default::default()
        };
        let image = preprocess(&frame, &config).unwrap();
        assert!(image.as_rgba8().is_some());
    }

    #[test]
    fn test_malformed_frame_is_rejected() {
        let frame = Frame::new(4, 4, vec![0; 10]);
        assert!(preprocess(&frame, &PreprocessConfig::default()).is_none());
        assert!(preprocess(&Frame::new(0, 0, Vec::new()), &PreprocessConfig::default()).is_none());
    }
}

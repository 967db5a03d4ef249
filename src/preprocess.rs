use image::imageops::FilterType;
use ndarray::Array4;

use crate::error::PredictError;

/// Model input edge length. The classifier was trained on 224x224 crops.
pub const INPUT_SIZE: u32 = 224;

/// Decode uploaded bytes into the model's input tensor: NHWC `(1, 224, 224, 3)`
/// with each channel mapped from `[0, 255]` to `[0.0, 1.0]`.
///
/// The resize stretches to 224x224 without preserving aspect ratio. That is
/// the preprocessing the model was trained against; keep it in sync with
/// training before changing the filter or adding letterboxing.
pub fn image_to_tensor(bytes: &[u8]) -> Result<Array4<f32>, PredictError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PredictError::InvalidImage(e.to_string()))?;

    let rgb = decoded.to_rgb8();
    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let side = INPUT_SIZE as usize;
    let tensor = Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
        resized[(x as u32, y as u32)][c] as f32 / 255.0
    });

    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 100])
        });

        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn any_input_size_yields_fixed_shape() {
        for (w, h) in [(512, 64), (64, 512), (224, 224), (1, 1)] {
            let tensor = image_to_tensor(&png_bytes(w, h)).unwrap();
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        }
    }

    #[test]
    fn values_are_normalized_to_unit_range() {
        let tensor = image_to_tensor(&png_bytes(512, 512)).unwrap();
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn uniform_image_maps_pixels_to_fraction_of_255() {
        let img = image::RgbImage::from_pixel(100, 100, image::Rgb([51, 102, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();

        let tensor = image_to_tensor(&buf).unwrap();
        assert!((tensor[[0, 0, 0, 0]] - 51.0 / 255.0).abs() < 1e-6);
        assert!((tensor[[0, 112, 112, 1]] - 102.0 / 255.0).abs() < 1e-6);
        assert!((tensor[[0, 223, 223, 2]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let err = image_to_tensor(b"this is definitely not an image").unwrap_err();
        assert!(matches!(err, PredictError::InvalidImage(_)));
    }
}

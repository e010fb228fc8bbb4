use image::{GrayImage, Luma, Rgb, RgbImage};
use palette::{Gradient, LinSrgb};

use crate::field::HeightField;

// Height -> gray byte. `as u8` saturates, so heights outside [0, 1] clamp to black or white.
#[inline]
fn height_to_gray(h: f64) -> u8 {
    (h * 255.0) as u8
}

// One gray pixel per cell: x = column, y = row
pub fn to_grayscale_image(field: &HeightField) -> GrayImage {
    GrayImage::from_fn(field.cols() as u32, field.rows() as u32, |x, y| {
        Luma([height_to_gray(field.get(y as usize, x as usize))])
    })
}

// Deep water to beach to grass to rock to snow
fn terrain_gradient() -> Gradient<LinSrgb> {
    Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.0, 0.0, 0.5)), // deep blue
        (0.30, LinSrgb::new(0.0, 0.5, 1.0)), // shallow water
        (0.35, LinSrgb::new(0.8, 0.8, 0.5)), // sand
        (0.50, LinSrgb::new(0.1, 0.6, 0.2)), // green
        (0.75, LinSrgb::new(0.5, 0.4, 0.3)), // rock
        (1.00, LinSrgb::new(1.0, 1.0, 1.0)), // snow
    ])
}

// Colored rendering; heights are clamped into the gradient's [0, 1] domain
pub fn to_terrain_image(field: &HeightField) -> RgbImage {
    let gradient = terrain_gradient();
    RgbImage::from_fn(field.cols() as u32, field.rows() as u32, |x, y| {
        let h = field.get(y as usize, x as usize).clamp(0.0, 1.0) as f32;
        let rgb = gradient.get(h).into_format::<u8>();
        Rgb([rgb.red, rgb.green, rgb.blue])
    })
}

// Stretch heights linearly onto [0, 1]; a flat field becomes 0.5
pub fn normalize(field: &mut HeightField) {
    let Some((min, max)) = field.min_max() else {
        return;
    };
    let range = max - min;
    for v in field.as_mut_slice() {
        *v = if range > f64::EPSILON {
            (*v - min) / range
        } else {
            0.5
        };
    }
}

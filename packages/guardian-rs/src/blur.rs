//! Separable Gaussian blur used to obscure detected text.
//!
//! Only pixels inside the region are read. Borders mirror without repeating the
//! edge pixel (`gfedcb|abcdefgh|gfedcba`), the default of most image libraries.
use image::{Rgb, RgbImage};

/// Normalised 1-D Gaussian weights for an odd `size`.
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
  let size = size.max(1) as usize;
  let center = (size as f64 - 1.0) / 2.0;
  let two_sigma_sq = 2.0 * f64::from(sigma) * f64::from(sigma);

  let raw: Vec<f64> = (0..size)
    .map(|i| {
      let d = i as f64 - center;
      (-(d * d) / two_sigma_sq).exp()
    })
    .collect();
  let sum: f64 = raw.iter().sum();

  raw.into_iter().map(|w| (w / sum) as f32).collect()
}

fn reflect_101(index: i64, len: i64) -> usize {
  if len == 1 {
    return 0;
  }
  let period = 2 * (len - 1);
  let m = index.rem_euclid(period);
  (if m >= len { period - m } else { m }) as usize
}

/// Blurs `region` with the given 1-D kernel applied horizontally then vertically.
pub fn gaussian_blur(region: &RgbImage, kernel: &[f32]) -> RgbImage {
  let (width, height) = region.dimensions();
  if width == 0 || height == 0 || kernel.len() <= 1 {
    return region.clone();
  }

  let w = width as usize;
  let h = height as usize;
  let radius = (kernel.len() / 2) as i64;

  let mut horizontal = vec![[0f32; 3]; w * h];
  for y in 0..h {
    for x in 0..w {
      let mut acc = [0f32; 3];
      for (k, weight) in kernel.iter().enumerate() {
        let sx = reflect_101(x as i64 + k as i64 - radius, w as i64);
        let px = region.get_pixel(sx as u32, y as u32);
        for c in 0..3 {
          acc[c] += weight * f32::from(px[c]);
        }
      }
      horizontal[y * w + x] = acc;
    }
  }

  let mut out = RgbImage::new(width, height);
  for y in 0..h {
    for x in 0..w {
      let mut acc = [0f32; 3];
      for (k, weight) in kernel.iter().enumerate() {
        let sy = reflect_101(y as i64 + k as i64 - radius, h as i64);
        let px = horizontal[sy * w + x];
        for c in 0..3 {
          acc[c] += weight * px[c];
        }
      }
      out.put_pixel(x as u32, y as u32, Rgb(acc.map(to_channel)));
    }
  }

  out
}

fn to_channel(value: f32) -> u8 {
  value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kernel_is_normalised_and_symmetric() {
    let kernel = gaussian_kernel(31, 30.0);
    assert_eq!(kernel.len(), 31);
    let sum: f32 = kernel.iter().sum();
    assert!((sum - 1.0).abs() < 1e-5);
    for i in 0..15 {
      assert!((kernel[i] - kernel[30 - i]).abs() < 1e-7);
    }
    assert!(kernel[15] > kernel[0]);
  }

  #[test]
  fn reflect_101_mirrors_without_edge() {
    let idx: Vec<usize> = (-3..8).map(|i| reflect_101(i, 5)).collect();
    assert_eq!(idx, vec![3, 2, 1, 0, 1, 2, 3, 4, 3, 2, 1]);
    assert_eq!(reflect_101(-7, 1), 0);
  }

  #[test]
  fn uniform_region_is_unchanged() {
    let img = RgbImage::from_pixel(20, 10, Rgb([12, 200, 77]));
    let blurred = gaussian_blur(&img, &gaussian_kernel(31, 30.0));
    assert_eq!(blurred, img);
  }

  #[test]
  fn single_pixel_is_unchanged() {
    let img = RgbImage::from_pixel(1, 1, Rgb([1, 2, 3]));
    assert_eq!(gaussian_blur(&img, &gaussian_kernel(31, 30.0)), img);
  }

  #[test]
  fn stripes_are_smoothed() {
    let img = RgbImage::from_fn(40, 12, |x, _| {
      if x % 2 == 0 {
        Rgb([0, 0, 0])
      } else {
        Rgb([255, 255, 255])
      }
    });
    let blurred = gaussian_blur(&img, &gaussian_kernel(31, 30.0));
    assert_ne!(blurred, img);
    for px in blurred.pixels() {
      assert!(px[0] > 60 && px[0] < 195, "pixel not smoothed: {:?}", px);
    }
  }

  #[test]
  fn trivial_kernel_is_identity() {
    let img = RgbImage::from_fn(5, 5, |x, y| Rgb([(x * 40) as u8, (y * 40) as u8, 0]));
    assert_eq!(gaussian_blur(&img, &gaussian_kernel(1, 1.0)), img);
  }
}

use image::{Rgb, RgbImage};
use std::path::Path;

/// Renders the cost grid as a PNG heat map. Empty cells stay dark, cells
/// carrying one wire are drawn blue, contended cells ramp toward red with
/// their count. Saving is best-effort.
pub fn draw_congestion(costs: &[u32], dim_x: u32, dim_y: u32, filename: &str) {
    if dim_x == 0 || dim_y == 0 || costs.len() != (dim_x as usize) * (dim_y as usize) {
        return;
    }

    let scale = (1024 / dim_x.max(dim_y)).max(1);
    let mut img = RgbImage::from_pixel(dim_x * scale, dim_y * scale, Rgb([20, 20, 20]));

    let max = costs.iter().copied().max().unwrap_or(0).max(2);

    for y in 0..dim_y {
        for x in 0..dim_x {
            let count = costs[(y * dim_x + x) as usize];
            if count == 0 {
                continue;
            }
            let color = if count == 1 {
                Rgb([0, 110, 255])
            } else {
                let t = (count - 1) as f64 / (max - 1) as f64;
                Rgb([(120.0 + 135.0 * t) as u8, 40, 40])
            };
            for py in (y * scale)..((y + 1) * scale) {
                for px in (x * scale)..((x + 1) * scale) {
                    img.put_pixel(px, py, color);
                }
            }
        }
    }

    let _ = img.save(Path::new(filename));
}

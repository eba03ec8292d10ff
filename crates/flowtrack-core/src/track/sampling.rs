use ndarray::Array2;

/// Bilinear sample at (`x`, `y`) with replicated borders.
pub fn sample_clamped(data: &Array2<f32>, x: f32, y: f32) -> f32 {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return 0.0;
    }
    let x = x.clamp(0.0, (w - 1) as f32);
    let y = y.clamp(0.0, (h - 1) as f32);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    data[[y0, x0]] * (1.0 - fx) * (1.0 - fy)
        + data[[y0, x1]] * fx * (1.0 - fy)
        + data[[y1, x0]] * (1.0 - fx) * fy
        + data[[y1, x1]] * fx * fy
}

/// Bilinear sample at (`x`, `y`); positions outside the image read as `None`.
pub fn sample_bounded(data: &Array2<f32>, x: f32, y: f32) -> Option<f32> {
    let (h, w) = data.dim();
    if !(x >= 0.0 && y >= 0.0 && x <= (w as f32 - 1.0) && y <= (h as f32 - 1.0)) {
        return None;
    }
    Some(sample_clamped(data, x, y))
}

/// Central-difference image gradients (d/dx, d/dy) with replicated borders.
pub fn central_gradients(data: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
    let (h, w) = data.dim();
    let mut gx = Array2::<f32>::zeros((h, w));
    let mut gy = Array2::<f32>::zeros((h, w));
    if h == 0 || w == 0 {
        return (gx, gy);
    }

    for row in 0..h {
        let up = row.saturating_sub(1);
        let down = (row + 1).min(h - 1);
        for col in 0..w {
            let left = col.saturating_sub(1);
            let right = (col + 1).min(w - 1);
            gx[[row, col]] = (data[[row, right]] - data[[row, left]]) * 0.5;
            gy[[row, col]] = (data[[down, col]] - data[[up, col]]) * 0.5;
        }
    }

    (gx, gy)
}

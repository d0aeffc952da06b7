/// Approximate a Gaussian blur of standard deviation `sigma` with three
/// successive box blurs over premultiplied RGBA8 data.
///
/// `scratch` is reused between calls to avoid per-pass allocation.
pub fn gaussian_approx(
    data: &mut [u8],
    width: usize,
    height: usize,
    sigma: f32,
    scratch: &mut Vec<u8>,
) {
    if sigma <= 0.0 || width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!(data.len(), width * height * 4);
    let radius = box_radius(sigma);
    if radius == 0 {
        return;
    }
    scratch.resize(data.len(), 0);
    for _ in 0..3 {
        box_pass(data, scratch, width, height, radius, Axis::Horizontal);
        box_pass(scratch, data, width, height, radius, Axis::Vertical);
    }
}

/// Box radius whose three-pass variance matches `sigma²`.
#[inline]
fn box_radius(sigma: f32) -> usize {
    // Three boxes of width w give variance 3 * (w² - 1) / 12.
    let w = (4.0 * sigma * sigma + 1.0).sqrt();
    ((w - 1.0) * 0.5).round().max(0.0) as usize
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn box_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize, axis: Axis) {
    let (lines, len) = match axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };
    let index = |line: usize, i: usize| -> usize {
        match axis {
            Axis::Horizontal => (line * width + i) * 4,
            Axis::Vertical => (i * width + line) * 4,
        }
    };
    let window = (2 * radius + 1) as u32;
    for line in 0..lines {
        let mut sum = [0u32; 4];
        // Pixels outside the edge count as transparent.
        for i in 0..=radius.min(len - 1) {
            let p = index(line, i);
            for c in 0..4 {
                sum[c] += src[p + c] as u32;
            }
        }
        for i in 0..len {
            let p = index(line, i);
            for c in 0..4 {
                dst[p + c] = ((sum[c] + window / 2) / window) as u8;
            }
            let add = i + radius + 1;
            if add < len {
                let q = index(line, add);
                for c in 0..4 {
                    sum[c] += src[q + c] as u32;
                }
            }
            if i >= radius {
                let q = index(line, i - radius);
                for c in 0..4 {
                    sum[c] -= src[q + c] as u32;
                }
            }
        }
    }
}

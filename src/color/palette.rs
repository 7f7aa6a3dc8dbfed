//! Evenly spaced hues used to fill decision tree nodes by class.


/// Returns `n` colors with evenly spaced hues,
/// starting from orange (`#e58139`) for the first class.
///
/// For two classes this is orange and blue (`#399de5`).
pub fn class_palette(n: usize) -> Vec<[u8; 3]> {
    if n == 0 { return Vec::new(); }

    // Saturation and value of every color.
    let (s, v) = (0.75_f64, 0.9_f64);
    let c = s * v;
    let m = v - c;

    let step = 360f64 / n as f64;
    (0..n).map(|i| {
            let h = (25f64 + step * i as f64).floor();
            let h_bar = h / 60f64;
            let x = c * (1f64 - ((h_bar % 2f64) - 1f64).abs());

            let (r, g, b) = match h_bar as usize {
                0 => (c, x, 0f64),
                1 => (x, c, 0f64),
                2 => (0f64, c, x),
                3 => (0f64, x, c),
                4 => (x, 0f64, c),
                5 => (c, 0f64, x),
                _ => (c, x, 0f64),
            };
            [r, g, b].map(|u| (255f64 * (u + m)) as u8)
        })
        .collect()
}

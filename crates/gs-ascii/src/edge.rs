use gs_core::frame::GrayBuffer;

/// Magnitude maximale théorique du Sobel 3×3 : sqrt(2) * 1020.
pub const SOBEL_MAX: f32 = 1442.0;

/// Sobel gradient components at (x, y), borders clamped.
///
/// # Example
/// ```
/// use gs_core::frame::GrayBuffer;
/// use gs_ascii::edge::gradient;
/// let flat = GrayBuffer { data: vec![90; 9], width: 3, height: 3 };
/// assert_eq!(gradient(&flat, 1, 1), (0.0, 0.0));
/// ```
#[must_use]
pub fn gradient(gray: &GrayBuffer, x: u32, y: u32) -> (f32, f32) {
    let (x, y) = (i64::from(x), i64::from(y));
    let at = |dx: i64, dy: i64| f32::from(gray.get_clamped(x + dx, y + dy));

    let (tl, tc, tr) = (at(-1, -1), at(0, -1), at(1, -1));
    let (ml, mr) = (at(-1, 0), at(1, 0));
    let (bl, bc, br) = (at(-1, 1), at(0, 1), at(1, 1));

    let gx = -tl + tr - 2.0 * ml + 2.0 * mr - bl + br;
    let gy = -tl - 2.0 * tc - tr + bl + 2.0 * bc + br;
    (gx, gy)
}

/// Edge magnitude at (x, y), normalized to [0.0, 1.0].
#[must_use]
pub fn detect_edge(gray: &GrayBuffer, x: u32, y: u32) -> f32 {
    let (gx, gy) = gradient(gray, x, y);
    ((gx * gx + gy * gy).sqrt() / SOBEL_MAX).min(1.0)
}

/// Carte d'intensité des contours, inversée.
///
/// Strong edges get low intensity so they land on the densest symbols;
/// flat regions become 255.
///
/// # Example
/// ```
/// use gs_core::frame::GrayBuffer;
/// use gs_ascii::edge::edge_map;
/// let flat = GrayBuffer { data: vec![40; 16], width: 4, height: 4 };
/// assert!(edge_map(&flat).data.iter().all(|&v| v == 255));
/// ```
#[must_use]
pub fn edge_map(gray: &GrayBuffer) -> GrayBuffer {
    let mut data = Vec::with_capacity(gray.data.len());
    for y in 0..gray.height {
        for x in 0..gray.width {
            let mag = (detect_edge(gray, x, y) * 255.0).round() as u8;
            data.push(255 - mag);
        }
    }
    GrayBuffer {
        data,
        width: gray.width,
        height: gray.height,
    }
}

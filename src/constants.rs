//! Defaults used by the plotting and export helpers.

/// Number of grid points per axis of a decision surface.
pub const DEFAULT_GRID_RESOLUTION: usize = 100;
/// Number of color steps of the default decision surface gradient.
pub const DEFAULT_GRADIENT_STEPS:  usize = 255;
/// Lower end of the default gradient (orange, alpha is dropped).
pub const DEFAULT_GRADIENT_LOW:    &str  = "#e5813900";
/// Upper end of the default gradient (blue, alpha is dropped).
pub const DEFAULT_GRADIENT_HIGH:   &str  = "#399de5e0";

/// Scatter marker area in points squared.
pub const MARKER_AREA:             f64   = 60.0;
/// Width of the black marker edge.
pub const MARKER_EDGE_WIDTH:       u32   = 2;
/// Number of bands drawn in a color bar.
pub const COLORBAR_STEPS:          usize = 255;
/// Share of the drawing area width given to the surface
/// when a color bar is attached.
pub const SURFACE_WIDTH_RATIO:     f64   = 0.85;

/// Decimal places used for thresholds and impurities in DOT labels.
pub const DEFAULT_EXPORT_PRECISION: usize = 3;

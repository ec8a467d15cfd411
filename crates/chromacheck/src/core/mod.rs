mod conversion;
mod equality;
mod luminance;
mod named;
mod string;

// conversion
pub(crate) use conversion::{hsl_to_rgb, multiply, oklab_to_rgb, oklch_to_rgb, over, rgb_to_hsl};

// equality
pub use equality::to_eq_bits;

// luminance
pub(crate) use luminance::{contrast_ratio, perceived_brightness, relative_luminance};

// named
pub(crate) use named::lookup;

// string
pub(crate) use string::{normalize, parse};

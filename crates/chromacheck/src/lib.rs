//! # Chromacheck
//!
//! Chromacheck is the color science and compliance engine of a WCAG
//! accessibility auditor. It turns the heterogeneous color notations found in
//! stylesheets and inline styles into a canonical RGB representation, computes
//! perceptually-correct luminance and contrast ratios per the WCAG 2.x
//! formula, and answers compliance questions about them.
//!
//! The main abstractions are:
//!
//!   * [`Rgb`], [`Hsl`], [`Oklch`], and [`Oklab`] are **color values** with an
//!     optional alpha channel. Their constructors clamp out-of-range channels
//!     instead of rejecting them, matching how browsers treat out-of-range
//!     CSS colors.
//!   * [`ParsedColor`] is the result of **parsing a color notation string**,
//!     tagged with its [`Notation`] of origin and always carrying a canonical
//!     RGB form, since all contrast math operates on RGB.
//!   * [`Engine`] bundles the cached operations: parsing, color space
//!     conversion, relative luminance, contrast ratios, WCAG level checks,
//!     batch validation, and the iterative contrast [`Engine::adjust`]ment
//!     search. Every engine owns four bounded LRU caches; a process-wide
//!     engine is available through [`Engine::shared`] and the free functions
//!     [`parse`], [`check`], and [`contrast_ratio`].
//!   * [`simulate`] applies a color-vision-deficiency transform for one of
//!     the three [`Deficiency`] types.
//!
//! The engine is deliberately fail-soft: malformed input yields `None` or
//! [`Ratio::Indeterminate`], never an error, because the engine is invoked
//! from hot paths where interrupting the caller would be disruptive. The
//! strict counterpart for callers that want diagnostics is
//! [`ParsedColor::from_str`](std::str::FromStr), which surfaces a
//! [`ColorFormatError`](error::ColorFormatError).
//!
//!
//! ## Optional Features
//!
//! Chromacheck supports one feature flag:
//!
//!   - **`f64`** selects the eponymous type as floating point type [`Float`]
//!     and `u64` as [`Bits`] instead of `f32` as [`Float`] and `u32` as
//!     [`Bits`]. This feature is enabled by default.

/// The floating point type in use.
#[cfg(feature = "f64")]
pub type Float = f64;
/// The floating point type in use.
#[cfg(not(feature = "f64"))]
pub type Float = f32;

/// [`Float`]'s bits.
#[cfg(feature = "f64")]
pub type Bits = u64;
/// [`Float`]'s bits.
#[cfg(not(feature = "f64"))]
pub type Bits = u32;

mod cache;
mod color;
mod contrast;
mod core;
mod cvd;
pub mod error;

pub use cache::{BoundedCache, CacheStats};
pub use color::{ColorValue, Hsl, Notation, Oklab, Oklch, ParsedColor, Rgb};
pub use contrast::{
    brightness, check, contrast_ratio, contrasting_color, is_large_text, is_light, parse,
    ContrastResult, Engine, EngineStats, Level, Ratio, Verdict,
};
pub use cvd::{simulate, Deficiency};

#[doc(hidden)]
pub use crate::core::to_eq_bits;

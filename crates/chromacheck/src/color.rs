use std::str::FromStr;

use crate::core::{hsl_to_rgb, oklab_to_rgb, oklch_to_rgb, over, rgb_to_hsl};
use crate::error::ColorFormatError;
use crate::Float;

/// Create a new RGB color from integer coordinates.
///
/// Like [`Rgb::new`], this macro creates a new opaque color from integer
/// coordinates. It merely saves the cast to `u8` when the coordinates are
/// literals of another integer type.
#[macro_export]
macro_rules! rgb {
    ($r:expr, $g:expr, $b:expr) => {
        $crate::Rgb::new($r as u8, $g as u8, $b as u8)
    };
}

/// Clamp a channel into its nominal range, mapping not-a-number to the lower
/// bound.
#[inline]
fn clamp_channel(value: Float, min: Float, max: Float) -> Float {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Normalize a hue into `0..360`, mapping non-finite values to zero.
#[inline]
fn normalize_hue(value: Float) -> Float {
    if value.is_finite() {
        value.rem_euclid(360.0)
    } else {
        0.0
    }
}

/// Clamp an optional alpha into unit range.
#[inline]
fn clamp_alpha(alpha: Option<Float>) -> Option<Float> {
    alpha.map(|a| clamp_channel(a, 0.0, 1.0))
}

/// Write a number with limited precision and without trailing zeros, the way
/// CSS serializes color components.
fn format_number(f: &mut std::fmt::Formatter<'_>, value: Float, precision: i32) -> std::fmt::Result {
    let factor = (10.0 as Float).powi(precision);
    let value = (value * factor).round() / factor;
    if value == value.trunc() {
        f.write_fmt(format_args!("{:.0}", value))
    } else {
        f.write_fmt(format_args!("{}", value))
    }
}

fn format_alpha(f: &mut std::fmt::Formatter<'_>, alpha: Option<Float>) -> std::fmt::Result {
    if let Some(alpha) = alpha {
        f.write_str(" / ")?;
        format_number(f, alpha, 4)?;
    }
    Ok(())
}

// ====================================================================================================================

/// An sRGB color with 8-bit coordinates.
///
/// This is the canonical interchange form of the engine: every parsed color
/// carries one, and all luminance and contrast math operates on it. The alpha
/// channel is optional; an absent alpha means fully opaque.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) alpha: Option<Float>,
}

impl Rgb {
    /// Instantiate a new opaque RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: None,
        }
    }

    /// Instantiate a new RGB color with the given alpha, which is clamped
    /// into unit range.
    pub fn with_alpha(r: u8, g: u8, b: u8, alpha: Float) -> Self {
        Self {
            r,
            g,
            b,
            alpha: Some(clamp_channel(alpha, 0.0, 1.0)),
        }
    }

    /// Instantiate a new RGB color from floating point coordinates.
    ///
    /// Out-of-range coordinates are clamped into `0..=255` component-wise and
    /// then rounded. This matches how browsers render out-of-range CSS color
    /// specifications, e.g., `rgb(300 -10 50)`.
    pub fn from_float(r: Float, g: Float, b: Float, alpha: Option<Float>) -> Self {
        #[inline]
        fn quantize(value: Float) -> u8 {
            clamp_channel(value, 0.0, 255.0).round() as u8
        }

        Self {
            r: quantize(r),
            g: quantize(g),
            b: quantize(b),
            alpha: clamp_alpha(alpha),
        }
    }

    /// Access the red coordinate.
    #[inline]
    pub const fn r(&self) -> u8 {
        self.r
    }

    /// Access the green coordinate.
    #[inline]
    pub const fn g(&self) -> u8 {
        self.g
    }

    /// Access the blue coordinate.
    #[inline]
    pub const fn b(&self) -> u8 {
        self.b
    }

    /// Access the three coordinates as an array.
    #[inline]
    pub const fn coordinates(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Access the effective alpha, which is 1.0 if no alpha was given.
    #[inline]
    pub fn alpha(&self) -> Float {
        self.alpha.unwrap_or(1.0)
    }

    /// Determine whether this color is fully opaque.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.alpha() >= 1.0
    }

    /// Strip the alpha channel.
    #[inline]
    #[must_use]
    pub const fn opaque(&self) -> Self {
        Self::new(self.r, self.g, self.b)
    }

    /// Convert this color to HSL. The alpha channel carries over unchanged.
    pub fn to_hsl(&self) -> Hsl {
        rgb_to_hsl(self)
    }

    /// Composite this color over the given opaque backdrop.
    ///
    /// This method applies the Porter-Duff source-over blend per channel and
    /// returns the *effective* rendered color, which is always opaque. An
    /// already opaque color is returned unchanged (modulo the dropped alpha).
    #[must_use]
    pub fn over(&self, backdrop: Rgb) -> Rgb {
        over(self, &backdrop)
    }

    /// Format this color in hashed hexadecimal notation, with two digits per
    /// coordinate and, if this color is translucent, two alpha digits.
    pub fn to_hex(&self) -> String {
        match self.alpha {
            Some(alpha) if alpha < 1.0 => format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r,
                self.g,
                self.b,
                (alpha * 255.0).round() as u8
            ),
            _ => format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
        }
    }

    #[inline]
    pub(crate) const fn raw_alpha(&self) -> Option<Float> {
        self.alpha
    }

    #[inline]
    pub(crate) const fn with_raw_alpha(mut self, alpha: Option<Float>) -> Self {
        self.alpha = alpha;
        self
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("rgb({} {} {}", self.r, self.g, self.b))?;
        format_alpha(f, self.alpha)?;
        f.write_str(")")
    }
}

impl FromStr for Rgb {
    type Err = ColorFormatError;

    /// Parse any supported color notation and return its canonical RGB form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParsedColor::from_str(s).map(|parsed| parsed.rgb())
    }
}

// ====================================================================================================================

/// A color in the cylindrical HSL space.
///
/// The hue ranges `0..360` degrees, saturation and lightness are percentages
/// in `0..=100`. Constructors normalize the hue by its period and clamp the
/// other channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub(crate) h: Float,
    pub(crate) s: Float,
    pub(crate) l: Float,
    pub(crate) alpha: Option<Float>,
}

impl Hsl {
    /// Instantiate a new opaque HSL color.
    pub fn new(h: Float, s: Float, l: Float) -> Self {
        Self {
            h: normalize_hue(h),
            s: clamp_channel(s, 0.0, 100.0),
            l: clamp_channel(l, 0.0, 100.0),
            alpha: None,
        }
    }

    /// Instantiate a new HSL color with the given alpha.
    pub fn with_alpha(h: Float, s: Float, l: Float, alpha: Float) -> Self {
        Self {
            alpha: Some(clamp_channel(alpha, 0.0, 1.0)),
            ..Self::new(h, s, l)
        }
    }

    /// Access the hue in degrees.
    #[inline]
    pub const fn h(&self) -> Float {
        self.h
    }

    /// Access the saturation percentage.
    #[inline]
    pub const fn s(&self) -> Float {
        self.s
    }

    /// Access the lightness percentage.
    #[inline]
    pub const fn l(&self) -> Float {
        self.l
    }

    /// Access the effective alpha, which is 1.0 if no alpha was given.
    #[inline]
    pub fn alpha(&self) -> Float {
        self.alpha.unwrap_or(1.0)
    }

    /// Convert this color to RGB. The alpha channel carries over unchanged.
    pub fn to_rgb(&self) -> Rgb {
        hsl_to_rgb(self)
    }

    #[inline]
    pub(crate) const fn raw_alpha(&self) -> Option<Float> {
        self.alpha
    }

    #[inline]
    pub(crate) const fn with_raw_alpha(mut self, alpha: Option<Float>) -> Self {
        self.alpha = alpha;
        self
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("hsl(")?;
        format_number(f, self.h, 2)?;
        f.write_str(" ")?;
        format_number(f, self.s, 2)?;
        f.write_str("% ")?;
        format_number(f, self.l, 2)?;
        f.write_str("%")?;
        format_alpha(f, self.alpha)?;
        f.write_str(")")
    }
}

// ====================================================================================================================

/// A color in the perceptually uniform, polar Oklch space.
///
/// Lightness is limited to unit range, chroma to `0..=0.4`, and the hue
/// ranges `0..360` degrees. The bounds follow the in-practice gamut of
/// [Oklab](https://bottosson.github.io/posts/oklab/); constructors clamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oklch {
    pub(crate) l: Float,
    pub(crate) c: Float,
    pub(crate) h: Float,
    pub(crate) alpha: Option<Float>,
}

impl Oklch {
    /// Instantiate a new opaque Oklch color.
    pub fn new(l: Float, c: Float, h: Float) -> Self {
        Self {
            l: clamp_channel(l, 0.0, 1.0),
            c: clamp_channel(c, 0.0, 0.4),
            h: normalize_hue(h),
            alpha: None,
        }
    }

    /// Instantiate a new Oklch color with the given alpha.
    pub fn with_alpha(l: Float, c: Float, h: Float, alpha: Float) -> Self {
        Self {
            alpha: Some(clamp_channel(alpha, 0.0, 1.0)),
            ..Self::new(l, c, h)
        }
    }

    /// Access the lightness.
    #[inline]
    pub const fn l(&self) -> Float {
        self.l
    }

    /// Access the chroma.
    #[inline]
    pub const fn c(&self) -> Float {
        self.c
    }

    /// Access the hue in degrees.
    #[inline]
    pub const fn h(&self) -> Float {
        self.h
    }

    /// Access the effective alpha, which is 1.0 if no alpha was given.
    #[inline]
    pub fn alpha(&self) -> Float {
        self.alpha.unwrap_or(1.0)
    }

    /// Convert this color to RGB.
    ///
    /// Out-of-gamut results are clamped into `0..=255` component-wise rather
    /// than rejected, matching how browsers render out-of-gamut Oklch
    /// specifications. The alpha channel carries over unchanged.
    pub fn to_rgb(&self) -> Rgb {
        oklch_to_rgb(self)
    }

    #[inline]
    pub(crate) const fn raw_alpha(&self) -> Option<Float> {
        self.alpha
    }

    #[inline]
    pub(crate) const fn with_raw_alpha(mut self, alpha: Option<Float>) -> Self {
        self.alpha = alpha;
        self
    }
}

impl std::fmt::Display for Oklch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("oklch(")?;
        format_number(f, self.l, 4)?;
        f.write_str(" ")?;
        format_number(f, self.c, 4)?;
        f.write_str(" ")?;
        format_number(f, self.h, 2)?;
        format_alpha(f, self.alpha)?;
        f.write_str(")")
    }
}

// ====================================================================================================================

/// A color in the perceptually uniform, Cartesian Oklab space.
///
/// Lightness is limited to unit range and the a/b axes to `-0.4..=0.4`;
/// constructors clamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oklab {
    pub(crate) l: Float,
    pub(crate) a: Float,
    pub(crate) b: Float,
    pub(crate) alpha: Option<Float>,
}

impl Oklab {
    /// Instantiate a new opaque Oklab color.
    pub fn new(l: Float, a: Float, b: Float) -> Self {
        Self {
            l: clamp_channel(l, 0.0, 1.0),
            a: clamp_channel(a, -0.4, 0.4),
            b: clamp_channel(b, -0.4, 0.4),
            alpha: None,
        }
    }

    /// Instantiate a new Oklab color with the given alpha.
    pub fn with_alpha(l: Float, a: Float, b: Float, alpha: Float) -> Self {
        Self {
            alpha: Some(clamp_channel(alpha, 0.0, 1.0)),
            ..Self::new(l, a, b)
        }
    }

    /// Access the lightness.
    #[inline]
    pub const fn l(&self) -> Float {
        self.l
    }

    /// Access the a (green/red) coordinate.
    #[inline]
    pub const fn a(&self) -> Float {
        self.a
    }

    /// Access the b (blue/yellow) coordinate.
    #[inline]
    pub const fn b(&self) -> Float {
        self.b
    }

    /// Access the effective alpha, which is 1.0 if no alpha was given.
    #[inline]
    pub fn alpha(&self) -> Float {
        self.alpha.unwrap_or(1.0)
    }

    /// Convert this color to RGB.
    ///
    /// Out-of-gamut results are clamped into `0..=255` component-wise rather
    /// than rejected. The alpha channel carries over unchanged.
    pub fn to_rgb(&self) -> Rgb {
        oklab_to_rgb(self)
    }

    #[inline]
    pub(crate) const fn raw_alpha(&self) -> Option<Float> {
        self.alpha
    }

    #[inline]
    pub(crate) const fn with_raw_alpha(mut self, alpha: Option<Float>) -> Self {
        self.alpha = alpha;
        self
    }
}

impl std::fmt::Display for Oklab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("oklab(")?;
        format_number(f, self.l, 4)?;
        f.write_str(" ")?;
        format_number(f, self.a, 4)?;
        f.write_str(" ")?;
        format_number(f, self.b, 4)?;
        format_alpha(f, self.alpha)?;
        f.write_str(")")
    }
}

// ====================================================================================================================

/// A color value in one of the supported color space representations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorValue {
    Rgb(Rgb),
    Hsl(Hsl),
    Oklch(Oklch),
    Oklab(Oklab),
}

impl ColorValue {
    /// Convert this value to its canonical RGB form.
    pub fn to_rgb(&self) -> Rgb {
        match self {
            Self::Rgb(rgb) => *rgb,
            Self::Hsl(hsl) => hsl.to_rgb(),
            Self::Oklch(oklch) => oklch.to_rgb(),
            Self::Oklab(oklab) => oklab.to_rgb(),
        }
    }

    /// Access the effective alpha, which is 1.0 if no alpha was given.
    pub fn alpha(&self) -> Float {
        match self {
            Self::Rgb(rgb) => rgb.alpha(),
            Self::Hsl(hsl) => hsl.alpha(),
            Self::Oklch(oklch) => oklch.alpha(),
            Self::Oklab(oklab) => oklab.alpha(),
        }
    }
}

/// The notation a color string was authored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notation {
    /// Hashed hexadecimal, i.e., `#rgb`, `#rgba`, `#rrggbb`, or `#rrggbbaa`.
    Hex,
    /// The `rgb()` or `rgba()` function.
    RgbFn,
    /// The `hsl()` or `hsla()` function.
    HslFn,
    /// The `oklch()` function.
    OklchFn,
    /// The `oklab()` function.
    OklabFn,
    /// A CSS named-color keyword.
    Named,
}

impl std::fmt::Display for Notation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Hex => "hexadecimal",
            Self::RgbFn => "rgb()",
            Self::HslFn => "hsl()",
            Self::OklchFn => "oklch()",
            Self::OklabFn => "oklab()",
            Self::Named => "named color",
        };

        f.write_str(s)
    }
}

// ====================================================================================================================

/// A successfully parsed color.
///
/// A parsed color combines the [`Notation`] it was authored in, the
/// normalized source text, the space-specific [`ColorValue`], and the
/// canonical [`Rgb`] form. The canonical form is always populated regardless
/// of notation, since the contrast engine operates only on RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedColor {
    notation: Notation,
    text: String,
    rgb: Rgb,
    value: ColorValue,
}

impl ParsedColor {
    pub(crate) fn new(notation: Notation, text: String, rgb: Rgb, value: ColorValue) -> Self {
        Self {
            notation,
            text,
            rgb,
            value,
        }
    }

    /// Access the notation this color was authored in.
    #[inline]
    pub const fn notation(&self) -> Notation {
        self.notation
    }

    /// Access the normalized source text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Access the canonical RGB form.
    #[inline]
    pub const fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// Access the space-specific color value.
    #[inline]
    pub const fn value(&self) -> ColorValue {
        self.value
    }
}

impl FromStr for ParsedColor {
    type Err = ColorFormatError;

    /// Parse the string into a color.
    ///
    /// This is the strict, error-reporting counterpart of the fail-soft
    /// [`parse`](crate::parse) function. It recognizes the same notations and
    /// performs the same normalization but surfaces a [`ColorFormatError`]
    /// for malformed input. It does not consult the parse cache.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::core::parse(s)
    }
}

impl std::fmt::Display for ParsedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

// ====================================================================================================================

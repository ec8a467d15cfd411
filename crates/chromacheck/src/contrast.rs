//! The contrast engine.
//!
//! The [`Engine`] ties the parser, the color space conversions, and the WCAG
//! 2.x luminance math together and memoizes their results in bounded caches.
//! Its public surface is fail-soft: malformed color strings surface as
//! [`None`] or [`Ratio::Indeterminate`], never as errors or panics, so a
//! single bad declaration cannot abort an audit over thousands of styles.
//! Callers that need to know *why* a string was rejected use the strict
//! [`ParsedColor::from_str`](std::str::FromStr) instead.

use std::sync::LazyLock;

use crate::cache::{self, CacheStats, EngineCaches};
use crate::color::{Hsl, ParsedColor, Rgb};
use crate::core;
use crate::Float;

/// The channel increment of the adjustment search.
const ADJUSTMENT_STEP: u8 = 5;

/// The iteration cap of the adjustment search. It covers the full channel
/// range, since 51 steps of 5 walk a channel from 0 to 255.
const MAX_ADJUSTMENT_STEPS: usize = 51;

// ====================================================================================================================

/// A WCAG 2.x contrast ratio.
///
/// A measured ratio ranges from 1:1 for identical colors to 21:1 for black
/// on white. When either color of a pair cannot be parsed, the ratio is
/// indeterminate instead; [`value`](Self::value) maps that case to the 1:1
/// floor, so downstream threshold checks fail closed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ratio {
    /// A measured ratio in `1..=21`.
    Measured(Float),
    /// The ratio of a pair with at least one unparseable color.
    Indeterminate,
}

impl Ratio {
    /// Access the measured ratio, or 1.0 if this ratio is indeterminate.
    pub fn value(&self) -> Float {
        match self {
            Self::Measured(ratio) => *ratio,
            Self::Indeterminate => 1.0,
        }
    }

    /// Determine whether this ratio was actually measured.
    pub const fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }

    /// Determine whether this ratio meets the conformance level.
    pub fn meets(&self, level: Level) -> bool {
        self.value() >= level.threshold()
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Measured(ratio) => f.write_fmt(format_args!("{:.2}:1", ratio)),
            Self::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

// --------------------------------------------------------------------------------------------------------------------

/// A WCAG 2.x conformance level for a kind of content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Level AA for normal text, requiring 4.5:1.
    AaNormal,
    /// Level AA for large text, requiring 3:1.
    AaLarge,
    /// Level AAA for normal text, requiring 7:1.
    AaaNormal,
    /// Level AAA for large text, requiring 4.5:1.
    AaaLarge,
    /// Non-text user interface components and graphical objects, requiring
    /// 3:1.
    UiComponent,
}

impl Level {
    /// The minimum contrast ratio for this level.
    pub const fn threshold(&self) -> Float {
        match self {
            Self::AaNormal | Self::AaaLarge => 4.5,
            Self::AaLarge | Self::UiComponent => 3.0,
            Self::AaaNormal => 7.0,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AaNormal => "AA",
            Self::AaLarge => "AA (large text)",
            Self::AaaNormal => "AAA",
            Self::AaaLarge => "AAA (large text)",
            Self::UiComponent => "UI component",
        };

        f.write_str(s)
    }
}

/// Determine whether text qualifies as large per WCAG 2.x.
///
/// Text is large if its size is at least 24 pixels, or at least 18.66 pixels
/// at a weight of 700 or more. The pixel boundaries correspond to the 18
/// point and 14 point bold thresholds of the specification and are exact;
/// notably, 18.66 does not round up.
pub fn is_large_text(size: Float, weight: u16) -> bool {
    size >= 24.0 || (size >= 18.66 && weight >= 700)
}

// --------------------------------------------------------------------------------------------------------------------

/// The outcome of checking a color pair against every conformance level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContrastResult {
    ratio: Ratio,
    meets_aa: bool,
    meets_aaa: bool,
    meets_aa_large: bool,
    meets_aaa_large: bool,
    meets_ui_component: bool,
}

impl ContrastResult {
    fn new(ratio: Ratio) -> Self {
        Self {
            ratio,
            meets_aa: ratio.meets(Level::AaNormal),
            meets_aaa: ratio.meets(Level::AaaNormal),
            meets_aa_large: ratio.meets(Level::AaLarge),
            meets_aaa_large: ratio.meets(Level::AaaLarge),
            meets_ui_component: ratio.meets(Level::UiComponent),
        }
    }

    /// Access the contrast ratio.
    #[inline]
    pub const fn ratio(&self) -> Ratio {
        self.ratio
    }

    /// Determine whether the pair meets AA for normal text.
    #[inline]
    pub const fn meets_aa(&self) -> bool {
        self.meets_aa
    }

    /// Determine whether the pair meets AAA for normal text.
    #[inline]
    pub const fn meets_aaa(&self) -> bool {
        self.meets_aaa
    }

    /// Determine whether the pair meets AA for large text.
    #[inline]
    pub const fn meets_aa_large(&self) -> bool {
        self.meets_aa_large
    }

    /// Determine whether the pair meets AAA for large text.
    #[inline]
    pub const fn meets_aaa_large(&self) -> bool {
        self.meets_aaa_large
    }

    /// Determine whether the pair meets the requirement for non-text user
    /// interface components.
    #[inline]
    pub const fn meets_ui_component(&self) -> bool {
        self.meets_ui_component
    }
}

/// The conformance verdict for one entry of a batch validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The entry meets AAA for its kind of text.
    Aaa,
    /// The entry meets AA but not AAA for its kind of text.
    Aa,
    /// The entry meets neither level.
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::Fail => "fail",
        };

        f.write_str(s)
    }
}

// ====================================================================================================================

/// Point-in-time statistics for an engine's four caches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineStats {
    /// Statistics for the parse cache.
    pub parse: CacheStats,
    /// Statistics for the conversion cache.
    pub conversion: CacheStats,
    /// Statistics for the luminance cache.
    pub luminance: CacheStats,
    /// Statistics for the contrast cache.
    pub contrast: CacheStats,
}

impl EngineStats {
    /// Aggregate the four per-cache statistics into one.
    pub fn total(&self) -> CacheStats {
        let size =
            self.parse.size + self.conversion.size + self.luminance.size + self.contrast.size;
        let capacity = self.parse.capacity
            + self.conversion.capacity
            + self.luminance.capacity
            + self.contrast.capacity;

        CacheStats {
            size,
            capacity,
            utilization: size as Float / capacity as Float,
        }
    }
}

// ====================================================================================================================

/// The contrast engine.
///
/// An engine owns four bounded caches, one per kind of derived quantity, and
/// memoizes every parse, conversion, luminance, and contrast computation in
/// them. Engines are independent; tests instantiate their own to observe
/// cache behavior in isolation, whereas applications typically go through
/// [`Engine::shared`] or the module-level convenience functions.
#[derive(Debug)]
pub struct Engine {
    caches: EngineCaches,
}

impl Engine {
    /// Instantiate a new engine with default cache capacities.
    pub fn new() -> Self {
        Self {
            caches: EngineCaches::new(),
        }
    }

    /// Instantiate a new engine with the given cache capacities. Zero
    /// capacities are bumped to one.
    pub fn with_capacities(
        parse: usize,
        conversion: usize,
        luminance: usize,
        contrast: usize,
    ) -> Self {
        Self {
            caches: EngineCaches::with_capacities(parse, conversion, luminance, contrast),
        }
    }

    /// Access the process-wide shared engine.
    pub fn shared() -> &'static Self {
        static SHARED: LazyLock<Engine> = LazyLock::new(Engine::new);
        &SHARED
    }

    // ----------------------------------------------------------------------------------------------------------------

    /// Parse the color string, consulting the parse cache first.
    ///
    /// This method is fail-soft: malformed input yields `None`. Failed
    /// parses are cached just like successful ones, so repeatedly checking
    /// the same malformed declaration stays cheap.
    pub fn parse(&self, s: &str) -> Option<ParsedColor> {
        let text = core::normalize(s);
        if let Some(outcome) = cache::lock(&self.caches.parse).get(&text) {
            return outcome.clone();
        }

        let outcome = core::parse(&text).ok();
        cache::lock(&self.caches.parse).set(text, outcome.clone());
        outcome
    }

    /// Convert the color to HSL, consulting the conversion cache first.
    ///
    /// The cache is keyed on the opaque coordinates; the alpha channel
    /// bypasses the cache and carries over unchanged.
    pub fn to_hsl(&self, color: Rgb) -> Hsl {
        let key = color.coordinates();
        if let Some(&hsl) = cache::lock(&self.caches.conversion).get(&key) {
            return hsl.with_raw_alpha(color.raw_alpha());
        }

        let hsl = core::rgb_to_hsl(&color.opaque());
        cache::lock(&self.caches.conversion).set(key, hsl);
        hsl.with_raw_alpha(color.raw_alpha())
    }

    /// Determine the relative luminance of the color's coordinates,
    /// consulting the luminance cache first. The alpha channel is ignored.
    pub fn luminance(&self, color: Rgb) -> Float {
        let key = color.coordinates();
        if let Some(&luminance) = cache::lock(&self.caches.luminance).get(&key) {
            return luminance;
        }

        let luminance = core::relative_luminance(&key);
        cache::lock(&self.caches.luminance).set(key, luminance);
        luminance
    }

    /// Determine the contrast ratio between the foreground and background
    /// colors, consulting the contrast cache first.
    ///
    /// A translucent foreground is composited over the background before
    /// measuring, since that is the color the user actually sees. The cache
    /// is keyed on the ordered pair of effective coordinates.
    pub fn contrast_ratio_rgb(&self, foreground: Rgb, background: Rgb) -> Float {
        let background = background.opaque();
        let foreground = if foreground.is_opaque() {
            foreground.opaque()
        } else {
            foreground.over(background)
        };

        let key = (foreground.coordinates(), background.coordinates());
        if let Some(&ratio) = cache::lock(&self.caches.contrast).get(&key) {
            return ratio;
        }

        let ratio = core::contrast_ratio(self.luminance(foreground), self.luminance(background));
        cache::lock(&self.caches.contrast).set(key, ratio);
        ratio
    }

    /// Determine the contrast ratio between the foreground and background
    /// color strings. If either string does not parse, the ratio is
    /// [`Ratio::Indeterminate`].
    pub fn contrast_ratio(&self, foreground: &str, background: &str) -> Ratio {
        match (self.parse(foreground), self.parse(background)) {
            (Some(foreground), Some(background)) => {
                Ratio::Measured(self.contrast_ratio_rgb(foreground.rgb(), background.rgb()))
            }
            _ => Ratio::Indeterminate,
        }
    }

    /// Check the foreground and background color strings against every
    /// conformance level at once.
    pub fn check(&self, foreground: &str, background: &str) -> ContrastResult {
        ContrastResult::new(self.contrast_ratio(foreground, background))
    }

    /// Determine whether the foreground and background color strings meet
    /// the conformance level. An unparseable color never meets any level.
    pub fn meets(&self, foreground: &str, background: &str, level: Level) -> bool {
        self.contrast_ratio(foreground, background).meets(level)
    }

    /// Adjust the color towards the target contrast ratio against the
    /// background.
    ///
    /// If the color already meets the target, it is returned unchanged,
    /// modulo compositing a translucent color over the background first.
    /// Otherwise, this method steps every channel by 5 towards white or
    /// black, as directed, until the target is met, a channel-saturated
    /// extreme is reached, or 51 steps have been taken. The return value is
    /// best-effort: if even the extreme falls short of the target, as it
    /// must for targets above the achievable ratio, the extreme is returned.
    pub fn adjust(
        &self,
        color: Rgb,
        background: Rgb,
        target: Float,
        prefer_lighter: bool,
    ) -> Rgb {
        let background = background.opaque();
        let mut current = if color.is_opaque() {
            color.opaque()
        } else {
            color.over(background)
        };

        if self.contrast_ratio_rgb(current, background) >= target {
            return current;
        }

        for _ in 0..MAX_ADJUSTMENT_STEPS {
            let [r, g, b] = current.coordinates();
            current = if prefer_lighter {
                Rgb::new(
                    r.saturating_add(ADJUSTMENT_STEP),
                    g.saturating_add(ADJUSTMENT_STEP),
                    b.saturating_add(ADJUSTMENT_STEP),
                )
            } else {
                Rgb::new(
                    r.saturating_sub(ADJUSTMENT_STEP),
                    g.saturating_sub(ADJUSTMENT_STEP),
                    b.saturating_sub(ADJUSTMENT_STEP),
                )
            };

            if self.contrast_ratio_rgb(current, background) >= target {
                return current;
            }

            let saturated = if prefer_lighter {
                current.coordinates() == [255, 255, 255]
            } else {
                current.coordinates() == [0, 0, 0]
            };
            if saturated {
                break;
            }
        }

        current
    }

    /// Validate a batch of `(foreground, background, is_large_text)` entries
    /// independently of each other. The output order matches the input
    /// order. Entries with unparseable colors fail.
    pub fn batch_validate<'a, I>(&self, entries: I) -> Vec<Verdict>
    where
        I: IntoIterator<Item = (&'a str, &'a str, bool)>,
    {
        entries
            .into_iter()
            .map(|(foreground, background, is_large)| {
                let ratio = self.contrast_ratio(foreground, background).value();
                let (aa, aaa) = if is_large { (3.0, 4.5) } else { (4.5, 7.0) };

                if ratio >= aaa {
                    Verdict::Aaa
                } else if ratio >= aa {
                    Verdict::Aa
                } else {
                    Verdict::Fail
                }
            })
            .collect()
    }

    // ----------------------------------------------------------------------------------------------------------------

    /// Take a snapshot of this engine's cache statistics.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            parse: cache::lock(&self.caches.parse).stats(),
            conversion: cache::lock(&self.caches.conversion).stats(),
            luminance: cache::lock(&self.caches.luminance).stats(),
            contrast: cache::lock(&self.caches.contrast).stats(),
        }
    }

    /// Evict all entries from this engine's caches.
    pub fn flush(&self) {
        self.caches.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

// ====================================================================================================================

/// Parse the color string with the shared engine. See [`Engine::parse`].
pub fn parse(s: &str) -> Option<ParsedColor> {
    Engine::shared().parse(s)
}

/// Determine the contrast ratio between the color strings with the shared
/// engine. See [`Engine::contrast_ratio`].
pub fn contrast_ratio(foreground: &str, background: &str) -> Ratio {
    Engine::shared().contrast_ratio(foreground, background)
}

/// Check the color strings against every conformance level with the shared
/// engine. See [`Engine::check`].
pub fn check(foreground: &str, background: &str) -> ContrastResult {
    Engine::shared().check(foreground, background)
}

/// Determine the perceived brightness of the color on a 0 to 255 scale.
pub fn brightness(color: Rgb) -> Float {
    core::perceived_brightness(&color.coordinates())
}

/// Determine whether the color reads as light, i.e., has a perceived
/// brightness above the midpoint 127.5.
pub fn is_light(color: Rgb) -> bool {
    brightness(color) > 127.5
}

/// Pick black or white as the maximally readable foreground for the color:
/// black on light colors, white on dark ones.
pub fn contrasting_color(color: Rgb) -> Rgb {
    if is_light(color) {
        Rgb::new(0, 0, 0)
    } else {
        Rgb::new(255, 255, 255)
    }
}

// ====================================================================================================================

//! Parsing of color notations.

use crate::color::{ColorValue, Hsl, Notation, Oklab, Oklch, ParsedColor, Rgb};
use crate::error::ColorFormatError;
use crate::Float;

/// Normalize a color string by trimming surrounding whitespace, collapsing
/// interior whitespace runs, and lowercasing ASCII letters. Parsing and cache
/// lookups both operate on the normalized form, so `" RED "` and `"red"`
/// denote the same color and share the same cache entry.
pub(crate) fn normalize(s: &str) -> String {
    let mut text = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(word);
    }
    text.make_ascii_lowercase();
    text
}

/// Parse the string into a color.
///
/// This function recognizes hashed hexadecimal notation with 3, 4, 6, or 8
/// digits, the `rgb()`, `rgba()`, `hsl()`, `hsla()`, `oklch()`, and `oklab()`
/// functions in both legacy comma syntax and modern space syntax, and the CSS
/// named colors. It normalizes its input first, so parsing is insensitive to
/// case and surrounding whitespace.
pub(crate) fn parse(s: &str) -> Result<ParsedColor, ColorFormatError> {
    let text = normalize(s);

    if let Some(digits) = text.strip_prefix('#') {
        let (rgb, value) = parse_hex(digits)?;
        return Ok(ParsedColor::new(Notation::Hex, text, rgb, value));
    }

    type BodyParser = fn(&str) -> Result<(Rgb, ColorValue), ColorFormatError>;
    const FUNCTIONS: [(&str, Notation, BodyParser); 6] = [
        ("rgba", Notation::RgbFn, parse_rgb_function),
        ("rgb", Notation::RgbFn, parse_rgb_function),
        ("hsla", Notation::HslFn, parse_hsl_function),
        ("hsl", Notation::HslFn, parse_hsl_function),
        ("oklch", Notation::OklchFn, parse_oklch_function),
        ("oklab", Notation::OklabFn, parse_oklab_function),
    ];

    for (name, notation, parser) in FUNCTIONS {
        if let Some(rest) = text.strip_prefix(name) {
            let body = rest
                .strip_prefix('(')
                .ok_or(ColorFormatError::NoOpeningParenthesis)?
                .strip_suffix(')')
                .ok_or(ColorFormatError::NoClosingParenthesis)?;
            let (rgb, value) = parser(body)?;
            return Ok(ParsedColor::new(notation, text, rgb, value));
        }
    }

    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_alphabetic()) {
        if text == "transparent" || text == "currentcolor" {
            return Err(ColorFormatError::ContextDependentKeyword);
        }
        if let Some([r, g, b]) = crate::core::lookup(&text) {
            let rgb = Rgb::new(r, g, b);
            return Ok(ParsedColor::new(
                Notation::Named,
                text,
                rgb,
                ColorValue::Rgb(rgb),
            ));
        }
        return Err(ColorFormatError::UnknownKeyword);
    }

    Err(ColorFormatError::UnknownFormat)
}

// --------------------------------------------------------------------------------------------------------------------

fn parse_hex(digits: &str) -> Result<(Rgb, ColorValue), ColorFormatError> {
    let count = digits.chars().count();
    if !matches!(count, 3 | 4 | 6 | 8) {
        return Err(ColorFormatError::UnexpectedCharacters);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorFormatError::MalformedHex);
    }

    // One digit per coordinate doubles up, i.e., #abc is #aabbcc.
    let short = |index: usize| -> Result<u8, ColorFormatError> {
        u8::from_str_radix(&digits[index..index + 1], 16)
            .map(|value| value * 17)
            .map_err(|_| ColorFormatError::MalformedHex)
    };
    let long = |index: usize| -> Result<u8, ColorFormatError> {
        u8::from_str_radix(&digits[index..index + 2], 16)
            .map_err(|_| ColorFormatError::MalformedHex)
    };

    let ([r, g, b], alpha) = match count {
        3 => ([short(0)?, short(1)?, short(2)?], None),
        4 => (
            [short(0)?, short(1)?, short(2)?],
            Some(short(3)? as Float / 255.0),
        ),
        6 => ([long(0)?, long(2)?, long(4)?], None),
        _ => (
            [long(0)?, long(2)?, long(4)?],
            Some(long(6)? as Float / 255.0),
        ),
    };

    let rgb = alpha.map_or_else(|| Rgb::new(r, g, b), |alpha| Rgb::with_alpha(r, g, b, alpha));
    Ok((rgb, ColorValue::Rgb(rgb)))
}

// --------------------------------------------------------------------------------------------------------------------

/// A single component of a functional color notation.
#[derive(Clone, Copy, Debug)]
enum CssNumber {
    /// A plain number, e.g., `0.5` or `255`.
    Number(Float),
    /// A percentage, e.g., `50%`. Its reference range depends on the channel.
    Percent(Float),
    /// An angle in degrees, e.g., `120deg`. Only valid as a hue.
    Angle(Float),
    /// The `none` keyword, which computes as zero.
    None,
}

impl CssNumber {
    /// Resolve for a channel with reference range `0..=255`.
    fn byte_scaled(self) -> Result<Float, ColorFormatError> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Percent(value) => Ok(value / 100.0 * 255.0),
            Self::Angle(_) => Err(ColorFormatError::MalformedNumber),
            Self::None => Ok(0.0),
        }
    }

    /// Resolve for a channel with reference range `0..=1`, i.e., alpha and
    /// Oklab lightness.
    fn unit(self) -> Result<Float, ColorFormatError> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Percent(value) => Ok(value / 100.0),
            Self::Angle(_) => Err(ColorFormatError::MalformedNumber),
            Self::None => Ok(0.0),
        }
    }

    /// Resolve for a channel that *is* a percentage, i.e., HSL saturation and
    /// lightness.
    fn percentage(self) -> Result<Float, ColorFormatError> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Percent(value) => Ok(value),
            Self::Angle(_) => Err(ColorFormatError::MalformedNumber),
            Self::None => Ok(0.0),
        }
    }

    /// Resolve for an Oklab-derived axis, where 100% corresponds to the given
    /// scale.
    fn axis(self, scale: Float) -> Result<Float, ColorFormatError> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Percent(value) => Ok(value / 100.0 * scale),
            Self::Angle(_) => Err(ColorFormatError::MalformedNumber),
            Self::None => Ok(0.0),
        }
    }

    /// Resolve for a hue, which accepts plain numbers and degree angles.
    fn hue(self) -> Result<Float, ColorFormatError> {
        match self {
            Self::Number(value) | Self::Angle(value) => Ok(value),
            Self::Percent(_) => Err(ColorFormatError::MalformedNumber),
            Self::None => Ok(0.0),
        }
    }
}

fn component(s: &str) -> Result<CssNumber, ColorFormatError> {
    if s == "none" {
        return Ok(CssNumber::None);
    }
    if let Some(number) = s.strip_suffix('%') {
        return number
            .parse::<Float>()
            .map(CssNumber::Percent)
            .map_err(|_| ColorFormatError::MalformedNumber);
    }
    if let Some(number) = s.strip_suffix("deg") {
        return number
            .parse::<Float>()
            .map(CssNumber::Angle)
            .map_err(|_| ColorFormatError::MalformedNumber);
    }
    s.parse::<Float>()
        .map(CssNumber::Number)
        .map_err(|_| ColorFormatError::MalformedNumber)
}

/// Split the body of a functional notation into exactly three color
/// components plus an optional alpha, accepting both the legacy comma syntax
/// with the alpha as fourth component and the modern space syntax with the
/// alpha behind a slash.
fn split_components(body: &str) -> Result<([&str; 3], Option<&str>), ColorFormatError> {
    let (components, alpha) = if body.contains(',') {
        let mut parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let alpha = if parts.len() == 4 { parts.pop() } else { None };
        (parts, alpha)
    } else {
        let (components, alpha) = body
            .split_once('/')
            .map_or((body, None), |(components, alpha)| {
                (components, Some(alpha.trim()))
            });
        (components.split_whitespace().collect(), alpha)
    };

    match <[&str; 3]>::try_from(components) {
        Ok(components) => Ok((components, alpha)),
        Err(parts) => Err(if parts.len() < 3 {
            ColorFormatError::MissingComponent
        } else {
            ColorFormatError::TooManyComponents
        }),
    }
}

fn parse_alpha(alpha: Option<&str>) -> Result<Option<Float>, ColorFormatError> {
    alpha.map(|alpha| component(alpha)?.unit()).transpose()
}

fn parse_rgb_function(body: &str) -> Result<(Rgb, ColorValue), ColorFormatError> {
    let ([r, g, b], alpha) = split_components(body)?;
    let rgb = Rgb::from_float(
        component(r)?.byte_scaled()?,
        component(g)?.byte_scaled()?,
        component(b)?.byte_scaled()?,
        parse_alpha(alpha)?,
    );
    Ok((rgb, ColorValue::Rgb(rgb)))
}

fn parse_hsl_function(body: &str) -> Result<(Rgb, ColorValue), ColorFormatError> {
    let ([h, s, l], alpha) = split_components(body)?;
    let h = component(h)?.hue()?;
    let s = component(s)?.percentage()?;
    let l = component(l)?.percentage()?;

    let hsl = parse_alpha(alpha)?
        .map_or_else(|| Hsl::new(h, s, l), |alpha| Hsl::with_alpha(h, s, l, alpha));
    Ok((hsl.to_rgb(), ColorValue::Hsl(hsl)))
}

fn parse_oklch_function(body: &str) -> Result<(Rgb, ColorValue), ColorFormatError> {
    let ([l, c, h], alpha) = split_components(body)?;
    let l = component(l)?.unit()?;
    let c = component(c)?.axis(0.4)?;
    let h = component(h)?.hue()?;

    let oklch = parse_alpha(alpha)?
        .map_or_else(|| Oklch::new(l, c, h), |alpha| Oklch::with_alpha(l, c, h, alpha));
    Ok((oklch.to_rgb(), ColorValue::Oklch(oklch)))
}

fn parse_oklab_function(body: &str) -> Result<(Rgb, ColorValue), ColorFormatError> {
    let ([l, a, b], alpha) = split_components(body)?;
    let l = component(l)?.unit()?;
    let a = component(a)?.axis(0.4)?;
    let b = component(b)?.axis(0.4)?;

    let oklab = parse_alpha(alpha)?
        .map_or_else(|| Oklab::new(l, a, b), |alpha| Oklab::with_alpha(l, a, b, alpha));
    Ok((oklab.to_rgb(), ColorValue::Oklab(oklab)))
}

// ====================================================================================================================

#[cfg(test)]
mod test {
    use super::{normalize, parse};
    use crate::error::ColorFormatError;
    use crate::{rgb, ColorValue, Notation, Rgb};

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  #FFCA00\t"), "#ffca00");
        assert_eq!(normalize("RGB(1, 2, 3)"), "rgb(1, 2, 3)");
        assert_eq!(normalize("rgb( 255   202\t0 )"), "rgb( 255 202 0 )");
    }

    #[test]
    fn test_parse_hex() {
        let color = parse("#fff").expect("valid color");
        assert_eq!(color.notation(), Notation::Hex);
        assert_eq!(color.rgb(), rgb!(255, 255, 255));

        assert_eq!(parse("#abc").expect("valid color").rgb(), rgb!(170, 187, 204));
        assert_eq!(parse("#FFCA00").expect("valid color").rgb(), rgb!(255, 202, 0));
        assert_eq!(parse("#FFCA00").expect("valid color").text(), "#ffca00");

        let translucent = parse("#ff000080").expect("valid color").rgb();
        assert_eq!(translucent.coordinates(), [255, 0, 0]);
        assert!((translucent.alpha() - 128.0 / 255.0).abs() < 1e-6);

        let translucent = parse("#f00a").expect("valid color").rgb();
        assert_eq!(translucent.coordinates(), [255, 0, 0]);
        assert!((translucent.alpha() - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_hex_errors() {
        assert_eq!(parse("#00"), Err(ColorFormatError::UnexpectedCharacters));
        assert_eq!(parse("#00000"), Err(ColorFormatError::UnexpectedCharacters));
        assert_eq!(parse("#0000000"), Err(ColorFormatError::UnexpectedCharacters));
        assert_eq!(parse("#efg"), Err(ColorFormatError::MalformedHex));
        assert_eq!(parse("#ggff00"), Err(ColorFormatError::MalformedHex));
    }

    #[test]
    fn test_parse_rgb_function() {
        let color = parse("rgb(255, 202, 0)").expect("valid color");
        assert_eq!(color.notation(), Notation::RgbFn);
        assert_eq!(color.rgb(), rgb!(255, 202, 0));

        // Modern space syntax, with and without alpha.
        assert_eq!(parse("rgb(255 202 0)").expect("valid color").rgb(), rgb!(255, 202, 0));
        let translucent = parse("rgb(255 0 0 / 0.5)").expect("valid color").rgb();
        assert_eq!(translucent, Rgb::with_alpha(255, 0, 0, 0.5));
        assert_eq!(
            parse("rgb(255 0 0 / 50%)").expect("valid color").rgb(),
            Rgb::with_alpha(255, 0, 0, 0.5)
        );

        // Legacy rgba() with fourth component.
        assert_eq!(
            parse("rgba(255, 0, 0, 0.5)").expect("valid color").rgb(),
            Rgb::with_alpha(255, 0, 0, 0.5)
        );

        // Percentages scale to 255, `none` computes as zero, and
        // out-of-range coordinates clamp.
        assert_eq!(parse("rgb(100% 0% 50%)").expect("valid color").rgb(), rgb!(255, 0, 128));
        assert_eq!(parse("rgb(none 255 0)").expect("valid color").rgb(), rgb!(0, 255, 0));
        assert_eq!(parse("rgb(300 -10 50)").expect("valid color").rgb(), rgb!(255, 0, 50));
    }

    #[test]
    fn test_parse_hsl_function() {
        let color = parse("hsl(0 100% 50%)").expect("valid color");
        assert_eq!(color.notation(), Notation::HslFn);
        assert_eq!(color.rgb(), rgb!(255, 0, 0));

        assert_eq!(parse("hsl(120deg 100% 25%)").expect("valid color").rgb(), rgb!(0, 128, 0));
        assert_eq!(parse("hsl(120, 100%, 25%)").expect("valid color").rgb(), rgb!(0, 128, 0));
        assert_eq!(
            parse("hsla(0, 100%, 50%, 0.5)").expect("valid color").rgb(),
            Rgb::with_alpha(255, 0, 0, 0.5)
        );

        // Hues normalize by their period.
        assert_eq!(parse("hsl(480 100% 25%)").expect("valid color").rgb(), rgb!(0, 128, 0));
        assert_eq!(parse("hsl(-240 100% 25%)").expect("valid color").rgb(), rgb!(0, 128, 0));
    }

    #[test]
    fn test_parse_oklch_function() {
        let color = parse("oklch(0.6279553606 0.2576833038 29.2338852)").expect("valid color");
        assert_eq!(color.notation(), Notation::OklchFn);
        let [r, g, b] = color.rgb().coordinates();
        assert!(r >= 254 && g <= 1 && b <= 1, "expected red, got {:?}", [r, g, b]);

        // Lightness percentage scales to 1, chroma percentage to 0.4.
        let white = parse("oklch(100% 0% 0)").expect("valid color");
        assert_eq!(white.rgb(), rgb!(255, 255, 255));
        if let ColorValue::Oklch(oklch) = white.value() {
            assert_eq!(oklch.l(), 1.0);
            assert_eq!(oklch.c(), 0.0);
        } else {
            panic!("expected Oklch value");
        }
    }

    #[test]
    fn test_parse_oklab_function() {
        let color = parse("oklab(1 0 0)").expect("valid color");
        assert_eq!(color.notation(), Notation::OklabFn);
        assert_eq!(color.rgb(), rgb!(255, 255, 255));

        let red = parse("oklab(0.6279553606 0.2248630611 0.1258462981)").expect("valid color");
        let [r, g, b] = red.rgb().coordinates();
        assert!(r >= 254 && g <= 1 && b <= 1, "expected red, got {:?}", [r, g, b]);

        // Axis percentages scale to 0.4.
        let same = parse("oklab(0.5 50% -25%)").expect("valid color");
        if let ColorValue::Oklab(oklab) = same.value() {
            assert_eq!(oklab.a(), 0.2);
            assert_eq!(oklab.b(), -0.1);
        } else {
            panic!("expected Oklab value");
        }
    }

    #[test]
    fn test_parse_named() {
        let color = parse("rebeccapurple").expect("valid color");
        assert_eq!(color.notation(), Notation::Named);
        assert_eq!(color.rgb(), rgb!(102, 51, 153));

        // Normalization makes keyword matching case- and space-insensitive.
        assert_eq!(parse("  RED ").expect("valid color").rgb(), rgb!(255, 0, 0));
        assert_eq!(parse("  RED ").expect("valid color").text(), "red");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(ColorFormatError::UnknownFormat));
        assert_eq!(parse("12"), Err(ColorFormatError::UnknownFormat));
        assert_eq!(parse("color(srgb 1 0 0)"), Err(ColorFormatError::UnknownFormat));

        assert_eq!(parse("bluish"), Err(ColorFormatError::UnknownKeyword));
        assert_eq!(parse("transparent"), Err(ColorFormatError::ContextDependentKeyword));
        assert_eq!(parse("currentColor"), Err(ColorFormatError::ContextDependentKeyword));

        assert_eq!(parse("rgb 0 0 0)"), Err(ColorFormatError::NoOpeningParenthesis));
        assert_eq!(parse("oklab(1 0 0"), Err(ColorFormatError::NoClosingParenthesis));
        assert_eq!(parse("rgb(1..0 0 0)"), Err(ColorFormatError::MalformedNumber));
        assert_eq!(parse("rgb(1, , 3)"), Err(ColorFormatError::MalformedNumber));
        assert_eq!(parse("hsl(120 50%)"), Err(ColorFormatError::MissingComponent));
        assert_eq!(parse("rgb(1 2 3 4 5)"), Err(ColorFormatError::TooManyComponents));
        assert_eq!(parse("rgb(120deg 0 0)"), Err(ColorFormatError::MalformedNumber));
        assert_eq!(parse("hsl(50% 0% 0%)"), Err(ColorFormatError::MalformedNumber));
    }
}

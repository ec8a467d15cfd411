//! Utility module with chromacheck's errors.

/// An erroneous color format.
///
/// This error is the strict counterpart of the fail-soft
/// [`parse`](crate::parse) function. It is surfaced by
/// [`ParsedColor::from_str`](crate::ParsedColor) for callers that want to
/// know *why* a color string was rejected, e.g., linters reporting to a
/// human. The engine itself never propagates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorFormatError {
    /// A color format that does not start with a known prefix such as `#`,
    /// `rgb(`, or `oklch(`, and is not a recognized keyword either.
    UnknownFormat,

    /// A hashed hexadecimal format with an unexpected number of digits. For
    /// example, `#00` is missing a digit, whereas `#0000000` has one too
    /// many.
    UnexpectedCharacters,

    /// A color format that has a malformed hexadecimal number as coordinate.
    /// For example, `#efg` has a malformed third coordinate.
    MalformedHex,

    /// A functional color format without the opening parenthesis. For
    /// example, `rgb 0 0 0)` is missing the opening parenthesis.
    NoOpeningParenthesis,

    /// A functional color format without the closing parenthesis. For
    /// example, `oklab(1 0 0` is missing the closing parenthesis.
    NoClosingParenthesis,

    /// A color format that has a malformed numeric component. For example,
    /// `rgb(1..0 0 0)` has a malformed first component.
    MalformedNumber,

    /// A color format with fewer than three color components. For example,
    /// `hsl(120 50%)` is missing the lightness.
    MissingComponent,

    /// A color format with surplus color components. For example,
    /// `rgb(1 2 3 4 5)` has two components too many.
    TooManyComponents,

    /// A keyword that is not part of the CSS named-color set. For example,
    /// `bluish` names no color.
    UnknownKeyword,

    /// A keyword whose color depends on ambient context that is not
    /// available here, i.e., `transparent` or `currentcolor`.
    ContextDependentKeyword,
}

impl std::fmt::Display for ColorFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ColorFormatError::*;

        match self {
            UnknownFormat => f.write_str(
                "color format should start with `#`, a color function, or a color keyword",
            ),
            UnexpectedCharacters => {
                f.write_str("hexadecimal color should have 3, 4, 6, or 8 digits")
            }
            MalformedHex => {
                f.write_str("color coordinates should be hexadecimal digits but are not")
            }
            NoOpeningParenthesis => {
                f.write_str("color function should include an opening parenthesis but has none")
            }
            NoClosingParenthesis => {
                f.write_str("color function should include a closing parenthesis but has none")
            }
            MalformedNumber => {
                f.write_str("color components should be numbers or percentages but are not")
            }
            MissingComponent => f.write_str("color function should have 3 components but has fewer"),
            TooManyComponents => f.write_str("color function should have 3 components but has more"),
            UnknownKeyword => f.write_str("keyword does not name a CSS color"),
            ContextDependentKeyword => {
                f.write_str("keyword requires ambient context to resolve to a color")
            }
        }
    }
}

impl std::error::Error for ColorFormatError {}

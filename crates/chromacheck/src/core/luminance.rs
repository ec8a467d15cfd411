use crate::Float;

/// Convert the gamma-corrected coordinate to its linear form, using the
/// transfer function from the WCAG 2.x definition of relative luminance.
///
/// WCAG 2.x specifies the threshold as 0.03928 even though IEC 61966-2-1
/// uses 0.04045. The difference is immaterial for 8-bit coordinates, but
/// this module sticks with the published WCAG constant so that computed
/// ratios match those of conformance checkers.
#[inline]
fn linearize(coordinate: u8) -> Float {
    let value = coordinate as Float / 255.0;
    if value <= 0.03928 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Determine the relative luminance of the color, i.e., the Y coordinate of
/// XYZ under the D65 white point, per WCAG 2.x. The result ranges from 0 for
/// black to 1 for white.
pub(crate) fn relative_luminance(coordinates: &[u8; 3]) -> Float {
    let [r, g, b] = *coordinates;

    linearize(r).mul_add(
        0.2126,
        linearize(g).mul_add(0.7152, linearize(b) * 0.0722),
    )
}

/// Determine the contrast ratio between the two relative luminances. The
/// ratio is symmetric in its arguments and ranges from 1:1 to 21:1.
pub(crate) fn contrast_ratio(luminance1: Float, luminance2: Float) -> Float {
    let lighter = luminance1.max(luminance2);
    let darker = luminance1.min(luminance2);
    (lighter + 0.05) / (darker + 0.05)
}

/// Determine the perceived brightness of the color on a 0 to 255 scale.
///
/// Unlike relative luminance, this quantity is computed directly from the
/// gamma-corrected coordinates, as the root of the weighted sum of their
/// squares. It underlies the fast light-or-dark classification with its
/// threshold at 127.5.
pub(crate) fn perceived_brightness(coordinates: &[u8; 3]) -> Float {
    let r = coordinates[0] as Float;
    let g = coordinates[1] as Float;
    let b = coordinates[2] as Float;

    (r * r)
        .mul_add(0.299, (g * g).mul_add(0.587, (b * b) * 0.114))
        .sqrt()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_close_enough;

    #[test]
    fn test_relative_luminance() {
        assert_eq!(relative_luminance(&[0, 0, 0]), 0.0);
        assert_close_enough!(relative_luminance(&[255, 255, 255]), 1.0);

        // The green primary dominates luminance.
        let red = relative_luminance(&[255, 0, 0]);
        let green = relative_luminance(&[0, 255, 0]);
        let blue = relative_luminance(&[0, 0, 255]);
        assert!(blue < red && red < green);
        assert_close_enough!(red, 0.2126);
        assert_close_enough!(green, 0.7152);
        assert_close_enough!(blue, 0.0722);
    }

    #[test]
    fn test_contrast_ratio() {
        let black = relative_luminance(&[0, 0, 0]);
        let white = relative_luminance(&[255, 255, 255]);

        assert_close_enough!(contrast_ratio(black, white), 21.0);
        assert_close_enough!(contrast_ratio(white, white), 1.0);
        assert_eq!(
            contrast_ratio(black, white),
            contrast_ratio(white, black)
        );

        // #767676 is the lightest gray that still clears 4.5:1 on white.
        let gray = relative_luminance(&[118, 118, 118]);
        let ratio = contrast_ratio(gray, white);
        assert!((ratio - 4.54).abs() < 0.01, "ratio {}", ratio);

        // Pure red on white falls just short of 4.5:1.
        let red = relative_luminance(&[255, 0, 0]);
        let ratio = contrast_ratio(red, white);
        assert!((ratio - 3.998).abs() < 0.01, "ratio {}", ratio);
    }

    #[test]
    fn test_perceived_brightness() {
        assert_eq!(perceived_brightness(&[0, 0, 0]), 0.0);
        assert_close_enough!(perceived_brightness(&[255, 255, 255]), 255.0);

        // Yellow reads as bright, navy as dark.
        assert!(perceived_brightness(&[255, 255, 0]) > 128.0);
        assert!(perceived_brightness(&[0, 0, 128]) < 128.0);
    }
}

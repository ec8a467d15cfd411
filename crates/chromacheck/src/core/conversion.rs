use crate::color::{Hsl, Oklab, Oklch, Rgb};
use crate::Float;

/// Multiply the 3 by 3 matrix and 3-element vector with each other, producing
/// a new 3-element vector.
#[inline]
pub(crate) fn multiply(matrix: &[[Float; 3]; 3], vector: &[Float; 3]) -> [Float; 3] {
    let [row1, row2, row3] = matrix;

    [
        row1[0].mul_add(vector[0], row1[1].mul_add(vector[1], row1[2] * vector[2])),
        row2[0].mul_add(vector[0], row2[1].mul_add(vector[1], row2[2] * vector[2])),
        row3[0].mul_add(vector[0], row3[1].mul_add(vector[1], row3[2] * vector[2])),
    ]
}

// --------------------------------------------------------------------------------------------------------------------

/// Convert the color to the cylindrical HSL representation. This is the
/// standard transform; a round trip through [`hsl_to_rgb`] reproduces the
/// original coordinates up to rounding, i.e., within ±1 per channel.
pub(crate) fn rgb_to_hsl(color: &Rgb) -> Hsl {
    let r = color.r() as Float / 255.0;
    let g = color.g() as Float / 255.0;
    let b = color.b() as Float / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;

    let (hue, saturation) = if max == min {
        // Achromatic
        (0.0, 0.0)
    } else {
        let delta = max - min;
        let saturation = if lightness > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let hue = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        (hue * 60.0, saturation)
    };

    Hsl::new(hue, saturation * 100.0, lightness * 100.0).with_raw_alpha(color.raw_alpha())
}

/// Convert the color from the cylindrical HSL representation to RGB.
pub(crate) fn hsl_to_rgb(color: &Hsl) -> Rgb {
    fn hue_component(p: Float, q: Float, mut t: Float) -> Float {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }

        if t < 1.0 / 6.0 {
            (q - p).mul_add(6.0 * t, p)
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            (q - p).mul_add((2.0 / 3.0 - t) * 6.0, p)
        } else {
            p
        }
    }

    let h = color.h() / 360.0;
    let s = color.s() / 100.0;
    let l = color.l() / 100.0;

    let [r, g, b] = if s == 0.0 {
        // Achromatic
        [l, l, l]
    } else {
        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l.mul_add(-s, l + s)
        };
        let p = l.mul_add(2.0, -q);

        [
            hue_component(p, q, h + 1.0 / 3.0),
            hue_component(p, q, h),
            hue_component(p, q, h - 1.0 / 3.0),
        ]
    };

    Rgb::from_float(r * 255.0, g * 255.0, b * 255.0, None).with_raw_alpha(color.raw_alpha())
}

// --------------------------------------------------------------------------------------------------------------------
// https://bottosson.github.io/posts/oklab/#converting-from-linear-srgb-to-oklab

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const OKLAB_TO_LMS: [[Float; 3]; 3] = [
    [ 1.0000000000000000,  0.3963377774000000,  0.2158037573000000 ],
    [ 1.0000000000000000, -0.1055613458000000, -0.0638541728000000 ],
    [ 1.0000000000000000, -0.0894841775000000, -1.2914855480000000 ],
];

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const LMS_TO_LINEAR_SRGB: [[Float; 3]; 3] = [
    [  4.0767416621000000, -3.3077115913000000,  0.2309699292000000 ],
    [ -1.2684380046000000,  2.6097574011000000, -0.3413193965000000 ],
    [ -0.0041960863000000, -0.7034186147000000,  1.7076147010000000 ],
];

/// Convert a linear sRGB coordinate to its gamma-corrected form.
#[inline]
fn linear_to_gamma(value: Float) -> Float {
    let magnitude = value.abs();
    if magnitude <= 0.0031308 {
        value * 12.92
    } else {
        magnitude
            .powf(1.0 / 2.4)
            .mul_add(1.055, -0.055)
            .copysign(value)
    }
}

/// Convert the color from the Cartesian Oklab representation to RGB.
///
/// The conversion runs Oklab through the (non-linear) LMS cone space to
/// linear sRGB and applies the sRGB gamma. Out-of-gamut results are clamped
/// into `0..=255` component-wise rather than rejected, which matches how
/// browsers render out-of-gamut specifications.
pub(crate) fn oklab_to_rgb(color: &Oklab) -> Rgb {
    let [l, m, s] = multiply(&OKLAB_TO_LMS, &[color.l(), color.a(), color.b()]);
    let [r, g, b] = multiply(&LMS_TO_LINEAR_SRGB, &[l.powi(3), m.powi(3), s.powi(3)]);

    Rgb::from_float(
        linear_to_gamma(r) * 255.0,
        linear_to_gamma(g) * 255.0,
        linear_to_gamma(b) * 255.0,
        None,
    )
    .with_raw_alpha(color.raw_alpha())
}

/// Convert the color from the polar Oklch representation to RGB. This is a
/// two-hop conversion through Oklab.
pub(crate) fn oklch_to_rgb(color: &Oklch) -> Rgb {
    let hue_radian = color.h().to_radians();
    let oklab = Oklab::new(
        color.l(),
        color.c() * hue_radian.cos(),
        color.c() * hue_radian.sin(),
    );

    oklab_to_rgb(&oklab).with_raw_alpha(color.raw_alpha())
}

// --------------------------------------------------------------------------------------------------------------------

/// Composite the top color over the opaque backdrop.
///
/// This function applies the Porter-Duff source-over blend per channel, i.e.,
/// `top * alpha + backdrop * (1 - alpha)`, rounding to the nearest integer.
/// The result is the *effective* rendered color against its backdrop and
/// hence always fully opaque.
pub(crate) fn over(top: &Rgb, backdrop: &Rgb) -> Rgb {
    let alpha = top.alpha();

    #[inline]
    fn blend(top: u8, backdrop: u8, alpha: Float) -> Float {
        (top as Float).mul_add(alpha, backdrop as Float * (1.0 - alpha))
    }

    Rgb::from_float(
        blend(top.r(), backdrop.r(), alpha),
        blend(top.g(), backdrop.g(), alpha),
        blend(top.b(), backdrop.b(), alpha),
        None,
    )
}

// ====================================================================================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::rgb;

    #[test]
    fn test_rgb_to_hsl() {
        let red = rgb_to_hsl(&rgb!(255, 0, 0));
        assert_eq!(red.h(), 0.0);
        assert_eq!(red.s(), 100.0);
        assert_eq!(red.l(), 50.0);

        let navy = rgb_to_hsl(&rgb!(0, 0, 128));
        assert_eq!(navy.h(), 240.0);
        assert_eq!(navy.s(), 100.0);
        assert!((navy.l() - 25.1).abs() < 0.1, "navy lightness {}", navy.l());

        let gray = rgb_to_hsl(&rgb!(128, 128, 128));
        assert_eq!(gray.h(), 0.0);
        assert_eq!(gray.s(), 0.0);
    }

    #[test]
    fn test_hsl_to_rgb() {
        assert_eq!(hsl_to_rgb(&Hsl::new(0.0, 100.0, 50.0)), rgb!(255, 0, 0));
        assert_eq!(hsl_to_rgb(&Hsl::new(120.0, 100.0, 25.0)), rgb!(0, 128, 0));
        assert_eq!(hsl_to_rgb(&Hsl::new(0.0, 0.0, 100.0)), rgb!(255, 255, 255));
    }

    #[test]
    fn test_hsl_round_trip() {
        for coordinates in [
            [255_u8, 202, 0],
            [49, 120, 234],
            [30, 41, 59],
            [118, 118, 118],
            [1, 0, 255],
        ] {
            let [r, g, b] = coordinates;
            let color = Rgb::new(r, g, b);
            let [r2, g2, b2] = hsl_to_rgb(&rgb_to_hsl(&color)).coordinates();

            // Round trip must reproduce every channel within ±1.
            assert!(
                (r as i16 - r2 as i16).abs() <= 1
                    && (g as i16 - g2 as i16).abs() <= 1
                    && (b as i16 - b2 as i16).abs() <= 1,
                "round trip of {:?} produced {:?}",
                coordinates,
                [r2, g2, b2],
            );
        }
    }

    #[test]
    fn test_oklab_to_rgb() {
        assert_eq!(oklab_to_rgb(&Oklab::new(1.0, 0.0, 0.0)), rgb!(255, 255, 255));
        assert_eq!(oklab_to_rgb(&Oklab::new(0.0, 0.0, 0.0)), rgb!(0, 0, 0));

        // sRGB red per the Oklab reference implementation.
        let red = oklab_to_rgb(&Oklab::new(0.6279553606, 0.2248630611, 0.1258462981));
        let [r, g, b] = red.coordinates();
        assert!(r >= 254, "red channel {}", r);
        assert!(g <= 1, "green channel {}", g);
        assert!(b <= 1, "blue channel {}", b);
    }

    #[test]
    fn test_oklch_to_rgb() {
        // sRGB red and blue in polar form.
        let red = oklch_to_rgb(&Oklch::new(0.6279553606, 0.2576833038, 29.2338852));
        let [r, g, b] = red.coordinates();
        assert!(r >= 254 && g <= 1 && b <= 1, "expected red, got {:?}", [r, g, b]);

        let blue = oklch_to_rgb(&Oklch::new(0.4520137184, 0.3132143996, 264.0520206));
        let [r, g, b] = blue.coordinates();
        assert!(r <= 1 && g <= 1 && b >= 254, "expected blue, got {:?}", [r, g, b]);
    }

    #[test]
    fn test_out_of_gamut_clamps() {
        // Maximum chroma at high lightness is far outside the sRGB gamut.
        let loud = oklch_to_rgb(&Oklch::new(0.95, 0.4, 145.0));
        let [r, g, b] = loud.coordinates();
        assert!(r <= 255 && g <= 255 && b <= 255, "got {:?}", [r, g, b]);
    }

    #[test]
    fn test_over() {
        assert_eq!(
            over(&Rgb::with_alpha(255, 0, 0, 0.5), &rgb!(0, 0, 255)),
            rgb!(128, 0, 128)
        );
        assert_eq!(
            over(&Rgb::with_alpha(255, 255, 255, 0.5), &rgb!(0, 0, 0)),
            rgb!(128, 128, 128)
        );
        assert_eq!(
            over(&Rgb::with_alpha(255, 0, 0, 1.0), &rgb!(0, 0, 255)),
            rgb!(255, 0, 0)
        );
        assert_eq!(
            over(&Rgb::with_alpha(255, 0, 0, 0.0), &rgb!(0, 0, 255)),
            rgb!(0, 0, 255)
        );
        // The result of compositing is always opaque.
        assert!(over(&Rgb::with_alpha(10, 20, 30, 0.3), &rgb!(0, 0, 0)).is_opaque());
    }
}

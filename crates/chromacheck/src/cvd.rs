//! Simulation of color-vision deficiencies.
//!
//! The simulation answers a question contrast ratios alone cannot: does a
//! palette remain distinguishable for users with dichromatic vision? Each
//! deficiency is modelled as a fixed linear transform of the RGB vector. The
//! transforms are total, so, unlike parsing, simulation has no failure mode.

use crate::color::Rgb;
use crate::core::multiply;
use crate::Float;

#[rustfmt::skip]
const PROTANOPIA: [[Float; 3]; 3] = [
    [ 0.567, 0.433, 0.000 ],
    [ 0.558, 0.442, 0.000 ],
    [ 0.000, 0.242, 0.758 ],
];

#[rustfmt::skip]
const DEUTERANOPIA: [[Float; 3]; 3] = [
    [ 0.625, 0.375, 0.000 ],
    [ 0.700, 0.300, 0.000 ],
    [ 0.000, 0.300, 0.700 ],
];

#[rustfmt::skip]
const TRITANOPIA: [[Float; 3]; 3] = [
    [ 0.950, 0.050, 0.000 ],
    [ 0.000, 0.433, 0.567 ],
    [ 0.000, 0.475, 0.525 ],
];

/// A form of dichromatic color-vision deficiency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Deficiency {
    /// Missing long-wavelength cones, i.e., red-blindness.
    Protanopia,
    /// Missing medium-wavelength cones, i.e., green-blindness.
    Deuteranopia,
    /// Missing short-wavelength cones, i.e., blue-blindness.
    Tritanopia,
}

impl Deficiency {
    const fn matrix(&self) -> &'static [[Float; 3]; 3] {
        match self {
            Self::Protanopia => &PROTANOPIA,
            Self::Deuteranopia => &DEUTERANOPIA,
            Self::Tritanopia => &TRITANOPIA,
        }
    }
}

impl std::fmt::Display for Deficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
        };

        f.write_str(s)
    }
}

/// Simulate how the color appears under the given deficiency.
///
/// The deficiency's matrix is applied to the normalized RGB vector and the
/// result rescaled to 8-bit coordinates. The alpha channel passes through
/// unchanged. Since every matrix row sums to one, achromatic colors are
/// fixed points of the simulation.
pub fn simulate(color: Rgb, deficiency: Deficiency) -> Rgb {
    let [r, g, b] = color.coordinates();
    let vector = [
        r as Float / 255.0,
        g as Float / 255.0,
        b as Float / 255.0,
    ];
    let [r, g, b] = multiply(deficiency.matrix(), &vector);

    Rgb::from_float(r * 255.0, g * 255.0, b * 255.0, color.raw_alpha())
}

// ====================================================================================================================

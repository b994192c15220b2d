//! Easing curves mapping linear progress in `[0, 1]` to eased progress.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const BACK_OVERSHOOT: f64 = 1.70158;
const ELASTIC_PERIOD: f64 = 0.3;

/// Named easing function.
///
/// Names are accepted in kebab form (`cubic-out`) and in the
/// `easeCubicOut` form; see [`Easing::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    SinIn,
    SinOut,
    SinInOut,
    ExpIn,
    ExpOut,
    ExpInOut,
    CircleIn,
    CircleOut,
    CircleInOut,
    BackIn,
    BackOut,
    BounceOut,
    ElasticOut,
}

impl Easing {
    pub const ALL: &'static [Easing] = &[
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::SinIn,
        Easing::SinOut,
        Easing::SinInOut,
        Easing::ExpIn,
        Easing::ExpOut,
        Easing::ExpInOut,
        Easing::CircleIn,
        Easing::CircleOut,
        Easing::CircleInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BounceOut,
        Easing::ElasticOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadIn => "quad-in",
            Easing::QuadOut => "quad-out",
            Easing::QuadInOut => "quad-in-out",
            Easing::CubicIn => "cubic-in",
            Easing::CubicOut => "cubic-out",
            Easing::CubicInOut => "cubic-in-out",
            Easing::QuartIn => "quart-in",
            Easing::QuartOut => "quart-out",
            Easing::QuartInOut => "quart-in-out",
            Easing::SinIn => "sin-in",
            Easing::SinOut => "sin-out",
            Easing::SinInOut => "sin-in-out",
            Easing::ExpIn => "exp-in",
            Easing::ExpOut => "exp-out",
            Easing::ExpInOut => "exp-in-out",
            Easing::CircleIn => "circle-in",
            Easing::CircleOut => "circle-out",
            Easing::CircleInOut => "circle-in-out",
            Easing::BackIn => "back-in",
            Easing::BackOut => "back-out",
            Easing::BounceOut => "bounce-out",
            Easing::ElasticOut => "elastic-out",
        }
    }

    /// Eased progress for linear progress `t`.
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => in_out(t, |t| t * t, |t| 1.0 - (1.0 - t).powi(2)),
            Easing::CubicIn => t.powi(3),
            Easing::CubicOut => (t - 1.0).powi(3) + 1.0,
            Easing::CubicInOut => in_out(t, |t| t.powi(3), |t| 1.0 - (1.0 - t).powi(3)),
            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::QuartInOut => in_out(t, |t| t.powi(4), |t| 1.0 - (1.0 - t).powi(4)),
            Easing::SinIn => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - (t * FRAC_PI_2).cos()
                }
            }
            Easing::SinOut => (t * FRAC_PI_2).sin(),
            Easing::SinInOut => (1.0 - (PI * t).cos()) / 2.0,
            Easing::ExpIn => tpmt(1.0 - t),
            Easing::ExpOut => 1.0 - tpmt(t),
            Easing::ExpInOut => in_out(t, |t| tpmt(1.0 - t), |t| 1.0 - tpmt(t)),
            Easing::CircleIn => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Easing::CircleOut => (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt(),
            Easing::CircleInOut => in_out(
                t,
                |t| 1.0 - (1.0 - t * t).max(0.0).sqrt(),
                |t| (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt(),
            ),
            Easing::BackIn => t * t * ((BACK_OVERSHOOT + 1.0) * t - BACK_OVERSHOOT),
            Easing::BackOut => {
                let t = t - 1.0;
                t * t * ((BACK_OVERSHOOT + 1.0) * t + BACK_OVERSHOOT) + 1.0
            }
            Easing::BounceOut => bounce_out(t),
            Easing::ElasticOut => {
                let shift = ELASTIC_PERIOD / 4.0;
                1.0 - tpmt(t) * ((t + shift) * TAU / ELASTIC_PERIOD).sin()
            }
        }
    }
}

/// Symmetric in-out curve built from an in half and an out half.
fn in_out(t: f64, ease_in: impl Fn(f64) -> f64, ease_out: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        ease_in(t * 2.0) / 2.0
    } else {
        0.5 + ease_out(t * 2.0 - 1.0) / 2.0
    }
}

/// `2^(-10t)` rescaled so it is exactly 1 at 0 and 0 at 1.
fn tpmt(t: f64) -> f64 {
    (2f64.powf(-10.0 * t) - 0.000_976_562_5) * 1.000_977_517_106_549_4
}

fn bounce_out(t: f64) -> f64 {
    const B1: f64 = 4.0 / 11.0;
    const B2: f64 = 6.0 / 11.0;
    const B3: f64 = 8.0 / 11.0;
    const B4: f64 = 3.0 / 4.0;
    const B5: f64 = 9.0 / 11.0;
    const B6: f64 = 10.0 / 11.0;
    const B7: f64 = 15.0 / 16.0;
    const B8: f64 = 21.0 / 22.0;
    const B9: f64 = 63.0 / 64.0;
    const B0: f64 = 1.0 / B1 / B1;

    if t < B1 {
        B0 * t * t
    } else if t < B3 {
        let t = t - B2;
        B0 * t * t + B4
    } else if t < B6 {
        let t = t - B5;
        B0 * t * t + B7
    } else {
        let t = t - B8;
        B0 * t * t + B9
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognised easing names.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown easing '{0}'")]
pub struct UnknownEasing(pub String);

impl FromStr for Easing {
    type Err = UnknownEasing;

    /// Accepts `cubic-out`, `cubic_out`, `easeCubicOut` and `CubicOut`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let squashed = squashed.strip_prefix("ease").unwrap_or(&squashed);
        Easing::ALL
            .iter()
            .copied()
            .find(|easing| easing.as_str().replace('-', "") == squashed)
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_starts_at_zero_and_ends_at_one() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() < 1e-9, "{easing} at 0 = {}", easing.apply(0.0));
            assert!(
                (easing.apply(1.0) - 1.0).abs() < 1e-9,
                "{easing} at 1 = {}",
                easing.apply(1.0)
            );
        }
    }

    #[test]
    fn in_out_curves_pass_through_the_middle() {
        for easing in [
            Easing::QuadInOut,
            Easing::CubicInOut,
            Easing::QuartInOut,
            Easing::SinInOut,
            Easing::ExpInOut,
            Easing::CircleInOut,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-9, "{easing}");
        }
    }

    #[test]
    fn in_curves_lag_and_out_curves_lead() {
        assert!(Easing::CubicIn.apply(0.5) < 0.5);
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
        assert!(Easing::BackIn.apply(0.2) < 0.0);
        assert!(Easing::BackOut.apply(0.8) > 1.0);
    }

    #[test]
    fn names_parse_in_both_styles() {
        assert_eq!("easeCubicOut".parse::<Easing>(), Ok(Easing::CubicOut));
        assert_eq!("cubic-out".parse::<Easing>(), Ok(Easing::CubicOut));
        assert_eq!("easeLinear".parse::<Easing>(), Ok(Easing::Linear));
        assert_eq!("elastic_out".parse::<Easing>(), Ok(Easing::ElasticOut));
        assert_eq!("quad-in-out".parse::<Easing>(), Ok(Easing::QuadInOut));
        assert!("wobble".parse::<Easing>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for easing in Easing::ALL {
            assert_eq!(easing.to_string().parse::<Easing>().unwrap(), *easing);
        }
    }
}

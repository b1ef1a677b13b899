//! Easing curves
//!
//! Each [`EaseType`] is defined by its "in" curve; "out" and "in-out" are
//! derived by reflection so every curve pins `0 -> 0` and `1 -> 1`.

use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseType {
    Linear,
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
    Back,
    Elastic,
    Bounce,
}

impl EaseType {
    pub const ALL: [EaseType; 11] = [
        EaseType::Linear,
        EaseType::Quad,
        EaseType::Cubic,
        EaseType::Quart,
        EaseType::Quint,
        EaseType::Sine,
        EaseType::Expo,
        EaseType::Circ,
        EaseType::Back,
        EaseType::Elastic,
        EaseType::Bounce,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            EaseType::Linear => "Linear",
            EaseType::Quad => "Quad",
            EaseType::Cubic => "Cubic",
            EaseType::Quart => "Quart",
            EaseType::Quint => "Quint",
            EaseType::Sine => "Sine",
            EaseType::Expo => "Expo",
            EaseType::Circ => "Circ",
            EaseType::Back => "Back",
            EaseType::Elastic => "Elastic",
            EaseType::Bounce => "Bounce",
        }
    }

    fn ease_in(self, t: f32) -> f32 {
        match self {
            EaseType::Linear => t,
            EaseType::Quad => t * t,
            EaseType::Cubic => t * t * t,
            EaseType::Quart => t * t * t * t,
            EaseType::Quint => t * t * t * t * t,
            EaseType::Sine => 1.0 - (t * PI * 0.5).cos(),
            EaseType::Expo => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (t - 1.0))
                }
            }
            EaseType::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            EaseType::Back => {
                const S: f32 = 1.70158;
                t * t * ((S + 1.0) * t - S)
            }
            EaseType::Elastic => {
                if t <= 0.0 || t >= 1.0 {
                    t
                } else {
                    -(2f32.powf(10.0 * (t - 1.0))) * ((t - 1.075) * (2.0 * PI) / 0.3).sin()
                }
            }
            EaseType::Bounce => 1.0 - bounce_out(1.0 - t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseMode {
    In,
    Out,
    InOut,
}

impl EaseMode {
    pub const ALL: [EaseMode; 3] = [EaseMode::In, EaseMode::Out, EaseMode::InOut];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            EaseMode::In => "In",
            EaseMode::Out => "Out",
            EaseMode::InOut => "InOut",
        }
    }
}

/// Evaluate an easing curve at `t` (clamped to `0.0..=1.0`).
pub fn ease(t: f32, kind: EaseType, mode: EaseMode) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match mode {
        EaseMode::In => kind.ease_in(t),
        EaseMode::Out => 1.0 - kind.ease_in(1.0 - t),
        EaseMode::InOut => {
            if t < 0.5 {
                kind.ease_in(t * 2.0) * 0.5
            } else {
                1.0 - kind.ease_in((1.0 - t) * 2.0) * 0.5
            }
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_hits_its_endpoints() {
        for kind in EaseType::ALL {
            for mode in EaseMode::ALL {
                assert!(ease(0.0, kind, mode).abs() < 1e-3, "{kind:?} {mode:?} at 0");
                assert!((ease(1.0, kind, mode) - 1.0).abs() < 1e-3, "{kind:?} {mode:?} at 1");
            }
        }
    }

    #[test]
    fn in_out_is_symmetric_at_half() {
        assert!((ease(0.5, EaseType::Cubic, EaseMode::InOut) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn index_round_trips() {
        assert_eq!(EaseType::from_index(3), Some(EaseType::Quart));
        assert_eq!(EaseType::from_index(-1), None);
        assert_eq!(EaseMode::from_index(2), Some(EaseMode::InOut));
    }
}

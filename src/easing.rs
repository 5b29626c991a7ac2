//! Easing curves mapping normalized time to eased normalized time.

use serde::{Deserialize, Serialize};

/// Cubic ease-in-out.
///
/// Accelerates through the first half and decelerates through the second:
/// `4t³` below `0.5`, `1 - (-2t + 2)³ / 2` from `0.5` upward. The input is
/// clamped to `[0, 1]`, so the output always stays in `[0, 1]`.
pub fn cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Selectable easing applied to a leg's positional progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    /// Constant speed along the arc.
    Linear,
    /// Slow lift-off and soft landing.
    #[default]
    CubicInOut,
}

impl Ease {
    /// Evaluates the curve at `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t.clamp(0.0, 1.0),
            Self::CubicInOut => cubic_in_out(t),
        }
    }
}

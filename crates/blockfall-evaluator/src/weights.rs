use serde::{Deserialize, Serialize};

use crate::board_analysis::BoardAnalysis;

/// Coefficients of the linear board evaluation.
///
/// ```text
/// score = lines·cleared_lines + height·aggregate_height + holes·num_holes + bumpiness·bumpiness
/// ```
///
/// Higher scores are better, so `height`, `holes` and `bumpiness` are normally negative.
/// Serialized as the ordered array `[lines, height, holes, bumpiness]`.
///
/// Coefficients are `f32`. Stored files written with double precision load rounded to the
/// nearest `f32`, which is far below the noise of episode scores. The surrogate model widens
/// them to `f64` for fitting.
///
/// # Example
///
/// ```
/// use blockfall_evaluator::weights::Weights;
///
/// let json = serde_json::to_string(&Weights::DEFAULT).unwrap();
/// assert_eq!(json, "[1.0,-0.5,-0.8,-0.3]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Weights {
    pub lines: f32,
    pub height: f32,
    pub holes: f32,
    pub bumpiness: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<[f32; 4]> for Weights {
    fn from([lines, height, holes, bumpiness]: [f32; 4]) -> Self {
        Self {
            lines,
            height,
            holes,
            bumpiness,
        }
    }
}

impl From<Weights> for [f32; 4] {
    fn from(w: Weights) -> Self {
        w.to_array()
    }
}

impl Weights {
    pub const LEN: usize = 4;

    /// Hand-tuned weights used when nothing has been calibrated.
    pub const DEFAULT: Self = Self {
        lines: 1.0,
        height: -0.5,
        holes: -0.8,
        bumpiness: -0.3,
    };

    #[must_use]
    pub const fn new(lines: f32, height: f32, holes: f32, bumpiness: f32) -> Self {
        Self {
            lines,
            height,
            holes,
            bumpiness,
        }
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.lines, self.height, self.holes, self.bumpiness]
    }

    /// Builds weights by calling `f` with each coefficient index in order.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(usize) -> f32,
    {
        Self::from(std::array::from_fn::<_, 4, _>(f))
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|w| w.is_finite())
    }

    /// Scores a board after a drop that cleared `cleared_lines` lines.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn evaluate_board(&self, analysis: &BoardAnalysis, cleared_lines: usize) -> f32 {
        self.lines * cleared_lines as f32
            + self.height * analysis.aggregate_height() as f32
            + self.holes * analysis.num_holes() as f32
            + self.bumpiness * analysis.bumpiness() as f32
    }
}

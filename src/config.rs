//! Parser configuration.

/// Knobs for [`crate::parse::parse_with`]. The defaults match what real-world mocap files need.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOptions {
    /// Maximum nesting depth of a joint (the root is depth 0). Evaluation recurses once per
    /// level, so this also bounds the evaluator's stack usage.
    pub max_depth: usize,

    /// Reject frame lines whose sample count differs from the skeleton's total channel count.
    /// When disabled, short frames read missing samples as 0.0.
    pub check_frame_length: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            check_frame_length: true,
        }
    }
}

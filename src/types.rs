use cgmath::{Decomposed, Quaternion as CgQuaternion, Vector3};

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Position in the joint arena. Index 0 is always the root.
pub type Index = usize;
/// Number of ancestors of a joint (the root has depth 0).
pub type Depth = usize;
pub type Quaternion = CgQuaternion<f64>;
/// Also used for euler angles (in radians) since that's what the evaluator writes.
pub type Position = Vector3<f64>;
/// A rigid transform (scale is always 1.0).
pub type Transform = Decomposed<Position, Quaternion>;

/// One sampled row of channel values for the whole skeleton, in joint declaration order.
pub type Frame = Vec<f64>;

use std::fmt;

use crate::joint::Joint;
use crate::types::*;

/// Arena index of the root joint.
pub const ROOT: Index = 0;

/// A parsed BVH file: the joint hierarchy plus its motion.
///
/// `joints` is the arena the hierarchy lives in. Its order is the file's declaration order, which
/// is also the pre-order traversal of the tree and the order samples are laid out in each frame.
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: Vec<Joint>,
    frames: Vec<Frame>,
    frame_time: f64,
}

///////////////////////////////////////////////////////////////////////////////////////////////////

/// Evaluate `joints[index]` and its whole subtree from `frame`, starting at `cursor`.
/// Returns the cursor just past the last sample consumed by the subtree.
pub fn evaluate(joints: &mut [Joint], index: Index, cursor: usize, frame: &[f64]) -> usize {
    let mut cursor = joints[index].sample(cursor, frame);
    //// children are visited in declaration order, each one picking up where the previous left off
    for i in 0..joints[index].children.len() {
        let child = joints[index].children[i];
        cursor = evaluate(joints, child, cursor, frame);
    }
    cursor
}

///////////////////////////////////////////////////////////////////////////////////////////////////

impl Skeleton {
    /// `joints` must be non-empty, in pre-order, with the root first.
    pub(crate) fn from_parts(joints: Vec<Joint>, frames: Vec<Frame>, frame_time: f64) -> Self {
        debug_assert!(!joints.is_empty() && joints[ROOT].is_root());
        Skeleton {
            joints,
            frames,
            frame_time,
        }
    }

    pub fn root(&self) -> &Joint {
        &self.joints[ROOT]
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, index: Index) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// Index of the first joint called `name`. Names are not required to be unique.
    pub fn joint_index(&self, name: &str) -> Option<Index> {
        self.joints.iter().position(|joint| joint.name == name)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Seconds per frame.
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    pub fn fps(&self) -> f64 {
        1.0 / self.frame_time
    }

    /// Length of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.frames.len() as f64 * self.frame_time
    }

    /// Samples every frame must hold: the sum of all joints' channel counts.
    pub fn channel_count(&self) -> usize {
        self.joints.iter().map(|joint| joint.channels.len()).sum()
    }

    /// Number of ancestors of `joints[index]`, or `None` if there is no such joint.
    pub fn depth(&self, index: Index) -> Option<Depth> {
        let mut depth = 0;
        let mut current = self.joint(index)?.parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.joints[parent].parent;
        }
        Some(depth)
    }

    /// Update every joint's `translation` and `rotation` from frame `pos`.
    ///
    /// Out-of-range positions leave the skeleton untouched and return `false`.
    pub fn evaluate_at(&mut self, pos: usize) -> bool {
        let Some(frame) = self.frames.get(pos) else {
            return false;
        };
        let cursor = evaluate(&mut self.joints, ROOT, 0, frame);
        if cursor != frame.len() {
            log::warn!(
                "frame {} holds {} samples but the hierarchy consumed {}",
                pos,
                frame.len(),
                cursor
            );
        }
        true
    }

    /// Frame to show after `elapsed` seconds of looping playback:
    /// `floor(elapsed / frame_time) % num_frames`.
    pub fn frame_at_time(&self, elapsed: f64) -> Option<usize> {
        if self.frames.is_empty() || self.frame_time.is_nan() || self.frame_time <= 0.0 {
            return None;
        }
        if elapsed.is_nan() || elapsed < 0.0 {
            return None;
        }
        let step = (elapsed / self.frame_time).floor();
        if !step.is_finite() {
            return None;
        }
        //// stay in f64: casting a huge step to an integer would saturate
        Some((step % self.frames.len() as f64) as usize)
    }

    /// World transform of every joint from the last evaluation, in joint order.
    pub fn global_transforms(&self) -> Vec<Transform> {
        let mut transforms: Vec<Transform> = Vec::with_capacity(self.joints.len());
        for joint in &self.joints {
            let local = joint.local_transform();
            //// parents always come before their children, so theirs is already computed
            let global = match joint.parent {
                Some(parent) => transforms[parent] * local,
                None => local,
            };
            transforms.push(global);
        }
        transforms
    }

    pub fn global_positions(&self) -> Vec<Position> {
        self.global_transforms()
            .into_iter()
            .map(|transform| transform.disp)
            .collect()
    }

    /// Splits the joint list into chains like \[\[0,1,2,3\],\[4,5,6,7,8\],\[9,10,11\]\].
    /// A new chain starts whenever a joint isn't the child of the joint listed before it.
    /// Usually the chains are: spine+head, the legs and the arms.
    pub fn kinematic_chains(&self) -> Vec<Vec<Index>> {
        let mut chains: Vec<Vec<Index>> = Vec::new();
        let mut chain: Vec<Index> = Vec::new();
        for (index, joint) in self.joints.iter().enumerate() {
            if index > 0 && joint.parent != Some(index - 1) {
                chains.push(std::mem::take(&mut chain));
            }
            chain.push(index);
        }
        chains.push(chain);
        chains
    }

    fn fmt_joint(&self, f: &mut fmt::Formatter<'_>, index: Index, indent: usize) -> fmt::Result {
        let joint = &self.joints[index];
        let offset = joint.initial_offset;
        writeln!(
            f,
            "{:indent$}{} {} channels ({}, {}, {})",
            "",
            joint.name,
            joint.channels.len(),
            offset.x,
            offset.y,
            offset.z,
            indent = indent
        )?;
        for &child in &joint.children {
            self.fmt_joint(f, child, indent + 2)?;
        }
        Ok(())
    }
}

/// Prints the hierarchy, one joint per line, indented by depth.
impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_joint(f, ROOT, 0)
    }
}

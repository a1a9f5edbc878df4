use cgmath::{Rad, Rotation3, Zero};

use crate::channel::ChannelKind;
use crate::types::*;

/// A node of the skeleton. Joints live in the [`crate::Skeleton`] arena and refer to each other
/// by [`Index`], so `parent` is a plain back-reference and never owns anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub parent: Option<Index>,
    /// In declaration order. Empty for end sites.
    pub children: Vec<Index>,
    /// Fixed at parse time. Its length is the number of samples this joint reads per frame.
    pub channels: Vec<ChannelKind>,
    /// Static displacement from the parent, in the parent's space.
    pub initial_offset: Position,

    /// Local translation from the last evaluation (sampled position + `initial_offset`).
    pub translation: Position,
    /// Local euler angles in radians from the last evaluation.
    pub rotation: Position,
}

impl Joint {
    pub(crate) fn new(name: impl Into<String>, parent: Option<Index>) -> Self {
        Joint {
            name: name.into(),
            parent,
            children: Vec::new(),
            channels: Vec::new(),
            initial_offset: Position::zero(),
            translation: Position::zero(),
            rotation: Position::zero(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// End sites are the leaves of the hierarchy.
    pub fn is_site(&self) -> bool {
        self.children.is_empty()
    }

    /// Overwrite `translation` and `rotation` from this joint's slice of `frame`, starting at
    /// `cursor`. Returns the cursor just past the last sample read.
    ///
    /// Every declared channel consumes one slot. A slot past the end of `frame` reads as 0.0;
    /// the parser rejects such frames unless frame length checking was turned off.
    pub fn sample(&mut self, mut cursor: usize, frame: &[f64]) -> usize {
        self.translation = Position::zero();
        self.rotation = Position::zero();

        for &channel in &self.channels {
            let value = frame.get(cursor).copied().unwrap_or(0.0);
            if channel.is_position() {
                self.translation[channel.axis()] = value;
            } else {
                self.rotation[channel.axis()] = value.to_radians();
            }
            cursor += 1;
        }

        self.translation += self.initial_offset;
        cursor
    }

    /// Local transform from the last evaluation. Euler angles are applied in Y, X, Z order
    /// (`R = Ry * Rx * Rz`), the convention mocap scene graphs use for these files.
    pub fn local_transform(&self) -> Transform {
        let rot = Quaternion::from_angle_y(Rad(self.rotation.y))
            * Quaternion::from_angle_x(Rad(self.rotation.x))
            * Quaternion::from_angle_z(Rad(self.rotation.z));
        Transform {
            scale: 1.0,
            rot,
            disp: self.translation,
        }
    }
}

use std::fmt;

/// One animatable degree of freedom of a joint.
///
/// Every channel declared on a joint consumes exactly one sample per frame, in the order the
/// channels were listed in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::PositionX,
        ChannelKind::PositionY,
        ChannelKind::PositionZ,
        ChannelKind::RotationX,
        ChannelKind::RotationY,
        ChannelKind::RotationZ,
    ];

    /// Map a `CHANNELS` token (e.g. `Xrotation`) to its kind. Tokens are case sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Xposition" => Some(ChannelKind::PositionX),
            "Yposition" => Some(ChannelKind::PositionY),
            "Zposition" => Some(ChannelKind::PositionZ),
            "Xrotation" => Some(ChannelKind::RotationX),
            "Yrotation" => Some(ChannelKind::RotationY),
            "Zrotation" => Some(ChannelKind::RotationZ),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            ChannelKind::PositionX => "Xposition",
            ChannelKind::PositionY => "Yposition",
            ChannelKind::PositionZ => "Zposition",
            ChannelKind::RotationX => "Xrotation",
            ChannelKind::RotationY => "Yrotation",
            ChannelKind::RotationZ => "Zrotation",
        }
    }

    pub fn is_position(self) -> bool {
        matches!(
            self,
            ChannelKind::PositionX | ChannelKind::PositionY | ChannelKind::PositionZ
        )
    }

    pub fn is_rotation(self) -> bool {
        !self.is_position()
    }

    /// 0 for X, 1 for Y, 2 for Z.
    pub fn axis(self) -> usize {
        match self {
            ChannelKind::PositionX | ChannelKind::RotationX => 0,
            ChannelKind::PositionY | ChannelKind::RotationY => 1,
            ChannelKind::PositionZ | ChannelKind::RotationZ => 2,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

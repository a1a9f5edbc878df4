use thiserror::Error;

/// Everything that can go wrong while turning BVH text into a [`crate::Skeleton`].
///
/// Line numbers are 1-based and refer to the input text.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("frame count mismatch: header declares {declared} frames but {parsed} were parsed")]
    FrameCountMismatch { declared: usize, parsed: usize },

    #[error("line {line}: malformed number {token:?}")]
    MalformedNumber { line: usize, token: String },

    #[error("line {line}: {message}")]
    UnexpectedStructure { line: usize, message: String },

    #[error("line {line}: unknown channel {name:?}")]
    UnknownChannel { line: usize, name: String },

    #[error("line {line}: CHANNELS declares {declared} channels but lists {listed}")]
    ChannelCountMismatch {
        line: usize,
        declared: usize,
        listed: usize,
    },

    #[error("missing motion header `{keyword}`")]
    MissingMotionHeader { keyword: &'static str },

    #[error("line {line}: frame {frame} has {found} samples, expected {expected}")]
    FrameLength {
        line: usize,
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: joint nesting exceeds the maximum depth of {max_depth}")]
    TooDeep { line: usize, max_depth: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FormatError>;

impl FormatError {
    pub(crate) fn structure(line: usize, message: impl Into<String>) -> Self {
        FormatError::UnexpectedStructure {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn number(line: usize, token: &str) -> Self {
        FormatError::MalformedNumber {
            line,
            token: token.to_string(),
        }
    }
}

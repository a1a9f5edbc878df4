//! Parser and per-frame evaluator for Biovision Hierarchy (.bvh) motion-capture files.
//!
//! ```no_run
//! let mut skeleton = bvh_motion::load_bvh_from_file("walk.bvh")?;
//! if let Some(pos) = skeleton.frame_at_time(1.25) {
//!     skeleton.evaluate_at(pos);
//! }
//! for joint in skeleton.joints() {
//!     println!("{} {:?} {:?}", joint.name, joint.translation, joint.rotation);
//! }
//! # Ok::<(), bvh_motion::FormatError>(())
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod joint;
pub mod parse;
pub mod skeleton;
pub mod types;

pub use channel::ChannelKind;
pub use config::ParseOptions;
pub use error::{FormatError, Result};
pub use joint::Joint;
pub use parse::{load_bvh_from_file, load_bvh_from_string, parse, parse_with};
pub use skeleton::{evaluate, Skeleton, ROOT};

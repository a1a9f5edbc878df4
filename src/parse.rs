use crate::channel::ChannelKind;
use crate::config::ParseOptions;
use crate::error::{FormatError, Result};
use crate::joint::Joint;
use crate::skeleton::Skeleton;
use crate::types::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::Enumerate;
use std::path::Path;
use std::str::Lines;

///////////////////////////////////////////////////////////////////////////////////////////////////

static RE_FRAMES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Frames:\s*(\S*)").expect("hard-coded regex"));
static RE_FRAME_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Frame Time:\s*(\S*)").expect("hard-coded regex"));

/// `NaN` and `inf` parse as floats but are never valid samples, offsets or frame times.
fn __parse_f64(token: &str, line: usize) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormatError::number(line, token)),
    }
}

fn __parse_usize(token: &str, line: usize) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| FormatError::number(line, token))
}

///////////////////////////////////////////////////////////////////////////////////////////////////

/// Line-by-line reader over a BVH document. Owns nothing but the cursor into the text; the
/// skeleton is only assembled once every section parsed successfully.
struct Parser<'a> {
    lines: Enumerate<Lines<'a>>,
    options: &'a ParseOptions,
    /// 1-based number of the line handed out last.
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, options: &'a ParseOptions) -> Self {
        Parser {
            lines: text.lines().enumerate(),
            options,
            line: 0,
        }
    }

    /// Next trimmed line, or `None` at end of input.
    fn next_line(&mut self) -> Option<&'a str> {
        let (i, line) = self.lines.next()?;
        self.line = i + 1;
        Some(line.trim())
    }

    /////////////////////////////////// HIERARCHY ///////////////////////////////////

    /// Reads everything up to and including the `}` that closes the root.
    fn parse_hierarchy(&mut self) -> Result<Vec<Joint>> {
        let mut joints: Vec<Joint> = Vec::new();
        //// joints whose `}` hasn't been seen yet, innermost last
        let mut open: Vec<Index> = Vec::new();

        while let Some(line) = self.next_line() {
            let mut fields = line.split_whitespace();
            let Some(keyword) = fields.next() else {
                continue;
            };
            let line_no = self.line;

            match keyword {
                "ROOT" => {
                    if !joints.is_empty() {
                        return Err(FormatError::structure(line_no, "ROOT declared twice"));
                    }
                    let name = Self::joint_name(fields.next(), line_no)?;
                    log::debug!("joint 0: ROOT {}", name);
                    joints.push(Joint::new(name, None));
                    open.push(0);
                }
                "JOINT" | "End" => {
                    let Some(&parent) = open.last() else {
                        return Err(FormatError::structure(
                            line_no,
                            format!("{} outside of any open joint", keyword),
                        ));
                    };
                    if open.len() > self.options.max_depth {
                        return Err(FormatError::TooDeep {
                            line: line_no,
                            max_depth: self.options.max_depth,
                        });
                    }
                    let name = Self::joint_name(fields.next(), line_no)?;
                    let index = joints.len();
                    log::debug!("joint {}: {} {} (parent {})", index, keyword, name, parent);
                    joints.push(Joint::new(name, Some(parent)));
                    joints[parent].children.push(index);
                    open.push(index);
                }
                "OFFSET" => {
                    let &current = open.last().ok_or_else(|| {
                        FormatError::structure(line_no, "OFFSET outside of any open joint")
                    })?;
                    let values = fields
                        .map(|token| __parse_f64(token, line_no))
                        .collect::<Result<Vec<f64>>>()?;
                    if values.len() != 3 {
                        return Err(FormatError::structure(
                            line_no,
                            format!("OFFSET needs 3 components, found {}", values.len()),
                        ));
                    }
                    joints[current].initial_offset = Position::new(values[0], values[1], values[2]);
                }
                "CHANNELS" => {
                    let &current = open.last().ok_or_else(|| {
                        FormatError::structure(line_no, "CHANNELS outside of any open joint")
                    })?;
                    let count = fields.next().ok_or_else(|| {
                        FormatError::structure(line_no, "CHANNELS is missing its count")
                    })?;
                    let declared = __parse_usize(count, line_no)?;
                    let channels = fields
                        .map(|name| {
                            ChannelKind::from_token(name).ok_or_else(|| {
                                FormatError::UnknownChannel {
                                    line: line_no,
                                    name: name.to_string(),
                                }
                            })
                        })
                        .collect::<Result<Vec<ChannelKind>>>()?;
                    if channels.len() != declared {
                        return Err(FormatError::ChannelCountMismatch {
                            line: line_no,
                            declared,
                            listed: channels.len(),
                        });
                    }
                    joints[current].channels.extend(channels);
                }
                "}" => {
                    if open.pop().is_none() {
                        return Err(FormatError::structure(line_no, "`}` without an open joint"));
                    }
                    if open.is_empty() {
                        return Ok(joints);
                    }
                }
                "{" | "HIERARCHY" => {}
                _ => {
                    if joints.is_empty() {
                        return Err(FormatError::structure(
                            line_no,
                            format!("expected ROOT, found {:?}", keyword),
                        ));
                    }
                    log::trace!("line {}: ignoring {:?}", line_no, line);
                }
            }
        }

        Err(FormatError::structure(
            self.line,
            if joints.is_empty() {
                "no ROOT joint found"
            } else {
                "unexpected end of input inside the hierarchy"
            },
        ))
    }

    fn joint_name(name: Option<&str>, line: usize) -> Result<String> {
        name.map(str::to_string)
            .ok_or_else(|| FormatError::structure(line, "joint declared without a name"))
    }

    /////////////////////////////////// MOTION ///////////////////////////////////

    /// Skips ahead to the `Frames:` and `Frame Time:` lines. Returns (declared frames, frame time).
    fn parse_motion_header(&mut self) -> Result<(usize, f64)> {
        let mut num_frames: Option<usize> = None;

        while let Some(line) = self.next_line() {
            if let Some(captures) = RE_FRAMES.captures(line) {
                num_frames = Some(__parse_usize(&captures[1], self.line)?);
            } else if let Some(captures) = RE_FRAME_TIME.captures(line) {
                let frame_time = __parse_f64(&captures[1], self.line)?;
                //// motion samples start right after this line
                return match num_frames {
                    Some(num_frames) => Ok((num_frames, frame_time)),
                    None => Err(FormatError::MissingMotionHeader { keyword: "Frames:" }),
                };
            }
        }

        Err(FormatError::MissingMotionHeader {
            keyword: if num_frames.is_none() {
                "Frames:"
            } else {
                "Frame Time:"
            },
        })
    }

    /// One frame per remaining non-empty line.
    fn parse_frames(&mut self, expected_len: usize) -> Result<Vec<Frame>> {
        let mut frames: Vec<Frame> = Vec::new();

        while let Some(line) = self.next_line() {
            if line.is_empty() {
                continue;
            }
            let line_no = self.line;
            let frame = line
                .split_whitespace()
                .map(|token| __parse_f64(token, line_no))
                .collect::<Result<Frame>>()?;

            if self.options.check_frame_length && frame.len() != expected_len {
                return Err(FormatError::FrameLength {
                    line: line_no,
                    frame: frames.len(),
                    expected: expected_len,
                    found: frame.len(),
                });
            }
            frames.push(frame);
        }

        Ok(frames)
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////

fn parse_bvh(text: &str, options: &ParseOptions) -> Result<Skeleton> {
    let mut parser = Parser::new(text, options);

    let joints = parser.parse_hierarchy()?;
    let channel_count: usize = joints.iter().map(|joint| joint.channels.len()).sum();

    let (num_frames, frame_time) = parser.parse_motion_header()?;
    let frames = parser.parse_frames(channel_count)?;

    if frames.len() != num_frames {
        return Err(FormatError::FrameCountMismatch {
            declared: num_frames,
            parsed: frames.len(),
        });
    }

    log::info!(
        "parsed bvh: {} joints, {} channels, {} frames at {}s per frame",
        joints.len(),
        channel_count,
        frames.len(),
        frame_time
    );

    Ok(Skeleton::from_parts(joints, frames, frame_time))
}

//////////////////////////////////////////////////////////////// PUBLIC ////////////////////////////////////////////////////////////////

/// Parse a whole BVH document with default [`ParseOptions`].
pub fn parse(text: &str) -> Result<Skeleton> {
    parse_bvh(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Skeleton> {
    parse_bvh(text, options)
}

/// load a bvh file from a file path
pub fn load_bvh_from_file(file_path: impl AsRef<Path>) -> Result<Skeleton> {
    let contents = std::fs::read_to_string(file_path)?;
    parse(&contents)
}

/// load a bvh file from a string
pub fn load_bvh_from_string(bvh_string: &str) -> Result<Skeleton> {
    parse(bvh_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(hierarchy: &str, motion: &str) -> String {
        format!("HIERARCHY\n{}\nMOTION\n{}", hierarchy, motion)
    }

    const HIP: &str = "ROOT hip\n{\nOFFSET 0 0 0\nCHANNELS 3 Xposition Yposition Zposition\n}";

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let text = "HIERARCHY\r\n\r\nROOT hip\r\n{\r\n  OFFSET 1 2 3\r\n  CHANNELS 1 Yrotation\r\n}\r\nMOTION\r\nFrames: 1\r\nFrame Time: 0.1\r\n\r\n45\r\n\r\n";
        let skeleton = parse(text).unwrap();
        assert_eq!(skeleton.num_frames(), 1);
        assert_eq!(skeleton.root().initial_offset, Position::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn tabs_separate_tokens() {
        let text = wrap(
            "ROOT\thip\n{\n\tOFFSET\t0\t0\t0\n\tCHANNELS\t1\tXposition\n}",
            "Frames:\t1\nFrame Time:\t0.2\n7.5",
        );
        let skeleton = parse(&text).unwrap();
        assert_eq!(skeleton.root().name, "hip");
        assert_eq!(skeleton.frames()[0], vec![7.5]);
        assert_eq!(skeleton.frame_time(), 0.2);
    }

    #[test]
    fn lines_before_the_frame_header_are_skipped() {
        let text = format!("{}\nsome tool wrote this\nMOTION\nFrames: 1\nFrame Time: 0.5\n1 2 3\n", HIP);
        assert_eq!(parse(&text).unwrap().num_frames(), 1);
    }

    #[test]
    fn frame_time_before_frame_count_is_missing_header() {
        let text = wrap(HIP, "Frame Time: 0.1\nFrames: 1\n1 2 3");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, FormatError::MissingMotionHeader { keyword: "Frames:" }));
    }

    #[test]
    fn missing_frame_time_is_reported() {
        let err = parse(&wrap(HIP, "Frames: 1\n")).unwrap_err();
        assert!(matches!(err, FormatError::MissingMotionHeader { keyword: "Frame Time:" }));
    }

    #[test]
    fn malformed_numbers_are_fatal() {
        let bad_offset = wrap(
            "ROOT hip\n{\nOFFSET 0 abc 0\n}",
            "Frames: 0\nFrame Time: 0.1\n",
        );
        match parse(&bad_offset).unwrap_err() {
            FormatError::MalformedNumber { line, token } => {
                assert_eq!(line, 4);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }

        let bad_sample = wrap(HIP, "Frames: 1\nFrame Time: 0.1\n1 x 3");
        assert!(matches!(
            parse(&bad_sample).unwrap_err(),
            FormatError::MalformedNumber { .. }
        ));

        let bad_count = wrap(HIP, "Frames: many\nFrame Time: 0.1\n1 2 3");
        assert!(matches!(
            parse(&bad_count).unwrap_err(),
            FormatError::MalformedNumber { .. }
        ));

        let nan_sample = wrap(HIP, "Frames: 1\nFrame Time: 0.1\n1 NaN 3");
        match parse(&nan_sample).unwrap_err() {
            FormatError::MalformedNumber { token, .. } => assert_eq!(token, "NaN"),
            other => panic!("unexpected error: {other}"),
        }

        let inf_frame_time = wrap(HIP, "Frames: 1\nFrame Time: inf\n1 2 3");
        match parse(&inf_frame_time).unwrap_err() {
            FormatError::MalformedNumber { token, .. } => assert_eq!(token, "inf"),
            other => panic!("unexpected error: {other}"),
        }

        let nan_offset = wrap(
            "ROOT hip\n{\nOFFSET 0 nan 0\n}",
            "Frames: 0\nFrame Time: 0.1\n",
        );
        assert!(matches!(
            parse(&nan_offset).unwrap_err(),
            FormatError::MalformedNumber { line: 4, .. }
        ));
    }

    #[test]
    fn structure_errors() {
        let offset_first = wrap("OFFSET 0 0 0\nROOT hip\n{\n}", "Frames: 0\nFrame Time: 1");
        assert!(matches!(
            parse(&offset_first).unwrap_err(),
            FormatError::UnexpectedStructure { line: 2, .. }
        ));

        let stray_brace = wrap("}", "Frames: 0\nFrame Time: 1");
        assert!(matches!(
            parse(&stray_brace).unwrap_err(),
            FormatError::UnexpectedStructure { .. }
        ));

        let two_roots = wrap("ROOT a\n{\nROOT b\n}", "Frames: 0\nFrame Time: 1");
        assert!(matches!(
            parse(&two_roots).unwrap_err(),
            FormatError::UnexpectedStructure { .. }
        ));

        let unclosed = "HIERARCHY\nROOT a\n{\nJOINT b\n{\n}\n";
        assert!(matches!(
            parse(unclosed).unwrap_err(),
            FormatError::UnexpectedStructure { .. }
        ));

        let short_offset = wrap("ROOT a\n{\nOFFSET 1 2\n}", "Frames: 0\nFrame Time: 1");
        assert!(matches!(
            parse(&short_offset).unwrap_err(),
            FormatError::UnexpectedStructure { .. }
        ));

        let joint_before_root = wrap("JOINT a\n{\n}", "Frames: 0\nFrame Time: 1");
        assert!(matches!(
            parse(&joint_before_root).unwrap_err(),
            FormatError::UnexpectedStructure { line: 2, .. }
        ));

        let end_before_root = wrap("End Site\n{\n}", "Frames: 0\nFrame Time: 1");
        assert!(matches!(
            parse(&end_before_root).unwrap_err(),
            FormatError::UnexpectedStructure { line: 2, .. }
        ));

        let channels_without_count = wrap("ROOT a\n{\nCHANNELS\n}", "Frames: 0\nFrame Time: 1");
        assert!(matches!(
            parse(&channels_without_count).unwrap_err(),
            FormatError::UnexpectedStructure { line: 4, .. }
        ));

        assert!(matches!(
            parse("").unwrap_err(),
            FormatError::UnexpectedStructure { .. }
        ));
    }

    #[test]
    fn channel_errors() {
        let unknown = wrap(
            "ROOT a\n{\nCHANNELS 2 Xposition Wrotation\n}",
            "Frames: 0\nFrame Time: 1",
        );
        match parse(&unknown).unwrap_err() {
            FormatError::UnknownChannel { name, .. } => assert_eq!(name, "Wrotation"),
            other => panic!("unexpected error: {other}"),
        }

        let miscounted = wrap(
            "ROOT a\n{\nCHANNELS 3 Xposition Yposition\n}",
            "Frames: 0\nFrame Time: 1",
        );
        assert!(matches!(
            parse(&miscounted).unwrap_err(),
            FormatError::ChannelCountMismatch {
                declared: 3,
                listed: 2,
                ..
            }
        ));
    }

    #[test]
    fn frame_length_is_checked_unless_disabled() {
        let text = wrap(HIP, "Frames: 1\nFrame Time: 0.1\n1 2");
        assert!(matches!(
            parse(&text).unwrap_err(),
            FormatError::FrameLength {
                expected: 3,
                found: 2,
                ..
            }
        ));

        let options = ParseOptions {
            check_frame_length: false,
            ..ParseOptions::default()
        };
        let mut skeleton = parse_with(&text, &options).unwrap();
        assert!(skeleton.evaluate_at(0));
        assert_eq!(skeleton.root().translation, Position::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn nesting_deeper_than_max_depth_is_rejected() {
        let options = ParseOptions {
            max_depth: 2,
            ..ParseOptions::default()
        };
        let ok = wrap(
            "ROOT a\n{\nJOINT b\n{\nEnd Site\n{\n}\n}\n}",
            "Frames: 0\nFrame Time: 1",
        );
        assert_eq!(parse_with(&ok, &options).unwrap().joints().len(), 3);

        let deep = wrap(
            "ROOT a\n{\nJOINT b\n{\nJOINT c\n{\nEnd Site\n{\n}\n}\n}\n}",
            "Frames: 0\nFrame Time: 1",
        );
        assert!(matches!(
            parse_with(&deep, &options).unwrap_err(),
            FormatError::TooDeep { max_depth: 2, .. }
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_bvh_from_file("/definitely/not/here.bvh").unwrap_err();
        assert!(matches!(err, FormatError::Io(_)));
    }
}

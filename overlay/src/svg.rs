//! Adapters between the canonical segment representation and SVG-style
//! command streams / path-data strings. The core never sees commands; these
//! surfaces materialize segments on the way in and re-insert moves on the
//! way out.

use crate::model::{ArcSegment, Path, Segment, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AbsoluteCommand {
    M(Vec2),
    L(Vec2),
    H(f64),
    V(f64),
    C(Vec2, Vec2, Vec2),
    S(Vec2, Vec2),
    Q(Vec2, Vec2),
    T(Vec2),
    A {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Vec2,
    },
    Z,
}

/// Relative commands carry deltas from the current point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RelativeCommand {
    M(Vec2),
    L(Vec2),
    H(f64),
    V(f64),
    C(Vec2, Vec2, Vec2),
    S(Vec2, Vec2),
    Q(Vec2, Vec2),
    T(Vec2),
    A {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Vec2,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    Absolute(AbsoluteCommand),
    Relative(RelativeCommand),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathDataError {
    /// A command arrived in a position the grammar does not allow.
    #[error("bad path sequence: {0}")]
    BadSequence(&'static str),
    /// The string itself failed to tokenize.
    #[error("invalid path data at byte {0}")]
    Syntax(usize),
}

/// Materialize a command stream into segments. Shorthand and relative forms
/// are resolved here; close emits an explicit line back to the sub-path
/// start.
pub fn path_from_commands(commands: &[PathCommand]) -> Result<Path, PathDataError> {
    let mut path = Vec::new();
    let mut cur = Vec2::ZERO;
    let mut subpath_start: Option<Vec2> = None;
    // Reflection state for the S/T shorthands.
    let mut prev_cubic_control: Option<Vec2> = None;
    let mut prev_quad_control: Option<Vec2> = None;

    for command in commands {
        // Resolve the relative forms into absolute ones up front.
        let absolute = match *command {
            PathCommand::Absolute(abs) => abs,
            PathCommand::Relative(rel) => match rel {
                RelativeCommand::M(d) => AbsoluteCommand::M(cur + d),
                RelativeCommand::L(d) => AbsoluteCommand::L(cur + d),
                RelativeCommand::H(dx) => AbsoluteCommand::H(cur.x + dx),
                RelativeCommand::V(dy) => AbsoluteCommand::V(cur.y + dy),
                RelativeCommand::C(d1, d2, d) => AbsoluteCommand::C(cur + d1, cur + d2, cur + d),
                RelativeCommand::S(d2, d) => AbsoluteCommand::S(cur + d2, cur + d),
                RelativeCommand::Q(d1, d) => AbsoluteCommand::Q(cur + d1, cur + d),
                RelativeCommand::T(d) => AbsoluteCommand::T(cur + d),
                RelativeCommand::A {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    to,
                } => AbsoluteCommand::A {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    to: cur + to,
                },
            },
        };

        if subpath_start.is_none() && !matches!(absolute, AbsoluteCommand::M(_)) {
            return Err(PathDataError::BadSequence("path must start with a move-to"));
        }

        let mut cubic_control = None;
        let mut quad_control = None;

        match absolute {
            AbsoluteCommand::M(p) => {
                cur = p;
                subpath_start = Some(p);
            }
            AbsoluteCommand::L(p) => {
                path.push(Segment::Line(cur, p));
                cur = p;
            }
            AbsoluteCommand::H(x) => {
                let p = Vec2::new(x, cur.y);
                path.push(Segment::Line(cur, p));
                cur = p;
            }
            AbsoluteCommand::V(y) => {
                let p = Vec2::new(cur.x, y);
                path.push(Segment::Line(cur, p));
                cur = p;
            }
            AbsoluteCommand::C(c1, c2, p) => {
                path.push(Segment::Cubic(cur, c1, c2, p));
                cubic_control = Some(c2);
                cur = p;
            }
            AbsoluteCommand::S(c2, p) => {
                let c1 = match prev_cubic_control {
                    Some(prev) => cur * 2.0 - prev,
                    None => cur,
                };
                path.push(Segment::Cubic(cur, c1, c2, p));
                cubic_control = Some(c2);
                cur = p;
            }
            AbsoluteCommand::Q(c, p) => {
                path.push(Segment::Quadratic(cur, c, p));
                quad_control = Some(c);
                cur = p;
            }
            AbsoluteCommand::T(p) => {
                let c = match prev_quad_control {
                    Some(prev) => cur * 2.0 - prev,
                    None => cur,
                };
                path.push(Segment::Quadratic(cur, c, p));
                quad_control = Some(c);
                cur = p;
            }
            AbsoluteCommand::A {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                to,
            } => {
                path.push(Segment::Arc(ArcSegment {
                    start: cur,
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    end: to,
                }));
                cur = to;
            }
            AbsoluteCommand::Z => {
                let start = subpath_start.ok_or(PathDataError::BadSequence("close with no open sub-path"))?;
                path.push(Segment::Line(cur, start));
                cur = start;
            }
        }

        prev_cubic_control = cubic_control;
        prev_quad_control = quad_control;
    }

    Ok(path)
}

/// Render segments back into absolute commands, inserting a move wherever
/// consecutive segments' joint points differ by more than `eps`.
pub fn path_to_commands(path: &Path, eps: f64) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut cur: Option<Vec2> = None;

    for seg in path {
        let start = seg.start();
        if cur.map_or(true, |p| !p.approx_eq(start, eps)) {
            commands.push(PathCommand::Absolute(AbsoluteCommand::M(start)));
        }
        commands.push(PathCommand::Absolute(match *seg {
            Segment::Line(_, p) => AbsoluteCommand::L(p),
            Segment::Quadratic(_, c, p) => AbsoluteCommand::Q(c, p),
            Segment::Cubic(_, c1, c2, p) => AbsoluteCommand::C(c1, c2, p),
            Segment::Arc(arc) => AbsoluteCommand::A {
                rx: arc.rx,
                ry: arc.ry,
                rotation: arc.rotation,
                large_arc: arc.large_arc,
                sweep: arc.sweep,
                to: arc.end,
            },
        }));
        cur = Some(seg.end());
    }

    commands
}

fn skip_separators(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() {
        match bytes[*i] {
            b' ' | b'\t' | b'\n' | b'\r' | b',' => *i += 1,
            _ => break,
        }
    }
}

// SVG numbers pack tightly: "1.5.5" is two numbers and "1-2" is too, so the
// scan stops at a second dot or a non-exponent sign.
fn parse_number(bytes: &[u8], i: &mut usize) -> Option<f64> {
    skip_separators(bytes, i);
    let mut j = *i;
    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
        j += 1;
    }
    let mut digits = 0;
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
        digits += 1;
    }
    if j < bytes.len() && bytes[j] == b'.' {
        j += 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    if j < bytes.len() && (bytes[j] == b'e' || bytes[j] == b'E') {
        let mut k = j + 1;
        if k < bytes.len() && (bytes[k] == b'+' || bytes[k] == b'-') {
            k += 1;
        }
        if k < bytes.len() && bytes[k].is_ascii_digit() {
            while k < bytes.len() && bytes[k].is_ascii_digit() {
                k += 1;
            }
            j = k;
        }
    }
    let text = std::str::from_utf8(&bytes[*i..j]).ok()?;
    let value = text.parse().ok()?;
    *i = j;
    Some(value)
}

// Arc flags are single characters and may be packed against the next number.
fn parse_flag(bytes: &[u8], i: &mut usize) -> Option<bool> {
    skip_separators(bytes, i);
    match bytes.get(*i) {
        Some(b'0') => {
            *i += 1;
            Some(false)
        }
        Some(b'1') => {
            *i += 1;
            Some(true)
        }
        _ => None,
    }
}

/// Tokenize an SVG path-data string into commands.
pub fn commands_from_path_data(d: &str) -> Result<Vec<PathCommand>, PathDataError> {
    let bytes = d.as_bytes();
    let mut i = 0usize;
    let mut last_cmd = 0u8;
    let mut commands = Vec::new();

    loop {
        skip_separators(bytes, &mut i);
        if i >= bytes.len() {
            break;
        }

        let c = bytes[i];
        let cmd = if c.is_ascii_alphabetic() {
            i += 1;
            c
        } else {
            // Implicit repetition of the previous command.
            match last_cmd {
                b'M' => b'L',
                b'm' => b'l',
                0 | b'Z' | b'z' => return Err(PathDataError::Syntax(i)),
                prev => prev,
            }
        };
        last_cmd = cmd;

        let num = |i: &mut usize| parse_number(bytes, i).ok_or(PathDataError::Syntax(*i));
        let point = |i: &mut usize| -> Result<Vec2, PathDataError> {
            let x = parse_number(bytes, i).ok_or(PathDataError::Syntax(*i))?;
            let y = parse_number(bytes, i).ok_or(PathDataError::Syntax(*i))?;
            Ok(Vec2::new(x, y))
        };
        let flag = |i: &mut usize| parse_flag(bytes, i).ok_or(PathDataError::Syntax(*i));

        let command = match cmd {
            b'M' => PathCommand::Absolute(AbsoluteCommand::M(point(&mut i)?)),
            b'm' => PathCommand::Relative(RelativeCommand::M(point(&mut i)?)),
            b'L' => PathCommand::Absolute(AbsoluteCommand::L(point(&mut i)?)),
            b'l' => PathCommand::Relative(RelativeCommand::L(point(&mut i)?)),
            b'H' => PathCommand::Absolute(AbsoluteCommand::H(num(&mut i)?)),
            b'h' => PathCommand::Relative(RelativeCommand::H(num(&mut i)?)),
            b'V' => PathCommand::Absolute(AbsoluteCommand::V(num(&mut i)?)),
            b'v' => PathCommand::Relative(RelativeCommand::V(num(&mut i)?)),
            b'C' => PathCommand::Absolute(AbsoluteCommand::C(point(&mut i)?, point(&mut i)?, point(&mut i)?)),
            b'c' => PathCommand::Relative(RelativeCommand::C(point(&mut i)?, point(&mut i)?, point(&mut i)?)),
            b'S' => PathCommand::Absolute(AbsoluteCommand::S(point(&mut i)?, point(&mut i)?)),
            b's' => PathCommand::Relative(RelativeCommand::S(point(&mut i)?, point(&mut i)?)),
            b'Q' => PathCommand::Absolute(AbsoluteCommand::Q(point(&mut i)?, point(&mut i)?)),
            b'q' => PathCommand::Relative(RelativeCommand::Q(point(&mut i)?, point(&mut i)?)),
            b'T' => PathCommand::Absolute(AbsoluteCommand::T(point(&mut i)?)),
            b't' => PathCommand::Relative(RelativeCommand::T(point(&mut i)?)),
            b'A' => {
                let rx = num(&mut i)?;
                let ry = num(&mut i)?;
                let rotation = num(&mut i)?;
                let large_arc = flag(&mut i)?;
                let sweep = flag(&mut i)?;
                PathCommand::Absolute(AbsoluteCommand::A {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    to: point(&mut i)?,
                })
            }
            b'a' => {
                let rx = num(&mut i)?;
                let ry = num(&mut i)?;
                let rotation = num(&mut i)?;
                let large_arc = flag(&mut i)?;
                let sweep = flag(&mut i)?;
                PathCommand::Relative(RelativeCommand::A {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    to: point(&mut i)?,
                })
            }
            b'Z' | b'z' => PathCommand::Absolute(AbsoluteCommand::Z),
            _ => return Err(PathDataError::Syntax(i - 1)),
        };
        commands.push(command);
    }

    Ok(commands)
}

/// Parse an SVG path-data string straight into segments.
pub fn path_from_path_data(d: &str) -> Result<Path, PathDataError> {
    path_from_commands(&commands_from_path_data(d)?)
}

/// Format a path as SVG path data, re-deriving moves for gaps wider than
/// `eps`.
pub fn path_to_path_data(path: &Path, eps: f64) -> String {
    path_to_commands(path, eps)
        .iter()
        .map(|command| match command {
            PathCommand::Absolute(abs) => match *abs {
                AbsoluteCommand::M(p) => format!("M {} {}", p.x, p.y),
                AbsoluteCommand::L(p) => format!("L {} {}", p.x, p.y),
                AbsoluteCommand::H(x) => format!("H {}", x),
                AbsoluteCommand::V(y) => format!("V {}", y),
                AbsoluteCommand::C(c1, c2, p) => {
                    format!("C {} {} {} {} {} {}", c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                AbsoluteCommand::S(c2, p) => format!("S {} {} {} {}", c2.x, c2.y, p.x, p.y),
                AbsoluteCommand::Q(c, p) => format!("Q {} {} {} {}", c.x, c.y, p.x, p.y),
                AbsoluteCommand::T(p) => format!("T {} {}", p.x, p.y),
                AbsoluteCommand::A {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    to,
                } => format!("A {} {} {} {} {} {} {}", rx, ry, rotation, large_arc as u8, sweep as u8, to.x, to.y),
                AbsoluteCommand::Z => "Z".to_string(),
            },
            PathCommand::Relative(_) => unreachable!("formatter emits absolute commands"),
        })
        .collect::<Vec<String>>()
        .join(" ")
}

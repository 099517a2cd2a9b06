//! Baseline paths: command lists, their text form, and their length.
//!
//! The text form is a whitespace-separated list of tokens, each an absolute
//! command letter followed by comma-separated coordinates, e.g.
//! `M10,20 L110,20`. A command may carry several points (`L1,2,3,4`), in which
//! case extra points after a move continue the subpath as lines, matching SVG.
//!
//! `parse_path(&format_path(p)) == p` holds for every valid path because
//! coordinates are written with Rust's shortest round-trip float formatting.

#[cfg(test)]
#[path = "path_test.rs"]
mod path_test;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::geom::{Point, Rect};

/// Drawing operation of a path command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathOp {
    /// `M`: start a new subpath.
    Move,
    /// `L`: straight line from the current point.
    Line,
}

impl PathOp {
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Move => 'M',
            Self::Line => 'L',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'M' => Some(Self::Move),
            'L' => Some(Self::Line),
            _ => None,
        }
    }
}

/// One command and its points, in the owning span's local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCommand {
    pub op: PathOp,
    pub points: Vec<Point>,
}

/// An ordered, non-empty list of commands.
///
/// Editing only ever changes coordinates: the command count and each command's
/// point count are fixed once a path exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Build a path from commands.
    ///
    /// # Errors
    ///
    /// [`EditorError::MalformedPath`] when there are no commands, a command
    /// has no points, or a coordinate is not finite.
    pub fn new(commands: Vec<PathCommand>) -> Result<Self, EditorError> {
        if commands.is_empty() {
            return Err(malformed("", "path has no commands"));
        }
        for cmd in &commands {
            if cmd.points.is_empty() {
                return Err(malformed(&cmd.op.letter().to_string(), "command has no points"));
            }
            if cmd.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                return Err(malformed(&cmd.op.letter().to_string(), "coordinate is not finite"));
            }
        }
        Ok(Self { commands })
    }

    /// Straight two-point baseline `M from L to`.
    #[must_use]
    pub fn line(from: Point, to: Point) -> Self {
        Self {
            commands: vec![
                PathCommand { op: PathOp::Move, points: vec![from] },
                PathCommand { op: PathOp::Line, points: vec![to] },
            ],
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// All points in command order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().flat_map(|cmd| cmd.points.iter().copied())
    }

    /// Point `index` of command `command`.
    #[must_use]
    pub fn point(&self, command: usize, index: usize) -> Option<Point> {
        self.commands.get(command)?.points.get(index).copied()
    }

    /// Overwrite one coordinate pair. Returns `false` (and changes nothing) for
    /// an out-of-range address or a non-finite point.
    pub fn set_point(&mut self, command: usize, index: usize, p: Point) -> bool {
        if !p.x.is_finite() || !p.y.is_finite() {
            return false;
        }
        match self.commands.get_mut(command).and_then(|cmd| cmd.points.get_mut(index)) {
            Some(slot) => {
                *slot = p;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn first_point(&self) -> Option<Point> {
        self.points().next()
    }

    /// Whether this is exactly `M p L q`: the shape generated for new spans.
    #[must_use]
    pub fn is_simple_line(&self) -> bool {
        matches!(
            self.commands.as_slice(),
            [PathCommand { op: PathOp::Move, points: m }, PathCommand { op: PathOp::Line, points: l }]
                if m.len() == 1 && l.len() == 1
        )
    }

    /// Total drawn length; moves start a new subpath and contribute nothing.
    #[must_use]
    pub fn length(&self) -> f64 {
        let mut total = 0.0;
        let mut current: Option<Point> = None;
        for cmd in &self.commands {
            for (i, p) in cmd.points.iter().copied().enumerate() {
                let starts_subpath = cmd.op == PathOp::Move && i == 0;
                if let (false, Some(prev)) = (starts_subpath, current) {
                    total += prev.distance(p);
                }
                current = Some(p);
            }
        }
        total
    }

    /// Bounding box of all points.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.points())
    }
}

impl TryFrom<String> for Path {
    type Error = EditorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_path(&value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        format_path(&path)
    }
}

/// Parse path text into a [`Path`].
///
/// # Errors
///
/// [`EditorError::MalformedPath`] naming the first offending token.
pub fn parse_path(text: &str) -> Result<Path, EditorError> {
    let mut commands = Vec::new();
    for token in text.split_whitespace() {
        let mut chars = token.chars();
        let Some(letter) = chars.next() else {
            continue;
        };
        let Some(op) = PathOp::from_letter(letter) else {
            return Err(malformed(token, "unsupported command"));
        };
        let body = chars.as_str();
        if body.is_empty() {
            return Err(malformed(token, "command has no coordinates"));
        }
        let mut coords = Vec::new();
        for raw in body.split(',') {
            let value: f64 = raw.trim().parse().map_err(|_| malformed(token, "coordinate is not a number"))?;
            if !value.is_finite() {
                return Err(malformed(token, "coordinate is not finite"));
            }
            coords.push(value);
        }
        if coords.len() % 2 != 0 {
            return Err(malformed(token, "odd number of coordinates"));
        }
        let points = coords.chunks_exact(2).map(|xy| Point::new(xy[0], xy[1])).collect();
        commands.push(PathCommand { op, points });
    }
    Path::new(commands).map_err(|err| match err {
        EditorError::MalformedPath { reason, .. } => malformed(text, &reason),
        other => other,
    })
}

/// Write a [`Path`] in its text form.
#[must_use]
pub fn format_path(path: &Path) -> String {
    let mut out = String::new();
    for (i, cmd) in path.commands.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(cmd.op.letter());
        for (j, p) in cmd.points.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            out.push_str(&format!("{},{}", p.x, p.y));
        }
    }
    out
}

fn malformed(token: &str, reason: &str) -> EditorError {
    EditorError::MalformedPath { token: token.to_owned(), reason: reason.to_owned() }
}

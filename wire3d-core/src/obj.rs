/// Face/vertex mesh text parser producing a deduplicated wireframe
///
/// Recognizes `v x y z` and `f i1 i2 ... ik` records. Face tokens may carry
/// `/texture/normal` suffixes, which are ignored. Every other line is skipped.
use std::collections::HashSet;

use nom::{
    character::complete::{char, i64 as integer},
    combinator::{all_consuming, opt, rest},
    number::complete::double,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::LoadError;
use crate::geometry::{Edge, Geometry, Vertex};

/// Result of a successful parse, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMesh {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl ParsedMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Normalize into a renderable geometry
    pub fn into_geometry(self) -> Geometry {
        Geometry::from_parts(self.vertices, self.edges)
    }
}

/// A face index token awaiting bounds validation
struct FaceRef {
    line: usize,
    column: usize,
    raw: i64,
    resolved: Option<usize>,
}

/// Parse mesh text. The whole input must be valid for anything to be returned.
pub fn parse_obj(text: &str) -> Result<ParsedMesh, LoadError> {
    let mut vertices = Vec::new();
    let mut faces: Vec<Vec<FaceRef>> = Vec::new();
    // Face errors only count once the text turns out to hold vertices
    let mut face_error = None;

    for (number, line) in text.lines().enumerate() {
        let line_no = number + 1;
        let mut fields = tokens(line);
        let Some((_, kind)) = fields.next() else {
            continue;
        };

        match kind {
            "v" => match parse_vertex(line_no, fields) {
                Ok(vertex) => vertices.push(vertex),
                Err(err) => return Err(face_error.unwrap_or(err)),
            },
            "f" => match parse_face(line_no, fields, vertices.len()) {
                Ok(face) => faces.push(face),
                Err(err) => {
                    face_error.get_or_insert(err);
                }
            },
            _ => {}
        }
    }

    // Nothing to show; faces alone are not a mesh
    if vertices.is_empty() {
        return Ok(ParsedMesh {
            vertices,
            edges: Vec::new(),
        });
    }
    if let Some(err) = face_error {
        return Err(err);
    }

    let mut edges = Vec::new();
    let mut seen = HashSet::new();
    for face in &faces {
        let indices = face
            .iter()
            .map(|r| match r.resolved {
                Some(i) if i < vertices.len() => Ok(i),
                _ => Err(LoadError::IndexOutOfRange {
                    line: r.line,
                    column: r.column,
                    index: r.raw,
                    vertex_count: vertices.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Close the loop: last index connects back to the first
        for (i, &a) in indices.iter().enumerate() {
            let b = indices[(i + 1) % indices.len()];
            let edge = Edge::new(a, b);
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }

    Ok(ParsedMesh { vertices, edges })
}

/// Whitespace-separated tokens with their 1-based byte column
fn tokens(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let base = line.as_ptr() as usize;
    line.split_whitespace()
        .map(move |token| (token.as_ptr() as usize - base + 1, token))
}

fn parse_vertex<'a>(
    line: usize,
    tokens: impl Iterator<Item = (usize, &'a str)>,
) -> Result<Vertex, LoadError> {
    let mut coords = [0.0; 3];
    let mut found = 0;
    for (column, token) in tokens.take(3) {
        coords[found] = coordinate(token)
            .ok()
            .map(|(_, value)| value)
            .filter(|value| value.is_finite())
            .ok_or_else(|| LoadError::InvalidNumber {
                line,
                column,
                token: token.to_string(),
            })?;
        found += 1;
    }

    if found < 3 {
        return Err(LoadError::MissingCoordinate { line, found });
    }
    Ok(Vertex::new(coords[0], coords[1], coords[2]))
}

fn parse_face<'a>(
    line: usize,
    tokens: impl Iterator<Item = (usize, &'a str)>,
    declared: usize,
) -> Result<Vec<FaceRef>, LoadError> {
    let face = tokens
        .map(|(column, token)| -> Result<FaceRef, LoadError> {
            let (_, raw) = face_index(token).map_err(|_| LoadError::InvalidNumber {
                line,
                column,
                token: token.to_string(),
            })?;
            Ok(FaceRef {
                line,
                column,
                raw,
                resolved: resolve_index(raw, declared),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if face.len() < 2 {
        return Err(LoadError::DegenerateFace {
            line,
            count: face.len(),
        });
    }
    Ok(face)
}

/// Convert a 1-based index, or a negative one relative to the vertices
/// declared so far, into a 0-based index
fn resolve_index(raw: i64, declared: usize) -> Option<usize> {
    match raw {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => {
            let back = usize::try_from(i.unsigned_abs()).ok()?;
            declared.checked_sub(back)
        }
    }
}

fn coordinate(input: &str) -> IResult<&str, f64> {
    all_consuming(double)(input)
}

fn face_index(input: &str) -> IResult<&str, i64> {
    all_consuming(terminated(integer, opt(preceded(char('/'), rest))))(input)
}

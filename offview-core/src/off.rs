/// OFF (Object File Format) parser
///
/// The format is line oriented:
///
/// ```text
/// OFF
/// # comment
/// <vertex count> <face count> [<edge count>]
/// x y z            (one line per vertex, trailing values ignored)
/// k i0 i1 .. ik-1  (one line per polygon, trailing values ignored)
/// ```
///
/// The `OFF` keyword is optional and the counts may share its line.
use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{space0, space1, u32 as decimal},
    combinator::{all_consuming, eof, opt, peek},
    multi::{count, many0},
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::FormatError;
use crate::model::{Model, Polygon, Vertex};

/// Declared element counts. The edge count is accepted but unused.
struct Header {
    vertices: usize,
    faces: usize,
}

/// Parse an OFF document held in memory.
pub fn parse_off(input: &str) -> Result<Model, FormatError> {
    let mut lines = content_lines(input);
    // Header counts are untrusted; every element needs its own line.
    let line_count = input.lines().count();

    let header = parse_header(&mut lines)?;
    if header.vertices == 0 {
        return Err(FormatError::NoVertices);
    }

    let mut vertices = Vec::with_capacity(header.vertices.min(line_count));
    while vertices.len() < header.vertices {
        let Some((line, text)) = lines.next() else {
            return Err(FormatError::Truncated {
                what: "vertices",
                expected: header.vertices,
                found: vertices.len(),
            });
        };
        let position = match vertex(text) {
            Ok((_, p)) if p.iter().all(|c| c.is_finite()) => p,
            _ => return Err(FormatError::MalformedVertex { line }),
        };
        vertices.push(Vertex::new(position));
    }

    let mut polygons = Vec::with_capacity(header.faces.min(line_count));
    while polygons.len() < header.faces {
        let Some((line, text)) = lines.next() else {
            return Err(FormatError::Truncated {
                what: "polygons",
                expected: header.faces,
                found: polygons.len(),
            });
        };
        polygons.push(parse_polygon(text, line, header.vertices)?);
    }

    Ok(Model::from_parts(vertices, polygons))
}

/// Yields `(line number, content)` for every line that carries data.
fn content_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input.lines().enumerate().filter_map(|(i, raw)| {
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let content = content.trim();
        (!content.is_empty()).then_some((i + 1, content))
    })
}

fn parse_header<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<Header, FormatError> {
    let (line, first) = lines.next().ok_or(FormatError::Empty)?;

    let (line, counts_text) = match keyword(first) {
        Ok((rest, _)) if rest.trim().is_empty() => lines
            .next()
            .ok_or(FormatError::MalformedHeader { line: line + 1 })?,
        Ok((rest, _)) => (line, rest.trim()),
        Err(_) => (line, first),
    };

    match all_consuming(counts)(counts_text) {
        Ok((_, (vertices, faces, _edges))) => Ok(Header {
            vertices: vertices as usize,
            faces: faces as usize,
        }),
        Err(_) => Err(FormatError::MalformedHeader { line }),
    }
}

fn parse_polygon(text: &str, line: usize, vertex_count: usize) -> Result<Polygon, FormatError> {
    let (rest, sides) = index(text).map_err(|_| FormatError::MalformedPolygon { line })?;
    let sides = sides as usize;
    if sides < 3 {
        return Err(FormatError::DegeneratePolygon { line, sides });
    }

    let indices = match count(preceded(space1, index), sides)(rest) {
        Ok((_, indices)) => indices,
        Err(_) => {
            let found = many0(preceded(space1, index))(rest)
                .map(|(_, listed)| listed.len())
                .unwrap_or(0);
            return Err(if found < sides {
                FormatError::PolygonArity {
                    line,
                    expected: sides,
                    found,
                }
            } else {
                FormatError::MalformedPolygon { line }
            });
        }
    };

    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(FormatError::IndexOutOfRange {
            line,
            index: bad as usize,
            vertex_count,
        });
    }

    Ok(Polygon::new(indices))
}

fn keyword(input: &str) -> IResult<&str, &str> {
    terminated(tag("OFF"), peek(alt((space1, eof))))(input)
}

fn counts(input: &str) -> IResult<&str, (u32, u32, Option<u32>)> {
    terminated(
        tuple((
            decimal,
            preceded(space1, decimal),
            opt(preceded(space1, decimal)),
        )),
        space0,
    )(input)
}

/// A whole unsigned integer token, rejecting prefixes such as the `1` of `1.5`.
fn index(input: &str) -> IResult<&str, u32> {
    terminated(decimal, peek(alt((space1, eof))))(input)
}

fn coordinate(input: &str) -> IResult<&str, f32> {
    terminated(float, peek(alt((space1, eof))))(input)
}

fn vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, (x, y, z)) = tuple((
        coordinate,
        preceded(space1, coordinate),
        preceded(space1, coordinate),
    ))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA: &str = "OFF
4 4 6
0 0 0
1 0 0
0 1 0
0 0 1
3 0 2 1
3 0 1 3
3 0 3 2
3 1 2 3
";

    #[test]
    fn test_parse_tetrahedron() {
        let model = parse_off(TETRA).unwrap();
        assert_eq!(model.vertex_count(), 4);
        assert_eq!(model.polygon_count(), 4);
        assert_eq!(model.polygons()[3].indices(), &[1, 2, 3]);
    }

    #[test]
    fn test_counts_on_keyword_line_and_comments() {
        let input = "# a quad\nOFF 4 1 0\n\n0 0 0\n1 0 0 # trailing\n1 1 0\n0 1 0\n4 0 1 2 3\n";
        let model = parse_off(input).unwrap();
        assert_eq!(model.vertex_count(), 4);
        assert_eq!(model.polygons()[0].len(), 4);
    }

    #[test]
    fn test_keyword_is_optional_and_edges_optional() {
        let model = parse_off("3 1\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap();
        assert_eq!(model.polygon_count(), 1);
    }

    #[test]
    fn test_trailing_colors_ignored() {
        let input = "OFF\n3 1 0\n0 0 0 255 0 0\n1 0 0\n0 1 0\n3 0 1 2 0.5 0.5 0.5\n";
        let model = parse_off(input).unwrap();
        assert_eq!(model.polygons()[0].indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_scientific_notation() {
        let model = parse_off("OFF\n3 1 0\n1e-3 -2.5E2 .5\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap();
        let p = model.vertices()[0].position;
        assert!((p.x - 1e-3).abs() < 1e-9);
        assert!((p.y + 250.0).abs() < 1e-4);
        assert!((p.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            parse_off("  \n# only a comment\n").unwrap_err(),
            FormatError::Empty
        );
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(
            parse_off("OFF\nfour 4 6\n").unwrap_err(),
            FormatError::MalformedHeader { line: 2 }
        );
        assert_eq!(
            parse_off("OFF\n4\n").unwrap_err(),
            FormatError::MalformedHeader { line: 2 }
        );
    }

    #[test]
    fn test_no_vertices() {
        assert_eq!(
            parse_off("OFF\n0 0 0\n").unwrap_err(),
            FormatError::NoVertices
        );
    }

    #[test]
    fn test_truncated_vertices() {
        assert_eq!(
            parse_off("OFF\n4 1 0\n0 0 0\n1 0 0\n").unwrap_err(),
            FormatError::Truncated {
                what: "vertices",
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn test_huge_counts_report_truncation() {
        assert_eq!(
            parse_off("OFF\n4000000000 1 0\n0 0 0\n").unwrap_err(),
            FormatError::Truncated {
                what: "vertices",
                expected: 4_000_000_000,
                found: 1
            }
        );
        assert_eq!(
            parse_off("OFF\n3 4000000000 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap_err(),
            FormatError::Truncated {
                what: "polygons",
                expected: 4_000_000_000,
                found: 1
            }
        );
    }

    #[test]
    fn test_truncated_polygons() {
        assert_eq!(
            parse_off("OFF\n3 2 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap_err(),
            FormatError::Truncated {
                what: "polygons",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_malformed_vertex() {
        assert_eq!(
            parse_off("OFF\n3 1 0\n0 0 0\n1 x 0\n0 1 0\n3 0 1 2\n").unwrap_err(),
            FormatError::MalformedVertex { line: 4 }
        );
        assert_eq!(
            parse_off("OFF\n3 1 0\n0 0\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap_err(),
            FormatError::MalformedVertex { line: 3 }
        );
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        assert_eq!(
            parse_off("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n2 0 1\n").unwrap_err(),
            FormatError::DegeneratePolygon { line: 6, sides: 2 }
        );
    }

    #[test]
    fn test_polygon_arity_mismatch() {
        assert_eq!(
            parse_off("OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2\n").unwrap_err(),
            FormatError::PolygonArity {
                line: 7,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_index_out_of_range() {
        assert_eq!(
            parse_off("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 3\n").unwrap_err(),
            FormatError::IndexOutOfRange {
                line: 6,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_fractional_index_is_malformed() {
        assert!(matches!(
            parse_off("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1.5 2\n").unwrap_err(),
            FormatError::PolygonArity { line: 6, .. }
        ));
    }
}

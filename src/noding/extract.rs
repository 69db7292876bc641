use geo_types::{Geometry, LineString, MultiLineString};

use super::NodedSegmentString;
use crate::error::{NodingError, Result};

/// Builds one segment string per linear component of `geom`: linestrings,
/// polygon rings, lines, and the outlines of rects and triangles. Points
/// are ignored and empty components are skipped. Each string's context is
/// the index of the component in traversal order.
pub fn extract_segment_strings(geom: &Geometry<f64>) -> Result<Vec<NodedSegmentString<usize>>> {
    let mut lines = Vec::new();
    extract_lines(geom, &mut lines);

    let mut out = Vec::with_capacity(lines.len());
    for ls in lines {
        match ls.0.len() {
            0 => continue,
            1 => {
                return Err(NodingError::InvalidGeometry(format!(
                    "linear component with a single point at {:?}",
                    ls.0[0]
                )))
            }
            _ => {
                let id = out.len();
                out.push(NodedSegmentString::from_line_string(ls, id)?);
            }
        }
    }
    log::debug!("extracted {} segment strings", out.len());
    Ok(out)
}

fn extract_lines(geom: &Geometry<f64>, out: &mut Vec<LineString<f64>>) {
    match geom {
        Geometry::Line(line) => out.push(LineString::from(vec![line.start, line.end])),
        Geometry::LineString(ls) => out.push(ls.clone()),
        Geometry::MultiLineString(mls) => {
            out.extend(mls.0.iter().cloned());
        }
        Geometry::Polygon(poly) => {
            out.push(poly.exterior().clone());
            out.extend(poly.interiors().iter().cloned());
        }
        Geometry::MultiPolygon(mpoly) => {
            for poly in mpoly {
                out.push(poly.exterior().clone());
                out.extend(poly.interiors().iter().cloned());
            }
        }
        Geometry::Rect(rect) => out.push(rect.to_polygon().exterior().clone()),
        Geometry::Triangle(tri) => out.push(tri.to_polygon().exterior().clone()),
        Geometry::GeometryCollection(gc) => {
            for g in gc {
                extract_lines(g, out);
            }
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
}

/// Collects segment strings into one multi-linestring, in order.
pub fn to_multi_line_string<D>(strings: &[NodedSegmentString<D>]) -> MultiLineString<f64> {
    MultiLineString::new(strings.iter().map(|s| s.to_line_string()).collect())
}

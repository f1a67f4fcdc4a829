//! Mesh structures for the `ply` and `obj` geometry types
//!
//! A mesh travels on the wire as a dictionary of element lists: `vertices`
//! holding `x`/`y`/`z` coordinates (plus optional `red`/`green`/`blue`
//! channels), `edges` holding vertex pairs, and `faces` holding
//! `vertex_index` lists. The two flavors differ in index base (`ply` is
//! 0-based, `obj` 1-based) and in what they carry: `obj` edges use
//! `vertex_index` lists and have no color channels.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{Error, Result};

/// Mesh flavor, deciding index base and element layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshKind {
    Ply,
    Obj,
}

impl MeshKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            MeshKind::Ply => "ply",
            MeshKind::Obj => "obj",
        }
    }

    fn index_base(&self) -> i64 {
        match self {
            MeshKind::Ply => 0,
            MeshKind::Obj => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: Option<[u8; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub vertex_index: Vec<usize>,
    pub color: Option<[u8; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vertex_index: Vec<usize>,
}

/// A polygon mesh: vertices plus edge and face connectivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub kind: MeshKind,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Parse the dictionary-of-elements wire form
    pub fn from_value(kind: MeshKind, wire: &Json) -> Result<Self> {
        let obj = wire
            .as_object()
            .ok_or_else(|| Error::wire("mesh object", wire))?;

        let vertices: Vec<Vertex> = match obj.get("vertices") {
            Some(Json::Array(items)) => items
                .iter()
                .map(parse_vertex)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => return Err(Error::wire("vertices array", other)),
            None => Vec::new(),
        };

        let edges: Vec<Edge> = match obj.get("edges") {
            Some(Json::Array(items)) => items
                .iter()
                .map(|item| parse_edge(kind, item))
                .collect::<Result<Vec<_>>>()?,
            Some(other) => return Err(Error::wire("edges array", other)),
            None => Vec::new(),
        };

        let faces: Vec<Face> = match obj.get("faces") {
            Some(Json::Array(items)) => items
                .iter()
                .map(|item| {
                    let indices = parse_index_list(kind, item.get("vertex_index"))?;
                    if indices.len() < 3 {
                        return Err(Error::mesh("a face needs at least 3 vertex indices"));
                    }
                    Ok(Face {
                        vertex_index: indices,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => return Err(Error::wire("faces array", other)),
            None => Vec::new(),
        };

        let mesh = Self {
            kind,
            vertices,
            edges,
            faces,
        };
        mesh.check_indices()?;
        Ok(mesh)
    }

    /// Render back to the dictionary-of-elements wire form
    pub fn to_value(&self) -> Json {
        let base = self.kind.index_base();
        let vertices: Vec<Json> = self
            .vertices
            .iter()
            .map(|v| {
                let mut out = serde_json::json!({"x": v.x, "y": v.y, "z": v.z});
                if let (Some([r, g, b]), MeshKind::Ply) = (v.color, self.kind) {
                    out["red"] = r.into();
                    out["green"] = g.into();
                    out["blue"] = b.into();
                }
                out
            })
            .collect();

        let edges: Vec<Json> = self
            .edges
            .iter()
            .map(|e| match self.kind {
                MeshKind::Ply => {
                    let mut out = serde_json::json!({
                        "vertex1": e.vertex_index.first().copied().unwrap_or(0),
                        "vertex2": e.vertex_index.get(1).copied().unwrap_or(0),
                    });
                    if let Some([r, g, b]) = e.color {
                        out["red"] = r.into();
                        out["green"] = g.into();
                        out["blue"] = b.into();
                    }
                    out
                }
                MeshKind::Obj => serde_json::json!({
                    "vertex_index": e.vertex_index
                        .iter()
                        .map(|i| *i as i64 + base)
                        .collect::<Vec<_>>(),
                }),
            })
            .collect();

        let faces: Vec<Json> = self
            .faces
            .iter()
            .map(|f| {
                serde_json::json!({
                    "vertex_index": f.vertex_index
                        .iter()
                        .map(|i| *i as i64 + base)
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        serde_json::json!({
            "vertices": vertices,
            "edges": edges,
            "faces": faces,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned bounds over all vertices; None for an empty mesh
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = self.vertices.first()?;
        let mut min = [first.x, first.y, first.z];
        let mut max = min;
        for v in &self.vertices {
            for (i, c) in [v.x, v.y, v.z].into_iter().enumerate() {
                min[i] = min[i].min(c);
                max[i] = max[i].max(c);
            }
        }
        Some((min, max))
    }

    fn check_indices(&self) -> Result<()> {
        let n = self.vertices.len();
        let all = self
            .edges
            .iter()
            .map(|e| &e.vertex_index)
            .chain(self.faces.iter().map(|f| &f.vertex_index));
        for indices in all {
            if let Some(bad) = indices.iter().find(|i| **i >= n) {
                return Err(Error::mesh(format!(
                    "vertex index {} out of range for {} vertices",
                    bad, n
                )));
            }
        }
        Ok(())
    }
}

fn parse_vertex(wire: &Json) -> Result<Vertex> {
    let obj = wire
        .as_object()
        .ok_or_else(|| Error::wire("vertex object", wire))?;
    let coord = |key: &str| -> Result<f64> {
        obj.get(key)
            .and_then(Json::as_f64)
            .ok_or_else(|| Error::mesh(format!("vertex is missing coordinate '{}'", key)))
    };
    let vertex = Vertex {
        x: coord("x")?,
        y: coord("y")?,
        z: coord("z")?,
        color: parse_color(obj)?,
    };
    Ok(vertex)
}

fn parse_edge(kind: MeshKind, wire: &Json) -> Result<Edge> {
    let obj = wire
        .as_object()
        .ok_or_else(|| Error::wire("edge object", wire))?;
    if obj.contains_key("vertex_index") {
        return Ok(Edge {
            vertex_index: parse_index_list(kind, obj.get("vertex_index"))?,
            color: parse_color(obj)?,
        });
    }
    let endpoint = |key: &str| -> Result<usize> {
        let raw = obj
            .get(key)
            .and_then(Json::as_i64)
            .ok_or_else(|| Error::mesh(format!("edge is missing '{}'", key)))?;
        adjust_index(kind, raw)
    };
    Ok(Edge {
        vertex_index: vec![endpoint("vertex1")?, endpoint("vertex2")?],
        color: parse_color(obj)?,
    })
}

fn parse_index_list(kind: MeshKind, wire: Option<&Json>) -> Result<Vec<usize>> {
    let items = wire
        .and_then(Json::as_array)
        .ok_or_else(|| Error::mesh("missing 'vertex_index' list"))?;
    items
        .iter()
        .map(|item| {
            let raw = item
                .as_i64()
                .ok_or_else(|| Error::wire("integer vertex index", item))?;
            adjust_index(kind, raw)
        })
        .collect()
}

fn adjust_index(kind: MeshKind, raw: i64) -> Result<usize> {
    let adjusted = raw - kind.index_base();
    usize::try_from(adjusted).map_err(|_| {
        Error::mesh(format!(
            "vertex index {} is below the {} base of {}",
            raw,
            kind.type_name(),
            kind.index_base()
        ))
    })
}

fn parse_color(obj: &serde_json::Map<String, Json>) -> Result<Option<[u8; 3]>> {
    let channel = |key: &str| -> Result<Option<u8>> {
        match obj.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| Error::mesh(format!("color channel '{}' is not a byte", key))),
        }
    };
    match (channel("red")?, channel("green")?, channel("blue")?) {
        (Some(r), Some(g), Some(b)) => Ok(Some([r, g, b])),
        (None, None, None) => Ok(None),
        _ => Err(Error::mesh("incomplete color: need red, green, and blue")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cube_wire() -> Json {
        json!({
            "vertices": [
                {"x": 0.0, "y": 0.0, "z": 0.0},
                {"x": 0.0, "y": 0.0, "z": 1.0},
                {"x": 0.0, "y": 1.0, "z": 1.0},
                {"x": 1.0, "y": 0.0, "z": 0.0},
            ],
            "edges": [
                {"vertex1": 0, "vertex2": 1},
                {"vertex1": 1, "vertex2": 2},
            ],
            "faces": [
                {"vertex_index": [0, 1, 2]},
                {"vertex_index": [0, 1, 2, 3]},
            ],
        })
    }

    #[test]
    fn test_ply_round_trip() {
        let mesh = Mesh::from_value(MeshKind::Ply, &cube_wire()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.to_value(), cube_wire());
    }

    #[test]
    fn test_obj_one_based_indices() {
        let wire = json!({
            "vertices": [
                {"x": 0.0, "y": 0.0, "z": 0.0},
                {"x": 0.0, "y": 0.0, "z": 1.0},
                {"x": 0.0, "y": 1.0, "z": 1.0},
            ],
            "edges": [{"vertex_index": [1, 2]}],
            "faces": [{"vertex_index": [1, 2, 3]}],
        });
        let mesh = Mesh::from_value(MeshKind::Obj, &wire).unwrap();
        assert_eq!(mesh.faces[0].vertex_index, vec![0, 1, 2]);
        assert_eq!(mesh.to_value(), wire);

        // 0 is out of range in the 1-based flavor
        let bad = json!({
            "vertices": [{"x": 0.0, "y": 0.0, "z": 0.0}],
            "faces": [{"vertex_index": [0, 1, 1]}],
        });
        assert!(Mesh::from_value(MeshKind::Obj, &bad).is_err());
    }

    #[test]
    fn test_vertex_colors() {
        let wire = json!({
            "vertices": [
                {"x": 0.0, "y": 0.0, "z": 0.0, "red": 255, "green": 0, "blue": 0},
                {"x": 1.0, "y": 0.0, "z": 0.0, "red": 0, "green": 0, "blue": 255},
                {"x": 0.0, "y": 1.0, "z": 0.0, "red": 0, "green": 255, "blue": 0},
            ],
            "faces": [{"vertex_index": [0, 1, 2]}],
        });
        let mesh = Mesh::from_value(MeshKind::Ply, &wire).unwrap();
        assert_eq!(mesh.vertices[0].color, Some([255, 0, 0]));
    }

    #[test]
    fn test_index_out_of_range() {
        let wire = json!({
            "vertices": [{"x": 0.0, "y": 0.0, "z": 0.0}],
            "faces": [{"vertex_index": [0, 1, 2]}],
        });
        assert!(Mesh::from_value(MeshKind::Ply, &wire).is_err());
    }

    #[test]
    fn test_bounds() {
        let mesh = Mesh::from_value(MeshKind::Ply, &cube_wire()).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [0.0, 0.0, 0.0]);
        assert_eq!(max, [1.0, 1.0, 1.0]);
    }
}

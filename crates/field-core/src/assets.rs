//! Asset fetching and SVG flattening.
//!
//! Glyph outlines and the heart template both start life as SVG artwork. The
//! loader reads bytes through an [`AssetSource`], parses them with `usvg`,
//! and flattens every path into polylines in the artwork's own coordinate
//! space (absolute transforms applied).

use crate::constants::CURVE_FLATTEN_STEPS;
use crate::error::AssetError;
use fnv::FnvHashMap;
use glam::Vec2;
use std::path::{Path, PathBuf};
use tiny_skia::PathSegment;

/// A flattened open or closed contour.
pub type Polyline = Vec<Vec2>;

/// Where asset bytes come from. Implementations must be callable from a
/// loader thread.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets relative to a root directory.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(full.display().to_string()),
            _ => AssetError::Io {
                path: full.display().to_string(),
                source: e,
            },
        })
    }
}

/// In-memory assets, keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: FnvHashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

/// Parse SVG bytes and flatten every path into polylines.
///
/// Returns `AssetError::Empty` when the document has no drawable path with
/// at least two points.
pub fn flatten_svg(data: &[u8]) -> Result<Vec<Polyline>, AssetError> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| AssetError::Svg(e.to_string()))?;
    let mut out = Vec::new();
    collect_group(tree.root(), &mut out);
    if out.is_empty() {
        return Err(AssetError::Empty);
    }
    Ok(out)
}

fn collect_group(group: &usvg::Group, out: &mut Vec<Polyline>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_group(g, out),
            usvg::Node::Path(p) => {
                if let Some(path) = p.data().clone().transform(p.abs_transform()) {
                    flatten_path(&path, out);
                }
            }
            _ => {}
        }
    }
}

fn flatten_path(path: &tiny_skia::Path, out: &mut Vec<Polyline>) {
    let mut current: Polyline = Vec::new();
    let mut start = Vec2::ZERO;
    let mut last = Vec2::ZERO;
    let steps = CURVE_FLATTEN_STEPS.max(1);

    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                flush(&mut current, out);
                start = Vec2::new(p.x, p.y);
                last = start;
                current.push(start);
            }
            PathSegment::LineTo(p) => {
                last = Vec2::new(p.x, p.y);
                current.push(last);
            }
            PathSegment::QuadTo(c, p) => {
                let c = Vec2::new(c.x, c.y);
                let p = Vec2::new(p.x, p.y);
                for i in 1..=steps {
                    let t = i as f32 / steps as f32;
                    let u = 1.0 - t;
                    current.push(last * (u * u) + c * (2.0 * u * t) + p * (t * t));
                }
                last = p;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let c1 = Vec2::new(c1.x, c1.y);
                let c2 = Vec2::new(c2.x, c2.y);
                let p = Vec2::new(p.x, p.y);
                for i in 1..=steps {
                    let t = i as f32 / steps as f32;
                    let u = 1.0 - t;
                    current.push(
                        last * (u * u * u)
                            + c1 * (3.0 * u * u * t)
                            + c2 * (3.0 * u * t * t)
                            + p * (t * t * t),
                    );
                }
                last = p;
            }
            PathSegment::Close => {
                if !current.is_empty() {
                    current.push(start);
                }
                last = start;
            }
        }
    }
    flush(&mut current, out);
}

#[inline]
fn flush(current: &mut Polyline, out: &mut Vec<Polyline>) {
    if current.len() >= 2 {
        out.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Axis-aligned bounds of a set of polylines as `(min, max)`.
pub fn polyline_bounds(lines: &[Polyline]) -> (Vec2, Vec2) {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for p in lines.iter().flatten() {
        min = min.min(*p);
        max = max.max(*p);
    }
    (min, max)
}

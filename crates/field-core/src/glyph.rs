//! Inline symbol artwork, loaded asynchronously and looked up by key.
//!
//! Loads never touch particle state. A loader thread (or any other async
//! runtime holding a [`GlyphCompleter`]) pushes its result onto a channel;
//! the frame drains the channel with [`GlyphOutlineStore::poll`] before doing
//! anything else, and reacts to the returned [`GlyphReady`] events.

use crate::assets::{flatten_svg, polyline_bounds, AssetSource, Polyline};
use crate::error::AssetError;
use fnv::FnvHashMap;
use glam::Vec2;
use smallvec::SmallVec;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Vector artwork for one inline symbol: open polylines plus bounds.
#[derive(Clone, Debug)]
pub struct GlyphOutline {
    segments: Vec<Polyline>,
    min: Vec2,
    max: Vec2,
}

impl GlyphOutline {
    /// Build an outline from polylines; returns `None` when there are no
    /// points at all.
    pub fn from_polylines(segments: Vec<Polyline>) -> Option<Self> {
        if segments.iter().all(|s| s.is_empty()) {
            return None;
        }
        let (min, max) = polyline_bounds(&segments);
        Some(Self { segments, min, max })
    }

    pub fn from_svg(data: &[u8]) -> Result<Self, AssetError> {
        Self::from_polylines(flatten_svg(data)?).ok_or(AssetError::Empty)
    }

    pub fn segments(&self) -> &[Polyline] {
        &self.segments
    }

    /// `(min, max)` corners of the bounding box.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.min, self.max)
    }

    /// Bounding box size, never smaller than one unit per axis.
    pub fn size(&self) -> Vec2 {
        (self.max - self.min).max(Vec2::ONE)
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size() * 0.5
    }
}

/// Result of a lookup.
#[derive(Clone, Copy, Debug)]
pub enum GlyphStatus<'a> {
    Ready(&'a GlyphOutline),
    /// Requested (or never requested) and not available yet.
    Pending,
    /// The load failed; this key stays absent for the session.
    Failed,
}

impl<'a> GlyphStatus<'a> {
    pub fn outline(self) -> Option<&'a GlyphOutline> {
        match self {
            GlyphStatus::Ready(o) => Some(o),
            _ => None,
        }
    }
}

/// One-shot notification that a glyph became available.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphReady {
    pub key: String,
}

struct GlyphLoad {
    key: String,
    result: Result<GlyphOutline, AssetError>,
}

/// Sender half handed to loaders. Cloneable and `Send`.
#[derive(Clone)]
pub struct GlyphCompleter {
    tx: Sender<GlyphLoad>,
}

impl GlyphCompleter {
    /// Deliver a load result. It takes effect on the next `poll`.
    pub fn complete(&self, key: impl Into<String>, result: Result<GlyphOutline, AssetError>) {
        let key = key.into();
        if self.tx.send(GlyphLoad { key, result }).is_err() {
            log::debug!("[glyph] store dropped before load completed");
        }
    }
}

pub struct GlyphOutlineStore {
    outlines: FnvHashMap<String, GlyphOutline>,
    failed: FnvHashMap<String, String>,
    tx: Sender<GlyphLoad>,
    rx: Receiver<GlyphLoad>,
}

impl Default for GlyphOutlineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphOutlineStore {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            outlines: FnvHashMap::default(),
            failed: FnvHashMap::default(),
            tx,
            rx,
        }
    }

    pub fn completer(&self) -> GlyphCompleter {
        GlyphCompleter {
            tx: self.tx.clone(),
        }
    }

    /// Start loading `path` from `source` on a background thread.
    /// Fire and forget: there is no retry and no cancellation. Keys that
    /// already loaded or failed are left alone.
    pub fn request(&self, key: &str, path: &str, source: Arc<dyn AssetSource>) {
        if !matches!(self.lookup(key), GlyphStatus::Pending) {
            log::debug!("[glyph] '{}' already settled; not requesting again", key);
            return;
        }
        let completer = self.completer();
        let key = key.to_string();
        let path = path.to_string();
        log::info!("[glyph] requesting '{}' from {}", key, path);
        let spawned = std::thread::Builder::new()
            .name(format!("glyph-{key}"))
            .spawn({
                let key = key.clone();
                let completer = completer.clone();
                move || {
                    let result = source
                        .fetch(&path)
                        .and_then(|bytes| GlyphOutline::from_svg(&bytes));
                    completer.complete(key, result);
                }
            });
        if let Err(e) = spawned {
            completer.complete(
                key,
                Err(AssetError::Io {
                    path: "<loader thread>".to_string(),
                    source: e,
                }),
            );
        }
    }

    /// Apply every completed load. Returns the keys that became available.
    pub fn poll(&mut self) -> SmallVec<[GlyphReady; 4]> {
        let mut ready = SmallVec::new();
        while let Ok(load) = self.rx.try_recv() {
            match load.result {
                Ok(outline) => {
                    if self.outlines.contains_key(&load.key)
                        || self.failed.contains_key(&load.key)
                    {
                        log::debug!("[glyph] '{}' already settled; ignoring late load", load.key);
                        continue;
                    }
                    log::info!(
                        "[glyph] '{}' ready ({} segments)",
                        load.key,
                        outline.segments().len()
                    );
                    self.outlines.insert(load.key.clone(), outline);
                    ready.push(GlyphReady { key: load.key });
                }
                Err(e) => {
                    log::error!("[glyph] failed to load '{}': {}", load.key, e);
                    if !self.outlines.contains_key(&load.key) {
                        self.failed.insert(load.key, e.to_string());
                    }
                }
            }
        }
        ready
    }

    pub fn lookup(&self, key: &str) -> GlyphStatus<'_> {
        if let Some(o) = self.outlines.get(key) {
            GlyphStatus::Ready(o)
        } else if self.failed.contains_key(key) {
            GlyphStatus::Failed
        } else {
            GlyphStatus::Pending
        }
    }

    /// Number of loaded outlines.
    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }
}

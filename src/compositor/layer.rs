//! Layer descriptors and visibility overrides

use std::collections::BTreeMap;

use kurbo::{BezPath, Rect, Shape};

/// A top-level `<g>` element of an SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Value of the `id` attribute. Layers without one cannot be targeted
    /// by a visibility override.
    pub id: Option<String>,
    /// False iff the group carried `display="none"`
    pub visible: bool,
    /// Geometry of the group's direct `<path>` children, in document order
    pub paths: Vec<BezPath>,
}

impl Layer {
    pub fn new(id: Option<String>, visible: bool, paths: Vec<BezPath>) -> Self {
        Self { id, visible, paths }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Union of the bounding boxes of all non-empty paths
    pub fn bounds(&self) -> Option<Rect> {
        self.paths
            .iter()
            .filter(|path| !path.elements().is_empty())
            .map(|path| path.bounding_box())
            .reduce(|acc, rect| acc.union(rect))
    }
}

/// Per-layer visibility overrides keyed by layer id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerVisibility {
    entries: BTreeMap<String, bool>,
}

impl LayerVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit overrides for every addressable layer in `layers`.
    ///
    /// Layers without an id are skipped. When several layers share an id the
    /// last one in the slice decides.
    pub fn from_layers(layers: &[Layer]) -> Self {
        layers
            .iter()
            .filter_map(|layer| layer.id().map(|id| (id.to_string(), layer.visible)))
            .collect()
    }

    pub fn set(&mut self, id: impl Into<String>, visible: bool) {
        self.entries.insert(id.into(), visible);
    }

    pub fn with(mut self, id: impl Into<String>, visible: bool) -> Self {
        self.set(id, visible);
        self
    }

    pub fn show(self, id: impl Into<String>) -> Self {
        self.with(id, true)
    }

    pub fn hide(self, id: impl Into<String>) -> Self {
        self.with(id, false)
    }

    pub fn get(&self, id: &str) -> Option<bool> {
        self.entries.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Overlay `other` on top of these overrides
    pub fn extend(&mut self, other: &LayerVisibility) {
        for (id, visible) in other.iter() {
            self.set(id, visible);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, visible)| (id.as_str(), *visible))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for LayerVisibility {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(id, v)| (id.into(), v)).collect(),
        }
    }
}

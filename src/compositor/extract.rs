//! Layer discovery
//!
//! Layers are the direct `<g>` children of the root element. Nested groups
//! belong to their parent layer and are not reported separately.

use kurbo::BezPath;
use log::warn;
use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;

use crate::error::ParseError;
use crate::CompositorError;

use super::{CompositorConfig, Layer};

/// Errors raised while reading the geometry of a layer's paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path {index} of layer {layer} has no `d` attribute")]
    MissingData { layer: String, index: usize },

    #[error("path {index} of layer {layer}: {message}")]
    Invalid {
        layer: String,
        index: usize,
        message: String,
    },
}

/// Parse `text` the same way for extraction and rendering.
pub(crate) fn parse_document(text: &str) -> Result<Document<'_>, ParseError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Document::parse_with_options(text, options).map_err(|err| ParseError::from_xml(&err, text))
}

/// Direct children of `root` that are `<g>` elements, ignoring any
/// namespace prefix.
pub(crate) fn layer_nodes<'a, 'input>(
    root: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    root.children()
        .filter(|node| node.is_element() && node.tag_name().name() == "g")
}

/// Extract the layers of `text` in document order
pub fn extract_layers(text: &str, config: &CompositorConfig) -> Result<Vec<Layer>, CompositorError> {
    let doc = parse_document(text)?;

    let mut layers = Vec::new();
    for (position, node) in layer_nodes(doc.root_element()).enumerate() {
        layers.push(read_layer(node, position, config)?);
    }
    Ok(layers)
}

fn read_layer(node: Node<'_, '_>, position: usize, config: &CompositorConfig) -> Result<Layer, PathError> {
    let id = node.attribute("id").map(str::to_string);
    let visible = node.attribute("display") != Some("none");
    let label = id.clone().unwrap_or_else(|| format!("#{}", position));

    let mut paths = Vec::new();
    let path_nodes = node
        .children()
        .filter(|child| child.is_element() && child.tag_name().name() == "path");

    for (index, child) in path_nodes.enumerate() {
        match read_path(child, &label, index) {
            Ok(path) => paths.push(path),
            Err(err) if !config.strict_paths => warn!("skipping path: {}", err),
            Err(err) => return Err(err),
        }
    }

    Ok(Layer::new(id, visible, paths))
}

fn read_path(node: Node<'_, '_>, layer: &str, index: usize) -> Result<BezPath, PathError> {
    let data = node.attribute("d").ok_or_else(|| PathError::MissingData {
        layer: layer.to_string(),
        index,
    })?;

    BezPath::from_svg(data).map_err(|err| PathError::Invalid {
        layer: layer.to_string(),
        index,
        message: err.to_string(),
    })
}

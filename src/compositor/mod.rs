//! Layer-visibility compositor
//!
//! Discovers the top-level `<g>` layers of an SVG document and produces the
//! document bytes handed to a rasterizer, with colors substituted and layer
//! `display` attributes overridden.

pub mod config;
mod extract;
mod filter;
pub mod layer;

pub use config::CompositorConfig;
pub use extract::PathError;
pub use layer::{Layer, LayerVisibility};

use log::debug;

use crate::color_map::ColorMapping;
use crate::CompositorError;

/// Stateless layer extraction and rendering with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    config: CompositorConfig,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Extract the root-level `<g>` layers of `document`.
    ///
    /// Fails without a partial result if the document is not well-formed or
    /// (with strict paths) a layer's path data cannot be parsed.
    pub fn extract_layers(&self, document: &str) -> Result<Vec<Layer>, CompositorError> {
        extract::extract_layers(document, &self.config)
    }

    /// Produce the document bytes for rasterization.
    ///
    /// Colors are substituted first, over the raw text. If `visibility` is
    /// empty the substituted text is returned as-is without being parsed;
    /// otherwise every root-level layer whose id has an entry gets
    /// `display="none"` or `display="inline"`.
    pub fn render(
        &self,
        document: &str,
        colors: &ColorMapping,
        visibility: &LayerVisibility,
    ) -> Result<Vec<u8>, CompositorError> {
        let text = self.substitute(document, colors);
        if visibility.is_empty() {
            return Ok(text.into_bytes());
        }

        debug!("applying {} layer visibility overrides", visibility.len());
        rewrite(&text, |_, id| id.and_then(|id| visibility.get(id)))
    }

    /// Like [`render`](Self::render), but each root-level layer takes the
    /// visibility of the entry at the same position in `layers`.
    ///
    /// Layers sharing an id stay independent. Anonymous layers are left
    /// alone, and the document is not parsed when no layer has an id.
    pub fn render_layers(
        &self,
        document: &str,
        colors: &ColorMapping,
        layers: &[Layer],
    ) -> Result<Vec<u8>, CompositorError> {
        let text = self.substitute(document, colors);
        if layers.iter().all(|layer| layer.id.is_none()) {
            return Ok(text.into_bytes());
        }

        rewrite(&text, |position, id| {
            id?;
            layers.get(position).map(Layer::is_visible)
        })
    }

    fn substitute(&self, document: &str, colors: &ColorMapping) -> String {
        if colors.is_empty() {
            return document.to_string();
        }
        debug!("applying {} color substitutions", colors.len());
        colors.apply(document, self.config.color_match)
    }
}

/// Validate `text`, then ask `decide` about each root-level layer by
/// position and id and rewrite the ones it has an answer for.
fn rewrite(
    text: &str,
    decide: impl Fn(usize, Option<&str>) -> Option<bool>,
) -> Result<Vec<u8>, CompositorError> {
    let doc = extract::parse_document(text)?;
    let decisions: Vec<Option<bool>> = extract::layer_nodes(doc.root_element())
        .enumerate()
        .map(|(position, node)| decide(position, node.attribute("id")))
        .collect();
    filter::apply_visibility(text, &decisions)
}

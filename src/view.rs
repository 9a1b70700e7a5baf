//! Host-side view state
//!
//! [`SvgView`] holds what a display widget needs between frames: the source
//! document, its layers, the active color mapping and the last composited
//! bytes. Every setter recomputes the output immediately and notifies the
//! invalidate handler, so the host only forwards its own property changes.

use kurbo::{Affine, Rect, Size, Vec2};
use log::debug;

use crate::color_map::ColorMapping;
use crate::compositor::{Compositor, CompositorConfig, Layer};
use crate::resource::{check_vector_source, decode_document, ResourceResolver};
use crate::CompositorError;

type InvalidateHandler = Box<dyn FnMut(&[u8])>;

/// Layers, color mapping and composited output for one displayed document
pub struct SvgView<R> {
    resolver: R,
    compositor: Compositor,
    source: Option<String>,
    document: String,
    layers: Vec<Layer>,
    colors: ColorMapping,
    output: Option<Vec<u8>>,
    on_invalidate: Option<InvalidateHandler>,
}

impl<R: ResourceResolver> SvgView<R> {
    pub fn new(resolver: R) -> Self {
        Self::with_config(resolver, CompositorConfig::default())
    }

    pub fn with_config(resolver: R, config: CompositorConfig) -> Self {
        Self {
            resolver,
            compositor: Compositor::new(config),
            source: None,
            document: String::new(),
            layers: Vec::new(),
            colors: ColorMapping::new(),
            output: None,
            on_invalidate: None,
        }
    }

    /// Load `source` through the resolver, rebuild its layers and render.
    ///
    /// On failure the previously loaded document stays in place.
    pub fn set_source(&mut self, source: &str) -> Result<(), CompositorError> {
        check_vector_source(source)?;

        let document = decode_document(self.resolver.resolve(source)?)?;
        let layers = self.compositor.extract_layers(&document)?;
        let output = self.compose(&document, &layers)?;
        debug!("loaded '{}' with {} layers", source, layers.len());

        self.source = Some(source.to_string());
        self.document = document;
        self.layers = layers;
        self.publish(output);
        Ok(())
    }

    /// Read the current source again, discarding layer toggles
    pub fn reload(&mut self) -> Result<(), CompositorError> {
        match self.source.clone() {
            Some(source) => self.set_source(&source),
            None => Ok(()),
        }
    }

    /// Replace the color mapping with the parsed `mapping` and re-render
    pub fn set_color_mapping(&mut self, mapping: &str) -> Result<(), CompositorError> {
        self.set_colors(ColorMapping::parse(mapping))
    }

    pub fn clear_color_mapping(&mut self) -> Result<(), CompositorError> {
        self.set_colors(ColorMapping::new())
    }

    pub fn set_colors(&mut self, colors: ColorMapping) -> Result<(), CompositorError> {
        self.colors = colors;
        self.refresh()
    }

    /// Toggle the layer at `index` and re-render.
    ///
    /// Returns `Ok(false)` if there is no such layer.
    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<bool, CompositorError> {
        match self.layers.get_mut(index) {
            Some(layer) => layer.set_visible(visible),
            None => return Ok(false),
        }
        self.refresh()?;
        Ok(true)
    }

    /// Register the callback run with the new output after each render.
    /// Replaces any previous handler.
    pub fn set_invalidate_handler(&mut self, handler: impl FnMut(&[u8]) + 'static) {
        self.on_invalidate = Some(Box::new(handler));
    }

    pub fn clear_invalidate_handler(&mut self) {
        self.on_invalidate = None;
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn colors(&self) -> &ColorMapping {
        &self.colors
    }

    /// The last composited document, if a source has been loaded
    pub fn output(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    fn refresh(&mut self) -> Result<(), CompositorError> {
        if self.source.is_none() {
            return Ok(());
        }
        let output = self.compose(&self.document, &self.layers)?;
        self.publish(output);
        Ok(())
    }

    fn compose(&self, document: &str, layers: &[Layer]) -> Result<Vec<u8>, CompositorError> {
        self.compositor.render_layers(document, &self.colors, layers)
    }

    fn publish(&mut self, output: Vec<u8>) {
        if let Some(handler) = self.on_invalidate.as_mut() {
            handler(&output);
        }
        self.output = Some(output);
    }
}

/// Transform that centres `content` on a surface of `surface` size.
///
/// The scale follows the content's dominant axis: surface width over content
/// width when the content is at least as wide as it is tall, surface height
/// over content height otherwise. Degenerate content is not scaled.
pub fn fit_transform(content: Rect, surface: Size) -> Affine {
    let width = content.width();
    let height = content.height();

    let ratio = if width >= height {
        surface.width / width
    } else {
        surface.height / height
    };
    let ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };

    let centre = Vec2::new(surface.width / 2.0, surface.height / 2.0);
    Affine::translate(centre) * Affine::scale(ratio) * Affine::translate(-content.center().to_vec2())
}

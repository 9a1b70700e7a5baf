//! svg-layers - SVG layer-visibility compositor
//!
//! This library finds the top-level `<g>` layers of an SVG document, applies
//! an ordered color find/replace mapping, and overrides layer `display`
//! attributes before the document is handed to a rasterizer.
//!
//! # Example
//!
//! ```rust
//! use svg_layers::{extract_layers, render, ColorMapping, LayerVisibility};
//!
//! let svg = r##"<svg><g id="sun"><path d="M0 0 L4 4" fill="#FFAA00"/></g></svg>"##;
//!
//! let layers = extract_layers(svg).unwrap();
//! assert_eq!(layers[0].id(), Some("sun"));
//!
//! let out = render(
//!     svg,
//!     &ColorMapping::parse("#FFAA00=#112233"),
//!     &LayerVisibility::new().hide("sun"),
//! )
//! .unwrap();
//! let out = String::from_utf8(out).unwrap();
//! assert!(out.contains(r#"display="none""#));
//! assert!(out.contains("#112233"));
//! ```

pub mod color_map;
pub mod compositor;
pub mod error;
pub mod profile;
pub mod resource;
pub mod view;

pub use color_map::{ColorMapping, ColorMatch};
pub use compositor::{Compositor, CompositorConfig, Layer, LayerVisibility, PathError};
pub use error::ParseError;
pub use profile::{Overrides, Profile, ProfileError};
pub use resource::{EmbeddedResources, FsResources, ResourceError, ResourceResolver};
pub use view::{fit_transform, SvgView};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Errors that can occur while extracting layers or rendering
#[derive(Debug, Error)]
pub enum CompositorError {
    /// The document is not well-formed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A layer's path data could not be read
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// The rewritten document could not be written out
    #[error("serialize error: {0}")]
    Serialize(String),

    /// The document could not be located
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// Extract layers with the default configuration
///
/// # Example
///
/// ```rust
/// use svg_layers::extract_layers;
///
/// let layers = extract_layers(r#"
///     <svg>
///         <g id="a"/>
///         <g id="b" display="none"/>
///     </svg>
/// "#).unwrap();
///
/// assert_eq!(layers.len(), 2);
/// assert!(layers[0].visible);
/// assert!(!layers[1].visible);
/// ```
pub fn extract_layers(document: &str) -> Result<Vec<Layer>, CompositorError> {
    Compositor::default().extract_layers(document)
}

/// Render with the default configuration
pub fn render(
    document: &str,
    colors: &ColorMapping,
    visibility: &LayerVisibility,
) -> Result<Vec<u8>, CompositorError> {
    Compositor::default().render(document, colors, visibility)
}

/// Wrap rendered SVG bytes in a base64 `data:` URI
pub fn data_uri(svg: &[u8]) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

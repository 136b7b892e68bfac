//! QLab Rendering
//!
//! Everything that turns simulation results into bytes for the wire:
//!
//! - [`Figure`]: bar/line charts rasterized to PNG
//! - [`circuit_diagram`]: a wire-and-box PNG view of a circuit
//! - [`Layout`]: photonic chip layout model, rendered to PNG
//! - [`gds`]: minimal GDSII binary export of a layout
//! - [`encode`]: base64 and data-URL helpers
//!
//! Charts are deliberately text-free (no font stack); titles and axis labels
//! travel as JSON fields next to the image.

pub mod circuit;
pub mod draw;
pub mod encode;
pub mod error;
pub mod figure;
pub mod gds;
pub mod layout;

pub use circuit::circuit_diagram;
pub use encode::{to_base64, to_data_url};
pub use error::{RenderError, RenderResult};
pub use figure::Figure;
pub use layout::{Component, ComponentKind, Layout};

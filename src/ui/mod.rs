//! User interface rendering layer.
//!
//! ```text
//! AppState (+ top route) → view model → components → ANSI output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready view model types
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Component renderers (cards, sections, header, ...)
//! - [`helpers`]: Text fitting, cursor positioning and match highlighting
//! - [`theme`]: Color schemes and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{
    CardView, CoverView, FooterInfo, HeaderInfo, HomeBody, Presentation, RouteViewModel,
    SearchBarInfo, SectionView, UIViewModel,
};

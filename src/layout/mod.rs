//! Section layout policy and the expand/collapse state machine.
//!
//! - [`builder`]: pure `(section, state) -> layout` descriptions
//! - [`toggle`]: per-section expansion flags and the toggle transition

pub mod builder;
pub mod toggle;

pub use builder::{
    screen_layout, section_layout, Dimension, Grouping, HeaderDescriptor, Insets, ScreenLayout,
    ScrollBehavior, SectionLayout, Size,
};
pub use toggle::{SectionLayoutState, ToggleLabel, ToggleOutcome};

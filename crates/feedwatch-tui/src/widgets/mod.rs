//! Small rendering helpers shared across screens.

pub mod meter;
pub mod sub_tabs;

//! Search scaffolding shared by the engines: move constraints, constrained
//! sampling and the deadline-aware picker.

mod anytime_picker;
mod constraints;
mod sampling;

pub use anytime_picker::*;
pub use constraints::*;
pub use sampling::*;

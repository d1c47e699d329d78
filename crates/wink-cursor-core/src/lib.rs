//! Gaze and wink driven pointer control over face-mesh landmarks.
//!
//! Landmark extraction happens elsewhere; this crate starts from the
//! normalized 478-point mesh of one face per frame.

mod cursor;
mod ear;
mod gaze;
mod landmarks;
mod pipeline;
mod pointer;
mod wink;

pub use cursor::*;
pub use ear::*;
pub use gaze::*;
pub use landmarks::*;
pub use pipeline::*;
pub use pointer::*;
pub use wink::*;

//! Platform input for the castle renderer.
//!
//! Keyboard and mouse vocabulary comes from winit so that a windowed front
//! end can forward its events unchanged.

mod input;

pub use input::{InputState, KeyCode, MouseButton, OrbitDrag, WIREFRAME_KEY};

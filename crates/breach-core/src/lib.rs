//! Breach Core - foundational types for the Breach gameplay core
//!
//! Provides the math primitives (re-exported from glam), the `Transform`
//! collaborator component every gameplay system reads, and the simulation
//! clock that converts frame deltas into simulation time.

pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec3, Vec4};
pub use time::{GameTime, TimeConfig};
pub use types::Transform;

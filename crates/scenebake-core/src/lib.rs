//! Scenebake Core - Value types shared across the extraction pipeline
//!
//! This crate provides the foundational types used by the scene and asset crates:
//! - Mathematical primitives (re-exported from glam)
//! - The render vertex with bit-exact equality
//! - Double to single precision matrix conversion
//! - The fixed 60 frames-per-second time convention

pub mod time;
pub mod types;

pub use glam::{DMat4, DQuat, DVec2, DVec3, Mat4, Vec2, Vec3, Vec4};
pub use time::{frame_to_time, time_to_frame, FrameRange, FRAMES_PER_SECOND};
pub use types::{to_render_matrix, Vertex, MAX_INFLUENCES};

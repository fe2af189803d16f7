//! Bridge between host applications and the native tracking collaborator —
//! payload construction, boundary calls, and routed log callbacks.

pub mod bridge;
pub mod platform;

pub use bridge::Bridge;
pub use platform::{BoundaryCall, NoopPlatform, Platform, RecordingPlatform};

//! Core type aliases and re-exports

pub use glam::{
    Vec3, Mat4,
    DVec3, DMat4,
};

/// Standard Result type for the demo
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

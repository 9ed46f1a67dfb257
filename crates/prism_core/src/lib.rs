//! Prism Core - scene description for the Prism ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `SceneObject`, `Mesh`, `Material`, `Light`, `Camera`
//! - **Textures**: `TextureMap` decoding and sampling, `TextureCache`
//! - **Scene files**: JSON scene loading via `load_scene`
//!
//! # Example
//!
//! ```ignore
//! use prism_core::load_scene;
//!
//! let scene = load_scene("scenes/spheres.json")?;
//! println!("Loaded {} objects, {} lights",
//!     scene.object_count(),
//!     scene.light_count());
//! ```

pub mod camera;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use camera::Camera;
pub use light::Light;
pub use loader::{load_scene, load_scene_from_str, LoadError, LoadResult};
pub use material::{Material, MaterialParameter};
pub use mesh::{Mesh, MeshError};
pub use scene::{Scene, SceneObject};
pub use texture::{TextureCache, TextureError, TextureMap, TextureResult};

/// Color type alias (RGB values typically 0-1)
pub type Color = prism_math::Vec3;

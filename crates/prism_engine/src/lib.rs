//! # Prism Engine
//!
//! A cross-platform real-time 3D application engine: a windowed application
//! shell, an entity-component scene store, and a pluggable graphics-backend
//! abstraction with a concrete Vulkan implementation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prism_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let spec = ApplicationSpec {
//!         name: "Demo".to_string(),
//!         args: CommandLineArgs::new(std::env::args()),
//!         ..Default::default()
//!     };
//!     let mut app = Application::new(spec)?;
//!     app.scene_mut().create("Camera");
//!     app.run()
//! }
//! ```

#![warn(missing_docs)]

pub mod assets;
pub mod core;
pub mod ecs;
pub mod foundation;
pub mod render;
pub mod window;

mod application;

pub use application::{is_minimized_size, Application, ApplicationSpec, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::application::{Application, ApplicationSpec, EngineError};
    pub use crate::assets::Assets;
    pub use crate::core::{CommandLineArgs, Config};
    pub use crate::ecs::{Entity, Scene, Transform};
    pub use crate::foundation::math::{Mat4, Vec2, Vec3};
    pub use crate::render::{BackendKind, Renderer};
    pub use crate::window::Window;
}

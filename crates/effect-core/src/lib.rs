//! Pointer-reactive typography and pane effect engine.
//!
//! Platform-independent: the host supplies a [`Clock`], a [`GeometrySource`]
//! and a [`RenderSurface`], feeds input through the engine's adapter methods
//! and calls [`EffectEngine::frame`] once per animation callback.

pub mod adapters;
pub mod config;
pub mod constants;
pub mod effect;
pub mod engine;
pub mod error;
pub mod grid;
pub mod permission;
pub mod quality;
pub mod registry;
pub mod scheduler;
pub mod state;
pub mod uniforms;

pub use adapters::*;
pub use config::*;
pub use effect::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use permission::*;
pub use quality::*;
pub use registry::*;
pub use scheduler::*;
pub use state::*;
pub use uniforms::*;

// Compositor + wave-simulation core for driving 1D/2D LED arrays.
//
// Single-threaded, cooperative: the host calls `FxEngine::draw(now, out)`
// once per frame. Nothing in here spawns tasks, blocks, or holds a timer
// of its own. Hardware (LED drivers, SPI/SDIO transports, storage) lives
// outside this crate.

#![no_std]

extern crate alloc;

pub mod bytestream;
pub mod compositor;
pub mod effect;
pub mod effects;
pub mod engine;
pub mod interpolate;
pub mod layer;
pub mod pixel;
pub mod ring;
pub mod time;
pub mod transition;
pub mod wave;
pub mod xymap;

pub use effect::{DrawContext, Effect};
pub use engine::{EffectHandle, EngineError, FxEngine};
pub use pixel::{DrawMode, Frame, Pixel};
pub use time::TimeScale;
pub use transition::Transition;
pub use xymap::XYMap;

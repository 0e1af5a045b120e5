//! Supplemental effect library: the non-wave effects the original ships
//! alongside its wave simulator. Noise generation, palette tables, and the
//! Animartrix detail library itself stay out of scope (see the crate's
//! concurrency and scope notes) — what's here is the effect *shape*
//! (composition, delegation, adaptation) with the generator left to the
//! caller.

pub mod blend2d;
pub mod layered;
pub mod noise_palette;
pub mod scale_up;
pub mod video;

#[cfg(feature = "animartrix")]
pub mod animartrix;

pub use blend2d::Blend2d;
pub use layered::Fx2dLayered;
pub use noise_palette::NoisePalette;
pub use scale_up::ScaleUp;
pub use video::Video;

#[cfg(feature = "animartrix")]
pub use animartrix::{AnimartrixAdapter, AnimartrixSource};

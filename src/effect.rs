//! The trait every animation implements, plus the per-frame context it's
//! handed. Deliberately flat: 2D-ness is data (an [`XYMap`](crate::XYMap)
//! owned by the effect), not a type in the hierarchy, and capability is
//! opt-in via default-returning methods rather than a chain of base
//! classes.

use crate::pixel::Pixel;

/// What an [`Effect::draw`] call is given to render into.
pub struct DrawContext<'a> {
    pub now_ms: u32,
    pub leds: &'a mut [Pixel],
    pub alpha: Option<&'a mut [u8]>,
}

impl<'a> DrawContext<'a> {
    pub fn new(now_ms: u32, leds: &'a mut [Pixel]) -> Self {
        Self {
            now_ms,
            leds,
            alpha: None,
        }
    }
}

/// A named entity that writes a full frame given `(now, leds)`.
///
/// Not `Send`: the engine is single-threaded cooperative (see the crate's
/// concurrency notes), and effects are shared between the registry and the
/// compositor via [`EffectHandle`](crate::engine::EffectHandle) rather than
/// moved, mirroring the reference-counted `Fx` pointers of the original.
pub trait Effect {
    /// Render one frame into `context.leds`. Called at most once per
    /// [`FxLayer::draw`](crate::layer::FxLayer::draw) invocation.
    fn draw(&mut self, context: DrawContext<'_>);

    fn name(&self) -> &str;

    fn num_leds(&self) -> u16;

    /// `Some(fps)` if this effect wants to be driven at a constant frame
    /// rate (enabling [interpolation](crate::interpolate)) rather than
    /// being rendered fresh on every `draw` call.
    fn has_fixed_fps(&self) -> Option<f32> {
        None
    }

    fn has_alpha_channel(&self) -> bool {
        false
    }

    /// Called when a transition finishes and this effect is no longer the
    /// one being shown.
    fn pause(&mut self, _now_ms: u32) {}

    /// Called the first time this effect is drawn after being paused (or
    /// for the very first time).
    fn resume(&mut self, _now_ms: u32) {}

    /// Number of sub-effects this effect multiplexes, if any. `1` for a
    /// plain single-purpose effect.
    fn fx_count(&self) -> usize {
        1
    }

    fn fx_set(&mut self, _index: usize) {}

    /// Advance the active sub-effect by `delta` (negative allowed).
    fn fx_next(&mut self, _delta: i32) {}

    fn fx_get(&self) -> usize {
        0
    }
}

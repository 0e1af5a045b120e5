//! A single slot in the compositor: one effect, its scratch frame, and the
//! pause/resume lifecycle that goes with being swapped in and out.

use crate::effect::DrawContext;
use crate::engine::EffectHandle;
use crate::pixel::Frame;

/// Owns at most one [`EffectHandle`] (shared with the registry) plus the
/// scratch buffer it renders into. Allocation of the scratch frame is
/// deferred until the first `draw` call, since the layer doesn't know its
/// size until then.
pub struct FxLayer {
    effect: Option<EffectHandle>,
    scratch: Option<Frame>,
    running: bool,
}

impl FxLayer {
    pub fn new() -> Self {
        Self {
            effect: None,
            scratch: None,
            running: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effect.is_none()
    }

    pub fn effect(&self) -> Option<&EffectHandle> {
        self.effect.as_ref()
    }

    /// Replace the effect this layer holds, pausing and returning whatever
    /// was there before.
    pub fn set(&mut self, effect: EffectHandle, now_ms: u32) -> Option<EffectHandle> {
        let previous = self.effect.take();
        if let Some(prev) = &previous {
            prev.borrow_mut().pause(now_ms);
        }
        self.effect = Some(effect);
        self.scratch = None;
        self.running = false;
        previous
    }

    pub fn clear(&mut self, now_ms: u32) -> Option<EffectHandle> {
        let previous = self.effect.take();
        if let Some(prev) = &previous {
            prev.borrow_mut().pause(now_ms);
        }
        self.scratch = None;
        self.running = false;
        previous
    }

    /// Render this layer's effect at `now_ms` into its scratch frame and
    /// return a reference to it. No-op (and returns `None`) if the layer is
    /// empty.
    pub fn draw(&mut self, now_ms: u32, num_leds: u16) -> Option<&Frame> {
        let effect = self.effect.as_ref()?;
        let scratch = self
            .scratch
            .get_or_insert_with(|| Frame::new(num_leds as usize));
        scratch.clear();
        let mut effect = effect.borrow_mut();
        if !self.running {
            effect.resume(now_ms);
            self.running = true;
        }
        let ctx = DrawContext::new(now_ms, scratch.rgb_mut());
        effect.draw(ctx);
        drop(effect);
        Some(scratch)
    }
}

impl Default for FxLayer {
    fn default() -> Self {
        Self::new()
    }
}

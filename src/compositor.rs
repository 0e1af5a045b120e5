//! Two-layer cross-fade compositor: the engine keeps exactly one "current"
//! and, while transitioning, one "next" effect, and blends between their
//! rendered frames.

use crate::engine::EffectHandle;
use crate::layer::FxLayer;
use crate::pixel::Pixel;
use crate::transition::Transition;

/// Exactly two [`FxLayer`]s (`a`, `b`) and a [`Transition`] driving the
/// cross-fade between them. Invariant: `b` is empty whenever no transition
/// is in flight.
pub struct FxCompositor {
    a: FxLayer,
    b: FxLayer,
    transition: Transition,
    num_leds: u16,
}

impl FxCompositor {
    pub fn new(num_leds: u16) -> Self {
        Self {
            a: FxLayer::new(),
            b: FxLayer::new(),
            transition: Transition::new(),
            num_leds,
        }
    }

    pub fn set_current(&mut self, effect: EffectHandle, now_ms: u32) -> Option<EffectHandle> {
        self.a.set(effect, now_ms)
    }

    pub fn current(&self) -> Option<&EffectHandle> {
        self.a.effect()
    }

    /// Start a cross-fade into `next`. Completes any transition already in
    /// flight first (A becomes whatever B was rendering, discarding B's
    /// effect without letting it finish fading in).
    pub fn start_transition(&mut self, now_ms: u32, duration_ms: u32, next: EffectHandle) {
        if self.transition.is_transitioning(now_ms) {
            self.force_complete(now_ms);
        }
        self.b.set(next, now_ms);
        self.transition.start(now_ms, duration_ms);
    }

    fn force_complete(&mut self, now_ms: u32) {
        if let Some(effect) = self.b.clear(now_ms) {
            self.a.set(effect, now_ms);
        }
        self.transition.end();
    }

    /// Render at `now_ms` (real time, used for the transition progress) and
    /// `warped_ms` (the time effects actually see), writing into `out`.
    pub fn draw(&mut self, now_ms: u32, warped_ms: u32, out: &mut [Pixel]) {
        if self.a.is_empty() {
            out.fill(Pixel::BLACK);
            return;
        }

        let a_frame = self.a.draw(warped_ms, self.num_leds).map(|f| f.rgb().to_vec());
        let Some(a_frame) = a_frame else {
            out.fill(Pixel::BLACK);
            return;
        };

        let progress = self.transition.progress(now_ms);
        if progress == 0 {
            let n = out.len().min(a_frame.len());
            out[..n].copy_from_slice(&a_frame[..n]);
            return;
        }

        let b_frame = self.b.draw(warped_ms, self.num_leds).map(|f| f.rgb().to_vec());

        let n = out.len().min(a_frame.len());
        match &b_frame {
            Some(b) => {
                let n = n.min(b.len());
                for i in 0..n {
                    out[i] = a_frame[i].blend(b[i], progress);
                }
            }
            None => out[..n].copy_from_slice(&a_frame[..n]),
        }

        if progress == 255 {
            if let Some(effect) = self.b.clear(warped_ms) {
                self.a.set(effect, warped_ms);
            }
            self.transition.end();
        }
    }

    pub fn is_transitioning(&self, now_ms: u32) -> bool {
        self.transition.is_transitioning(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{DrawContext, Effect};
    use crate::engine::new_effect_handle;

    struct Solid(Pixel);

    impl Effect for Solid {
        fn draw(&mut self, ctx: DrawContext<'_>) {
            for p in ctx.leds.iter_mut() {
                *p = self.0;
            }
        }
        fn name(&self) -> &str {
            "solid"
        }
        fn num_leds(&self) -> u16 {
            4
        }
    }

    #[test]
    fn empty_compositor_clears_output() {
        let mut comp = FxCompositor::new(4);
        let mut out = [Pixel::WHITE; 4];
        comp.draw(0, 0, &mut out);
        assert!(out.iter().all(Pixel::is_black));
    }

    #[test]
    fn no_transition_copies_a_directly() {
        let mut comp = FxCompositor::new(4);
        comp.set_current(new_effect_handle(Solid(Pixel::new(10, 20, 30))), 0);
        let mut out = [Pixel::BLACK; 4];
        comp.draw(0, 0, &mut out);
        assert!(out.iter().all(|p| *p == Pixel::new(10, 20, 30)));
    }

    #[test]
    fn transition_blends_then_completes() {
        let mut comp = FxCompositor::new(4);
        comp.set_current(new_effect_handle(Solid(Pixel::new(0, 0, 0))), 0);
        comp.start_transition(0, 100, new_effect_handle(Solid(Pixel::new(255, 255, 255))));

        let mut out = [Pixel::BLACK; 4];
        comp.draw(50, 50, &mut out);
        assert!(out[0].r > 0 && out[0].r < 255, "mid-transition should blend");

        comp.draw(100, 100, &mut out);
        assert_eq!(out[0], Pixel::new(255, 255, 255));
        assert!(!comp.is_transitioning(100));
    }

    #[test]
    fn transition_mid_point_matches_seed_scenario() {
        let mut comp = FxCompositor::new(10);
        comp.set_current(new_effect_handle(Solid(Pixel::new(255, 0, 0))), 0);
        comp.start_transition(0, 1000, new_effect_handle(Solid(Pixel::new(0, 0, 255))));

        let mut out = [Pixel::BLACK; 10];
        comp.draw(0, 0, &mut out);
        assert!(out.iter().all(|p| *p == Pixel::new(255, 0, 0)));

        comp.draw(500, 500, &mut out);
        assert!(out.iter().all(|p| *p == Pixel::new(128, 0, 127)));

        comp.draw(1000, 1000, &mut out);
        assert!(out.iter().all(|p| *p == Pixel::new(0, 0, 255)));
    }

    #[test]
    fn zero_duration_transition_jumps_immediately() {
        let mut comp = FxCompositor::new(4);
        comp.set_current(new_effect_handle(Solid(Pixel::BLACK)), 0);
        comp.start_transition(0, 0, new_effect_handle(Solid(Pixel::WHITE)));
        let mut out = [Pixel::BLACK; 4];
        comp.draw(0, 0, &mut out);
        assert_eq!(out[0], Pixel::WHITE);
    }
}

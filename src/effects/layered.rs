//! Composites layers back-to-front into one shared accumulator, each layer
//! drawing directly on top of whatever came before it, blended into the
//! output by black after every layer. Distinct from [`Blend2d`](super::Blend2d):
//! that one gives each layer a fresh scratch frame and treats the bottom
//! layer specially; this one never clears between layers and has no
//! special-cased bottom.

use alloc::vec::Vec;

use crate::effect::{DrawContext, Effect};
use crate::engine::EffectHandle;
use crate::pixel::{DrawMode, Frame};
use crate::xymap::XYMap;

pub struct Fx2dLayered {
    xymap: XYMap,
    layers: Vec<EffectHandle>,
    frame: Frame,
}

impl Fx2dLayered {
    pub fn new(xymap: XYMap) -> Self {
        let n = xymap.total() as usize;
        Self {
            xymap,
            layers: Vec::new(),
            frame: Frame::new(n),
        }
    }

    pub fn add_layer(&mut self, layer: EffectHandle) {
        self.layers.push(layer);
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

impl Effect for Fx2dLayered {
    fn draw(&mut self, context: DrawContext<'_>) {
        self.frame.clear();
        for layer in self.layers.iter().rev() {
            {
                let mut layer = layer.borrow_mut();
                layer.draw(DrawContext::new(context.now_ms, self.frame.rgb_mut()));
            }
            self.frame
                .draw_xy(context.leds, &self.xymap, DrawMode::BlendByBlack);
        }
    }

    fn name(&self) -> &str {
        "fx2d_layered"
    }

    fn num_leds(&self) -> u16 {
        self.xymap.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::new_effect_handle;
    use crate::pixel::Pixel;
    use alloc::vec;

    struct Solid(Pixel);
    impl Effect for Solid {
        fn draw(&mut self, ctx: DrawContext<'_>) {
            ctx.leds.fill(self.0);
        }
        fn name(&self) -> &str {
            "solid"
        }
        fn num_leds(&self) -> u16 {
            4
        }
    }

    struct HalfBlack(Pixel);
    impl Effect for HalfBlack {
        fn draw(&mut self, ctx: DrawContext<'_>) {
            let mid = ctx.leds.len() / 2;
            for px in ctx.leds[mid..].iter_mut() {
                *px = self.0;
            }
        }
        fn name(&self) -> &str {
            "half_black"
        }
        fn num_leds(&self) -> u16 {
            4
        }
    }

    #[test]
    fn layers_added_first_draw_on_top_since_iteration_is_reversed() {
        let xymap = XYMap::rectangular(4, 1);
        let mut fx = Fx2dLayered::new(xymap);
        fx.add_layer(new_effect_handle(Solid(Pixel::new(1, 1, 1))));
        fx.add_layer(new_effect_handle(HalfBlack(Pixel::new(9, 9, 9))));
        let mut leds = vec![Pixel::BLACK; 4];
        fx.draw(DrawContext::new(0, &mut leds));
        // HalfBlack (added last) is drawn first (reverse order), then Solid
        // (added first) draws over the whole frame, so Solid wins everywhere.
        assert!(leds.iter().all(|p| *p == Pixel::new(1, 1, 1)));
    }

    #[test]
    fn no_layers_clears_scratch_but_leaves_output_untouched() {
        let xymap = XYMap::rectangular(2, 1);
        let mut fx = Fx2dLayered::new(xymap);
        let mut leds = vec![Pixel::WHITE; 2];
        fx.draw(DrawContext::new(0, &mut leds));
        assert!(leds.iter().all(|p| *p == Pixel::WHITE));
    }
}

//! Stacks layers bottom-to-top: the bottom layer always wins outright, each
//! layer above it only shows through where it isn't black. No post-blur —
//! the original's blur pass lives in the excluded noise/palette utility
//! layer and isn't ported here.

use alloc::vec::Vec;

use crate::effect::{DrawContext, Effect};
use crate::engine::EffectHandle;
use crate::pixel::{DrawMode, Frame};
use crate::xymap::XYMap;

pub struct Blend2d {
    xymap: XYMap,
    layers: Vec<EffectHandle>,
    scratch: Frame,
}

impl Blend2d {
    pub fn new(xymap: XYMap) -> Self {
        let n = xymap.total() as usize;
        Self {
            xymap,
            layers: Vec::new(),
            scratch: Frame::new(n),
        }
    }

    pub fn add(&mut self, layer: EffectHandle) {
        self.layers.push(layer);
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

impl Effect for Blend2d {
    fn draw(&mut self, context: DrawContext<'_>) {
        for (i, layer) in self.layers.iter().enumerate() {
            self.scratch.clear();
            {
                let mut layer = layer.borrow_mut();
                layer.draw(DrawContext::new(context.now_ms, self.scratch.rgb_mut()));
            }
            let mode = if i == 0 {
                DrawMode::Overwrite
            } else {
                DrawMode::BlendByBlack
            };
            self.scratch.draw_xy(context.leds, &self.xymap, mode);
        }
    }

    fn name(&self) -> &str {
        "blend2d"
    }

    fn num_leds(&self) -> u16 {
        self.xymap.total()
    }
}

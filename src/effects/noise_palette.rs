//! A 2D field mapped through a palette. Noise generation itself is out of
//! scope (see the crate's scope notes), so the field is whatever a
//! caller-supplied closure produces; this type owns only the grid walk and
//! the palette indirection.

use alloc::boxed::Box;

use crate::effect::{DrawContext, Effect};
use crate::wave::Colorizer;
use crate::xymap::XYMap;

/// Walks `xymap`'s grid once per frame, samples `noise(x, y, now_ms)` at
/// each cell, and maps the result through `colorizer`.
pub struct NoisePalette {
    xymap: XYMap,
    colorizer: Box<dyn Colorizer>,
    noise: Box<dyn FnMut(u16, u16, u32) -> u8>,
}

impl NoisePalette {
    pub fn new(
        xymap: XYMap,
        colorizer: Box<dyn Colorizer>,
        noise: Box<dyn FnMut(u16, u16, u32) -> u8>,
    ) -> Self {
        Self {
            xymap,
            colorizer,
            noise,
        }
    }

    pub fn set_colorizer(&mut self, colorizer: Box<dyn Colorizer>) {
        self.colorizer = colorizer;
    }
}

impl Effect for NoisePalette {
    fn draw(&mut self, context: DrawContext<'_>) {
        let width = self.xymap.width();
        let height = self.xymap.height();
        for y in 0..height {
            for x in 0..width {
                let value = (self.noise)(x, y, context.now_ms);
                let idx = self.xymap.map_to_index(x, y) as usize;
                if let Some(px) = context.leds.get_mut(idx) {
                    *px = self.colorizer.color_for(value);
                }
            }
        }
    }

    fn name(&self) -> &str {
        "noise_palette"
    }

    fn num_leds(&self) -> u16 {
        self.xymap.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;
    use crate::wave::GrayscaleMap;
    use alloc::boxed::Box;
    use alloc::vec;

    #[test]
    fn samples_closure_once_per_cell() {
        let xymap = XYMap::rectangular(2, 2);
        let mut fx = NoisePalette::new(
            xymap,
            Box::new(GrayscaleMap),
            Box::new(|x, y, _now| (x as u8) * 10 + y as u8),
        );
        let mut leds = vec![Pixel::BLACK; 4];
        fx.draw(DrawContext::new(0, &mut leds));
        assert_eq!(leds[0], Pixel::gray(0));
        assert_eq!(leds[1], Pixel::gray(10));
        assert_eq!(leds[2], Pixel::gray(1));
        assert_eq!(leds[3], Pixel::gray(11));
    }

    #[test]
    fn noise_input_depends_on_now_ms() {
        let xymap = XYMap::rectangular(1, 1);
        let mut fx = NoisePalette::new(
            xymap,
            Box::new(GrayscaleMap),
            Box::new(|_x, _y, now| (now % 256) as u8),
        );
        let mut leds = vec![Pixel::BLACK; 1];
        fx.draw(DrawContext::new(42, &mut leds));
        assert_eq!(leds[0], Pixel::gray(42));
    }
}

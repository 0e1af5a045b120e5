//! Adapter surface for a drop-in Animartrix-style detail library. The
//! library's internals are out of scope (see the crate's scope notes); this
//! defines only the seam a caller-supplied renderer plugs into.

use crate::effect::{DrawContext, Effect};
use crate::pixel::Pixel;
use crate::xymap::XYMap;

/// What an Animartrix-style detail generator implements: one pixel at a
/// time, given its grid coordinate and the current time.
pub trait AnimartrixSource {
    fn render(&mut self, x: u16, y: u16, now_ms: u32) -> Pixel;
}

/// Walks `xymap`'s grid each frame and fills every cell from `source`.
pub struct AnimartrixAdapter<S: AnimartrixSource> {
    xymap: XYMap,
    source: S,
}

impl<S: AnimartrixSource> AnimartrixAdapter<S> {
    pub fn new(xymap: XYMap, source: S) -> Self {
        Self { xymap, source }
    }
}

impl<S: AnimartrixSource> Effect for AnimartrixAdapter<S> {
    fn draw(&mut self, context: DrawContext<'_>) {
        let width = self.xymap.width();
        let height = self.xymap.height();
        for y in 0..height {
            for x in 0..width {
                let idx = self.xymap.map_to_index(x, y) as usize;
                if let Some(dst) = context.leds.get_mut(idx) {
                    *dst = self.source.render(x, y, context.now_ms);
                }
            }
        }
    }

    fn name(&self) -> &str {
        "animartrix"
    }

    fn num_leds(&self) -> u16 {
        self.xymap.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Checkerboard;
    impl AnimartrixSource for Checkerboard {
        fn render(&mut self, x: u16, y: u16, _now_ms: u32) -> Pixel {
            if (x + y) % 2 == 0 {
                Pixel::WHITE
            } else {
                Pixel::BLACK
            }
        }
    }

    #[test]
    fn adapter_forwards_coordinates_to_source() {
        let xymap = XYMap::rectangular(2, 2);
        let mut fx = AnimartrixAdapter::new(xymap, Checkerboard);
        let mut leds = vec![Pixel::BLACK; 4];
        fx.draw(DrawContext::new(0, &mut leds));
        assert_eq!(leds[0], Pixel::WHITE);
        assert_eq!(leds[1], Pixel::BLACK);
        assert_eq!(leds[2], Pixel::BLACK);
        assert_eq!(leds[3], Pixel::WHITE);
    }
}

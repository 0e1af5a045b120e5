//! Turns a [`WaveSim2D`]'s amplitude field into pixels: the physics stays
//! in the simulator, the aesthetics live here behind a [`Colorizer`].

use alloc::boxed::Box;
use alloc::vec;

use crate::effect::{DrawContext, Effect};
use crate::pixel::Pixel;
use crate::xymap::XYMap;

use super::super_sample::{SuperSample, U8Easing, WaveSim2D};

/// Converts an 8-bit amplitude sample into a pixel. Implementations are
/// encouraged to batch calls (process runs of indices together) so palette
/// math can be amortized.
pub trait Colorizer: Send {
    fn color_for(&self, value: u8) -> Pixel;

    /// Map a contiguous run of amplitude samples at once. The default
    /// forwards one at a time; a batching colorizer can override this.
    fn fill(&self, values: &[u8], out: &mut [Pixel]) {
        for (v, px) in values.iter().zip(out.iter_mut()) {
            *px = self.color_for(*v);
        }
    }
}

/// `pixel = (v, v, v)` — the default "black to white" mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrayscaleMap;

impl Colorizer for GrayscaleMap {
    fn color_for(&self, value: u8) -> Pixel {
        Pixel::gray(value)
    }
}

/// A 16-entry color palette sampled with linear interpolation between
/// adjacent entries, FastLED `ColorFromPalette(..., LINEARBLEND)` style.
#[cfg(feature = "gradient")]
#[derive(Debug, Clone, Copy)]
pub struct GradientMap {
    entries: [Pixel; 16],
}

#[cfg(feature = "gradient")]
impl GradientMap {
    pub const fn new(entries: [Pixel; 16]) -> Self {
        Self { entries }
    }
}

#[cfg(feature = "gradient")]
impl Colorizer for GradientMap {
    fn color_for(&self, value: u8) -> Pixel {
        // Each of the 16 entries spans 16 output codes; within a span,
        // blend linearly toward the next entry.
        let hi = (value >> 4) as usize;
        let frac = (value & 0x0f) << 4; // scale nibble back to 0..=255
        let a = self.entries[hi.min(15)];
        let b = self.entries[(hi + 1).min(15)];
        a.blend(b, frac)
    }
}

/// Pairs a super-sampled wave simulation with a colorizer and exposes it as
/// an [`Effect`].
pub struct WaveFx {
    xymap: XYMap,
    sim: WaveSim2D,
    colorizer: Box<dyn Colorizer>,
    auto_update: bool,
    name: &'static str,
}

impl WaveFx {
    pub fn new(xymap: XYMap, factor: SuperSample, speed: f32, dampening: i32) -> Self {
        let sim = WaveSim2D::new(
            xymap.width() as u32,
            xymap.height() as u32,
            factor,
            speed,
            dampening,
        );
        Self {
            xymap,
            sim,
            colorizer: Box::new(GrayscaleMap),
            auto_update: true,
            name: "WaveFx",
        }
    }

    pub fn set_colorizer(&mut self, colorizer: Box<dyn Colorizer>) {
        self.colorizer = colorizer;
    }

    pub fn set_auto_update(&mut self, on: bool) {
        self.auto_update = on;
    }

    pub fn set_x_cyclical(&mut self, on: bool) {
        self.sim.set_x_cyclical(on);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.sim.set_speed(speed);
    }

    pub fn set_dampening(&mut self, dampening: i32) {
        self.sim.set_dampening(dampening);
    }

    pub fn set_half_duplex(&mut self, on: bool) {
        self.sim.set_half_duplex(on);
    }

    pub fn set_super_sample(&mut self, factor: SuperSample) {
        self.sim.set_super_sample(factor);
    }

    pub fn set_easing_mode(&mut self, easing: U8Easing) {
        self.sim.set_easing_mode(easing);
    }

    pub fn set_use_change_grid(&mut self, on: bool) {
        self.sim.set_use_change_grid(on);
    }

    pub fn set_f(&mut self, x: u32, y: u32, value: f32) {
        self.sim.set_f(x, y, value);
    }

    /// Adds `value` to the current amplitude at `(x, y)`, clamping the sum
    /// to `1.0` (matching the wave equation's Q15 ceiling).
    pub fn add_f(&mut self, x: u32, y: u32, value: f32) {
        let sum = value + self.sim.get_f(x, y);
        self.sim.set_f(x, y, sum.min(1.0));
    }

    pub fn get_u8(&self, x: u32, y: u32) -> u8 {
        self.sim.get_u8(x, y)
    }

    pub fn update(&mut self) {
        self.sim.update();
    }
}

impl Effect for WaveFx {
    fn draw(&mut self, context: DrawContext<'_>) {
        if self.auto_update {
            self.sim.update();
        }
        let width = self.sim.width();
        let height = self.sim.height();
        for y in 0..height {
            for x in 0..width {
                let idx = self.xymap.map_to_index(x as u16, y as u16) as usize;
                if let Some(px) = context.leds.get_mut(idx) {
                    *px = self.colorizer.color_for(self.sim.get_u8(x, y));
                }
            }
        }
    }

    fn name(&self) -> &str {
        self.name
    }

    fn num_leds(&self) -> u16 {
        self.xymap.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_colorizer_is_identity_on_each_channel() {
        let c = GrayscaleMap;
        let px = c.color_for(128);
        assert_eq!(px, Pixel::gray(128));
    }

    #[test]
    fn wavefx_draw_writes_into_leds() {
        let xymap = XYMap::rectangular(4, 4);
        let mut fx = WaveFx::new(xymap, SuperSample::None, 0.2, 4);
        fx.set_f(2, 2, 1.0);
        let mut leds = vec![Pixel::BLACK; 16];
        let ctx = DrawContext::new(0, &mut leds);
        fx.draw(ctx);
        assert!(leds.iter().any(|p| !p.is_black()));
    }

    #[test]
    fn add_f_clamps_to_one() {
        let xymap = XYMap::rectangular(2, 2);
        let mut fx = WaveFx::new(xymap, SuperSample::None, 0.2, 4);
        fx.sim.set_half_duplex(false);
        fx.add_f(0, 0, 0.8);
        fx.add_f(0, 0, 0.8);
        assert!(fx.sim.get_f(0, 0) <= 1.0);
    }

    #[cfg(feature = "gradient")]
    #[test]
    fn gradient_map_interpolates_between_entries() {
        let mut entries = [Pixel::BLACK; 16];
        entries[0] = Pixel::new(0, 0, 0);
        entries[1] = Pixel::new(160, 0, 0);
        let g = GradientMap::new(entries);
        let low = g.color_for(0);
        let mid = g.color_for(8);
        let high = g.color_for(15);
        assert!(low.r < mid.r);
        assert!(mid.r <= high.r);
    }
}

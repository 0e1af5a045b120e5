//! Renders a delegate effect at a smaller resolution and bilinearly
//! expands it to the outer grid, for hosts that can't afford to run the
//! full-resolution effect every frame. Grounded in `ScaleUp::expand` /
//! `bilinearExpand`.

use alloc::vec;
use alloc::vec::Vec;

use crate::effect::{DrawContext, Effect};
use crate::engine::EffectHandle;
use crate::pixel::{Frame, Pixel};
use crate::xymap::XYMap;

/// Wraps `delegate`, which renders into an `in_w x in_h` rectangular
/// surface, and bilinearly expands that surface into `xymap`'s (generally
/// larger) grid every frame.
pub struct ScaleUp {
    xymap: XYMap,
    delegate: EffectHandle,
    in_w: u16,
    in_h: u16,
    surface: Option<Frame>,
}

impl ScaleUp {
    pub fn new(xymap: XYMap, delegate: EffectHandle, in_w: u16, in_h: u16) -> Self {
        Self {
            xymap,
            delegate,
            in_w,
            in_h,
            surface: None,
        }
    }
}

impl Effect for ScaleUp {
    fn draw(&mut self, context: DrawContext<'_>) {
        let surface = self
            .surface
            .get_or_insert_with(|| Frame::new(self.in_w as usize * self.in_h as usize));
        surface.clear();
        {
            let mut delegate = self.delegate.borrow_mut();
            delegate.draw(DrawContext::new(context.now_ms, surface.rgb_mut()));
        }

        if self.in_w == self.xymap.width() && self.in_h == self.xymap.height() {
            for y in 0..self.in_h {
                for x in 0..self.in_w {
                    let idx = self.xymap.map_to_index(x, y) as usize;
                    if let Some(dst) = context.leds.get_mut(idx) {
                        *dst = surface.rgb()[y as usize * self.in_w as usize + x as usize];
                    }
                }
            }
        } else {
            let expanded = bilinear_expand(surface.rgb(), self.in_w, self.in_h, &self.xymap);
            let n = context.leds.len().min(expanded.len());
            context.leds[..n].copy_from_slice(&expanded[..n]);
        }
    }

    fn name(&self) -> &str {
        "scale_up"
    }

    fn num_leds(&self) -> u16 {
        self.xymap.total()
    }
}

/// Bilinearly expand an `in_w x in_h` source grid into `xymap`'s grid.
/// Fractional source coordinates are tracked in 8-bit fixed point (`256` =
/// one full source cell).
fn bilinear_expand(input: &[Pixel], in_w: u16, in_h: u16, xymap: &XYMap) -> Vec<Pixel> {
    let out_w = xymap.width();
    let out_h = xymap.height();
    let mut output = vec![Pixel::BLACK; xymap.total() as usize];
    if in_w == 0 || in_h == 0 || out_w == 0 || out_h == 0 {
        return output;
    }

    for oy in 0..out_h {
        for ox in 0..out_w {
            let src_x = scaled_source_coord(ox, out_w, in_w);
            let src_y = scaled_source_coord(oy, out_h, in_h);
            let x0 = (src_x / 256) as u16;
            let y0 = (src_y / 256) as u16;
            let fx = src_x % 256;
            let fy = src_y % 256;
            let x1 = (x0 + 1).min(in_w - 1);
            let y1 = (y0 + 1).min(in_h - 1);

            let p00 = input[y0 as usize * in_w as usize + x0 as usize];
            let p10 = input[y0 as usize * in_w as usize + x1 as usize];
            let p01 = input[y1 as usize * in_w as usize + x0 as usize];
            let p11 = input[y1 as usize * in_w as usize + x1 as usize];

            let idx = xymap.map_to_index(ox, oy) as usize;
            if idx < output.len() {
                output[idx] = Pixel::new(
                    blend4(p00.r, p10.r, p01.r, p11.r, fx, fy),
                    blend4(p00.g, p10.g, p01.g, p11.g, fx, fy),
                    blend4(p00.b, p10.b, p01.b, p11.b, fx, fy),
                );
            }
        }
    }
    output
}

/// Position of output coordinate `o` (of `out_n`) in an `in_n`-wide source
/// axis, in 8-bit fixed point.
fn scaled_source_coord(o: u16, out_n: u16, in_n: u16) -> u32 {
    if out_n <= 1 {
        return 0;
    }
    (o as u32 * (in_n as u32 - 1) * 256) / (out_n as u32 - 1)
}

fn blend4(c00: u8, c10: u8, c01: u8, c11: u8, fx: u32, fy: u32) -> u8 {
    let top = c00 as u32 * (256 - fx) + c10 as u32 * fx;
    let bottom = c01 as u32 * (256 - fx) + c11 as u32 * fx;
    let v = top * (256 - fy) + bottom * fy;
    (v >> 16) as u8
}

//! Linear frame interpolation for effects that render at a fixed, coarse
//! frame rate but are displayed at whatever rate the host calls `draw`.

use crate::pixel::Frame;

/// Keeps the two most recently rendered frames of a fixed-FPS effect and
/// blends between them based on how far `now` has progressed past the
/// frame that was rendered at `t_prev`.
pub struct FrameInterpolator {
    period_ms: f32,
    prev: Frame,
    next: Frame,
    t_prev: u32,
    t_next: u32,
    initialized: bool,
}

impl FrameInterpolator {
    pub fn new(fps: f32, num_leds: usize) -> Self {
        let period_ms = if fps > 0.0 { 1000.0 / fps } else { 0.0 };
        Self {
            period_ms,
            prev: Frame::new(num_leds),
            next: Frame::new(num_leds),
            t_prev: 0,
            t_next: 0,
            initialized: false,
        }
    }

    /// Render `now_ms` into `out` by shifting in as many fresh frames as
    /// `now_ms` has advanced past, then blending between the two frames
    /// straddling it. `render` is called once per frame that needs to be
    /// (re)rendered, passed the timestamp to render at and the buffer to
    /// render into.
    pub fn draw(&mut self, now_ms: u32, out: &mut [crate::pixel::Pixel], mut render: impl FnMut(u32, &mut [crate::pixel::Pixel])) {
        if self.period_ms <= 0.0 {
            render(now_ms, out);
            return;
        }
        let period = self.period_ms as u32;

        if !self.initialized {
            self.t_prev = now_ms;
            self.t_next = now_ms + period;
            render(self.t_prev, self.prev.rgb_mut());
            render(self.t_next, self.next.rgb_mut());
            self.initialized = true;
        }

        while now_ms >= self.t_next {
            core::mem::swap(&mut self.prev, &mut self.next);
            self.t_prev = self.t_next;
            self.t_next = self.t_prev + period;
            render(self.t_next, self.next.rgb_mut());
        }

        let elapsed = now_ms.saturating_sub(self.t_prev);
        let alpha = if period == 0 {
            255
        } else {
            ((elapsed as u64 * 255) / period as u64).min(255) as u8
        };

        let n = out.len().min(self.prev.len()).min(self.next.len());
        for i in 0..n {
            out[i] = self.prev.rgb()[i].blend(self.next.rgb()[i], alpha);
        }
    }
}

//! Reads a `0x00RRGGBB`-per-pixel stream and writes one frame's worth of
//! pixels per `draw` call. Two playback modes, matching the original's
//! `kStreaming` vs file-backed distinction: streaming sources stall (leave
//! the output untouched) when exhausted, since there's nothing to rewind
//! to; looped sources replay their data from the start. File and SD/FAT
//! backing are out of scope, so "rewind" here means replaying an in-memory
//! copy rather than reseeking a file.

use alloc::vec::Vec;

use crate::bytestream::ByteStreamMemory;
use crate::effect::{DrawContext, Effect};
use crate::pixel::Pixel;
use crate::xymap::XYMap;

const BYTES_PER_PIXEL: usize = 4;

pub struct Video<const N: usize> {
    xymap: XYMap,
    stream: ByteStreamMemory<N>,
    loop_source: Option<Vec<u8>>,
}

impl<const N: usize> Video<N> {
    /// A streaming video with no backing copy: once exhausted, `draw`
    /// stalls and leaves the output frame as-is.
    pub fn streaming(xymap: XYMap) -> Self {
        Self {
            xymap,
            stream: ByteStreamMemory::new(),
            loop_source: None,
        }
    }

    /// A looped video: `data` (one or more whole frames of `0x00RRGGBB`
    /// pixels) is fed in now and replayed from the start whenever the
    /// stream runs dry.
    pub fn looped(xymap: XYMap, data: Vec<u8>) -> Self {
        let mut stream = ByteStreamMemory::new();
        stream.write(&data);
        Self {
            xymap,
            stream,
            loop_source: Some(data),
        }
    }

    /// Feed more bytes into a streaming source.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        self.stream.write(bytes)
    }

    fn bytes_per_frame(&self) -> usize {
        self.xymap.total() as usize * BYTES_PER_PIXEL
    }

    fn rewind(&mut self) {
        if let Some(data) = &self.loop_source {
            self.stream.clear();
            self.stream.write(data);
        }
    }
}

impl<const N: usize> Effect for Video<N> {
    fn draw(&mut self, context: DrawContext<'_>) {
        let needed = self.bytes_per_frame();
        if !self.stream.available(needed) {
            if self.loop_source.is_some() {
                self.rewind();
            } else {
                log::trace!("video: streaming source exhausted, stalling");
                return;
            }
        }
        if !self.stream.available(needed) {
            return;
        }

        let width = self.xymap.width();
        let height = self.xymap.height();
        let mut pixel_bytes = [0u8; BYTES_PER_PIXEL];
        for y in 0..height {
            for x in 0..width {
                let idx = self.xymap.map_to_index(x, y) as usize;
                let px = if self.stream.read(&mut pixel_bytes) == BYTES_PER_PIXEL {
                    Pixel::new(pixel_bytes[1], pixel_bytes[2], pixel_bytes[3])
                } else {
                    Pixel::BLACK
                };
                if let Some(dst) = context.leds.get_mut(idx) {
                    *dst = px;
                }
            }
        }
    }

    fn name(&self) -> &str {
        "video"
    }

    fn num_leds(&self) -> u16 {
        self.xymap.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn frame_bytes(xymap: &XYMap, color: (u8, u8, u8)) -> Vec<u8> {
        let mut out = Vec::new();
        for _ in 0..xymap.total() {
            out.push(0);
            out.push(color.0);
            out.push(color.1);
            out.push(color.2);
        }
        out
    }

    #[test]
    fn reads_one_frame_per_draw_call() {
        let xymap = XYMap::rectangular(2, 1);
        let data = frame_bytes(&xymap, (10, 20, 30));
        let mut video: Video<64> = Video::looped(xymap, data);
        let mut leds = vec![Pixel::BLACK; 2];
        video.draw(DrawContext::new(0, &mut leds));
        assert_eq!(leds[0], Pixel::new(10, 20, 30));
        assert_eq!(leds[1], Pixel::new(10, 20, 30));
    }

    #[test]
    fn looped_source_rewinds_when_exhausted() {
        let xymap = XYMap::rectangular(1, 1);
        let data = frame_bytes(&xymap, (5, 5, 5));
        let mut video: Video<64> = Video::looped(xymap, data);
        let mut leds = vec![Pixel::BLACK; 1];
        video.draw(DrawContext::new(0, &mut leds));
        video.draw(DrawContext::new(1, &mut leds));
        assert_eq!(leds[0], Pixel::new(5, 5, 5));
    }

    #[test]
    fn streaming_source_stalls_when_exhausted() {
        let xymap = XYMap::rectangular(1, 1);
        let mut video: Video<64> = Video::streaming(xymap);
        video.feed(&[0, 1, 2, 3]);
        let mut leds = vec![Pixel::WHITE; 1];
        video.draw(DrawContext::new(0, &mut leds));
        assert_eq!(leds[0], Pixel::new(1, 2, 3));

        let mut leds2 = vec![Pixel::WHITE; 1];
        video.draw(DrawContext::new(1, &mut leds2));
        assert_eq!(leds2[0], Pixel::WHITE, "no data left, output stays untouched");
    }
}

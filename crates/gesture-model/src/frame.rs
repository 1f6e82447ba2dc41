//! Video frames handed from the frame source to the classifier.

/// A captured video frame.
///
/// Frames are ephemeral: the stream loop pulls one per iteration, submits it
/// to the classifier, and drops it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGBA pixels, row-major.
    pub pixels: Vec<u8>,
    /// Monotonic capture time in milliseconds.
    pub captured_at_ms: u64,
}

impl Frame {
    /// Create a frame, padding or truncating the pixel buffer to `width * height * 4`.
    pub fn new(width: u32, height: u32, mut pixels: Vec<u8>, captured_at_ms: u64) -> Self {
        pixels.resize(Self::rgba_len(width, height), 0);
        Self {
            width,
            height,
            pixels,
            captured_at_ms,
        }
    }

    /// An all-black frame, used by synthetic sources.
    pub fn blank(width: u32, height: u32, captured_at_ms: u64) -> Self {
        Self::new(width, height, Vec::new(), captured_at_ms)
    }

    /// Frame dimensions as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rgba_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }
}

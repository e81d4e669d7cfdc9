use anyhow::{Result, anyhow};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use float_overlay::Frame;
use float_overlay::pipeline::FrameSink;

const IMPORT_KEYS: [Key; 9] = [
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7,
    Key::Key8,
    Key::Key9,
];

/// Software-framebuffer preview window; doubles as the frame sink.
/// Optionally mirrored for a selfie-style view; mirroring is presentation
/// only and never reaches the composited frame itself.
pub struct PreviewWindow {
    window: Window,
    buffer: Vec<u32>,
    mirror: bool,
}

impl PreviewWindow {
    pub fn new(title: &str, width: usize, height: usize, mirror: bool) -> Result<Self> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| anyhow!("failed to create preview window: {}", e))?;
        Ok(PreviewWindow {
            window,
            buffer: Vec::with_capacity(width * height),
            mirror,
        })
    }

    /// 0-based catalog slots requested via the number keys since the last
    /// frame.
    pub fn pressed_import_slots(&self) -> Vec<usize> {
        IMPORT_KEYS
            .iter()
            .enumerate()
            .filter(|(_, key)| self.window.is_key_pressed(**key, KeyRepeat::No))
            .map(|(slot, _)| slot)
            .collect()
    }
}

impl FrameSink for PreviewWindow {
    fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        let (width, height) = frame.dimensions();
        self.buffer.clear();
        for y in 0..height {
            for x in 0..width {
                let sx = if self.mirror { width - 1 - x } else { x };
                let [r, g, b] = frame.get_pixel(sx, y).0;
                self.buffer
                    .push(((r as u32) << 16) | ((g as u32) << 8) | (b as u32));
            }
        }
        self.window
            .update_with_buffer(&self.buffer, frame.width() as usize, frame.height() as usize)
            .map_err(|e| anyhow!("failed to present frame: {}", e))
    }

    fn should_close(&self) -> bool {
        !self.window.is_open()
    }
}

use image::{Rgb, RgbaImage};
use log::warn;

use crate::Frame;
use crate::Point2D;
use crate::float_object::FloatObjectStore;

/// Draws every visible float object onto the frame, back to front in
/// creation order.
#[derive(Default)]
pub struct FrameCompositor;

impl FrameCompositor {
    pub fn new() -> Self {
        FrameCompositor
    }

    pub fn composite(&self, frame: &mut Frame, store: &FloatObjectStore) {
        let (frame_width, frame_height) = frame.dimensions();

        for object in store.iter().filter(|o| o.visible()) {
            let (width, height) = (object.width(), object.height());
            if width > frame_width || height > frame_height {
                warn!(
                    "\"{}\" ({}x{}) does not fit the {}x{} frame; skipped",
                    object.source_path(),
                    width,
                    height,
                    frame_width,
                    frame_height
                );
                continue;
            }

            let (x, y) = cosmetic_placement(
                object.position(),
                (width, height),
                (frame_width, frame_height),
            );

            if object.has_alpha() {
                draw_blended(frame, object.pixels(), x, y);
            } else {
                draw_opaque(frame, object.pixels(), x, y);
            }
        }
    }
}

/// Where to actually draw the object this frame. A box extending past any
/// frame edge is slid fully inside (the four corner, four edge and one
/// interior cases collapse to a per-axis clamp). Display-only: the object's
/// logical position is never touched, so an object dragged off-frame snaps
/// visually without losing its true coordinates.
fn cosmetic_placement(position: Point2D, size: (u32, u32), frame: (u32, u32)) -> (u32, u32) {
    let x = position.0.round() as i64;
    let y = position.1.round() as i64;
    let max_x = (frame.0 - size.0) as i64;
    let max_y = (frame.1 - size.1) as i64;
    (x.clamp(0, max_x) as u32, y.clamp(0, max_y) as u32)
}

/// "Over" compositing via the alpha plane: destination scaled by the
/// inverted mask, source colour channels scaled by their own alpha, the two
/// OR'd together. Partially transparent edge pixels blend instead of
/// cutting out.
fn draw_blended(frame: &mut Frame, sprite: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, pixel) in sprite.enumerate_pixels() {
        let [r, g, b, alpha] = pixel.0;
        let inverted = (255 - alpha) as u16;
        let destination = frame.get_pixel_mut(x + sx, y + sy);
        let [dr, dg, db] = destination.0;
        destination.0 = [
            ((dr as u16 * inverted / 255) as u8) | ((r as u16 * alpha as u16 / 255) as u8),
            ((dg as u16 * inverted / 255) as u8) | ((g as u16 * alpha as u16 / 255) as u8),
            ((db as u16 * inverted / 255) as u8) | ((b as u16 * alpha as u16 / 255) as u8),
        ];
    }
}

/// No alpha channel: plain rectangular overwrite.
fn draw_opaque(frame: &mut Frame, sprite: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, pixel) in sprite.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        frame.put_pixel(x + sx, y + sy, Rgb([r, g, b]));
    }
}

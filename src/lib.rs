pub mod assets;
pub mod engine_config;
pub mod float_object;
pub mod geometry_utils;
pub mod gestures;
pub mod hand;
pub mod pipeline;
pub mod systems;

pub type Point2D = (f32, f32);

/// One RGB video frame; owned by a single processing tick, never retained.
pub type Frame = image::RgbImage;

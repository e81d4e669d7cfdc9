pub mod compositor;
pub mod interaction;

use anyhow::Result;
use log::info;

use crate::engine_config::EngineConfig;
use crate::float_object::FloatObject;
use crate::gestures::GeometricClassifier;
use compositor::FrameCompositor;
use interaction::{InteractionCoordinator, InteractionSettings};

/// The per-tick processing chain: classify gestures, mutate the object
/// store, draw the result.
pub struct Systems {
    pub classifier: GeometricClassifier,
    pub interaction: InteractionCoordinator,
    pub compositor: FrameCompositor,
}

impl Systems {
    pub fn new(config: &EngineConfig) -> Systems {
        let classifier =
            GeometricClassifier::new(config.drag_pinch_max_px, config.delete_pinch_max_px);

        let interaction = InteractionCoordinator::new(InteractionSettings {
            resize_quadrant_margin: config.resize_quadrant_margin,
            resize_padding_ratio: config.resize_padding_ratio,
            resize_min_width_ratio: config.resize_min_width_ratio,
        });

        Systems {
            classifier,
            interaction,
            compositor: FrameCompositor::new(),
        }
    }

    /// Import an image as a new float object on top of the z-order.
    pub fn import_image(&mut self, path: &str, width: u32) -> Result<()> {
        let object = FloatObject::from_file(path, width)?;
        info!(
            "Imported \"{}\" at {}x{}",
            path,
            object.width(),
            object.height()
        );
        self.interaction.store_mut().add(object);
        Ok(())
    }
}

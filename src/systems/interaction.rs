use log::{debug, info, warn};

use crate::Point2D;
use crate::assets;
use crate::float_object::{FloatObjectStore, ResizeDirection};
use crate::geometry_utils::{distance_points, midpoint};
use crate::gestures::{GestureClassifier, GestureLabel};
use crate::hand::{HandObservation, Landmark};

pub struct InteractionSettings {
    /// Fraction of the object's width/height counted as each corner quadrant
    /// in the resize arming test
    pub resize_quadrant_margin: f32,
    /// Fraction of the two-cursor diagonal subtracted as padding when
    /// deriving the resize target width
    pub resize_padding_ratio: f32,
    /// Shrinking below this fraction of frame width is rejected
    pub resize_min_width_ratio: f32,
}

/// Turns one tick's hand observations into mutations on the float-object
/// store. All cross-tick state (ownership, grab offsets, resize arming)
/// lives on the objects themselves; nothing here is indexed by hand-list
/// position.
pub struct InteractionCoordinator {
    settings: InteractionSettings,
    store: FloatObjectStore,
}

impl InteractionCoordinator {
    pub fn new(settings: InteractionSettings) -> Self {
        InteractionCoordinator {
            settings,
            store: FloatObjectStore::new(),
        }
    }

    pub fn store(&self) -> &FloatObjectStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FloatObjectStore {
        &mut self.store
    }

    /// Process every detected hand for this tick. Drag and delete both run
    /// every tick; there is no early exit.
    pub fn apply_tick<C: GestureClassifier>(
        &mut self,
        classifier: &C,
        hands: &[HandObservation],
        frame_width: u32,
        frame_height: u32,
    ) {
        for hand in hands {
            match classifier.classify(hand) {
                GestureLabel::Drag => {
                    self.drag_step(classifier, hand, hands, frame_width, frame_height);
                }
                label => {
                    // Release on gesture loss, whatever the new label is.
                    self.store.release_owned_by(hand.handedness);
                    if label == GestureLabel::Delete {
                        self.delete_step(classifier, hand, hands);
                    }
                }
            }
        }
    }

    fn drag_step<C: GestureClassifier>(
        &mut self,
        classifier: &C,
        hand: &HandObservation,
        hands: &[HandObservation],
        frame_width: u32,
        frame_height: u32,
    ) {
        let cursor = midpoint(
            &hand.point(Landmark::IndexFingerTip),
            &hand.point(Landmark::MiddleFingerTip),
        );
        let pointer = pointer_cursor(classifier, hand, hands);

        let Some(index) = self.store.index_owned_by(hand.handedness) else {
            // Nothing owned by this hand yet: try to grab the topmost object
            // under the cursor. At most one grab per hand per tick.
            if let Some(index) = self.store.topmost_under(&cursor) {
                let object = self.store.get_mut(index);
                let (x, y) = object.position();
                object.grab(hand.handedness, (cursor.0 - x, cursor.1 - y));
                debug!("{:?} hand grabbed \"{}\"", hand.handedness, object.source_path());
            }
            return;
        };

        if self.store.get(index).is_resizing() {
            match pointer {
                Some(pointer_tip) => {
                    self.resize_step(index, cursor, pointer_tip, frame_width, frame_height);
                    return;
                }
                None => {
                    // Second hand stopped pointing: resize ends, drag goes on.
                    self.store.get_mut(index).disarm_resize();
                }
            }
        }

        let object = self.store.get_mut(index);
        let (width, height) = (object.width() as f32, object.height() as f32);
        let offset = object.grab_offset();
        // Commit the translated position, clamped so the box stays inside
        // the frame.
        let max_x = (frame_width as f32 - width).max(0.);
        let max_y = (frame_height as f32 - height).max(0.);
        object.set_position((
            (cursor.0 - offset.0).clamp(0., max_x),
            (cursor.1 - offset.1).clamp(0., max_y),
        ));

        if let Some(pointer_tip) = pointer {
            if !object.is_resizing() {
                let bounds = (object.position(), (width, height));
                if let Some(direction) = arming_direction(
                    bounds,
                    &cursor,
                    &pointer_tip,
                    self.settings.resize_quadrant_margin,
                ) {
                    debug!(
                        "Resize armed ({:?}) on \"{}\"",
                        direction,
                        object.source_path()
                    );
                    object.arm_resize(direction);
                }
            }
        }
    }

    /// Two-hand resize: cursor diagonal gives the target width; reject
    /// candidates that shrink below the minimum or leave the frame, else
    /// re-decode the source at the new width and recenter between cursors.
    fn resize_step(
        &mut self,
        index: usize,
        cursor: Point2D,
        pointer_tip: Point2D,
        frame_width: u32,
        frame_height: u32,
    ) {
        let target_diag = distance_points(&cursor, &pointer_tip);
        let target_width = target_diag - self.settings.resize_padding_ratio * target_diag;

        let object = self.store.get(index);
        let (current_width, current_height) = (object.width() as f32, object.height() as f32);

        let min_width = self.settings.resize_min_width_ratio * frame_width as f32;
        if target_width < current_width && target_width < min_width {
            return;
        }

        // Aspect ratio survives width-based reloads, so the candidate height
        // can be derived from the current buffer.
        let target_height = target_width * (current_height / current_width);
        let centre = midpoint(&cursor, &pointer_tip);
        let x = centre.0 - target_width / 2.;
        let y = centre.1 - target_height / 2.;
        if x <= 0. || y <= 0. {
            return;
        }
        if x + target_width > frame_width as f32 || y + target_height > frame_height as f32 {
            return;
        }

        // Fresh decode from the source file; re-scaling the in-memory buffer
        // would compound quality loss across resize ticks.
        let source_path = object.source_path().to_string();
        match assets::load_image_scaled(&source_path, target_width.round().max(1.) as u32) {
            Ok(loaded) => {
                let object = self.store.get_mut(index);
                object.replace_pixels(loaded);
                let (width, height) = (object.width() as f32, object.height() as f32);
                let position = (centre.0 - width / 2., centre.1 - height / 2.);
                object.set_position(position);
                // Keep the grab anchored so a return to plain dragging does
                // not jump.
                object.set_grab_offset((cursor.0 - position.0, cursor.1 - position.1));
            }
            Err(e) => {
                // Treated like a rejected candidate; retried next tick.
                warn!("Resize reload of \"{}\" failed: {}", source_path, e);
            }
        }
    }

    /// Delete via the other (Pointer) hand's index tip. Independent of drag
    /// ownership; removal is immediate and non-recoverable.
    fn delete_step<C: GestureClassifier>(
        &mut self,
        classifier: &C,
        hand: &HandObservation,
        hands: &[HandObservation],
    ) {
        let Some(delete_cursor) = pointer_cursor(classifier, hand, hands) else {
            return;
        };
        if let Some(index) = self.store.topmost_under(&delete_cursor) {
            let removed = self.store.remove(index);
            info!("Deleted \"{}\"", removed.source_path());
        }
    }
}

/// Index tip of a second hand classified Pointer, if there is one.
fn pointer_cursor<C: GestureClassifier>(
    classifier: &C,
    hand: &HandObservation,
    hands: &[HandObservation],
) -> Option<Point2D> {
    hands
        .iter()
        .find(|other| {
            other.handedness != hand.handedness
                && classifier.classify(other) == GestureLabel::Pointer
        })
        .map(|other| other.point(Landmark::IndexFingerTip))
}

/// Quadrant-straddle test: bottom-left with top-right arms `Right`,
/// bottom-right with top-left arms `Left`. The margin is the fraction of
/// width/height each corner quadrant covers.
fn arming_direction(
    bounds: (Point2D, (f32, f32)),
    a: &Point2D,
    b: &Point2D,
    margin: f32,
) -> Option<ResizeDirection> {
    let ((x, y), (width, height)) = bounds;

    let in_left = |c: &Point2D| c.0 >= x && c.0 <= x + margin * width;
    let in_right = |c: &Point2D| c.0 >= x + (1. - margin) * width && c.0 <= x + width;
    let in_top = |c: &Point2D| c.1 >= y && c.1 <= y + margin * height;
    let in_bottom = |c: &Point2D| c.1 >= y + (1. - margin) * height && c.1 <= y + height;

    let bottom_left = |c: &Point2D| in_left(c) && in_bottom(c);
    let top_right = |c: &Point2D| in_right(c) && in_top(c);
    let bottom_right = |c: &Point2D| in_right(c) && in_bottom(c);
    let top_left = |c: &Point2D| in_left(c) && in_top(c);

    if (bottom_left(a) && top_right(b)) || (bottom_left(b) && top_right(a)) {
        Some(ResizeDirection::Right)
    } else if (bottom_right(a) && top_left(b)) || (bottom_right(b) && top_left(a)) {
        Some(ResizeDirection::Left)
    } else {
        None
    }
}

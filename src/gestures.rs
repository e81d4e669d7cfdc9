use crate::geometry_utils::distance_points;
use crate::hand::{HandObservation, Landmark};

/// Label assigned to a single hand for a single tick; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureLabel {
    None,
    Drag,
    Delete,
    Pointer,
}

/// Classification contract: one observation in, one label out. Pure and
/// deterministic, so alternative policies (e.g. one consuming normalised
/// landmark vectors) can be swapped in without touching the coordinator.
pub trait GestureClassifier {
    fn classify(&self, hand: &HandObservation) -> GestureLabel;
}

/// Baseline rule-based policy over raw pixel-space landmark geometry.
///
/// The pinch thresholds are calibration constants tuned against a specific
/// capture resolution; they come from [`crate::engine_config::EngineConfig`].
pub struct GeometricClassifier {
    drag_pinch_max_px: f32,
    delete_pinch_max_px: f32,
}

impl GeometricClassifier {
    pub fn new(drag_pinch_max_px: f32, delete_pinch_max_px: f32) -> Self {
        GeometricClassifier {
            drag_pinch_max_px,
            delete_pinch_max_px,
        }
    }

    /// Index and middle fingertips pinched together, both fingers extended.
    fn is_drag(&self, hand: &HandObservation) -> bool {
        let index_tip = hand.point(Landmark::IndexFingerTip);
        let middle_tip = hand.point(Landmark::MiddleFingerTip);

        distance_points(&index_tip, &middle_tip) < self.drag_pinch_max_px
            && finger_extended(hand, Landmark::IndexFingerTip, Landmark::IndexFingerDip)
            && finger_extended(hand, Landmark::MiddleFingerTip, Landmark::MiddleFingerDip)
    }

    /// Middle, ring and pinky fingertips pinched to the thumb tip while the
    /// index finger stays extended.
    fn is_delete(&self, hand: &HandObservation) -> bool {
        let thumb_tip = hand.point(Landmark::ThumbTip);

        [
            Landmark::MiddleFingerTip,
            Landmark::RingFingerTip,
            Landmark::PinkyTip,
        ]
        .iter()
        .all(|tip| distance_points(&hand.point(*tip), &thumb_tip) < self.delete_pinch_max_px)
            && finger_extended(hand, Landmark::IndexFingerTip, Landmark::IndexFingerDip)
    }
}

impl GestureClassifier for GeometricClassifier {
    fn classify(&self, hand: &HandObservation) -> GestureLabel {
        if self.is_drag(hand) {
            GestureLabel::Drag
        } else if self.is_delete(hand) {
            GestureLabel::Delete
        } else if finger_extended(hand, Landmark::IndexFingerTip, Landmark::IndexFingerDip) {
            GestureLabel::Pointer
        } else {
            GestureLabel::None
        }
    }
}

/// Pixel-space y grows downwards, so an upward-extended finger has its tip
/// above its DIP joint.
fn finger_extended(hand: &HandObservation, tip: Landmark, dip: Landmark) -> bool {
    hand.point(tip).1 < hand.point(dip).1
}

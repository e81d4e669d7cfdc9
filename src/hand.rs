use serde::{Deserialize, Serialize};

use crate::Point2D;

pub const LANDMARK_COUNT: usize = 21;

/// Left/Right identity of a detected hand. This is the stable cross-frame
/// identity key; the order of hands within a tick's observation list is not.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

/// Canonical skeletal landmark ids, in the wire order reported per hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// One hand as observed in a single frame: handedness plus 21 pixel-space
/// landmark points. Frame-scoped and immutable; rebuilt every tick.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub points: [Point2D; LANDMARK_COUNT],
}

impl HandObservation {
    pub fn new(handedness: Handedness, points: [Point2D; LANDMARK_COUNT]) -> Self {
        HandObservation { handedness, points }
    }

    pub fn point(&self, landmark: Landmark) -> Point2D {
        self.points[landmark as usize]
    }
}

#[cfg(test)]
pub mod fixtures {
    //! Synthetic observations for gesture/interaction tests. Coordinates are
    //! pixel-space with y growing downwards, so "finger extended upward"
    //! means tip.y < dip.y.

    use super::*;

    fn filled(handedness: Handedness, base: Point2D) -> HandObservation {
        HandObservation::new(handedness, [base; LANDMARK_COUNT])
    }

    /// A curled-up hand that matches no gesture.
    pub fn neutral(handedness: Handedness) -> HandObservation {
        let mut hand = filled(handedness, (500., 500.));
        hand.points[Landmark::IndexFingerTip as usize] = (500., 520.);
        hand.points[Landmark::MiddleFingerTip as usize] = (500., 520.);
        hand
    }

    /// Index+middle pinched and extended; pinch midpoint lands on `cursor`.
    pub fn dragging(handedness: Handedness, cursor: Point2D) -> HandObservation {
        let (cx, cy) = cursor;
        let mut hand = filled(handedness, (cx, cy + 80.));
        hand.points[Landmark::IndexFingerTip as usize] = (cx - 10., cy);
        hand.points[Landmark::IndexFingerDip as usize] = (cx - 10., cy + 30.);
        hand.points[Landmark::MiddleFingerTip as usize] = (cx + 10., cy);
        hand.points[Landmark::MiddleFingerDip as usize] = (cx + 10., cy + 30.);
        hand.points[Landmark::ThumbTip as usize] = (cx - 200., cy + 100.);
        hand
    }

    /// Index extended with its tip at `tip`; everything else curled.
    pub fn pointing(handedness: Handedness, tip: Point2D) -> HandObservation {
        let (tx, ty) = tip;
        let mut hand = filled(handedness, (tx + 100., ty + 60.));
        hand.points[Landmark::IndexFingerTip as usize] = (tx, ty);
        hand.points[Landmark::IndexFingerDip as usize] = (tx, ty + 30.);
        hand.points[Landmark::MiddleFingerDip as usize] = (tx + 100., ty + 30.);
        hand.points[Landmark::ThumbTip as usize] = (tx - 200., ty + 100.);
        hand
    }

    /// Middle/ring/pinky tips pinched to the thumb, index still extended.
    pub fn deleting(handedness: Handedness) -> HandObservation {
        let mut hand = filled(handedness, (500., 500.));
        hand.points[Landmark::ThumbTip as usize] = (500., 500.);
        hand.points[Landmark::MiddleFingerTip as usize] = (505., 505.);
        hand.points[Landmark::MiddleFingerDip as usize] = (505., 495.);
        hand.points[Landmark::RingFingerTip as usize] = (495., 505.);
        hand.points[Landmark::PinkyTip as usize] = (500., 510.);
        hand.points[Landmark::IndexFingerTip as usize] = (460., 430.);
        hand.points[Landmark::IndexFingerDip as usize] = (460., 470.);
        hand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices_match_wire_order() {
        assert_eq!(Landmark::Wrist as usize, 0);
        assert_eq!(Landmark::ThumbTip as usize, 4);
        assert_eq!(Landmark::IndexFingerDip as usize, 7);
        assert_eq!(Landmark::IndexFingerTip as usize, 8);
        assert_eq!(Landmark::MiddleFingerTip as usize, 12);
        assert_eq!(Landmark::PinkyTip as usize, 20);
    }

    #[test]
    fn test_observation_deserializes_from_detector_json() {
        let points: Vec<[f32; 2]> = (0..21).map(|i| [i as f32, (i * 2) as f32]).collect();
        let json = format!(
            "{{\"handedness\":\"Left\",\"points\":{}}}",
            serde_json::to_string(&points).unwrap()
        );
        let hand: HandObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(hand.handedness, Handedness::Left);
        assert_eq!(hand.point(Landmark::ThumbTip), (4., 8.));
    }
}

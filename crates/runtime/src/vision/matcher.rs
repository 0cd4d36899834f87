//! Detection-to-slot matching.

use game_core::{Calibration, CameraPoint, SlotId};

/// Maps camera-space detections onto calibrated board slots.
pub struct SlotMatcher {
    calibration: Calibration,
    max_distance: f32,
}

impl SlotMatcher {
    pub fn new(calibration: Calibration, max_distance: f32) -> Self {
        Self {
            calibration,
            max_distance,
        }
    }

    /// Nearest calibrated slot within the distance cutoff. Detections
    /// farther than that from every slot are noise.
    pub fn nearest_slot(&self, x: f32, y: f32) -> Option<SlotId> {
        let point = CameraPoint::new(x, y);
        let mut best: Option<(SlotId, f32)> = None;
        for (slot, slot_point) in self.calibration.iter() {
            let distance = point.distance_to(slot_point);
            if distance > self.max_distance {
                continue;
            }
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((slot, distance));
            }
        }
        best.map(|(slot, _)| slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{EdgeId, VertexId};

    fn matcher() -> SlotMatcher {
        let mut calibration = Calibration::new(2, 1);
        calibration.set(SlotId::Vertex(VertexId(0)), CameraPoint::new(100.0, 100.0));
        calibration.set(SlotId::Vertex(VertexId(1)), CameraPoint::new(200.0, 100.0));
        calibration.set(SlotId::Edge(EdgeId(0)), CameraPoint::new(150.0, 100.0));
        SlotMatcher::new(calibration, 30.0)
    }

    #[test]
    fn picks_the_nearest_slot() {
        let matcher = matcher();
        assert_eq!(
            matcher.nearest_slot(104.0, 98.0),
            Some(SlotId::Vertex(VertexId(0)))
        );
        assert_eq!(
            matcher.nearest_slot(158.0, 101.0),
            Some(SlotId::Edge(EdgeId(0)))
        );
    }

    #[test]
    fn distant_detections_are_noise() {
        let matcher = matcher();
        assert_eq!(matcher.nearest_slot(400.0, 400.0), None);
    }
}

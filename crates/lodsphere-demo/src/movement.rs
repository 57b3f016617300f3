//! Host-side "viewer moved" detection and the scripted approach flight.

use glam::DVec3;

/// Fires when the viewer position differs from the last observed one.
///
/// The planet never polls for movement; the host feeds every frame's
/// position through this and only runs a generation pass when it fires.
#[derive(Debug, Default)]
pub struct MovementTrigger {
    last: Option<DVec3>,
}

impl MovementTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `position` and report whether it moved. The first call always fires.
    pub fn observe(&mut self, position: DVec3) -> bool {
        let moved = self.last != Some(position);
        self.last = Some(position);
        moved
    }

    pub fn last_position(&self) -> Option<DVec3> {
        self.last
    }
}

/// Straight-line approach from `start` to `end`, advancing in discrete steps.
///
/// The viewer holds each step for `frames_per_step` frames, so most frames
/// repeat the previous position.
#[derive(Clone, Debug)]
pub struct ApproachPath {
    start: DVec3,
    end: DVec3,
    frames: u32,
    frames_per_step: u32,
}

impl ApproachPath {
    pub fn new(start: DVec3, end: DVec3, frames: u32, frames_per_step: u32) -> Self {
        Self {
            start,
            end,
            frames,
            frames_per_step: frames_per_step.max(1),
        }
    }

    /// Number of distinct positions along the path.
    pub fn steps(&self) -> u32 {
        self.frames.div_ceil(self.frames_per_step)
    }

    /// Viewer position at `frame`. Frames past the end stay at `end`.
    pub fn position_at(&self, frame: u32) -> DVec3 {
        let last_step = self.steps().saturating_sub(1);
        if last_step == 0 {
            return self.start;
        }
        let step = (frame / self.frames_per_step).min(last_step);
        self.start.lerp(self.end, step as f64 / last_step as f64)
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_fires() {
        let mut trigger = MovementTrigger::new();
        assert!(trigger.last_position().is_none());
        assert!(trigger.observe(DVec3::new(0.0, 0.0, 700.0)));
        assert_eq!(trigger.last_position(), Some(DVec3::new(0.0, 0.0, 700.0)));
    }

    #[test]
    fn test_same_position_does_not_fire() {
        let mut trigger = MovementTrigger::new();
        let p = DVec3::new(1.0, 2.0, 3.0);
        trigger.observe(p);
        assert!(!trigger.observe(p));
        assert!(!trigger.observe(p));
        assert!(trigger.observe(p + DVec3::X * 1e-9));
    }

    #[test]
    fn test_path_endpoints() {
        let start = DVec3::new(0.0, 0.0, 700.0);
        let end = DVec3::new(0.0, 0.0, 101.0);
        let path = ApproachPath::new(start, end, 10, 2);
        assert_eq!(path.steps(), 5);
        assert_eq!(path.position_at(0), start);
        assert_eq!(path.position_at(1), start);
        assert_eq!(path.position_at(9), end);
        assert_eq!(path.position_at(50), end);
    }

    #[test]
    fn test_path_moves_once_per_step() {
        let path = ApproachPath::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 12.0), 12, 3);
        let mut trigger = MovementTrigger::new();
        let fired = (0..path.frames())
            .filter(|&f| trigger.observe(path.position_at(f)))
            .count();
        assert_eq!(fired as u32, path.steps());
    }

    #[test]
    fn test_single_step_path_stays_at_start() {
        let path = ApproachPath::new(DVec3::ONE, DVec3::ZERO, 1, 4);
        assert_eq!(path.steps(), 1);
        assert_eq!(path.position_at(0), DVec3::ONE);
    }
}

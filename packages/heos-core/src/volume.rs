//! Per-player volume control state.
//!
//! Outside of a drag the displayed level is exactly the last authoritative
//! level. During a drag it follows the pointer, and the release value is both
//! kept on screen and returned so the caller can send it to the player.

use crate::intent::ScrubEvent;

/// Maximum volume level accepted by HEOS players.
pub const MAX_VOLUME: u8 = 100;

/// Locally-held volume for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeController {
    /// Last level reported by the server (or committed locally on release).
    level: Option<u8>,
    /// Drag value while the user holds the control.
    held: Option<u8>,
}

impl VolumeController {
    /// Creates a controller with no known level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Level to render.
    #[must_use]
    pub fn displayed(&self) -> Option<u8> {
        self.held.or(self.level)
    }

    /// Returns true while the user holds the control.
    #[must_use]
    pub fn is_scrubbing(&self) -> bool {
        self.held.is_some()
    }

    /// Records an authoritative level. Returns true if the displayed level changed.
    pub fn observe(&mut self, level: u8) -> bool {
        let before = self.displayed();
        self.level = Some(level.min(MAX_VOLUME));
        before != self.displayed()
    }

    /// Applies one step of a volume drag.
    ///
    /// Returns the level to send on release. Until the server confirms it, the
    /// released level is what gets displayed.
    pub fn scrub(&mut self, event: ScrubEvent<u8>) -> Option<u8> {
        let value = event.value().min(MAX_VOLUME);
        match event {
            ScrubEvent::Start(_) | ScrubEvent::Move(_) => {
                self.held = Some(value);
                None
            }
            ScrubEvent::End(_) => {
                self.held = None;
                self.level = Some(value);
                Some(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_authoritative_level_exactly() {
        let mut v = VolumeController::new();
        assert_eq!(v.displayed(), None);

        assert!(v.observe(30));
        assert!(v.observe(31));
        assert!(!v.observe(31));
        assert_eq!(v.displayed(), Some(31));
    }

    #[test]
    fn drag_overrides_authoritative_samples() {
        let mut v = VolumeController::new();
        v.observe(30);

        assert_eq!(v.scrub(ScrubEvent::Start(40)), None);
        assert_eq!(v.scrub(ScrubEvent::Move(55)), None);
        assert!(!v.observe(10));
        assert_eq!(v.displayed(), Some(55));
    }

    #[test]
    fn release_displays_and_returns_final_value() {
        let mut v = VolumeController::new();
        v.observe(30);
        v.scrub(ScrubEvent::Move(55));

        assert_eq!(v.scrub(ScrubEvent::End(60)), Some(60));
        assert!(!v.is_scrubbing());
        assert_eq!(v.displayed(), Some(60));

        // the server's confirmation (or correction) wins afterwards
        assert!(v.observe(58));
        assert_eq!(v.displayed(), Some(58));
    }

    #[test]
    fn values_are_clamped() {
        let mut v = VolumeController::new();
        v.observe(250);
        assert_eq!(v.displayed(), Some(100));
        assert_eq!(v.scrub(ScrubEvent::End(200)), Some(100));
    }
}

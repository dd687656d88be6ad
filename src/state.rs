// src/state.rs - Connected/paused tracking for the one device handle
use crate::device::{DeviceHandle, DevicePolicy};
use crate::status::{AnnotationTarget, StatusAnnotator};
use tracing::info;

/// Owns the device handle and the label of the node that created it.
///
/// `is_enabled` reports the *connection* flag, not the pause flag that
/// `enable`/`disable` drive. The status label ("Device : Enabled") therefore
/// tells whether a controller is plugged in, and `disable()` leaves it
/// unchanged. Hosts read the label with exactly that meaning.
pub struct DeviceState<D, L> {
    device: D,
    label: L,
}

impl<D: DeviceHandle, L: AnnotationTarget> DeviceState<D, L> {
    /// Sets `policy` on the device and immediately tries to unpause it.
    pub fn new(mut device: D, label: L, policy: DevicePolicy) -> Self {
        device.set_policy(policy);
        info!(?policy, "Leap Initialized");

        let mut state = Self { device, label };
        state.enable();
        state
    }

    pub fn enable(&mut self) {
        self.device.set_paused(false);
        self.announce();
        info!("Leap Enabled");
    }

    pub fn disable(&mut self) {
        self.device.set_paused(true);
        self.announce();
        info!("Leap Disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.device.is_connected()
    }

    pub fn is_paused(&self) -> bool {
        self.device.is_paused()
    }

    pub fn announce(&mut self) {
        let enabled = self.is_enabled();
        StatusAnnotator::announce(&mut self.label, enabled);
    }

    pub fn status_text(&self) -> &'static str {
        StatusAnnotator::status_text(self.is_enabled())
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn label(&self) -> &L {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SimulatedDevice;
    use crate::status::NodeComment;

    fn state(connected: bool) -> DeviceState<SimulatedDevice, NodeComment> {
        let mut device = SimulatedDevice::new(1);
        device.set_connected(connected);
        device.set_paused(true);
        DeviceState::new(device, NodeComment::default(), DevicePolicy::AllowPauseResume)
    }

    #[test]
    fn test_construction_sets_policy_and_unpauses() {
        let state = state(true);
        assert_eq!(state.device().policy(), DevicePolicy::AllowPauseResume);
        assert!(!state.is_paused());
        assert_eq!(state.label().text, "Device : Enabled");
        assert!(state.label().visible);
    }

    #[test]
    fn test_enabled_follows_connection_not_pause() {
        let mut state = state(true);
        state.disable();
        assert!(state.is_paused());
        assert!(state.is_enabled());
        assert_eq!(state.label().text, "Device : Enabled");

        let mut state = self::state(false);
        state.enable();
        assert!(!state.is_paused());
        assert!(!state.is_enabled());
        assert_eq!(state.status_text(), "Device : Disabled");
    }

    #[test]
    fn test_transitions_are_idempotent_and_reannounce() {
        let mut state = state(true);
        let before = state.label().updates;

        state.disable();
        state.disable();
        assert!(state.is_paused());
        state.enable();
        state.enable();
        assert!(!state.is_paused());

        assert_eq!(state.label().updates, before + 4);
    }

    #[test]
    fn test_status_reflects_later_disconnect() {
        let mut state = state(true);
        state.device_mut().set_connected(false);
        state.announce();
        assert_eq!(state.label().text, "Device : Disabled");
    }
}

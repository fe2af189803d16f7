//! Boundary contract to the native tracking collaborator.
//!
//! The collaborator is opaque: each operation maps to a named call carrying
//! no arguments, a single primitive, or a JSON payload produced by the core
//! serializer. Which implementation backs the contract is decided by the
//! embedding application at construction time, never by conditional
//! compilation.

use parking_lot::Mutex;
use tracing::debug;

/// One call across the boundary, as captured by [`RecordingPlatform`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryCall {
    Initialize(String),
    AddLoggerOutput,
    SetLogLevel(i64),
    ClearDataAndStop,
    SetEnabled(bool),
    IsEnabled,
    StartTracking,
    StopTracking,
    SetFcmToken(String),
    LogEvent(String),
    GetAdId,
    GetReferrer,
}

/// Call contract to the native tracking SDK.
///
/// Implementations must be safe to call before the collaborator has been
/// initialized: commands are no-ops, queries return the neutral results
/// (`false`, `None`). The bridge relies on that to stay collaborator-agnostic.
pub trait Platform: Send + Sync {
    fn initialize(&self, config_json: &str);
    fn add_logger_output(&self);
    fn set_log_level(&self, priority: i64);
    fn clear_data_and_stop(&self);
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
    fn start_tracking(&self);
    fn stop_tracking(&self);
    fn set_fcm_token(&self, token: &str);
    fn log_event(&self, event_json: &str);
    fn get_ad_id(&self) -> Option<String>;
    fn get_referrer(&self) -> Option<String>;
}

/// Placeholder collaborator for hosts without a native tracking SDK
/// (development builds, unsupported targets). Every call is a logged no-op.
pub struct NoopPlatform;

impl Platform for NoopPlatform {
    fn initialize(&self, config_json: &str) {
        debug!(payload = %config_json, "initialize: no native collaborator, ignoring");
    }

    fn add_logger_output(&self) {
        debug!("add_logger_output: no native collaborator, ignoring");
    }

    fn set_log_level(&self, priority: i64) {
        debug!(priority, "set_log_level: no native collaborator, ignoring");
    }

    fn clear_data_and_stop(&self) {
        debug!("clear_data_and_stop: no native collaborator, ignoring");
    }

    fn set_enabled(&self, enabled: bool) {
        debug!(enabled, "set_enabled: no native collaborator, ignoring");
    }

    fn is_enabled(&self) -> bool {
        debug!("is_enabled: no native collaborator, returning false");
        false
    }

    fn start_tracking(&self) {
        debug!("start_tracking: no native collaborator, ignoring");
    }

    fn stop_tracking(&self) {
        debug!("stop_tracking: no native collaborator, ignoring");
    }

    fn set_fcm_token(&self, token: &str) {
        debug!(token, "set_fcm_token: no native collaborator, ignoring");
    }

    fn log_event(&self, event_json: &str) {
        debug!(payload = %event_json, "log_event: no native collaborator, ignoring");
    }

    fn get_ad_id(&self) -> Option<String> {
        debug!("get_ad_id: no native collaborator, returning none");
        None
    }

    fn get_referrer(&self) -> Option<String> {
        debug!("get_referrer: no native collaborator, returning none");
        None
    }
}

/// In-memory collaborator that captures every call for inspection, used in
/// tests and host-side diagnostics.
pub struct RecordingPlatform {
    calls: Mutex<Vec<BoundaryCall>>,
    enabled: Mutex<bool>,
    ad_id: Mutex<Option<String>>,
    referrer: Mutex<Option<String>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            // A freshly constructed tracker accepts events.
            enabled: Mutex::new(true),
            ad_id: Mutex::new(None),
            referrer: Mutex::new(None),
        }
    }

    /// Every boundary call seen so far, in order.
    pub fn calls(&self) -> Vec<BoundaryCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Canned answer for [`Platform::get_ad_id`].
    pub fn set_ad_id(&self, value: Option<String>) {
        *self.ad_id.lock() = value;
    }

    /// Canned answer for [`Platform::get_referrer`].
    pub fn set_referrer(&self, value: Option<String>) {
        *self.referrer.lock() = value;
    }

    fn record(&self, call: BoundaryCall) {
        self.calls.lock().push(call);
    }
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for RecordingPlatform {
    fn initialize(&self, config_json: &str) {
        self.record(BoundaryCall::Initialize(config_json.to_string()));
    }

    fn add_logger_output(&self) {
        self.record(BoundaryCall::AddLoggerOutput);
    }

    fn set_log_level(&self, priority: i64) {
        self.record(BoundaryCall::SetLogLevel(priority));
    }

    fn clear_data_and_stop(&self) {
        self.record(BoundaryCall::ClearDataAndStop);
    }

    fn set_enabled(&self, enabled: bool) {
        *self.enabled.lock() = enabled;
        self.record(BoundaryCall::SetEnabled(enabled));
    }

    fn is_enabled(&self) -> bool {
        self.record(BoundaryCall::IsEnabled);
        *self.enabled.lock()
    }

    fn start_tracking(&self) {
        self.record(BoundaryCall::StartTracking);
    }

    fn stop_tracking(&self) {
        self.record(BoundaryCall::StopTracking);
    }

    fn set_fcm_token(&self, token: &str) {
        self.record(BoundaryCall::SetFcmToken(token.to_string()));
    }

    fn log_event(&self, event_json: &str) {
        self.record(BoundaryCall::LogEvent(event_json.to_string()));
    }

    fn get_ad_id(&self) -> Option<String> {
        self.record(BoundaryCall::GetAdId);
        self.ad_id.lock().clone()
    }

    fn get_referrer(&self) -> Option<String> {
        self.record(BoundaryCall::GetReferrer);
        self.referrer.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_platform_neutral_results() {
        let platform = NoopPlatform;
        platform.initialize("{}");
        platform.start_tracking();
        assert!(!platform.is_enabled());
        assert_eq!(platform.get_ad_id(), None);
        assert_eq!(platform.get_referrer(), None);
    }

    #[test]
    fn test_recording_platform_captures_in_order() {
        let platform = RecordingPlatform::new();
        platform.initialize(r#"{"app_token":"t"}"#);
        platform.set_log_level(4);
        platform.start_tracking();

        assert_eq!(
            platform.calls(),
            vec![
                BoundaryCall::Initialize(r#"{"app_token":"t"}"#.into()),
                BoundaryCall::SetLogLevel(4),
                BoundaryCall::StartTracking,
            ]
        );
    }

    #[test]
    fn test_recording_platform_canned_answers() {
        let platform = RecordingPlatform::new();
        assert_eq!(platform.get_ad_id(), None);

        platform.set_ad_id(Some("ad-42".into()));
        platform.set_referrer(Some("utm_source=test".into()));
        assert_eq!(platform.get_ad_id(), Some("ad-42".into()));
        assert_eq!(platform.get_referrer(), Some("utm_source=test".into()));
    }

    #[test]
    fn test_recording_platform_mirrors_enabled() {
        let platform = RecordingPlatform::new();
        assert!(platform.is_enabled());
        platform.set_enabled(false);
        assert!(!platform.is_enabled());
    }
}

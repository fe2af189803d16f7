//! SDK facade — builds serialized payloads from the core model, forwards
//! them across the boundary, and routes collaborator log lines into the
//! sink registry.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, warn};

use tracelink_core::config::InitConfig;
use tracelink_core::event::Event;
use tracelink_core::json;
use tracelink_core::logger::{LogDispatcher, LogLevel, LogRecord};
use tracelink_core::TracelinkResult;

use crate::platform::Platform;

struct BridgeFlags {
    initialized: bool,
    tracking: bool,
    /// Enabled overlay. Defaults to enabled and is meaningful before
    /// `initialize`; it does not gate anything in this core — dropping
    /// events while disabled is the collaborator's job.
    enabled: bool,
}

/// The SDK entry point: one bridge per application.
///
/// Owns the log dispatcher and the chosen [`Platform`] collaborator. All
/// calls are fire-and-forget toward the collaborator; nothing here blocks
/// on network or disk.
pub struct Bridge {
    platform: Arc<dyn Platform>,
    dispatcher: Arc<LogDispatcher>,
    flags: Mutex<BridgeFlags>,
}

impl Bridge {
    /// Bridge with its own log dispatcher.
    ///
    /// Registers this SDK as the collaborator's log output immediately, as
    /// the native side expects before any other call.
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self::with_dispatcher(platform, Arc::new(LogDispatcher::new()))
    }

    /// Bridge over an injected dispatcher, for hosts (and tests) that manage
    /// the sink registry themselves.
    pub fn with_dispatcher(platform: Arc<dyn Platform>, dispatcher: Arc<LogDispatcher>) -> Self {
        platform.add_logger_output();
        Self {
            platform,
            dispatcher,
            flags: Mutex::new(BridgeFlags {
                initialized: false,
                tracking: false,
                enabled: true,
            }),
        }
    }

    /// Sink registry owned by this bridge.
    pub fn dispatcher(&self) -> &Arc<LogDispatcher> {
        &self.dispatcher
    }

    pub fn is_initialized(&self) -> bool {
        self.flags.lock().initialized
    }

    pub fn is_tracking(&self) -> bool {
        self.flags.lock().tracking
    }

    /// Validate and forward the configuration snapshot.
    ///
    /// Calling this on an already-initialized bridge re-runs initialization
    /// against the collaborator; that is a re-initialization, not an error.
    pub fn initialize(&self, config: &InitConfig) -> TracelinkResult<()> {
        config.validate()?;

        let payload = json::serialize(&config.to_transport_value());
        let mut flags = self.flags.lock();
        if flags.initialized {
            debug!("re-initializing an already-initialized bridge");
        }
        self.platform.initialize(&payload);
        self.dispatcher.set_min_level(config.log_level);
        flags.initialized = true;
        Ok(())
    }

    /// Forward a new log level to the collaborator and apply it to the sink
    /// registry threshold.
    pub fn set_log_level(&self, level: LogLevel) {
        self.dispatcher.set_min_level(level);
        self.platform.set_log_level(level.priority());
    }

    /// Clear collaborator-held data and stop tracking. Invoked
    /// unconditionally; the bridge stays initialized and tracking state
    /// returns to stopped.
    pub fn clear_data_and_stop(&self) {
        self.platform.clear_data_and_stop();
        self.flags.lock().tracking = false;
    }

    /// Set the enabled overlay and forward it. The overlay does not change
    /// tracking state.
    pub fn set_enabled(&self, enabled: bool) {
        self.flags.lock().enabled = enabled;
        self.platform.set_enabled(enabled);
    }

    /// Enabled state: the local overlay (default enabled) until the bridge
    /// is initialized, the collaborator's answer afterwards.
    pub fn is_enabled(&self) -> bool {
        {
            let flags = self.flags.lock();
            if !flags.initialized {
                return flags.enabled;
            }
        }
        self.platform.is_enabled()
    }

    /// Start tracking. Calling while already tracking is a no-op without a
    /// duplicate collaborator call.
    pub fn start_tracking(&self) {
        let mut flags = self.flags.lock();
        if flags.tracking {
            return;
        }
        self.platform.start_tracking();
        flags.tracking = true;
    }

    /// Stop tracking. Calling while already stopped is a no-op without a
    /// duplicate collaborator call.
    pub fn stop_tracking(&self) {
        let mut flags = self.flags.lock();
        if !flags.tracking {
            return;
        }
        self.platform.stop_tracking();
        flags.tracking = false;
    }

    /// Forward a push token. Empty or missing tokens are not forwarded.
    pub fn set_fcm_token(&self, token: Option<&str>) {
        match token {
            Some(token) if !token.is_empty() => self.platform.set_fcm_token(token),
            _ => debug!("ignoring empty FCM token"),
        }
    }

    /// Serialize and forward an event.
    ///
    /// Forwarding is unconditional with respect to tracking and enabled
    /// state: drop decisions belong to the collaborator. Safe to call before
    /// `initialize`; the collaborator contract makes that a no-op.
    pub fn log_event(&self, event: &Event) {
        if !self.is_initialized() {
            warn!(event = %event.name(), "log_event before initialize; collaborator will ignore it");
        }
        let payload = json::serialize(&event.to_transport_value());
        self.platform.log_event(&payload);
    }

    pub fn get_ad_id(&self) -> Option<String> {
        self.platform.get_ad_id()
    }

    pub fn get_referrer(&self) -> Option<String> {
        self.platform.get_referrer()
    }

    /// Boundary log callback: decode the delimited line and fan it out to
    /// the registered sinks. A malformed line is dropped with an internal
    /// diagnostic; routing continues for later records.
    pub fn on_log_received(&self, line: &str) {
        match LogRecord::decode(line) {
            Ok(record) => self.dispatcher.dispatch(&record),
            Err(err) => error!(%err, "dropping malformed collaborator log line"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{BoundaryCall, RecordingPlatform};
    use tracelink_core::event::{EventParams, RevenueCurrency};
    use tracelink_core::logger::LogSink;
    use tracelink_core::ParamValue;

    fn recording_bridge() -> (Bridge, Arc<RecordingPlatform>) {
        let platform = Arc::new(RecordingPlatform::new());
        let bridge = Bridge::new(platform.clone());
        (bridge, platform)
    }

    #[derive(Default)]
    struct CollectingSink {
        records: Mutex<Vec<LogRecord>>,
    }

    impl CollectingSink {
        fn messages(&self) -> Vec<String> {
            self.records.lock().iter().map(|r| r.message.clone()).collect()
        }
    }

    impl LogSink for CollectingSink {
        fn on_log(&self, record: &LogRecord) {
            self.records.lock().push(record.clone());
        }
    }

    #[test]
    fn test_construction_registers_logger_output() {
        let (_bridge, platform) = recording_bridge();
        assert_eq!(platform.calls(), vec![BoundaryCall::AddLoggerOutput]);
    }

    #[test]
    fn test_initialize_forwards_serialized_config() {
        let (bridge, platform) = recording_bridge();
        platform.clear();

        bridge.initialize(&InitConfig::new("tok-123")).unwrap();
        assert!(bridge.is_initialized());

        let calls = platform.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            BoundaryCall::Initialize(json) => {
                let value: serde_json::Value = serde_json::from_str(json).unwrap();
                assert_eq!(value["app_token"], "tok-123");
                assert_eq!(value["user_environment"], "sandbox");
                assert!(value.get("custom_device_id").is_none());
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn test_initialize_rejects_empty_app_token() {
        let (bridge, platform) = recording_bridge();
        platform.clear();

        assert!(bridge.initialize(&InitConfig::new("")).is_err());
        assert!(!bridge.is_initialized());
        assert_eq!(platform.call_count(), 0);
    }

    #[test]
    fn test_reinitialize_forwards_again() {
        let (bridge, platform) = recording_bridge();
        platform.clear();

        let config = InitConfig::new("tok-123");
        bridge.initialize(&config).unwrap();
        bridge.initialize(&config).unwrap();

        let initializes = platform
            .calls()
            .iter()
            .filter(|call| matches!(call, BoundaryCall::Initialize(_)))
            .count();
        assert_eq!(initializes, 2);
    }

    #[test]
    fn test_start_tracking_twice_forwards_once() {
        let (bridge, platform) = recording_bridge();
        bridge.initialize(&InitConfig::new("tok-123")).unwrap();
        platform.clear();

        bridge.start_tracking();
        bridge.start_tracking();
        assert!(bridge.is_tracking());
        assert_eq!(platform.calls(), vec![BoundaryCall::StartTracking]);

        bridge.stop_tracking();
        bridge.stop_tracking();
        assert!(!bridge.is_tracking());
        assert_eq!(
            platform.calls(),
            vec![BoundaryCall::StartTracking, BoundaryCall::StopTracking]
        );
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let (bridge, platform) = recording_bridge();
        platform.clear();
        bridge.stop_tracking();
        assert_eq!(platform.call_count(), 0);
    }

    #[test]
    fn test_clear_data_and_stop_resets_tracking() {
        let (bridge, platform) = recording_bridge();
        bridge.initialize(&InitConfig::new("tok-123")).unwrap();
        bridge.start_tracking();
        platform.clear();

        bridge.clear_data_and_stop();
        assert!(bridge.is_initialized());
        assert!(!bridge.is_tracking());
        assert_eq!(platform.calls(), vec![BoundaryCall::ClearDataAndStop]);
    }

    #[test]
    fn test_enabled_overlay_defaults_true_before_initialize() {
        let (bridge, _platform) = recording_bridge();
        assert!(bridge.is_enabled());

        bridge.set_enabled(false);
        assert!(!bridge.is_enabled());
    }

    #[test]
    fn test_enabled_delegates_after_initialize() {
        let (bridge, platform) = recording_bridge();
        bridge.initialize(&InitConfig::new("tok-123")).unwrap();

        bridge.set_enabled(false);
        assert!(!bridge.is_enabled());
        assert!(platform.calls().contains(&BoundaryCall::IsEnabled));
    }

    #[test]
    fn test_log_event_before_initialize_does_not_fail() {
        let (bridge, platform) = recording_bridge();
        platform.clear();

        bridge.log_event(&Event::default_event("early", None));
        assert_eq!(platform.call_count(), 1);
    }

    #[test]
    fn test_log_event_forwards_transport_json() {
        let (bridge, platform) = recording_bridge();
        bridge.initialize(&InitConfig::new("tok-123")).unwrap();
        platform.clear();

        let mut params = EventParams::new();
        params.insert("plan".into(), ParamValue::from_string("pro"));
        let event = Event::revenue_event("purchase", RevenueCurrency::Usd, 9.99, Some(params));
        bridge.log_event(&event);

        match &platform.calls()[0] {
            BoundaryCall::LogEvent(json) => {
                assert_eq!(
                    json,
                    r#"{"type":"revenue","name":"purchase","params":{"plan":"pro"},"revenue":9.99,"currency":"USD"}"#
                );
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn test_fcm_token_skips_empty() {
        let (bridge, platform) = recording_bridge();
        platform.clear();

        bridge.set_fcm_token(None);
        bridge.set_fcm_token(Some(""));
        assert_eq!(platform.call_count(), 0);

        bridge.set_fcm_token(Some("fcm-token-1"));
        assert_eq!(
            platform.calls(),
            vec![BoundaryCall::SetFcmToken("fcm-token-1".into())]
        );
    }

    #[test]
    fn test_set_log_level_forwards_priority_and_filters() {
        let (bridge, platform) = recording_bridge();
        platform.clear();

        bridge.set_log_level(LogLevel::Warning);
        assert_eq!(platform.calls(), vec![BoundaryCall::SetLogLevel(5)]);
        assert_eq!(bridge.dispatcher().min_level(), LogLevel::Warning);
    }

    #[test]
    fn test_getters_pass_through() {
        let (bridge, platform) = recording_bridge();
        assert_eq!(bridge.get_ad_id(), None);

        platform.set_ad_id(Some("ad-7".into()));
        platform.set_referrer(Some("utm_source=unit".into()));
        assert_eq!(bridge.get_ad_id(), Some("ad-7".into()));
        assert_eq!(bridge.get_referrer(), Some("utm_source=unit".into()));
    }

    #[test]
    fn test_on_log_received_dispatches_to_sinks() {
        let (bridge, _platform) = recording_bridge();
        let sink = Arc::new(CollectingSink::default());
        bridge.dispatcher().add_sink(sink.clone());

        bridge.on_log_received("4|NET|request sent|");
        assert_eq!(sink.messages(), vec!["request sent"]);
    }

    #[test]
    fn test_on_log_received_drops_malformed_lines() {
        let (bridge, _platform) = recording_bridge();
        let sink = Arc::new(CollectingSink::default());
        bridge.dispatcher().add_sink(sink.clone());

        bridge.on_log_received("not a log line");
        assert!(sink.messages().is_empty());

        bridge.on_log_received("6|APP|recovered|");
        assert_eq!(sink.messages(), vec!["recovered"]);
    }

    #[test]
    fn test_initialize_applies_config_log_level_to_dispatcher() {
        let (bridge, _platform) = recording_bridge();
        let config = InitConfig {
            log_level: LogLevel::Error,
            ..InitConfig::new("tok-123")
        };
        bridge.initialize(&config).unwrap();

        let sink = Arc::new(CollectingSink::default());
        bridge.dispatcher().add_sink(sink.clone());

        bridge.on_log_received("4|NET|filtered out|");
        bridge.on_log_received("6|NET|kept|");
        assert_eq!(sink.messages(), vec!["kept"]);
    }
}

//! SDK startup configuration — an immutable snapshot serialized once at
//! initialize time and handed to the native collaborator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{TracelinkError, TracelinkResult};
use crate::logger::LogLevel;

/// SDK version reported to the collaborator with every config payload.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build environment of the SDK itself, as opposed to the end user's
/// [`UserEnvironment`]. Compiled-in; not caller-configurable.
pub const SDK_ENVIRONMENT: SdkEnvironment = SdkEnvironment::Stage;

/// Deployment environment for the end user's data.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl UserEnvironment {
    pub fn as_str(self) -> &'static str {
        match self {
            UserEnvironment::Sandbox => "sandbox",
            UserEnvironment::Production => "production",
        }
    }
}

/// Build environment of the SDK distribution itself.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdkEnvironment {
    #[default]
    Stage,
    Production,
}

impl SdkEnvironment {
    pub fn as_str(self) -> &'static str {
        match self {
            SdkEnvironment::Stage => "stage",
            SdkEnvironment::Production => "production",
        }
    }
}

/// Android app store the build is distributed through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AndroidStore {
    PlayStore,
    CafeBazaar,
    Myket,
    #[default]
    Other,
    /// A store outside the built-in set, carried by name.
    Custom(String),
}

impl AndroidStore {
    pub fn name(&self) -> &str {
        match self {
            AndroidStore::PlayStore => "playstore",
            AndroidStore::CafeBazaar => "cafebazaar",
            AndroidStore::Myket => "myket",
            AndroidStore::Other => "other",
            AndroidStore::Custom(name) => name,
        }
    }

    /// Parse a store name, case-insensitively. Unrecognized names become
    /// [`AndroidStore::Custom`] rather than failing.
    pub fn from_name(value: &str) -> Self {
        let value = value.to_lowercase();
        match value.as_str() {
            "playstore" => AndroidStore::PlayStore,
            "cafebazaar" => AndroidStore::CafeBazaar,
            "myket" => AndroidStore::Myket,
            "other" => AndroidStore::Other,
            _ => AndroidStore::Custom(value),
        }
    }
}

impl fmt::Display for AndroidStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// iOS app store the build is distributed through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IosStore {
    AppStore,
    Sibche,
    Sibapp,
    Anardoni,
    Sibirani,
    Sibjo,
    #[default]
    Other,
    /// A store outside the built-in set, carried by name.
    Custom(String),
}

impl IosStore {
    pub fn name(&self) -> &str {
        match self {
            IosStore::AppStore => "appstore",
            IosStore::Sibche => "sibche",
            IosStore::Sibapp => "sibapp",
            IosStore::Anardoni => "anardoni",
            IosStore::Sibirani => "sibirani",
            IosStore::Sibjo => "sibjo",
            IosStore::Other => "other",
            IosStore::Custom(name) => name,
        }
    }

    /// Parse a store name, case-insensitively. Unrecognized names become
    /// [`IosStore::Custom`] rather than failing.
    pub fn from_name(value: &str) -> Self {
        let value = value.to_lowercase();
        match value.as_str() {
            "appstore" => IosStore::AppStore,
            "sibche" => IosStore::Sibche,
            "sibapp" => IosStore::Sibapp,
            "anardoni" => IosStore::Anardoni,
            "sibirani" => IosStore::Sibirani,
            "sibjo" => IosStore::Sibjo,
            "other" => IosStore::Other,
            _ => IosStore::Custom(value),
        }
    }
}

impl fmt::Display for IosStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable configuration snapshot for SDK startup.
///
/// Owned by the bridge only for the duration of the `initialize` call; not
/// retained afterward. Fields are public for struct-update construction from
/// [`InitConfig::new`].
#[derive(Debug, Clone)]
pub struct InitConfig {
    /// Backend app token; must be non-empty.
    pub app_token: String,
    pub environment: UserEnvironment,
    pub android_store: AndroidStore,
    pub ios_store: IosStore,
    /// Seconds the tracker waits before the first dispatch.
    pub tracking_waiting_time: u32,
    pub start_tracker_automatically: bool,
    pub custom_device_id: Option<String>,
    pub default_tracker: Option<String>,
    pub app_secret: Option<String>,
    pub secret_id: Option<String>,
    pub attribution_deeplink: bool,
    pub event_buffering: bool,
    pub log_level: LogLevel,
    pub oaid_enabled: bool,
    pub referrer_enabled: bool,
}

impl InitConfig {
    /// Configuration with the given app token and stock defaults.
    pub fn new(app_token: impl Into<String>) -> Self {
        Self {
            app_token: app_token.into(),
            environment: UserEnvironment::Sandbox,
            android_store: AndroidStore::Other,
            ios_store: IosStore::Other,
            tracking_waiting_time: 0,
            start_tracker_automatically: true,
            custom_device_id: None,
            default_tracker: None,
            app_secret: None,
            secret_id: None,
            attribution_deeplink: false,
            event_buffering: false,
            log_level: LogLevel::Debug,
            oaid_enabled: false,
            referrer_enabled: true,
        }
    }

    /// The app token must be non-empty; everything else has a usable default.
    pub fn validate(&self) -> TracelinkResult<()> {
        if self.app_token.is_empty() {
            return Err(TracelinkError::Config("app_token must not be empty".into()));
        }
        Ok(())
    }

    /// Wire shape: snake_case keys in the collaborator's expected order.
    ///
    /// Unset optional fields are absent rather than `null`, so the
    /// collaborator applies its own defaults. `log_level` serializes as its
    /// integer priority; enums serialize as lowercase names.
    pub fn to_transport_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("app_token".into(), Value::from(self.app_token.clone()));
        map.insert("sdk_version".into(), Value::from(SDK_VERSION));
        map.insert("sdk_environment".into(), Value::from(SDK_ENVIRONMENT.as_str()));
        map.insert("user_environment".into(), Value::from(self.environment.as_str()));
        map.insert(
            "android_store_name".into(),
            Value::from(self.android_store.name().to_lowercase()),
        );
        map.insert(
            "ios_store_name".into(),
            Value::from(self.ios_store.name().to_lowercase()),
        );
        map.insert(
            "tracking_waiting_time".into(),
            Value::from(self.tracking_waiting_time),
        );
        map.insert(
            "start_tracker_automatically".into(),
            Value::from(self.start_tracker_automatically),
        );
        if let Some(device_id) = &self.custom_device_id {
            map.insert("custom_device_id".into(), Value::from(device_id.clone()));
        }
        if let Some(tracker) = &self.default_tracker {
            map.insert("default_tracker".into(), Value::from(tracker.clone()));
        }
        if let Some(secret) = &self.app_secret {
            map.insert("app_secret".into(), Value::from(secret.clone()));
        }
        if let Some(secret_id) = &self.secret_id {
            map.insert("secret_id".into(), Value::from(secret_id.clone()));
        }
        map.insert(
            "attribution_deeplink".into(),
            Value::from(self.attribution_deeplink),
        );
        map.insert(
            "event_buffering_enabled".into(),
            Value::from(self.event_buffering),
        );
        map.insert("log_level".into(), Value::from(self.log_level.priority()));
        map.insert("oaid_enabled".into(), Value::from(self.oaid_enabled));
        map.insert("referrer_enabled".into(), Value::from(self.referrer_enabled));
        Value::Object(map)
    }
}

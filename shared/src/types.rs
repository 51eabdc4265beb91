//! API response types
//!
//! Field names follow the wire keys. Raw date fields are kept as received;
//! the `*_resolved` fields are never read from the payload and are filled by
//! [`Reconcile`] once the body has been decoded.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::dates::{
    deserialize_epoch, deserialize_epoch_keys, epoch_to_datetime, reconcile_all, resolve_optional_date, Reconcile,
};
use crate::errors::DecodeResult;
use crate::measures::{normalize, MeasurementCollection};
use crate::models::{MeasType, SleepState, Status, WorkoutType};
use crate::units::decode_value;

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Response Envelope
// ============================================================================

/// Envelope shared by every endpoint.
///
/// `status` is surfaced unchanged; a nonzero status may come with an absent
/// or partial `body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<B> {
    pub status: Status,
    pub body: Option<B>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw payload, kept when the client is configured to save it
    #[serde(skip)]
    pub raw_response: Option<Vec<u8>>,
    /// Request path, kept when the client is configured to include it
    #[serde(skip)]
    pub path: Option<String>,
}

impl<B> ApiResponse<B> {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

// ============================================================================
// Body Measures
// ============================================================================

pub type BodyMeasuresResponse = ApiResponse<BodyMeasuresBody>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasuresBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub updatetime: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub more: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: i32,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, rename = "measuregrps", deserialize_with = "null_as_default")]
    pub measure_groups: Vec<MeasureGroup>,
    /// Normalized measures, filled when requested by the caller
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<MeasurementCollection>,
}

impl BodyMeasuresBody {
    pub fn normalize(&self) -> MeasurementCollection {
        normalize(&self.measure_groups)
    }
}

impl BodyMeasuresResponse {
    /// Normalize the body's measure groups; empty when the body is absent
    pub fn parse_data(&self) -> MeasurementCollection {
        self.body
            .as_ref()
            .map(BodyMeasuresBody::normalize)
            .unwrap_or_default()
    }
}

/// One capture event bundling co-timed readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub grpid: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attrib: i32,
    #[serde(deserialize_with = "deserialize_epoch")]
    pub date: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub measures: Vec<Measure>,
}

/// A single reading: `value * 10^unit` in the canonical unit of `type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    #[serde(rename = "value")]
    pub mantissa: i64,
    #[serde(rename = "type")]
    pub meas_type: i32,
    #[serde(rename = "unit")]
    pub exponent: i32,
}

impl Measure {
    /// Recognized kind, `None` for undocumented codes
    pub fn kind(&self) -> Option<MeasType> {
        MeasType::from_code(self.meas_type)
    }

    pub fn decoded(&self) -> f64 {
        decode_value(self.mantissa, self.exponent)
    }
}

// ============================================================================
// Activity Measures
// ============================================================================

pub type ActivityMeasuresResponse = ApiResponse<ActivityMeasuresBody>;

/// Activity body. A single-day query puts the values directly in the body;
/// range queries return them in `activities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMeasuresBody {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub steps: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub soft: Option<i64>,
    #[serde(default)]
    pub moderate: Option<i64>,
    #[serde(default)]
    pub intense: Option<i64>,
    #[serde(default, alias = "activity", deserialize_with = "null_as_default")]
    pub activities: Vec<Activity>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub more: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: i32,
    #[serde(skip_deserializing)]
    pub single_value: bool,
    #[serde(skip_deserializing)]
    pub date_resolved: Option<DateTime<Tz>>,
}

impl Reconcile for ActivityMeasuresBody {
    fn reconcile(&mut self) -> DecodeResult<()> {
        self.date_resolved =
            resolve_optional_date(self.date.as_deref(), self.timezone.as_deref())?;
        self.single_value = self.date_resolved.is_some();
        reconcile_all(&mut self.activities)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calories: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub elevation: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub soft: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub moderate: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub intense: i64,
    #[serde(skip_deserializing)]
    pub date_resolved: Option<DateTime<Tz>>,
}

impl Reconcile for Activity {
    fn reconcile(&mut self) -> DecodeResult<()> {
        self.date_resolved =
            resolve_optional_date(self.date.as_deref(), self.timezone.as_deref())?;
        Ok(())
    }
}

// ============================================================================
// Intraday Activity
// ============================================================================

pub type IntradayActivityResponse = ApiResponse<IntradayActivityBody>;

/// Samples keyed by their epoch-second start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayActivityBody {
    #[serde(default, deserialize_with = "deserialize_epoch_keys")]
    pub series: BTreeMap<i64, IntradayActivity>,
}

impl Reconcile for IntradayActivityBody {
    fn reconcile(&mut self) -> DecodeResult<()> {
        for (start, sample) in self.series.iter_mut() {
            sample.start_resolved = Some(epoch_to_datetime(*start));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayActivity {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub steps: Option<i64>,
    #[serde(default)]
    pub pool_lap: Option<i64>,
    #[serde(skip_deserializing)]
    pub start_resolved: Option<DateTime<Utc>>,
}

// ============================================================================
// Workouts
// ============================================================================

pub type WorkoutsResponse = ApiResponse<WorkoutsBody>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutsBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub series: Vec<Workout>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub more: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: i32,
}

impl Reconcile for WorkoutsBody {
    fn reconcile(&mut self) -> DecodeResult<()> {
        reconcile_all(&mut self.series)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, rename = "userid", deserialize_with = "null_as_default")]
    pub user_id: i64,
    #[serde(default)]
    pub category: Option<WorkoutType>,
    #[serde(rename = "startdate", deserialize_with = "deserialize_epoch")]
    pub start_date: i64,
    #[serde(rename = "enddate", deserialize_with = "deserialize_epoch")]
    pub end_date: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attrib: i32,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modified: i64,
    /// Metric values; `null` entries are kept as `None`
    #[serde(default)]
    pub data: BTreeMap<String, Option<f64>>,
    #[serde(skip_deserializing)]
    pub start_resolved: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub end_resolved: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub date_resolved: Option<DateTime<Tz>>,
}

impl Reconcile for Workout {
    fn reconcile(&mut self) -> DecodeResult<()> {
        self.start_resolved = Some(epoch_to_datetime(self.start_date));
        self.end_resolved = Some(epoch_to_datetime(self.end_date));
        self.date_resolved =
            resolve_optional_date(self.date.as_deref(), self.timezone.as_deref())?;
        Ok(())
    }
}

// ============================================================================
// Sleep Measures
// ============================================================================

pub type SleepMeasuresResponse = ApiResponse<SleepMeasuresBody>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepMeasuresBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub series: Vec<SleepMeasure>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: i32,
}

impl Reconcile for SleepMeasuresBody {
    fn reconcile(&mut self) -> DecodeResult<()> {
        reconcile_all(&mut self.series)
    }
}

/// One contiguous interval spent in a single sleep state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepMeasure {
    #[serde(rename = "startdate", deserialize_with = "deserialize_epoch")]
    pub start_date: i64,
    #[serde(rename = "enddate", deserialize_with = "deserialize_epoch")]
    pub end_date: i64,
    pub state: SleepState,
    #[serde(skip_deserializing)]
    pub start_resolved: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub end_resolved: Option<DateTime<Utc>>,
}

impl Reconcile for SleepMeasure {
    fn reconcile(&mut self) -> DecodeResult<()> {
        self.start_resolved = Some(epoch_to_datetime(self.start_date));
        self.end_resolved = Some(epoch_to_datetime(self.end_date));
        Ok(())
    }
}

// ============================================================================
// Sleep Summary
// ============================================================================

pub type SleepSummaryResponse = ApiResponse<SleepSummaryBody>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummaryBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub series: Vec<SleepSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub more: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: i32,
}

impl Reconcile for SleepSummaryBody {
    fn reconcile(&mut self) -> DecodeResult<()> {
        reconcile_all(&mut self.series)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "startdate", deserialize_with = "deserialize_epoch")]
    pub start_date: i64,
    #[serde(rename = "enddate", deserialize_with = "deserialize_epoch")]
    pub end_date: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: i32,
    #[serde(default)]
    pub data: SleepSummaryData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modified: i64,
    #[serde(skip_deserializing)]
    pub start_resolved: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub end_resolved: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub date_resolved: Option<DateTime<Tz>>,
}

impl Reconcile for SleepSummary {
    fn reconcile(&mut self) -> DecodeResult<()> {
        self.start_resolved = Some(epoch_to_datetime(self.start_date));
        self.end_resolved = Some(epoch_to_datetime(self.end_date));
        self.date_resolved =
            resolve_optional_date(self.date.as_deref(), self.timezone.as_deref())?;
        Ok(())
    }
}

/// Durations are in seconds. REM and time-to-wake are not reported by every device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSummaryData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub wakeupduration: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lightsleepduration: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deepsleepduration: i64,
    #[serde(default)]
    pub remsleepduration: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wakeupcount: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub durationtosleep: i64,
    #[serde(default)]
    pub durationtowakeup: Option<i64>,
}

// ============================================================================
// Notifications
// ============================================================================

pub type NotificationInfoResponse = ApiResponse<NotificationInfoBody>;
pub type NotificationListResponse = ApiResponse<NotificationListBody>;
/// Create and revoke calls only report a status
pub type AckResponse = ApiResponse<serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationInfoBody {
    #[serde(default, deserialize_with = "deserialize_epoch")]
    pub expires: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(skip_deserializing)]
    pub expires_resolved: Option<DateTime<Utc>>,
}

impl Reconcile for NotificationInfoBody {
    fn reconcile(&mut self) -> DecodeResult<()> {
        self.expires_resolved = Some(epoch_to_datetime(self.expires));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationListBody {
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: Vec<NotificationProfile>,
}

impl Reconcile for NotificationListBody {
    fn reconcile(&mut self) -> DecodeResult<()> {
        reconcile_all(&mut self.profiles)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationProfile {
    #[serde(default, deserialize_with = "deserialize_epoch")]
    pub expires: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default)]
    pub callbackurl: Option<String>,
    #[serde(default)]
    pub appli: Option<i32>,
    #[serde(skip_deserializing)]
    pub expires_resolved: Option<DateTime<Utc>>,
}

impl Reconcile for NotificationProfile {
    fn reconcile(&mut self) -> DecodeResult<()> {
        self.expires_resolved = Some(epoch_to_datetime(self.expires));
        Ok(())
    }
}

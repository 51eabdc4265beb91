//! Code enumerations used by the Nokia Health API
//!
//! The API transmits every enumeration as a bare integer. Enumerations that
//! appear in response payloads keep an `Other` variant so undocumented codes
//! decode instead of failing; measurement types are classified separately
//! because unknown measurement codes must be skipped, not carried.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Measurement Types
// ============================================================================

/// Kind of body measurement reported inside a measure group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasType {
    Weight,
    Height,
    FatFreeMass,
    FatRatio,
    FatMassWeight,
    DiastolicBloodPressure,
    SystolicBloodPressure,
    HeartPulse,
    Temperature,
    Spo2,
    BodyTemperature,
    SkinTemperature,
    MuscleMass,
    Hydration,
    BoneMass,
    PulseWaveVelocity,
}

impl MeasType {
    /// Every recognized measurement type, in wire-code order
    pub const ALL: [MeasType; 16] = [
        MeasType::Weight,
        MeasType::Height,
        MeasType::FatFreeMass,
        MeasType::FatRatio,
        MeasType::FatMassWeight,
        MeasType::DiastolicBloodPressure,
        MeasType::SystolicBloodPressure,
        MeasType::HeartPulse,
        MeasType::Temperature,
        MeasType::Spo2,
        MeasType::BodyTemperature,
        MeasType::SkinTemperature,
        MeasType::MuscleMass,
        MeasType::Hydration,
        MeasType::BoneMass,
        MeasType::PulseWaveVelocity,
    ];

    /// Look up a wire code; `None` for codes this client does not know
    pub fn from_code(code: i32) -> Option<Self> {
        let meas_type = match code {
            1 => MeasType::Weight,
            4 => MeasType::Height,
            5 => MeasType::FatFreeMass,
            6 => MeasType::FatRatio,
            8 => MeasType::FatMassWeight,
            9 => MeasType::DiastolicBloodPressure,
            10 => MeasType::SystolicBloodPressure,
            11 => MeasType::HeartPulse,
            12 => MeasType::Temperature,
            54 => MeasType::Spo2,
            71 => MeasType::BodyTemperature,
            73 => MeasType::SkinTemperature,
            76 => MeasType::MuscleMass,
            77 => MeasType::Hydration,
            88 => MeasType::BoneMass,
            91 => MeasType::PulseWaveVelocity,
            _ => return None,
        };
        Some(meas_type)
    }

    pub fn code(&self) -> i32 {
        match self {
            MeasType::Weight => 1,
            MeasType::Height => 4,
            MeasType::FatFreeMass => 5,
            MeasType::FatRatio => 6,
            MeasType::FatMassWeight => 8,
            MeasType::DiastolicBloodPressure => 9,
            MeasType::SystolicBloodPressure => 10,
            MeasType::HeartPulse => 11,
            MeasType::Temperature => 12,
            MeasType::Spo2 => 54,
            MeasType::BodyTemperature => 71,
            MeasType::SkinTemperature => 73,
            MeasType::MuscleMass => 76,
            MeasType::Hydration => 77,
            MeasType::BoneMass => 88,
            MeasType::PulseWaveVelocity => 91,
        }
    }

    /// Canonical unit of decoded values of this kind
    pub fn unit(&self) -> &'static str {
        match self {
            MeasType::Weight
            | MeasType::FatFreeMass
            | MeasType::FatMassWeight
            | MeasType::MuscleMass
            | MeasType::Hydration
            | MeasType::BoneMass => "kg",
            MeasType::Height => "m",
            MeasType::FatRatio | MeasType::Spo2 => "%",
            MeasType::DiastolicBloodPressure | MeasType::SystolicBloodPressure => "mmHg",
            MeasType::HeartPulse => "bpm",
            MeasType::Temperature | MeasType::BodyTemperature | MeasType::SkinTemperature => "°C",
            MeasType::PulseWaveVelocity => "m/s",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MeasType::Weight => "Weight",
            MeasType::Height => "Height",
            MeasType::FatFreeMass => "Fat free mass",
            MeasType::FatRatio => "Fat ratio",
            MeasType::FatMassWeight => "Fat mass weight",
            MeasType::DiastolicBloodPressure => "Diastolic blood pressure",
            MeasType::SystolicBloodPressure => "Systolic blood pressure",
            MeasType::HeartPulse => "Heart pulse",
            MeasType::Temperature => "Temperature",
            MeasType::Spo2 => "SpO2",
            MeasType::BodyTemperature => "Body temperature",
            MeasType::SkinTemperature => "Skin temperature",
            MeasType::MuscleMass => "Muscle mass",
            MeasType::Hydration => "Hydration",
            MeasType::BoneMass => "Bone mass",
            MeasType::PulseWaveVelocity => "Pulse wave velocity",
        }
    }
}

impl fmt::Display for MeasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Whether a measure group is a real reading or a user objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureCategory {
    Real,
    Objective,
}

impl MeasureCategory {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(MeasureCategory::Real),
            2 => Some(MeasureCategory::Objective),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            MeasureCategory::Real => 1,
            MeasureCategory::Objective => 2,
        }
    }
}

// ============================================================================
// Device Types
// ============================================================================

/// Device class filter for body measure queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevType {
    UserRelated,
    BodyScale,
    BloodPressureMonitor,
    ActivityTracker,
    SleepMonitor,
}

impl DevType {
    pub fn code(&self) -> i32 {
        match self {
            DevType::UserRelated => 0,
            DevType::BodyScale => 1,
            DevType::BloodPressureMonitor => 4,
            DevType::ActivityTracker => 16,
            DevType::SleepMonitor => 32,
        }
    }
}

// ============================================================================
// Response Status
// ============================================================================

/// Status field present on every API response.
///
/// Nonzero statuses may come with an absent or partial body, so callers
/// check [`Status::is_success`] before trusting the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Status {
    Success,
    InvalidUserId,
    UserIdAndCredentialsMismatch,
    InvalidToken,
    NoSuchSubscription,
    InvalidCallbackUrl,
    SubscriptionNotDeleted,
    InvalidComment,
    TooManyNotifications,
    UserDeactivated,
    InvalidSignature,
    WrongNotificationCallbackUrl,
    TooManyRequests,
    WrongAction,
    UnknownError,
    ServiceNotDefined,
    Other(i32),
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn code(&self) -> i32 {
        match self {
            Status::Success => 0,
            Status::InvalidUserId => 247,
            Status::UserIdAndCredentialsMismatch => 250,
            Status::InvalidToken => 283,
            Status::NoSuchSubscription => 286,
            Status::InvalidCallbackUrl => 293,
            Status::SubscriptionNotDeleted => 294,
            Status::InvalidComment => 304,
            Status::TooManyNotifications => 305,
            Status::UserDeactivated => 328,
            Status::InvalidSignature => 342,
            Status::WrongNotificationCallbackUrl => 343,
            Status::TooManyRequests => 601,
            Status::WrongAction => 2554,
            Status::UnknownError => 2555,
            Status::ServiceNotDefined => 2556,
            Status::Other(code) => *code,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Status::Success => "Operation was successful",
            Status::InvalidUserId => "The user id provided is absent or incorrect",
            Status::UserIdAndCredentialsMismatch => {
                "The provided user id and/or credentials do not match"
            }
            Status::InvalidToken => "Token is invalid or doesn't exist",
            Status::NoSuchSubscription => "No such subscription was found",
            Status::InvalidCallbackUrl => "The callback URL is either absent or incorrect",
            Status::SubscriptionNotDeleted => "No such subscription could be deleted",
            Status::InvalidComment => "The comment is either absent or incorrect",
            Status::TooManyNotifications => "Too many notifications are already set",
            Status::UserDeactivated => "The user is deactivated",
            Status::InvalidSignature => "The signature is invalid",
            Status::WrongNotificationCallbackUrl => "Wrong notification callback URL",
            Status::TooManyRequests => "Too many requests",
            Status::WrongAction => "Wrong action or wrong webservice",
            Status::UnknownError => "An unknown error occurred",
            Status::ServiceNotDefined => "Service is not defined",
            Status::Other(_) => "Undocumented status",
        }
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        match code {
            0 => Status::Success,
            247 => Status::InvalidUserId,
            250 => Status::UserIdAndCredentialsMismatch,
            283 => Status::InvalidToken,
            286 => Status::NoSuchSubscription,
            293 => Status::InvalidCallbackUrl,
            294 => Status::SubscriptionNotDeleted,
            304 => Status::InvalidComment,
            305 => Status::TooManyNotifications,
            328 => Status::UserDeactivated,
            342 => Status::InvalidSignature,
            343 => Status::WrongNotificationCallbackUrl,
            601 => Status::TooManyRequests,
            2554 => Status::WrongAction,
            2555 => Status::UnknownError,
            2556 => Status::ServiceNotDefined,
            other => Status::Other(other),
        }
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

// ============================================================================
// Sleep States
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum SleepState {
    Awake,
    LightSleep,
    DeepSleep,
    Rem,
    Other(i32),
}

impl From<i32> for SleepState {
    fn from(code: i32) -> Self {
        match code {
            0 => SleepState::Awake,
            1 => SleepState::LightSleep,
            2 => SleepState::DeepSleep,
            3 => SleepState::Rem,
            other => SleepState::Other(other),
        }
    }
}

impl From<SleepState> for i32 {
    fn from(state: SleepState) -> Self {
        match state {
            SleepState::Awake => 0,
            SleepState::LightSleep => 1,
            SleepState::DeepSleep => 2,
            SleepState::Rem => 3,
            SleepState::Other(code) => code,
        }
    }
}

// ============================================================================
// Workout Types
// ============================================================================

/// Workout category as reported on workout series entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum WorkoutType {
    Walk,
    Run,
    Hiking,
    Skating,
    Bmx,
    Bicycling,
    Swim,
    Surfing,
    KiteSurfing,
    WindSurfing,
    Bodyboard,
    Tennis,
    TableTennis,
    Squash,
    Badminton,
    LiftWeights,
    Calisthenics,
    Elliptical,
    Pilates,
    Basketball,
    Soccer,
    Football,
    Rugby,
    Volleyball,
    WaterPolo,
    HorseRiding,
    Golf,
    Yoga,
    Dancing,
    Boxing,
    Fencing,
    Wrestling,
    MartialArts,
    Skiing,
    Snowboarding,
    Base,
    Rowing,
    Zumba,
    Baseball,
    Handball,
    Hockey,
    Climbing,
    IceSkating,
    Other(i32),
}

/// Wire codes for every documented workout type
const WORKOUT_CODES: [(i32, WorkoutType); 43] = [
    (1, WorkoutType::Walk),
    (2, WorkoutType::Run),
    (3, WorkoutType::Hiking),
    (4, WorkoutType::Skating),
    (5, WorkoutType::Bmx),
    (6, WorkoutType::Bicycling),
    (7, WorkoutType::Swim),
    (8, WorkoutType::Surfing),
    (9, WorkoutType::KiteSurfing),
    (10, WorkoutType::WindSurfing),
    (11, WorkoutType::Bodyboard),
    (12, WorkoutType::Tennis),
    (13, WorkoutType::TableTennis),
    (14, WorkoutType::Squash),
    (15, WorkoutType::Badminton),
    (16, WorkoutType::LiftWeights),
    (17, WorkoutType::Calisthenics),
    (18, WorkoutType::Elliptical),
    (19, WorkoutType::Pilates),
    (20, WorkoutType::Basketball),
    (21, WorkoutType::Soccer),
    (22, WorkoutType::Football),
    (23, WorkoutType::Rugby),
    (24, WorkoutType::Volleyball),
    (25, WorkoutType::WaterPolo),
    (26, WorkoutType::HorseRiding),
    (27, WorkoutType::Golf),
    (28, WorkoutType::Yoga),
    (29, WorkoutType::Dancing),
    (30, WorkoutType::Boxing),
    (31, WorkoutType::Fencing),
    (32, WorkoutType::Wrestling),
    (33, WorkoutType::MartialArts),
    (34, WorkoutType::Skiing),
    (35, WorkoutType::Snowboarding),
    (186, WorkoutType::Base),
    (187, WorkoutType::Rowing),
    (188, WorkoutType::Zumba),
    (191, WorkoutType::Baseball),
    (192, WorkoutType::Handball),
    (194, WorkoutType::Hockey),
    (195, WorkoutType::Climbing),
    (196, WorkoutType::IceSkating),
];

impl From<i32> for WorkoutType {
    fn from(code: i32) -> Self {
        WORKOUT_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, workout)| *workout)
            .unwrap_or(WorkoutType::Other(code))
    }
}

impl From<WorkoutType> for i32 {
    fn from(workout: WorkoutType) -> Self {
        if let WorkoutType::Other(code) = workout {
            return code;
        }
        WORKOUT_CODES
            .iter()
            .find(|(_, w)| *w == workout)
            .map(|(c, _)| *c)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_meas_type_codes_roundtrip() {
        for meas_type in MeasType::ALL {
            assert_eq!(MeasType::from_code(meas_type.code()), Some(meas_type));
        }
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(7)]
    #[case(9999)]
    #[case(-1)]
    fn test_unknown_meas_codes(#[case] code: i32) {
        assert_eq!(MeasType::from_code(code), None);
    }

    #[rstest]
    #[case(MeasType::Weight, "kg")]
    #[case(MeasType::Height, "m")]
    #[case(MeasType::FatRatio, "%")]
    #[case(MeasType::SystolicBloodPressure, "mmHg")]
    #[case(MeasType::HeartPulse, "bpm")]
    #[case(MeasType::SkinTemperature, "°C")]
    #[case(MeasType::PulseWaveVelocity, "m/s")]
    fn test_meas_type_units(#[case] meas_type: MeasType, #[case] unit: &str) {
        assert_eq!(meas_type.unit(), unit);
    }

    #[rstest]
    #[case(0, Status::Success)]
    #[case(283, Status::InvalidToken)]
    #[case(293, Status::InvalidCallbackUrl)]
    #[case(601, Status::TooManyRequests)]
    #[case(2555, Status::UnknownError)]
    #[case(42, Status::Other(42))]
    fn test_status_from_code(#[case] code: i32, #[case] expected: Status) {
        assert_eq!(Status::from(code), expected);
        assert_eq!(i32::from(expected), code);
    }

    #[test]
    fn test_status_deserializes_from_integer() {
        let status: Status = serde_json::from_str("342").unwrap();
        assert_eq!(status, Status::InvalidSignature);
        assert!(!status.is_success());

        let unknown: Status = serde_json::from_str("1234").unwrap();
        assert_eq!(unknown, Status::Other(1234));
    }

    #[test]
    fn test_workout_codes_roundtrip() {
        for (code, workout) in WORKOUT_CODES {
            assert_eq!(WorkoutType::from(code), workout);
            assert_eq!(i32::from(workout), code);
        }
        assert_eq!(WorkoutType::from(500), WorkoutType::Other(500));
    }

    #[test]
    fn test_sleep_state_from_code() {
        assert_eq!(SleepState::from(3), SleepState::Rem);
        assert_eq!(SleepState::from(9), SleepState::Other(9));
    }

    #[test]
    fn test_measure_category() {
        assert_eq!(MeasureCategory::from_code(1), Some(MeasureCategory::Real));
        assert_eq!(MeasureCategory::from_code(2), Some(MeasureCategory::Objective));
        assert_eq!(MeasureCategory::from_code(3), None);
    }
}

//! Query parameter types
//!
//! One type per endpoint. Each declares its service path, action name and
//! wire keys statically, and only emits the optional parameters that are set.

use chrono::{DateTime, NaiveDate, Utc};
use nokia_health_shared::dates::CALENDAR_DATE_FORMAT;
use nokia_health_shared::{DevType, MeasType, MeasureCategory};

use crate::error::{ClientError, ClientResult};

/// Wire key/value pairs, excluding `action`
pub type QueryPairs = Vec<(&'static str, String)>;

/// A request against one endpoint
pub trait QueryParams {
    /// Service path relative to the API base URL
    const SERVICE: &'static str;
    const ACTION: &'static str;

    /// Validate and encode the parameters
    fn to_pairs(&self) -> ClientResult<QueryPairs>;
}

fn epoch(value: &DateTime<Utc>) -> String {
    value.timestamp().to_string()
}

fn ymd(value: &NaiveDate) -> String {
    value.format(CALENDAR_DATE_FORMAT).to_string()
}

fn check_range<T: PartialOrd>(start: Option<&T>, end: Option<&T>) -> ClientResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ClientError::InvalidParams(
            "start date is after end date".to_string(),
        )),
        _ => Ok(()),
    }
}

fn push_opt<T>(pairs: &mut QueryPairs, key: &'static str, value: Option<&T>, encode: fn(&T) -> String) {
    if let Some(value) = value {
        pairs.push((key, encode(value)));
    }
}

// ============================================================================
// Measures
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BodyMeasuresQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub last_update: Option<DateTime<Utc>>,
    pub dev_type: Option<DevType>,
    pub meas_type: Option<MeasType>,
    pub category: Option<MeasureCategory>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Normalize the measure groups into `parsed` after decoding
    pub parse_response: bool,
}

impl QueryParams for BodyMeasuresQuery {
    const SERVICE: &'static str = "measure";
    const ACTION: &'static str = "getmeas";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        check_range(self.start_date.as_ref(), self.end_date.as_ref())?;
        if self.limit == Some(0) {
            return Err(ClientError::InvalidParams(
                "limit must be positive".to_string(),
            ));
        }

        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "startdate", self.start_date.as_ref(), epoch);
        push_opt(&mut pairs, "enddate", self.end_date.as_ref(), epoch);
        push_opt(&mut pairs, "lastupdate", self.last_update.as_ref(), epoch);
        push_opt(&mut pairs, "devtype", self.dev_type.as_ref(), |d| d.code().to_string());
        push_opt(&mut pairs, "meastype", self.meas_type.as_ref(), |m| m.code().to_string());
        push_opt(&mut pairs, "category", self.category.as_ref(), |c| c.code().to_string());
        push_opt(&mut pairs, "limit", self.limit.as_ref(), u32::to_string);
        push_opt(&mut pairs, "offset", self.offset.as_ref(), u32::to_string);
        Ok(pairs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityMeasuresQuery {
    /// Single day; the response then carries its values directly in the body
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub last_update: Option<DateTime<Utc>>,
    pub offset: Option<u32>,
}

impl QueryParams for ActivityMeasuresQuery {
    const SERVICE: &'static str = "v2/measure";
    const ACTION: &'static str = "getactivity";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        check_range(self.start_date.as_ref(), self.end_date.as_ref())?;

        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "date", self.date.as_ref(), ymd);
        push_opt(&mut pairs, "startdateymd", self.start_date.as_ref(), ymd);
        push_opt(&mut pairs, "enddateymd", self.end_date.as_ref(), ymd);
        push_opt(&mut pairs, "lastupdate", self.last_update.as_ref(), epoch);
        push_opt(&mut pairs, "offset", self.offset.as_ref(), u32::to_string);
        Ok(pairs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntradayActivityQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl QueryParams for IntradayActivityQuery {
    const SERVICE: &'static str = "v2/measure";
    const ACTION: &'static str = "getintradayactivity";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        check_range(self.start_date.as_ref(), self.end_date.as_ref())?;

        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "startdate", self.start_date.as_ref(), epoch);
        push_opt(&mut pairs, "enddate", self.end_date.as_ref(), epoch);
        Ok(pairs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub last_update: Option<DateTime<Utc>>,
    pub offset: Option<u32>,
}

impl QueryParams for WorkoutsQuery {
    const SERVICE: &'static str = "v2/measure";
    const ACTION: &'static str = "getworkouts";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        check_range(self.start_date.as_ref(), self.end_date.as_ref())?;

        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "startdateymd", self.start_date.as_ref(), ymd);
        push_opt(&mut pairs, "enddateymd", self.end_date.as_ref(), ymd);
        push_opt(&mut pairs, "lastupdate", self.last_update.as_ref(), epoch);
        push_opt(&mut pairs, "offset", self.offset.as_ref(), u32::to_string);
        Ok(pairs)
    }
}

// ============================================================================
// Sleep
// ============================================================================

/// Both bounds are mandatory for sleep measures
#[derive(Debug, Clone)]
pub struct SleepMeasuresQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl QueryParams for SleepMeasuresQuery {
    const SERVICE: &'static str = "v2/sleep";
    const ACTION: &'static str = "get";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        check_range(Some(&self.start_date), Some(&self.end_date))?;
        Ok(vec![
            ("startdate", epoch(&self.start_date)),
            ("enddate", epoch(&self.end_date)),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct SleepSummaryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub last_update: Option<DateTime<Utc>>,
    pub offset: Option<u32>,
}

impl QueryParams for SleepSummaryQuery {
    const SERVICE: &'static str = "v2/sleep";
    const ACTION: &'static str = "getsummary";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        check_range(self.start_date.as_ref(), self.end_date.as_ref())?;

        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "startdateymd", self.start_date.as_ref(), ymd);
        push_opt(&mut pairs, "enddateymd", self.end_date.as_ref(), ymd);
        push_opt(&mut pairs, "lastupdate", self.last_update.as_ref(), epoch);
        push_opt(&mut pairs, "offset", self.offset.as_ref(), u32::to_string);
        Ok(pairs)
    }
}

// ============================================================================
// Notifications
// ============================================================================

fn require_callback(callback_url: &str) -> ClientResult<()> {
    if callback_url.trim().is_empty() {
        return Err(ClientError::InvalidParams(
            "callback URL is required".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CreateNotificationQuery {
    pub callback_url: String,
    pub comment: String,
    pub appli: Option<i32>,
}

impl QueryParams for CreateNotificationQuery {
    const SERVICE: &'static str = "notify";
    const ACTION: &'static str = "subscribe";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        require_callback(&self.callback_url)?;

        let mut pairs = vec![
            ("callbackurl", self.callback_url.clone()),
            ("comment", self.comment.clone()),
        ];
        push_opt(&mut pairs, "appli", self.appli.as_ref(), i32::to_string);
        Ok(pairs)
    }
}

#[derive(Debug, Clone)]
pub struct NotificationInfoQuery {
    pub callback_url: String,
    pub appli: Option<i32>,
}

impl QueryParams for NotificationInfoQuery {
    const SERVICE: &'static str = "notify";
    const ACTION: &'static str = "get";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        require_callback(&self.callback_url)?;

        let mut pairs = vec![("callbackurl", self.callback_url.clone())];
        push_opt(&mut pairs, "appli", self.appli.as_ref(), i32::to_string);
        Ok(pairs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListNotificationsQuery {
    pub appli: Option<i32>,
}

impl QueryParams for ListNotificationsQuery {
    const SERVICE: &'static str = "notify";
    const ACTION: &'static str = "list";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "appli", self.appli.as_ref(), i32::to_string);
        Ok(pairs)
    }
}

#[derive(Debug, Clone)]
pub struct RevokeNotificationQuery {
    pub callback_url: String,
    pub appli: Option<i32>,
}

impl QueryParams for RevokeNotificationQuery {
    const SERVICE: &'static str = "notify";
    const ACTION: &'static str = "revoke";

    fn to_pairs(&self) -> ClientResult<QueryPairs> {
        require_callback(&self.callback_url)?;

        let mut pairs = vec![("callbackurl", self.callback_url.clone())];
        push_opt(&mut pairs, "appli", self.appli.as_ref(), i32::to_string);
        Ok(pairs)
    }
}

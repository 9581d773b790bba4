//! Typed HTTP client for the DayPat API.
//!
//! Used by the CLI and, through [`PraiseStore`], by [`DayPraises`](crate::journal::DayPraises).

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::aggregation::{MonthActivity, WeekActivity};
use crate::dates::CalendarDate;
use crate::export::{ExportMode, ExportPlan};
use crate::journal::PraiseStore;
use crate::models::{DayCard, DayCardUpdate, DayStampWithAsset, Praise, StampAsset};
use crate::streak::StreakInfo;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} ({code}, HTTP {status})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    Envelope(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut base = Url::parse(base_url)?;
        // Endpoint paths are joined relative to the base, keeping any path prefix
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base, token })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            ClientError::Envelope(format!("HTTP {} with non-JSON body: {}", status.as_u16(), e))
        })?;
        decode_envelope(status, body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn root(&self) -> Result<Value, ClientError> {
        self.get("", &[]).await
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get("health", &[]).await
    }

    pub async fn month(&self, year: i32, month: u32) -> Result<MonthActivity, ClientError> {
        self.get(&format!("api/calendar/month/{}/{}", year, month), &[]).await
    }

    pub async fn week(&self, anchor: Option<CalendarDate>) -> Result<WeekActivity, ClientError> {
        let query: Vec<(&str, String)> = anchor.map(|d| ("anchor", d.key())).into_iter().collect();
        self.get("api/calendar/week", &query).await
    }

    pub async fn streak(
        &self,
        selected: Option<CalendarDate>,
        today: Option<CalendarDate>,
    ) -> Result<StreakInfo, ClientError> {
        let mut query = Vec::new();
        if let Some(d) = selected {
            query.push(("selected", d.key()));
        }
        if let Some(d) = today {
            query.push(("today", d.key()));
        }
        self.get("api/streak", &query).await
    }

    pub async fn list_praises(&self, date: CalendarDate) -> Result<Vec<Praise>, ClientError> {
        self.get(&format!("api/days/{}/praises", date), &[]).await
    }

    pub async fn add_praise(
        &self,
        date: CalendarDate,
        content: &str,
    ) -> Result<Praise, ClientError> {
        self.request(
            Method::POST,
            &format!("api/days/{}/praises", date),
            &[],
            Some(json!({ "content": content })),
        )
        .await
    }

    pub async fn edit_praise(&self, id: i64, content: &str) -> Result<Praise, ClientError> {
        self.request(
            Method::PUT,
            &format!("api/praises/{}", id),
            &[],
            Some(json!({ "content": content })),
        )
        .await
    }

    pub async fn remove_praise(&self, id: i64) -> Result<(), ClientError> {
        let _: Value = self
            .request(Method::DELETE, &format!("api/praises/{}", id), &[], None)
            .await?;
        Ok(())
    }

    pub async fn day_card(&self, date: CalendarDate) -> Result<Option<DayCard>, ClientError> {
        self.get(&format!("api/days/{}/card", date), &[]).await
    }

    pub async fn update_day_card(
        &self,
        date: CalendarDate,
        update: &DayCardUpdate,
    ) -> Result<DayCard, ClientError> {
        let body = serde_json::to_value(update).map_err(|e| ClientError::Envelope(e.to_string()))?;
        self.request(Method::PUT, &format!("api/days/{}/card", date), &[], Some(body))
            .await
    }

    pub async fn stamp_assets(&self) -> Result<Vec<StampAsset>, ClientError> {
        self.get("api/stamps", &[]).await
    }

    pub async fn day_stamp(
        &self,
        date: CalendarDate,
    ) -> Result<Option<DayStampWithAsset>, ClientError> {
        self.get(&format!("api/days/{}/stamp", date), &[]).await
    }

    pub async fn set_day_stamp(
        &self,
        date: CalendarDate,
        stamp_asset_id: i64,
    ) -> Result<DayStampWithAsset, ClientError> {
        self.request(
            Method::PUT,
            &format!("api/days/{}/stamp", date),
            &[],
            Some(json!({ "stamp_asset_id": stamp_asset_id })),
        )
        .await
    }

    /// Returns whether a stamp was removed
    pub async fn remove_day_stamp(&self, date: CalendarDate) -> Result<bool, ClientError> {
        let data: Value = self
            .request(Method::DELETE, &format!("api/days/{}/stamp", date), &[], None)
            .await?;
        Ok(data.get("removed").and_then(Value::as_bool).unwrap_or(false))
    }

    pub async fn export_plan(
        &self,
        mode: ExportMode,
        from: CalendarDate,
        to: CalendarDate,
    ) -> Result<ExportPlan, ClientError> {
        self.get(
            "api/export/plan",
            &[("mode", mode.to_string()), ("from", from.key()), ("to", to.key())],
        )
        .await
    }
}

/// Unwrap `{ success, data }` or turn `{ success: false, error, code }` into [`ClientError::Api`]
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: Value) -> Result<T, ClientError> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);

    if !success || !status.is_success() {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        let code = body
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN")
            .to_string();
        return Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        });
    }

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|e| ClientError::Envelope(e.to_string()))
}

#[async_trait]
impl PraiseStore for ApiClient {
    type Error = ClientError;

    async fn fetch_praises(&self, date: CalendarDate) -> Result<Vec<Praise>, ClientError> {
        self.list_praises(date).await
    }

    async fn create_praise(
        &self,
        date: CalendarDate,
        content: &str,
    ) -> Result<Praise, ClientError> {
        self.add_praise(date, content).await
    }

    async fn update_praise(&self, id: i64, content: &str) -> Result<Praise, ClientError> {
        self.edit_praise(id, content).await
    }

    async fn delete_praise(&self, id: i64) -> Result<(), ClientError> {
        self.remove_praise(id).await
    }
}

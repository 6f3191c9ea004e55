use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::settings::ApiConfig;
use crate::models::{Coordinates, TimingsRecord, TuneOffsets};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    NetworkFailure,
    ParseFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid calendar url: {0}")]
    InvalidUrl(String),
    #[error("network error while fetching calendar: {0}")]
    Transport(String),
    #[error("calendar api error: http {0}")]
    Status(u16),
    #[error("invalid calendar payload: {0}")]
    Malformed(String),
    #[error("day {day} is not in the calendar response ({available} days)")]
    DayOutOfRange { day: u32, available: usize },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidUrl(_) | FetchError::Transport(_) | FetchError::Status(_) => {
                FetchErrorKind::NetworkFailure
            }
            FetchError::Malformed(_) | FetchError::DayOutOfRange { .. } => {
                FetchErrorKind::ParseFailure
            }
        }
    }
}

/// Turns a date and a position into that day's timings.
#[async_trait]
pub trait TimingsClient: Send + Sync {
    async fn fetch_timings_for(
        &self,
        date: NaiveDate,
        coords: Coordinates,
    ) -> Result<TimingsRecord, FetchError>;
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    data: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize)]
struct CalendarDay {
    timings: TimingsRecord,
}

/// Build the monthly calendar request. The tune list goes out with literal
/// commas, so the query is formatted by hand rather than form-encoded.
pub fn calendar_url(
    base_url: &str,
    date: NaiveDate,
    coords: Coordinates,
    method: u8,
    tune: &TuneOffsets,
) -> Result<Url, FetchError> {
    let raw = format!(
        "{}/v1/calendar/{}/{}?latitude={}&longitude={}&method={}&tune={}",
        base_url.trim_end_matches('/'),
        date.year(),
        date.month(),
        coords.latitude(),
        coords.longitude(),
        method,
        tune,
    );
    Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))
}

/// Pick the 1-indexed `day` out of a monthly calendar body.
pub fn select_day(body: &str, day: u32) -> Result<TimingsRecord, FetchError> {
    let parsed: CalendarResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    let available = parsed.data.len();

    day.checked_sub(1)
        .and_then(|idx| parsed.data.into_iter().nth(idx as usize))
        .map(|entry| entry.timings)
        .ok_or(FetchError::DayOutOfRange { day, available })
}

/// Client for the AlAdhan calendar endpoint.
#[derive(Debug, Clone)]
pub struct AladhanClient {
    client: Client,
    base_url: String,
    method: u8,
    tune: TuneOffsets,
}

impl AladhanClient {
    pub fn new(base_url: impl Into<String>, method: u8, tune: TuneOffsets) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            method,
            tune,
        }
    }

    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(api.base_url.clone(), api.method, api.tune)
    }
}

#[async_trait]
impl TimingsClient for AladhanClient {
    async fn fetch_timings_for(
        &self,
        date: NaiveDate,
        coords: Coordinates,
    ) -> Result<TimingsRecord, FetchError> {
        let url = calendar_url(&self.base_url, date, coords, self.method, &self.tune)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let record = select_day(&body, date.day())?;
        debug!("Timings for {}: fajr={} isha={}", date, record.fajr, record.isha);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// A month of entries where day N has Fajr "05:NN".
    fn month_body(days: u32) -> String {
        let entries: Vec<String> = (1..=days)
            .map(|d| {
                format!(
                    r#"{{"timings":{{"Fajr":"05:{d:02}","Sunrise":"06:30","Dhuhr":"12:20","Asr":"15:45","Sunset":"18:05","Maghrib":"18:08","Isha":"19:25","Imsak":"04:50","Midnight":"00:12","Firstthird":"22:00","Lastthird":"02:20"}},"date":{{"readable":"{d:02} Mar 2024"}}}}"#
                )
            })
            .collect();
        format!(r#"{{"code":200,"status":"OK","data":[{}]}}"#, entries.join(","))
    }

    fn islamabad() -> Coordinates {
        Coordinates::new(33.6938, 73.0651).unwrap()
    }

    #[test]
    fn default_request_sends_tune_in_field_order() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let url = calendar_url(
            "http://api.aladhan.com",
            date,
            islamabad(),
            15,
            &TuneOffsets::default(),
        )
        .unwrap();

        assert_eq!(url.path(), "/v1/calendar/2024/3");
        assert!(url.as_str().contains("method=15"));
        assert!(url.as_str().ends_with("tune=0,2,0,5,1,3,0,-1"));
        assert!(url.as_str().contains("latitude=33.6938&longitude=73.0651"));
    }

    #[test]
    fn changed_tune_is_not_reordered() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let tune: TuneOffsets = "8,7,6,5,4,3,2,1".parse().unwrap();
        let url = calendar_url("http://example.test/", date, islamabad(), 2, &tune).unwrap();
        assert_eq!(url.path(), "/v1/calendar/2024/12");
        assert!(url.as_str().contains("method=2&tune=8,7,6,5,4,3,2,1"));
    }

    #[test]
    fn picks_index_day_minus_one() {
        let record = select_day(&month_body(31), 15).unwrap();
        assert_eq!(record.fajr, "05:15");

        let first = select_day(&month_body(31), 1).unwrap();
        assert_eq!(first.fajr, "05:01");
        assert!(first.entries().iter().all(|(_, v)| !v.is_empty()));
    }

    #[test]
    fn mid_march_entry_comes_from_index_fourteen() {
        let body = month_body(31)
            .replace(r#""Fajr":"05:02""#, r#""Fajr":"04:59""#)
            .replace(r#""Fajr":"05:15""#, r#""Fajr":"05:02""#);

        assert_eq!(select_day(&body, 15).unwrap().fajr, "05:02");
        assert_eq!(select_day(&body, 2).unwrap().fajr, "04:59");
    }

    #[test]
    fn day_past_the_end_is_a_parse_failure() {
        let err = select_day(&month_body(29), 30).unwrap_err();
        assert_eq!(err, FetchError::DayOutOfRange { day: 30, available: 29 });
        assert_eq!(err.kind(), FetchErrorKind::ParseFailure);

        let err = select_day(&month_body(29), 0).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::ParseFailure);
    }

    #[test]
    fn malformed_bodies_are_parse_failures() {
        for body in [
            "",
            "not json",
            r#"{"code":200}"#,
            r#"{"code":400,"status":"BAD_REQUEST","data":"Invalid date"}"#,
            r#"{"data":[{"timings":{"Fajr":"05:00"}}]}"#,
        ] {
            let err = select_day(body, 1).unwrap_err();
            assert_eq!(err.kind(), FetchErrorKind::ParseFailure, "body: {body}");
        }
    }

    /// Serves one canned HTTP response and hands back the request line.
    async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request = String::from_utf8_lossy(&buf).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn fetches_requested_day_over_http() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", month_body(31)).await;
        let client = AladhanClient::new(base, 15, TuneOffsets::default());
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let record = client.fetch_timings_for(date, islamabad()).await.unwrap();
        assert_eq!(record.fajr, "05:15");

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /v1/calendar/2024/3?"));
        assert!(request_line.contains("tune=0,2,0,5,1,3,0,-1"));
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_failure() {
        let (base, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"code":500}"#.to_string(),
        )
        .await;
        let client = AladhanClient::new(base, 15, TuneOffsets::default());
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let err = client.fetch_timings_for(date, islamabad()).await.unwrap_err();
        assert_eq!(err, FetchError::Status(500));
        assert_eq!(err.kind(), FetchErrorKind::NetworkFailure);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_failure() {
        // Bind then drop to get a port nobody is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = AladhanClient::new(format!("http://{addr}"), 15, TuneOffsets::default());
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let err = client.fetch_timings_for(date, islamabad()).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}

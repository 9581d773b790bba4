mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn add_praise(
    server: &common::TestServer,
    token: &str,
    date: &str,
    content: &str,
) -> Result<()> {
    let res = reqwest::Client::new()
        .post(server.url(&format!("/api/days/{}/praises", date)))
        .bearer_auth(token)
        .json(&json!({ "content": content }))
        .send()
        .await?;
    common::expect_data(res, StatusCode::CREATED).await?;
    Ok(())
}

#[tokio::test]
async fn month_view_has_a_full_grid_and_activity() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    add_praise(server, &token, "2024-02-01", "first of the month").await?;
    add_praise(server, &token, "2024-02-01", "another one").await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/calendar/month/2024/2"))
        .bearer_auth(&token)
        .send()
        .await?;
    let data = common::expect_data(res, StatusCode::OK).await?;

    let cells = data["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 42);
    // 2024-02-01 is a Thursday, so the grid opens on Monday 2024-01-29
    assert_eq!(cells[0]["date"], "2024-01-29");
    assert_eq!(cells[0]["in_month"], false);

    let day = &data["activity"]["2024-02-01"];
    assert_eq!(day["entry_count"], 2);
    assert_eq!(day["has_entry"], true);
    assert_eq!(day["has_stamp"], false);
    Ok(())
}

#[tokio::test]
async fn invalid_month_is_a_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let res = reqwest::Client::new()
        .get(server.url("/api/calendar/month/2024/13"))
        .bearer_auth(&token)
        .send()
        .await?;
    common::expect_error(res, StatusCode::BAD_REQUEST).await?;
    Ok(())
}

#[tokio::test]
async fn week_view_runs_monday_to_sunday() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let res = reqwest::Client::new()
        .get(server.url("/api/calendar/week?anchor=2024-03-06"))
        .bearer_auth(&token)
        .send()
        .await?;
    let data = common::expect_data(res, StatusCode::OK).await?;
    assert_eq!(data["range"]["start"], "2024-03-04");
    assert_eq!(data["range"]["end"], "2024-03-10");
    assert_eq!(data["days"].as_array().unwrap().len(), 7);
    Ok(())
}

#[tokio::test]
async fn malformed_week_anchor_is_a_validation_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let res = reqwest::Client::new()
        .get(server.url("/api/calendar/week?anchor=2024-3-6"))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = common::expect_error(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn streaks_follow_consecutive_days() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    for date in ["2024-01-10", "2024-01-11", "2024-01-12"] {
        add_praise(server, &token, date, "kept going").await?;
    }

    let client = reqwest::Client::new();
    let res = client
        .get(server.url("/api/streak?today=2024-01-12&selected=2024-01-09"))
        .bearer_auth(&token)
        .send()
        .await?;
    let data = common::expect_data(res, StatusCode::OK).await?;
    assert_eq!(data["current_streak"], 3);
    assert_eq!(data["selected_streak"], 0);

    let res = client
        .get(server.url("/api/streak?today=2024-01-13&selected=2024-01-11"))
        .bearer_auth(&token)
        .send()
        .await?;
    let data = common::expect_data(res, StatusCode::OK).await?;
    assert_eq!(data["current_streak"], 0);
    assert_eq!(data["selected_streak"], 2);
    Ok(())
}

mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::json;

#[tokio::test]
async fn export_plan_lists_active_days() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let client = Client::new();

    for date in ["2024-06-03", "2024-06-05"] {
        let res = client
            .post(server.url(&format!("/api/days/{}/praises", date)))
            .bearer_auth(&token)
            .json(&json!({ "content": "export me" }))
            .send()
            .await?;
        common::expect_data(res, StatusCode::CREATED).await?;
    }

    let res = client
        .get(server.url("/api/export/plan?mode=day&from=2024-06-01&to=2024-06-30"))
        .bearer_auth(&token)
        .send()
        .await?;
    let plan = common::expect_data(res, StatusCode::OK).await?;
    assert_eq!(plan["filename"], "DayPat_Days_20240601-20240630.pdf");
    let labels: Vec<&str> = plan["pages"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["label"].as_str())
        .collect();
    assert_eq!(labels, ["2024-06-03", "2024-06-05"]);

    let res = client
        .get(server.url("/api/export/plan?mode=week&from=2024-06-01&to=2024-06-30"))
        .bearer_auth(&token)
        .send()
        .await?;
    let plan = common::expect_data(res, StatusCode::OK).await?;
    assert_eq!(plan["filename"], "DayPat_Weeks_20240601-20240630.pdf");
    assert_eq!(plan["pages"].as_array().unwrap().len(), 1);
    assert_eq!(plan["pages"][0]["active_days"], 2);
    Ok(())
}

#[tokio::test]
async fn reversed_range_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let res = Client::new()
        .get(server.url("/api/export/plan?mode=month&from=2024-06-30&to=2024-06-01"))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = common::expect_error(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["error"], "Please select a valid date range");
    Ok(())
}

#[tokio::test]
async fn empty_range_has_no_content() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let res = Client::new()
        .get(server.url("/api/export/plan?mode=day&from=2024-06-01&to=2024-06-30"))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = common::expect_error(res, StatusCode::UNPROCESSABLE_ENTITY).await?;
    assert_eq!(body["error"], "No content to export for the selected date range");
    Ok(())
}

#[tokio::test]
async fn unknown_mode_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let res = Client::new()
        .get(server.url("/api/export/plan?mode=favorites&from=2024-06-01&to=2024-06-30"))
        .bearer_auth(&token)
        .send()
        .await?;
    common::expect_error(res, StatusCode::BAD_REQUEST).await?;
    Ok(())
}

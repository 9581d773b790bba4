mod common;

use anyhow::Result;
use daypat::client::ApiClient;
use daypat::dates::CalendarDate;
use daypat::journal::{DayPraises, MutationOutcome};

#[tokio::test]
async fn optimistic_add_commits_against_the_server() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let client = ApiClient::new(&server.base_url, Some(token))?;
    let date: CalendarDate = "2024-07-01".parse()?;

    let mut day = DayPraises::new(client.clone(), date);
    day.refresh().await?;
    assert!(day.praises().is_empty());

    let saved = match day.add("drank enough water").await? {
        MutationOutcome::Committed(praise) => praise,
        MutationOutcome::RolledBack { error, .. } => panic!("unexpected rollback: {}", error),
    };
    assert!(saved.id > 0);
    assert_eq!(day.praises(), [saved.clone()].as_slice());

    // The server agrees with the local list
    assert_eq!(client.list_praises(date).await?, day.praises());
    Ok(())
}

#[tokio::test]
async fn server_rejection_rolls_back_the_local_list() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let client = ApiClient::new(&server.base_url, Some(token))?;
    let date: CalendarDate = "2024-07-02".parse()?;

    let mut day = DayPraises::new(client.clone(), date);
    day.add("will vanish").await?;
    let before = day.praises().to_vec();
    let id = before[0].id;

    // Removed behind the model's back, so the optimistic edit fails with 404
    client.remove_praise(id).await?;

    match day.update(id, "edited").await? {
        MutationOutcome::RolledBack { error, restored } => {
            assert_eq!(error.status(), Some(404));
            assert_eq!(restored, before);
        }
        MutationOutcome::Committed(_) => panic!("edit of a deleted praise committed"),
    }
    assert_eq!(day.praises(), before.as_slice());
    Ok(())
}

#[tokio::test]
async fn client_reads_calendar_views() -> Result<()> {
    let server = common::ensure_server().await?;
    let (_, token) = common::new_user();
    let client = ApiClient::new(&server.base_url, Some(token))?;
    let date: CalendarDate = "2024-07-03".parse()?;
    client.add_praise(date, "typed client").await?;

    let month = client.month(2024, 7).await?;
    assert_eq!(month.cells.len(), 42);
    assert_eq!(month.activity[&date].entry_count, 1);

    let streak = client.streak(Some(date), Some(date)).await?;
    assert_eq!(streak.current_streak, 1);
    Ok(())
}

//! End-to-end lifecycle scenarios against the stub items server.

mod common;

use std::time::Duration;

use serde_json::json;

use restcheck::{
    Expectation, FixtureGenerator, HttpStep, HttpTransport, ItemDraft, Method, Outcome, Runner,
    Scenario, Step, StepAction,
};

use common::ItemsServer;

fn transport_for(server: &ItemsServer) -> HttpTransport {
    HttpTransport::new(&server.base_url, Duration::from_secs(5)).expect("valid base url")
}

#[tokio::test]
async fn create_then_fetch_echoes_the_draft_with_a_populated_id() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;
    let draft = ItemDraft::new("cd", "868-3-60-807126-3", 69.64, 7);

    let runner = Runner::new(transport_for(&server));
    let summary = runner
        .run(&[Scenario::create_and_verify("create and fetch", "/items", &draft)])
        .await;

    assert!(summary.all_passed(), "{summary}");
    Ok(())
}

#[tokio::test]
async fn update_of_an_existing_item_keeps_its_id() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;
    server.store.seed(
        7,
        json!({"type": "cd", "isbn13": "868-3-60-807126-3", "price": 69.64, "numberinstock": 7}),
    );

    let updated = ItemDraft::new("dvd", "152-7-65-672400-8", 20.0, 10);
    let mut expected = updated.to_json();
    expected["id"] = json!(7);

    let scenario = Scenario::new(
        "update item 7",
        vec![Step {
            name: "update".to_string(),
            action: StepAction::Http(HttpStep {
                method: Method::Put,
                path: "/items/7".to_string(),
                body: Some(updated.to_json()),
                expect: Expectation::partial(200, expected),
                capture: Vec::new(),
            }),
        }],
    );

    let runner = Runner::new(transport_for(&server));
    let summary = runner.run(&[scenario]).await;

    assert!(summary.all_passed(), "{summary}");
    Ok(())
}

#[tokio::test]
async fn deleted_items_are_gone_on_refetch() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;
    let mut fixtures = FixtureGenerator::seeded(11);
    let draft = fixtures.item("cd", 10.0..=100.0, 1..=50)?;

    let runner = Runner::new(transport_for(&server));
    let summary = runner
        .run(&[Scenario::create_and_destroy("delete and 404", "/items", &draft)])
        .await;

    assert!(summary.all_passed(), "{summary}");
    Ok(())
}

#[tokio::test]
async fn partial_field_update_preserves_the_rest() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;
    let mut fixtures = FixtureGenerator::seeded(12);
    let draft = fixtures.item("book", 10.0..=100.0, 1..=50)?;

    let runner = Runner::new(transport_for(&server));
    let summary = runner
        .run(&[
            Scenario::create_and_mutate("update price", "/items", &draft, &draft.with_price(99.99)),
            Scenario::create_and_mutate("update stock", "/items", &draft, &draft.with_stock(25)),
        ])
        .await;

    assert_eq!(summary.passed, 2, "{summary}");
    Ok(())
}

#[tokio::test]
async fn two_independent_creations_are_distinct() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;
    let mut fixtures = FixtureGenerator::new();
    let first = fixtures.item("book", 10.0..=100.0, 1..=50)?;
    let second = fixtures.item("book", 10.0..=100.0, 1..=50)?;

    let runner = Runner::new(transport_for(&server));
    let summary = runner
        .run(&[Scenario::distinct_pair("distinct items", "/items", &first, &second)])
        .await;

    assert!(summary.all_passed(), "{summary}");
    Ok(())
}

#[tokio::test]
async fn reading_a_projection_of_a_created_item() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;
    server.store.seed(
        6,
        json!({"type": "cd", "isbn13": "868-3-60-807126-3", "price": 69.64, "numberinstock": 7}),
    );

    // An expectation smaller than the full item is a valid partial match.
    let scenario =
        Scenario::read_expecting("type only", "/items/6", 200, Some(json!({"type": "cd"})));

    let runner = Runner::new(transport_for(&server));
    let summary = runner.run(&[scenario]).await;

    assert!(summary.all_passed(), "{summary}");
    Ok(())
}

#[tokio::test]
async fn a_contract_violation_reports_failed_with_detail() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;

    // Nothing has id 999, so expecting 200 is a contract failure, not an
    // infrastructure one: the resource answered.
    let scenario = Scenario::read_expecting("missing item", "/items/999", 200, None);

    let runner = Runner::new(transport_for(&server));
    let summary = runner.run(&[scenario]).await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.results[0].outcome, Outcome::Failed);
    let detail = summary.results[0].detail.as_deref().unwrap();
    assert!(detail.contains("expected 200, got 404"), "detail: {detail}");
    Ok(())
}

#[tokio::test]
async fn an_unreachable_resource_reports_aborted() {
    // Nothing listens on port 9 on loopback.
    let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2))
        .expect("valid base url");
    let draft = ItemDraft::new("cd", "868-3-60-807126-3", 69.64, 7);

    let runner = Runner::new(transport);
    let summary = runner
        .run(&[Scenario::create_and_verify("unreachable", "/items", &draft)])
        .await;

    assert_eq!(summary.aborted, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.results[0].outcome, Outcome::Aborted);
}

#[tokio::test]
async fn a_stalled_request_times_out_and_aborts() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;
    // The stub's slow route sleeps far longer than this timeout.
    let transport = HttpTransport::new(&server.base_url, Duration::from_millis(200))
        .expect("valid base url");

    let scenario = Scenario::read_expecting("stalled", "/slow/items/1", 200, None);

    let runner = Runner::new(transport);
    let summary = runner.run(&[scenario]).await;

    assert_eq!(summary.aborted, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.results[0].outcome, Outcome::Aborted);
    let detail = summary.results[0].detail.as_deref().unwrap();
    assert!(detail.contains("timed out"), "detail: {detail}");
    Ok(())
}

#[tokio::test]
async fn a_non_json_answer_fails_rather_than_aborts() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;

    // The resource answered, with garbage: that is a broken API, not an
    // unreachable one.
    let scenario = Scenario::read_expecting("garbage body", "/garbage/items/6", 200, None);

    let runner = Runner::new(transport_for(&server));
    let summary = runner.run(&[scenario]).await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.aborted, 0);
    let detail = summary.results[0].detail.as_deref().unwrap();
    assert!(detail.contains("not valid JSON"), "detail: {detail}");
    Ok(())
}

#[tokio::test]
async fn the_report_covers_every_attempted_scenario() -> anyhow::Result<()> {
    let server = ItemsServer::spawn().await?;
    let mut fixtures = FixtureGenerator::seeded(13);
    let good = fixtures.item("book", 10.0..=100.0, 1..=50)?;

    let scenarios = vec![
        Scenario::create_and_verify("passes", "/items", &good),
        Scenario::read_expecting("fails", "/items/999", 200, None),
        Scenario::create_and_destroy("passes too", "/items", &good),
    ];

    let runner = Runner::new(transport_for(&server));
    let summary = runner.run(&scenarios).await;

    // Finalization happened exactly once (the reporter is consumed by end),
    // and every attempted scenario is accounted for.
    assert_eq!(summary.total(), scenarios.len());
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.aborted, 0);
    Ok(())
}

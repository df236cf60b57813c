//! End-to-end runs against a mock recipe site

use crate::common::{detail_html, good_recipe, incomplete_html, listing_html, test_config};
use pantry_harvest::crawler::{Coordinator, HarvestStop, PaginationStop};
use pantry_harvest::output::OutputError;
use pantry_harvest::HarvestError;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const LISTING_PATH: &str = "/issue/view.html";

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Mounts listing pages; page 1 is served for the bare listing URL
async fn mount_listing(server: &MockServer, pages: &[&[u32]]) {
    for (i, ids) in pages.iter().enumerate().skip(1) {
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .and(query_param("page", (i + 1).to_string()))
            .respond_with(html(listing_html(ids)))
            .mount(server)
            .await;
    }

    // Pages past the last one come back empty
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", (pages.len() + 1).to_string()))
        .respond_with(html(listing_html(&[])))
        .mount(server)
        .await;

    if let Some(first) = pages.first() {
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .and(query_param("cid", "9999scrap"))
            .and(|req: &Request| !req.url.query_pairs().any(|(k, _)| k == "page"))
            .respond_with(html(listing_html(first)))
            .mount(server)
            .await;
    }
}

async fn mount_detail(server: &MockServer, id: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/recipe/{}", id)))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn listing_url(server: &MockServer) -> String {
    format!("{}{}?cid=9999scrap", server.uri(), LISTING_PATH)
}

#[tokio::test]
async fn test_full_run_writes_dataset() {
    let server = MockServer::start().await;
    mount_listing(&server, &[&[1, 2, 3], &[3, 4]]).await;
    mount_detail(&server, 1, good_recipe(1)).await;
    mount_detail(&server, 2, good_recipe(2)).await;
    mount_detail(&server, 3, incomplete_html("No steps here")).await;
    mount_detail(
        &server,
        4,
        detail_html(
            "김치찌개",
            &["김치 200g", "돼지고기 100g"],
            &["냄비에 김치를 넣고 볶아주세요", "물을 붓고 끓여주세요"],
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("out").join("recipes.csv");
    let summary = dir.path().join("summary.md");

    let mut config = test_config(&listing_url(&server), 10, dataset.to_str().unwrap());
    config.output.summary_path = Some(summary.to_str().unwrap().to_string());

    let report = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .with_config_hash("testhash")
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(report.links_collected, 4);
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pagination_stop, PaginationStop::EmptyPage { page: 3 });
    assert_eq!(report.harvest_stop, HarvestStop::LinksExhausted);
    assert_eq!(report.links_processed, 4);
    assert_eq!(report.success_count, 3);
    assert_eq!(report.skip_count, 1);
    assert_eq!(report.incomplete_skips, 1);

    let mut reader = csv::Reader::from_path(&dataset).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["title", "url", "ingredients", "steps"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "Recipe 1");
    assert_eq!(&rows[0][1], format!("{}/recipe/1", server.uri()));
    assert_eq!(&rows[0][2], "두부 1모; 간장 2큰술");
    assert_eq!(
        &rows[0][3],
        "1. Cut the tofu into cubes | 2. Simmer with the soy sauce"
    );
    assert_eq!(&rows[2][0], "김치찌개");
    assert_eq!(
        &rows[2][3],
        "1. 냄비에 김치를 넣고 볶아주세요 | 2. 물을 붓고 끓여주세요"
    );

    let summary = std::fs::read_to_string(&summary).unwrap();
    assert!(summary.contains("- **Config Hash**: testhash"));
    assert!(summary.contains("| Harvested | 3 |"));
}

#[tokio::test]
async fn test_target_truncates_links_and_stops_early() {
    let server = MockServer::start().await;
    mount_listing(&server, &[&[1, 2, 3, 4, 5]]).await;
    for id in 1..=5 {
        mount_detail(&server, id, good_recipe(id)).await;
    }

    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("recipes.csv");
    let config = test_config(&listing_url(&server), 3, dataset.to_str().unwrap());

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.pagination_stop, PaginationStop::TargetReached);
    assert_eq!(report.links_collected, 3);
    assert_eq!(report.links_processed, 3);
    assert_eq!(report.success_count, 3);
    assert_eq!(report.harvest_stop, HarvestStop::TargetReached);

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert!(!requested.contains(&"/recipe/4".to_string()));
    assert!(!requested.contains(&"/recipe/5".to_string()));
}

#[tokio::test]
async fn test_no_links_is_an_error() {
    let server = MockServer::start().await;
    mount_listing(&server, &[&[]]).await;

    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("recipes.csv");
    let config = test_config(&listing_url(&server), 5, dataset.to_str().unwrap());

    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(result, Err(HarvestError::NoLinks { .. })));
    assert!(!dataset.exists());
}

#[tokio::test]
async fn test_no_records_is_an_error() {
    let server = MockServer::start().await;
    mount_listing(&server, &[&[1, 2]]).await;
    Mock::given(method("GET"))
        .and(path("/recipe/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_detail(&server, 2, incomplete_html("Only a title")).await;

    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("recipes.csv");
    let config = test_config(&listing_url(&server), 5, dataset.to_str().unwrap());

    let result = Coordinator::new(config).unwrap().run().await;

    match result {
        Err(HarvestError::NoRecords { attempted }) => assert_eq!(attempted, 2),
        other => panic!("expected NoRecords, got {:?}", other),
    }
    assert!(!dataset.exists());
}

#[tokio::test]
async fn test_failed_detail_pages_are_skipped() {
    let server = MockServer::start().await;
    mount_listing(&server, &[&[1, 2, 3]]).await;
    mount_detail(&server, 1, good_recipe(1)).await;
    Mock::given(method("GET"))
        .and(path("/recipe/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_detail(&server, 3, good_recipe(3)).await;

    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("recipes.csv");
    let config = test_config(&listing_url(&server), 10, dataset.to_str().unwrap());

    let report = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.success_count, 2);
    assert_eq!(report.transport_skips, 1);
    assert_eq!(report.incomplete_skips, 0);

    let rows = csv::Reader::from_path(&dataset).unwrap().records().count();
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn test_unwritable_dataset_is_an_output_error() {
    let server = MockServer::start().await;
    mount_listing(&server, &[&[1]]).await;
    mount_detail(&server, 1, good_recipe(1)).await;

    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "plain file").unwrap();
    let dataset = blocker.join("recipes.csv");
    let config = test_config(&listing_url(&server), 1, dataset.to_str().unwrap());

    let result = Coordinator::new(config).unwrap().run().await;

    assert!(
        matches!(result, Err(HarvestError::Output(OutputError::Io(_)))),
        "got {:?}",
        result
    );
}

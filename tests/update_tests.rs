//! Update flow against a mock server standing in for Goatbots and Scryfall.

use mtgogetter::fetch_log::{self, FetchLog};
use mtgogetter::update::{update_all, Endpoints, UpdateReport, SCRYFALL_BULK_FILENAME};
use mtgogetter::{ArchiveFetcher, GetterError, DEFAULT_TIMEOUT};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

fn zip_bytes(name: &str, contents: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer.start_file(name, SimpleFileOptions::default()).unwrap();
    writer.write_all(contents.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

fn bulk_json() -> serde_json::Value {
    serde_json::json!([
        {
            "mtgo_id": 12345,
            "mtgo_foil_id": 12346,
            "name": "Black Lotus",
            "released_at": "1993-08-05",
            "rarity": "rare",
            "prices": { "usd": null, "tix": "0.42" }
        }
    ])
}

/// Every download is expected exactly once; the bulk info lookup runs on
/// every update
async fn mount_all(server: &MockServer, bulk_info_calls: u64) {
    let get = |route: &'static str, body: ResponseTemplate| {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(body)
            .expect(1)
    };

    get(
        "/sets",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "name": "Long Past", "released_at": "2001-01-01", "mtgo_code": "lpt" },
                { "name": "Far Future", "released_at": "2099-06-01", "mtgo_code": "fft" }
            ]
        })),
    )
    .mount(server)
    .await;

    Mock::given(method("GET"))
        .and(path("/bulk-data/default-cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "updated_at": "2023-10-22T09:02:37Z",
            "download_uri": format!("{}/default-cards.json", server.uri())
        })))
        .expect(bulk_info_calls)
        .mount(server)
        .await;

    get(
        "/default-cards.json",
        ResponseTemplate::new(200).set_body_json(bulk_json()),
    )
    .mount(server)
    .await;

    get(
        "/card-definitions.zip",
        ResponseTemplate::new(200)
            .set_body_bytes(zip_bytes("card-definitions.json", r#"{"12345":{}}"#)),
    )
    .mount(server)
    .await;

    get(
        "/price-history.zip",
        ResponseTemplate::new(200)
            .set_body_bytes(zip_bytes("price-history-2024-01-02.txt", r#"{"12345":0.42}"#)),
    )
    .mount(server)
    .await;
}

fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints {
        price_history: format!("{}/price-history.zip", server.uri()),
        card_definitions: format!("{}/card-definitions.zip", server.uri()),
        scryfall_bulk_info: format!("{}/bulk-data/default-cards", server.uri()),
        scryfall_sets: format!("{}/sets", server.uri()),
    }
}

async fn run_update(save_dir: PathBuf, endpoints: Endpoints) -> Result<UpdateReport, GetterError> {
    tokio::task::spawn_blocking(move || {
        let fetcher = ArchiveFetcher::new(DEFAULT_TIMEOUT)?;
        update_all(&save_dir, &fetcher, &endpoints)
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn first_run_fetches_everything() {
    let server = MockServer::start().await;
    mount_all(&server, 1).await;
    let temp_dir = TempDir::new().unwrap();
    let save_dir = temp_dir.path().join("data");

    let report = run_update(save_dir.clone(), endpoints(&server)).await.unwrap();

    assert!(report.scryfall_bulk_fetched);
    assert!(report.card_definitions_fetched);
    assert!(report.prices_fetched);
    assert_eq!(report.files.len(), 3);
    assert_eq!(report.next_released_set.mtgo_code.as_deref(), Some("fft"));
    assert!(save_dir.join(SCRYFALL_BULK_FILENAME).is_file());
    assert!(save_dir.join("card-definitions.json").is_file());
    assert!(save_dir.join("price-history-2024-01-02.txt").is_file());

    let log = FetchLog::load(&save_dir.join(fetch_log::FILENAME)).unwrap();
    assert!(log.goatbots().prices_updated_at.is_some());
    assert!(log.goatbots().card_definitions_updated_at.is_some());
    assert!(log.scryfall().bulk_data_updated_at.is_some());
    server.verify().await;
}

#[tokio::test]
async fn second_run_skips_up_to_date_sources() {
    let server = MockServer::start().await;
    mount_all(&server, 2).await;
    let temp_dir = TempDir::new().unwrap();
    let save_dir = temp_dir.path().to_path_buf();

    run_update(save_dir.clone(), endpoints(&server)).await.unwrap();
    let second = run_update(save_dir.clone(), endpoints(&server)).await.unwrap();

    assert!(!second.fetched_anything());
    assert!(second.files.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn bad_bulk_data_is_not_saved_or_logged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bulk-data/default-cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "updated_at": "2023-10-22T09:02:37Z",
            "download_uri": format!("{}/default-cards.json", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/default-cards.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[{\"name\": 1}]"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/card-definitions.zip"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let save_dir = temp_dir.path().to_path_buf();

    let result = run_update(save_dir.clone(), endpoints(&server)).await;

    assert!(matches!(result, Err(GetterError::Parse(_))));
    assert!(!save_dir.join(SCRYFALL_BULK_FILENAME).exists());
    let log = FetchLog::load(&save_dir.join(fetch_log::FILENAME)).unwrap();
    assert_eq!(log.scryfall().bulk_data_updated_at, None);
    server.verify().await;
}

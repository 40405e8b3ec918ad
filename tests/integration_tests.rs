use alliance_report::adapters::csv_publisher::{CsvPublisher, BUNDLE_FILE_NAME};
use alliance_report::adapters::sheets::SheetsPublisher;
use alliance_report::adapters::source::ApiRecordSource;
use alliance_report::adapters::{publisher_from_config, source_from_config};
use alliance_report::utils::validation::Validate;
use alliance_report::{
    EtlEngine, LocalStorage, ReportConfig, ReportError, ReportPipeline, TeamCatalog,
};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn roster() -> serde_json::Value {
    json!([
        {"id": "ULTRON", "player": "zed", "power": 300, "level": 70},
        {"id": "shuri", "player": "zed", "power": 200, "level": 70},
        {"id": "ultron", "player": "amy", "power": 100, "level": 65},
        {"id": "Minn-Erva", "player": "amy", "power": 100, "level": 65},
        {"id": "groot", "player": "kim", "power": 999, "level": 75}
    ])
}

#[tokio::test]
async fn test_end_to_end_api_to_sheets() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/alliance/abc/characters")
            .header("api-key", "key-1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(roster());
    });

    // U7: MAWTRON, SYMTECH, TECHWING, ANGELTRON
    // zed: 300, 200, 500, 500 -> 1500 / 4 = 375
    // amy: 200, 0, 200, 200   ->  600 / 4 = 150
    // kim: nothing matches    ->    0
    let sheets_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/v4/spreadsheets/sheet-xyz/values/U7!A1:F4")
            .query_param("valueInputOption", "RAW")
            .header("authorization", "Bearer tok")
            .json_body(json!({
                "range": "U7!A1:F4",
                "majorDimension": "ROWS",
                "values": [
                    ["Owner", "MAWTRON", "SYMTECH", "TECHWING", "ANGELTRON", "Average"],
                    ["zed", 300, 200, 500, 500, 375],
                    ["amy", 200, 0, 200, 200, 150],
                    ["kim", 0, 0, 0, 0, 0]
                ]
            }));
        then.status(200).json_body(json!({"updatedRows": 4}));
    });

    let catalog = TeamCatalog::builtin().select(&["U7".to_string()]).unwrap();
    let source = ApiRecordSource::new(server.url("/rest/v1/alliance/abc/characters"))
        .with_header("api-key", "key-1");
    let publisher = SheetsPublisher::new("sheet-xyz", "tok").with_base_url(server.base_url());

    let engine = EtlEngine::new(ReportPipeline::new(source, publisher, catalog));
    let summary = engine.run().await.unwrap();

    api_mock.assert();
    sheets_mock.assert();
    assert_eq!(summary.published, vec!["U7"]);
    assert_eq!(summary.location.as_deref(), Some("spreadsheet sheet-xyz"));
}

#[tokio::test]
async fn test_end_to_end_from_config_to_csv_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let snapshot = temp_dir.path().join("roster.json");
    std::fs::write(&snapshot, serde_json::to_vec(&roster()).unwrap()).unwrap();

    let config_content = format!(
        r#"
[report]
name = "weekly"

[source]
type = "file"
endpoint = "{}/roster.json"

[publish]
type = "csv"
output_path = "{}/out"
bundle = true
"#,
        base, base
    );
    let config = ReportConfig::from_toml_str(&config_content).unwrap();
    config.validate().unwrap();

    let pipeline = ReportPipeline::new(
        source_from_config(&config),
        publisher_from_config(&config, false).unwrap(),
        config.catalog().unwrap(),
    );
    let summary = EtlEngine::new(pipeline).run().await.unwrap();

    assert_eq!(summary.published, vec!["Offense", "Defense", "Flex", "U7"]);
    let zip_path = temp_dir.path().join("out").join(BUNDLE_FILE_NAME);
    assert!(zip_path.exists());

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 5);

    let mut flex = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("Flex.csv").unwrap(), &mut flex).unwrap();
    let lines: Vec<&str> = flex.lines().collect();
    assert_eq!(lines[0], "Owner,AIM,DEF,GOG,WAK,Average");
    // groot is on GOG: 999 / 4 = 249
    assert_eq!(lines[1], "kim,0,0,999,0,249");
    assert_eq!(lines[2], "zed,0,0,0,200,50");
    assert_eq!(lines[3], "amy,0,0,0,0,0");
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn test_partial_publish_keeps_going() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/characters");
        then.status(200).json_body(roster());
    });
    let rejected = server.mock(|when, then| {
        when.method(PUT).path_contains("/values/Offense");
        then.status(500).body("quota exceeded");
    });
    let accepted = server.mock(|when, then| {
        when.method(PUT).path_contains("/values/Flex");
        then.status(200);
    });

    let catalog = TeamCatalog::builtin()
        .select(&["Offense".to_string(), "Flex".to_string()])
        .unwrap();
    let source = ApiRecordSource::new(server.url("/characters"));
    let publisher = SheetsPublisher::new("sheet-xyz", "tok").with_base_url(server.base_url());

    let err = EtlEngine::new(ReportPipeline::new(source, publisher, catalog))
        .run()
        .await
        .unwrap_err();

    rejected.assert();
    accepted.assert();
    assert!(matches!(
        err,
        ReportError::PartialPublishError { failed: 1, total: 2 }
    ));
}

#[tokio::test]
async fn test_malformed_roster_fails_before_publishing() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/characters");
        then.status(200)
            .json_body(json!([{"id": "thor", "player": "amy", "power": "lots"}]));
    });
    let sheets = server.mock(|when, then| {
        when.method(PUT);
        then.status(200);
    });

    let source = ApiRecordSource::new(server.url("/characters"));
    let publisher = SheetsPublisher::new("sheet-xyz", "tok").with_base_url(server.base_url());

    let err = EtlEngine::new(ReportPipeline::new(source, publisher, TeamCatalog::builtin()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::MalformedRecordError { index: 0, .. }));
    sheets.assert_hits(0);
}

#[tokio::test]
async fn test_csv_files_without_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/characters");
        then.status(200).json_body(roster());
    });

    let catalog = TeamCatalog::builtin().select(&["Defense".to_string()]).unwrap();
    let source = ApiRecordSource::new(server.url("/characters"));
    let publisher = CsvPublisher::new(LocalStorage::new(output_path.clone()), false);

    let summary = EtlEngine::new(ReportPipeline::new(source, publisher, catalog))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.published, vec!["Defense"]);
    assert!(summary.location.is_none());

    let defense = std::fs::read_to_string(temp_dir.path().join("Defense.csv")).unwrap();
    let lines: Vec<&str> = defense.lines().collect();
    assert_eq!(lines[0], "Owner,ASG,HY,MAR,MERC,SHC,AVG,BRAWL,S6,Average");
    // nobody owns a defense character: ties keep owner order
    assert_eq!(lines[1], "amy,0,0,0,0,0,0,0,0,0");
    assert_eq!(lines[2], "kim,0,0,0,0,0,0,0,0,0");
    assert_eq!(lines[3], "zed,0,0,0,0,0,0,0,0,0");
}

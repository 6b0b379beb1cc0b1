//! Sheets Client Tests
//!
//! Run the client against a local mock of the values API: header zipping,
//! row padding, and the one-tab-fails-others-survive contract of a full
//! fetch.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::importer::build_knowledge;
use crate::sheets::{rows_to_records, SheetsClient};

fn values(grid: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "values": grid }))
}

#[test]
fn test_rows_to_records_padding() {
    let grid = vec![
        vec![json!("Nombre"), json!("Descripcion"), json!("Lugar")],
        vec![json!("Credencial"), json!("Ventanilla 2"), json!("Edificio A")],
        // Short row: missing cells pad out as empty strings.
        vec![json!("Constancia")],
        // Long row: the extra cell is dropped.
        vec![json!("Titulo"), json!("d"), json!("l"), json!("extra")],
    ];

    let records = rows_to_records(grid);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["Nombre"], json!("Credencial"));
    assert_eq!(records[1]["Descripcion"], json!(""));
    assert_eq!(records[1]["Lugar"], json!(""));
    assert_eq!(records[2].len(), 3);
}

#[test]
fn test_rows_to_records_empty_grid() {
    assert!(rows_to_records(Vec::new()).is_empty());
    // Header only, no data rows.
    assert!(rows_to_records(vec![vec![json!("Nombre")]]).is_empty());
}

#[tokio::test]
async fn test_read_tab_sends_key_and_parses_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sheet-1/values/Horarios"))
        .and(query_param("key", "test-key"))
        .respond_with(values(json!([
            ["Servicio", "Dias", "Hora_Inicio", "Hora_Fin"],
            ["Biblioteca", "Lunes a Viernes", "08:00", "20:00"],
        ])))
        .mount(&server)
        .await;

    let client = SheetsClient::with_base_url(&server.uri(), "sheet-1", "test-key").unwrap();
    let rows = client.read_tab("Horarios").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Servicio"], json!("Biblioteca"));
}

#[tokio::test]
async fn test_fetch_all_tolerates_failing_tab() {
    let server = MockServer::start().await;
    // Only two tabs exist; the other four answer 404 and import as empty.
    Mock::given(method("GET"))
        .and(path("/sheet-1/values/Horarios"))
        .respond_with(values(json!([
            ["Servicio", "Dias"],
            ["Biblioteca", "Lunes a Viernes"],
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sheet-1/values/Carreras"))
        .respond_with(values(json!([
            ["Nombre", "Duracion_Semestres"],
            ["Sistemas", "8"],
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = SheetsClient::with_base_url(&server.uri(), "sheet-1", "k").unwrap();
    let rows = client.fetch_all().await;

    assert_eq!(rows.schedules.len(), 1);
    assert_eq!(rows.majors.len(), 1);
    assert!(rows.events.is_empty());
    assert!(rows.suspensions.is_empty());

    // The partial fetch still builds a usable base.
    let kb = build_knowledge(&rows);
    assert!(kb.find_schedule("biblioteca").is_some());
    assert!(kb.find_major("sistemas").is_some());
}

#[tokio::test]
async fn test_empty_tab_body() {
    let server = MockServer::start().await;
    // The values API omits "values" entirely for a blank tab.
    Mock::given(method("GET"))
        .and(path("/sheet-1/values/Eventos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = SheetsClient::with_base_url(&server.uri(), "sheet-1", "k").unwrap();
    let rows = client.read_tab("Eventos").await.unwrap();
    assert!(rows.is_empty());
}

//! Spreadsheet loading against a mock export endpoint.

use signoff_runtime::acquisition::{load_input_table, load_input_table_from, HttpClient, TableOrigin};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CSV: &str = "\u{feff}Company,Document type,Owner\n\
BHA Strategy,https://betterproposals.io/2/proposals/view/?id=1,Dana\n\
Integrity Design,https://betterproposals.io/2/proposals/view/?id=2,\n";

#[tokio::test]
async fn share_link_is_rewritten_to_csv_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/abc123/export"))
        .and(query_param("format", "csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv; charset=utf-8")
                .set_body_string(CSV),
        )
        .expect(1)
        .mount(&server)
        .await;

    let share = format!("{}/spreadsheets/d/abc123/edit?usp=sharing", server.uri());
    let (table, origin) = load_input_table(&HttpClient::new(5_000), Some(&share)).await;

    assert_eq!(
        origin,
        TableOrigin::Export(format!("{}/spreadsheets/d/abc123/export?format=csv", server.uri()))
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.headers[0], "Company");
    assert_eq!(table.cell(1, 0), Some("Integrity Design"));
    assert_eq!(table.cell(1, 2), Some(""));
}

#[tokio::test]
async fn failed_primary_export_retries_by_sheet_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/share/d/abc123/view/export"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/abc123/export"))
        .and(query_param("format", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CSV))
        .expect(1)
        .mount(&server)
        .await;

    let share = format!("{}/share/d/abc123/view", server.uri());
    let (table, origin) =
        load_input_table_from(&HttpClient::new(5_000), Some(&share), &server.uri()).await;

    assert_eq!(
        origin,
        TableOrigin::ExportById(format!("{}/spreadsheets/d/abc123/export?format=csv", server.uri()))
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.cell(0, 0), Some("BHA Strategy"));
}

#[tokio::test]
async fn login_page_instead_of_csv_falls_back_to_sample() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<!DOCTYPE html><html><body>Sign in</body></html>"),
        )
        .mount(&server)
        .await;

    let share = format!("{}/sheet/edit", server.uri());
    let (table, origin) = load_input_table(&HttpClient::new(5_000), Some(&share)).await;

    assert_eq!(origin, TableOrigin::Sample);
    assert_eq!(table.len(), 3);
}

#[tokio::test]
async fn not_found_falls_back_to_sample() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let share = format!("{}/sheet/edit", server.uri());
    let (_, origin) = load_input_table(&HttpClient::new(5_000), Some(&share)).await;
    assert_eq!(origin, TableOrigin::Sample);
}

#[tokio::test]
async fn no_sheet_url_uses_sample() {
    let (table, origin) = load_input_table(&HttpClient::new(5_000), None).await;
    assert_eq!(origin, TableOrigin::Sample);
    assert_eq!(table.cell(0, 0), Some("BHA Strategy"));
}

//! End-to-end tests for the `fetch` command against a wiremock API

use calamine::{DataType, Reader, open_workbook_auto};
use camino::Utf8PathBuf;
use get_documents::Host;
use get_documents::export::SHEET_NAME;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

async fn mock_project(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/projects/p1/documents"))
        .and(query_param("state", "extracted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "d1" }, { "id": "d2" }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/p1/documents/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "d1",
            "fileName": "a.pdf",
            "state": "extracted",
            "entities": {
                "number": { "value": "INV-1" },
                "totals": { "net": { "value": 100 }, "gross": { "value": 119 } }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/p1/documents/d2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "d2",
            "fileName": "b.pdf",
            "state": "extracted",
            "entities": {
                "number": { "value": "INV-2" },
                "sender": { "name": { "value": "ACME, Inc." } }
            }
        })))
        .mount(server)
        .await;
}

fn fetch_args<'a>(base_url: &'a str, output: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "get-documents",
        "fetch",
        "--project-id",
        "p1",
        "--username",
        "alice",
        "--password",
        "secret",
        "--base-url",
        base_url,
        "--state",
        "extracted",
        "--metadata",
        "id,fileName,state",
        "--entity",
        "number,totals,sender",
        "--color",
        "never",
        "--output",
        output,
    ];
    args.extend_from_slice(extra);
    args
}

fn read_sheet(path: &Utf8PathBuf) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range(SHEET_NAME).unwrap();
    range
        .rows()
        .map(|row| row.iter().map(|c| c.as_string().unwrap_or_default()).collect())
        .collect()
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_fetch_writes_one_row_per_document() {
    let server = MockServer::start().await;
    mock_project(&server).await;
    let base_url = format!("{}/v1", server.uri());

    let tmp = tempfile::tempdir().unwrap();
    let output = Utf8PathBuf::try_from(tmp.path().join("p1_documents.xlsx")).unwrap();
    let csv = Utf8PathBuf::try_from(tmp.path().join("p1_documents.csv")).unwrap();

    let mut host = TestHost::new();
    get_documents::run(&mut host, fetch_args(&base_url, output.as_str(), &["--csv", csv.as_str()]))
        .await
        .unwrap();

    assert_eq!(host.exit_code, None);
    assert!(host.output_str().contains("Fetched 2 document(s)"), "{}", host.output_str());

    let rows = read_sheet(&output);
    assert_eq!(
        rows[0],
        [
            "id",
            "fileName",
            "state",
            "number_value",
            "totals_net_value",
            "totals_gross_value",
            "sender_name_value"
        ]
    );
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][0], "d1");
    assert_eq!(rows[1][3], "INV-1");
    assert_eq!(rows[1][6], "");
    assert_eq!(rows[2][0], "d2");
    assert_eq!(rows[2][4], "");
    assert_eq!(rows[2][6], "ACME, Inc.");

    let csv_text = std::fs::read_to_string(&csv).unwrap();
    let mut lines = csv_text.lines();
    assert_eq!(
        lines.next(),
        Some("id,fileName,state,number_value,totals_net_value,totals_gross_value,sender_name_value")
    );
    assert_eq!(lines.next(), Some("d1,a.pdf,extracted,INV-1,100,119,"));
    assert_eq!(lines.next(), Some("d2,b.pdf,extracted,INV-2,,,\"ACME, Inc.\""));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_fetch_with_no_matching_documents_writes_empty_sheet() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/projects/p1/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    let base_url = format!("{}/v1", server.uri());

    let tmp = tempfile::tempdir().unwrap();
    let output = Utf8PathBuf::try_from(tmp.path().join("empty.xlsx")).unwrap();

    let mut host = TestHost::new();
    get_documents::run(&mut host, fetch_args(&base_url, output.as_str(), &[]))
        .await
        .unwrap();

    assert!(output.exists());
    assert!(host.output_str().contains("Fetched 0 document(s)"));
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_fetch_failure_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/projects/p1/documents"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let base_url = format!("{}/v1", server.uri());

    let tmp = tempfile::tempdir().unwrap();
    let output = Utf8PathBuf::try_from(tmp.path().join("never.xlsx")).unwrap();

    let mut host = TestHost::new();
    let result = get_documents::run(&mut host, fetch_args(&base_url, output.as_str(), &[])).await;

    assert!(result.is_err());
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("Error fetching data: authentication failed"), "{}", host.error_str());
    assert!(!output.exists());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_unwritable_output_is_reported() {
    let server = MockServer::start().await;
    mock_project(&server).await;
    let base_url = format!("{}/v1", server.uri());

    let tmp = tempfile::tempdir().unwrap();
    let output = Utf8PathBuf::try_from(tmp.path().join("missing-dir").join("out.xlsx")).unwrap();

    let mut host = TestHost::new();
    let result = get_documents::run(&mut host, fetch_args(&base_url, output.as_str(), &[])).await;

    assert!(result.is_err());
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("Error writing output"), "{}", host.error_str());
    assert!(host.output_str().is_empty());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_failed_csv_leaves_no_spreadsheet() {
    let server = MockServer::start().await;
    mock_project(&server).await;
    let base_url = format!("{}/v1", server.uri());

    let tmp = tempfile::tempdir().unwrap();
    let output = Utf8PathBuf::try_from(tmp.path().join("out.xlsx")).unwrap();
    let csv = Utf8PathBuf::try_from(tmp.path().join("missing-dir").join("out.csv")).unwrap();

    let mut host = TestHost::new();
    let result = get_documents::run(&mut host, fetch_args(&base_url, output.as_str(), &["--csv", csv.as_str()])).await;

    assert!(result.is_err());
    assert_eq!(host.exit_code, Some(1));
    assert!(!output.exists());
}

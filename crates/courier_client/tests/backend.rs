use std::sync::{Arc, Mutex};
use std::time::Duration;

use courier_client::{
    Backend, ClientEvent, HttpBackend, ProgressSink, RequestError, RequestProgress,
    RequestSettings, Stage,
};
use wiremock::matchers::{body_string_contains, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test]
async fn compile_posts_multipart_file_and_returns_html() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compile-gui"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"page.gui\""))
        .and(body_string_contains("header btn-active"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>compiled</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let sink = TestSink::new();

    let body = backend
        .compile_gui(
            1,
            &server.uri(),
            "page.gui",
            b"header btn-active".to_vec(),
            &sink,
        )
        .await
        .expect("compile ok");
    assert_eq!(body, b"<html>compiled</html>");

    let downloading = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            ClientEvent::Progress(RequestProgress { stage, .. }) => Some(stage),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert!(downloading.contains(&Stage::Downloading));
}

#[tokio::test]
async fn compile_surfaces_plain_text_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compile-gui"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("Parsing Error while compiling GUI tokens"),
        )
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let sink = TestSink::new();

    let err = backend
        .compile_gui(1, &server.uri(), "page.gui", b"bad".to_vec(), &sink)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RequestError::Http {
            code: 500,
            detail: "Parsing Error while compiling GUI tokens".to_string(),
        }
    );
}

#[tokio::test]
async fn compile_surfaces_json_detail_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compile-gui"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            r#"{"detail": "Only .gui files are accepted for now"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let sink = TestSink::new();

    let err = backend
        .compile_gui(1, &server.uri(), "notes.txt", b"x".to_vec(), &sink)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RequestError::Http {
            code: 400,
            detail: "Only .gui files are accepted for now".to_string(),
        }
    );
}

#[tokio::test]
async fn health_reports_code_and_service_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"status": "ok"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let (code, status) = backend.health(&server.uri()).await.expect("health ok");
    assert_eq!(code, 200);
    assert_eq!(status.as_deref(), Some("ok"));
}

#[tokio::test]
async fn health_tolerates_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("imok"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let (code, status) = backend.health(&server.uri()).await.expect("health ok");
    assert_eq!(code, 200);
    assert_eq!(status, None);
}

#[tokio::test]
async fn health_failure_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let err = backend.health(&server.uri()).await.unwrap_err();
    match err {
        RequestError::Http { code, .. } => assert_eq!(code, 503),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn fetch_site_passes_target_as_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fetch-url"))
        .and(query_param("url", "https://example.com/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>site</html>", "text/html"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let sink = TestSink::new();
    let body = backend
        .fetch_site(2, &server.uri(), "https://example.com/page", &sink)
        .await
        .expect("fetch ok");
    assert_eq!(body, b"<html>site</html>");
}

#[tokio::test]
async fn analyze_returns_the_json_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analyze-url"))
        .and(query_param("url", "https://example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"title": "Example", "links": 3}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let value = backend
        .analyze_site(&server.uri(), "https://example.com")
        .await
        .expect("analyze ok");
    assert_eq!(value["title"], "Example");
    assert_eq!(value["links"], 3);
}

#[tokio::test]
async fn analyze_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analyze-url"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let err = backend
        .analyze_site(&server.uri(), "https://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::MalformedResponse(_)));
}

#[tokio::test]
async fn image_to_gui_sets_ocr_flag_and_parses_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/image-to-gui"))
        .and(query_param("ocr", "1"))
        .and(body_string_contains("filename=\"mockup.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"html": "<p>x</p>", "gui": "text x", "ocr_used": true}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let generated = backend
        .image_to_gui(&server.uri(), "mockup.png", b"\x89PNG".to_vec(), true)
        .await
        .expect("generate ok");
    assert_eq!(generated.html, "<p>x</p>");
    assert_eq!(generated.gui, "text x");
    assert!(generated.ocr_used);
}

#[tokio::test]
async fn image_to_gui_omits_ocr_flag_when_toggle_is_off() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/image-to-gui"))
        .and(query_param_is_missing("ocr"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"html": "<p>x</p>", "gui": "text x", "ocr_used": false}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(RequestSettings::default()).unwrap();
    let generated = backend
        .image_to_gui(&server.uri(), "mockup.png", b"\x89PNG".to_vec(), false)
        .await
        .expect("generate ok");
    assert!(!generated.ocr_used);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fetch-url"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = RequestSettings {
        max_response_bytes: 10,
        ..RequestSettings::default()
    };
    let backend = HttpBackend::new(settings).unwrap();
    let sink = TestSink::new();
    let err = backend
        .fetch_site(3, &server.uri(), "https://example.com", &sink)
        .await
        .unwrap_err();
    assert_eq!(err, RequestError::TooLarge { max_bytes: 10 });
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = RequestSettings {
        request_timeout: Duration::from_millis(50),
        ..RequestSettings::default()
    };
    let backend = HttpBackend::new(settings).unwrap();
    let err = backend.health(&server.uri()).await.unwrap_err();
    assert!(matches!(err, RequestError::Timeout(_)));
}

//! End-to-end tests through the public API.
//!
//! The scenario tests serve canned JSON from a throwaway local HTTP server so
//! the real reqwest backend and decoders are exercised. Tests against a live
//! backend are marked with `#[ignore]`.
//!
//! Run with: `SEARCHBOX_BASE_URL=http://localhost:8080 cargo test --test integration -- --ignored`

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use searchbox::pagination::ControlKind;
use searchbox::render::ResultsBody;
use searchbox::suggestion::Key;
use searchbox::view::Status;
use searchbox::{
    Controller, ControllerConfig, HttpBackend, QueryRequest, SearchBackend, SearchEndpoint,
};

/// Canned response: status code and body, keyed by path and `q`.
type Routes = HashMap<(String, String), (u16, String)>;

/// Serves `routes` on an ephemeral port and records request targets.
async fn serve(routes: Routes) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let head = String::from_utf8_lossy(&buf[..n]).to_string();
            let target = head
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/")
                .to_string();
            log.lock().unwrap().push(target.clone());

            let url = url::Url::parse(&format!("http://local{}", target)).unwrap();
            let q = url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            let (status, body) = routes
                .get(&(url.path().to_string(), q))
                .cloned()
                .unwrap_or((404, "not found".to_string()));

            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", addr), seen)
}

fn route(path: &str, q: &str, status: u16, body: &str) -> ((String, String), (u16, String)) {
    ((path.to_string(), q.to_string()), (status, body.to_string()))
}

fn hits_json(n: usize) -> String {
    let hits: Vec<String> = (0..n)
        .map(|i| format!(r#"{{"title":"Result {i}","url":"https://{i}.example","score":{i}.5}}"#))
        .collect();
    hits.join(",")
}

mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_autocomplete_suffix_scenario() {
        let (base, _) = serve(Routes::from([route(
            "/autocomplete",
            "cat",
            200,
            r#"{"time_taken":"1ms","results":[{"title":"Catalog","url":"u","suffix":"alog"}]}"#,
        )]))
        .await;

        let config = ControllerConfig::default().with_base_url(base);
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.set_input("cat");
        controller.request_suggestions("cat").await;

        assert_eq!(controller.suggestions().items(), ["catalog"]);
    }

    #[tokio::test]
    async fn test_typo_scenario_with_correction_and_pagination() {
        let teh = format!(
            r#"{{"time_taken":"4ms","total_hits":23,"results":[{}],"problem":"Did you mean:","suggestions":["the"]}}"#,
            hits_json(10)
        );
        let the = format!(r#"{{"time_taken":"2ms","total_hits":5,"results":[{}]}}"#, hits_json(5));
        let (base, seen) = serve(Routes::from([
            route("/search", "teh", 200, &teh),
            route("/search", "the", 200, &the),
        ]))
        .await;

        let config = ControllerConfig::default().with_base_url(base);
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.set_input("teh");
        controller.key_down(Key::Enter).await;

        let Status::Summary { line, correction } = &controller.view().status else {
            panic!("Expected summary, got {:?}", controller.view().status);
        };
        assert!(line.starts_with("23 "));
        assert_eq!(correction.as_ref().unwrap().text, "the");
        let pages: Vec<u32> = controller
            .view()
            .pagination
            .iter()
            .filter(|c| c.kind == ControlKind::Page)
            .map(|c| c.target)
            .collect();
        assert_eq!(pages, vec![1, 2, 3]);
        assert_eq!(controller.view().active_page(), Some(1));

        controller.accept_correction().await;
        assert_eq!(controller.view().input, "the");
        assert!(controller.view().pagination.is_empty());

        let targets = seen.lock().unwrap().clone();
        assert_eq!(targets[0], "/search?q=teh&page=1&size=10");
        assert_eq!(targets[1], "/search?q=the&page=1&size=10");
    }

    #[tokio::test]
    async fn test_second_page_scenario() {
        let body = format!(r#"{{"time_taken":"3ms","total_hits":23,"results":[{}]}}"#, hits_json(10));
        let (base, seen) = serve(Routes::from([route("/search", "rust", 200, &body)])).await;

        let config = ControllerConfig::default().with_base_url(base);
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.set_input("rust");
        controller.submit("rust", 1).await;

        let index = controller
            .view()
            .find_control(ControlKind::Page, Some(2))
            .unwrap();
        controller.go_to_control(index).await;

        assert_eq!(controller.query().page, 2);
        assert_eq!(controller.query().text, "rust");
        assert_eq!(controller.view().active_page(), Some(2));
        let prev = controller.view().pagination.first().unwrap();
        let next = controller.view().pagination.last().unwrap();
        assert!(!prev.disabled);
        assert!(!next.disabled);
        assert_eq!(
            seen.lock().unwrap().last().unwrap(),
            "/search?q=rust&page=2&size=10"
        );
    }

    #[tokio::test]
    async fn test_correction_endpoint_shape() {
        let body = r#"{
            "time_taken": "9ms",
            "correction": "guitar",
            "results": {"total": {"value": 1}, "hits": [
                {"_source": {"Title": "Guitar shop", "URL": "https://g.example", "Body": "raw"},
                 "highlight": {"body": ["cheap <em>guitar</em>"]}}
            ]}
        }"#;
        let (base, _) = serve(Routes::from([route("/correction", "gitar", 200, body)])).await;

        let config = ControllerConfig::default()
            .with_base_url(base)
            .with_endpoint(SearchEndpoint::Correction);
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.set_input("gitar");
        controller.submit("gitar", 1).await;

        assert_eq!(controller.view().correction().unwrap().text, "guitar");
        let Some(ResultsBody::Cards(cards)) = &controller.view().results else {
            panic!("Expected cards");
        };
        assert_eq!(cards[0].title, "Guitar shop");
        assert_eq!(cards[0].snippet.as_deref(), Some("cheap guitar"));
        assert!(controller.view().pagination.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_shows_status_message() {
        let (base, _) = serve(Routes::from([route("/search", "boom", 500, "oops")])).await;

        let config = ControllerConfig::default().with_base_url(base);
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.submit("boom", 1).await;

        assert!(matches!(controller.view().status, Status::Error(_)));
        assert!(controller.view().results.is_none());
    }

    #[tokio::test]
    async fn test_short_prefix_sends_no_autocomplete() {
        let (base, seen) = serve(Routes::from([route("/autocomplete", "a", 200, r#"{"suggestions":["ab"]}"#)])).await;

        let config = ControllerConfig::default().with_base_url(base);
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.set_input("a");
        controller.request_suggestions("a").await;

        assert!(controller.suggestions().items().is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_autocomplete_error_is_silent() {
        let (base, _) = serve(Routes::from([route("/autocomplete", "ca", 200, "not json")])).await;

        let config = ControllerConfig::default().with_base_url(base);
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.render_suggestions(vec!["previous".to_string()]);
        controller.request_suggestions("ca").await;

        assert_eq!(controller.suggestions().items(), ["previous"]);
        assert_eq!(controller.view().status, Status::Empty);
    }

    #[tokio::test]
    async fn test_zero_hits_placeholder() {
        let (base, _) = serve(Routes::from([route(
            "/search",
            "nothing",
            200,
            r#"{"time_taken":"1ms","total_hits":0,"results":null}"#,
        )]))
        .await;

        let config = ControllerConfig::default().with_base_url(base);
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.submit("nothing", 1).await;

        assert!(matches!(
            controller.view().results,
            Some(ResultsBody::NoResults(_))
        ));
        assert!(controller.view().pagination.is_empty());
    }
}

mod live_tests {
    use super::*;

    fn live_config() -> ControllerConfig {
        let base = std::env::var("SEARCHBOX_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        ControllerConfig::default().with_base_url(base)
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_autocomplete() {
        let config = live_config();
        let backend = HttpBackend::new(&config).unwrap();
        match backend.autocomplete(&QueryRequest::new("gu").with_size(5)).await {
            Ok(items) => println!("Autocomplete returned {:?}", items),
            Err(e) => println!("Autocomplete failed: {}", e),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_search() {
        let config = live_config();
        let mut controller = Controller::new(HttpBackend::new(&config).unwrap(), config);
        controller.set_input("guitar");
        controller.submit("guitar", 1).await;
        println!("Status: {:?}", controller.view().status);
        assert!(!matches!(controller.view().status, Status::Searching(_)));
    }
}

use super::*;
use crate::error::{Error, Result};
use crate::library::{LibraryAction, Track};
use crate::persist::{KeyValueStorage, MemoryStorage};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Answer exactly one HTTP request with `status` and `body`; the join
/// handle yields the raw request (head and body).
fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = v.trim().parse().unwrap();
            }
            request.push_str(&line);
        }
        let mut payload = vec![0; content_length];
        reader.read_exact(&mut payload).unwrap();
        request.push_str(&String::from_utf8(payload).unwrap());

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        request
    });
    (format!("http://{addr}/api"), handle)
}

fn api(base: &str, token: Option<&str>) -> MusicApi {
    MusicApi::new(base, Duration::from_secs(5), token.map(str::to_string)).unwrap()
}

#[test]
fn search_sends_query_and_bearer_token() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"results":[{"id":"1","name":"One More Time","artist_name":"Daft Punk","audio":"https://cdn/1.mp3","duration":320}]}"#,
    );
    let results = api(&base, Some("tok-1")).search("daft punk").unwrap();
    let request = server.join().unwrap().to_ascii_lowercase();

    assert!(request.starts_with("get /api/music/search?query=daft+punk "));
    assert!(request.contains("authorization: bearer tok-1"));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].artist, "Daft Punk");
    assert_eq!(results[0].duration, 320.0);
    assert_eq!(results[0].album, None);
}

#[test]
fn requests_without_token_carry_no_authorization() {
    let (base, server) = serve_once("200 OK", r#"{"results":[]}"#);
    let results = api(&format!("{base}/"), None).popular().unwrap();
    let request = server.join().unwrap().to_ascii_lowercase();

    assert!(request.starts_with("get /api/music/popular "));
    assert!(!request.contains("authorization:"));
    assert!(results.is_empty());
}

#[test]
fn error_status_maps_to_api_error_with_message() {
    let (base, server) = serve_once("401 Unauthorized", r#"{"message":"Invalid credentials"}"#);
    let err = api(&base, None).login("a@b.c", "secret1").unwrap_err();
    let request = server.join().unwrap();

    assert!(request.contains(r#""email":"a@b.c""#));
    assert!(!request.contains("username"));
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn error_without_json_body_uses_status_reason() {
    let (base, server) = serve_once("503 Service Unavailable", "");
    let err = api(&base, None).popular().unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, Error::Api { status: 503, ref message } if message == "Service Unavailable"));
}

#[test]
fn register_stores_the_token_and_uses_it() {
    let (base, server) = serve_once(
        "201 Created",
        r#"{"token":"fresh","user":{"username":"ann","email":"ann@x.io"}}"#,
    );
    let storage = MemoryStorage::new();
    let mut client = api(&base, None);

    let session = register(&mut client, &storage, "ann", "ann@x.io", "hunter22", "hunter22").unwrap();
    let request = server.join().unwrap();

    assert!(request.contains(r#""username":"ann""#));
    assert_eq!(session.token, "fresh");
    assert_eq!(session.user.unwrap().username, "ann");
    assert_eq!(stored_token(&storage).as_deref(), Some("fresh"));

    logout(&mut client, &storage).unwrap();
    assert_eq!(stored_token(&storage), None);
}

#[test]
fn registration_is_validated_before_any_request() {
    let storage = MemoryStorage::new();
    // Nothing listens here; a request would fail with an HTTP error instead.
    let mut client = api("http://127.0.0.1:9", None);

    let err = register(&mut client, &storage, "ann", "ann@x.io", "abcdef", "abcdeg").unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match");

    let err = register(&mut client, &storage, "ann", "ann@x.io", "abc", "abc").unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 6 characters long");

    assert!(validate_registration("", "ann@x.io", "abcdef", "abcdef").is_err());
    assert!(validate_registration("ann", "ann@x.io", "abcdef", "abcdef").is_ok());
    assert!(validate_login(" ", "pw").is_err());
    assert!(validate_login("ann@x.io", "").is_err());
    assert_eq!(stored_token(&storage), None);
}

#[test]
fn unreadable_token_is_ignored() {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "not-json").unwrap();
    assert_eq!(stored_token(&storage), None);
}

struct FakeCatalog {
    fail: bool,
}

impl Catalog for FakeCatalog {
    fn search(&self, query: &str) -> Result<Vec<Track>> {
        if self.fail {
            return Err(Error::Api {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(vec![Track {
            id: query.to_string(),
            name: query.to_string(),
            artist: String::new(),
            album: None,
            artwork: None,
            audio: None,
            duration: 0.0,
        }])
    }

    fn popular(&self) -> Result<Vec<Track>> {
        if self.fail {
            Err(Error::Validation("offline".into()))
        } else {
            Ok(Vec::new())
        }
    }
}

#[test]
fn fetcher_returns_pending_then_reports_outcome() {
    let (fetcher, rx) = Fetcher::new(Arc::new(FakeCatalog { fail: false }));

    assert_eq!(fetcher.search("abba"), LibraryAction::SearchPending);
    match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
        LibraryAction::SearchFulfilled(results) => assert_eq!(results[0].id, "abba"),
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(fetcher.popular(), LibraryAction::PopularPending);
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        LibraryAction::PopularFulfilled(Vec::new())
    );
}

#[test]
fn fetcher_reports_failures_as_rejections() {
    let (fetcher, rx) = Fetcher::new(Arc::new(FakeCatalog { fail: true }));

    fetcher.search("x");
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        LibraryAction::SearchRejected("API error 500: boom".into())
    );
    fetcher.popular();
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        LibraryAction::PopularRejected("offline".into())
    );
}

//! End-to-end submission scenarios over a real listener.

use reqwest::header::{LOCATION, REFERER};
use reqwest::StatusCode;

mod common;
use common::{client, TestServer, SIGNUP_SCHEMA};

fn read_yaml(path: &std::path::Path) -> serde_yaml::Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_yaml::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_signup_writes_file_and_redirects() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;

    let res = client()
        .post(server.url("/signup"))
        .header(REFERER, "http://forms.example/signup.html")
        .form(&[("field.name", "alice")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[LOCATION], "http://forms.example/signup.html");

    let record = read_yaml(&server.output("out/alice.yaml"));
    assert_eq!(record["name"], serde_yaml::Value::from("alice"));
    assert_eq!(record["source"], serde_yaml::Value::from("web"));
    assert!(record["subscribed"].is_null());

    // Default layout: YYYYMMDD.HHMMSS.nnnnnnnnn
    let joined = record["joined_at"].as_str().unwrap();
    let (date, rest) = joined.split_once('.').unwrap();
    let (time, nanos) = rest.split_once('.').unwrap();
    assert_eq!(date.len(), 8);
    assert_eq!(time.len(), 6);
    assert_eq!(nanos.len(), 9);
    assert!(joined.chars().all(|c| c.is_ascii_digit() || c == '.'));

    server.stop().await;
}

#[tokio::test]
async fn test_missing_required_field_rejected_without_file() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;

    let res = client()
        .post(server.url("/signup"))
        .form(&[("field.subscribed", "true")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.text().await.unwrap();
    assert!(body.contains("field.name"), "body: {}", body);
    assert!(!server.output("out").exists());

    server.stop().await;
}

#[tokio::test]
async fn test_every_field_error_reported() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;

    let res = client()
        .post(server.url("/signup"))
        .form(&[("field.subscribed", "notabool")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.text().await.unwrap();
    assert!(body.contains("2 errors occurred"));
    assert!(body.contains("required field field.name not set"));
    assert!(body.contains("field.subscribed"));
    assert!(body.contains("notabool"));

    server.stop().await;
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;

    let res = client()
        .post(server.url("/signin"))
        .form(&[("field.name", "alice")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(std::fs::read_dir(server.root()).unwrap().next().is_none());

    server.stop().await;
}

#[tokio::test]
async fn test_bool_variants_round_trip() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;
    let client = client();

    for (i, (text, expected)) in [("true", true), ("FALSE", false), ("1", true), ("f", false)]
        .into_iter()
        .enumerate()
    {
        let name = format!("user{}", i);
        let res = client
            .post(server.url("/signup"))
            .form(&[("field.name", name.as_str()), ("field.subscribed", text)])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let record = read_yaml(&server.output(&format!("out/{}.yaml", name)));
        assert_eq!(record["subscribed"].as_bool(), Some(expected), "input {:?}", text);
    }

    server.stop().await;
}

#[tokio::test]
async fn test_last_value_wins_and_callback_redirect() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;

    let res = client()
        .post(server.url("/signup"))
        .header(REFERER, "http://ignored.example/")
        .form(&[
            ("field.name", "first"),
            ("field.name", "second"),
            ("callback", "/thanks"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[LOCATION], "/thanks");
    assert!(server.output("out/second.yaml").is_file());
    assert!(!server.output("out/first.yaml").exists());

    server.stop().await;
}

#[tokio::test]
async fn test_internal_field_not_overridden() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;

    client()
        .post(server.url("/signup"))
        .form(&[("field.name", "mallory"), ("field.source", "forged")])
        .send()
        .await
        .unwrap();

    let record = read_yaml(&server.output("out/mallory.yaml"));
    assert_eq!(record["source"], serde_yaml::Value::from("web"));

    server.stop().await;
}

#[tokio::test]
async fn test_multipart_submission() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;

    let form = reqwest::multipart::Form::new()
        .text("field.name", "carol")
        .text("field.subscribed", "True");
    let res = client()
        .post(server.url("/signup"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let record = read_yaml(&server.output("out/carol.yaml"));
    assert_eq!(record["name"], serde_yaml::Value::from("carol"));
    assert_eq!(record["subscribed"].as_bool(), Some(true));

    server.stop().await;
}

#[tokio::test]
async fn test_path_traversal_rejected() {
    let server = TestServer::start(SIGNUP_SCHEMA).await;

    let res = client()
        .post(server.url("/signup"))
        .form(&[("field.name", "../../escaped")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(!server.root().join("../escaped.yaml").exists());

    server.stop().await;
}

use api::api_state::ApiContext;
use api::create_router;
use app_state::{
    ApiSettings, AppSettings, ChannelSettings, DatabaseSettings, ExportSettings, LoggingSettings,
    SecretSettings,
};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use common_services::api::auth::interfaces::AuthClaims;
use common_services::database::memory::InMemoryDatabase;
use common_services::message_channel::memory::InMemoryChannel;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const JWT_SECRET: &str = "route-test-secret";

fn settings(degrade_on_channel_failure: bool) -> AppSettings {
    AppSettings {
        api: ApiSettings {
            host: "127.0.0.1".to_owned(),
            port: 0,
            allowed_origins: vec![],
        },
        logging: LoggingSettings {
            level: "debug".to_owned(),
        },
        secrets: SecretSettings {
            jwt: JWT_SECRET.to_owned(),
            database_url: "postgres://localhost/unused".to_owned(),
        },
        database: DatabaseSettings {
            max_connections: 1,
            min_connection: 0,
            max_lifetime: 60,
            idle_timeout: 60,
            acquire_timeout: 1,
        },
        channel: ChannelSettings {
            url: "postgres://localhost/unused".to_owned(),
            max_connections: 1,
            connect_timeout_ms: 100,
            publish_timeout_ms: 100,
        },
        exports: ExportSettings {
            topic: "export:playlists".to_owned(),
            degrade_on_channel_failure,
        },
    }
}

struct TestApp {
    router: Router,
    db: InMemoryDatabase,
    channel: InMemoryChannel,
}

/// p1 is owned by u1 and shared with u2. u3 has no relation to it.
async fn test_app(degrade_on_channel_failure: bool) -> TestApp {
    let db = InMemoryDatabase::new();
    db.insert_user("u1", "owner");
    db.insert_user("u2", "collaborator");
    db.insert_user("u3", "stranger");
    db.insert_song("s1", "Song One", "Performer");
    db.insert_playlist("p1", "Road trip", "u1");

    let channel = InMemoryChannel::new();
    let context = ApiContext::new(
        settings(degrade_on_channel_failure),
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        Arc::new(channel.clone()),
    );

    let app = TestApp {
        router: create_router(context),
        db,
        channel,
    };
    let (status, _) = app
        .send(
            Method::POST,
            "/collaborations",
            Some("u1"),
            Some(json!({ "playlistId": "p1", "userId": "u2" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app
}

fn token_for(user_id: &str) -> String {
    let claims = AuthClaims {
        sub: user_id.to_owned(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encodes")
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            request = request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token_for(user_id)),
            );
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

#[tokio::test]
async fn collaborator_export_publishes_job() {
    let app = test_app(true).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/export/playlists/p1",
            Some("u2"),
            Some(json!({ "targetEmail": "a@b.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "status": "success", "message": "request queued" }));

    let published = app.channel.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, "export:playlists");
    assert_eq!(
        published[0].payload,
        r#"{"userId":"u2","playlistId":"p1","targetEmail":"a@b.com"}"#
    );
}

#[tokio::test]
async fn export_by_unrelated_user_is_forbidden() {
    let app = test_app(true).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/export/playlists/p1",
            Some("u3"),
            Some(json!({ "targetEmail": "a@b.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "fail");
    assert_eq!(app.channel.attempts(), 0);
}

#[tokio::test]
async fn export_of_missing_playlist_is_not_found() {
    let app = test_app(true).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/export/playlists/nope",
            Some("u1"),
            Some(json!({ "targetEmail": "a@b.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(app.channel.attempts(), 0);
}

#[tokio::test]
async fn export_succeeds_while_channel_is_down() {
    let app = test_app(true).await;
    app.channel.set_failing(true);

    let (status, body) = app
        .send(
            Method::POST,
            "/export/playlists/p1",
            Some("u1"),
            Some(json!({ "targetEmail": "a@b.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "request queued");
    assert_eq!(app.channel.attempts(), 1);
    assert!(app.channel.published().is_empty());
}

#[tokio::test]
async fn export_fails_while_channel_is_down_without_degradation() {
    let app = test_app(false).await;
    app.channel.set_failing(true);

    let (status, body) = app
        .send(
            Method::POST,
            "/export/playlists/p1",
            Some("u1"),
            Some(json!({ "targetEmail": "a@b.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "status": "error", "message": "Sorry, something went wrong on our server." })
    );
}

#[tokio::test]
async fn export_rejects_bad_email() {
    let app = test_app(true).await;

    for payload in [json!({ "targetEmail": "not-an-email" }), json!({})] {
        let (status, body) = app
            .send(Method::POST, "/export/playlists/p1", Some("u1"), Some(payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
    }
    assert_eq!(app.channel.attempts(), 0);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = test_app(true).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/export/playlists/p1",
            None,
            Some(json!({ "targetEmail": "a@b.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "fail");

    let (status, _) = app.send(Method::GET, "/playlists", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_collaboration_conflicts() {
    let app = test_app(true).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/collaborations",
            Some("u1"),
            Some(json!({ "playlistId": "p1", "userId": "u2" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "fail");
    assert_eq!(app.db.collaboration_count("p1", "u2"), 1);
}

#[tokio::test]
async fn collaborator_cannot_manage_collaborators() {
    let app = test_app(true).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/collaborations",
            Some("u2"),
            Some(json!({ "playlistId": "p1", "userId": "u3" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.db.collaboration_count("p1", "u3"), 0);
}

#[tokio::test]
async fn removed_collaborator_loses_access() {
    let app = test_app(true).await;

    let (status, _) = app
        .send(
            Method::DELETE,
            "/collaborations",
            Some("u1"),
            Some(json!({ "playlistId": "p1", "userId": "u2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::GET, "/playlists/p1/songs", Some("u2"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn playlist_lifecycle() {
    let app = test_app(true).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/playlists",
            Some("u3"),
            Some(json!({ "name": "Late night" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let playlist_id = body["data"]["playlistId"]
        .as_str()
        .expect("playlist id")
        .to_owned();
    assert!(playlist_id.starts_with("playlist-"));

    let songs_uri = format!("/playlists/{playlist_id}/songs");
    let (status, _) = app
        .send(
            Method::POST,
            &songs_uri,
            Some("u3"),
            Some(json!({ "songId": "s1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.db.song_ids(&playlist_id), vec!["s1".to_owned()]);

    let (status, body) = app.send(Method::GET, &songs_uri, Some("u3"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["playlist"]["name"], "Late night");
    assert_eq!(body["data"]["playlist"]["username"], "stranger");
    assert_eq!(body["data"]["playlist"]["songs"][0]["id"], "s1");

    let (status, body) = app.send(Method::GET, "/playlists", Some("u3"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["playlists"].as_array().map(Vec::len), Some(1));

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/playlists/{playlist_id}"),
            Some("u1"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/playlists/{playlist_id}"),
            Some("u3"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, &songs_uri, Some("u3"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_a_validation_failure() {
    let app = test_app(true).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/playlists",
            Some("u1"),
            Some(json!({ "title": "wrong field" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn blank_playlist_name_is_rejected() {
    let app = test_app(true).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/playlists",
            Some("u3"),
            Some(json!({ "name": "   " })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "fail", "message": "name must not be blank" }));

    let (_, body) = app.send(Method::GET, "/playlists", Some("u3"), None).await;
    assert_eq!(body["data"]["playlists"], json!([]));
}

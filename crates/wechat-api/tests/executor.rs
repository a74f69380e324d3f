use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wechat_api::{
    impl_envelope, ApiClient, ApiError, ApiFamily, CredentialError, CredentialProvider, Envelope,
    ErrorEnvelope, ReqwestTransport, Wechat,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Hands out `old` until a forced refresh, then `new`
struct RotatingProvider {
    old: String,
    new: String,
    refreshed: AtomicUsize,
    fetches: AtomicUsize,
}

impl RotatingProvider {
    fn new(old: &str, new: &str) -> Arc<Self> {
        Arc::new(Self {
            old: old.to_string(),
            new: new.to_string(),
            refreshed: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        })
    }

    fn refreshes(&self) -> usize {
        self.refreshed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for RotatingProvider {
    async fn fetch(&self) -> Result<String, CredentialError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.refreshes() > 0 {
            Ok(self.new.clone())
        } else {
            Ok(self.old.clone())
        }
    }

    async fn force_refresh(&self) -> Result<String, CredentialError> {
        self.refreshed.fetch_add(1, Ordering::SeqCst);
        Ok(self.new.clone())
    }
}

#[derive(Debug, Deserialize)]
struct UserListResponse {
    base: ErrorEnvelope,
    #[serde(default)]
    data: Option<UserList>,
}

impl_envelope!(UserListResponse, base);

#[derive(Debug, Deserialize, PartialEq)]
struct UserList {
    #[serde(default)]
    openid: Vec<String>,
    #[serde(default)]
    next_openid: Option<String>,
}

fn client_for(provider: Arc<RotatingProvider>) -> ApiClient {
    ApiClient::with_transport(
        ReqwestTransport::new().unwrap(),
        provider,
        ApiFamily::OfficialAccount,
    )
}

fn template(server: &MockServer, endpoint: &str) -> String {
    format!("{}{}?access_token=", server.uri(), endpoint)
}

#[tokio::test]
async fn test_get_success_with_token_in_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/user/get"))
        .and(query_param("access_token", "token-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base": {"errcode": 0, "errmsg": "ok"},
            "data": {"openid": ["o1", "o2"], "next_openid": "o2"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RotatingProvider::new("token-a", "token-b");
    let client = client_for(provider.clone());

    let resp: UserListResponse = client
        .get_json(&template(&server, "/cgi-bin/user/get"))
        .await
        .unwrap();

    assert_eq!(
        resp.data,
        Some(UserList {
            openid: vec!["o1".to_string(), "o2".to_string()],
            next_openid: Some("o2".to_string()),
        })
    );
    assert_eq!(provider.refreshes(), 0);
}

#[tokio::test]
async fn test_post_sends_json_with_charset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cgi-bin/message/custom/send"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_json(json!({"touser": "OPENID", "msgtype": "text", "text": {"content": "hi"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(RotatingProvider::new("token-a", "token-b"));

    let resp: ErrorEnvelope = client
        .post_json(
            &template(&server, "/cgi-bin/message/custom/send"),
            &json!({"touser": "OPENID", "msgtype": "text", "text": {"content": "hi"}}),
        )
        .await
        .unwrap();

    assert!(resp.is_ok());
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("access_token", "old-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base": {"errcode": 42001, "errmsg": "access_token expired"},
            "data": {"openid": ["stale"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("access_token", "new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base": {"errcode": 0, "errmsg": "ok"},
            "data": {"next_openid": ""}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RotatingProvider::new("old-token", "new-token");
    let client = client_for(provider.clone());

    let resp: UserListResponse = client
        .get_json(&template(&server, "/cgi-bin/user/get"))
        .await
        .unwrap();

    let data = resp.data.unwrap();
    assert!(data.openid.is_empty());
    assert_eq!(data.next_openid.as_deref(), Some(""));
    assert_eq!(provider.refreshes(), 1);
}

#[tokio::test]
async fn test_persistent_expiry_stops_after_second_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 42001,
            "errmsg": "access_token expired"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let provider = RotatingProvider::new("old-token", "new-token");
    let client = client_for(provider.clone());

    let err = client
        .post_json::<_, ErrorEnvelope>(&template(&server, "/cgi-bin/menu/create"), &json!({}))
        .await
        .unwrap_err();

    assert!(client.is_credential_expired(&err));
    assert_eq!(provider.refreshes(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_application_error_passthrough() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 40003,
            "errmsg": "invalid openid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RotatingProvider::new("a", "b");
    let client = client_for(provider.clone());

    let err = client
        .get_json::<ErrorEnvelope>(&template(&server, "/cgi-bin/user/info"))
        .await
        .unwrap_err();

    assert_eq!(err.api_code(), Some(40003));
    assert_eq!(provider.refreshes(), 0);
}

#[tokio::test]
async fn test_server_error_status_is_not_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RotatingProvider::new("a", "b");
    let client = client_for(provider.clone());

    let err = client
        .get_json::<ErrorEnvelope>(&template(&server, "/cgi-bin/user/info"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::TransportStatus { status: 500, .. }));
    assert_eq!(provider.refreshes(), 0);
}

#[tokio::test]
async fn test_token_is_query_escaped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("access_token", "a b+c/d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": ""})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(RotatingProvider::new("a b+c/d", "unused"));

    let resp: ErrorEnvelope = client
        .get_json(&template(&server, "/cgi-bin/getcallbackip"))
        .await
        .unwrap();

    assert!(resp.is_ok());
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let provider = RotatingProvider::new("a", "b");
    let client = client_for(provider.clone());

    // Port 1 is reserved and refuses connections
    let err = client
        .get_json::<ErrorEnvelope>("http://127.0.0.1:1/cgi-bin/getcallbackip?access_token=")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(provider.refreshes(), 0);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})))
        .expect(8)
        .mount(&server)
        .await;

    let provider = RotatingProvider::new("a", "b");
    let client = client_for(provider.clone());
    let url = template(&server, "/cgi-bin/message/custom/send");

    let calls = (0..8).map(|i| {
        let client = client.clone();
        let url = url.clone();
        async move {
            client
                .post_json::<_, ErrorEnvelope>(&url, &json!({"seq": i}))
                .await
        }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(provider.fetches.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_sdk_adds_credential_param() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/menu/get"))
        .and(query_param("access_token", "sdk-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "menu": {"button": [{"type": "click", "name": "Today", "key": "V1001_TODAY"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = Wechat::new("sdk-token".to_string()).unwrap();
    let value = sdk
        .get(&format!("{}/cgi-bin/menu/get", server.uri()))
        .await
        .unwrap();

    assert_eq!(value["menu"]["button"][0]["key"], "V1001_TODAY");
}

#[tokio::test]
async fn test_sdk_reports_malformed_errcode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/user/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": "40003",
            "errmsg": "invalid openid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = Wechat::new("sdk-token".to_string()).unwrap();
    let err = sdk
        .get(&format!("{}/cgi-bin/user/info", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

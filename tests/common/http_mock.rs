use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A token endpoint response with `expires_in` as a string, as Yandex sends it.
pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "expires_in": "3600",
        "token_type": "OAuth"
    })
}

/// Answer every POST to `/token` with `body`.
#[allow(dead_code)]
pub async fn mount_token(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve page `page` of a collection at `route`, expecting exactly one hit.
#[allow(dead_code)]
pub async fn mount_page(server: &MockServer, route: &str, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Fail page `page` of a collection at `route` with `status`.
#[allow(dead_code)]
pub async fn mount_failing_page(server: &MockServer, route: &str, page: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_string("internal error"))
        .expect(1)
        .mount(server)
        .await;
}

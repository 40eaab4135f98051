mod common;

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::http_mock::{mount_failing_page, mount_page};
use ya360::{RequestParams, Ya360Error};

const USERS: &str = "/directory/v1/org/1/users/";

fn users_url() -> String {
    ya360::urls::users("1")
}

fn page_body(page: u32, pages: u32) -> serde_json::Value {
    json!({ "page": page, "pages": pages, "users": [{ "id": page }] })
}

#[tokio::test]
async fn unpaginated_fetch_returns_single_body() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/directory/v1/org/1/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "7" })))
        .expect(1)
        .mount(&server)
        .await;

    let set = client
        .fetch(&ya360::urls::user("1", "7"), None)
        .await
        .unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.is_complete());
    assert_eq!(set.into_bodies(), vec![json!({ "id": "7" })]);
}

#[tokio::test]
async fn page_zero_fans_out_over_remaining_pages() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    for page in 0..=3 {
        mount_page(&server, USERS, page, page_body(page, 3)).await;
    }

    let params = RequestParams::paged(0, 10);
    let set = client.fetch(&users_url(), Some(&params)).await.unwrap();

    assert!(set.is_complete());
    let numbers: Vec<_> = set.pages.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![Some(0), Some(1), Some(2), Some(3)]);
    let ids: Vec<_> = set.bodies().map(|b| b["users"][0]["id"].clone()).collect();
    assert_eq!(ids, vec![json!(0), json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn page_one_fetches_each_page_once() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    for page in 1..=3 {
        mount_page(&server, USERS, page, page_body(page, 3)).await;
    }

    let set = client
        .fetch(&users_url(), Some(&RequestParams::paged(1, 10)))
        .await
        .unwrap();
    assert_eq!(set.len(), 3);
}

#[tokio::test]
async fn slow_page_does_not_reorder_results() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    mount_page(&server, USERS, 1, page_body(1, 3)).await;
    Mock::given(method("GET"))
        .and(path(USERS))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(2, 3))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_page(&server, USERS, 3, page_body(3, 3)).await;

    let set = client
        .fetch(&users_url(), Some(&RequestParams::new().per_page(10)))
        .await
        .unwrap();
    let numbers: Vec<_> = set.pages.iter().filter_map(|p| p.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn remaining_pages_are_requested_together() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    let delay = Duration::from_millis(300);
    mount_page(&server, USERS, 1, page_body(1, 5)).await;
    for page in 2..=5 {
        Mock::given(method("GET"))
            .and(path(USERS))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(page, 5))
                    .set_delay(delay),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let started = Instant::now();
    let set = client
        .fetch(&users_url(), Some(&RequestParams::paged(1, 10)))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(set.len(), 5);
    // Four delayed legs in sequence would take at least 1200ms.
    assert!(elapsed < delay * 3, "pages were fetched one by one: {elapsed:?}");
}

#[tokio::test]
async fn failed_page_is_left_out_and_recorded() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    mount_page(&server, USERS, 1, page_body(1, 3)).await;
    mount_failing_page(&server, USERS, 2, 500).await;
    mount_page(&server, USERS, 3, page_body(3, 3)).await;

    let set = client
        .fetch(&users_url(), Some(&RequestParams::paged(1, 10)))
        .await
        .unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.failed_pages, vec![2]);
    assert!(!set.is_complete());
}

#[tokio::test]
async fn failed_first_page_yields_empty_set() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    mount_failing_page(&server, USERS, 1, 503).await;

    let set = client
        .fetch(&users_url(), Some(&RequestParams::paged(1, 10)))
        .await
        .unwrap();
    assert!(set.is_empty());
    assert_eq!(set.failed_pages, vec![1]);
}

#[tokio::test]
async fn response_without_page_count_is_a_single_page() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    mount_page(&server, USERS, 1, json!({ "users": [] })).await;

    let set = client
        .fetch(&users_url(), Some(&RequestParams::paged(1, 10)))
        .await
        .unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.is_complete());
}

#[tokio::test]
async fn unpaginated_error_is_raised_with_request_details() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/directory/v1/org/1/groups/5"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client
        .fetch(&ya360::urls::group("1", "5"), None)
        .await
        .unwrap_err();
    match &err {
        Ya360Error::ApiRequest {
            method,
            url,
            status,
            ..
        } => {
            assert_eq!(method, "GET");
            assert!(url.ends_with("/directory/v1/org/1/groups/5"));
            assert_eq!(*status, Some(404));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn requests_carry_pagination_parameters() {
    let server = MockServer::start().await;
    let client = common::authenticated_client(&server).await;
    Mock::given(method("GET"))
        .and(path(USERS))
        .and(query_param("page", "1"))
        .and(query_param("perPage", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let set = client
        .fetch(&users_url(), Some(&RequestParams::paged(1, 25)))
        .await
        .unwrap();
    assert_eq!(set.len(), 1);
}

#[tokio::test]
async fn fetch_without_token_is_refused() {
    let server = MockServer::start().await;
    let client = common::client(&server);
    let err = client
        .fetch(&users_url(), Some(&RequestParams::paged(1, 10)))
        .await
        .unwrap_err();
    assert!(matches!(err, Ya360Error::NotAuthenticated));
}

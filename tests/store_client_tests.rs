//! Integration tests for the store client.
//!
//! A wiremock server stands in for both the store domain (Basic
//! credentials) and the central API host (OAuth credentials).

use std::time::Duration;

use bigcommerce_api::rest::resources::{Brand, Customer, Product, Record, Shipment};
use bigcommerce_api::rest::{Filter, Payload, Resource, RestError, StoreClient};
use bigcommerce_api::{
    ApiKey, ApiVersion, AuthToken, ClientId, ConnectionConfig, Credentials, HostUrl, ResponseBody,
    StoreConfig, StoreHash, StoreUrl,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_connection(fail_on_error: bool) -> ConnectionConfig {
    ConnectionConfig::builder()
        .fail_on_error(fail_on_error)
        .server_retry_delay(Duration::ZERO)
        .build()
        .unwrap()
}

/// Creates a client using Basic credentials against `server`.
fn basic_client(server: &MockServer) -> StoreClient {
    let config = StoreConfig::builder()
        .credentials(
            Credentials::basic(
                StoreUrl::new(server.uri()).unwrap(),
                "admin",
                ApiKey::new("secret").unwrap(),
            )
            .unwrap(),
        )
        .connection(fast_connection(false))
        .build()
        .unwrap();
    StoreClient::new(config)
}

/// Creates a client using OAuth credentials with `server` as the API host.
fn oauth_client(server: &MockServer) -> StoreClient {
    let config = StoreConfig::builder()
        .credentials(Credentials::OAuth {
            client_id: ClientId::new("client-id").unwrap(),
            auth_token: AuthToken::new("token").unwrap(),
            store_hash: StoreHash::new("abc123").unwrap(),
        })
        .api_host(HostUrl::new(server.uri()).unwrap())
        .connection(fast_connection(false))
        .build()
        .unwrap();
    StoreClient::new(config)
}

// ============================================================================
// Collections and records
// ============================================================================

#[tokio::test]
async fn test_list_products_with_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/products"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Tee"},
            {"id": 2, "name": "Cap"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    let products = client
        .list::<Product>(&Filter::from(2).limit(5))
        .await
        .unwrap()
        .unwrap()
        .mapped()
        .unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[1].str("name").unwrap(), "Cap");
}

#[tokio::test]
async fn test_single_object_collection_is_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc", "name": "Shop"})))
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    let records = client
        .get_collection::<Record>("/store", &Filter::new())
        .await
        .unwrap()
        .unwrap()
        .mapped()
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].str("name").unwrap(), "Shop");
}

#[tokio::test]
async fn test_empty_collection_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/coupons"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    let coupons = client
        .get_collection::<Record>("/coupons", &Filter::new())
        .await
        .unwrap();

    assert_eq!(coupons, Some(Payload::Mapped(Vec::new())));
}

#[tokio::test]
async fn test_find_uses_oauth_path_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stores/abc123/v2/customers/4"))
        .and(header("x-auth-client", "client-id"))
        .and(header("x-auth-token", "token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4, "email": "a@example.com"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = oauth_client(&server);
    let customer = client.find::<Customer>(4).await.unwrap().unwrap();

    match customer {
        Payload::Mapped(customer) => {
            assert_eq!(customer.id(), Some(4));
            assert_eq!(customer.str("email").unwrap(), "a@example.com");
        }
        Payload::Raw(raw) => panic!("unexpected raw body {raw}"),
    }
}

#[tokio::test]
async fn test_missing_record_returns_sentinel_and_last_error() {
    let server = MockServer::start().await;
    let error_body = json!([{"status": 404, "message": "The requested resource was not found."}]);
    Mock::given(method("GET"))
        .and(path("/api/v2/brands/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    let brand = client.find::<Brand>(99).await.unwrap();

    assert!(brand.is_none());
    assert_eq!(client.last_error(), Some(&ResponseBody::Json(error_body)));
}

#[tokio::test]
async fn test_fail_on_error_surfaces_as_rest_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/brands/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    client.connection_mut().set_fail_on_error(true);
    let result = client.find::<Brand>(99).await;

    assert!(matches!(result, Err(RestError::Http(ref e)) if e.code() == 404));
}

#[tokio::test]
async fn test_xml_mode_returns_raw_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/products/count"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<count>12</count>"))
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    client.connection_mut().use_xml(true);
    let count = client.count::<Product>(&Filter::new()).await.unwrap();

    assert_eq!(count, Some(Payload::Raw("<count>12</count>".to_string())));
}

// ============================================================================
// Counts, time and quota
// ============================================================================

#[tokio::test]
async fn test_count_reads_count_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/customers/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 42})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/orders/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 1})))
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    assert_eq!(
        client.count::<Customer>(&Filter::new()).await.unwrap(),
        Some(Payload::Mapped(42))
    );
    assert!(matches!(
        client.get_count("/orders/count", &Filter::new()).await,
        Err(RestError::UnexpectedResponse { .. })
    ));
}

#[tokio::test]
async fn test_get_time_parses_epoch_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"time": 1_700_000_000})))
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    let time = client.get_time().await.unwrap().unwrap().mapped().unwrap();
    assert_eq!(time.timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn test_requests_remaining_pings_time_when_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/time"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-BC-ApiLimit-Remaining", "4999")
                .set_body_json(json!({"time": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    assert_eq!(client.requests_remaining().await.unwrap(), Some(4999));
    // The header from the ping is reused without another request.
    assert_eq!(client.requests_remaining().await.unwrap(), Some(4999));
}

#[tokio::test]
async fn test_get_store_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Shop"})))
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    assert_eq!(
        client.get_store().await.unwrap(),
        Some(ResponseBody::Json(json!({"name": "Shop"})))
    );
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_create_sends_create_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/products"))
        .and(body_json(json!({"name": "Tee", "price": "10.00", "tax_class_id": 0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 77})))
        .expect(1)
        .mount(&server)
        .await;

    let mut product: Resource<Product> = Resource::new();
    product.set("name", "Tee");
    product.set("price", "10.00");
    product.set("tax_class_id", 0);
    product.set("date_created", "Tue, 20 Nov 2012 00:00:00 +0000");

    let mut client = basic_client(&server);
    let created = client.create(&product).await.unwrap();
    assert_eq!(created, Some(ResponseBody::Json(json!({"id": 77}))));
}

#[tokio::test]
async fn test_update_sends_update_fields_to_record_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/products/77"))
        .and(body_json(json!({"name": "Tee v2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 77})))
        .expect(1)
        .mount(&server)
        .await;

    let mut product: Resource<Product> =
        Resource::from_value(json!({"id": 77, "name": "Tee", "tax_class_id": 0, "warranty": null}));
    product.set("name", "Tee v2");

    let mut client = basic_client(&server);
    client.update(&product).await.unwrap();
}

#[tokio::test]
async fn test_update_without_id_is_rejected() {
    let server = MockServer::start().await;
    let mut client = basic_client(&server);
    let brand: Resource<Brand> = Resource::from_value(json!({"name": "Acme"}));

    assert!(matches!(
        client.update(&brand).await,
        Err(RestError::Resource(_))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_record() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/brands/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    client.delete::<Brand>(3).await.unwrap();
}

#[tokio::test]
async fn test_shipment_endpoints_are_nested_under_orders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/orders/100/shipments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "order_id": 100}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/orders/100/shipments/1"))
        .and(body_json(json!({"tracking_number": "1Z999"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = basic_client(&server);
    let mut shipments = client
        .list_shipments(100, &Filter::new())
        .await
        .unwrap()
        .unwrap()
        .mapped()
        .unwrap();

    let shipment: &mut Resource<Shipment> = &mut shipments[0];
    shipment.set("tracking_number", "1Z999");
    client.update_shipment(100, shipment).await.unwrap();
}

// ============================================================================
// API versions
// ============================================================================

#[tokio::test]
async fn test_v3_calls_do_not_change_configured_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stores/abc123/v3/catalog/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"inventory_count": 3}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/stores/abc123/v3/customers/attributes"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = oauth_client(&server);
    let summary = client
        .get_v3_resource::<Record>("/catalog/summary")
        .await
        .unwrap()
        .unwrap()
        .mapped()
        .unwrap();
    assert_eq!(summary.get("data"), Some(&json!({"inventory_count": 3})));

    client
        .delete_v3_resource("/customers/attributes")
        .await
        .unwrap();
    assert!(client.api_path().ends_with("/v2"));
}

#[tokio::test]
async fn test_set_version_switches_oauth_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stores/abc123/v3/time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"time": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = oauth_client(&server);
    client.set_version(ApiVersion::V3);
    let time = client.get_time().await.unwrap().unwrap().mapped().unwrap();
    assert_eq!(time.timestamp(), 5);
}

use catalog_api::{Client, Error, ProductQuery, Query};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_products_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("products.json");

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "100"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let query = ProductQuery::default().with_page(1).with_page_size(100);
    let resp = client.get_products(&query).await.unwrap();
    assert_eq!(resp.products.len(), 6);
    assert_eq!(resp.products[0].id, 121);
}

#[tokio::test]
async fn get_products_with_search_hits_search_endpoint() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("search.json");

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "galaxy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let query = ProductQuery::default()
        .with_page_size(100)
        .with_search("galaxy");
    let resp = client.get_products(&query).await.unwrap();
    assert_eq!(resp.products.len(), 1);
    assert_eq!(resp.products[0].title, "Samsung Galaxy S8");
}

#[tokio::test]
async fn get_products_server_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client
        .get_products(&ProductQuery::default())
        .await
        .unwrap_err();
    match &err {
        Error::HttpStatus { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Request failed (500): Internal Server Error"
    );
}

#[tokio::test]
async fn empty_error_body_uses_reason_phrase() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/9999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_product(9999).await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed (404): Not Found");
}

#[tokio::test]
async fn get_products_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_products(&ProductQuery::default()).await;
    assert!(matches!(result, Err(Error::MalformedResponse)));
}

#[tokio::test]
async fn get_product_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("product.json");

    Mock::given(method("GET"))
        .and(path("/products/121"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let product = client.get_product(121).await.unwrap();
    assert_eq!(product.title, "iPhone 5s");
    assert_eq!(product.brand, "Apple");
}

#[tokio::test]
async fn connection_refused_is_request_failed() {
    // Nothing listens on the discard port.
    let client = Client::with_base_url("http://127.0.0.1:9");
    let result = client.get_product(1).await;
    assert!(matches!(result, Err(Error::RequestFailed)));
}

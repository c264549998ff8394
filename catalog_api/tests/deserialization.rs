use catalog_api::types::{Product, ProductPage};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_products_full() {
    let json = load_fixture("products.json");
    let resp: ProductPage = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.products.len(), 6);
    assert_eq!(resp.total, 194);
    assert_eq!(resp.skip, 0);
    assert_eq!(resp.limit, 6);

    let product = &resp.products[0];
    assert_eq!(product.id, 121);
    assert_eq!(product.title, "iPhone 5s");
    assert_eq!(product.price, 199.99);
    assert_eq!(product.stock, 25);
    assert_eq!(product.brand, "Apple");
    assert_eq!(product.category, "smartphones");
    assert_eq!(product.availability_status.as_deref(), Some("In Stock"));
    assert_eq!(product.weight, Some(2.0));
    let dims = product.dimensions.unwrap();
    assert_eq!(dims.width, 5.67);
    let meta = product.meta.as_ref().unwrap();
    assert_eq!(meta.created_at.as_deref(), Some("2024-05-23T08:56:21.625Z"));
    assert_eq!(meta.barcode.as_deref(), Some("7907278373495"));
}

#[test]
fn deserialize_product_without_brand_or_meta() {
    let json = load_fixture("products.json");
    let resp: ProductPage = serde_json::from_str(&json).unwrap();

    let apple = resp.products.iter().find(|p| p.id == 16).unwrap();
    assert_eq!(apple.brand, "");
    assert!(apple.meta.is_none());
    assert_eq!(apple.timestamp_text(), None);
    assert_eq!(apple.created_at(), None);
}

#[test]
fn timestamp_falls_back_to_updated_at() {
    let json = load_fixture("products.json");
    let resp: ProductPage = serde_json::from_str(&json).unwrap();

    let s10 = resp.products.iter().find(|p| p.id == 131).unwrap();
    assert_eq!(s10.timestamp_text(), Some("2024-03-10T07:00:00.000Z"));
    assert_eq!(s10.created_at(), None);
}

#[test]
fn deserialize_products_empty() {
    let json = load_fixture("products_minimal.json");
    let resp: ProductPage = serde_json::from_str(&json).unwrap();
    assert!(resp.products.is_empty());
    assert_eq!(resp.total, 0);
}

#[test]
fn deserialize_single_product() {
    let json = load_fixture("product.json");
    let product: Product = serde_json::from_str(&json).unwrap();
    assert_eq!(product.id, 121);
    assert_eq!(product.discount_percentage, 12.91);
    assert_eq!(
        product.tags,
        Some(vec!["smartphones".to_string(), "apple".to_string()])
    );
    assert_eq!(product.images.len(), 2);
    assert!(product.created_at().is_some());
}

#[test]
fn serialized_product_omits_absent_optionals() {
    let json = load_fixture("products.json");
    let resp: ProductPage = serde_json::from_str(&json).unwrap();
    let apple = resp.products.iter().find(|p| p.id == 16).unwrap();

    let value = serde_json::to_value(apple).unwrap();
    let obj = value.as_object().unwrap();
    assert!(!obj.contains_key("meta"));
    assert!(!obj.contains_key("dimensions"));
    assert_eq!(obj["discountPercentage"], 0.0);
}

#[test]
fn missing_required_field_fails() {
    let json = r#"{"id": 1, "price": 2.5}"#;
    assert!(serde_json::from_str::<Product>(json).is_err());
}

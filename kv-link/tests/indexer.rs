use kv_link::{
    Association, AssociationIndexer, Error, FnConversion, KvEntity, LinkAssociationIndexer,
    LinkStore, MemoryLinkStore, PersistentEntity,
};

#[derive(KvEntity)]
#[kv_entity(namespace = "customer")]
struct Customer;

#[derive(KvEntity)]
#[kv_entity(namespace = "order")]
struct Order;

#[derive(KvEntity)]
struct ShippingAddress;

#[tokio::test]
async fn customer_orders_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = MemoryLinkStore::new();
    let indexer = LinkAssociationIndexer::with_identity(
        store.clone(),
        Association::between::<Customer, Order>("orders"),
    )
    .unwrap();

    indexer
        .index("cust-42", &["ord-1", "ord-2"])
        .await
        .unwrap();

    let mut links = store.links_to("customer", "cust-42", "orders").await.unwrap();
    links.sort_by(|a, b| a.child_key.cmp(&b.child_key));
    assert_eq!(links.len(), 2);
    for (link, key) in links.iter().zip(["ord-1", "ord-2"]) {
        assert_eq!(link.child_namespace, "order");
        assert_eq!(link.child_key, key);
        assert_eq!(link.owner_namespace, "customer");
        assert_eq!(link.owner_key, "cust-42");
        assert_eq!(link.tag, "orders");
    }

    let mut keys = indexer.query("cust-42").await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["ord-1", "ord-2"]);
    assert_eq!(indexer.indexed_entity(), &PersistentEntity::of::<Order>());
}

#[tokio::test]
async fn reindexing_does_not_duplicate() {
    let store = MemoryLinkStore::new();
    let indexer = LinkAssociationIndexer::with_identity(
        store.clone(),
        Association::between::<Customer, Order>("orders"),
    )
    .unwrap();

    indexer.index("cust-1", &["ord-1", "ord-1"]).await.unwrap();
    indexer.index_one("cust-1", "ord-1").await.unwrap();

    assert_eq!(store.len().unwrap(), 1);
    assert_eq!(indexer.query("cust-1").await.unwrap(), vec!["ord-1"]);
}

#[tokio::test]
async fn keys_with_separators_round_trip() {
    let indexer = LinkAssociationIndexer::with_identity(
        MemoryLinkStore::new(),
        Association::between::<Customer, ShippingAddress>("addresses"),
    )
    .unwrap();
    assert_eq!(indexer.indexed_entity().namespace(), "shipping_address");

    indexer
        .index("eu/cust-1", &["home/1", "100%/work"])
        .await
        .unwrap();

    let mut keys = indexer.query("eu/cust-1").await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["100%/work", "home/1"]);
    assert!(indexer.query("eu").await.unwrap().is_empty());
    assert_eq!(indexer.owners_of("home/1").await.unwrap(), vec!["eu/cust-1"]);
}

#[tokio::test]
async fn fn_conversion_round_trips_keys() {
    let store = MemoryLinkStore::new();
    let indexer = LinkAssociationIndexer::new(
        store.clone(),
        FnConversion::new(
            |key: &str| format!("v1:{}", key),
            |key: &str| key.strip_prefix("v1:").unwrap_or(key).to_string(),
        ),
        Association::between::<Customer, Order>("orders"),
    )
    .unwrap();

    indexer
        .index("cust-42", &["ord-1", "ord-2"])
        .await
        .unwrap();

    let mut keys = indexer.query("cust-42").await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["ord-1", "ord-2"]);
    assert_eq!(
        store
            .links_to("customer", "v1:cust-42", "orders")
            .await
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn incomplete_association_is_rejected() {
    let result = LinkAssociationIndexer::with_identity(
        MemoryLinkStore::new(),
        Association::new(
            "",
            PersistentEntity::of::<Customer>(),
            PersistentEntity::of::<Order>(),
        ),
    );
    assert!(matches!(result, Err(Error::InvalidAssociation(_))));
}

use kv_link::{
    Association, AssociationIndexer, Config, Error, KvEntity, LinkAssociationIndexer,
    TikvLinkStore,
};

#[derive(KvEntity)]
#[kv_entity(namespace = "customer")]
pub struct Customer;

#[derive(KvEntity)]
#[kv_entity(namespace = "order")]
pub struct Order;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let store = TikvLinkStore::connect(Config::from_env()?).await?;
    let orders = LinkAssociationIndexer::with_identity(
        store,
        Association::between::<Customer, Order>("orders"),
    )?;

    orders.index("cust-42", &["ord-1", "ord-2"]).await?;
    println!("{:?}", orders.query("cust-42").await?);
    println!("{:?}", orders.owners_of("ord-1").await?);

    orders.unindex("cust-42", &["ord-1", "ord-2"]).await?;

    Ok(())
}

use std::pin::Pin;

use async_stream::try_stream;
use futures::{Stream, TryStreamExt};
use log::debug;
use prost::Message;
use tikv_client::{Key, TransactionClient, proto::kvrpcpb};

use crate::{
    Config, Error, Link, LinkStore,
    utils::{link_from_prefix, link_paths, link_to_prefix, next_key, prefix_end},
};

/// 基于 TiKV 事务集群的链接存储
///
/// 每条链接在同一事务中写两份: owner 下一份用于正向遍历，child 下一份用于反向遍历
#[derive(Clone)]
pub struct TikvLinkStore {
    pub(crate) client: TransactionClient,
    pub(crate) scan_page_size: u32,
}

impl TikvLinkStore {
    pub async fn new(pd_endpoints: Vec<String>) -> Result<Self, Error> {
        Self::connect(Config::new(pd_endpoints)).await
    }

    pub async fn connect(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let client = TransactionClient::new(config.pd_endpoints)
            .await
            .map_err(Error::TikvError)?;
        Ok(Self {
            client,
            scan_page_size: config.scan_page_size,
        })
    }

    /// 分页扫描 `prefix` 下的全部链接。`prefix` 必须以 `/` 结尾
    pub(crate) fn walk(
        &self,
        prefix: String,
    ) -> Pin<Box<dyn Stream<Item = Result<Link, Error>> + Send>> {
        debug_assert!(prefix.ends_with('/'));
        let client = self.client.clone();
        let page_size = self.scan_page_size;

        Box::pin(try_stream! {
            let mut snapshot = client.snapshot(
                client
                    .current_timestamp()
                    .await
                    .map_err(Error::TikvError)?,
                tikv_client::TransactionOptions::new_optimistic(),
            );
            let mut start_key: Key = prefix.clone().into();
            let end_key: Key = prefix_end(&prefix).into();
            loop {
                let kvs = snapshot
                    .scan(start_key.clone()..end_key.clone(), page_size)
                    .await
                    .map_err(Error::TikvError)?
                    .collect::<Vec<_>>();
                if kvs.is_empty() {
                    break;
                }
                start_key = next_key(kvs.last().ok_or(Error::NotFound)?.key());
                let len = kvs.len();

                for kv in kvs {
                    let link = Link::decode(kv.value().as_slice()).map_err(Error::DeserializationError)?;
                    yield link;
                }
                if len < page_size as usize {
                    break;
                }
            }
        })
    }

    async fn mutate(&self, mutations: Vec<kvrpcpb::Mutation>) -> Result<(), Error> {
        let mut txn = self
            .client
            .begin_optimistic()
            .await
            .map_err(Error::TikvError)?;

        txn.batch_mutate(mutations)
            .await
            .map_err(Error::TikvError)?;

        txn.commit().await.map_err(Error::TikvError)?;
        Ok(())
    }
}

impl LinkStore for TikvLinkStore {
    async fn link(&self, link: &Link) -> Result<(), Error> {
        let value = link.encode_to_vec();
        let mutations = link_paths(link)
            .into_iter()
            .map(|path| kvrpcpb::Mutation {
                key: path.into(),
                op: kvrpcpb::Op::Put.into(),
                value: value.clone(),
                ..Default::default()
            })
            .collect::<Vec<_>>();
        debug!(
            "tikv link: {}/{} -[{}]-> {}/{}",
            link.child_namespace, link.child_key, link.tag, link.owner_namespace, link.owner_key
        );
        self.mutate(mutations).await
    }

    async fn unlink(&self, link: &Link) -> Result<(), Error> {
        let mutations = link_paths(link)
            .into_iter()
            .map(|path| kvrpcpb::Mutation {
                key: path.into(),
                op: kvrpcpb::Op::Del.into(),
                ..Default::default()
            })
            .collect::<Vec<_>>();
        debug!(
            "tikv unlink: {}/{} -[{}]-> {}/{}",
            link.child_namespace, link.child_key, link.tag, link.owner_namespace, link.owner_key
        );
        self.mutate(mutations).await
    }

    async fn links_to(
        &self,
        owner_namespace: &str,
        owner_key: &str,
        tag: &str,
    ) -> Result<Vec<Link>, Error> {
        self.walk(link_to_prefix(owner_namespace, owner_key, tag))
            .try_collect()
            .await
    }

    async fn links_from(
        &self,
        child_namespace: &str,
        child_key: &str,
        tag: &str,
    ) -> Result<Vec<Link>, Error> {
        self.walk(link_from_prefix(child_namespace, child_key, tag))
            .try_collect()
            .await
    }
}

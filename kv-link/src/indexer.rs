use std::collections::HashSet;
use std::future::Future;

use log::{debug, warn};

use crate::{
    Association, Error, IdentityConversion, KeyConversion, Link, LinkStore, PersistentEntity,
    utils::check_key,
};

/// 为一个关联建立索引: 记录哪些 child 记录属于某个 owner 记录
pub trait AssociationIndexer: Send + Sync {
    /// 把每个外键链接到 owner
    ///
    /// 按顺序写入，遇到第一个失败立即停止并原样返回该错误，之前写入的链接保留
    fn index<K>(
        &self,
        owner_key: &str,
        foreign_keys: &[K],
    ) -> impl Future<Output = Result<(), Error>> + Send
    where
        K: AsRef<str> + Sync;

    fn index_one(
        &self,
        owner_key: &str,
        foreign_key: &str,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        async move { self.index(owner_key, &[foreign_key]).await }
    }

    /// 链接到 owner 的 child 记录的 key，顺序不保证
    fn query(&self, owner_key: &str) -> impl Future<Output = Result<Vec<String>, Error>> + Send;

    /// 被索引的实体
    fn indexed_entity(&self) -> &PersistentEntity;
}

/// 以存储链接实现的 [`AssociationIndexer`]: 链接从 child 记录指向 owner 记录，tag 为关联名
pub struct LinkAssociationIndexer<S, C = IdentityConversion> {
    store: S,
    conversion: C,
    association: Association,
    owner: PersistentEntity,
    child: PersistentEntity,
}

impl<S: LinkStore> LinkAssociationIndexer<S> {
    pub fn with_identity(store: S, association: Association) -> Result<Self, Error> {
        Self::new(store, IdentityConversion, association)
    }
}

impl<S: LinkStore, C: KeyConversion> LinkAssociationIndexer<S, C> {
    pub fn new(store: S, conversion: C, association: Association) -> Result<Self, Error> {
        association.validate()?;
        let owner = association.owner().clone();
        let child = association.associated_entity().clone();
        Ok(Self {
            store,
            conversion,
            association,
            owner,
            child,
        })
    }

    pub fn association(&self) -> &Association {
        &self.association
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 删除 owner 与每个外键之间的链接，失败处理与 [`AssociationIndexer::index`] 相同
    pub async fn unindex<K>(&self, owner_key: &str, foreign_keys: &[K]) -> Result<(), Error>
    where
        K: AsRef<str> + Sync,
    {
        let links = self.links_for(owner_key, foreign_keys)?;
        for (removed, link) in links.iter().enumerate() {
            if let Err(e) = self.store.unlink(link).await {
                warn!(
                    "unindex '{}' aborted at {}/{} after {} removed: {}",
                    self.association.name(),
                    link.child_namespace,
                    link.child_key,
                    removed,
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// child 记录所链接的 owner 记录的 key
    pub async fn owners_of(&self, foreign_key: &str) -> Result<Vec<String>, Error> {
        check_key("foreign", foreign_key)?;
        let child_key = self.conversion.to_store_key(foreign_key);
        let links = self
            .store
            .links_from(self.child.namespace(), &child_key, self.association.name())
            .await?;
        Ok(self.distinct_keys(
            links
                .into_iter()
                .filter(|link| link.owner_namespace == self.owner.namespace())
                .map(|link| link.owner_key),
        ))
    }

    // 先校验全部 key，保证非法输入不会留下部分写入
    fn links_for<K: AsRef<str>>(
        &self,
        owner_key: &str,
        foreign_keys: &[K],
    ) -> Result<Vec<Link>, Error> {
        check_key("owner", owner_key)?;
        let owner_key = self.conversion.to_store_key(owner_key);
        check_key("owner", &owner_key)?;

        foreign_keys
            .iter()
            .map(|foreign_key| {
                check_key("foreign", foreign_key.as_ref())?;
                let child_key = self.conversion.to_store_key(foreign_key.as_ref());
                check_key("foreign", &child_key)?;
                Ok(Link::new(
                    self.child.namespace(),
                    child_key,
                    self.owner.namespace(),
                    owner_key.clone(),
                    self.association.name(),
                ))
            })
            .collect()
    }

    fn distinct_keys(&self, keys: impl Iterator<Item = String>) -> Vec<String> {
        let mut seen = HashSet::new();
        keys.map(|key| self.conversion.from_store_key(&key))
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }
}

impl<S: LinkStore, C: KeyConversion> AssociationIndexer for LinkAssociationIndexer<S, C> {
    async fn index<K>(&self, owner_key: &str, foreign_keys: &[K]) -> Result<(), Error>
    where
        K: AsRef<str> + Sync,
    {
        let links = self.links_for(owner_key, foreign_keys)?;
        debug!(
            "index '{}': {} link(s) to {}/{}",
            self.association.name(),
            links.len(),
            self.owner.namespace(),
            owner_key
        );
        for (written, link) in links.iter().enumerate() {
            if let Err(e) = self.store.link(link).await {
                warn!(
                    "index '{}' aborted at {}/{} after {} written: {}",
                    self.association.name(),
                    link.child_namespace,
                    link.child_key,
                    written,
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    async fn query(&self, owner_key: &str) -> Result<Vec<String>, Error> {
        check_key("owner", owner_key)?;
        let owner_key = self.conversion.to_store_key(owner_key);
        let links = self
            .store
            .links_to(self.owner.namespace(), &owner_key, self.association.name())
            .await?;
        debug!(
            "query '{}': {} link(s) to {}/{}",
            self.association.name(),
            links.len(),
            self.owner.namespace(),
            owner_key
        );
        Ok(self.distinct_keys(
            links
                .into_iter()
                .filter(|link| link.child_namespace == self.child.namespace())
                .map(|link| link.child_key),
        ))
    }

    fn indexed_entity(&self) -> &PersistentEntity {
        self.association.associated_entity()
    }
}

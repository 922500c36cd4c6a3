use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::{
    Error, Link, LinkStore,
    utils::{link_from_prefix, link_paths, link_to_prefix, prefix_end},
};

/// 进程内链接存储，key 布局与 [`crate::TikvLinkStore`] 相同
///
/// clone 出的实例共享同一份数据
#[derive(Clone, Default)]
pub struct MemoryLinkStore {
    links: Arc<RwLock<BTreeMap<String, Link>>>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 不同链接的数量
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self
            .read()?
            .range("link/to/".to_string()..prefix_end("link/to/"))
            .count())
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Link>>, Error> {
        self.links
            .read()
            .map_err(|_| Error::Unavailable("memory link store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Link>>, Error> {
        self.links
            .write()
            .map_err(|_| Error::Unavailable("memory link store lock poisoned".to_string()))
    }

    fn scan(&self, prefix: String) -> Result<Vec<Link>, Error> {
        let end = prefix_end(&prefix);
        Ok(self
            .read()?
            .range(prefix..end)
            .map(|(_, link)| link.clone())
            .collect())
    }
}

impl LinkStore for MemoryLinkStore {
    async fn link(&self, link: &Link) -> Result<(), Error> {
        let [to_path, from_path] = link_paths(link);
        debug!("memory link: {} -> {}", from_path, to_path);
        let mut links = self.write()?;
        links.insert(to_path, link.clone());
        links.insert(from_path, link.clone());
        Ok(())
    }

    async fn unlink(&self, link: &Link) -> Result<(), Error> {
        let [to_path, from_path] = link_paths(link);
        let mut links = self.write()?;
        links.remove(&to_path);
        links.remove(&from_path);
        Ok(())
    }

    async fn links_to(
        &self,
        owner_namespace: &str,
        owner_key: &str,
        tag: &str,
    ) -> Result<Vec<Link>, Error> {
        self.scan(link_to_prefix(owner_namespace, owner_key, tag))
    }

    async fn links_from(
        &self,
        child_namespace: &str,
        child_key: &str,
        tag: &str,
    ) -> Result<Vec<Link>, Error> {
        self.scan(link_from_prefix(child_namespace, child_key, tag))
    }
}

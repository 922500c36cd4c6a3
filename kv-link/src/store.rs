use std::future::Future;

use crate::{Error, Link};

/// 支持链接遍历的 KV 存储
///
/// 重复写入相同链接的语义由实现决定，内置的存储均视为无操作
pub trait LinkStore: Send + Sync {
    /// 写入链接
    fn link(&self, link: &Link) -> impl Future<Output = Result<(), Error>> + Send;

    /// 删除链接，链接不存在时也返回成功
    fn unlink(&self, link: &Link) -> impl Future<Output = Result<(), Error>> + Send;

    /// `tag` 下指向该 owner 记录的全部链接
    fn links_to(
        &self,
        owner_namespace: &str,
        owner_key: &str,
        tag: &str,
    ) -> impl Future<Output = Result<Vec<Link>, Error>> + Send;

    /// `tag` 下从该 child 记录出发的全部链接
    fn links_from(
        &self,
        child_namespace: &str,
        child_key: &str,
        tag: &str,
    ) -> impl Future<Output = Result<Vec<Link>, Error>> + Send;
}

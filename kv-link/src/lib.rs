//! 基于支持链接遍历的 KV 存储的关联索引
//!
//! [`Association`] 描述 owner 实体到 child 实体的关系。[`LinkAssociationIndexer`]
//! 把它记录为从每个 child 记录指向 owner 的链接，tag 为关联名；读取关联即从 owner 出发遍历链接。

extern crate self as kv_link;

mod config;
mod conversion;
mod entity;
mod error;
mod indexer;
mod link;
mod memory;
mod store;
mod tikv;
mod utils;

pub use config::{Config, PD_ENDPOINTS_VAR, SCAN_PAGE_SIZE_VAR};
pub use conversion::{FnConversion, IdentityConversion, KeyConversion};
pub use entity::{
    Association, EntityMeta, KvEntity, PersistentEntity, all_entities, entity_by_namespace,
};
pub use error::Error;
pub use indexer::{AssociationIndexer, LinkAssociationIndexer};
pub use kv_link_derive::KvEntity;
pub use link::Link;
pub use memory::MemoryLinkStore;
pub use store::LinkStore;
pub use tikv::TikvLinkStore;

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}

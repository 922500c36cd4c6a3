use std::collections::HashMap;

use crate::Error;

/// KvEntity trait 描述一个可被关联索引的实体类型
pub trait KvEntity {
    /// 返回类型的完整路径
    fn type_path() -> &'static str;

    /// 返回实体在存储中的命名空间 (bucket)
    fn namespace() -> &'static str;
}

// 定义实体元信息
pub struct EntityMeta {
    pub type_path: &'static str,
    pub namespace: &'static str,
}

impl std::fmt::Debug for EntityMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EntityMeta {{ type_path: {}, namespace: {} }}",
            self.type_path, self.namespace
        )
    }
}

// 使用 inventory 收集所有实体
inventory::collect!(EntityMeta);

/// 所有通过 `#[derive(KvEntity)]` 注册的实体, type_path -> namespace
pub fn all_entities() -> HashMap<&'static str, &'static str> {
    inventory::iter::<EntityMeta>()
        .map(|meta| (meta.type_path, meta.namespace))
        .collect()
}

pub fn entity_by_namespace(namespace: &str) -> Option<PersistentEntity> {
    inventory::iter::<EntityMeta>()
        .find(|meta| meta.namespace == namespace)
        .map(|meta| PersistentEntity::new(meta.type_path, meta.namespace))
}

/// 实体类型元信息: 名称以及记录所在的命名空间
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PersistentEntity {
    name: String,
    namespace: String,
}

impl PersistentEntity {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// 名称与命名空间相同的实体
    pub fn named(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            name: namespace.clone(),
            namespace,
        }
    }

    pub fn of<T: KvEntity>() -> Self {
        Self::new(T::type_path(), T::namespace())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// 从 owner 实体指向关联 (child) 实体的具名有向关系，名称同时作为链接的 tag
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Association {
    name: String,
    owner: PersistentEntity,
    child: PersistentEntity,
}

impl Association {
    pub fn new(name: impl Into<String>, owner: PersistentEntity, child: PersistentEntity) -> Self {
        Self {
            name: name.into(),
            owner,
            child,
        }
    }

    pub fn between<O: KvEntity, C: KvEntity>(name: impl Into<String>) -> Self {
        Self::new(name, PersistentEntity::of::<O>(), PersistentEntity::of::<C>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &PersistentEntity {
        &self.owner
    }

    pub fn associated_entity(&self) -> &PersistentEntity {
        &self.child
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::InvalidAssociation(
                "association name must not be empty".to_string(),
            ));
        }
        if self.owner.namespace.is_empty() {
            return Err(Error::InvalidAssociation(format!(
                "owner entity of '{}' has no namespace",
                self.name
            )));
        }
        if self.child.namespace.is_empty() {
            return Err(Error::InvalidAssociation(format!(
                "associated entity of '{}' has no namespace",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(crate::KvEntity)]
    #[kv_entity(namespace = "customer")]
    struct Customer;

    #[derive(crate::KvEntity)]
    struct OrderLine;

    #[test]
    fn derived_entities_carry_namespace() {
        assert_eq!(Customer::namespace(), "customer");
        assert_eq!(OrderLine::namespace(), "order_line");
        assert!(Customer::type_path().ends_with("::Customer"));
    }

    #[test]
    fn derived_entities_are_registered() {
        let entities = all_entities();
        assert_eq!(entities.get(OrderLine::type_path()), Some(&"order_line"));

        let found = entity_by_namespace("customer").unwrap();
        assert_eq!(found, PersistentEntity::of::<Customer>());
        assert!(entity_by_namespace("no_such_bucket").is_none());
    }

    #[test]
    fn association_between_types() {
        let association = Association::between::<Customer, OrderLine>("lines");
        assert_eq!(association.name(), "lines");
        assert_eq!(association.owner().namespace(), "customer");
        assert_eq!(association.associated_entity().namespace(), "order_line");
        assert!(association.validate().is_ok());
    }

    #[test]
    fn association_without_namespace_is_invalid() {
        let association = Association::new(
            "orders",
            PersistentEntity::named("customer"),
            PersistentEntity::new("Order", ""),
        );
        assert!(matches!(
            association.validate(),
            Err(Error::InvalidAssociation(_))
        ));

        let unnamed = Association::new(
            "",
            PersistentEntity::named("customer"),
            PersistentEntity::named("order"),
        );
        assert!(matches!(
            unnamed.validate(),
            Err(Error::InvalidAssociation(_))
        ));
    }
}

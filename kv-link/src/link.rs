/// 从 child 记录指向 owner 记录的带 tag 有向边
///
/// 同时也是 TiKV 中两个链接 key 下保存的值
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Link {
    #[prost(string, tag = "1")]
    pub tag: ::prost::alloc::string::String,

    #[prost(string, tag = "2")]
    pub child_namespace: ::prost::alloc::string::String,

    #[prost(string, tag = "3")]
    pub child_key: ::prost::alloc::string::String,

    #[prost(string, tag = "4")]
    pub owner_namespace: ::prost::alloc::string::String,

    #[prost(string, tag = "5")]
    pub owner_key: ::prost::alloc::string::String,
}

impl Link {
    pub fn new(
        child_namespace: impl Into<String>,
        child_key: impl Into<String>,
        owner_namespace: impl Into<String>,
        owner_key: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            child_namespace: child_namespace.into(),
            child_key: child_key.into(),
            owner_namespace: owner_namespace.into(),
            owner_key: owner_key.into(),
        }
    }
}

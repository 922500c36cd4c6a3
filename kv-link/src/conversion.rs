/// KeyConversion 在映射层的 key 与存储中的 key 之间转换
///
/// `from_store_key` 必须是 `to_store_key` 的逆，`query` 才能返回写入时的原始 key
pub trait KeyConversion: Send + Sync {
    fn to_store_key(&self, key: &str) -> String;

    fn from_store_key(&self, key: &str) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityConversion;

impl KeyConversion for IdentityConversion {
    fn to_store_key(&self, key: &str) -> String {
        key.to_string()
    }

    fn from_store_key(&self, key: &str) -> String {
        key.to_string()
    }
}

/// 由一对函数组成的转换: `to` 写入前调用, `from` 读出后调用
#[derive(Clone, Copy)]
pub struct FnConversion<T, F> {
    to: T,
    from: F,
}

impl<T, F> FnConversion<T, F>
where
    T: Fn(&str) -> String + Send + Sync,
    F: Fn(&str) -> String + Send + Sync,
{
    pub fn new(to: T, from: F) -> Self {
        Self { to, from }
    }
}

impl<T, F> KeyConversion for FnConversion<T, F>
where
    T: Fn(&str) -> String + Send + Sync,
    F: Fn(&str) -> String + Send + Sync,
{
    fn to_store_key(&self, key: &str) -> String {
        (self.to)(key)
    }

    fn from_store_key(&self, key: &str) -> String {
        (self.from)(key)
    }
}

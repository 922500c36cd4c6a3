use tikv_client::Key;

use crate::{Error, Link};

/// 紧随 `key` 之后的最小 key，用于分页扫描续传
pub(crate) fn next_key(key: &Key) -> Key {
    let mut next_key = Into::<Vec<u8>>::into(key.clone());
    next_key.push(0);
    Key::from(next_key)
}

/// 以 `/` 结尾的前缀对应的扫描上界
pub(crate) fn prefix_end(prefix: &str) -> String {
    match prefix.strip_suffix('/') {
        Some(head) => format!("{}0", head),
        None => format!("{}\u{0}", prefix),
    }
}

// key 段内不能出现裸的 `/`
pub(crate) fn escape_segment(segment: &str) -> String {
    segment.replace('%', "%25").replace('/', "%2F")
}

pub(crate) fn link_to_prefix(owner_namespace: &str, owner_key: &str, tag: &str) -> String {
    format!(
        "link/to/{}/{}/{}/",
        escape_segment(owner_namespace),
        escape_segment(owner_key),
        escape_segment(tag)
    )
}

pub(crate) fn link_from_prefix(child_namespace: &str, child_key: &str, tag: &str) -> String {
    format!(
        "link/from/{}/{}/{}/",
        escape_segment(child_namespace),
        escape_segment(child_key),
        escape_segment(tag)
    )
}

pub(crate) fn link_to_path(
    owner_namespace: &str,
    owner_key: &str,
    tag: &str,
    child_namespace: &str,
    child_key: &str,
) -> String {
    format!(
        "{}{}/{}",
        link_to_prefix(owner_namespace, owner_key, tag),
        escape_segment(child_namespace),
        escape_segment(child_key)
    )
}

pub(crate) fn link_from_path(
    child_namespace: &str,
    child_key: &str,
    tag: &str,
    owner_namespace: &str,
    owner_key: &str,
) -> String {
    format!(
        "{}{}/{}",
        link_from_prefix(child_namespace, child_key, tag),
        escape_segment(owner_namespace),
        escape_segment(owner_key)
    )
}

/// 正向 (owner 下) 和反向 (child 下) 两个 key
pub(crate) fn link_paths(link: &Link) -> [String; 2] {
    [
        link_to_path(
            &link.owner_namespace,
            &link.owner_key,
            &link.tag,
            &link.child_namespace,
            &link.child_key,
        ),
        link_from_path(
            &link.child_namespace,
            &link.child_key,
            &link.tag,
            &link.owner_namespace,
            &link.owner_key,
        ),
    ]
}

pub(crate) fn check_key(kind: &str, key: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::InvalidKey(format!("{} key must not be empty", kind)));
    }
    Ok(())
}

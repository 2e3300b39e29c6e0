use super::{EntityNode, FlatRecord, VALUE_KEY};

const SEPARATOR: char = '_';

/// Structural problems that prevent an entity tree from being flattened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlattenError {
    #[error("list element '{path}' is a bare scalar; list elements must be value, group, or list nodes")]
    ScalarInList { path: String },
}

/// Flatten a group of named entity fields into a single-level record.
///
/// Keys are the `_`-joined path of field names and list positions leading to each terminal,
/// with value nodes contributing a trailing `value` segment. Output order is depth-first.
///
/// # Errors
///
/// Fails if a list contains a bare scalar element.
pub fn flatten(fields: &[(String, EntityNode)]) -> Result<FlatRecord, FlattenError> {
    let mut record = FlatRecord::new();
    flatten_group(fields, "", &mut record)?;
    Ok(record)
}

fn flatten_group(fields: &[(String, EntityNode)], prefix: &str, out: &mut FlatRecord) -> Result<(), FlattenError> {
    for (key, node) in fields {
        let path = join(prefix, key);
        match node {
            EntityNode::Scalar(s) => out.insert(path, s.clone()),
            other => flatten_structured(other, &path, out)?,
        }
    }
    Ok(())
}

fn flatten_structured(node: &EntityNode, path: &str, out: &mut FlatRecord) -> Result<(), FlattenError> {
    match node {
        EntityNode::Value(s) => out.insert(join(path, VALUE_KEY), s.clone()),
        EntityNode::Group(fields) => flatten_group(fields, path, out)?,
        EntityNode::List(items) => {
            for (i, item) in items.iter().enumerate() {
                let item_path = join(path, &i.to_string());
                if matches!(item, EntityNode::Scalar(_)) {
                    return Err(FlattenError::ScalarInList { path: item_path });
                }
                flatten_structured(item, &item_path, out)?;
            }
        }
        EntityNode::Scalar(s) => out.insert(path, s.clone()),
    }
    Ok(())
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        let mut path = String::with_capacity(prefix.len() + key.len() + 1);
        path.push_str(prefix);
        path.push(SEPARATOR);
        path.push_str(key);
        path
    }
}

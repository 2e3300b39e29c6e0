use super::Scalar;
use serde_json::Value;

/// Reserved key marking a mapping as a value node.
pub const VALUE_KEY: &str = "value";

/// A node of a document's entity tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityNode {
    /// A mapping carrying [`VALUE_KEY`]. Sibling keys such as confidence scores are not kept.
    Value(Scalar),

    /// A mapping of named sub-fields, in source order.
    Group(Vec<(String, Self)>),

    /// An ordered sequence of sub-fields.
    List(Vec<Self>),

    /// A bare terminal value.
    Scalar(Scalar),
}

impl EntityNode {
    /// Classify a JSON value into the entity node shape it represents.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(mut map) => match map.remove(VALUE_KEY) {
                Some(v) => Self::Value(Scalar::from_json(v)),
                None => Self::Group(map.into_iter().map(|(k, v)| (k, Self::from_json(v))).collect()),
            },
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            other => Self::Scalar(Scalar::from_json(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_node_drops_siblings() {
        let node = EntityNode::from_json(json!({"value": "INV-1", "confidence": 0.93, "source": "ocr"}));
        assert_eq!(node, EntityNode::Value(Scalar::from("INV-1")));
    }

    #[test]
    fn test_group_keeps_source_order() {
        let node = EntityNode::from_json(json!({"zeta": 1, "alpha": {"value": 2}}));
        let EntityNode::Group(fields) = node else {
            panic!("expected a group node");
        };
        let names: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(fields[1].1, EntityNode::Value(Scalar::from(2)));
    }

    #[test]
    fn test_list_and_scalar() {
        let node = EntityNode::from_json(json!([{"value": 1}, "loose"]));
        assert_eq!(
            node,
            EntityNode::List(vec![EntityNode::Value(Scalar::from(1)), EntityNode::Scalar(Scalar::from("loose"))])
        );
    }

    #[test]
    fn test_null_value_is_still_a_value_node() {
        assert_eq!(EntityNode::from_json(json!({"value": null})), EntityNode::Value(Scalar::Null));
    }
}

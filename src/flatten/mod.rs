//! Flattening of nested document entities into tabular records
//!
//! Extracted entities come back from the API as a tree: value nodes carrying a terminal under the
//! reserved `value` key, groups of named sub-fields, lists of sub-fields, and bare scalars. The
//! [`flatten`] function walks such a tree depth-first and produces a [`FlatRecord`] whose keys are
//! the `_`-joined paths to each terminal, e.g. `totals_0_net_value`.
//!
//! JSON is classified into [`EntityNode`] shapes up front so that the walk itself is an exhaustive
//! match rather than a series of runtime type checks.

mod entity_node;
mod flat_record;
mod flattener;
mod scalar;

pub use entity_node::{EntityNode, VALUE_KEY};
pub use flat_record::FlatRecord;
pub use flattener::{FlattenError, flatten};
pub use scalar::Scalar;

//! Resolution Info - Position and context of one query-tree node

use std::fmt;
use std::sync::Arc;

use arbor_core::RequestContext;

use crate::loading::TreeLocationKey;

/// One step of a resolution path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named field
    Field(String),
    /// A position within a list value
    Index(usize),
}

/// Metadata for one node of the query tree: the field being resolved, the
/// path from the root, and the request context.
#[derive(Clone)]
pub struct ResolutionInfo {
    field_name: String,
    path: Vec<PathSegment>,
    context: Arc<RequestContext>,
}

impl ResolutionInfo {
    /// Info for a root-level field
    pub fn root(field_name: impl Into<String>, context: Arc<RequestContext>) -> Self {
        let field_name = field_name.into();
        Self {
            path: vec![PathSegment::Field(field_name.clone())],
            field_name,
            context,
        }
    }

    /// Info for a child field one level deeper
    pub fn descend_field(&self, field_name: impl Into<String>) -> Self {
        let field_name = field_name.into();
        let mut path = self.path.clone();
        path.push(PathSegment::Field(field_name.clone()));
        Self {
            field_name,
            path,
            context: Arc::clone(&self.context),
        }
    }

    /// Info for one item of a list-valued node. The item keeps its parent's
    /// field name; only the position is recorded.
    pub fn descend_index(&self, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(PathSegment::Index(index));
        Self {
            field_name: self.field_name.clone(),
            path,
            context: Arc::clone(&self.context),
        }
    }

    /// Name of the field being resolved
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Path from the query root to this node
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// The surrounding request context
    pub fn context(&self) -> &Arc<RequestContext> {
        &self.context
    }

    /// Identity of this field position for loader lookup: the string
    /// segments of the path. List positions are dropped, so sibling items
    /// of one list (and pages over the same field) share a loader.
    pub fn tree_location(&self) -> TreeLocationKey {
        TreeLocationKey::new(
            self.path
                .iter()
                .filter_map(|segment| match segment {
                    PathSegment::Field(name) => Some(name.clone()),
                    PathSegment::Index(_) => None,
                })
                .collect(),
        )
    }
}

impl fmt::Debug for ResolutionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionInfo")
            .field("field_name", &self.field_name)
            .field("path", &self.path)
            .field("request_id", &self.context.request_id())
            .finish()
    }
}

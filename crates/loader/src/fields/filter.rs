//! Filter Set - Boundary to the filter-predicate subsystem

use serde_json::Value;

use crate::error::LoaderResult;
use crate::query::QueryBuilder;
use crate::resolver::ResolutionInfo;

/// Pluggable predicate bundle for one entity type.
///
/// `apply` must be a pure narrowing transformation: the returned query
/// covers the same entity with equal or fewer rows. Failures propagate to
/// the caller unchanged (wrap foreign errors in `LoaderError::External`).
pub trait FilterSet: Send + Sync {
    fn apply(
        &self,
        info: &ResolutionInfo,
        query: QueryBuilder,
        raw_filters: &Value,
    ) -> LoaderResult<QueryBuilder>;
}

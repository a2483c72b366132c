//! Query construction and filtering API for document stores.
//!
//! This module provides type-safe query construction with filtering, sorting, result
//! limiting, field projection, and a visitor pattern for query execution across
//! different backends.
//!
//! # Query Building
//!
//! Queries can be constructed using the fluent builder API:
//!
//! ```ignore
//! use rosterdb::query::{Query, Filter, SortDirection};
//!
//! let query = Query::builder()
//!     .filter(Filter::contains("favoriteFoods", "burritos"))
//!     .sort("name", SortDirection::Asc)
//!     .limit(2)
//!     .exclude(["age"])
//!     .build();
//! ```
//!
//! # Filter Expression API
//!
//! The [`Filter`] struct provides a collection of static methods for building filter expressions:
//!
//! - Comparison: `eq`, `ne`
//! - Array: `contains`
//! - Logical: `and`, `or`
//!
//! Expressions can be combined using chainable methods for more complex queries.

use bson::Bson;

use crate::error::StoreError;

/// Sort direction for query results.
#[derive(Debug, Clone)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

/// Sort specification for query results.
///
/// Specifies which field to sort by and in which direction.
#[derive(Debug, Clone)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to.
    Ne,
    /// Array contains an element equal to the value.
    Contains,
}

/// A filter expression for querying documents.
///
/// Expressions can be combined using logical operators (`And`, `Or`)
/// to build complex filter predicates.
///
/// # Example
///
/// ```ignore
/// use rosterdb::query::{Expr, Filter, FieldOp};
///
/// // Simple equality check
/// let expr1 = Filter::eq("name", "Alice");
///
/// // Complex nested expression
/// let expr2 = Filter::and(vec![
///     Filter::eq("name", "Alice"),
///     Filter::contains("favoriteFoods", "sushi")
/// ]);
/// ```
#[derive(Debug, Clone)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    ///
    /// If this expression is already an OR, the other expression is appended
    /// to the list. Otherwise, a new OR expression is created.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }
}

/// Field projection for query results.
///
/// Lists fields to exclude from returned documents. An empty projection
/// returns documents unchanged.
///
/// # Example
///
/// ```ignore
/// use rosterdb::query::Projection;
///
/// let projection = Projection::exclude(["age"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Projection {
    /// Field names stripped from every returned document.
    pub excluded: Vec<String>,
}

impl Projection {
    /// Creates a projection that excludes the given fields from results.
    pub fn exclude(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Projection {
            excluded: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if this projection excludes nothing.
    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }
}

/// An ordered set-style update patch.
///
/// Each entry assigns a new value to a top-level field. Fields not named in
/// the patch are left untouched; later entries for the same field win.
///
/// # Example
///
/// ```ignore
/// use rosterdb::query::Update;
///
/// let update = Update::new().set("age", 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Update {
    /// Field assignments applied in order.
    pub sets: Vec<(String, Bson)>,
}

impl Update {
    /// Creates an empty update patch.
    pub fn new() -> Self {
        Update::default()
    }

    /// Adds a field assignment to this patch.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.sets.push((field.into(), value.into()));
        self
    }

    /// Returns `true` if this patch assigns nothing.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// A structured query for retrieving and filtering documents.
///
/// This struct encapsulates filters, sort specifications, result limits, and
/// field projections for document queries. Use [`QueryBuilder`] for ergonomic
/// construction. Backends apply the parts in a fixed order: filter, then sort,
/// then limit, then projection.
///
/// # Example
///
/// ```ignore
/// use rosterdb::query::{Query, Filter, SortDirection};
///
/// let query = Query::builder()
///     .filter(Filter::eq("name", "Alice"))
///     .sort("name", SortDirection::Asc)
///     .limit(10)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Sort specification for results.
    pub sort: Option<Sort>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Fields excluded from returned documents.
    pub projection: Projection,
}

impl Query {
    /// Creates a new empty query with no filters or limits.
    pub fn new() -> Self {
        Query {
            filter: None,
            sort: None,
            limit: None,
            projection: Projection::default(),
        }
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Helper struct for constructing filter expressions.
///
/// Provides static methods to construct common filter expressions in a type-safe manner.
/// All methods accept field names and values as `Into<String>` and `Into<Bson>` for ergonomics.
///
/// # Example
///
/// ```ignore
/// use rosterdb::query::Filter;
///
/// let expr = Filter::eq("name", "Alice")
///     .and(Filter::contains("favoriteFoods", "sushi"));
/// ```
pub struct Filter;

impl Filter {
    /// Creates an equality filter expression.
    ///
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Creates a not-equal filter expression.
    ///
    /// Matches documents where the field does not equal the specified value.
    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Ne, value.into())
    }

    /// Creates an array membership filter expression.
    ///
    /// Matches documents where the array field holds an element equal to the
    /// specified value. Fields that are not arrays never match.
    pub fn contains(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Contains, value.into())
    }

    /// Creates a logical AND filter expression.
    ///
    /// Combines multiple expressions such that all must match for a document to be included.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Creates a logical OR filter expression.
    ///
    /// Combines multiple expressions such that any can match for a document to be included.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter expression to apply
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the sort specification for the query results.
    ///
    /// # Arguments
    ///
    /// * `field` - The field name to sort by
    /// * `direction` - The sort direction (ascending or descending)
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort { field: field.into(), direction });
        self
    }

    /// Sets the maximum number of documents to return.
    ///
    /// # Arguments
    ///
    /// * `limit` - The maximum number of documents to return
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Excludes the given fields from every returned document.
    ///
    /// # Arguments
    ///
    /// * `fields` - The field names to strip from results
    pub fn exclude(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.query.projection = Projection::exclude(fields);
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        QueryBuilder::new()
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<StoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_combinator_flattens_into_existing_list() {
        let expr = Filter::eq("name", "Alice")
            .and(Filter::eq("age", 28))
            .and(Filter::contains("favoriteFoods", "sushi"));

        match expr {
            Expr::And(list) => assert_eq!(list.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn or_combinator_flattens_into_existing_list() {
        let expr = Filter::eq("name", "John")
            .or(Filter::eq("name", "Mary"))
            .or(Filter::eq("name", "Alice"));

        match expr {
            Expr::Or(list) => assert_eq!(list.len(), 3),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn builder_collects_all_parts() {
        let query = Query::builder()
            .filter(Filter::contains("favoriteFoods", "burritos"))
            .sort("name", SortDirection::Asc)
            .limit(2)
            .exclude(["age"])
            .build();

        assert!(query.filter.is_some());
        assert!(matches!(
            query.sort,
            Some(Sort { ref field, direction: SortDirection::Asc }) if field == "name"
        ));
        assert_eq!(query.limit, Some(2));
        assert_eq!(query.projection.excluded, vec!["age".to_string()]);
    }

    #[test]
    fn empty_query_has_no_constraints() {
        let query = Query::new();
        assert!(query.filter.is_none());
        assert!(query.sort.is_none());
        assert!(query.limit.is_none());
        assert!(query.projection.is_empty());
    }

    #[test]
    fn update_preserves_assignment_order() {
        let update = Update::new().set("age", 20).set("name", "Mary").set("age", 31);

        let fields: Vec<&str> = update.sets.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(fields, vec!["age", "name", "age"]);
    }

    #[test]
    fn empty_update_reports_empty() {
        assert!(Update::new().is_empty());
        assert!(!Update::new().set("age", 1).is_empty());
    }
}

//! Query translation from rosterdb AST to MongoDB query syntax.
//!
//! This module translates rosterdb's abstract query expressions, sorts,
//! projections, and update patches into MongoDB BSON documents for execution
//! by the MongoDB query engine.

use bson::{Bson, Document, doc};

use rosterdb_core::{
    error::StoreError,
    query::{Expr, FieldOp, Projection, QueryVisitor, Sort, SortDirection, Update},
};

/// Translates rosterdb query expressions into MongoDB query documents.
///
/// This struct implements the [`QueryVisitor`] trait to convert abstract
/// query expressions into MongoDB's native BSON query syntax.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// Translates a sort specification into a MongoDB sort document.
    pub(crate) fn sort_document(sort: &Sort) -> Document {
        doc! {
            sort.field.clone(): match sort.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            }
        }
    }

    /// Translates a projection into a MongoDB exclusion projection document.
    ///
    /// Returns `None` for the empty projection, so callers can skip setting
    /// the option entirely.
    pub(crate) fn projection_document(projection: &Projection) -> Option<Document> {
        if projection.is_empty() {
            return None;
        }

        Some(
            projection
                .excluded
                .iter()
                .map(|field| (field.clone(), Bson::Int32(0)))
                .collect::<Document>(),
        )
    }

    /// Translates an update patch into a MongoDB `$set` update document.
    pub(crate) fn update_document(update: &Update) -> Document {
        doc! {
            "$set": update
                .sets
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect::<Document>(),
        }
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = StoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(match op {
            FieldOp::Eq => doc! { field: { "$eq": value } },
            FieldOp::Ne => doc! { field: { "$ne": value } },
            // A bare value matched against an array field selects documents
            // whose array holds an element equal to it
            FieldOp::Contains => doc! { field: value },
        })
    }
}

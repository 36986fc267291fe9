//! Brute-force cosine search.
//!
//! Rows are stored as variable-length `FLOAT[]`; the query casts both sides to
//! `FLOAT[{dim}]` for `array_cosine_similarity()` and skips rows of any other
//! length so a model switch cannot poison a query.

use inbox_core::enums::SenderType;

use crate::store::DocumentKind;
use crate::{LakeError, VectorLake, vec_to_sql};

/// Optional restrictions on a vector search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorFilter {
    pub sender_type: Option<SenderType>,
    pub kind: Option<DocumentKind>,
}

impl VectorFilter {
    #[must_use]
    pub const fn sender(sender_type: Option<SenderType>) -> Self {
        Self {
            sender_type,
            kind: None,
        }
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// One nearest-neighbour match. `distance` is `1 - cosine`, so lower is closer.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub id: String,
    pub text: String,
    pub distance: f64,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl VectorLake {
    /// Up to `k` closest documents to `query`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::Dimension`] for an empty query and
    /// [`LakeError::DuckDb`] if the scan fails.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: &VectorFilter,
    ) -> Result<Vec<VectorHit>, LakeError> {
        if query.is_empty() {
            return Err(LakeError::Dimension("query embedding is empty".into()));
        }
        if k == 0 {
            return Ok(Vec::new());
        }
        let dim = query.len();
        let query_sql = vec_to_sql(query);

        let mut where_clauses = vec![format!("len(embedding) = {dim}")];
        let mut param_values: Vec<Box<dyn duckdb::ToSql>> = Vec::new();
        if let Some(st) = filter.sender_type {
            where_clauses.push("sender_type = ?".to_string());
            param_values.push(Box::new(st.as_str().to_string()));
        }
        if let Some(kind) = filter.kind {
            where_clauses.push("kind = ?".to_string());
            param_values.push(Box::new(kind.as_str().to_string()));
        }
        let where_sql = where_clauses.join(" AND ");

        let sql = format!(
            "SELECT id, text, metadata,
                    (1.0 - array_cosine_similarity(embedding::FLOAT[{dim}], '{query_sql}'::FLOAT[{dim}]))::DOUBLE AS distance
             FROM vectors
             WHERE {where_sql}
             ORDER BY distance ASC, id ASC
             LIMIT {k}"
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn duckdb::ToSql> =
            param_values.iter().map(AsRef::as_ref).collect();

        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<f64>>(3)?,
            ))
        })?;

        let mut hits = Vec::new();
        for row in rows {
            let (id, text, metadata, distance) = row?;
            // Zero-norm rows come back NULL or NaN.
            let Some(distance) = distance.filter(|d| d.is_finite()) else {
                tracing::debug!(%id, "skipping vector with undefined cosine");
                continue;
            };
            hits.push(VectorHit {
                id,
                text,
                distance,
                metadata: serde_json::from_str(&metadata)?,
            });
        }
        Ok(hits)
    }
}

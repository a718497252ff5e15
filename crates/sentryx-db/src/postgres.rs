//! PostgreSQL document store.
//!
//! One table, `(id TEXT PRIMARY KEY, body JSONB NOT NULL)`. Stage predicates
//! become JSONB conditions; a partial update is a single
//! `body = (body - unset) || set` statement, so each document changes
//! all-or-nothing.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};

use crate::document::{Document, FieldUpdate};
use crate::error::{DbError, Result};
use crate::query::{sort_groups, DocumentQuery, GroupCount, NumericSummary, StageFilter};
use crate::store::DocumentStore;

/// PostgreSQL-backed store.
pub struct PgDocumentStore {
    client: Client,
    table: String,
}

impl PgDocumentStore {
    /// Connect and spawn the connection driver task.
    pub async fn connect(url: &str, table: &str) -> Result<Self> {
        validate_identifier(table)?;
        let (client, connection) = tokio_postgres::connect(url, NoTls)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("Postgres connection closed: {}", e);
            }
        });

        info!(table = table, "Connected to Postgres document store");
        Ok(Self { client, table: table.to_string() })
    }

    /// Create the documents table if it doesn't exist.
    pub async fn initialize(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, body JSONB NOT NULL)",
            self.table
        );
        self.client.batch_execute(&sql).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, query: &DocumentQuery) -> Result<Vec<Document>> {
        let exclude: Vec<String> = query.exclude.iter().cloned().collect();
        let limit = query.limit as i64;
        let skip = query.skip as i64;
        let sql = format!(
            "SELECT id, body FROM {} WHERE {} AND NOT (id = ANY($1)) ORDER BY id LIMIT $2 OFFSET $3",
            self.table,
            where_clause(&query.filter)
        );
        let rows = self.client.query(sql.as_str(), &[&exclude, &limit, &skip]).await?;

        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get(0);
            let body: Value = row.get(1);
            let fields = match body {
                Value::Object(map) => map,
                other => {
                    debug!(doc_id = %id, "Non-object body, wrapping as text");
                    let mut map = Map::new();
                    map.insert(crate::document::TEXT_FIELD.to_string(), other);
                    map
                }
            };
            docs.push(Document { id, fields });
        }
        Ok(docs)
    }

    async fn update_one(&self, id: &str, update: &FieldUpdate) -> Result<bool> {
        let sql = format!(
            "UPDATE {} SET body = (body - $2::text[]) || $3::jsonb WHERE id = $1",
            self.table
        );
        let set = Value::Object(update.set.clone());
        let n = self.client.execute(sql.as_str(), &[&id, &update.unset, &set]).await?;
        Ok(n > 0)
    }

    async fn update_many(&self, filter: &StageFilter, update: &FieldUpdate) -> Result<u64> {
        let sql = format!(
            "UPDATE {t} SET body = (body - $1::text[]) || $2::jsonb \
             WHERE {w} AND ((body - $1::text[]) || $2::jsonb) IS DISTINCT FROM body",
            t = self.table,
            w = where_clause(filter)
        );
        let set = Value::Object(update.set.clone());
        Ok(self.client.execute(sql.as_str(), &[&update.unset, &set]).await?)
    }

    async fn count(&self, filter: &StageFilter) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {}", self.table, where_clause(filter));
        let row = self.client.query_one(sql.as_str(), &[]).await?;
        let n: i64 = row.get(0);
        Ok(n as u64)
    }

    async fn aggregate(&self, filter: &StageFilter, group_by: &str) -> Result<Vec<GroupCount>> {
        let path = json_path(group_by)?;
        let sql = format!(
            "SELECT body #>> $1::text[] AS key, COUNT(*) FROM {} WHERE {} GROUP BY 1",
            self.table,
            where_clause(filter)
        );
        let params: [&(dyn ToSql + Sync); 1] = [&path];
        let rows = self.client.query(sql.as_str(), &params).await?;
        let mut groups: Vec<GroupCount> = rows
            .iter()
            .map(|row| {
                let key: Option<String> = row.get(0);
                let count: i64 = row.get(1);
                GroupCount { key, count: count as u64 }
            })
            .collect();
        sort_groups(&mut groups);
        Ok(groups)
    }

    async fn numeric_summary(
        &self,
        filter: &StageFilter,
        path: &str,
    ) -> Result<Option<NumericSummary>> {
        let path = json_path(path)?;
        let sql = format!(
            "SELECT COUNT(*), MIN(v), MAX(v), AVG(v) FROM ( \
                SELECT (body #>> $1::text[])::float8 AS v FROM {} \
                WHERE {} AND jsonb_typeof(body #> $1::text[]) = 'number' \
             ) s",
            self.table,
            where_clause(filter)
        );
        let row = self.client.query_one(sql.as_str(), &[&path]).await?;
        let count: i64 = row.get(0);
        if count == 0 {
            return Ok(None);
        }
        let min: Option<f64> = row.get(1);
        let max: Option<f64> = row.get(2);
        let mean: Option<f64> = row.get(3);
        Ok(Some(NumericSummary {
            count: count as u64,
            min: min.unwrap_or_default(),
            max: max.unwrap_or_default(),
            mean: mean.unwrap_or_default(),
        }))
    }

    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize> {
        let sql = format!(
            "INSERT INTO {} (id, body) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
            self.table
        );
        let stmt = self.client.prepare(sql.as_str()).await?;
        let mut inserted = 0;
        for doc in docs {
            if !doc.has_identity() {
                return Err(DbError::InvalidQuery("cannot insert a document without identity".into()));
            }
            let body = Value::Object(doc.fields);
            inserted += self.client.execute(&stmt, &[&doc.id, &body]).await? as usize;
        }
        debug!("insert_many: inserted {} documents", inserted);
        Ok(inserted)
    }
}

/// SQL condition for a stage filter. Only fixed field names are interpolated.
pub fn where_clause(filter: &StageFilter) -> String {
    let mut conditions = vec!["TRUE".to_string()];
    for stage in &filter.completed {
        conditions.push(format!("(body->'{}') = 'true'::jsonb", stage.flag_field()));
    }
    if let Some(stage) = filter.pending {
        conditions.push(format!(
            "(body->'{}') IS DISTINCT FROM 'true'::jsonb",
            stage.flag_field()
        ));
    }
    conditions.join(" AND ")
}

fn json_path(dotted: &str) -> Result<Vec<String>> {
    let parts: Vec<String> = dotted.split('.').map(str::to_string).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(DbError::InvalidQuery(format!("bad field path: {dotted:?}")));
    }
    Ok(parts)
}

fn validate_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidQuery(format!("invalid table name: {name:?}")))
    }
}

//! Decision repository.
//!
//! Decisions are append-only. Recording one inserts the row, links its
//! precedents, and projects it into the graph in one transaction. The JSONL
//! trail is appended only after that commit succeeds; if the append fails,
//! the committed rows are removed again so store and trail agree.

use std::collections::HashSet;

use inbox_core::entities::{ActionTone, ContextUsed, Decision, Message, NewDecision, PrecedentLink};
use inbox_core::enums::SenderType;
use inbox_core::ids::PREFIX_DECISION;

use crate::error::DatabaseError;
use crate::helpers::{
    format_timestamp, now_utc, order_by_ids, parse_datetime, parse_value, placeholders,
};
use crate::repos::message::{MESSAGE_COLUMNS, row_to_message};
use crate::service::InboxService;

pub(crate) const DECISION_COLUMNS: &str = "d.id, d.message_id, d.agent_action, d.agent_tone, d.human_action, d.human_tone, d.context_sender_type, d.similar_decisions, d.why, d.created_at";

/// Column count of `DECISION_COLUMNS`, for joined rows.
const DECISION_WIDTH: i32 = 10;

pub(crate) fn row_to_decision(row: &libsql::Row, base: i32) -> Result<Decision, DatabaseError> {
    let similar: Vec<String> = serde_json::from_str(&row.get::<String>(base + 7)?)?;
    Ok(Decision {
        id: row.get::<String>(base)?,
        message_id: row.get::<String>(base + 1)?,
        agent_suggestion: ActionTone {
            action: parse_value(&row.get::<String>(base + 2)?)?,
            tone: parse_value(&row.get::<String>(base + 3)?)?,
        },
        human_action: ActionTone {
            action: parse_value(&row.get::<String>(base + 4)?)?,
            tone: parse_value(&row.get::<String>(base + 5)?)?,
        },
        context_used: ContextUsed {
            sender_type: SenderType::parse_lossy(&row.get::<String>(base + 6)?),
            similar_decisions: similar,
        },
        why: row.get::<String>(base + 8)?,
        created_at: parse_datetime(&row.get::<String>(base + 9)?)?,
    })
}

pub(crate) async fn insert_decision_row(
    conn: &libsql::Connection,
    decision: &Decision,
) -> Result<(), DatabaseError> {
    let similar = serde_json::to_string(&decision.context_used.similar_decisions)?;
    conn.execute(
        "INSERT INTO decisions (id, message_id, agent_action, agent_tone, human_action, human_tone, context_sender_type, similar_decisions, why, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        libsql::params![
            decision.id.as_str(),
            decision.message_id.as_str(),
            decision.agent_suggestion.action.as_str(),
            decision.agent_suggestion.tone.as_str(),
            decision.human_action.action.as_str(),
            decision.human_action.tone.as_str(),
            decision.context_used.sender_type.as_str(),
            similar,
            decision.why.as_str(),
            format_timestamp(&decision.created_at)
        ],
    )
    .await?;
    Ok(())
}

impl InboxService {
    /// Record a human decision on a message.
    ///
    /// The message must exist. Precedent ids in `context_used` that do not
    /// resolve to an earlier decision are kept in the record but not linked.
    pub async fn record_decision(&self, new: NewDecision) -> Result<Decision, DatabaseError> {
        let message = self.get_message(&new.message_id).await?;
        let id = self.db().generate_id(PREFIX_DECISION).await?;
        let decision = Decision {
            id,
            message_id: new.message_id,
            agent_suggestion: new.agent_suggestion,
            human_action: new.human_action,
            context_used: new.context_used,
            why: new.why,
            created_at: now_utc(),
        };

        let _guard = self.writer().await;
        let tx = self.db().conn().transaction().await?;
        insert_decision_row(&tx, &decision).await?;
        let stats = crate::repos::graph::project_decision(&tx, &decision, &message).await?;
        tx.commit().await?;

        if let Err(error) = self.trail().append(&decision) {
            tracing::warn!(decision = %decision.id, %error, "trail append failed, rolling decision back");
            let tx = self.db().conn().transaction().await?;
            crate::repos::graph::unproject_decision(&tx, &decision, &message).await?;
            tx.execute("DELETE FROM decisions WHERE id = ?1", [decision.id.as_str()])
                .await?;
            tx.commit().await?;
            return Err(error);
        }

        tracing::debug!(
            decision = %decision.id,
            message = %message.id,
            linked = stats.precedents_linked,
            nodes = stats.nodes_created,
            edges = stats.edges_created,
            "recorded decision"
        );
        Ok(decision)
    }

    pub async fn get_decision(&self, id: &str) -> Result<Decision, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {DECISION_COLUMNS} FROM decisions d WHERE d.id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("decision", id))?;
        row_to_decision(&row, 0)
    }

    /// Newest first.
    pub async fn list_decisions(&self, limit: u32) -> Result<Vec<Decision>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {DECISION_COLUMNS} FROM decisions d ORDER BY d.created_at DESC, d.rowid DESC LIMIT ?1"
                ),
                [i64::from(limit)],
            )
            .await?;
        let mut decisions = Vec::new();
        while let Some(row) = rows.next().await? {
            decisions.push(row_to_decision(&row, 0)?);
        }
        Ok(decisions)
    }

    /// Every decision, oldest first. This is the log the graph is rebuilt from.
    pub async fn all_decisions(&self) -> Result<Vec<Decision>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {DECISION_COLUMNS} FROM decisions d ORDER BY d.created_at ASC, d.rowid ASC"
                ),
                (),
            )
            .await?;
        let mut decisions = Vec::new();
        while let Some(row) = rows.next().await? {
            decisions.push(row_to_decision(&row, 0)?);
        }
        Ok(decisions)
    }

    /// Bulk lookup in request order. Unknown or deleted ids are dropped.
    pub async fn get_decisions_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<Decision>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {DECISION_COLUMNS} FROM decisions d WHERE d.id IN ({})",
            placeholders(1, ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(ids.to_vec()))
            .await?;
        let mut decisions = Vec::new();
        while let Some(row) = rows.next().await? {
            decisions.push(row_to_decision(&row, 0)?);
        }
        Ok(order_by_ids(ids, decisions, |d| d.id.as_str()))
    }

    /// Most recent decisions on messages from `sender_type`, joined with the message.
    pub async fn recent_precedents(
        &self,
        sender_type: SenderType,
        limit: usize,
    ) -> Result<Vec<(Decision, Message)>, DatabaseError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {DECISION_COLUMNS}, {MESSAGE_COLUMNS}
                     FROM decisions d JOIN messages m ON m.id = d.message_id
                     WHERE m.sender_type = ?1
                     ORDER BY d.created_at DESC, d.rowid DESC
                     LIMIT ?2"
                ),
                libsql::params![sender_type.as_str(), limit],
            )
            .await?;
        let mut pairs = Vec::new();
        while let Some(row) = rows.next().await? {
            pairs.push((row_to_decision(&row, 0)?, row_to_message(&row, DECISION_WIDTH)?));
        }
        Ok(pairs)
    }

    /// Precedent links recorded for one decision.
    pub async fn precedent_links(
        &self,
        decision_id: &str,
    ) -> Result<Vec<PrecedentLink>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT decision_id, precedent_id FROM decision_precedents
                 WHERE decision_id = ?1 ORDER BY precedent_id",
                [decision_id],
            )
            .await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(PrecedentLink {
                decision_id: row.get::<String>(0)?,
                precedent_id: row.get::<String>(1)?,
            });
        }
        Ok(links)
    }

    /// Restore decisions from the JSONL trail that are missing from the store.
    ///
    /// Decisions whose message no longer exists are skipped. Returns how many
    /// decisions were restored.
    pub async fn replay_trail(&self) -> Result<usize, DatabaseError> {
        let trail = self.trail().read_all()?;
        if trail.is_empty() {
            return Ok(0);
        }

        let existing: HashSet<String> = self
            .all_decisions()
            .await?
            .into_iter()
            .map(|d| d.id)
            .collect();

        let mut restored = 0;
        let _guard = self.writer().await;
        let tx = self.db().conn().transaction().await?;
        for decision in trail.iter().filter(|d| !existing.contains(&d.id)) {
            let message = match self.get_message(&decision.message_id).await {
                Ok(message) => message,
                Err(e) if e.is_not_found() => {
                    tracing::warn!(decision = %decision.id, "trail decision references a missing message, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };
            insert_decision_row(&tx, decision).await?;
            crate::repos::graph::project_decision(&tx, decision, &message).await?;
            restored += 1;
        }
        tx.commit().await?;
        Ok(restored)
    }
}

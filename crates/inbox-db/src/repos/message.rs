//! Message repository. Messages are written once by ingestion and never updated.

use inbox_core::entities::{Message, NewMessage};
use inbox_core::enums::SenderType;
use inbox_core::ids::PREFIX_MESSAGE;

use crate::error::DatabaseError;
use crate::helpers::{
    format_timestamp, get_opt_string, now_utc, order_by_ids, parse_datetime, placeholders,
};
use crate::service::InboxService;

pub(crate) const MESSAGE_COLUMNS: &str =
    "m.id, m.sender_name, m.sender_type, m.channel, m.subject, m.content, m.embedding, m.created_at";

/// Parse a message from `MESSAGE_COLUMNS` starting at column `base`.
pub(crate) fn row_to_message(row: &libsql::Row, base: i32) -> Result<Message, DatabaseError> {
    let embedding = match get_opt_string(row, base + 6)? {
        Some(json) => Some(serde_json::from_str::<Vec<f32>>(&json)?),
        None => None,
    };
    Ok(Message {
        id: row.get::<String>(base)?,
        sender_name: row.get::<String>(base + 1)?,
        sender_type: SenderType::parse_lossy(&row.get::<String>(base + 2)?),
        channel: row.get::<String>(base + 3)?,
        subject: get_opt_string(row, base + 4)?,
        content: row.get::<String>(base + 5)?,
        embedding,
        created_at: parse_datetime(&row.get::<String>(base + 7)?)?,
    })
}

impl InboxService {
    pub async fn create_message(&self, new: &NewMessage) -> Result<Message, DatabaseError> {
        let id = self.db().generate_id(PREFIX_MESSAGE).await?;
        let message = Message {
            id,
            sender_name: new.sender_name.clone(),
            sender_type: new.sender_type,
            channel: new.channel.clone(),
            subject: new.subject.clone(),
            content: new.content.clone(),
            created_at: now_utc(),
            embedding: None,
        };
        self.insert_message(&message).await?;
        Ok(message)
    }

    /// Insert a fully formed message (ids and timestamps chosen by the caller).
    pub async fn insert_message(&self, message: &Message) -> Result<(), DatabaseError> {
        let embedding = message
            .embedding
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO messages (id, sender_name, sender_type, channel, subject, content, embedding, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    message.id.as_str(),
                    message.sender_name.as_str(),
                    message.sender_type.as_str(),
                    message.channel.as_str(),
                    message.subject.as_deref(),
                    message.content.as_str(),
                    embedding,
                    format_timestamp(&message.created_at)
                ],
            )
            .await?;
        Ok(())
    }

    /// Fetch one message. A missing message is a hard `NotFound`.
    pub async fn get_message(&self, id: &str) -> Result<Message, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("message", id))?;
        row_to_message(&row, 0)
    }

    /// Newest first, optionally restricted to one sender type.
    pub async fn list_messages(
        &self,
        sender_type: Option<SenderType>,
        limit: u32,
    ) -> Result<Vec<Message>, DatabaseError> {
        let mut rows = match sender_type {
            Some(st) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.sender_type = ?1
                             ORDER BY m.created_at DESC, m.rowid DESC LIMIT ?2"
                        ),
                        libsql::params![st.as_str(), i64::from(limit)],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {MESSAGE_COLUMNS} FROM messages m ORDER BY m.created_at DESC, m.rowid DESC LIMIT ?1"
                        ),
                        [i64::from(limit)],
                    )
                    .await?
            }
        };

        let mut messages = Vec::new();
        while let Some(row) = rows.next().await? {
            messages.push(row_to_message(&row, 0)?);
        }
        Ok(messages)
    }

    /// Every message, oldest first. Used to rebuild the indexes.
    pub async fn all_messages(&self) -> Result<Vec<Message>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages m ORDER BY m.created_at ASC, m.rowid ASC"),
                (),
            )
            .await?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next().await? {
            messages.push(row_to_message(&row, 0)?);
        }
        Ok(messages)
    }

    /// Bulk lookup in request order. Unknown ids are dropped.
    pub async fn get_messages_by_ids(&self, ids: &[String]) -> Result<Vec<Message>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.id IN ({})",
            placeholders(1, ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(ids.to_vec()))
            .await?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next().await? {
            messages.push(row_to_message(&row, 0)?);
        }
        Ok(order_by_ids(ids, messages, |m| m.id.as_str()))
    }

    pub async fn count_messages(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM messages", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(u64::try_from(row.get::<i64>(0)?).unwrap_or(0))
    }
}

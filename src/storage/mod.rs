use crate::error::{LovechatError, Result};
use crate::models::{Conversation, Message, User};
use crate::personas::PersonaId;
use anyhow::Context;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

pub mod types;
pub use types::{PersonaMessageStats, PersonaUsage};

/// Storage backend for users, conversations, and messages
///
/// Records are stored as JSON documents with the columns needed for
/// filtering and ordering pulled out alongside.
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Create a new storage instance
    ///
    /// Initializes the database file in the user's data directory.
    pub fn new() -> Result<Self> {
        // Allow override of the DB path via environment variable. This makes
        // it easy to point the binary at a test DB or alternate file without
        // changing the user's application data dir.
        if let Ok(override_path) = std::env::var("LOVECHAT_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "lovechat", "lovechat")
            .ok_or_else(|| LovechatError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        let db_path = data_dir.join("lovechat.db");
        let storage = Self { db_path };

        storage.init()?;

        Ok(storage)
    }

    /// Create a new storage instance that uses the specified database path.
    ///
    /// This is primarily useful for tests where the default application data
    /// directory is not desirable (for example, using a temporary directory).
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| LovechatError::Storage(e.to_string()))?;
        }

        let storage = Self { db_path };
        storage.init()?;
        Ok(storage)
    }

    /// Path of the backing database file
    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                data JSON NOT NULL
            );
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                persona TEXT NOT NULL,
                status TEXT NOT NULL,
                last_activity TEXT NOT NULL,
                data JSON NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_conversations_user
                ON conversations (user_id, last_activity DESC);
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                conversation_id TEXT NOT NULL,
                persona TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                data JSON NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_conversation
                ON messages (conversation_id, timestamp DESC);",
        )
        .context("Failed to create tables")
        .map_err(|e| LovechatError::Storage(e.to_string()))?;

        Ok(())
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| LovechatError::Storage(e.to_string()).into())
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
        serde_json::to_string(value)
            .context("Failed to serialize record")
            .map_err(|e| LovechatError::Storage(e.to_string()).into())
    }

    fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T> {
        serde_json::from_str(json)
            .context("Failed to deserialize record")
            .map_err(|e| LovechatError::Storage(e.to_string()).into())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Save or update a user
    pub fn save_user(&self, user: &User) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT OR REPLACE INTO users (id, email, data) VALUES (?, ?, ?)",
            params![user.id, user.email, Self::to_json(user)?],
        )
        .context("Failed to save user")
        .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Load a user by id
    pub fn load_user(&self, user_id: &str) -> Result<Option<User>> {
        let conn = self.open()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT data FROM users WHERE id = ?",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query user")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        match json {
            Some(json) => Ok(Some(Self::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Delete a user record (cascade steps are driven by the service)
    pub fn delete_user(&self, user_id: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM users WHERE id = ?", params![user_id])
            .context("Failed to delete user")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Conversations
    // ------------------------------------------------------------------

    /// Save or update a conversation
    pub fn save_conversation(&self, conversation: &Conversation) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT OR REPLACE INTO conversations
                (id, user_id, persona, status, last_activity, data)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                conversation.id,
                conversation.user_id,
                conversation.persona.as_str(),
                conversation.status.as_str(),
                conversation.last_activity.to_rfc3339(),
                Self::to_json(conversation)?,
            ],
        )
        .context("Failed to save conversation")
        .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Load a conversation by id
    pub fn load_conversation(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        let conn = self.open()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT data FROM conversations WHERE id = ?",
                params![conversation_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query conversation")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        match json {
            Some(json) => Ok(Some(Self::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Find the active conversation for a (user, persona) pair
    ///
    /// Most recently active first, mirroring the single-active-thread
    /// invariant maintained by the service.
    pub fn find_active_conversation(
        &self,
        user_id: &str,
        persona: PersonaId,
    ) -> Result<Option<Conversation>> {
        let conn = self.open()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT data FROM conversations
                 WHERE user_id = ? AND persona = ? AND status = 'active'
                 ORDER BY last_activity DESC
                 LIMIT 1",
                params![user_id, persona.as_str()],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query active conversation")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        match json {
            Some(json) => Ok(Some(Self::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// List a user's conversations, most recently active first
    pub fn list_conversations(&self, user_id: &str, limit: usize) -> Result<Vec<Conversation>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(
                "SELECT data FROM conversations
                 WHERE user_id = ?
                 ORDER BY last_activity DESC
                 LIMIT ?",
            )
            .context("Failed to prepare statement")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id, limit as i64], |row| {
                row.get::<_, String>(0)
            })
            .context("Failed to query conversations")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        let mut conversations = Vec::new();
        for json in rows.flatten() {
            conversations.push(Self::from_json(&json)?);
        }
        Ok(conversations)
    }

    /// Delete a conversation record
    pub fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "DELETE FROM conversations WHERE id = ?",
            params![conversation_id],
        )
        .context("Failed to delete conversation")
        .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Delete every conversation owned by a user, returning the count
    pub fn delete_conversations_for_user(&self, user_id: &str) -> Result<usize> {
        let conn = self.open()?;
        let count = conn
            .execute("DELETE FROM conversations WHERE user_id = ?", params![user_id])
            .context("Failed to delete conversations")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Save or update a message
    pub fn save_message(&self, message: &Message) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT OR REPLACE INTO messages
                (id, user_id, conversation_id, persona, timestamp, data)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                message.id,
                message.user_id,
                message.conversation_id,
                message.persona.as_str(),
                message.timestamp.to_rfc3339(),
                Self::to_json(message)?,
            ],
        )
        .context("Failed to save message")
        .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Load a message by id
    pub fn load_message(&self, message_id: &str) -> Result<Option<Message>> {
        let conn = self.open()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT data FROM messages WHERE id = ?",
                params![message_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query message")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        match json {
            Some(json) => Ok(Some(Self::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Most recent messages of a conversation, in chronological order
    pub fn conversation_history(
        &self,
        user_id: &str,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(
                "SELECT data FROM messages
                 WHERE user_id = ? AND conversation_id = ?
                 ORDER BY timestamp DESC
                 LIMIT ?",
            )
            .context("Failed to prepare statement")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id, conversation_id, limit as i64], |row| {
                row.get::<_, String>(0)
            })
            .context("Failed to query history")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        let mut messages: Vec<Message> = Vec::new();
        for json in rows.flatten() {
            messages.push(Self::from_json(&json)?);
        }
        messages.reverse();
        Ok(messages)
    }

    /// Delete every message of a conversation, returning the count
    pub fn delete_messages_for_conversation(&self, conversation_id: &str) -> Result<usize> {
        let conn = self.open()?;
        let count = conn
            .execute(
                "DELETE FROM messages WHERE conversation_id = ?",
                params![conversation_id],
            )
            .context("Failed to delete messages")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(count)
    }

    /// Delete every message owned by a user, returning the count
    pub fn delete_messages_for_user(&self, user_id: &str) -> Result<usize> {
        let conn = self.open()?;
        let count = conn
            .execute("DELETE FROM messages WHERE user_id = ?", params![user_id])
            .context("Failed to delete messages")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Analytics
    // ------------------------------------------------------------------

    /// Per-persona conversation aggregates, busiest persona first
    pub fn persona_usage(&self, user_id: &str) -> Result<Vec<PersonaUsage>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(
                "SELECT persona,
                        COUNT(*),
                        COALESCE(SUM(json_extract(data, '$.message_count')), 0),
                        COALESCE(AVG(json_extract(data, '$.relationship_score')), 0.0)
                 FROM conversations
                 WHERE user_id = ?
                 GROUP BY persona
                 ORDER BY 3 DESC",
            )
            .context("Failed to prepare statement")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(PersonaUsage {
                    persona: row.get(0)?,
                    conversation_count: row.get(1)?,
                    total_messages: row.get(2)?,
                    avg_relationship_score: row.get(3)?,
                })
            })
            .context("Failed to query persona usage")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        Ok(rows.flatten().collect())
    }

    /// Per-persona message aggregates, busiest persona first
    pub fn persona_message_stats(&self, user_id: &str) -> Result<Vec<PersonaMessageStats>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(
                "SELECT persona,
                        COUNT(*),
                        COALESCE(AVG(json_extract(data, '$.importance')), 0.0)
                 FROM messages
                 WHERE user_id = ?
                 GROUP BY persona
                 ORDER BY 2 DESC",
            )
            .context("Failed to prepare statement")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(PersonaMessageStats {
                    persona: row.get(0)?,
                    message_count: row.get(1)?,
                    avg_importance: row.get(2)?,
                })
            })
            .context("Failed to query message stats")
            .map_err(|e| LovechatError::Storage(e.to_string()))?;

        Ok(rows.flatten().collect())
    }
}

use super::storage::ChatStore;
use crate::error::{ChatError, Result};
use crate::models::{Chat, ChatMessage, Role, DEFAULT_CHAT_TITLE};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_DATABASE_FILE: &str = "chatbot.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed chat store.
///
/// Holds only the database path: every operation opens its own connection and
/// closes it when done, so each statement commits on its own.
pub struct SqliteChatStore {
    path: PathBuf,
}

impl SqliteChatStore {
    /// Open (creating if needed) the database at `path` and make sure the
    /// schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self { path };
        let conn = store.connect()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS chats (
                chat_id TEXT PRIMARY KEY,
                username TEXT,
                title TEXT,
                summary TEXT
            );

            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id TEXT REFERENCES chats(chat_id) ON DELETE CASCADE,
                role TEXT,
                content TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_messages_chat ON messages(chat_id, id);
            ",
        )?;
        debug!("opened chat store at {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}

fn parse_role(raw: String) -> rusqlite::Result<Role> {
    raw.parse::<Role>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(ChatError::Other(e)),
        )
    })
}

impl ChatStore for SqliteChatStore {
    fn create_chat(&self, owner: &str) -> Result<String> {
        let chat_id = Uuid::new_v4().to_string();
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO chats (chat_id, username, title, summary) VALUES (?1, ?2, ?3, NULL)",
            params![chat_id, owner, DEFAULT_CHAT_TITLE],
        )?;
        debug!("created chat {} for {}", chat_id, owner);
        Ok(chat_id)
    }

    fn list_chats(&self, owner: &str) -> Result<Vec<Chat>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT chat_id, username, COALESCE(title, ?2), summary
             FROM chats
             WHERE username = ?1
             ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map(params![owner, DEFAULT_CHAT_TITLE], |row| {
            Ok(Chat {
                chat_id: row.get(0)?,
                owner: row.get(1)?,
                title: row.get(2)?,
                summary: row.get(3)?,
            })
        })?;

        let mut chats = Vec::new();
        for row in rows {
            chats.push(row?);
        }
        Ok(chats)
    }

    fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        let conn = self.connect()?;
        let chat = conn
            .query_row(
                "SELECT chat_id, username, COALESCE(title, ?2), summary
                 FROM chats
                 WHERE chat_id = ?1",
                params![chat_id, DEFAULT_CHAT_TITLE],
                |row| {
                    Ok(Chat {
                        chat_id: row.get(0)?,
                        owner: row.get(1)?,
                        title: row.get(2)?,
                        summary: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(chat)
    }

    fn rename_chat(&self, chat_id: &str, title: &str) -> Result<()> {
        let normalized = title.trim();
        if normalized.is_empty() {
            return Err(ChatError::EmptyTitle);
        }

        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE chats SET title = ?1 WHERE chat_id = ?2",
            params![normalized, chat_id],
        )?;
        if updated == 0 {
            return Err(ChatError::ChatNotFound(chat_id.to_string()));
        }
        Ok(())
    }

    fn delete_chat(&self, chat_id: &str) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let messages = tx.execute("DELETE FROM messages WHERE chat_id = ?1", params![chat_id])?;
        let chats = tx.execute("DELETE FROM chats WHERE chat_id = ?1", params![chat_id])?;
        tx.commit()?;
        debug!(
            "deleted chat {} ({} chat rows, {} messages)",
            chat_id, chats, messages
        );
        Ok(())
    }

    fn append_message(&self, chat_id: &str, role: Role, content: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO messages (chat_id, role, content) VALUES (?1, ?2, ?3)",
            params![chat_id, role.as_str(), content],
        )?;
        Ok(())
    }

    fn list_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, chat_id, role, COALESCE(content, '')
             FROM messages
             WHERE chat_id = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![chat_id], |row| {
            Ok(ChatMessage {
                id: row.get(0)?,
                chat_id: row.get(1)?,
                role: parse_role(row.get(2)?)?,
                content: row.get(3)?,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    fn update_summary(&self, chat_id: &str, summary: &str) -> Result<()> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE chats SET summary = ?1 WHERE chat_id = ?2",
            params![summary, chat_id],
        )?;
        if updated == 0 {
            return Err(ChatError::ChatNotFound(chat_id.to_string()));
        }
        Ok(())
    }

    fn chat_title(&self, chat_id: &str) -> Result<String> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT COALESCE(title, ?2) FROM chats WHERE chat_id = ?1",
            params![chat_id, DEFAULT_CHAT_TITLE],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| ChatError::ChatNotFound(chat_id.to_string()))
    }

    fn is_duplicate_title(
        &self,
        owner: &str,
        title: &str,
        exclude_chat_id: Option<&str>,
    ) -> Result<bool> {
        let conn = self.connect()?;
        let count: i64 = match exclude_chat_id {
            Some(exclude) => conn.query_row(
                "SELECT COUNT(*) FROM chats WHERE username = ?1 AND title = ?2 AND chat_id != ?3",
                params![owner, title, exclude],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM chats WHERE username = ?1 AND title = ?2",
                params![owner, title],
                |row| row.get(0),
            )?,
        };
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("chats.db");

        let store = SqliteChatStore::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn open_accepts_existing_database_without_foreign_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "
            CREATE TABLE chats (chat_id TEXT PRIMARY KEY, username TEXT, title TEXT, summary TEXT);
            CREATE TABLE messages (id INTEGER PRIMARY KEY AUTOINCREMENT, chat_id TEXT, role TEXT, content TEXT);
            INSERT INTO chats VALUES ('legacy', 'alice', 'Old chat', NULL);
            INSERT INTO messages (chat_id, role, content) VALUES ('legacy', 'user', 'hi');
            ",
        )
        .unwrap();
        drop(conn);

        let store = SqliteChatStore::open(&path).unwrap();
        let chats = store.list_chats("alice").unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].title, "Old chat");

        store.delete_chat("legacy").unwrap();
        assert!(store.list_messages("legacy").unwrap().is_empty());
    }

    #[test]
    fn unknown_role_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteChatStore::open(temp_dir.path().join("chats.db")).unwrap();
        let chat_id = store.create_chat("alice").unwrap();
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO messages (chat_id, role, content) VALUES (?1, 'tool', 'x')",
            params![chat_id],
        )
        .unwrap();

        let err = store.list_messages(&chat_id).unwrap_err();
        assert!(matches!(err, ChatError::StorageError(_)));
    }

    #[test]
    fn message_for_missing_chat_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteChatStore::open(temp_dir.path().join("chats.db")).unwrap();

        let result = store.append_message("no-such-chat", Role::User, "hello");
        assert!(matches!(result, Err(ChatError::StorageError(_))));
    }
}

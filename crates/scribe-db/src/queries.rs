use crate::Database;
use crate::models::{CommentRow, PostRow, SessionRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, Row};

const POST_COLUMNS: &str = "p.id, p.title, p.subtitle, p.date, p.body, p.img_url, p.author_id, u.name";

const COMMENT_COLUMNS: &str = "c.id, c.text, c.author_id, u.name, u.email, c.post_id";

impl Database {
    // -- Users --

    /// Inserts a user and returns its id. A duplicate name fails on the
    /// UNIQUE constraint; callers do not pre-check it.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)",
                (name, email, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Emails are not unique; the earliest account wins.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, name, email, password FROM users WHERE email = ?1 ORDER BY id LIMIT 1",
                [email],
                user_from_row,
            )
            .optional()
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, name, email, password FROM users WHERE id = ?1",
                [id],
                user_from_row,
            )
            .optional()
        })
    }

    // -- Posts --

    pub fn list_posts(&self) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {POST_COLUMNS} FROM blog_posts p JOIN users u ON p.author_id = u.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| query_post(conn, id))
    }

    pub fn create_post(
        &self,
        title: &str,
        subtitle: &str,
        date: &str,
        body: &str,
        img_url: &str,
        author_id: i64,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO blog_posts (title, subtitle, date, body, img_url, author_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![title, subtitle, date, body, img_url, author_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Overwrites every editable field, including the author. The date is kept.
    /// Returns false if the post does not exist.
    pub fn update_post(
        &self,
        id: i64,
        title: &str,
        subtitle: &str,
        body: &str,
        img_url: &str,
        author_id: i64,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE blog_posts
                 SET title = ?2, subtitle = ?3, body = ?4, img_url = ?5, author_id = ?6
                 WHERE id = ?1",
                rusqlite::params![id, title, subtitle, body, img_url, author_id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_post(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM blog_posts WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Comments --

    pub fn get_comments_for_post(&self, post_id: i64) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_COLUMNS} FROM comments c
                 JOIN users u ON c.author_id = u.id
                 WHERE c.post_id = ?1
                 ORDER BY c.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([post_id], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_comment(&self, id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_COLUMNS} FROM comments c
                 JOIN users u ON c.author_id = u.id
                 WHERE c.id = ?1"
            );
            conn.query_row(&sql, [id], comment_from_row).optional()
        })
    }

    pub fn create_comment(&self, text: &str, author_id: i64, post_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (text, author_id, post_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![text, author_id, post_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn delete_comment(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Sessions --

    pub fn create_session(&self, id: &str, user_id: Option<i64>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, user_id) VALUES (?1, ?2)",
                rusqlite::params![id, user_id],
            )?;
            Ok(())
        })
    }

    pub fn get_session(&self, id: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user_id, created_at FROM sessions WHERE id = ?1",
                [id],
                |row| {
                    Ok(SessionRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()
        })
    }

    pub fn delete_session(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    /// Drops sessions older than `max_age_days`. Their tokens have expired anyway.
    pub fn purge_stale_sessions(&self, max_age_days: u32) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM sessions WHERE created_at < datetime('now', '-' || ?1 || ' days')",
                [max_age_days],
            )?;
            Ok(removed)
        })
    }

    // -- Flashes --

    pub fn push_flash(&self, session_id: &str, message: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO flashes (session_id, message) VALUES (?1, ?2)",
                (session_id, message),
            )?;
            Ok(())
        })
    }

    /// Hands any queued messages of `from` over to `to`, keeping their order.
    pub fn move_flashes(&self, from: &str, to: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let moved = conn.execute(
                "UPDATE flashes SET session_id = ?2 WHERE session_id = ?1",
                (from, to),
            )?;
            Ok(moved)
        })
    }

    /// Returns the queued messages in order and removes them.
    pub fn take_flashes(&self, session_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let messages = {
                let mut stmt =
                    tx.prepare("SELECT message FROM flashes WHERE session_id = ?1 ORDER BY id")?;
                stmt.query_map([session_id], |row| row.get(0))?
                    .collect::<std::result::Result<Vec<String>, _>>()?
            };
            if !messages.is_empty() {
                tx.execute("DELETE FROM flashes WHERE session_id = ?1", [session_id])?;
            }
            tx.commit()?;
            Ok(messages)
        })
    }
}

fn query_post(conn: &Connection, id: i64) -> Result<Option<PostRow>> {
    let sql = format!(
        "SELECT {POST_COLUMNS} FROM blog_posts p JOIN users u ON p.author_id = u.id WHERE p.id = ?1"
    );
    conn.query_row(&sql, [id], post_from_row).optional()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        subtitle: row.get(2)?,
        date: row.get(3)?,
        body: row.get(4)?,
        img_url: row.get(5)?,
        author_id: row.get(6)?,
        author_name: row.get(7)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        text: row.get(1)?,
        author_id: row.get(2)?,
        author_name: row.get(3)?,
        author_email: row.get(4)?,
        post_id: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

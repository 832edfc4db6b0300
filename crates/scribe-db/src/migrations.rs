use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        VARCHAR(50) NOT NULL UNIQUE,
            email       VARCHAR(100) NOT NULL,
            password    VARCHAR(250) NOT NULL
        );

        CREATE TABLE IF NOT EXISTS blog_posts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       VARCHAR(250) NOT NULL UNIQUE,
            subtitle    VARCHAR(250) NOT NULL,
            date        VARCHAR(250) NOT NULL,
            body        TEXT NOT NULL,
            img_url     VARCHAR(250) NOT NULL,
            author_id   INTEGER NOT NULL REFERENCES users(id)
        );

        -- Comments go with their post; handlers never delete them explicitly.
        CREATE TABLE IF NOT EXISTS comments (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            text        TEXT NOT NULL,
            author_id   INTEGER NOT NULL REFERENCES users(id),
            post_id     INTEGER NOT NULL REFERENCES blog_posts(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_comments_post
            ON comments(post_id);

        CREATE TABLE IF NOT EXISTS sessions (
            id          TEXT PRIMARY KEY,
            user_id     INTEGER REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS flashes (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            message     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_flashes_session
            ON flashes(session_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

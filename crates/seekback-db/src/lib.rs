//! Seekback-DB: Database schema, migrations, and query operations
//!
//! This crate provides the persisted side of seekback using SQLite with
//! rusqlite and r2d2 connection pooling. The `samples` table mirrors the
//! samples directory; `samples_fts` is an external-content FTS5 index over
//! it that is rebuilt after every sync.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Sample CRUD and search
//!
//! # Example
//!
//! ```no_run
//! use seekback_db::pool::{init_pool, get_conn};
//! use seekback_db::queries::search::{search, SearchOptions};
//!
//! let pool = init_pool("/var/lib/seekback/db.sqlite3").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let hits = search(&conn, &SearchOptions::with_query("hello")).unwrap();
//! println!("{} matches", hits.len());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;

//! SQLite data access layer.
//!
//! RULE: only the store talks to the database.
//! Scenarios build `AggregateQuery` values and hand them to a
//! `DataSource`; they never execute SQL directly.

use crate::{
    error::{DashError, DashResult},
    filter::Source,
    query::AggregateQuery,
    session::DataSource,
    table::{Cell, ResultTable},
};
use rusqlite::{params_from_iter, Connection, OpenFlags};

mod seed;

pub struct PulseStore {
    conn: Connection,
    path: Option<String>, // None for a private :memory: database
}

impl PulseStore {
    /// Open (or create) a database for loading fixtures or demo data.
    pub fn open(path: &str) -> DashResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|source| DashError::Connection {
            path: path.to_string(),
            source,
        })?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an existing database for one rendering pass.
    ///
    /// The file must already exist. The connection refuses writes
    /// (`query_only`), so nothing issued through it can mutate the store.
    pub fn open_read_only(path: &str) -> DashResult<Self> {
        let connect = || -> rusqlite::Result<Connection> {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
            )?;
            conn.execute_batch("PRAGMA query_only = ON;")?;
            Ok(conn)
        };
        let conn = connect().map_err(|source| DashError::Connection {
            path: path.to_string(),
            source,
        })?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open a private in-memory database (used in tests).
    pub fn in_memory() -> DashResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Create the aggregate tables if they do not exist.
    pub fn migrate(&self) -> DashResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_pulse_schema.sql"))?;
        Ok(())
    }

    /// Execute a built query, binding its parameters in order.
    pub fn fetch(&self, query: &AggregateQuery) -> DashResult<ResultTable> {
        log::debug!(
            "query '{}' on {} ({} params): {}",
            query.label,
            query.source.table_name(),
            query.params.len(),
            query.sql
        );
        let mut stmt = self.conn.prepare(&query.sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut table = ResultTable::new(columns);
        let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
        while let Some(row) = rows.next()? {
            let cells = (0..width)
                .map(|i| row.get_ref(i).map(Cell::from))
                .collect::<Result<Vec<_>, _>>()?;
            table.push_row(cells);
        }
        Ok(table)
    }

    /// Total rows in a table (for summaries).
    pub fn row_count(&self, source: Source) -> DashResult<i64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", source.table_name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl DataSource for PulseStore {
    fn fetch(&self, query: &AggregateQuery) -> DashResult<ResultTable> {
        PulseStore::fetch(self, query)
    }
}

//! Transaction management.

use rusqlite::{ErrorCode, Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::connection::Database;

impl Database {
    /// Begins an `IMMEDIATE` transaction.
    ///
    /// The write lock is taken up front, so two processes running a
    /// load, compute and persist sequence cannot interleave: the second
    /// waits for the busy timeout and then fails with
    /// [`Error::LockTimeout`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if the lock cannot be taken in time,
    /// or a database error for any other failure.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use depot::database::{Database, DatabaseConfig};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/depot.db")).unwrap();
    /// let tx = db.begin_transaction().unwrap();
    /// let inventory = Database::load_inventory(&tx).unwrap();
    /// tx.commit().unwrap();
    /// ```
    pub fn begin_transaction(&mut self) -> Result<Transaction<'_>> {
        let seconds = self.config().busy_timeout.as_secs();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| lock_error(e, seconds))
    }
}

/// Maps `SQLITE_BUSY` and `SQLITE_LOCKED` to [`Error::LockTimeout`].
pub(crate) fn lock_error(error: rusqlite::Error, seconds: u64) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            Error::LockTimeout { seconds }
        }
        other => other.into(),
    }
}

//! redb-based durable device state
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `cart` | `item_id` | `u32` | Cart quantity map |
//! | `session` | key name | `&str` | Table identity from the QR payload |
//! | `ids` | key name | `i64` | Restaurant id, active-order pointer |
//!
//! # Durability
//!
//! redb commits with immediate durability: once a mutator returns, the
//! change is on disk and a reload cannot lose or duplicate it. State that
//! must change together (the submission's pointer-set plus cart-clear)
//! is written in a single transaction, so a reader never observes a
//! half-applied submission.
//!
//! # Writers
//!
//! Storage is process-wide and shared by every view. There is no lock;
//! the design relies on one logical writer per key: the cart is written
//! only by increment/clear, the session keys only by URL resolution, the
//! pointer only by submission, tracking and reset. A second browser tab
//! against the same file is last-writer-wins.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Cart quantity map: key = item id, value = quantity (always >= 1)
const CART_TABLE: TableDefinition<i64, u32> = TableDefinition::new("cart");

/// String-valued session keys
const SESSION_TABLE: TableDefinition<&str, &str> = TableDefinition::new("session");

/// Integer-valued id keys
const IDS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("ids");

const TABLE_ID_KEY: &str = "table_id";
const RESTAURANT_ID_KEY: &str = "restaurant_id";
const ORDER_ID_KEY: &str = "order_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable device state backed by redb
///
/// One instance per device; clones share the database handle.
#[derive(Clone)]
pub struct DeviceStore {
    db: Arc<Database>,
}

impl DeviceStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
            let _ = write_txn.open_table(SESSION_TABLE)?;
            let _ = write_txn.open_table(IDS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Cart ==========

    /// Current cart contents (item id → quantity)
    pub fn cart(&self) -> StorageResult<BTreeMap<i64, u32>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        let mut entries = BTreeMap::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            entries.insert(key.value(), value.value());
        }
        Ok(entries)
    }

    /// Quantity for one item; `None` when the item is not in the cart
    ///
    /// Absent is a distinct state from "present with zero": zero
    /// quantities are never stored.
    pub fn cart_quantity(&self, item_id: i64) -> StorageResult<Option<u32>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        Ok(table.get(item_id)?.map(|guard| guard.value()))
    }

    /// Apply a delta to one item's quantity and return the new value
    ///
    /// The result is clamped at zero, and a zero result removes the entry
    /// instead of storing it. Read-modify-write in one transaction,
    /// committed before this returns, so a reload mid-session never loses
    /// or duplicates a mutation the caller already observed.
    pub fn cart_increment(&self, item_id: i64, delta: i32) -> StorageResult<u32> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut table = txn.open_table(CART_TABLE)?;
            let current = table.get(item_id)?.map(|guard| guard.value()).unwrap_or(0);
            let updated = (i64::from(current) + i64::from(delta)).max(0) as u32;
            if updated == 0 {
                table.remove(item_id)?;
            } else {
                table.insert(item_id, updated)?;
            }
            updated
        };
        txn.commit()?;
        tracing::debug!(item_id, quantity = updated, "Cart entry updated");
        Ok(updated)
    }

    /// Empty the cart
    pub fn clear_cart(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        txn.delete_table(CART_TABLE)?;
        let _ = txn.open_table(CART_TABLE)?;
        txn.commit()?;
        tracing::debug!("Cart cleared");
        Ok(())
    }

    // ========== Session ==========

    /// Stored table identity
    pub fn table_id(&self) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_TABLE)?;
        Ok(table.get(TABLE_ID_KEY)?.map(|guard| guard.value().to_string()))
    }

    /// Persist the table identity (URL wins over any stored value)
    pub fn set_table_id(&self, value: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SESSION_TABLE)?;
            table.insert(TABLE_ID_KEY, value)?;
        }
        txn.commit()?;
        tracing::debug!(table_id = %value, "Table id persisted");
        Ok(())
    }

    /// Stored restaurant id
    pub fn restaurant_id(&self) -> StorageResult<Option<i64>> {
        self.get_id(RESTAURANT_ID_KEY)
    }

    /// Persist the restaurant id
    pub fn set_restaurant_id(&self, value: i64) -> StorageResult<()> {
        self.set_id(RESTAURANT_ID_KEY, value)?;
        tracing::debug!(restaurant_id = value, "Restaurant id persisted");
        Ok(())
    }

    // ========== Active order pointer ==========

    /// The order this device is currently tracking, if any
    pub fn active_order(&self) -> StorageResult<Option<i64>> {
        self.get_id(ORDER_ID_KEY)
    }

    /// Point the device at an order
    pub fn set_active_order(&self, order_id: i64) -> StorageResult<()> {
        self.set_id(ORDER_ID_KEY, order_id)?;
        tracing::debug!(order_id, "Active order pointer set");
        Ok(())
    }

    /// Forget the tracked order
    pub fn clear_active_order(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(IDS_TABLE)?;
            table.remove(ORDER_ID_KEY)?;
        }
        txn.commit()?;
        tracing::debug!("Active order pointer cleared");
        Ok(())
    }

    /// Record a successful submission
    ///
    /// Sets the active-order pointer and clears the cart in one
    /// transaction: no reader can observe a cleared cart without the
    /// pointer, or the pointer with a non-cleared cart.
    pub fn commit_submission(&self, order_id: i64) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(IDS_TABLE)?;
            table.insert(ORDER_ID_KEY, order_id)?;
        }
        txn.delete_table(CART_TABLE)?;
        let _ = txn.open_table(CART_TABLE)?;
        txn.commit()?;
        tracing::debug!(order_id, "Submission recorded, cart cleared");
        Ok(())
    }

    fn get_id(&self, key: &str) -> StorageResult<Option<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(IDS_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value()))
    }

    fn set_id(&self, key: &str, value: i64) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(IDS_TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }
}

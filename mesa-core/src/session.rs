//! Session context resolution
//!
//! Derives which table and restaurant this device is ordering for, from
//! URL parameters or the previously persisted values. Resolution must
//! complete before cart mutation is attempted: submission needs both.

use crate::storage::{DeviceStore, StorageResult};

/// Parameters extracted from the current URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pub table_id: Option<String>,
    pub restaurant_id: Option<i64>,
}

/// The table/restaurant identity of this device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub table_id: Option<String>,
    pub restaurant_id: Option<i64>,
}

/// Resolves and persists the session context
#[derive(Clone)]
pub struct SessionStore {
    store: DeviceStore,
}

impl SessionStore {
    pub fn new(store: DeviceStore) -> Self {
        Self { store }
    }

    /// Resolve the context, field by field
    ///
    /// A URL value overwrites the stored one and is persisted; an absent
    /// URL value falls back to whatever was stored before, which may be
    /// nothing. Reading alone never writes, so a parameterless visit
    /// cannot clobber a previously valid context.
    pub fn resolve(&self, params: &UrlParams) -> StorageResult<SessionContext> {
        let table_id = match &params.table_id {
            Some(value) => {
                self.store.set_table_id(value)?;
                Some(value.clone())
            }
            None => self.store.table_id()?,
        };

        let restaurant_id = match params.restaurant_id {
            Some(value) => {
                self.store.set_restaurant_id(value)?;
                Some(value)
            }
            None => self.store.restaurant_id()?,
        };

        Ok(SessionContext {
            table_id,
            restaurant_id,
        })
    }

    /// Current context without consulting any URL
    pub fn current(&self) -> StorageResult<SessionContext> {
        self.resolve(&UrlParams::default())
    }
}

//! Record store: the durable, append-only list of expenses
//!
//! The whole list lives as one JSON array under a single storage key. Every
//! successful append rewrites that array. Unreadable content is treated as
//! an empty list so the tracker stays usable.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use spendlog_config::ExpensesConfig;
use spendlog_utils::generate_id;

use crate::error::{CoreError, CoreResult};
use crate::models::{ExpenseRecord, NewExpense};
use crate::storage::KeyValueStorage;

/// Default slot key
pub const DEFAULT_KEY: &str = "financeTracker_expenses";

/// Validation applied to every record before it is appended
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    payment_modes: Vec<String>,
    categories: Vec<String>,
}

impl RecordValidator {
    /// An empty list accepts any non-empty label
    pub fn new(payment_modes: Vec<String>, categories: Vec<String>) -> Self {
        Self { payment_modes, categories }
    }

    pub fn from_config(config: &ExpensesConfig) -> Self {
        if config.enforce_vocabulary {
            Self::new(config.payment_modes.clone(), config.categories.clone())
        } else {
            Self::default()
        }
    }

    /// Validate `record` against the invariants and the records already stored
    pub fn validate(&self, record: &ExpenseRecord, existing: &[ExpenseRecord]) -> CoreResult<()> {
        record.check_invariants()?;

        if !self.payment_modes.is_empty() && !self.payment_modes.contains(&record.payment_mode) {
            return Err(CoreError::validation(
                "paymentMode",
                format!("'{}' is not one of: {}", record.payment_mode, self.payment_modes.join(", ")),
            ));
        }

        if !self.categories.is_empty() && !self.categories.contains(&record.category) {
            return Err(CoreError::validation(
                "category",
                format!("'{}' is not one of: {}", record.category, self.categories.join(", ")),
            ));
        }

        if existing.iter().any(|r| r.id == record.id) {
            return Err(CoreError::validation(
                "id",
                format!("a record with id {} already exists", record.id),
            ));
        }

        Ok(())
    }
}

/// Owner of the expense list and its storage slot
pub struct RecordStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    records: Vec<ExpenseRecord>,
    validator: RecordValidator,
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Create an empty store over `storage` without reading the slot
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            records: Vec::new(),
            validator: RecordValidator::default(),
        }
    }

    /// Create a store and load whatever the slot currently holds
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self::new(storage, key);
        store.records = store.load();
        store
    }

    pub fn with_validator(mut self, validator: RecordValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the slot, returning an empty list when it is absent or unreadable
    pub fn load(&self) -> Vec<ExpenseRecord> {
        match self.read_slot() {
            Ok(records) => {
                log::debug!("Loaded {} expenses from slot {}", records.len(), self.key);
                records
            }
            Err(e) => {
                log::error!("Error loading expenses: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the in-memory list with the current slot contents
    pub fn reload(&mut self) {
        self.records = self.load();
    }

    /// Strict read of the slot
    pub fn read_slot(&self) -> CoreResult<Vec<ExpenseRecord>> {
        let raw = self
            .storage
            .get_item(&self.key)
            .map_err(|e| CoreError::CorruptData {
                key: self.key.clone(),
                message: e.to_string(),
            })?;

        let raw = match raw {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        let parsed: Vec<ExpenseRecord> = serde_json::from_str(&raw)
            .map_err(|e| CoreError::CorruptData {
                key: self.key.clone(),
                message: e.to_string(),
            })?;

        let mut seen = HashSet::new();
        let records = parsed
            .into_iter()
            .filter(|record| {
                if let Err(e) = record.check_invariants() {
                    log::warn!("Skipping stored expense {:?}: {}", record.id, e);
                    return false;
                }
                if !seen.insert(record.id.clone()) {
                    log::warn!("Skipping stored expense {:?}: duplicate id", record.id);
                    return false;
                }
                true
            })
            .collect();

        Ok(records)
    }

    /// All records in insertion order
    pub fn all(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate, append and persist a record.
    ///
    /// A `Persistence` error means the record was kept in memory but the
    /// slot was not updated.
    pub fn append(&mut self, record: ExpenseRecord) -> CoreResult<()> {
        self.validator.validate(&record, &self.records)?;

        log::debug!("Expense added: {} {} {}", record.id, record.category, record.amount);
        self.records.push(record);
        self.save()
    }

    /// Assign an id and creation time to `draft`, then append it
    pub fn add(&mut self, draft: NewExpense, now: DateTime<Utc>) -> CoreResult<ExpenseRecord> {
        let mut id = generate_id(now);
        while self.records.iter().any(|r| r.id == id) {
            id = generate_id(now);
        }

        let record = draft.into_record(id, now);
        self.append(record.clone())?;
        Ok(record)
    }

    /// Write the full list to the slot
    pub fn save(&mut self) -> CoreResult<()> {
        let json = serde_json::to_string(&self.records)
            .map_err(|e| CoreError::Persistence { message: e.to_string() })?;

        self.storage.set_item(&self.key, &json).map_err(|e| {
            log::error!("Error saving expenses: {}", e);
            CoreError::Persistence { message: e.to_string() }
        })
    }

    /// Erase the slot and forget every record
    pub fn reset(&mut self) -> CoreResult<()> {
        self.storage
            .remove_item(&self.key)
            .map_err(|e| CoreError::Persistence { message: e.to_string() })?;
        log::info!("Cleared {} expenses from slot {}", self.records.len(), self.key);
        self.records.clear();
        Ok(())
    }
}

// ==================== Tests ====================

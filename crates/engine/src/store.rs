//! In-memory keyed storage for transactions and categories.
//!
//! The store is plain synchronous data: callers own it (the [`Engine`] keeps
//! it behind a lock) and every operation completes without suspending, so id
//! allocation and insertion always happen as one step.
//!
//! Ids come from per-entity counters starting at 1. A counter only moves
//! forward, so ids are never reused, even after a delete.
//!
//! [`Engine`]: crate::Engine

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    Category, NewCategory, NewTransaction, Transaction, TransactionPatch, categories,
    util::normalize_category_key,
};

#[derive(Debug)]
pub struct Store {
    transactions: BTreeMap<u64, Transaction>,
    categories: BTreeMap<u64, Category>,
    next_transaction_id: u64,
    next_category_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Empty transaction set, seeded with the default categories.
    pub fn new() -> Self {
        let mut store = Self {
            transactions: BTreeMap::new(),
            categories: BTreeMap::new(),
            next_transaction_id: 1,
            next_category_id: 1,
        };
        for category in categories::defaults() {
            store.create_category(category);
        }
        store
    }

    /// Stores a copy of `data` under the next id. A missing date becomes `now`.
    pub fn create_transaction(&mut self, data: NewTransaction, now: DateTime<Utc>) -> Transaction {
        let id = self.next_transaction_id;
        self.next_transaction_id += 1;

        let tx = Transaction {
            id,
            amount: data.amount,
            description: data.description,
            category: data.category,
            kind: data.kind,
            date: data.date.unwrap_or(now),
            created_at: now,
        };
        self.transactions.insert(id, tx.clone());
        tx
    }

    pub fn transaction(&self, id: u64) -> Option<Transaction> {
        self.transactions.get(&id).cloned()
    }

    /// Merges the supplied fields; `id` and `created_at` never change.
    pub fn update_transaction(&mut self, id: u64, patch: TransactionPatch) -> Option<Transaction> {
        let tx = self.transactions.get_mut(&id)?;
        patch.apply(tx);
        Some(tx.clone())
    }

    /// Returns whether a transaction existed at `id`.
    pub fn delete_transaction(&mut self, id: u64) -> bool {
        self.transactions.remove(&id).is_some()
    }

    /// All transactions, most recent `date` first. Equal dates keep insertion
    /// order.
    pub fn transactions(&self) -> Vec<Transaction> {
        // BTreeMap iterates by id, which is insertion order; the sort is stable.
        let mut all: Vec<Transaction> = self.transactions.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        all
    }

    /// Transactions with `from <= date <= to`, in list order.
    pub fn transactions_in_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Transaction> {
        self.transactions()
            .into_iter()
            .filter(|tx| tx.date >= from && tx.date <= to)
            .collect()
    }

    /// Transactions whose category label equals `category` exactly.
    pub fn transactions_by_category(&self, category: &str) -> Vec<Transaction> {
        self.transactions()
            .into_iter()
            .filter(|tx| tx.category == category)
            .collect()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn create_category(&mut self, data: NewCategory) -> Category {
        let id = self.next_category_id;
        self.next_category_id += 1;

        let category = Category {
            id,
            name: data.name,
            icon: data.icon,
            color: data.color,
        };
        self.categories.insert(id, category.clone());
        category
    }

    pub fn category(&self, id: u64) -> Option<Category> {
        self.categories.get(&id).cloned()
    }

    /// Case- and spacing-insensitive lookup.
    pub fn category_by_name(&self, name: &str) -> Option<Category> {
        let key = normalize_category_key(name);
        self.categories
            .values()
            .find(|c| normalize_category_key(&c.name) == key)
            .cloned()
    }

    /// All categories in id order.
    pub fn categories(&self) -> Vec<Category> {
        self.categories.values().cloned().collect()
    }
}

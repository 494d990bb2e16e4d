//! Storage, analytics and import for the money tracker.
//!
//! [`Engine`] is the entry point for every caller. It owns a [`Store`] behind
//! an async `RwLock`: reads share the lock, and each write holds it for the
//! whole id-allocation and insert step.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::RwLock;

pub use analytics::{AnalyticsSummary, CategoryTotal, DEFAULT_TOP_CATEGORIES, MonthWindow};
pub use categories::{Category, DEFAULT_CATEGORIES, NewCategory};
pub use error::{EngineError, FieldError};
pub use import::{
    ImportFailure, ImportOutcome, ImportReport, ImportedTransaction, ProposedTransaction,
};
pub use money::Money;
pub use store::Store;
pub use util::parse_date;
pub use transactions::{
    NewTransaction, Transaction, TransactionInput, TransactionKind, TransactionPatch,
};

pub mod analytics;
mod categories;
mod error;
mod import;
mod money;
mod store;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    store: RwLock<Store>,
    timezone: Tz,
    top_categories: usize,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Timezone used to decide which calendar month "now" falls in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// All transactions, most recent first.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.store.read().await.transactions()
    }

    pub async fn transaction_count(&self) -> usize {
        self.store.read().await.transaction_count()
    }

    pub async fn transaction(&self, id: u64) -> Option<Transaction> {
        self.store.read().await.transaction(id)
    }

    pub async fn create_transaction(&self, data: NewTransaction) -> ResultEngine<Transaction> {
        let data = data.validated()?;
        let tx = self.store.write().await.create_transaction(data, Utc::now());
        tracing::debug!(id = tx.id, kind = %tx.kind, amount = %tx.amount, "transaction created");
        Ok(tx)
    }

    /// Returns `Ok(None)` when no transaction has this id.
    pub async fn update_transaction(
        &self,
        id: u64,
        patch: TransactionPatch,
    ) -> ResultEngine<Option<Transaction>> {
        let patch = patch.validated()?;
        let updated = self.store.write().await.update_transaction(id, patch);
        if updated.is_some() {
            tracing::debug!(id, "transaction updated");
        }
        Ok(updated)
    }

    /// Returns whether a transaction existed at `id`.
    pub async fn delete_transaction(&self, id: u64) -> bool {
        let deleted = self.store.write().await.delete_transaction(id);
        if deleted {
            tracing::debug!(id, "transaction deleted");
        }
        deleted
    }

    /// Transactions dated within `[from, to]`, most recent first.
    pub async fn transactions_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<Transaction> {
        self.store.read().await.transactions_in_range(from, to)
    }

    pub async fn transactions_by_category(&self, category: &str) -> Vec<Transaction> {
        self.store.read().await.transactions_by_category(category)
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.store.read().await.categories()
    }

    pub async fn category(&self, id: u64) -> Option<Category> {
        self.store.read().await.category(id)
    }

    /// Category names are unique, ignoring case and repeated spaces.
    pub async fn create_category(&self, data: NewCategory) -> ResultEngine<Category> {
        let data = data.validated()?;
        let mut store = self.store.write().await;
        if let Some(existing) = store.category_by_name(&data.name) {
            return Err(EngineError::ExistingKey(existing.name));
        }
        let category = store.create_category(data);
        tracing::debug!(id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Summary for the current month in the engine timezone.
    pub async fn analytics_summary(&self) -> AnalyticsSummary {
        self.analytics_summary_at(Utc::now()).await
    }

    pub async fn analytics_summary_at(&self, now: DateTime<Utc>) -> AnalyticsSummary {
        let window = MonthWindow::containing(&now.with_timezone(&self.timezone));
        let transactions = self.transactions().await;
        analytics::summarize(&transactions, &window, self.top_categories)
    }

    /// Commits each proposal independently, in order. Failed proposals are
    /// reported and do not undo earlier commits.
    pub async fn import_proposals(&self, proposals: Vec<ProposedTransaction>) -> ImportOutcome {
        if proposals.is_empty() {
            tracing::info!("import: no transactions proposed");
            return ImportOutcome::NothingFound;
        }

        let mut report = ImportReport::default();
        for (index, proposal) in proposals.into_iter().enumerate() {
            let committed = match proposal.into_new() {
                Ok((data, confidence)) => self
                    .create_transaction(data)
                    .await
                    .map(|transaction| ImportedTransaction {
                        transaction,
                        confidence,
                    }),
                Err(err) => Err(err),
            };
            match committed {
                Ok(imported) => report.imported.push(imported),
                Err(error) => {
                    tracing::warn!(index, "import: proposal rejected: {error}");
                    report.failures.push(ImportFailure { index, error });
                }
            }
        }

        tracing::info!(
            imported = report.imported.len(),
            failed = report.failures.len(),
            "import finished"
        );
        ImportOutcome::Imported(report)
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    timezone: Tz,
    top_categories: usize,
    store: Option<Store>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            top_categories: DEFAULT_TOP_CATEGORIES,
            store: None,
        }
    }
}

impl EngineBuilder {
    /// Timezone for the current-month window. Defaults to UTC.
    pub fn timezone(mut self, timezone: Tz) -> EngineBuilder {
        self.timezone = timezone;
        self
    }

    /// How many categories the summary ranks. Defaults to 5.
    pub fn top_categories(mut self, top: usize) -> EngineBuilder {
        self.top_categories = top;
        self
    }

    /// Start from an existing store instead of a freshly seeded one.
    pub fn store(mut self, store: Store) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            store: RwLock::new(self.store.unwrap_or_default()),
            timezone: self.timezone,
            top_categories: self.top_categories,
        }
    }
}

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;

use engine::{
    Engine, EngineError, ImportOutcome, Money, NewCategory, NewTransaction, ProposedTransaction,
    Store, TransactionKind, TransactionPatch,
};

fn engine() -> Engine {
    Engine::builder().build()
}

fn new_tx(kind: TransactionKind, amount: &str, date: Option<DateTime<Utc>>) -> NewTransaction {
    NewTransaction {
        amount: amount.parse().unwrap(),
        description: "test".to_string(),
        category: "Shopping".to_string(),
        kind,
        date,
    }
}

fn proposal(amount: &str, kind: &str) -> ProposedTransaction {
    ProposedTransaction {
        amount: amount.to_string(),
        description: "Groceries".to_string(),
        category: "Food & Dining".to_string(),
        kind: kind.to_string(),
        date: None,
        confidence: Some(0.8),
    }
}

#[tokio::test]
async fn ids_strictly_increase_across_deletes() {
    let engine = engine();
    let mut last = 0;
    for round in 0..5 {
        let tx = engine
            .create_transaction(new_tx(TransactionKind::Expense, "1", None))
            .await
            .unwrap();
        assert!(tx.id > last);
        last = tx.id;
        if round % 2 == 0 {
            assert!(engine.delete_transaction(tx.id).await);
        }
    }
    assert_eq!(engine.transactions().await.len(), 2);
}

#[tokio::test]
async fn balance_tracks_creates_and_deletes() {
    let engine = engine();
    engine
        .create_transaction(new_tx(TransactionKind::Income, "100", None))
        .await
        .unwrap();
    let expense = engine
        .create_transaction(new_tx(TransactionKind::Expense, "40", None))
        .await
        .unwrap();

    assert_eq!(engine.analytics_summary().await.total_balance, Money::new(6000));

    assert!(engine.delete_transaction(expense.id).await);
    assert_eq!(engine.analytics_summary().await.total_balance, Money::new(10000));
}

#[tokio::test]
async fn last_month_does_not_count_towards_monthly_totals() {
    let engine = engine();
    let now = Utc.with_ymd_and_hms(2024, 7, 10, 12, 0, 0).unwrap();
    let june = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap();
    let july_first = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

    engine
        .create_transaction(new_tx(TransactionKind::Income, "500", Some(june)))
        .await
        .unwrap();
    engine
        .create_transaction(new_tx(TransactionKind::Expense, "20", Some(june)))
        .await
        .unwrap();
    engine
        .create_transaction(new_tx(TransactionKind::Expense, "15.50", Some(july_first)))
        .await
        .unwrap();

    let summary = engine.analytics_summary_at(now).await;
    assert_eq!(summary.monthly_income, Money::ZERO);
    assert_eq!(summary.monthly_expenses, Money::new(1550));
    assert_eq!(summary.total_balance, Money::new(50000 - 2000 - 1550));
}

#[tokio::test]
async fn monthly_window_uses_engine_timezone() {
    let tz: Tz = "America/New_York".parse().unwrap();
    let engine = Engine::builder().timezone(tz).build();
    assert_eq!(engine.timezone(), tz);
    // 2024-08-01T02:00Z is still July 31st in New York.
    let late_july_local = Utc.with_ymd_and_hms(2024, 8, 1, 2, 0, 0).unwrap();
    engine
        .create_transaction(new_tx(TransactionKind::Expense, "9", Some(late_july_local)))
        .await
        .unwrap();

    let in_july = engine
        .analytics_summary_at(Utc.with_ymd_and_hms(2024, 7, 20, 12, 0, 0).unwrap())
        .await;
    let in_august = engine
        .analytics_summary_at(Utc.with_ymd_and_hms(2024, 8, 20, 12, 0, 0).unwrap())
        .await;
    assert_eq!(in_july.monthly_expenses, Money::new(900));
    assert_eq!(in_august.monthly_expenses, Money::ZERO);
}

#[tokio::test]
async fn update_missing_transaction_changes_nothing() {
    let engine = engine();
    engine
        .create_transaction(new_tx(TransactionKind::Expense, "1", None))
        .await
        .unwrap();

    let result = engine
        .update_transaction(
            99,
            TransactionPatch {
                description: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(engine.transaction_count().await, 1);
}

#[tokio::test]
async fn update_rejects_invalid_fields() {
    let engine = engine();
    let tx = engine
        .create_transaction(new_tx(TransactionKind::Expense, "1", None))
        .await
        .unwrap();

    let err = engine
        .update_transaction(
            tx.id,
            TransactionPatch {
                description: Some("   ".to_string()),
                amount: Some(Money::new(-5)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(ref f) if f.len() == 2));
    assert_eq!(engine.transaction(tx.id).await, Some(tx));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let engine = engine();
    let tx = engine
        .create_transaction(new_tx(TransactionKind::Income, "3", None))
        .await
        .unwrap();
    assert!(engine.delete_transaction(tx.id).await);
    assert!(!engine.delete_transaction(tx.id).await);
}

#[tokio::test]
async fn list_and_range_queries_are_date_descending() {
    let engine = engine();
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for offset in [3, 1, 2] {
        engine
            .create_transaction(new_tx(
                TransactionKind::Expense,
                "1",
                Some(base + Duration::days(offset)),
            ))
            .await
            .unwrap();
    }

    let dates: Vec<_> = engine.transactions().await.iter().map(|t| t.date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);

    let hits = engine
        .transactions_in_range(base + Duration::days(1), base + Duration::days(2))
        .await;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].date, base + Duration::days(2));
}

#[tokio::test]
async fn duplicate_category_names_are_rejected() {
    let engine = engine();
    let travel = engine
        .create_category(NewCategory::new("Travel", "fas fa-plane", "#123456"))
        .await
        .unwrap();
    assert_eq!(travel.id, 8);

    let err = engine
        .create_category(NewCategory::new(" travel ", "fas fa-plane", "#123456"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Travel".to_string()));
    assert_eq!(engine.categories().await.len(), 8);
    assert_eq!(engine.category(8).await, Some(travel));
}

#[tokio::test]
async fn empty_import_is_nothing_found() {
    let engine = engine();
    assert_eq!(engine.import_proposals(Vec::new()).await, ImportOutcome::NothingFound);
    assert!(engine.transactions().await.is_empty());
}

#[tokio::test]
async fn import_commits_valid_proposals_and_reports_the_rest() {
    let engine = engine();
    let outcome = engine
        .import_proposals(vec![
            proposal("12.50", "expense"),
            proposal("3.00", "gift"),
            proposal("1000", "income"),
        ])
        .await;

    let ImportOutcome::Imported(report) = outcome else {
        panic!("expected an import report");
    };
    assert_eq!(report.count(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.imported[0].confidence, Some(0.8));
    assert_eq!(engine.transactions().await.len(), 2);
}

#[tokio::test]
async fn import_without_date_uses_commit_time() {
    let engine = engine();
    let before = Utc::now();
    let ImportOutcome::Imported(report) = engine
        .import_proposals(vec![proposal("5", "expense")])
        .await
    else {
        panic!("expected an import report");
    };
    let tx = &report.imported[0].transaction;
    assert!(tx.date >= before);
    assert_eq!(tx.date, tx.created_at);
}

#[tokio::test]
async fn amounts_beyond_the_cap_are_rejected() {
    let engine = engine();
    let err = engine
        .create_transaction(new_tx(TransactionKind::Income, "92233720368547758.07", None))
        .await
        .unwrap_err();

    assert_eq!(err.field_errors()[0].field, "amount");
    assert_eq!(engine.transaction_count().await, 0);
}

#[tokio::test]
async fn summary_of_huge_totals_saturates() {
    let mut store = Store::new();
    for _ in 0..2 {
        store.create_transaction(
            NewTransaction {
                amount: Money::new(i64::MAX),
                description: "jackpot".to_string(),
                category: "Income".to_string(),
                kind: TransactionKind::Income,
                date: None,
            },
            Utc::now(),
        );
    }
    let engine = Engine::builder().store(store).build();

    let summary = engine.analytics_summary().await;
    assert_eq!(summary.total_balance, Money::new(i64::MAX));
    assert_eq!(summary.monthly_income, Money::new(i64::MAX));
}

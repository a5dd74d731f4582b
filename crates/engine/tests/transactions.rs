use chrono::{TimeZone, Utc};

use engine::{
    Ledger, LedgerError, MemoryStore, MoneyPaise, Role, TransactionDraft, TransactionFilter,
    TransactionKind, User,
};

fn ledger() -> Ledger {
    Ledger::builder().store(MemoryStore::new()).build().unwrap()
}

async fn add_member(ledger: &Ledger, id: &str, name: &str, balance_rupees: i64) {
    ledger
        .put_user(&User::new(
            id,
            name,
            MoneyPaise::from_rupees(balance_rupees),
            Role::Member,
        ))
        .await
        .unwrap();
}

async fn balance_of(ledger: &Ledger, id: &str) -> MoneyPaise {
    ledger.user(id).await.unwrap().balance
}

fn draft(kind: TransactionKind, rupees: i64, user: &str, to: Option<&str>) -> TransactionDraft {
    TransactionDraft {
        kind,
        amount: MoneyPaise::from_rupees(rupees),
        date: Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap(),
        user: user.to_string(),
        to: to.map(ToString::to_string),
        description: String::new(),
        category: if kind == TransactionKind::Transfer {
            String::new()
        } else {
            "Miscellaneous".to_string()
        },
    }
}

#[tokio::test]
async fn income_credits_and_expense_debits_origin() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;

    ledger
        .create_transaction(draft(TransactionKind::Income, 300, "amma", None))
        .await
        .unwrap();
    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(1300));

    ledger
        .create_transaction(draft(TransactionKind::Expense, 200, "amma", None))
        .await
        .unwrap();
    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(1100));

    ledger
        .create_transaction(draft(TransactionKind::Investment, 100, "amma", None))
        .await
        .unwrap();
    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(1000));
}

#[tokio::test]
async fn transfer_moves_amount_between_members() {
    let ledger = ledger();
    add_member(&ledger, "achan", "Achan", 500).await;
    add_member(&ledger, "kunji", "Kunji", 0).await;

    ledger
        .create_transaction(draft(TransactionKind::Transfer, 150, "achan", Some("kunji")))
        .await
        .unwrap();

    assert_eq!(balance_of(&ledger, "achan").await, MoneyPaise::from_rupees(350));
    assert_eq!(balance_of(&ledger, "kunji").await, MoneyPaise::from_rupees(150));
}

#[tokio::test]
async fn transfer_without_destination_only_debits_origin() {
    let ledger = ledger();
    add_member(&ledger, "achan", "Achan", 500).await;

    ledger
        .create_transaction(draft(TransactionKind::Transfer, 150, "achan", None))
        .await
        .unwrap();

    assert_eq!(balance_of(&ledger, "achan").await, MoneyPaise::from_rupees(350));
}

#[tokio::test]
async fn delete_restores_every_affected_balance() {
    let ledger = ledger();
    add_member(&ledger, "achan", "Achan", 500).await;
    add_member(&ledger, "kunji", "Kunji", 80).await;

    let id = ledger
        .create_transaction(draft(TransactionKind::Transfer, 150, "achan", Some("kunji")))
        .await
        .unwrap();
    ledger.delete_transaction(&id).await.unwrap();

    assert_eq!(balance_of(&ledger, "achan").await, MoneyPaise::from_rupees(500));
    assert_eq!(balance_of(&ledger, "kunji").await, MoneyPaise::from_rupees(80));
    assert!(matches!(
        ledger.transaction(&id).await,
        Err(LedgerError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn noop_edit_leaves_balances_unchanged() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;

    let fields = draft(TransactionKind::Expense, 250, "amma", None);
    let id = ledger.create_transaction(fields.clone()).await.unwrap();
    ledger.update_transaction(&id, fields).await.unwrap();

    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(750));
}

#[tokio::test]
async fn edit_moves_effect_to_the_new_origin() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;
    add_member(&ledger, "achan", "Achan", 1000).await;

    let id = ledger
        .create_transaction(draft(TransactionKind::Expense, 250, "amma", None))
        .await
        .unwrap();
    ledger
        .update_transaction(&id, draft(TransactionKind::Expense, 250, "achan", None))
        .await
        .unwrap();

    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(1000));
    assert_eq!(balance_of(&ledger, "achan").await, MoneyPaise::from_rupees(750));
}

#[tokio::test]
async fn edit_between_transfers_touches_all_four_balances() {
    let ledger = ledger();
    for id in ["a", "b", "c", "d"] {
        add_member(&ledger, id, id, 100).await;
    }

    let id = ledger
        .create_transaction(draft(TransactionKind::Transfer, 40, "a", Some("b")))
        .await
        .unwrap();
    ledger
        .update_transaction(&id, draft(TransactionKind::Transfer, 70, "c", Some("d")))
        .await
        .unwrap();

    assert_eq!(balance_of(&ledger, "a").await, MoneyPaise::from_rupees(100));
    assert_eq!(balance_of(&ledger, "b").await, MoneyPaise::from_rupees(100));
    assert_eq!(balance_of(&ledger, "c").await, MoneyPaise::from_rupees(30));
    assert_eq!(balance_of(&ledger, "d").await, MoneyPaise::from_rupees(170));
}

#[tokio::test]
async fn edit_changing_kind_reverses_old_polarity() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;

    let id = ledger
        .create_transaction(draft(TransactionKind::Expense, 200, "amma", None))
        .await
        .unwrap();
    ledger
        .update_transaction(&id, draft(TransactionKind::Income, 200, "amma", None))
        .await
        .unwrap();

    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(1200));
    let stored = ledger.transaction(&id).await.unwrap();
    assert_eq!(stored.kind, TransactionKind::Income);
}

#[tokio::test]
async fn validation_rejects_bad_drafts_before_any_write() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;

    let mut missing_category = draft(TransactionKind::Expense, 100, "amma", None);
    missing_category.category = "  ".to_string();
    assert!(matches!(
        ledger.create_transaction(missing_category).await,
        Err(LedgerError::Validation(_))
    ));

    let zero_amount = draft(TransactionKind::Income, 0, "amma", None);
    assert!(matches!(
        ledger.create_transaction(zero_amount).await,
        Err(LedgerError::Validation(_))
    ));

    let no_user = draft(TransactionKind::Income, 100, "  ", None);
    assert!(matches!(
        ledger.create_transaction(no_user).await,
        Err(LedgerError::Validation(_))
    ));

    let legacy = draft(TransactionKind::Profit, 100, "amma", None);
    assert!(matches!(
        ledger.create_transaction(legacy).await,
        Err(LedgerError::Validation(_))
    ));

    let self_transfer = draft(TransactionKind::Transfer, 100, "amma", Some("amma"));
    assert!(matches!(
        ledger.create_transaction(self_transfer).await,
        Err(LedgerError::Validation(_))
    ));

    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(1000));
    assert!(ledger
        .list_transactions(&TransactionFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn transfer_category_is_optional() {
    let ledger = ledger();
    add_member(&ledger, "achan", "Achan", 500).await;
    add_member(&ledger, "amma", "Amma", 0).await;

    let id = ledger
        .create_transaction(draft(TransactionKind::Transfer, 50, "achan", Some("amma")))
        .await
        .unwrap();
    assert_eq!(ledger.transaction(&id).await.unwrap().category, "");
}

#[tokio::test]
async fn dangling_user_references_are_skipped_not_fatal() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;

    // Origin does not exist: the record lands, no balance moves.
    let id = ledger
        .create_transaction(draft(TransactionKind::Expense, 100, "ghost", None))
        .await
        .unwrap();
    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(1000));

    // Transfer to a missing destination still debits the origin.
    ledger
        .create_transaction(draft(TransactionKind::Transfer, 100, "amma", Some("ghost")))
        .await
        .unwrap();
    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(900));

    // Deleting the dangling transaction is a no-op on balances too.
    ledger.delete_transaction(&id).await.unwrap();
    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(900));
}

#[tokio::test]
async fn list_filters_by_user_and_kind_newest_first() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;
    add_member(&ledger, "achan", "Achan", 1000).await;

    let mut old_expense = draft(TransactionKind::Expense, 10, "amma", None);
    old_expense.date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    ledger.create_transaction(old_expense).await.unwrap();
    ledger
        .create_transaction(draft(TransactionKind::Expense, 20, "amma", None))
        .await
        .unwrap();
    ledger
        .create_transaction(draft(TransactionKind::Income, 30, "achan", None))
        .await
        .unwrap();

    let amma_expenses = ledger
        .list_transactions(&TransactionFilter {
            user: Some("amma".to_string()),
            kind: Some(TransactionKind::Expense),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(amma_expenses.len(), 2);
    assert_eq!(amma_expenses[0].amount, MoneyPaise::from_rupees(20));

    let latest = ledger
        .list_transactions(&TransactionFilter {
            user: None,
            kind: None,
            limit: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(latest.len(), 2);
}

#[tokio::test]
async fn comments_append_and_survive_edits() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;

    let id = ledger
        .create_transaction(draft(TransactionKind::Expense, 100, "amma", None))
        .await
        .unwrap();
    let comment = ledger
        .add_comment(&id, "amma", "was this the gas bill?")
        .await
        .unwrap();
    assert_eq!(comment.author_name, "Amma");

    // Unknown authors fall back to their id.
    let other = ledger.add_comment(&id, "visitor", "yes").await.unwrap();
    assert_eq!(other.author_name, "visitor");

    // Comments never move balances.
    assert_eq!(balance_of(&ledger, "amma").await, MoneyPaise::from_rupees(900));

    ledger
        .update_transaction(&id, draft(TransactionKind::Expense, 150, "amma", None))
        .await
        .unwrap();
    let stored = ledger.transaction(&id).await.unwrap();
    assert_eq!(stored.comments.len(), 2);
    assert_eq!(stored.comments[0].text, "was this the gas bill?");

    assert!(matches!(
        ledger.add_comment(&id, "amma", "   ").await,
        Err(LedgerError::Validation(_))
    ));
}

#[tokio::test]
async fn claim_profile_links_email_once() {
    let ledger = ledger();
    add_member(&ledger, "kunji", "Kunji", 0).await;

    let claimed = ledger
        .claim_profile("kunji", "kunji@example.com")
        .await
        .unwrap();
    assert_eq!(claimed.email.as_deref(), Some("kunji@example.com"));

    assert!(matches!(
        ledger.claim_profile("kunji", "other@example.com").await,
        Err(LedgerError::ExistingKey(_))
    ));
    assert!(matches!(
        ledger.claim_profile("ghost", "x@example.com").await,
        Err(LedgerError::KeyNotFound(_))
    ));
    assert!(matches!(
        ledger.claim_profile("kunji", "not-an-email").await,
        Err(LedgerError::Validation(_))
    ));
}

#[tokio::test]
async fn subscription_sees_lifecycle_events() {
    let ledger = ledger();
    add_member(&ledger, "amma", "Amma", 1000).await;
    let mut events = ledger.subscribe_transactions();

    let id = ledger
        .create_transaction(draft(TransactionKind::Expense, 100, "amma", None))
        .await
        .unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event.id, id);
    assert_eq!(event.kind, engine::ChangeKind::Created);
}

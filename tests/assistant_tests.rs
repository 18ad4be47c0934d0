//! Receipt ingestion and spending questions against a CSV ledger.

#[path = "common/mod.rs"]
mod common;

#[cfg(test)]
mod assistant_tests {
    use rexpense::{
        Answer, CsvLedgerStore, ExpenseAssistant, Ledger, RExpenseError, TimeRangeSpec,
        ToolChoice,
    };
    use rust_decimal::Decimal;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::common::{
        FakeProvider, date, may_2024_records, receipt_arguments, receipt_image, text_response,
        tool_response,
    };

    fn seeded_store(dir: &TempDir) -> CsvLedgerStore {
        let store = CsvLedgerStore::new(dir.path().join("expenses.csv"));
        store.save(&Ledger::from(may_2024_records())).unwrap();
        store
    }

    #[tokio::test]
    async fn test_ingest_receipt_appends_to_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let assistant = ExpenseAssistant::new(
            FakeProvider::new(vec![tool_response("record_receipt", &receipt_arguments())]),
            store,
        );

        let added = assistant.ingest_receipt(receipt_image()).await.unwrap();
        assert_eq!(added.len(), 2);

        let ledger = assistant.store().load().unwrap();
        assert_eq!(ledger.len(), 4);
        assert_eq!(&ledger.records()[..2], may_2024_records().as_slice());
        assert_eq!(&ledger.records()[2..], added.as_slice());
    }

    #[tokio::test]
    async fn test_failed_ingest_leaves_ledger_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let before = std::fs::read_to_string(store.path()).unwrap();
        let assistant = ExpenseAssistant::new(
            FakeProvider::new(vec![text_response("That does not look like a receipt.")]),
            store,
        );

        let err = assistant.ingest_receipt(receipt_image()).await.unwrap_err();
        assert!(err.needs_resubmission(), "{:?}", err);
        assert_eq!(std::fs::read_to_string(assistant.store().path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_ask_computes_total_from_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = ExpenseAssistant::new(
            FakeProvider::new(vec![tool_response(
                "get_total_expenses",
                &json!({"date_range": {"start_date": "2024-05-11", "end_date": "2024-05-16"}}),
            )]),
            seeded_store(&dir),
        );

        let answer = assistant
            .ask("How much did I spend between May 11 and May 16, 2024?")
            .await
            .unwrap();
        assert_eq!(
            answer,
            Answer::Total {
                range: TimeRangeSpec::date_range(date(2024, 5, 11), date(2024, 5, 16)).unwrap(),
                total: Decimal::new(7263, 2),
            }
        );

        let sent = assistant.extractor().provider().requests();
        assert_eq!(sent[0].tools[0].name, "get_total_expenses");
        assert_eq!(sent[0].tool_choice, ToolChoice::Auto);
    }

    #[tokio::test]
    async fn test_ask_on_missing_ledger_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = ExpenseAssistant::new(
            FakeProvider::new(vec![tool_response("get_total_expenses", &json!({"year": 2024}))]),
            CsvLedgerStore::new(dir.path().join("none-yet.csv")),
        );

        match assistant.ask("What did I spend this year?").await.unwrap() {
            Answer::Total { total, .. } => assert_eq!(total, Decimal::ZERO),
            other => panic!("expected a total, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ask_passes_text_through() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = ExpenseAssistant::new(
            FakeProvider::new(vec![text_response("I can only answer spending questions.")]),
            seeded_store(&dir),
        );

        assert_eq!(
            assistant.ask("What's the weather like?").await.unwrap(),
            Answer::Text("I can only answer spending questions.".to_string())
        );
    }

    #[tokio::test]
    async fn test_ask_with_empty_arguments_is_invalid_time_range() {
        let dir = tempfile::tempdir().unwrap();
        let assistant = ExpenseAssistant::new(
            FakeProvider::new(vec![tool_response("get_total_expenses", &json!({}))]),
            seeded_store(&dir),
        );

        let err = assistant.ask("How much did I spend?").await.unwrap_err();
        assert!(matches!(err, RExpenseError::InvalidTimeRange(_)), "{:?}", err);
    }
}

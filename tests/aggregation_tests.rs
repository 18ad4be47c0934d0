//! Time-range aggregation over ledger records.

#[path = "common/mod.rs"]
mod common;

#[cfg(test)]
mod aggregation_tests {
    use rexpense::{
        Category, ExpenseRecord, PaymentMethod, RExpenseError, TimeRangeSpec, filter_records,
        total_expenses,
    };
    use rexpense::query::total_expenses_from_arguments;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::common::{date, may_2024_records, record};

    #[test]
    fn test_date_range_scenario() {
        let spec = TimeRangeSpec::date_range(date(2024, 5, 11), date(2024, 5, 16))
            .expect("valid range");
        assert_eq!(total_expenses(&spec, &may_2024_records()).unwrap(), Decimal::new(7263, 2));
    }

    #[test]
    fn test_year_scenarios() {
        let records = may_2024_records();
        assert_eq!(
            total_expenses(&TimeRangeSpec::Year(2024), &records).unwrap(),
            Decimal::new(7263, 2)
        );
        assert_eq!(total_expenses(&TimeRangeSpec::Year(2023), &records).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_empty_subset_sums_to_zero() {
        let records = may_2024_records();
        let spec = TimeRangeSpec::SpecificDate(date(2024, 5, 12));
        assert!(filter_records(&spec, &records).is_empty());
        assert_eq!(total_expenses(&spec, &records).unwrap(), Decimal::ZERO);
        assert_eq!(total_expenses(&TimeRangeSpec::Year(2024), &[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_specific_date_is_exact_match() {
        let records = may_2024_records();
        let spec = TimeRangeSpec::SpecificDate(date(2024, 5, 16));
        assert_eq!(total_expenses(&spec, &records).unwrap(), Decimal::new(2273, 2));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let records = may_2024_records();
        let start_only = TimeRangeSpec::date_range(date(2024, 5, 1), date(2024, 5, 11))
            .expect("valid range");
        let end_only = TimeRangeSpec::date_range(date(2024, 5, 16), date(2024, 5, 31))
            .expect("valid range");
        let between = TimeRangeSpec::date_range(date(2024, 5, 12), date(2024, 5, 15))
            .expect("valid range");

        assert_eq!(total_expenses(&start_only, &records).unwrap(), Decimal::new(4990, 2));
        assert_eq!(total_expenses(&end_only, &records).unwrap(), Decimal::new(2273, 2));
        assert_eq!(total_expenses(&between, &records).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_month_year_is_exact_match() {
        let records = vec![
            record(2024, 4, 30, 100),
            record(2024, 5, 1, 200),
            record(2024, 5, 31, 300),
            record(2024, 6, 1, 400),
            record(2023, 5, 15, 500),
        ];
        let spec = TimeRangeSpec::month_year(5, 2024).expect("valid month");
        assert_eq!(total_expenses(&spec, &records).unwrap(), Decimal::new(500, 2));
    }

    #[test]
    fn test_year_agrees_with_full_year_range() {
        let records = vec![
            record(2022, 1, 1, 1999),
            record(2022, 2, 28, 5),
            record(2022, 7, 4, 12000),
            record(2022, 12, 31, 1),
        ];
        let range = TimeRangeSpec::date_range(date(2022, 1, 1), date(2022, 12, 31))
            .expect("valid range");
        assert_eq!(
            total_expenses(&TimeRangeSpec::Year(2022), &records).unwrap(),
            total_expenses(&range, &records).unwrap()
        );
    }

    #[test]
    fn test_result_does_not_depend_on_order() {
        let mut records = may_2024_records();
        records.push(record(2024, 5, 13, 1000));
        let spec = TimeRangeSpec::Year(2024);
        let forward = total_expenses(&spec, &records).unwrap();
        records.reverse();
        assert_eq!(total_expenses(&spec, &records).unwrap(), forward);
    }

    #[test]
    fn test_missing_keys_is_invalid_time_range() {
        let err = total_expenses_from_arguments(&json!({}), &may_2024_records()).unwrap_err();
        match err {
            RExpenseError::InvalidTimeRange(msg) => {
                assert!(msg.contains("specific_date"), "{}", msg)
            }
            other => panic!("expected InvalidTimeRange, got {:?}", other),
        }
    }

    #[test]
    fn test_arguments_follow_priority_chain() {
        let records = may_2024_records();
        let total = total_expenses_from_arguments(
            &json!({"specific_date": "2024-05-11", "year": 2024}),
            &records,
        )
        .expect("valid arguments");
        assert_eq!(total, Decimal::new(4990, 2));
    }

    #[test]
    fn test_total_past_decimal_max_is_overflow() {
        let records = vec![
            record(2024, 5, 11, 100),
            ExpenseRecord::new(
                date(2024, 5, 16),
                "Corner Shop",
                "Gold bar",
                1,
                Decimal::MAX,
                Category::Other,
                PaymentMethod::Cash,
            )
            .expect("valid record"),
        ];
        let err = total_expenses(&TimeRangeSpec::Year(2024), &records).unwrap_err();
        assert!(matches!(err, RExpenseError::Overflow(_)), "{:?}", err);
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod execute_tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::cli::argument_parsing::BillsOptions;
    use crate::cli::commands::execute;
    use crate::error::BillError;
    use crate::period::MonthKey;
    use crate::store::{BillStore, MemoryBillStore};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 12).unwrap().and_hms_opt(20, 15, 0).unwrap()
    }

    fn run(store: &MemoryBillStore, arguments: &[&str]) -> Result<String, BillError> {
        let mut full = vec!["bills"];
        full.extend_from_slice(arguments);
        let options = BillsOptions::try_parse_from(full).unwrap();
        execute(options.command, store, "R$", now())
    }

    fn only_bill_id(store: &MemoryBillStore) -> String {
        let bills = store.list_all().unwrap();
        assert_eq!(bills.len(), 1);
        bills[0].id().to_string()
    }

    #[test]
    fn add__defaults_to_current_month() {
        let store = MemoryBillStore::default();
        let screen = run(&store, &["add", "-n", "Water", "-a", "75,30"]).unwrap();

        assert!(screen.contains("Added 1 bill(s)"));
        assert!(screen.contains("R$ 75,30"));
        let bills = store.list_all().unwrap();
        assert_eq!(bills[0].month(), &MonthKey::parse("2024-03").unwrap());
        assert_eq!(bills[0].category(), "Uncategorized");
    }

    #[test]
    fn add__installments() {
        let store = MemoryBillStore::default();
        let screen = run(&store, &["add", "-n", "Sofa", "-a", "100", "-m", "2024-11", "-i", "3"]).unwrap();

        assert!(screen.contains("Added 3 bill(s)"));
        assert!(screen.contains("Sofa (3/3)"));
        assert!(screen.contains("2025-01"));
        assert!(screen.contains("R$ 33,34"));
        assert_eq!(store.list_all().unwrap().len(), 3);
    }

    #[test]
    fn add__fixed_without_span() {
        let store = MemoryBillStore::default();
        let result = run(&store, &["add", "-n", "Gym", "-a", "80", "-r", "fixed"]);
        assert!(matches!(result, Err(BillError::Validation(_))));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn add__zero_installments() {
        let store = MemoryBillStore::default();
        let result = run(&store, &["add", "-n", "Sofa", "-a", "100", "-i", "0"]);
        assert!(matches!(result, Err(BillError::Validation(_))));
    }

    #[test]
    fn list__generates_recurring_bills_first() {
        let store = MemoryBillStore::default();
        run(&store, &["add", "-n", "Gym", "-a", "80", "-m", "2024-01", "-r", "fixed", "-s", "6"]).unwrap();

        let screen = run(&store, &["list", "-m", "2024-02"]).unwrap();
        assert!(screen.starts_with("Bills for 2024-02\n================="));
        assert!(screen.contains("Gym"));
        assert!(screen.contains("6 months"));
        assert!(screen.contains("Release: "));

        // February was asked for, March is the current month
        let months: Vec<String> = store
            .list_all()
            .unwrap()
            .iter()
            .map(|bill| bill.month().to_string())
            .collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    }

    #[test]
    fn list__empty_month() {
        let store = MemoryBillStore::default();
        let screen = run(&store, &["list", "-m", "2023-07"]).unwrap();
        assert!(screen.contains("No bills for this month"));
        assert!(screen.contains("Summary"));
    }

    #[test]
    fn list__filters() {
        let store = MemoryBillStore::default();
        run(&store, &["add", "-n", "Water", "-a", "70", "-c", "Water"]).unwrap();
        run(&store, &["add", "-n", "Fiber", "-a", "99,90", "-c", "Internet"]).unwrap();

        let by_category = run(&store, &["list", "-c", "Internet"]).unwrap();
        assert!(by_category.contains("Fiber"));
        assert!(by_category.contains("🌐 Internet"));
        assert!(!by_category.contains("Water"));

        let by_search = run(&store, &["list", "-s", "WAT"]).unwrap();
        assert!(by_search.contains("Water"));
        assert!(!by_search.contains("Fiber"));
    }

    #[test]
    fn pay__then_unpay() {
        let store = MemoryBillStore::default();
        run(&store, &["add", "-n", "Rent", "-a", "1.500,00"]).unwrap();
        let id = only_bill_id(&store);

        assert_eq!(run(&store, &["pay", &id]).unwrap(), "Paid 'Rent': R$ 1.500,00\n");
        assert!(store.get_by_id(&id).unwrap().is_paid());

        let screen = run(&store, &["list"]).unwrap();
        assert!(screen.contains("✅ paid R$ 1.500,00 on 2024-03-12"));

        assert_eq!(run(&store, &["unpay", &id]).unwrap(), "'Rent' is pending again\n");
        assert!(!store.get_by_id(&id).unwrap().is_paid());
    }

    #[test]
    fn edit__keeps_unspecified_fields() {
        let store = MemoryBillStore::default();
        run(&store, &["add", "-n", "Rent", "-a", "1500", "-c", "Housing", "--notes", "flat 12"]).unwrap();
        let id = only_bill_id(&store);

        run(&store, &["edit", &id, "-a", "1.550,00"]).unwrap();

        let bill = store.get_by_id(&id).unwrap();
        assert_eq!(bill.amount(), &dec!(1550));
        assert_eq!(bill.name(), "Rent");
        assert_eq!(bill.category(), "Housing");
        assert_eq!(bill.notes(), "flat 12");
    }

    #[test]
    fn delete__unknown_id() {
        let store = MemoryBillStore::default();
        assert!(matches!(run(&store, &["delete", "nope"]), Err(BillError::NotFound(_))));
    }

    #[test]
    fn delete__removes() {
        let store = MemoryBillStore::default();
        run(&store, &["add", "-n", "Rent", "-a", "1500"]).unwrap();
        let id = only_bill_id(&store);

        assert_eq!(run(&store, &["delete", &id]).unwrap(), "Deleted 'Rent' (2024-03)\n");
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn add_category__then_list() {
        let store = MemoryBillStore::default();
        assert_eq!(
            run(&store, &["add-category", "-n", "Pets", "-i", "🐶"]).unwrap(),
            "Added category 🐶 Pets\n"
        );
        assert!(matches!(
            run(&store, &["add-category", "-n", "pets"]),
            Err(BillError::Validation(_))
        ));

        let screen = run(&store, &["categories"]).unwrap();
        assert!(screen.starts_with("Categories\n=========="));
        assert!(screen.contains("Pets"));
        assert!(screen.contains("Uncategorized"));
    }

    #[test]
    fn summary__all_time() {
        let store = MemoryBillStore::default();
        run(&store, &["add", "-n", "Rent", "-a", "1000", "-m", "2024-01"]).unwrap();
        run(&store, &["add", "-n", "Water", "-a", "50", "-m", "2024-02"]).unwrap();

        let screen = run(&store, &["summary"]).unwrap();
        assert!(screen.starts_with("All bills"));
        assert!(screen.contains("R$ 1.050,00"));
    }

    #[test]
    fn generate__reports_count() {
        let store = MemoryBillStore::default();
        run(&store, &["add", "-n", "Fiber", "-a", "99,90", "-m", "2024-03", "-r", "indefinite"]).unwrap();

        assert_eq!(
            run(&store, &["generate", "-m", "2024-04"]).unwrap(),
            "Generated 1 recurring bill(s) for 2024-04\n"
        );
        assert_eq!(
            run(&store, &["generate", "-m", "2024-04"]).unwrap(),
            "Generated 0 recurring bill(s) for 2024-04\n"
        );
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod formatting_tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::bill::Bill;
    use crate::category::default_categories;
    use crate::cli::formatting::{format_categories, format_month_screen, title};
    use crate::period::MonthKey;
    use crate::summary::Summary;

    #[test]
    fn title__underlined() {
        assert_eq!(title("Bills for 2024-02"), "Bills for 2024-02\n=================");
    }

    #[test]
    fn title__counts_characters() {
        assert_eq!(title("Café"), "Café\n====");
    }

    #[test]
    fn month_screen__summary_rows() {
        let summary = Summary::of(Vec::new());
        let screen = format_month_screen(
            &MonthKey::parse("2024-02").unwrap(),
            &[],
            &summary,
            &default_categories(),
            "€",
        );

        assert!(screen.contains("Pending"));
        assert!(screen.contains("Paid"));
        assert!(screen.contains("€ 0,00"));
    }

    #[test]
    fn month_screen__flags_from_older_files() {
        let now = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let sofa = Bill::from_value(
            json!({"id": "s1", "name": "Sofa", "amount": "50", "month": "2024-02", "recorrente": true, "parcelas": 3}),
            now,
        )
        .unwrap();
        let summary = Summary::of([&sofa]);
        let screen = format_month_screen(
            &MonthKey::parse("2024-02").unwrap(),
            &[&sofa],
            &summary,
            &default_categories(),
            "R$",
        );

        assert!(screen.contains("recurrent"));
        assert!(screen.contains("of 3"));
        assert!(screen.contains("pending"));
    }

    #[test]
    fn categories__icons() {
        let screen = format_categories(&default_categories());
        assert!(screen.contains("💡"));
        assert!(screen.contains("Credit card"));
    }
}

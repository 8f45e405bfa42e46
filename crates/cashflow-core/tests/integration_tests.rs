//! Integration tests for cashflow-core
//!
//! These tests exercise the full ledger -> aggregate -> prompt -> generate ->
//! parse workflow against a real SQLite file and a mock LLM server.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use cashflow_core::{
    ai::{GeneratorClient, MockGenerator, TextGenerator, DISABLED_RESPONSE},
    config::{AiConfig, BackendKind},
    db::Database,
    insights::{InsightOrchestrator, InsightPlan},
    models::{NewCategory, NewTransaction, TransactionType, CONFIDENCE_DISABLED},
    test_utils::MockLlmServer,
    AnalysisAssembler, CategorySuggester, Error, Granularity, LedgerSummary,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Ledger with categories and two months of activity (April and May 2024)
fn seeded_ledger() -> Database {
    let db = Database::in_memory().expect("Failed to create in-memory database");

    let salary = db
        .create_category(&NewCategory {
            name: "Salary".to_string(),
            category_type: TransactionType::Income,
        })
        .unwrap();
    let groceries = db
        .create_category(&NewCategory {
            name: "Groceries".to_string(),
            category_type: TransactionType::Expense,
        })
        .unwrap();
    let dining = db
        .create_category(&NewCategory {
            name: "Dining".to_string(),
            category_type: TransactionType::Expense,
        })
        .unwrap();

    let entries = [
        // April
        (TransactionType::Income, dec!(3000.00), salary.id, date(2024, 4, 1)),
        (TransactionType::Expense, dec!(200.00), groceries.id, date(2024, 4, 6)),
        (TransactionType::Expense, dec!(100.00), dining.id, date(2024, 4, 13)),
        // May
        (TransactionType::Income, dec!(3000.00), salary.id, date(2024, 5, 1)),
        (TransactionType::Expense, dec!(85.40), groceries.id, date(2024, 5, 4)),
        (TransactionType::Expense, dec!(64.60), groceries.id, date(2024, 5, 11)),
        (TransactionType::Expense, dec!(42.00), dining.id, date(2024, 5, 10)),
        (TransactionType::Expense, dec!(108.00), dining.id, date(2024, 5, 18)),
    ];

    for (kind, amount, category_id, on) in entries {
        db.create_transaction(&NewTransaction {
            transaction_type: kind,
            amount,
            description: String::new(),
            category_id,
            transaction_date: on,
        })
        .expect("Failed to create transaction");
    }

    db
}

// =============================================================================
// Analysis Integration Tests
// =============================================================================

#[test]
fn test_monthly_analysis_from_database() {
    let db = seeded_ledger();
    let data = AnalysisAssembler::new(&db)
        .assemble(Granularity::Monthly, date(2024, 5, 20))
        .unwrap();

    assert_eq!(data.total_income, dec!(3000.00));
    assert_eq!(data.total_expense, dec!(300.00));
    assert_eq!(data.previous_period_income, dec!(3000.00));
    assert_eq!(data.previous_period_expense, dec!(300.00));

    assert_eq!(data.transaction_count_by_category["Groceries"], 2);
    assert_eq!(data.transaction_count_by_category["Dining"], 2);
    assert_eq!(data.average_amount_by_category["Groceries"], dec!(75.00));
    assert_eq!(data.average_amount_by_category["Dining"], dec!(75.00));

    // All May expenses fell on Saturdays except the Friday dinner
    assert_eq!(data.expenses_by_weekday.get(Weekday::Sat), dec!(258.00));
    assert_eq!(data.expenses_by_weekday.get(Weekday::Fri), dec!(42.00));
    assert_eq!(data.expenses_by_weekday.total(), data.total_expense);
}

#[test]
fn test_weekly_wednesday_scenario() {
    let db = Database::in_memory().unwrap();
    let misc = db
        .create_category(&NewCategory {
            name: "Misc".to_string(),
            category_type: TransactionType::Expense,
        })
        .unwrap();

    let wednesday = date(2024, 5, 15);
    assert_eq!(wednesday.weekday(), Weekday::Wed);

    // Monday x2, Wednesday x1, Sunday x2
    let spread = [
        (dec!(11.10), date(2024, 5, 13)),
        (dec!(3.90), date(2024, 5, 13)),
        (dec!(27.35), date(2024, 5, 15)),
        (dec!(5.00), date(2024, 5, 19)),
        (dec!(0.05), date(2024, 5, 19)),
    ];
    for (amount, on) in spread {
        db.create_transaction(&NewTransaction {
            transaction_type: TransactionType::Expense,
            amount,
            description: "spread".to_string(),
            category_id: misc.id,
            transaction_date: on,
        })
        .unwrap();
    }

    let data = AnalysisAssembler::new(&db)
        .assemble(Granularity::Weekly, wednesday)
        .unwrap();

    let weekdays = &data.expenses_by_weekday;
    assert_eq!(weekdays.get(Weekday::Mon), dec!(15.00));
    assert_eq!(weekdays.get(Weekday::Wed), dec!(27.35));
    assert_eq!(weekdays.get(Weekday::Sun), dec!(5.05));
    for day in [Weekday::Tue, Weekday::Thu, Weekday::Fri, Weekday::Sat] {
        assert_eq!(weekdays.get(day), Decimal::ZERO);
    }
}

// =============================================================================
// Insight Pipeline Integration Tests
// =============================================================================

#[tokio::test]
async fn test_monthly_insights_via_ollama_protocol() {
    let server = MockLlmServer::start_with_response(
        "1. Dining spend rose 50.0% versus April.\n\n2. Saturdays account for 86% of expenses.\n3.\n",
    )
    .await;
    let generator = GeneratorClient::from_config(&AiConfig {
        backend: BackendKind::Ollama,
        host: Some(server.url()),
        ..AiConfig::default()
    });
    let db = seeded_ledger();

    let insights = InsightOrchestrator::new(&db, &generator)
        .get_insights_at("MONTHLY", date(2024, 5, 20))
        .await
        .unwrap();

    assert_eq!(insights.period, "monthly");
    assert_eq!(
        insights.insights,
        vec![
            "Dining spend rose 50.0% versus April.",
            "Saturdays account for 86% of expenses."
        ]
    );
    assert_eq!(insights.summary, "Dining spend rose 50.0% versus April.");

    let prompts = server.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("ANALYSIS PERIOD: monthly (2024-05-01 to 2024-05-31)"));
    assert!(prompt.contains("- Net Balance: $2700.00"));
    assert!(prompt.contains("- Previous Expense: $300.00 (0%)"));
    assert!(prompt.contains("- Dining: $150.00"));
    assert!(prompt.contains("- Saturday: $258.00"));
}

#[tokio::test]
async fn test_openai_compatible_failure_is_generation_error() {
    let server = MockLlmServer::start_failing().await;
    let generator = GeneratorClient::from_config(&AiConfig {
        backend: BackendKind::OpenAICompatible,
        host: Some(server.url()),
        ..AiConfig::default()
    });
    let db = seeded_ledger();

    let err = InsightOrchestrator::new(&db, &generator)
        .get_insights_at("monthly", date(2024, 5, 20))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
}

#[tokio::test]
async fn test_sparse_week_is_canned_without_call() {
    let db = seeded_ledger();
    let generator = MockGenerator::new();

    // Week of 2024-05-13 holds a single transaction (the 18th)
    let insights = InsightOrchestrator::new(&db, &generator)
        .get_insights_at("weekly", date(2024, 5, 15))
        .await
        .unwrap();

    assert_eq!(insights.confidence, "insufficient_data");
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_disabled_config_answers_with_disabled_marker() {
    let generator = GeneratorClient::from_config(&AiConfig {
        enabled: false,
        ..AiConfig::default()
    });
    assert!(generator.health_check().await);

    let db = seeded_ledger();
    let insights = InsightOrchestrator::new(&db, &generator)
        .get_insights_at("monthly", date(2024, 5, 20))
        .await
        .unwrap();
    assert_eq!(insights.insights, vec![DISABLED_RESPONSE]);
    assert_eq!(insights.summary, "AI analysis unavailable");
    assert_eq!(insights.confidence, CONFIDENCE_DISABLED);
}

#[test]
fn test_plan_quarterly_prompt() {
    let db = seeded_ledger();
    let generator = MockGenerator::new();
    let plan = InsightOrchestrator::new(&db, &generator)
        .plan("quarterly", date(2024, 5, 20))
        .unwrap();

    let InsightPlan::Generate { prompt, .. } = plan else {
        panic!("expected a prompt");
    };
    assert!(prompt.contains("ANALYSIS PERIOD: quarterly (2024-04-01 to 2024-06-30)"));
    // Q1 2024 is empty, so no comparison block
    assert!(!prompt.contains("PREVIOUS PERIOD COMPARISON"));
}

// =============================================================================
// Summary and Categorization Integration Tests
// =============================================================================

#[test]
fn test_month_summaries_and_balance_from_database() {
    let db = seeded_ledger();
    let summary = LedgerSummary::new(&db);

    let may = summary.monthly(2024, 5).unwrap();
    assert_eq!(may.total_income, dec!(3000.00));
    assert_eq!(may.total_expense, dec!(300.00));
    assert_eq!(may.net_balance, dec!(2700.00));

    let categories = summary.categories(2024, 4).unwrap();
    let totals: Vec<_> = categories
        .iter()
        .map(|c| (c.category_name.as_str(), c.total_income, c.total_expense))
        .collect();
    assert_eq!(
        totals,
        vec![
            ("Dining", Decimal::ZERO, dec!(100.00)),
            ("Groceries", Decimal::ZERO, dec!(200.00)),
            ("Salary", dec!(3000.00), Decimal::ZERO),
        ]
    );

    // Both months together
    assert_eq!(db.balance().unwrap(), dec!(5400.00));
}

#[tokio::test]
async fn test_category_suggestion_via_mock_server() {
    let server = MockLlmServer::start_with_response("dining").await;
    let generator = GeneratorClient::from_config(&AiConfig {
        backend: BackendKind::Ollama,
        host: Some(server.url()),
        ..AiConfig::default()
    });
    let db = seeded_ledger();

    let suggestion = CategorySuggester::new(&generator)
        .suggest(
            &db.list_categories().unwrap(),
            "Burger joint downtown",
            TransactionType::Expense,
        )
        .await
        .unwrap();

    assert_eq!(suggestion.category.map(|c| c.name), Some("Dining".to_string()));
    assert_eq!(suggestion.confidence, "high");

    let prompt = &server.prompts()[0];
    assert!(prompt.contains("Available EXPENSE categories:\n- Dining\n- Groceries\n"));
    assert!(!prompt.contains("Salary"));
}

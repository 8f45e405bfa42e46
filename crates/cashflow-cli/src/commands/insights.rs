//! Insight command implementation

use anyhow::{Context, Result};
use cashflow_core::ai::{GeneratorClient, TextGenerator};
use cashflow_core::db::Database;
use cashflow_core::insights::{InsightOrchestrator, InsightPlan};
use cashflow_core::models::SpendingInsights;
use chrono::{Local, NaiveDate};

/// Flags for `cashflow insights`
#[derive(Debug, Clone)]
pub struct InsightsOptions {
    pub period: String,
    pub date: Option<NaiveDate>,
    pub json: bool,
    pub show_prompt: bool,
}

pub async fn cmd_insights(
    db: &Database,
    generator: &GeneratorClient,
    options: &InsightsOptions,
) -> Result<()> {
    let reference = options
        .date
        .unwrap_or_else(|| Local::now().date_naive());
    let orchestrator = InsightOrchestrator::new(db, generator);

    if options.show_prompt {
        match orchestrator.plan(&options.period, reference)? {
            InsightPlan::Canned(insights) => {
                println!("No prompt: {} ({})", insights.summary, insights.confidence);
            }
            InsightPlan::Generate { prompt, .. } => println!("{}", prompt),
        }
        return Ok(());
    }

    if !options.json && generator.is_enabled() {
        println!(
            "🤖 Asking {} ({}) about your {} spending...",
            generator.model(),
            generator.backend_name(),
            options.period.trim().to_lowercase()
        );
    }

    let insights = orchestrator
        .get_insights_at(&options.period, reference)
        .await
        .context("AI insights are temporarily unavailable")?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
    } else {
        print_insights(&insights);
    }

    Ok(())
}

fn print_insights(insights: &SpendingInsights) {
    println!();
    println!("💡 Spending Insights ({})", insights.period);
    println!("   ─────────────────────────────");

    if insights.insights.is_empty() {
        println!("   (no insights returned)");
    }
    for (i, insight) in insights.insights.iter().enumerate() {
        println!("   {}. {}", i + 1, insight);
    }

    println!();
    println!("   Summary: {}", insights.summary);
}

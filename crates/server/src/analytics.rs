use api_types::analytics::{AnalyticsSummary, CategoryTotal};
use axum::{Json, extract::State};

use crate::server::ServerState;

fn map_summary(summary: engine::AnalyticsSummary) -> AnalyticsSummary {
    AnalyticsSummary {
        total_balance: summary.total_balance.to_string(),
        monthly_income: summary.monthly_income.to_string(),
        monthly_expenses: summary.monthly_expenses.to_string(),
        category_breakdown: summary
            .category_breakdown
            .into_iter()
            .map(|(category, amount)| (category, amount.to_string()))
            .collect(),
        top_categories: summary
            .top_categories
            .into_iter()
            .map(|total| CategoryTotal {
                category: total.category,
                amount: total.amount.to_string(),
                count: total.count,
            })
            .collect(),
    }
}

pub async fn summary(State(state): State<ServerState>) -> Json<AnalyticsSummary> {
    Json(map_summary(state.engine.analytics_summary().await))
}

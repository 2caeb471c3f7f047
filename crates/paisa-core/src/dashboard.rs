//! Dashboard composer
//!
//! Pulls the aggregation, budget, goal, insight, and tip layers together
//! into one view-model for the client. All state needed for a request
//! travels in an explicit [`RequestContext`]; nothing is session-global.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::db::{month_end, month_start, Database};
use crate::error::Result;
use crate::insights::InsightEngine;
use crate::models::{
    BudgetStatus, CategoryAmount, GoalProgress, Insight, MonthlyTrendPoint, Transaction, User,
};
use crate::tips;

/// How many months the trend chart covers
const TREND_MONTHS: u32 = 6;

/// How many transactions the dashboard list shows
const RECENT_LIMIT: i64 = 10;

/// Per-request context: the authenticated user and the date to evaluate
/// against. Built once per request and passed down; it lives no longer
/// than the request does.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: User,
    pub today: NaiveDate,
}

impl RequestContext {
    pub fn new(user: User, today: NaiveDate) -> Self {
        Self { user, today }
    }
}

/// Everything the dashboard page needs, in one payload
#[derive(Debug, Serialize)]
pub struct DashboardData {
    /// "YYYY-MM" of the month being summarized
    pub month: String,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    /// `{category, amount}[]` chart payload
    pub expense_breakdown: Vec<CategoryAmount>,
    /// `{month, income, expense}[]` chart payload
    pub trend: Vec<MonthlyTrendPoint>,
    pub budgets: Vec<BudgetStatus>,
    pub goals: Vec<GoalProgress>,
    pub recent_transactions: Vec<Transaction>,
    /// Unread insights, including any generated by this request
    pub insights: Vec<Insight>,
    pub savings_tips: Vec<String>,
    pub days_until_allowance: i64,
}

/// Log a failed aggregation query and substitute an empty value, so a
/// broken query degrades the page instead of breaking it
fn or_empty<T: Default>(part: &'static str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(part, error = %e, "Dashboard aggregation failed; showing empty data");
            T::default()
        }
    }
}

/// Compose the dashboard for one request
pub fn compose(db: &Database, ctx: &RequestContext) -> DashboardData {
    let today = ctx.today;
    let user_id = ctx.user.id;
    let (from, to) = (month_start(today), month_end(today));

    let total_income = or_empty("total_income", db.total_income(user_id, from, to));
    let total_expense = or_empty("total_expense", db.total_expense(user_id, from, to));
    let expense_breakdown = or_empty(
        "expense_breakdown",
        db.expense_by_category(user_id, from, to),
    );
    let trend = or_empty("trend", db.monthly_trend(user_id, today, TREND_MONTHS));
    let budgets = or_empty("budgets", db.evaluate_budgets(user_id, today));
    let goals = or_empty("goals", db.goal_progress_all(user_id, today));
    let recent_transactions = or_empty(
        "recent_transactions",
        db.recent_transactions(user_id, RECENT_LIMIT),
    );

    // Fresh insights for the current month; failures only cost the insights
    let insights = or_empty("insights", refresh_insights(db, user_id, (from, today)));

    // Tip matching uses the top expense category over the last 30 days
    let last_30 = or_empty(
        "tips_top_category",
        db.expense_by_category(user_id, today - Duration::days(30), today),
    );
    let top_category = last_30.first().map(|c| c.category.clone());
    let savings_tips = tips::savings_tips(top_category.as_deref())
        .into_iter()
        .map(str::to_string)
        .collect();

    DashboardData {
        month: today.format("%Y-%m").to_string(),
        total_income,
        total_expense,
        balance: total_income - total_expense,
        expense_breakdown,
        trend,
        budgets,
        goals,
        recent_transactions,
        insights,
        savings_tips,
        days_until_allowance: days_until_allowance(ctx.user.allowance_day, today),
    }
}

/// Run the heuristic battery and return the unread insight backlog,
/// newest first, including what just fired
fn refresh_insights(db: &Database, user_id: i64, range: (NaiveDate, NaiveDate)) -> Result<Vec<Insight>> {
    let engine = InsightEngine::new();
    engine.run_for_user(db, user_id, range)?;
    db.list_insights(user_id, true, 10)
}

/// Days until the next allowance day, 0 when today is the day
///
/// Allowance days past the end of a short month land on its last day.
pub fn days_until_allowance(allowance_day: u32, today: NaiveDate) -> i64 {
    let in_month = |day: NaiveDate| {
        let last = month_end(day);
        day.with_day(allowance_day.min(last.day()))
            .expect("clamped day is valid")
    };

    let this_month = in_month(today);
    let next = if this_month >= today {
        this_month
    } else {
        in_month(month_start(today) + chrono::Months::new(1))
    };

    (next - today).num_days()
}

//! Domain models for Paisa

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Day of month the user's recurring income lands (1-31)
    pub allowance_day: u32,
    pub created_at: DateTime<Utc>,
}

/// Category kind - decides whether a transaction counts as income or expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown category kind: {}", s)),
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction category, either global (user_id = None) or user-owned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// None for the built-in global categories
    pub user_id: Option<i64>,
    pub name: String,
    pub kind: CategoryKind,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    /// Category name, joined in for display
    pub category: String,
    pub kind: CategoryKind,
    /// Always positive; the category kind gives it a sign
    pub amount: f64,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A new transaction before DB insertion
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub category_id: i64,
    pub amount: f64,
    pub description: String,
    pub transaction_date: NaiveDate,
}

/// Budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit on a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub period: BudgetPeriod,
    /// Percentage at which the budget starts alerting (default 80)
    pub alert_threshold: u32,
    /// Optional validity window; an open bound means "always"
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Whether this budget applies on the given day
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        let after_start = self.start_date.map_or(true, |s| day >= s);
        let before_end = self.end_date.map_or(true, |e| day <= e);
        after_start && before_end
    }
}

/// Evaluated state of a budget for the current period
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget_id: i64,
    pub category_id: i64,
    pub category: String,
    pub period: BudgetPeriod,
    pub amount: f64,
    pub spent: f64,
    /// Clamped to [0, 100]
    pub percentage: f64,
    /// Zero when exceeded
    pub remaining: f64,
    pub exceeded: bool,
    pub alert: bool,
}

/// Goal priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    Medium,
    High,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown goal priority: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: GoalPriority,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Compute progress against elapsed time as of `today`
    pub fn progress(&self, today: NaiveDate) -> GoalProgress {
        let percentage = if self.target_amount > 0.0 {
            (self.current_amount / self.target_amount * 100.0).min(100.0)
        } else {
            100.0
        };

        let total_days = (self.end_date - self.start_date).num_days().max(1);
        let elapsed_days = (today - self.start_date).num_days().clamp(0, total_days);
        let expected_progress = elapsed_days as f64 / total_days as f64 * 100.0;

        let days_left = (self.end_date - today).num_days().max(0);

        GoalProgress {
            goal: self.clone(),
            percentage,
            expected_progress,
            on_track: percentage >= expected_progress,
            days_left,
        }
    }
}

/// Goal progress relative to its deadline
#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: Goal,
    /// Clamped to [0, 100]
    pub percentage: f64,
    /// Share of elapsed time toward the deadline, in percent
    pub expected_progress: f64,
    pub on_track: bool,
    pub days_left: i64,
}

/// A persisted spending insight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: i64,
    pub user_id: i64,
    pub insight_text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Audit record of a quick-save contribution toward a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSave {
    pub id: i64,
    pub user_id: i64,
    pub goal_id: i64,
    pub amount: f64,
    pub save_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful quick-save
#[derive(Debug, Clone, Serialize)]
pub struct QuickSaveOutcome {
    pub goal_id: i64,
    pub goal_name: String,
    pub new_amount: f64,
    pub target_amount: f64,
    /// True iff this save pushed the goal across its target
    pub goal_reached: bool,
}

/// Per-category expense total, descending - the expense breakdown chart payload
#[derive(Debug, Clone, Serialize)]
pub struct CategoryAmount {
    pub category_id: i64,
    pub category: String,
    pub color: Option<String>,
    pub total: f64,
    pub transaction_count: i64,
}

/// One month of the income/expense trend chart payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrendPoint {
    /// "YYYY-MM"
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rusqlite::params;

    use crate::db::{NewBudget, NewGoal};
    use crate::insights::InsightEngine;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Database, User) {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("asha", "correct horse battery", 1).unwrap();
        (db, user)
    }

    fn category_id(db: &Database, user: &User, name: &str) -> i64 {
        db.find_category_by_name(user.id, name, None)
            .unwrap()
            .unwrap_or_else(|| panic!("missing category {}", name))
            .id
    }

    fn spend(db: &Database, user: &User, category: &str, amount: f64, on: NaiveDate) {
        let cid = category_id(db, user, category);
        db.add_transaction(
            user.id,
            &NewTransaction {
                category_id: cid,
                amount,
                description: format!("{} purchase", category),
                transaction_date: on,
            },
        )
        .unwrap();
    }

    // ========== Schema / users ==========

    #[test]
    fn test_global_categories_seeded() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("seedcheck", "password123", 1).unwrap();
        let categories = db.list_categories(user.id).unwrap();

        assert!(categories.iter().any(|c| c.name == "Salary" && c.kind == CategoryKind::Income));
        for name in ["Food", "Coffee", "Dining Out", "Entertainment", "Savings"] {
            assert!(
                categories.iter().any(|c| c.name == name && c.kind == CategoryKind::Expense),
                "missing seeded category {}",
                name
            );
        }
    }

    #[test]
    fn test_create_user_and_verify() {
        let (db, user) = setup();
        assert_eq!(user.username, "asha");
        assert_eq!(user.allowance_day, 1);

        let verified = db.verify_credentials("asha", "correct horse battery").unwrap();
        assert_eq!(verified.id, user.id);
    }

    #[test]
    fn test_login_error_is_generic() {
        let (db, _) = setup();

        // Wrong password and unknown user produce the same error text
        let wrong_pass = db.verify_credentials("asha", "nope nope nope").unwrap_err();
        let no_user = db.verify_credentials("ghost", "nope nope nope").unwrap_err();
        assert_eq!(wrong_pass.to_string(), no_user.to_string());
        assert_eq!(wrong_pass.to_string(), "Invalid username or password");
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (db, _) = setup();
        let err = db.create_user("asha", "another password", 5).unwrap_err();
        assert!(matches!(err, crate::error::Error::UsernameTaken));
    }

    #[test]
    fn test_sessions_round_trip() {
        let (db, user) = setup();

        let token = db.create_session(user.id, 7).unwrap();
        let resolved = db.user_for_session(&token).unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        db.delete_session(&token).unwrap();
        assert!(db.user_for_session(&token).unwrap().is_none());
    }

    #[test]
    fn test_expired_session_rejected() {
        let (db, user) = setup();
        let token = db.create_session(user.id, 7).unwrap();

        // Force the session into the past
        let conn = db.conn().unwrap();
        conn.execute(
            "UPDATE sessions SET expires_at = '2020-01-01 00:00:00' WHERE token = ?",
            params![token],
        )
        .unwrap();

        assert!(db.user_for_session(&token).unwrap().is_none());
    }

    // ========== Categories ==========

    #[test]
    fn test_user_category_isolation() {
        let (db, asha) = setup();
        let ravi = db.create_user("ravi", "another password", 15).unwrap();

        let custom = db
            .create_category(asha.id, "Hostel Mess", CategoryKind::Expense, Some("#123456"), None)
            .unwrap();

        // Owner sees it, the other user does not
        assert!(db.get_category(asha.id, custom.id).unwrap().is_some());
        assert!(db.get_category(ravi.id, custom.id).unwrap().is_none());

        // Both see globals
        assert!(db.find_category_by_name(ravi.id, "Food", None).unwrap().is_some());
    }

    #[test]
    fn test_builtin_categories_read_only() {
        let (db, user) = setup();
        let food = category_id(&db, &user, "Food");

        assert!(db.update_category(user.id, food, Some("Meals"), None, None).is_err());
        assert!(db.delete_category(user.id, food).is_err());
    }

    #[test]
    fn test_category_name_sanitized() {
        let (db, user) = setup();
        let c = db
            .create_category(user.id, "  <b>Books</b>  ", CategoryKind::Expense, None, None)
            .unwrap();
        assert_eq!(c.name, "&lt;b&gt;Books&lt;/b&gt;");
    }

    // ========== Aggregation ==========

    #[test]
    fn test_empty_range_aggregates_to_zero() {
        let (db, user) = setup();
        let from = date(2026, 1, 1);
        let to = date(2026, 1, 31);

        assert_eq!(db.total_income(user.id, from, to).unwrap(), 0.0);
        assert_eq!(db.total_expense(user.id, from, to).unwrap(), 0.0);
        assert!(db.expense_by_category(user.id, from, to).unwrap().is_empty());
    }

    #[test]
    fn test_worked_example_totals_and_top_category() {
        let (db, user) = setup();
        let may = |d| date(2026, 5, d);

        spend(&db, &user, "Food", 50.0, may(3));
        spend(&db, &user, "Food", 60.0, may(10));
        let salary = category_id(&db, &user, "Salary");
        db.add_transaction(
            user.id,
            &NewTransaction {
                category_id: salary,
                amount: 1000.0,
                description: "May salary".to_string(),
                transaction_date: may(1),
            },
        )
        .unwrap();

        let from = may(1);
        let to = may(31);
        assert_eq!(db.total_expense(user.id, from, to).unwrap(), 110.0);
        assert_eq!(db.total_income(user.id, from, to).unwrap(), 1000.0);

        let breakdown = db.expense_by_category(user.id, from, to).unwrap();
        assert_eq!(breakdown[0].category, "Food");
        assert_eq!(breakdown[0].total, 110.0);
        assert_eq!(breakdown[0].transaction_count, 2);
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let (db, user) = setup();
        spend(&db, &user, "Food", 10.0, date(2026, 5, 1));
        spend(&db, &user, "Food", 20.0, date(2026, 5, 31));
        spend(&db, &user, "Food", 40.0, date(2026, 6, 1));

        let total = db
            .total_expense(user.id, date(2026, 5, 1), date(2026, 5, 31))
            .unwrap();
        assert_eq!(total, 30.0);
    }

    #[test]
    fn test_expense_by_category_descending() {
        let (db, user) = setup();
        spend(&db, &user, "Coffee", 30.0, date(2026, 5, 2));
        spend(&db, &user, "Rent", 8000.0, date(2026, 5, 1));
        spend(&db, &user, "Food", 500.0, date(2026, 5, 3));

        let breakdown = db
            .expense_by_category(user.id, date(2026, 5, 1), date(2026, 5, 31))
            .unwrap();
        let names: Vec<_> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Food", "Coffee"]);
    }

    #[test]
    fn test_aggregates_scoped_per_user() {
        let (db, asha) = setup();
        let ravi = db.create_user("ravi", "another password", 15).unwrap();

        spend(&db, &asha, "Food", 100.0, date(2026, 5, 5));
        spend(&db, &ravi, "Food", 77.0, date(2026, 5, 5));

        let total = db
            .total_expense(asha.id, date(2026, 5, 1), date(2026, 5, 31))
            .unwrap();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_monthly_trend_zero_fills() {
        let (db, user) = setup();
        spend(&db, &user, "Food", 100.0, date(2026, 5, 5));
        spend(&db, &user, "Food", 50.0, date(2026, 3, 5));

        let trend = db.monthly_trend(user.id, date(2026, 5, 15), 6).unwrap();
        assert_eq!(trend.len(), 6);
        assert_eq!(trend[0].month, "2025-12");
        assert_eq!(trend[5].month, "2026-05");
        assert_eq!(trend[5].expense, 100.0);
        assert_eq!(trend[3].expense, 50.0);
        // Untouched months are present with zeros
        assert_eq!(trend[4].expense, 0.0);
        assert_eq!(trend[4].income, 0.0);
    }

    #[test]
    fn test_count_small_expenses_boundary() {
        let (db, user) = setup();
        spend(&db, &user, "Coffee", 9.99, date(2026, 5, 1));
        spend(&db, &user, "Coffee", 10.0, date(2026, 5, 2));

        let count = db
            .count_small_expenses(user.id, date(2026, 5, 1), date(2026, 5, 31), 10.0)
            .unwrap();
        assert_eq!(count, 1, "exactly 10 is not under 10");
    }

    // ========== Transactions ==========

    #[test]
    fn test_transaction_rejects_non_positive_amount() {
        let (db, user) = setup();
        let food = category_id(&db, &user, "Food");
        let result = db.add_transaction(
            user.id,
            &NewTransaction {
                category_id: food,
                amount: 0.0,
                description: String::new(),
                transaction_date: date(2026, 5, 1),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_edit_and_delete() {
        let (db, user) = setup();
        let food = category_id(&db, &user, "Food");
        let coffee = category_id(&db, &user, "Coffee");

        let tx = db
            .add_transaction(
                user.id,
                &NewTransaction {
                    category_id: food,
                    amount: 50.0,
                    description: "Lunch".to_string(),
                    transaction_date: date(2026, 5, 1),
                },
            )
            .unwrap();

        let edited = db
            .update_transaction(
                user.id,
                tx.id,
                &NewTransaction {
                    category_id: coffee,
                    amount: 55.0,
                    description: "Lunch + coffee".to_string(),
                    transaction_date: date(2026, 5, 2),
                },
            )
            .unwrap();
        assert_eq!(edited.amount, 55.0);
        assert_eq!(edited.category, "Coffee");

        db.delete_transaction(user.id, tx.id).unwrap();
        assert!(db.get_transaction(user.id, tx.id).unwrap().is_none());
    }

    #[test]
    fn test_transaction_ownership_enforced() {
        let (db, asha) = setup();
        let ravi = db.create_user("ravi", "another password", 15).unwrap();
        spend(&db, &asha, "Food", 50.0, date(2026, 5, 1));

        let tx = db.recent_transactions(asha.id, 1).unwrap().remove(0);
        assert!(db.get_transaction(ravi.id, tx.id).unwrap().is_none());
        assert!(db.delete_transaction(ravi.id, tx.id).is_err());
    }

    // ========== Budgets ==========

    fn monthly_budget(db: &Database, user: &User, category: &str, amount: f64) -> Budget {
        db.create_budget(
            user.id,
            &NewBudget {
                category_id: category_id(db, user, category),
                amount,
                period: BudgetPeriod::Monthly,
                alert_threshold: None,
                start_date: None,
                end_date: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_budget_percentage_clamped_and_exceeded() {
        let (db, user) = setup();
        monthly_budget(&db, &user, "Food", 100.0);

        let today = date(2026, 5, 20);
        spend(&db, &user, "Food", 5000.0, date(2026, 5, 5));

        let statuses = db.evaluate_budgets(user.id, today).unwrap();
        assert_eq!(statuses.len(), 1);
        let s = &statuses[0];
        assert_eq!(s.percentage, 100.0, "clamped despite 50x overspend");
        assert!(s.exceeded);
        assert_eq!(s.remaining, 0.0);
    }

    #[test]
    fn test_budget_exceeded_iff_spent_over_amount() {
        let (db, user) = setup();
        monthly_budget(&db, &user, "Food", 100.0);
        let today = date(2026, 5, 20);

        // Exactly at the limit is not exceeded
        spend(&db, &user, "Food", 100.0, date(2026, 5, 5));
        let s = db.evaluate_budgets(user.id, today).unwrap().remove(0);
        assert!(!s.exceeded);
        assert_eq!(s.percentage, 100.0);

        // One paisa over is
        spend(&db, &user, "Food", 0.01, date(2026, 5, 6));
        let s = db.evaluate_budgets(user.id, today).unwrap().remove(0);
        assert!(s.exceeded);
    }

    #[test]
    fn test_budget_alert_threshold_default_80() {
        let (db, user) = setup();
        monthly_budget(&db, &user, "Food", 100.0);
        let today = date(2026, 5, 20);

        spend(&db, &user, "Food", 79.0, date(2026, 5, 4));
        let s = db.evaluate_budgets(user.id, today).unwrap().remove(0);
        assert!(!s.alert);

        spend(&db, &user, "Food", 1.0, date(2026, 5, 5));
        let s = db.evaluate_budgets(user.id, today).unwrap().remove(0);
        assert!(s.alert, "80% meets the default threshold");
    }

    #[test]
    fn test_budget_counts_current_month_only() {
        let (db, user) = setup();
        monthly_budget(&db, &user, "Food", 100.0);

        spend(&db, &user, "Food", 90.0, date(2026, 4, 28));
        spend(&db, &user, "Food", 10.0, date(2026, 5, 2));

        let s = db.evaluate_budgets(user.id, date(2026, 5, 20)).unwrap().remove(0);
        assert_eq!(s.spent, 10.0, "April spending stays in April");
    }

    #[test]
    fn test_weekly_budget_window() {
        let (db, user) = setup();
        db.create_budget(
            user.id,
            &NewBudget {
                category_id: category_id(&db, &user, "Coffee"),
                amount: 50.0,
                period: BudgetPeriod::Weekly,
                alert_threshold: None,
                start_date: None,
                end_date: None,
            },
        )
        .unwrap();

        // 2026-03-05 is a Thursday; the 2nd is that week's Monday
        spend(&db, &user, "Coffee", 20.0, date(2026, 3, 2));
        spend(&db, &user, "Coffee", 15.0, date(2026, 3, 1)); // previous week (Sunday)

        let s = db.evaluate_budgets(user.id, date(2026, 3, 5)).unwrap().remove(0);
        assert_eq!(s.spent, 20.0);
    }

    #[test]
    fn test_inactive_budget_skipped() {
        let (db, user) = setup();
        db.create_budget(
            user.id,
            &NewBudget {
                category_id: category_id(&db, &user, "Food"),
                amount: 100.0,
                period: BudgetPeriod::Monthly,
                alert_threshold: None,
                start_date: Some(date(2026, 6, 1)),
                end_date: None,
            },
        )
        .unwrap();

        let statuses = db.evaluate_budgets(user.id, date(2026, 5, 20)).unwrap();
        assert!(statuses.is_empty());
    }

    #[test]
    fn test_budget_requires_expense_category() {
        let (db, user) = setup();
        let salary = category_id(&db, &user, "Salary");
        let result = db.create_budget(
            user.id,
            &NewBudget {
                category_id: salary,
                amount: 100.0,
                period: BudgetPeriod::Monthly,
                alert_threshold: None,
                start_date: None,
                end_date: None,
            },
        );
        assert!(result.is_err());
    }

    // ========== Goals & quick-save ==========

    fn make_goal(db: &Database, user: &User, target: f64) -> Goal {
        db.create_goal(
            user.id,
            &NewGoal {
                name: "New laptop".to_string(),
                target_amount: target,
                start_date: date(2026, 1, 1),
                end_date: date(2026, 12, 31),
                priority: GoalPriority::High,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_quick_save_all_three_effects() {
        let (db, user) = setup();
        let goal = make_goal(&db, &user, 1000.0);
        let today = date(2026, 5, 10);

        let outcome = db.quick_save(user.id, goal.id, 250.0, today).unwrap();
        assert_eq!(outcome.new_amount, 250.0);
        assert_eq!(outcome.target_amount, 1000.0);
        assert!(!outcome.goal_reached);

        // Goal incremented by exactly the amount
        let goal = db.get_goal(user.id, goal.id).unwrap().unwrap();
        assert_eq!(goal.current_amount, 250.0);

        // Audit row recorded
        let saves = db.list_quick_saves(user.id, goal.id).unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].amount, 250.0);
        assert_eq!(saves[0].save_date, today);

        // Mirrored Savings transaction, dated today
        let txs = db.recent_transactions(user.id, 10).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].category, "Savings");
        assert_eq!(txs[0].amount, 250.0);
        assert_eq!(txs[0].transaction_date, today);
    }

    #[test]
    fn test_quick_save_rolls_back_mid_sequence() {
        let (db, user) = setup();
        let goal = make_goal(&db, &user, 1000.0);

        // Break step two of the sequence: the audit insert
        let conn = db.conn().unwrap();
        conn.execute("ALTER TABLE quick_saves RENAME TO quick_saves_hidden", [])
            .unwrap();
        drop(conn);

        let result = db.quick_save(user.id, goal.id, 250.0, date(2026, 5, 10));
        assert!(result.is_err());

        // No partial writes: goal untouched, no mirrored transaction
        let goal = db.get_goal(user.id, goal.id).unwrap().unwrap();
        assert_eq!(goal.current_amount, 0.0);
        assert!(db.recent_transactions(user.id, 10).unwrap().is_empty());
    }

    #[test]
    fn test_quick_save_rejects_bad_input() {
        let (db, user) = setup();
        let goal = make_goal(&db, &user, 1000.0);
        let today = date(2026, 5, 10);

        assert!(db.quick_save(user.id, goal.id, 0.0, today).is_err());
        assert!(db.quick_save(user.id, goal.id, -5.0, today).is_err());
        assert!(db.quick_save(user.id, 9999, 10.0, today).is_err());

        // A failed save leaves nothing behind
        assert!(db.list_quick_saves(user.id, goal.id).unwrap().is_empty());
        assert!(db.recent_transactions(user.id, 10).unwrap().is_empty());
    }

    #[test]
    fn test_quick_save_other_users_goal_rejected() {
        let (db, asha) = setup();
        let ravi = db.create_user("ravi", "another password", 15).unwrap();
        let goal = make_goal(&db, &asha, 1000.0);

        assert!(db.quick_save(ravi.id, goal.id, 50.0, date(2026, 5, 10)).is_err());
        let goal = db.get_goal(asha.id, goal.id).unwrap().unwrap();
        assert_eq!(goal.current_amount, 0.0);
    }

    #[test]
    fn test_quick_save_goal_reached_flag_fires_once() {
        let (db, user) = setup();
        let goal = make_goal(&db, &user, 100.0);
        let today = date(2026, 5, 10);

        let first = db.quick_save(user.id, goal.id, 60.0, today).unwrap();
        assert!(!first.goal_reached);

        let crossing = db.quick_save(user.id, goal.id, 40.0, today).unwrap();
        assert!(crossing.goal_reached);

        // Already past the target: no repeat celebration
        let after = db.quick_save(user.id, goal.id, 10.0, today).unwrap();
        assert!(!after.goal_reached);
        assert_eq!(after.new_amount, 110.0);
    }

    // ========== Insights ==========

    #[test]
    fn test_insight_store_appends_without_dedup() {
        let (db, user) = setup();
        db.add_insight(user.id, "Same text").unwrap();
        db.add_insight(user.id, "Same text").unwrap();

        let insights = db.list_insights(user.id, false, 10).unwrap();
        assert_eq!(insights.len(), 2);
        assert_eq!(db.count_unread_insights(user.id).unwrap(), 2);

        db.mark_insight_read(user.id, insights[0].id).unwrap();
        assert_eq!(db.count_unread_insights(user.id).unwrap(), 1);
        assert_eq!(db.list_insights(user.id, true, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_engine_runs_battery_against_db() {
        let (db, user) = setup();

        // May: 120 on Food. April: 100. Up 20% month over month.
        spend(&db, &user, "Food", 120.0, date(2026, 5, 10));
        spend(&db, &user, "Food", 100.0, date(2026, 4, 10));

        let engine = InsightEngine::new();
        let insights = engine
            .run_for_user(&db, user.id, (date(2026, 5, 1), date(2026, 5, 31)))
            .unwrap();

        // Heuristic 1 (top category) and 3 (month over month) fire
        assert!(insights.iter().any(|i| i.insight_text.contains("Food")));
        assert!(insights.iter().any(|i| i.insight_text.contains("up 20%")));

        // Fired insights were persisted for later display
        assert_eq!(
            db.list_insights(user.id, false, 50).unwrap().len(),
            insights.len()
        );
    }

    // ========== Import / export ==========

    #[test]
    fn test_import_csv_good_and_bad_rows() {
        let (db, user) = setup();
        let csv_data = "\
date,category,amount,description
2026-05-01,Food,120.50,groceries
2026-05-02,Nonexistent,10.00,mystery
not-a-date,Food,10.00,bad date
2026-05-03,Coffee,30.00,espresso
";

        let summary = db
            .import_transactions_csv(user.id, csv_data.as_bytes())
            .unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[0].contains("Nonexistent"));

        let total = db
            .total_expense(user.id, date(2026, 5, 1), date(2026, 5, 31))
            .unwrap();
        assert_eq!(total, 150.5);
    }

    #[test]
    fn test_export_csv_escapes_fields() {
        let (db, user) = setup();
        let food = category_id(&db, &user, "Food");
        db.add_transaction(
            user.id,
            &NewTransaction {
                category_id: food,
                amount: 42.0,
                description: "tiffin, extra spicy".to_string(),
                transaction_date: date(2026, 5, 1),
            },
        )
        .unwrap();

        let csv = db
            .export_transactions_csv(user.id, &crate::export::ExportOptions::default())
            .unwrap();
        assert!(csv.starts_with("date,category,kind,amount,description\n"));
        assert!(csv.contains("2026-05-01,Food,expense,42.00,\"tiffin, extra spicy\""));
    }

    #[test]
    fn test_export_respects_date_filter() {
        let (db, user) = setup();
        spend(&db, &user, "Food", 10.0, date(2026, 4, 1));
        spend(&db, &user, "Food", 20.0, date(2026, 5, 1));

        let rows = db
            .export_transactions(
                user.id,
                &crate::export::ExportOptions {
                    from: Some(date(2026, 5, 1)),
                    to: None,
                },
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 20.0);
    }

    // ========== Dashboard ==========

    #[test]
    fn test_dashboard_composes_for_empty_user() {
        let (db, user) = setup();
        let ctx = crate::dashboard::RequestContext::new(user, date(2026, 5, 15));
        let data = crate::dashboard::compose(&db, &ctx);

        assert_eq!(data.total_income, 0.0);
        assert_eq!(data.total_expense, 0.0);
        assert!(data.expense_breakdown.is_empty());
        assert_eq!(data.trend.len(), 6);
        assert_eq!(data.savings_tips.len(), 3);
        // Allowance day 1 seen from May 15th: June 1st
        assert_eq!(data.days_until_allowance, 17);
    }

    #[test]
    fn test_dashboard_composes_with_data() {
        let (db, user) = setup();
        spend(&db, &user, "Food", 200.0, date(2026, 5, 5));
        let salary = category_id(&db, &user, "Salary");
        db.add_transaction(
            user.id,
            &NewTransaction {
                category_id: salary,
                amount: 5000.0,
                description: "stipend".to_string(),
                transaction_date: date(2026, 5, 1),
            },
        )
        .unwrap();
        make_goal(&db, &user, 1000.0);

        let ctx = crate::dashboard::RequestContext::new(user, date(2026, 5, 15));
        let data = crate::dashboard::compose(&db, &ctx);

        assert_eq!(data.total_income, 5000.0);
        assert_eq!(data.total_expense, 200.0);
        assert_eq!(data.balance, 4800.0);
        assert_eq!(data.expense_breakdown[0].category, "Food");
        assert_eq!(data.goals.len(), 1);
        assert!(!data.recent_transactions.is_empty());
        // Top-category insight fired and was persisted
        assert!(data.insights.iter().any(|i| i.insight_text.contains("Food")));
    }
}

//! Demo data seeding command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};

use paisa_core::db::{NewBudget, NewGoal};
use paisa_core::models::{BudgetPeriod, GoalPriority, NewTransaction};

use super::open_database;

const DEMO_USER: &str = "demo";
const DEMO_PASSWORD: &str = "demo-paisa";

/// Seed a demo account with a few months of representative data
pub fn cmd_seed_demo(db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;

    if db.get_user_by_username(DEMO_USER)?.is_some() {
        println!("Demo user already exists; nothing to do");
        return Ok(());
    }

    let user = db.create_user(DEMO_USER, DEMO_PASSWORD, 1)?;
    let today = Local::now().date_naive();

    let spend = |category: &str, amount: f64, on: NaiveDate, note: &str| -> Result<()> {
        let cat = db
            .find_category_by_name(user.id, category, None)?
            .context("seeded category missing")?;
        db.add_transaction(
            user.id,
            &NewTransaction {
                category_id: cat.id,
                amount,
                description: note.to_string(),
                transaction_date: on,
            },
        )?;
        Ok(())
    };

    // Three months of income and day-to-day spending
    for months_back in 0..3i64 {
        let anchor = today - Duration::days(30 * months_back);
        spend("Salary", 18000.0, anchor - Duration::days(12), "Monthly stipend")?;
        spend("Rent", 7500.0, anchor - Duration::days(11), "Hostel rent")?;
        spend("Food", 2400.0 + 300.0 * months_back as f64, anchor - Duration::days(9), "Groceries")?;
        spend("Utilities", 650.0, anchor - Duration::days(8), "Electricity")?;
        spend("Transport", 400.0, anchor - Duration::days(6), "Metro card top-up")?;
        spend("Dining Out", 850.0, anchor - Duration::days(4), "Dinner with friends")?;
        spend("Entertainment", 350.0, anchor - Duration::days(3), "Movie night")?;
    }

    // A cluster of small coffee purchases this month
    for i in 0..7i64 {
        spend("Coffee", 7.0 + (i % 3) as f64, today - Duration::days(i * 2), "Campus cafe")?;
    }

    db.create_budget(
        user.id,
        &NewBudget {
            category_id: db
                .find_category_by_name(user.id, "Food", None)?
                .context("seeded category missing")?
                .id,
            amount: 3000.0,
            period: BudgetPeriod::Monthly,
            alert_threshold: None,
            start_date: None,
            end_date: None,
        },
    )?;

    let goal = db.create_goal(
        user.id,
        &NewGoal {
            name: "New laptop".to_string(),
            target_amount: 45000.0,
            start_date: today - Duration::days(60),
            end_date: today + Duration::days(120),
            priority: GoalPriority::High,
        },
    )?;
    db.quick_save(user.id, goal.id, 9000.0, today - Duration::days(20))?;

    println!(
        "Seeded demo user '{}' (password '{}') at {}",
        DEMO_USER,
        DEMO_PASSWORD,
        db.path()
    );
    Ok(())
}

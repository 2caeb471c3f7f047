//! Savings tips selector
//!
//! A static pool of tagged tips. Each call picks two random "student" tips
//! plus one tip matched to the user's top expense category over the last 30
//! days, then pads from a fallback pool until three unique tips are
//! collected.

use rand::seq::SliceRandom;
use rand::Rng;

struct Tip {
    tag: &'static str,
    text: &'static str,
}

const TIP_POOL: &[Tip] = &[
    // General student tips, two of which are chosen at random
    Tip {
        tag: "student",
        text: "Cook in batches on weekends. Five home-cooked meals cost less than two deliveries.",
    },
    Tip {
        tag: "student",
        text: "Use your student ID everywhere. Cinemas, buses, and software all have student rates.",
    },
    Tip {
        tag: "student",
        text: "Wait 24 hours before any purchase over ₹500. Most of the urge fades overnight.",
    },
    Tip {
        tag: "student",
        text: "Buy second-hand textbooks and sell yours forward at the end of term.",
    },
    Tip {
        tag: "student",
        text: "Set your savings transfer for allowance day, before the money can wander off.",
    },
    Tip {
        tag: "student",
        text: "Split subscriptions with roommates. Nobody needs three streaming accounts.",
    },
    // Category-matched tips, looked up by exact category name
    Tip {
        tag: "Coffee",
        text: "A ₹150 cafe habit is ₹4,500 a month. Brew at home and keep the cafe for weekends.",
    },
    Tip {
        tag: "Dining Out",
        text: "Pick one night a week for eating out instead of deciding on the spot each time.",
    },
    Tip {
        tag: "Food",
        text: "Plan the week's meals before shopping. A list keeps impulse snacks out of the cart.",
    },
    Tip {
        tag: "Entertainment",
        text: "Hunt for free events near campus first. Most weeks have more than you can attend.",
    },
    Tip {
        tag: "Shopping",
        text: "Unsubscribe from sale newsletters. You cannot crave a deal you never see.",
    },
    Tip {
        tag: "Transport",
        text: "A monthly transit pass usually beats per-ride tickets if you travel most days.",
    },
    Tip {
        tag: "Rent",
        text: "When renewal comes up, compare nearby listings before accepting the new rate.",
    },
    Tip {
        tag: "Utilities",
        text: "Heating and cooling dominate the power bill. A degree or two of tolerance is free money.",
    },
];

/// Keyword fallback for user-created category names with no exact tip
const KEYWORD_RULES: &[(&str, &str)] = &[
    ("coffee", "Brewing at home costs a tenth of the cafe price. Save the cafe for company."),
    ("food", "Groceries beat takeout. Keep easy staples around for lazy evenings."),
    ("dining", "Pick one night a week for eating out instead of deciding on the spot each time."),
    ("snack", "Buy snacks in bulk with the groceries, not one at a time from the corner shop."),
    ("shop", "Put wants on a list and revisit it monthly. Most entries stop looking urgent."),
    ("game", "Wishlist games and wait for seasonal sales. Full price is a choice, not a rule."),
    ("movie", "Matinee shows and student discounts cut ticket prices roughly in half."),
    ("travel", "Book intercity travel two weeks out. Last-minute fares punish the spontaneous."),
    ("transport", "A monthly transit pass usually beats per-ride tickets if you travel most days."),
];

const FALLBACK_TIPS: &[&str] = &[
    "Track every expense for one week. Knowing where money goes is half of keeping it.",
    "Automate a small transfer to savings each week. Consistency beats size.",
    "Review your subscriptions quarterly and cancel anything you forgot you had.",
    "Keep a separate account for savings so the balance you see is the balance you can spend.",
];

/// Tip matched to a category name: exact tag lookup, then keyword rules,
/// then the first fallback tip
fn tip_for_category(category: &str) -> &'static str {
    if let Some(tip) = TIP_POOL
        .iter()
        .find(|t| t.tag.eq_ignore_ascii_case(category))
    {
        return tip.text;
    }

    let lowered = category.to_lowercase();
    for (keyword, tip) in KEYWORD_RULES {
        if lowered.contains(keyword) {
            return tip;
        }
    }

    FALLBACK_TIPS[0]
}

/// Select up to three unique savings tips
///
/// `top_category` is the user's biggest expense category over the last 30
/// days, when they have one.
pub fn select_tips<R: Rng + ?Sized>(rng: &mut R, top_category: Option<&str>) -> Vec<&'static str> {
    let student_tips: Vec<&'static str> = TIP_POOL
        .iter()
        .filter(|t| t.tag == "student")
        .map(|t| t.text)
        .collect();

    let mut selected: Vec<&'static str> = Vec::with_capacity(3);
    for tip in student_tips.choose_multiple(rng, 2) {
        if !selected.contains(tip) {
            selected.push(*tip);
        }
    }

    if let Some(category) = top_category {
        let tip = tip_for_category(category);
        if !selected.contains(&tip) {
            selected.push(tip);
        }
    }

    // Pad to three from the fallback pool, keeping the list unique
    for tip in FALLBACK_TIPS {
        if selected.len() >= 3 {
            break;
        }
        if !selected.contains(tip) {
            selected.push(*tip);
        }
    }

    selected.truncate(3);
    selected
}

/// Convenience wrapper over a thread-local RNG
pub fn savings_tips(top_category: Option<&str>) -> Vec<&'static str> {
    select_tips(&mut rand::thread_rng(), top_category)
}

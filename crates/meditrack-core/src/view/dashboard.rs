//! Dashboard stat fields and user header.

use chrono::NaiveDate;

use super::{
    Screen, ACTIVE_MEDS_COUNT, ADHERENCE_RATE, AVATAR, CURRENT_DATE, NEXT_DOSE_TIME,
    UPCOMING_DOSES_COUNT, USERNAME, WELCOME_MESSAGE,
};
use crate::models::Identity;
use crate::schedule::DashboardStats;

/// Greeting, username and avatar initials. A missing identity shows "User".
pub fn paint_user_header(screen: &mut Screen, identity: Option<&Identity>) {
    let name = identity.map(Identity::display_name).unwrap_or("User");
    let initials = identity
        .map(Identity::initials)
        .unwrap_or_else(|| "U".to_string());

    screen.set_text(WELCOME_MESSAGE, format!("Welcome back, {}!", name));
    screen.set_text(USERNAME, name);
    screen.set_text(AVATAR, initials);
}

/// "Today is Saturday, October 17, 2026".
pub fn current_date_label(today: NaiveDate) -> String {
    format!("Today is {}", today.format("%A, %B %-d, %Y"))
}

pub fn paint_dashboard_stats(screen: &mut Screen, stats: &DashboardStats, today: NaiveDate) {
    screen.set_text(ACTIVE_MEDS_COUNT, stats.active_count.to_string());
    screen.set_text(UPCOMING_DOSES_COUNT, stats.upcoming_count.to_string());
    screen.set_text(NEXT_DOSE_TIME, stats.next_dose.to_string());
    screen.set_text(ADHERENCE_RATE, format!("{}%", stats.adherence_rate));
    screen.set_text(CURRENT_DATE, current_date_label(today));
}

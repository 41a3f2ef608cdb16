//! Daily message quota tracking and enforcement
//!
//! This module gates message processing on the user's subscription
//! tier. Counters roll over at calendar-day boundaries: the first
//! check on a new day resets `messages_used_today` to zero.
//!
//! The gate check MUST run before any generative call is made; the
//! orchestrator enforces that ordering.

use crate::config::PlansConfig;
use crate::models::User;
use chrono::{DateTime, Utc};

/// Resets the daily counter when `now` falls on a different calendar
/// day than the last processed message
pub fn rollover_if_new_day(user: &mut User, now: DateTime<Utc>) {
    if let Some(last) = user.usage.last_message_date {
        if last.date_naive() != now.date_naive() {
            user.usage.messages_used_today = 0;
        }
    }
}

/// Checks whether the user may send another message today
///
/// Performs the day rollover first, then compares the daily counter
/// against the tier's configured limit. Tiers with no configured limit
/// are unlimited.
///
/// # Examples
///
/// ```
/// use lovechat::chat::quota;
/// use lovechat::config::PlansConfig;
/// use lovechat::models::User;
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let mut user = User::new("Alex", "alex@example.com", now);
/// let plans = PlansConfig::default();
/// assert!(quota::can_send_message(&mut user, &plans, now));
/// ```
pub fn can_send_message(user: &mut User, plans: &PlansConfig, now: DateTime<Utc>) -> bool {
    rollover_if_new_day(user, now);

    match plans.daily_limit(user.tier) {
        None => true,
        Some(limit) => user.usage.messages_used_today < limit,
    }
}

/// Consumes one message from the user's daily quota
///
/// Performs the day rollover, then increments the daily and lifetime
/// counters and stamps the last-message date.
pub fn consume(user: &mut User, now: DateTime<Utc>) {
    rollover_if_new_day(user, now);

    user.usage.messages_used_today += 1;
    user.usage.total_messages += 1;
    user.usage.last_message_date = Some(now);
    user.last_active = now;
}

/// Messages remaining today, or `None` for unlimited tiers
///
/// Read-only: accounts for a pending day rollover without mutating the
/// user record.
pub fn messages_left(user: &User, plans: &PlansConfig, now: DateTime<Utc>) -> Option<u32> {
    let used_today = match user.usage.last_message_date {
        Some(last) if last.date_naive() == now.date_naive() => user.usage.messages_used_today,
        _ => 0,
    };

    plans
        .daily_limit(user.tier)
        .map(|limit| limit.saturating_sub(used_today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubscriptionTier;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn free_user() -> User {
        User::new("Alex", "alex@example.com", at(1, 9))
    }

    #[test]
    fn test_fresh_user_can_send() {
        let mut user = free_user();
        assert!(can_send_message(&mut user, &PlansConfig::default(), at(1, 9)));
    }

    #[test]
    fn test_free_tier_capped_at_limit() {
        let mut user = free_user();
        let plans = PlansConfig::default();
        let now = at(1, 9);

        for _ in 0..15 {
            assert!(can_send_message(&mut user, &plans, now));
            consume(&mut user, now);
        }

        assert_eq!(user.usage.messages_used_today, 15);
        assert!(!can_send_message(&mut user, &plans, now));
    }

    #[test]
    fn test_counter_resets_on_new_day() {
        let mut user = free_user();
        let plans = PlansConfig::default();

        for _ in 0..15 {
            consume(&mut user, at(1, 9));
        }
        assert!(!can_send_message(&mut user, &plans, at(1, 23)));

        // First check on the next day resets the counter
        assert!(can_send_message(&mut user, &plans, at(2, 0)));
        assert_eq!(user.usage.messages_used_today, 0);
    }

    #[test]
    fn test_basic_tier_uses_plan_limit() {
        let mut user = free_user();
        user.tier = SubscriptionTier::Basic;
        let plans = PlansConfig::default();
        let now = at(1, 9);

        user.usage.messages_used_today = 99;
        user.usage.last_message_date = Some(now);
        assert!(can_send_message(&mut user, &plans, now));

        user.usage.messages_used_today = 100;
        assert!(!can_send_message(&mut user, &plans, now));
    }

    #[test]
    fn test_premium_and_elite_unlimited() {
        let plans = PlansConfig::default();
        let now = at(1, 9);

        for tier in [SubscriptionTier::Premium, SubscriptionTier::Elite] {
            let mut user = free_user();
            user.tier = tier;
            user.usage.messages_used_today = 100_000;
            user.usage.last_message_date = Some(now);
            assert!(can_send_message(&mut user, &plans, now), "tier {}", tier);
        }
    }

    #[test]
    fn test_consume_increments_counters() {
        let mut user = free_user();
        let now = at(1, 9);

        consume(&mut user, now);
        consume(&mut user, now);

        assert_eq!(user.usage.messages_used_today, 2);
        assert_eq!(user.usage.total_messages, 2);
        assert_eq!(user.usage.last_message_date, Some(now));
        assert_eq!(user.last_active, now);
    }

    #[test]
    fn test_consume_rolls_over_before_counting() {
        let mut user = free_user();
        consume(&mut user, at(1, 9));
        consume(&mut user, at(2, 9));

        assert_eq!(user.usage.messages_used_today, 1);
        assert_eq!(user.usage.total_messages, 2);
    }

    #[test]
    fn test_messages_left_free_tier() {
        let mut user = free_user();
        let plans = PlansConfig::default();
        let now = at(1, 9);

        assert_eq!(messages_left(&user, &plans, now), Some(15));
        consume(&mut user, now);
        assert_eq!(messages_left(&user, &plans, now), Some(14));
    }

    #[test]
    fn test_messages_left_accounts_for_rollover() {
        let mut user = free_user();
        let plans = PlansConfig::default();

        for _ in 0..15 {
            consume(&mut user, at(1, 9));
        }
        assert_eq!(messages_left(&user, &plans, at(1, 23)), Some(0));
        assert_eq!(messages_left(&user, &plans, at(2, 0)), Some(15));
    }

    #[test]
    fn test_messages_left_unlimited_is_none() {
        let mut user = free_user();
        user.tier = SubscriptionTier::Elite;
        assert_eq!(
            messages_left(&user, &PlansConfig::default(), at(1, 9)),
            None
        );
    }
}

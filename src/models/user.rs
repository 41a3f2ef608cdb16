//! User record: subscription tier, usage counters, and relationship progression

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier governing daily quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Basic,
    Premium,
    Elite,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Basic => "basic",
            SubscriptionTier::Premium => "premium",
            SubscriptionTier::Elite => "elite",
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Daily and lifetime usage counters
///
/// `messages_used_today` resets to zero the first time a message is
/// processed on a calendar day different from `last_message_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub messages_used_today: u32,
    pub last_message_date: Option<DateTime<Utc>>,
    pub total_messages: u64,
    pub joined_at: DateTime<Utc>,
}

/// User-scoped relationship progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Progression level in [1, 100]
    pub level: f64,
    /// Consecutive-day usage streak
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_streak_date: Option<DateTime<Utc>>,
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub tier: SubscriptionTier,
    pub usage: Usage,
    pub relationship: Relationship,
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Creates a new free-tier user
    pub fn new(name: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            tier: SubscriptionTier::Free,
            usage: Usage {
                messages_used_today: 0,
                last_message_date: None,
                total_messages: 0,
                joined_at: now,
            },
            relationship: Relationship {
                level: 1.0,
                current_streak: 0,
                longest_streak: 0,
                last_streak_date: None,
            },
            last_active: now,
        }
    }

    /// Updates the consecutive-day streak
    ///
    /// Last active exactly yesterday continues the streak; any other
    /// prior day resets it to 1; a second update on the same day leaves
    /// the count unchanged. The longest streak and the streak date are
    /// refreshed either way.
    pub fn update_streak(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        let yesterday = today - Duration::days(1);

        match self.usage_streak_date() {
            Some(last) if last == yesterday => {
                self.relationship.current_streak += 1;
            }
            Some(last) if last == today => {
                // Already counted today
            }
            _ => {
                self.relationship.current_streak = 1;
            }
        }

        if self.relationship.current_streak > self.relationship.longest_streak {
            self.relationship.longest_streak = self.relationship.current_streak;
        }

        self.relationship.last_streak_date = Some(now);
    }

    fn usage_streak_date(&self) -> Option<chrono::NaiveDate> {
        self.relationship.last_streak_date.map(|d| d.date_naive())
    }

    /// Raises the relationship level by `amount`, capped at 100
    pub fn raise_relationship_level(&mut self, amount: f64) {
        self.relationship.level = (self.relationship.level + amount).min(100.0);
    }

    /// Human-readable relationship status label
    pub fn relationship_status(&self) -> &'static str {
        let level = self.relationship.level;
        if level < 10.0 {
            "New Connection"
        } else if level < 25.0 {
            "Getting to Know Each Other"
        } else if level < 50.0 {
            "Close Friends"
        } else if level < 75.0 {
            "Deep Connection"
        } else {
            "Soulmates"
        }
    }

}

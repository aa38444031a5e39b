//! Marketplace users (customer management screen)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Chart, Listing, ScreenFilter, StatCard};
use crate::records::{day_label, sort, Choice, Comparator, Filter, OptionSet, Record, Search, Tally};

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub is_seller: bool,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl OptionSet for Role {
    fn options() -> &'static [Self] {
        &[Role::Admin, Role::User]
    }

    fn label(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role '{other}' (expected all, admin, user)")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Record for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Search on username or email, plus a role filter
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Search,
    pub role: Choice<Role>,
}

impl Filter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        self.search
            .matches_any([user.username.as_str(), user.email.as_str()])
            && self.role.matches(&user.role)
    }
}

impl ScreenFilter<User> for UserFilter {
    fn search(&self) -> &Search {
        &self.search
    }

    fn search_mut(&mut self) -> &mut Search {
        &mut self.search
    }

    fn controls(&self) -> Vec<(&'static str, &'static str)> {
        vec![("Role", self.role.label())]
    }

    fn cycle(&mut self, slot: usize) {
        if slot == 0 {
            self.role = self.role.cycle();
        }
    }
}

/// User table orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSort {
    Newest,
    Oldest,
    NameAsc,
    NameDesc,
}

impl Comparator<User> for UserSort {
    fn compare(&self, a: &User, b: &User) -> Ordering {
        match self {
            UserSort::Newest => b.created_at.cmp(&a.created_at),
            UserSort::Oldest => a.created_at.cmp(&b.created_at),
            UserSort::NameAsc => sort::by_text(&a.username, &b.username),
            UserSort::NameDesc => sort::by_text(&b.username, &a.username),
        }
    }
}

impl OptionSet for UserSort {
    fn options() -> &'static [Self] {
        &[
            UserSort::Newest,
            UserSort::Oldest,
            UserSort::NameAsc,
            UserSort::NameDesc,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            UserSort::Newest => "Joined (Newest)",
            UserSort::Oldest => "Joined (Oldest)",
            UserSort::NameAsc => "Name (A-Z)",
            UserSort::NameDesc => "Name (Z-A)",
        }
    }
}

impl FromStr for UserSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "joined-desc" => Ok(UserSort::Newest),
            "joined-asc" => Ok(UserSort::Oldest),
            "name-asc" => Ok(UserSort::NameAsc),
            "name-desc" => Ok(UserSort::NameDesc),
            other => Err(format!(
                "unknown sort '{other}' (expected joined-desc, joined-asc, name-asc, name-desc)"
            )),
        }
    }
}

/// Stat card values for the user screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub admins: usize,
    pub sellers: usize,
    pub verified: usize,
}

impl UserStats {
    pub fn compute(users: &[User]) -> Self {
        let mut stats = UserStats {
            total: users.len(),
            admins: 0,
            sellers: 0,
            verified: 0,
        };
        for user in users {
            if user.role == Role::Admin {
                stats.admins += 1;
            }
            if user.is_seller {
                stats.sellers += 1;
            }
            if user.is_verified {
                stats.verified += 1;
            }
        }
        stats
    }
}

impl Listing for User {
    type Filter = UserFilter;
    type Sort = UserSort;

    const TITLE: &'static str = "Customer Management";
    const HEADERS: &'static [&'static str] = &["Name", "Email", "Role", "Seller", "Joined"];
    const WIDTHS: &'static [u16] = &[20, 35, 10, 10, 25];

    fn cells(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.email.clone(),
            self.role.to_string(),
            if self.is_seller { "Yes" } else { "No" }.to_string(),
            self.created_at.format("%Y-%m-%d").to_string(),
        ]
    }

    fn stat_cards(users: &[Self], _now: DateTime<Utc>) -> Vec<StatCard> {
        let stats = UserStats::compute(users);
        vec![
            StatCard::new("Total Users", stats.total),
            StatCard::new("Admins", stats.admins),
            StatCard::new("Sellers", stats.sellers),
            StatCard::new("Verified", stats.verified),
        ]
    }

    fn charts(users: &[Self], _now: DateTime<Utc>) -> Vec<Chart> {
        let stats = UserStats::compute(users);
        vec![
            Chart {
                title: "User Roles",
                tally: Tally::from_pairs([
                    ("Admins", stats.admins),
                    ("Users", stats.total - stats.admins),
                ]),
            },
            Chart {
                title: "Signup Trends",
                tally: Tally::from_keys(users.iter().map(|u| day_label(u.created_at))),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordView;
    use chrono::TimeZone;

    fn user(id: &str, name: &str, role: Role, seller: bool, day: u32) -> User {
        User {
            id: id.to_string(),
            username: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role,
            is_seller: seller,
            is_verified: day % 2 == 0,
            created_at: Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap(),
        }
    }

    fn users() -> Vec<User> {
        vec![
            user("u1", "Kofi", Role::Admin, false, 2),
            user("u2", "Ama", Role::User, true, 2),
            user("u3", "Yaw", Role::User, true, 5),
        ]
    }

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "_id": "abc",
            "username": "kofi",
            "email": "kofi@example.com",
            "role": "admin",
            "isSeller": true,
            "isVerified": false,
            "createdAt": "2025-03-02T10:00:00.000Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "abc");
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_seller);
    }

    #[test]
    fn test_search_matches_username_or_email() {
        let view = RecordView::new(users());
        let filter = UserFilter {
            search: Search::new("AMA@"),
            role: Choice::All,
        };
        let rows = view.filtered(&filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "u2");
    }

    #[test]
    fn test_role_filter() {
        let view = RecordView::new(users());
        let mut filter = UserFilter::default();
        filter.cycle(0);
        assert_eq!(filter.role, Choice::Only(Role::Admin));
        assert_eq!(view.filtered(&filter).len(), 1);
        assert_eq!(filter.controls(), vec![("Role", "admin")]);
    }

    #[test]
    fn test_stats_ignore_filtering() {
        let all = users();
        let stats = UserStats::compute(&all);
        assert_eq!(
            stats,
            UserStats {
                total: 3,
                admins: 1,
                sellers: 2,
                verified: 2
            }
        );
    }

    #[test]
    fn test_charts() {
        let charts = User::charts(&users(), Utc::now());
        assert_eq!(charts[0].tally.counts(), [1, 2]);
        assert_eq!(charts[1].tally.labels(), ["Mar 2", "Mar 5"]);
        assert_eq!(charts[1].tally.total(), 3);
    }

    #[test]
    fn test_empty_user_set() {
        let cards = User::stat_cards(&[], Utc::now());
        assert!(cards.iter().all(|c| c.value == "0"));
        let charts = User::charts(&[], Utc::now());
        assert!(charts[1].tally.is_empty());
    }

    #[test]
    fn test_sort_by_name() {
        let view = RecordView::new(users());
        let rows = view.query(&UserFilter::default(), Some(&UserSort::NameAsc));
        let names: Vec<&str> = rows.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["Ama", "Kofi", "Yaw"]);
    }
}

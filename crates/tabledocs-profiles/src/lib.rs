//! Synthetic user-profile generation for table demos.
//!
//! Pure random-data synthesis per call: no state, no caching, no
//! concurrency concerns. Profiles can carry a flat list of friend
//! profiles; friends never have friends of their own (nesting depth is
//! capped at one level).

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum generated age, inclusive.
const MIN_AGE: u8 = 18;
/// Maximum generated age, inclusive.
const MAX_AGE: u8 = 99;

/// A generated demo profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    /// Random UUID.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Age in `[18, 99]`.
    pub age: u8,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Nested friend profiles; empty for friends themselves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub friends: Vec<UserProfile>,
}

/// Generate `n` profiles without friends.
#[must_use]
pub fn generate(n: usize) -> Vec<UserProfile> {
    generate_with_friends(n, 0)
}

/// Generate `n` profiles, each with exactly `n_friends` friends.
///
/// Friends are generated with zero further nesting.
#[must_use]
pub fn generate_with_friends(n: usize, n_friends: usize) -> Vec<UserProfile> {
    (0..n)
        .map(|_| {
            let mut profile = generate_one();
            profile.friends = (0..n_friends).map(|_| generate_one()).collect();
            profile
        })
        .collect()
}

fn generate_one() -> UserProfile {
    UserProfile {
        id: Uuid::new_v4().to_string(),
        name: Name().fake(),
        age: (MIN_AGE..=MAX_AGE).fake(),
        email: SafeEmail().fake(),
        phone: PhoneNumber().fake(),
        friends: Vec::new(),
    }
}

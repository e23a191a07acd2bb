//! Domain factories for creating domain entities and value objects.

use rand::seq::SliceRandom;

use super::{Profile, SessionId, Username};

/// Colors handed out to users seen for the first time.
pub const PROFILE_COLORS: [&str; 10] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    "#bcf60c", "#fabebe",
];

/// Mood given to new profiles.
pub const DEFAULT_MOOD: &str = "😀";

/// Factory for generating SessionId instances.
///
/// This factory encapsulates the logic for generating new session identifiers,
/// separating the generation concern from the parsing logic in SessionId.
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a new SessionId with a random UUID v4.
    pub fn generate() -> SessionId {
        SessionId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for profiles of users that have never connected before.
pub struct ProfileFactory;

impl ProfileFactory {
    /// Create a profile with a random palette color and the default mood.
    pub fn first_visit(username: Username) -> Profile {
        let color = PROFILE_COLORS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(PROFILE_COLORS[0]);
        Profile::new(username, color.to_string(), DEFAULT_MOOD.to_string())
    }
}

//! Identity types: the immutable keys of every registry.
//!
//! All of these are "newtype wrappers" so a `TeamId` can never be passed
//! where a `PlayerId` is expected, even though both wrap a UUID.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Validation rules
// ---------------------------------------------------------------------------

/// Accepts an RFC-5322-ish email address as user id. ASCII only: the
/// regex crate's `\w` is Unicode-aware, so the word class is spelled out.
static USER_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_!#$%&'*+/=?`{|}~^-]+(?:\.[A-Za-z0-9_!#$%&'*+/=?`{|}~^-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,6}$",
    )
    .expect("user id pattern is a valid regex")
});

/// Minimum number of characters in a password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Characters that count as "special" for the password rules.
const PASSWORD_SPECIALS: &[char] = &['!', '@', '#', '$', '%', '&'];

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// A validated, email-shaped user identifier.
///
/// The only way to build one is [`UserId::parse`] (or deserialization,
/// which goes through the same check), so holding a `UserId` proves the
/// format was validated.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validates `raw` and wraps it.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        if USER_ID_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ProtocolError::InvalidUserId(raw.to_string()))
        }
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ProtocolError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// A user id and password pair as supplied by a client at sign-up or login.
///
/// Nothing is validated on construction: login must be able to carry a
/// malformed id all the way to the "unknown user" answer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub user_id: String,
    pub password: String,
}

impl Credential {
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    /// Checks the sign-up format rules and returns the parsed user id.
    ///
    /// The password must hold a lowercase letter, an uppercase letter,
    /// a digit, one of `!@#$%&`, and be at least
    /// [`MIN_PASSWORD_LEN`] characters long.
    pub fn validate(&self) -> Result<UserId, ProtocolError> {
        let user_id = UserId::parse(&self.user_id)?;
        let password = &self.password;
        let strong = password.chars().count() >= MIN_PASSWORD_LEN
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| PASSWORD_SPECIALS.contains(&c));
        if !strong {
            return Err(ProtocolError::WeakPassword);
        }
        Ok(user_id)
    }
}

/// Keeps the password out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("password", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SessionToken
// ---------------------------------------------------------------------------

/// Opaque token handed out on login; the key into the session registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Prints only a short prefix so tokens never end up whole in logs.
impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "S-{prefix}")
    }
}

// ---------------------------------------------------------------------------
// TeamId / PlayerId
// ---------------------------------------------------------------------------

/// Random 128-bit team identifier. Ordered, so teams can be locked in a
/// fixed global order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TeamId(pub Uuid);

impl TeamId {
    /// Draws a fresh v4 identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TeamId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ProtocolError::InvalidIdentifier(s.to_string()))
    }
}

/// Random 128-bit player identifier. Rosters are sorted by it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlayerId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ProtocolError::InvalidIdentifier(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// PlayerType
// ---------------------------------------------------------------------------

/// The position a player fills on the pitch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerType {
    GoalKeeper,
    Defender,
    Midfielder,
    Attacker,
}

impl PlayerType {
    /// Every player type, in roster-generation order.
    pub const ALL: [PlayerType; 4] = [
        PlayerType::GoalKeeper,
        PlayerType::Defender,
        PlayerType::Midfielder,
        PlayerType::Attacker,
    ];
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GoalKeeper => "GOAL_KEEPER",
            Self::Defender => "DEFENDER",
            Self::Midfielder => "MIDFIELDER",
            Self::Attacker => "ATTACKER",
        };
        f.write_str(name)
    }
}

impl FromStr for PlayerType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GOAL_KEEPER" => Ok(Self::GoalKeeper),
            "DEFENDER" => Ok(Self::Defender),
            "MIDFIELDER" => Ok(Self::Midfielder),
            "ATTACKER" => Ok(Self::Attacker),
            other => Err(ProtocolError::InvalidIdentifier(other.to_string())),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -- UserId -----------------------------------------------------------

    #[test]
    fn test_user_id_parse_plain_email_succeeds() {
        let id = UserId::parse("alice@soccer.com").expect("valid email");
        assert_eq!(id.as_str(), "alice@soccer.com");
    }

    #[test]
    fn test_user_id_parse_dotted_local_part_succeeds() {
        assert!(UserId::parse("first.last+tag@mail.example.org").is_ok());
    }

    #[test]
    fn test_user_id_parse_missing_at_sign_fails() {
        let result = UserId::parse("alice.soccer.com");
        assert!(matches!(result, Err(ProtocolError::InvalidUserId(_))));
    }

    #[test]
    fn test_user_id_parse_missing_tld_fails() {
        assert!(UserId::parse("alice@localhost").is_err());
    }

    #[test]
    fn test_user_id_parse_non_ascii_local_part_fails() {
        for raw in ["josé@soccer.com", "дима@soccer.com", "李@soccer.com"] {
            assert!(
                matches!(UserId::parse(raw), Err(ProtocolError::InvalidUserId(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_user_id_parse_underscore_and_digits_succeeds() {
        assert!(UserId::parse("jose_99@soccer.com").is_ok());
    }

    #[test]
    fn test_user_id_parse_leading_dot_fails() {
        assert!(UserId::parse(".alice@soccer.com").is_err());
    }

    #[test]
    fn test_user_id_deserialize_runs_validation() {
        let ok: Result<UserId, _> = serde_json::from_str("\"bob@soccer.com\"");
        assert!(ok.is_ok());
        let bad: Result<UserId, _> = serde_json::from_str("\"not-an-email\"");
        assert!(bad.is_err());
    }

    // -- Credential -------------------------------------------------------

    #[test]
    fn test_credential_validate_strong_password_succeeds() {
        let cred = Credential::new("carol@soccer.com", "a2TT&d3mn");
        let id = cred.validate().expect("should validate");
        assert_eq!(id.as_str(), "carol@soccer.com");
    }

    #[test]
    fn test_credential_validate_missing_special_fails() {
        let cred = Credential::new("carol@soccer.com", "a2TTd3mn");
        assert_eq!(cred.validate(), Err(ProtocolError::WeakPassword));
    }

    #[test]
    fn test_credential_validate_missing_uppercase_fails() {
        let cred = Credential::new("carol@soccer.com", "a2tt&d3mn");
        assert_eq!(cred.validate(), Err(ProtocolError::WeakPassword));
    }

    #[test]
    fn test_credential_validate_missing_digit_fails() {
        let cred = Credential::new("carol@soccer.com", "aBTT&dxmn");
        assert_eq!(cred.validate(), Err(ProtocolError::WeakPassword));
    }

    #[test]
    fn test_credential_validate_too_short_fails() {
        let cred = Credential::new("carol@soccer.com", "a2T&d3m");
        assert_eq!(cred.validate(), Err(ProtocolError::WeakPassword));
    }

    #[test]
    fn test_credential_validate_bad_user_id_reported_first() {
        let cred = Credential::new("carol", "weak");
        assert!(matches!(cred.validate(), Err(ProtocolError::InvalidUserId(_))));
    }

    #[test]
    fn test_credential_debug_hides_password() {
        let cred = Credential::new("carol@soccer.com", "a2TT&d3mn");
        let printed = format!("{cred:?}");
        assert!(!printed.contains("a2TT&d3mn"));
        assert!(printed.contains("carol@soccer.com"));
    }

    // -- SessionToken -----------------------------------------------------

    #[test]
    fn test_session_token_display_shows_prefix_only() {
        let token = SessionToken::new("0123456789abcdef0123456789abcdef");
        assert_eq!(token.to_string(), "S-01234567");
    }

    // -- TeamId / PlayerId ------------------------------------------------

    #[test]
    fn test_team_id_random_is_unique() {
        assert_ne!(TeamId::random(), TeamId::random());
    }

    #[test]
    fn test_team_id_display_parses_back() {
        let id = TeamId::random();
        let parsed: TeamId = id.to_string().parse().expect("should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_player_id_from_str_garbage_fails() {
        let result: Result<PlayerId, _> = "nope".parse();
        assert!(matches!(result, Err(ProtocolError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_player_id_serializes_as_bare_uuid() {
        let id = PlayerId::random();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }

    // -- PlayerType -------------------------------------------------------

    #[test]
    fn test_player_type_json_uses_screaming_snake_case() {
        let json = serde_json::to_value(PlayerType::GoalKeeper).unwrap();
        assert_eq!(json, "GOAL_KEEPER");
    }

    #[test]
    fn test_player_type_display_matches_from_str() {
        for kind in PlayerType::ALL {
            let parsed: PlayerType = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }
}

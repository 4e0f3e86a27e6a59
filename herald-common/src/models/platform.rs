// File: herald-common/src/models/platform.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Content platform a watched channel lives on.
/// Add sqlx::Type so that SQLx knows how to decode this enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Twitter,
}

impl Platform {
    /// Human-readable form used in rendered notification text.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Twitter => "Twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::YouTube => write!(f, "youtube"),
            Platform::Twitter => write!(f, "twitter"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "youtube" => Ok(Platform::YouTube),
            "twitter" => Ok(Platform::Twitter),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// Lifecycle event a platform emits for a watched channel.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Live,
    Upload,
    Upcoming,
    Offline,
    Post,
}

impl EventKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            EventKind::Live => "Live",
            EventKind::Upload => "Upload",
            EventKind::Upcoming => "Upcoming",
            EventKind::Offline => "Offline",
            EventKind::Post => "Post",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Live => write!(f, "live"),
            EventKind::Upload => write!(f, "upload"),
            EventKind::Upcoming => write!(f, "upcoming"),
            EventKind::Offline => write!(f, "offline"),
            EventKind::Post => write!(f, "post"),
        }
    }
}

impl FromStr for EventKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(EventKind::Live),
            "upload" => Ok(EventKind::Upload),
            "upcoming" => Ok(EventKind::Upcoming),
            "offline" => Ok(EventKind::Offline),
            "post" => Ok(EventKind::Post),
            _ => Err(format!("Unknown event kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_round_trips_through_strings() {
        for p in [Platform::YouTube, Platform::Twitter] {
            let parsed: Platform = p.to_string().parse().unwrap();
            assert_eq!(parsed, p);
        }
        assert!("mastodon".parse::<Platform>().is_err());
    }

    #[test]
    fn event_kind_round_trips_through_strings() {
        for k in [
            EventKind::Live,
            EventKind::Upload,
            EventKind::Upcoming,
            EventKind::Offline,
            EventKind::Post,
        ] {
            let parsed: EventKind = k.to_string().parse().unwrap();
            assert_eq!(parsed, k);
        }
        assert!("premiere".parse::<EventKind>().is_err());
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!("LIVE".parse::<EventKind>().unwrap(), EventKind::Live);
    }
}

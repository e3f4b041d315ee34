//! # Language Codes and Entity Types
//!
//! `LanguageCode` is a validated lowercase ISO 639 code. `EntityType` is
//! the closed set of catalog content types. The capability table at the
//! bottom answers "which languages may this entity type carry?" — a
//! lookup keyed by entity type, deliberately not a trait hierarchy, so
//! adding a type forces every consumer through one exhaustive `match`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ─── Language Code ───────────────────────────────────────────────────

/// A validated language code: 2–3 lowercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Validate and wrap a language code.
    ///
    /// # Errors
    ///
    /// Rejects codes that are not 2–3 lowercase ASCII letters.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        if !(2..=3).contains(&code.len()) {
            return Err(CoreError::InvalidLanguageCode {
                code,
                reason: "must be 2-3 characters".to_string(),
            });
        }
        if !code.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(CoreError::InvalidLanguageCode {
                code,
                reason: "must be lowercase ASCII letters".to_string(),
            });
        }
        Ok(Self(code))
    }

    /// Access the code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ─── Entity Type ─────────────────────────────────────────────────────

/// The type of a catalog content entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// A public service description.
    Service,
    /// A service delivery channel (office, phone line, web page, form).
    Channel,
    /// A base description shared by similar services across organizations.
    GeneralDescription,
    /// An organization responsible for services and channels.
    Organization,
}

impl EntityType {
    /// All entity types, for iteration in validation and tests.
    pub const ALL: [EntityType; 4] = [
        EntityType::Service,
        EntityType::Channel,
        EntityType::GeneralDescription,
        EntityType::Organization,
    ];
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Service => "SERVICE",
            Self::Channel => "CHANNEL",
            Self::GeneralDescription => "GENERAL_DESCRIPTION",
            Self::Organization => "ORGANIZATION",
        };
        f.write_str(s)
    }
}

// ─── Language Capability Table ───────────────────────────────────────

/// The language codes an entity type may carry versions in.
///
/// Services and channels are translated into the minority languages as
/// well; organizations and general descriptions only into the national
/// languages plus English.
pub fn allowed_languages(entity_type: EntityType) -> &'static [&'static str] {
    match entity_type {
        EntityType::Service | EntityType::Channel => &["fi", "sv", "en", "se", "smn", "sms"],
        EntityType::GeneralDescription | EntityType::Organization => &["fi", "sv", "en"],
    }
}

/// Whether `language` is enabled for `entity_type`.
pub fn language_enabled(entity_type: EntityType, language: &LanguageCode) -> bool {
    allowed_languages(entity_type)
        .iter()
        .any(|code| *code == language.as_str())
}

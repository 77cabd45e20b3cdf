//! # Provider Catalog
//!
//! A provider identifies which analytics view a proof attests to. The ids
//! are the attestation network's provider identifiers and are matched
//! exactly. Each provider selects one shape-specific reader in
//! [`crate::readers`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// TikTok account-wide audience insights.
pub const TIKTOK_ACCOUNT_PROVIDER_ID: &str = "603b4a67-f8fe-42bf-8154-4c88a2672244";
/// TikTok Studio viewer demographics.
pub const TIKTOK_DEMOGRAPHICS_PROVIDER_ID: &str = "6392b7c7-684e-4a08-814d-f12fe085fd65";
/// TikTok per-video analytics.
pub const TIKTOK_VIDEO_PROVIDER_ID: &str = "9ec60ce1-e131-428c-b4fc-865f9782a09c";
/// Instagram account-wide profile.
pub const INSTAGRAM_ACCOUNT_PROVIDER_ID: &str = "7729ae3e-179c-4ac8-8c5d-4bcd909c864d";
/// Instagram per-post insights.
pub const INSTAGRAM_POST_PROVIDER_ID: &str = "04c62f5c-acd6-4ac0-a2f7-4d614a406ab6";

/// Social platform a provider reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Tiktok,
    Instagram,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiktok => "tiktok",
            Self::Instagram => "instagram",
        }
    }
}

/// The five analytics providers this service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    TiktokAccount,
    TiktokDemographics,
    TiktokVideo,
    InstagramAccount,
    InstagramPost,
}

impl Provider {
    /// Every known provider, in catalog order.
    pub const ALL: [Provider; 5] = [
        Provider::TiktokAccount,
        Provider::TiktokDemographics,
        Provider::TiktokVideo,
        Provider::InstagramAccount,
        Provider::InstagramPost,
    ];

    /// Resolve a provider from its attestation-network id.
    pub fn from_id(id: &str) -> Result<Self, ExtractError> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| ExtractError::UnknownProvider(id.to_string()))
    }

    /// Resolve an optional provider id. Requests that omit it, or name an
    /// id outside the catalog, are read as TikTok account analytics.
    pub fn from_optional_id(id: Option<&str>) -> Self {
        match id {
            None => Self::TiktokAccount,
            Some(id) => Self::from_id(id).unwrap_or_else(|_| {
                tracing::warn!(provider_id = id, "unknown provider id; reading as TikTok account");
                Self::TiktokAccount
            }),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::TiktokAccount => TIKTOK_ACCOUNT_PROVIDER_ID,
            Self::TiktokDemographics => TIKTOK_DEMOGRAPHICS_PROVIDER_ID,
            Self::TiktokVideo => TIKTOK_VIDEO_PROVIDER_ID,
            Self::InstagramAccount => INSTAGRAM_ACCOUNT_PROVIDER_ID,
            Self::InstagramPost => INSTAGRAM_POST_PROVIDER_ID,
        }
    }

    /// Short label returned to clients as `provider_type`.
    pub fn provider_type(&self) -> &'static str {
        match self {
            Self::TiktokAccount => "account",
            Self::TiktokDemographics => "tiktok_demographics",
            Self::TiktokVideo => "video",
            Self::InstagramAccount => "instagram_account",
            Self::InstagramPost => "post",
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::TiktokAccount | Self::TiktokDemographics | Self::TiktokVideo => Platform::Tiktok,
            Self::InstagramAccount | Self::InstagramPost => Platform::Instagram,
        }
    }

    /// Whether the proof is about a single piece of content (video or post)
    /// rather than the whole account.
    pub fn requires_content_id(&self) -> bool {
        matches!(self, Self::TiktokVideo | Self::InstagramPost)
    }

    /// Name of the extracted parameter that carries the content id when the
    /// request does not supply one.
    pub(crate) fn content_id_param(&self) -> Option<&'static str> {
        match self {
            Self::TiktokVideo => Some("postId"),
            Self::InstagramPost => Some("content_id"),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.provider_type(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_provider_round_trips_through_its_id() {
        for p in Provider::ALL {
            assert_eq!(Provider::from_id(p.id()).unwrap(), p);
        }
    }

    #[test]
    fn missing_id_defaults_to_tiktok_account() {
        assert_eq!(
            Provider::from_optional_id(None),
            Provider::TiktokAccount
        );
    }

    #[test]
    fn unknown_optional_id_falls_back_to_tiktok_account() {
        assert_eq!(
            Provider::from_optional_id(Some("0b1c2d3e-aaaa-bbbb-cccc-000000000000")),
            Provider::TiktokAccount
        );
        assert_eq!(
            Provider::from_optional_id(Some(INSTAGRAM_POST_PROVIDER_ID)),
            Provider::InstagramPost
        );
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = Provider::from_id("not-a-provider").unwrap_err();
        assert!(matches!(err, ExtractError::UnknownProvider(ref id) if id == "not-a-provider"));
    }

    #[test]
    fn provider_types_are_distinct() {
        let mut types: Vec<_> = Provider::ALL.iter().map(|p| p.provider_type()).collect();
        types.sort_unstable();
        types.dedup();
        assert_eq!(types.len(), 5);
    }

    #[test]
    fn only_content_providers_need_content_id() {
        assert!(Provider::TiktokVideo.requires_content_id());
        assert!(Provider::InstagramPost.requires_content_id());
        assert!(!Provider::TiktokAccount.requires_content_id());
        assert!(!Provider::TiktokDemographics.requires_content_id());
        assert!(!Provider::InstagramAccount.requires_content_id());
    }

    #[test]
    fn platforms() {
        assert_eq!(Provider::TiktokDemographics.platform(), Platform::Tiktok);
        assert_eq!(Provider::InstagramPost.platform().as_str(), "instagram");
    }
}

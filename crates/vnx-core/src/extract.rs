//! # Uniform Extraction Result
//!
//! [`normalize`] dispatches to the provider's reader and returns an
//! [`ExtractedData`]: the three common summary fields plus at most one
//! provider-specific [`ProviderPayload`]. The payload is an enum, so a
//! video result can never also carry post metrics.
//!
//! The projection helpers on `ExtractedData` decide what goes into the
//! persisted verification record (`stored_metrics`, `follower_count`) and
//! which identity fields are echoed back to the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::demographics::Demographics;
use crate::probe::param_text;
use crate::proof::Params;
use crate::provider::Provider;
use crate::readers;

/// Normalized summary of one proof.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedData {
    pub demographics: Demographics,
    pub engagement_rate: Option<f64>,
    pub avg_views: Option<f64>,
    #[serde(flatten)]
    pub payload: Option<ProviderPayload>,
}

/// Provider-specific detail. Serialized under its snake_case key, e.g.
/// `{"video_metrics": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderPayload {
    AccountAnalytics(AccountAnalytics),
    VideoMetrics(VideoMetrics),
    TiktokUserProfile(TikTokUserProfile),
    InstagramAccount(InstagramAccount),
    PostMetrics(PostMetrics),
}

impl ProviderPayload {
    /// The key this payload is serialized under.
    pub fn key(&self) -> &'static str {
        match self {
            Self::AccountAnalytics(_) => "account_analytics",
            Self::VideoMetrics(_) => "video_metrics",
            Self::TiktokUserProfile(_) => "tiktok_user_profile",
            Self::InstagramAccount(_) => "instagram_account",
            Self::PostMetrics(_) => "post_metrics",
        }
    }
}

/// TikTok account-wide analytics sections, passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAnalytics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_sources: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_terms: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<Value>,
}

/// Per-video performance figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saves: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<f64>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_view_duration: Option<f64>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reach: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_viewers_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic_sources: Option<Value>,
}

/// Account identity carried in TikTok demographics proofs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TikTokUserProfile {
    pub user_id: String,
    pub username: String,
}

/// Instagram profile counters, read from claim parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramAccount {
    pub username: String,
    pub follower_count: i64,
    pub following_count: i64,
}

/// Instagram per-post insights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetrics {
    pub views: f64,
    pub reach: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_media_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ExtractedData {
    /// Summary with empty demographics and nothing else.
    pub fn empty() -> Self {
        Self {
            demographics: Demographics::default(),
            engagement_rate: None,
            avg_views: None,
            payload: None,
        }
    }

    pub fn video_metrics(&self) -> Option<&VideoMetrics> {
        match &self.payload {
            Some(ProviderPayload::VideoMetrics(m)) => Some(m),
            _ => None,
        }
    }

    pub fn post_metrics(&self) -> Option<&PostMetrics> {
        match &self.payload {
            Some(ProviderPayload::PostMetrics(m)) => Some(m),
            _ => None,
        }
    }

    pub fn account_analytics(&self) -> Option<&AccountAnalytics> {
        match &self.payload {
            Some(ProviderPayload::AccountAnalytics(a)) => Some(a),
            _ => None,
        }
    }

    pub fn instagram_account(&self) -> Option<&InstagramAccount> {
        match &self.payload {
            Some(ProviderPayload::InstagramAccount(a)) => Some(a),
            _ => None,
        }
    }

    pub fn tiktok_user_profile(&self) -> Option<&TikTokUserProfile> {
        match &self.payload {
            Some(ProviderPayload::TiktokUserProfile(p)) => Some(p),
            _ => None,
        }
    }

    /// Metrics blob for the record's `video_metrics` column: video metrics,
    /// else post metrics, else the Instagram account figures.
    pub fn stored_metrics(&self) -> Option<Value> {
        match &self.payload {
            Some(ProviderPayload::VideoMetrics(m)) => serde_json::to_value(m).ok(),
            Some(ProviderPayload::PostMetrics(m)) => serde_json::to_value(m).ok(),
            Some(ProviderPayload::InstagramAccount(a)) => serde_json::to_value(a).ok(),
            _ => None,
        }
    }

    /// Follower count for the record. Only Instagram account proofs carry
    /// one, and a zero count is stored as absent.
    pub fn follower_count(&self) -> Option<i64> {
        self.instagram_account()
            .map(|a| a.follower_count)
            .filter(|n| *n != 0)
    }

    /// Creator username: claim parameters first, then whatever the payload
    /// knows.
    pub fn username(&self, params: &Params) -> Option<String> {
        param_text(params, "username")
            .or_else(|| {
                self.tiktok_user_profile()
                    .map(|p| p.username.clone())
                    .filter(|s| !s.is_empty())
            })
            .or_else(|| self.user_profile_text("username"))
            .or_else(|| {
                self.instagram_account()
                    .map(|a| a.username.clone())
                    .filter(|s| !s.is_empty())
            })
    }

    /// Platform user id, resolved like [`ExtractedData::username`].
    pub fn user_id(&self, params: &Params) -> Option<String> {
        param_text(params, "userId")
            .or_else(|| {
                self.tiktok_user_profile()
                    .map(|p| p.user_id.clone())
                    .filter(|s| !s.is_empty())
            })
            .or_else(|| self.user_profile_text("userId"))
    }

    fn user_profile_text(&self, key: &str) -> Option<String> {
        let profile = self.account_analytics()?.user_profile.as_ref()?.as_object()?;
        param_text(profile, key)
    }
}

/// Run the provider's reader over the proof contents.
pub fn normalize(
    provider: Provider,
    public_data: Option<&Map<String, Value>>,
    params: &Params,
) -> ExtractedData {
    let empty = Map::new();
    let public = public_data.unwrap_or(&empty);

    let data = match provider {
        Provider::TiktokAccount => readers::tiktok_account(public),
        Provider::TiktokVideo => readers::tiktok_video(public),
        Provider::TiktokDemographics => readers::tiktok_demographics(public, params),
        Provider::InstagramAccount => readers::instagram_account(params),
        Provider::InstagramPost => readers::instagram_post(public),
    };

    tracing::debug!(
        provider_type = provider.provider_type(),
        countries = data.demographics.countries.len(),
        age_groups = data.demographics.age_groups.len(),
        genders = data.demographics.gender.len(),
        engagement_rate = ?data.engagement_rate,
        payload = data.payload.as_ref().map(ProviderPayload::key),
        "normalized proof payload"
    );

    data
}

/// Content id for per-content providers: the request's `video_id` when
/// given, else the provider's content parameter. Always `None` for
/// account-level providers.
pub fn content_id(provider: Provider, video_id: Option<&str>, params: &Params) -> Option<String> {
    let param = provider.content_id_param()?;
    video_id
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| param_text(params, param))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(v: Value) -> Params {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn payload_serializes_under_its_key() {
        let data = ExtractedData {
            payload: Some(ProviderPayload::PostMetrics(PostMetrics {
                views: 10.0,
                reach: 4.0,
                instagram_media_id: Some("m1".into()),
                error_message: None,
            })),
            ..ExtractedData::empty()
        };
        let v = serde_json::to_value(&data).unwrap();
        assert_eq!(v["post_metrics"]["instagramMediaId"], "m1");
        assert!(v["post_metrics"].get("errorMessage").is_none());
        assert!(v.get("video_metrics").is_none());
        assert!(v["engagement_rate"].is_null());
    }

    #[test]
    fn empty_payload_adds_no_keys() {
        let v = serde_json::to_value(ExtractedData::empty()).unwrap();
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn content_id_prefers_request_value() {
        let p = params(json!({"postId": "from-param", "content_id": "ig-param"}));
        assert_eq!(
            content_id(Provider::TiktokVideo, Some("req"), &p).as_deref(),
            Some("req")
        );
        assert_eq!(
            content_id(Provider::TiktokVideo, None, &p).as_deref(),
            Some("from-param")
        );
        assert_eq!(
            content_id(Provider::InstagramPost, Some(""), &p).as_deref(),
            Some("ig-param")
        );
        assert_eq!(content_id(Provider::TiktokAccount, Some("req"), &p), None);
        assert_eq!(content_id(Provider::InstagramPost, None, &Params::new()), None);
    }

    #[test]
    fn stored_metrics_by_payload() {
        let ig = ExtractedData {
            payload: Some(ProviderPayload::InstagramAccount(InstagramAccount {
                username: "ig".into(),
                follower_count: 1200,
                following_count: 10,
            })),
            ..ExtractedData::empty()
        };
        assert_eq!(
            ig.stored_metrics(),
            Some(json!({"username": "ig", "follower_count": 1200, "following_count": 10}))
        );
        assert_eq!(ig.follower_count(), Some(1200));

        let account = ExtractedData {
            payload: Some(ProviderPayload::AccountAnalytics(AccountAnalytics::default())),
            ..ExtractedData::empty()
        };
        assert_eq!(account.stored_metrics(), None);
        assert_eq!(account.follower_count(), None);
    }

    #[test]
    fn zero_followers_are_not_stored() {
        let ig = ExtractedData {
            payload: Some(ProviderPayload::InstagramAccount(InstagramAccount::default())),
            ..ExtractedData::empty()
        };
        assert_eq!(ig.follower_count(), None);
    }

    #[test]
    fn identity_resolution_order() {
        let account = ExtractedData {
            payload: Some(ProviderPayload::AccountAnalytics(AccountAnalytics {
                user_profile: Some(json!({"username": "profile-name", "userId": 7})),
                ..AccountAnalytics::default()
            })),
            ..ExtractedData::empty()
        };
        assert_eq!(account.username(&Params::new()).as_deref(), Some("profile-name"));
        assert_eq!(account.user_id(&Params::new()).as_deref(), Some("7"));

        let p = params(json!({"username": "param-name", "userId": "p1"}));
        assert_eq!(account.username(&p).as_deref(), Some("param-name"));
        assert_eq!(account.user_id(&p).as_deref(), Some("p1"));

        let profile = ExtractedData {
            payload: Some(ProviderPayload::TiktokUserProfile(TikTokUserProfile {
                user_id: String::new(),
                username: "tt".into(),
            })),
            ..ExtractedData::empty()
        };
        assert_eq!(profile.username(&Params::new()).as_deref(), Some("tt"));
        assert_eq!(profile.user_id(&Params::new()), None);
    }
}

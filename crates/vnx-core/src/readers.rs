//! # Provider Readers
//!
//! One reader per provider. Each takes the proof's public analytics blob
//! and/or claim parameters and produces an [`ExtractedData`] with the
//! payload variant that belongs to its provider. Readers never fail: an
//! absent or oddly shaped section simply contributes nothing.

use serde_json::{Map, Value};

use crate::demographics::{collect_any, collect_items, Category, Demographics};
use crate::engagement::engagement_rate;
use crate::extract::{
    AccountAnalytics, ExtractedData, InstagramAccount, PostMetrics, ProviderPayload,
    TikTokUserProfile, VideoMetrics,
};
use crate::probe::{as_number, number_at, param_text, parse_int_prefix, path};
use crate::proof::Params;

const ACCOUNT_LABEL_PROBES: &[&str] = &["label", "name"];
const ACCOUNT_VALUE_PROBES: &[&str] = &["value", "percentage"];
const VIDEO_COUNTRY_PROBES: &[&str] = &["countryCode", "country"];
const VIDEO_GROUP_PROBES: &[&str] = &["group", "label"];
const VIDEO_VALUE_PROBES: &[&str] = &["percentage", "value"];

fn items<'a>(value: Option<&'a Value>) -> &'a [Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// TikTok account-wide insights: follower demographics plus the overview
/// counters.
pub fn tiktok_account(public: &Map<String, Value>) -> ExtractedData {
    let mut demographics = Demographics::default();

    if let Some(follower_demo) = public
        .get("followers")
        .and_then(|f| path(f, &["demographics"]))
    {
        for (key, category) in [
            ("topCountries", Category::Country),
            ("age", Category::AgeGroup),
            ("gender", Category::Gender),
        ] {
            collect_items(
                demographics.bucket_mut(category),
                items(follower_demo.get(key)),
                ACCOUNT_LABEL_PROBES,
                ACCOUNT_VALUE_PROBES,
            );
        }
    }

    let (rate, avg_views) = match public.get("overview").filter(|o| o.is_object()) {
        Some(overview) => {
            let views = number_at(overview, "postViews");
            let counters = ["likes", "comments", "shares"].map(|k| number_at(overview, k));
            (engagement_rate(views, &counters), views)
        }
        None => (None, None),
    };

    let section = |key: &str| public.get(key).cloned();
    let analytics = AccountAnalytics {
        user_profile: section("userProfile"),
        overview: section("overview"),
        viewers: section("viewers"),
        followers: section("followers"),
        traffic_sources: section("trafficSources"),
        search_terms: section("searchTerms"),
        rewards: section("rewards"),
    };

    ExtractedData {
        demographics,
        engagement_rate: rate,
        avg_views,
        payload: Some(ProviderPayload::AccountAnalytics(analytics)),
    }
}

/// TikTok per-video analytics.
pub fn tiktok_video(public: &Map<String, Value>) -> ExtractedData {
    let mut demographics = Demographics::default();
    collect_items(
        &mut demographics.countries,
        items(public.get("geographicDemographics")),
        VIDEO_COUNTRY_PROBES,
        VIDEO_VALUE_PROBES,
    );
    collect_items(
        &mut demographics.age_groups,
        items(public.get("ageDemographics")),
        VIDEO_GROUP_PROBES,
        VIDEO_VALUE_PROBES,
    );
    collect_items(
        &mut demographics.gender,
        items(public.get("genderDemographics")),
        VIDEO_GROUP_PROBES,
        VIDEO_VALUE_PROBES,
    );

    let performance = public.get("performance").filter(|p| p.is_object());
    let perf = |key: &str| performance.and_then(|p| number_at(p, key));
    let viewers = |key: &str| public.get("viewers").and_then(|v| number_at(v, key));

    let metrics = VideoMetrics {
        views: perf("views"),
        likes: perf("likes"),
        comments: perf("comments"),
        shares: perf("shares"),
        saves: perf("saves"),
        completion_rate: perf("completionRate"),
        average_view_duration: perf("averageViewDurationSeconds"),
        video_duration: perf("videoDurationSeconds"),
        reach: viewers("reach"),
        new_viewers_percentage: viewers("newViewersPercentage"),
        followers_percentage: viewers("followersPercentage"),
        traffic_sources: public.get("trafficSources").cloned(),
    };

    let rate = engagement_rate(
        metrics.views,
        &[metrics.likes, metrics.comments, metrics.shares, metrics.saves],
    );
    let avg_views = performance.and(metrics.views);

    ExtractedData {
        demographics,
        engagement_rate: rate,
        avg_views,
        payload: Some(ProviderPayload::VideoMetrics(metrics)),
    }
}

/// TikTok Studio viewer demographics. Engagement is not part of this view.
pub fn tiktok_demographics(public: &Map<String, Value>, params: &Params) -> ExtractedData {
    let mut demographics = Demographics::default();
    for (key, category) in [
        ("countries", Category::Country),
        ("ages", Category::AgeGroup),
        ("genders", Category::Gender),
    ] {
        if let Some(source) = public.get(key) {
            collect_any(&mut demographics, category, source);
        }
    }

    let user_id = param_text(params, "userId");
    let username = param_text(params, "username");
    let payload = (user_id.is_some() || username.is_some()).then(|| {
        ProviderPayload::TiktokUserProfile(TikTokUserProfile {
            user_id: user_id.unwrap_or_default(),
            username: username.unwrap_or_default(),
        })
    });

    ExtractedData {
        demographics,
        payload,
        ..ExtractedData::empty()
    }
}

/// Instagram profile counters. Everything comes from the claim
/// parameters; the public blob is not consulted.
pub fn instagram_account(params: &Params) -> ExtractedData {
    let count = |key: &str| {
        param_text(params, key)
            .and_then(|s| parse_int_prefix(&s))
            .unwrap_or(0)
    };
    let account = InstagramAccount {
        username: param_text(params, "username").unwrap_or_default(),
        follower_count: count("follower_count"),
        following_count: count("following_count"),
    };

    ExtractedData {
        payload: Some(ProviderPayload::InstagramAccount(account)),
        ..ExtractedData::empty()
    }
}

/// Instagram per-post insights: views and reach, no engagement.
pub fn instagram_post(public: &Map<String, Value>) -> ExtractedData {
    let number = |key: &str| public.get(key).and_then(as_number).unwrap_or(0.0);
    let views = number("total_content_views_count");
    let reach = number("people_reach_based");

    let metrics = PostMetrics {
        views,
        reach,
        instagram_media_id: param_text(public, "instagram_media_id"),
        error_message: param_text(public, "error_message"),
    };

    ExtractedData {
        avg_views: Some(views),
        payload: Some(ProviderPayload::PostMetrics(metrics)),
        ..ExtractedData::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn account_reads_follower_demographics_and_overview() {
        let public = map(json!({
            "userProfile": {"username": "creator"},
            "overview": {"postViews": 1000, "likes": 50, "comments": 20, "shares": 10},
            "followers": {
                "demographics": {
                    "topCountries": [{"label": "US", "value": 60}, {"label": "CA", "value": 10}],
                    "age": [{"label": "18-24", "value": 45}],
                    "gender": [{"label": "female", "value": 70}]
                }
            },
            "searchTerms": ["a"]
        }));
        let data = tiktok_account(&public);
        assert_eq!(data.engagement_rate, Some(8.0));
        assert_eq!(data.avg_views, Some(1000.0));
        assert_eq!(data.demographics.countries["US"], 60.0);
        assert_eq!(data.demographics.age_groups["18-24"], 45.0);
        assert_eq!(data.demographics.gender["female"], 70.0);
        let analytics = data.account_analytics().unwrap();
        assert_eq!(analytics.search_terms, Some(json!(["a"])));
        assert!(analytics.rewards.is_none());
    }

    #[test]
    fn account_with_zero_views() {
        let public = map(json!({"overview": {"postViews": 0, "likes": 5}}));
        let data = tiktok_account(&public);
        assert_eq!(data.engagement_rate, None);
        assert_eq!(data.avg_views, Some(0.0));
    }

    #[test]
    fn account_without_overview() {
        let data = tiktok_account(&Map::new());
        assert_eq!(data.engagement_rate, None);
        assert_eq!(data.avg_views, None);
        assert!(data.demographics.is_empty());
        assert!(data.account_analytics().is_some());
    }

    #[test]
    fn video_reads_performance_and_viewers() {
        let public = map(json!({
            "performance": {
                "views": 2000, "likes": 100, "comments": 40, "shares": 30, "saves": 30,
                "completionRate": 0.42, "averageViewDurationSeconds": 12.5,
                "videoDurationSeconds": 31
            },
            "viewers": {"reach": 1800, "newViewersPercentage": 64, "followersPercentage": 36},
            "geographicDemographics": [{"countryCode": "US", "percentage": 50}],
            "ageDemographics": [{"group": "25-34", "percentage": 30}],
            "genderDemographics": [{"group": "male", "percentage": 55}],
            "trafficSources": [{"source": "fyp", "percentage": 80}]
        }));
        let data = tiktok_video(&public);
        assert_eq!(data.engagement_rate, Some(10.0));
        assert_eq!(data.avg_views, Some(2000.0));
        assert_eq!(data.demographics.countries["US"], 50.0);
        assert_eq!(data.demographics.age_groups["25-34"], 30.0);
        assert_eq!(data.demographics.gender["male"], 55.0);

        let m = data.video_metrics().unwrap();
        assert_eq!(m.average_view_duration, Some(12.5));
        assert_eq!(m.video_duration, Some(31.0));
        assert_eq!(m.reach, Some(1800.0));
        assert_eq!(m.followers_percentage, Some(36.0));
        assert!(m.traffic_sources.is_some());
    }

    #[test]
    fn video_without_performance() {
        let data = tiktok_video(&map(json!({"viewers": {"reach": 5}})));
        assert_eq!(data.engagement_rate, None);
        assert_eq!(data.avg_views, None);
        assert_eq!(data.video_metrics().unwrap().reach, Some(5.0));
    }

    #[test]
    fn demographics_provider_reads_every_shape() {
        let public = map(json!({
            "countries": [{"country": "US", "percentage": 25}, {"country_code": "BR", "value": "10"}],
            "ages": {"value": [{"age_group": "18-24", "percent": 35}]},
            "genders": {"male": 48, "female": "52"}
        }));
        let params = map(json!({"userId": "u-1"}));
        let data = tiktok_demographics(&public, &params);
        assert_eq!(data.demographics.countries["BR"], 10.0);
        assert_eq!(data.demographics.age_groups["18-24"], 35.0);
        assert_eq!(data.demographics.gender["female"], 52.0);
        assert_eq!(data.engagement_rate, None);
        assert_eq!(data.avg_views, None);
        let profile = data.tiktok_user_profile().unwrap();
        assert_eq!(profile.user_id, "u-1");
        assert_eq!(profile.username, "");
    }

    #[test]
    fn demographics_provider_without_identity_has_no_payload() {
        let data = tiktok_demographics(&Map::new(), &Params::new());
        assert!(data.payload.is_none());
    }

    #[test]
    fn instagram_account_from_params() {
        let params = map(json!({
            "username": "ig_creator",
            "follower_count": "12500",
            "following_count": 300
        }));
        let data = instagram_account(&params);
        let account = data.instagram_account().unwrap();
        assert_eq!(account.username, "ig_creator");
        assert_eq!(account.follower_count, 12500);
        assert_eq!(account.following_count, 300);
        assert!(data.demographics.is_empty());
        assert_eq!(data.avg_views, None);
    }

    #[test]
    fn instagram_account_defaults_counts_to_zero() {
        let params = map(json!({"follower_count": "lots"}));
        let account = instagram_account(&params).instagram_account().cloned().unwrap();
        assert_eq!(account, InstagramAccount::default());
    }

    #[test]
    fn instagram_post_views_and_reach() {
        let public = map(json!({
            "total_content_views_count": 4200,
            "people_reach_based": "3900",
            "instagram_media_id": 17890012
        }));
        let data = instagram_post(&public);
        assert_eq!(data.avg_views, Some(4200.0));
        assert_eq!(data.engagement_rate, None);
        let m = data.post_metrics().unwrap();
        assert_eq!(m.reach, 3900.0);
        assert_eq!(m.instagram_media_id.as_deref(), Some("17890012"));
        assert_eq!(m.error_message, None);
    }

    #[test]
    fn instagram_post_defaults_to_zero() {
        let data = instagram_post(&Map::new());
        assert_eq!(data.avg_views, Some(0.0));
        assert_eq!(data.post_metrics().unwrap().reach, 0.0);
    }
}

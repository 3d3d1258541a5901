//! Entities exchanged with the dashboard backend
//!
//! These mirror the JSON bodies of the `/api` endpoints. The backend owns every
//! entity; the client only keeps read-through copies of them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::provider::{LlmProvider, MessageType};

/// Connection states the backend assigns to a target, in outreach order.
pub const CONNECTION_STATUSES: [&str; 4] = ["not_connected", "pending", "connected", "messaged"];

/// The status that follows `current` in [`CONNECTION_STATUSES`], wrapping around.
/// Unknown statuses restart the cycle.
pub fn next_connection_status(current: &str) -> &'static str {
    match CONNECTION_STATUSES.iter().position(|s| *s == current) {
        Some(i) => CONNECTION_STATUSES[(i + 1) % CONNECTION_STATUSES.len()],
        None => CONNECTION_STATUSES[0],
    }
}

/// A prospective contact tracked for outreach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub title: String,
    pub company: String,
    pub linkedin_url: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_summary: Option<String>,
    #[serde(default)]
    pub recent_activity: Option<String>,
    #[serde(default = "default_connection_status")]
    pub connection_status: String,
}

fn default_connection_status() -> String {
    CONNECTION_STATUSES[0].to_string()
}

/// An AI-generated outreach text for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub target_id: String,
    pub message_type: String,
    pub content: String,
    pub status: String,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub replied_at: Option<DateTime<Utc>>,
}

/// An AI-generated public post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub based_on_viral_posts: Vec<String>,
    pub status: String,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

/// A high-engagement post used as source material for post generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViralPost {
    pub id: String,
    pub original_content: String,
    pub author: String,
    #[serde(default)]
    pub engagement_score: i64,
    #[serde(default)]
    pub reactions: i64,
    #[serde(default)]
    pub comments: i64,
    #[serde(default)]
    pub shares: i64,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub scraped_at: Option<DateTime<Utc>>,
}

/// Aggregate outreach metrics, recomputed by the backend on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_targets: u64,
    pub connections_sent: u64,
    #[serde(default)]
    pub connections_accepted: u64,
    #[serde(default)]
    pub messages_sent: u64,
    #[serde(default)]
    pub messages_replied: u64,
    pub acceptance_rate: f64,
    pub reply_rate: f64,
    #[serde(default)]
    pub daily_activity: BTreeMap<String, u64>,
}

/// Unsaved input for a new target. Every field is free text until submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTargetDraft {
    pub name: String,
    pub title: String,
    pub company: String,
    pub linkedin_url: String,
    pub email: String,
    pub phone: String,
    pub profile_summary: String,
    pub recent_activity: String,
}

/// The editable fields of a [`NewTargetDraft`], in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftField {
    #[default]
    Name,
    Title,
    Company,
    LinkedinUrl,
    Email,
    Phone,
    ProfileSummary,
    RecentActivity,
}

impl DraftField {
    pub fn all() -> [DraftField; 8] {
        [
            DraftField::Name,
            DraftField::Title,
            DraftField::Company,
            DraftField::LinkedinUrl,
            DraftField::Email,
            DraftField::Phone,
            DraftField::ProfileSummary,
            DraftField::RecentActivity,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Name => "Name",
            DraftField::Title => "Title",
            DraftField::Company => "Company",
            DraftField::LinkedinUrl => "LinkedIn URL",
            DraftField::Email => "Email",
            DraftField::Phone => "Phone",
            DraftField::ProfileSummary => "Profile Summary",
            DraftField::RecentActivity => "Recent Activity",
        }
    }

    fn index(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

impl NewTargetDraft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Title => &self.title,
            DraftField::Company => &self.company,
            DraftField::LinkedinUrl => &self.linkedin_url,
            DraftField::Email => &self.email,
            DraftField::Phone => &self.phone,
            DraftField::ProfileSummary => &self.profile_summary,
            DraftField::RecentActivity => &self.recent_activity,
        }
    }

    pub fn set(&mut self, field: DraftField, value: String) {
        let slot = match field {
            DraftField::Name => &mut self.name,
            DraftField::Title => &mut self.title,
            DraftField::Company => &mut self.company,
            DraftField::LinkedinUrl => &mut self.linkedin_url,
            DraftField::Email => &mut self.email,
            DraftField::Phone => &mut self.phone,
            DraftField::ProfileSummary => &mut self.profile_summary,
            DraftField::RecentActivity => &mut self.recent_activity,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parameters for the next message generation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGenerationConfig {
    pub target_id: String,
    pub message_type: MessageType,
    pub llm_provider: LlmProvider,
}

/// Target profile fields sent along with a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub name: String,
    pub title: String,
    pub company: String,
    pub profile_summary: Option<String>,
    pub recent_activity: Option<String>,
}

impl From<&Target> for ProfileData {
    fn from(t: &Target) -> Self {
        Self {
            name: t.name.clone(),
            title: t.title.clone(),
            company: t.company.clone(),
            profile_summary: t.profile_summary.clone(),
            recent_activity: t.recent_activity.clone(),
        }
    }
}

/// Body of `POST /messages/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateMessageRequest {
    pub target_id: String,
    pub profile_data: ProfileData,
    pub message_type: MessageType,
    pub llm_provider: LlmProvider,
}

/// Body of `PUT /targets/{id}` when only the connection state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStatusUpdate {
    pub connection_status: String,
}

/// Health of one AI provider as reported by `/test/{provider}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub status: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Accept RFC 3339 or an offset-less ISO date-time, which the backend emits for UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_target_with_null_optionals() {
        let json = r#"{
            "id": "t1",
            "name": "Alice",
            "title": "CTO",
            "company": "Acme",
            "linkedin_url": "https://linkedin.com/in/alice",
            "email": null,
            "phone": null,
            "location": "India",
            "profile_summary": "Builds things",
            "recent_activity": null,
            "connection_status": "pending",
            "created_at": "2024-05-01T10:00:00"
        }"#;
        let target: Target = serde_json::from_str(json).unwrap();
        assert_eq!(target.id, "t1");
        assert_eq!(target.email, None);
        assert_eq!(target.location.as_deref(), Some("India"));
        assert_eq!(target.connection_status, "pending");
    }

    #[test]
    fn test_target_without_status_defaults_to_not_connected() {
        let json = r#"{"id":"t2","name":"Bob","title":"Eng","company":"X","linkedin_url":""}"#;
        let target: Target = serde_json::from_str(json).unwrap();
        assert_eq!(target.connection_status, "not_connected");
    }

    #[test]
    fn test_message_accepts_naive_timestamp() {
        let json = r#"{
            "id": "m1",
            "target_id": "t1",
            "message_type": "connection_request",
            "content": "Hi Alice",
            "status": "draft",
            "created_at": "2024-05-01T10:30:15.123456",
            "sent_at": null
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.created_at.date_naive().to_string(), "2024-05-01");
        assert_eq!(message.sent_at, None);
        assert_eq!(message.replied_at, None);
    }

    #[test]
    fn test_generated_post_accepts_rfc3339_timestamp() {
        let json = r#"{
            "id": "p1",
            "content": "AI is eating the world",
            "based_on_viral_posts": ["v1", "v2"],
            "status": "approved",
            "created_at": "2024-05-01T10:30:00+02:00"
        }"#;
        let post: GeneratedPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());
        assert_eq!(post.based_on_viral_posts.len(), 2);
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let json = r#"{"id":"p1","content":"x","status":"draft","created_at":"yesterday"}"#;
        assert!(serde_json::from_str::<GeneratedPost>(json).is_err());
    }

    #[test]
    fn test_analytics_daily_activity() {
        let json = r#"{
            "total_targets": 12,
            "connections_sent": 3,
            "connections_accepted": 2,
            "messages_sent": 4,
            "messages_replied": 1,
            "acceptance_rate": 66.67,
            "reply_rate": 25.0,
            "daily_activity": {"2024-05-02": 3, "2024-05-01": 0}
        }"#;
        let analytics: Analytics = serde_json::from_str(json).unwrap();
        assert_eq!(analytics.total_targets, 12);
        assert_eq!(analytics.daily_activity.get("2024-05-02"), Some(&3));
        let dates: Vec<&String> = analytics.daily_activity.keys().collect();
        assert_eq!(dates, vec!["2024-05-01", "2024-05-02"]);
    }

    #[test]
    fn test_draft_field_access_and_reset_shape() {
        let mut draft = NewTargetDraft::default();
        assert!(draft.is_empty());
        draft.set(DraftField::LinkedinUrl, "https://linkedin.com/in/x".to_string());
        assert_eq!(draft.get(DraftField::LinkedinUrl), "https://linkedin.com/in/x");
        assert_eq!(draft.linkedin_url, "https://linkedin.com/in/x");
        assert!(!draft.is_empty());
    }

    #[test]
    fn test_draft_serializes_every_field() {
        let draft = NewTargetDraft {
            name: "Alice".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["email"], "");
        assert_eq!(value.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_draft_field_cycle_wraps() {
        assert_eq!(DraftField::Name.prev(), DraftField::RecentActivity);
        assert_eq!(DraftField::RecentActivity.next(), DraftField::Name);
        assert_eq!(DraftField::Company.next(), DraftField::LinkedinUrl);
    }

    #[test]
    fn test_generate_request_wire_shape() {
        let request = GenerateMessageRequest {
            target_id: "t1".to_string(),
            profile_data: ProfileData {
                name: "Alice".to_string(),
                title: "CTO".to_string(),
                company: "Acme".to_string(),
                profile_summary: None,
                recent_activity: Some("Posted about Rust".to_string()),
            },
            message_type: MessageType::FollowUp,
            llm_provider: LlmProvider::Ollama,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["target_id"], "t1");
        assert_eq!(value["profile_data"]["name"], "Alice");
        assert!(value["profile_data"]["profile_summary"].is_null());
        assert_eq!(value["message_type"], "follow_up");
        assert_eq!(value["llm_provider"], "ollama");
    }

    #[test]
    fn test_next_connection_status() {
        assert_eq!(next_connection_status("not_connected"), "pending");
        assert_eq!(next_connection_status("messaged"), "not_connected");
        assert_eq!(next_connection_status("archived"), "not_connected");
    }
}

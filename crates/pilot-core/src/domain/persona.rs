use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Tone assigned to freshly created personas.
pub const DEFAULT_TONE: &str = "Professional yet Friendly";

/// Persona entity - a named voice profile attributed to generated posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub display_name: String,
    pub profile_picture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zodiac: Option<String>,
    /// Birthday as an ISO date (`1992-08-15`) or RFC 3339 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    pub tone: String,
}

impl Persona {
    /// Create a placeholder persona with a generated avatar.
    pub fn placeholder(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            profile_picture: format!("https://picsum.photos/seed/{id}/200/200"),
            id,
            display_name: "New Persona".to_string(),
            mbti: None,
            zodiac: None,
            birthday: None,
            tone: DEFAULT_TONE.to_string(),
        }
    }

    /// The built-in persona used whenever no saved persona exists.
    pub fn builtin() -> Self {
        Self {
            id: "p1".to_string(),
            display_name: "Jane Cooper".to_string(),
            profile_picture: "https://picsum.photos/id/64/200/200".to_string(),
            mbti: Some("ENFJ".to_string()),
            zodiac: Some("Leo".to_string()),
            birthday: Some("1992-08-15".to_string()),
            tone: DEFAULT_TONE.to_string(),
        }
    }

    /// Apply a partial update. Absent fields are left untouched.
    pub fn apply(&mut self, patch: PersonaPatch) {
        if let Some(display_name) = patch.display_name {
            self.display_name = display_name;
        }
        if let Some(profile_picture) = patch.profile_picture {
            self.profile_picture = profile_picture;
        }
        if let Some(mbti) = patch.mbti {
            self.mbti = Some(mbti);
        }
        if let Some(zodiac) = patch.zodiac {
            self.zodiac = Some(zodiac);
        }
        if let Some(birthday) = patch.birthday {
            self.birthday = Some(birthday);
        }
        if let Some(tone) = patch.tone {
            self.tone = tone;
        }
    }

    /// Age in years as of `now`, or `None` without a parseable birthday.
    pub fn age(&self, now: DateTime<Utc>) -> Option<i32> {
        self.birthday.as_deref().and_then(|b| derived_age(b, now))
    }
}

/// Partial persona update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaPatch {
    pub display_name: Option<String>,
    pub profile_picture: Option<String>,
    pub mbti: Option<String>,
    pub zodiac: Option<String>,
    pub birthday: Option<String>,
    pub tone: Option<String>,
}

/// Coarse age: the elapsed time since the birthday is read as an instant
/// after the epoch and its year is compared with 1970. Not calendar-exact.
pub fn derived_age(birthday: &str, now: DateTime<Utc>) -> Option<i32> {
    let born = parse_birthday(birthday)?;
    let elapsed_ms = now.timestamp_millis() - born.timestamp_millis();
    let as_date = DateTime::<Utc>::from_timestamp_millis(elapsed_ms)?;
    Some((as_date.year() - 1970).abs())
}

fn parse_birthday(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

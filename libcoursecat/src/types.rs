//! Core types for Coursecat

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoursecatError;

/// A catalog entry. Courses are created only when the dataset is loaded and
/// are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: CourseStatus,
    pub level: CourseLevel,
    pub duration: String,
    pub lessons: u32,
    pub rating: f32,
    pub students: u32,
    pub thumbnail: String,
}

impl Course {
    /// Case-insensitive substring match against title, description or category
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
            || self.category.to_lowercase().contains(needle_lower)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseStatus {
    Popular,
    Trending,
    New,
    Other,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Trending => "trending",
            Self::New => "new",
            Self::Other => "other",
        }
    }
}

impl From<String> for CourseStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "popular" => Self::Popular,
            "trending" => Self::Trending,
            "new" => Self::New,
            _ => Self::Other,
        }
    }
}

impl From<CourseStatus> for String {
    fn from(value: CourseStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    Other,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Other => "other",
        }
    }
}

impl From<String> for CourseLevel {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Other,
        }
    }
}

impl From<CourseLevel> for String {
    fn from(value: CourseLevel) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Colour scheme of the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other mode
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = CoursecatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(CoursecatError::InvalidInput(format!(
                "Invalid theme mode: '{}'. Valid options: light, dark",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Authentication domain as it is stored and persisted.
///
/// The serialized form is `{"isAuthenticated":..,"user":..,"token":..}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
}

impl AuthSession {
    pub fn authenticated(user: User, token: String) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            token: Some(token),
        }
    }

    /// An authenticated session must carry both a user and a token.
    pub fn is_consistent(&self) -> bool {
        !self.is_authenticated || (self.user.is_some() && self.token.is_some())
    }
}

/// Locally recorded account from the demo registration flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course_json() -> &'static str {
        r#"{
            "id": 3,
            "title": "Intro to Go",
            "description": "Learn Go basics",
            "category": "Programming",
            "status": "Popular",
            "level": "BEGINNER",
            "duration": "6h 30m",
            "lessons": 24,
            "rating": 4.7,
            "students": 15200,
            "thumbnail": "https://example.com/go.png"
        }"#
    }

    #[test]
    fn test_course_decodes_enums_case_insensitively() {
        let course: Course = serde_json::from_str(sample_course_json()).unwrap();
        assert_eq!(course.status, CourseStatus::Popular);
        assert_eq!(course.level, CourseLevel::Beginner);
        assert_eq!(course.lessons, 24);
    }

    #[test]
    fn test_unknown_status_and_level_become_other() {
        let json = sample_course_json()
            .replace("\"Popular\"", "\"Bestseller\"")
            .replace("\"BEGINNER\"", "\"Expert\"");
        let course: Course = serde_json::from_str(&json).unwrap();
        assert_eq!(course.status, CourseStatus::Other);
        assert_eq!(course.level, CourseLevel::Other);
    }

    #[test]
    fn test_course_matches_title_description_category() {
        let course: Course = serde_json::from_str(sample_course_json()).unwrap();
        assert!(course.matches("go"));
        assert!(course.matches("basics"));
        assert!(course.matches("programming"));
        assert!(!course.matches("rust"));
    }

    #[test]
    fn test_theme_mode_from_str() {
        assert_eq!("light".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
        assert_eq!("Dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);

        let err = "sepia".parse::<ThemeMode>().unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("sepia"));
    }

    #[test]
    fn test_theme_mode_flipped_is_involution() {
        assert_eq!(ThemeMode::Light.flipped(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Light.flipped().flipped(), ThemeMode::Light);
    }

    #[test]
    fn test_auth_session_serializes_camel_case() {
        let session = AuthSession::authenticated(
            User {
                id: 1,
                name: "ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            "dummy-token-1".to_string(),
        );

        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(
            json,
            r#"{"isAuthenticated":true,"user":{"id":1,"name":"ada","email":"ada@example.com"},"token":"dummy-token-1"}"#
        );
    }

    #[test]
    fn test_default_auth_session_is_signed_out() {
        let session = AuthSession::default();
        assert!(!session.is_authenticated);
        assert!(session.is_consistent());
        assert_eq!(
            serde_json::to_string(&session).unwrap(),
            r#"{"isAuthenticated":false,"user":null,"token":null}"#
        );
    }

    #[test]
    fn test_inconsistent_session_detected() {
        let session = AuthSession {
            is_authenticated: true,
            user: None,
            token: Some("t".to_string()),
        };
        assert!(!session.is_consistent());
    }
}

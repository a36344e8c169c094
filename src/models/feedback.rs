//! Visitor feedback (write-only)

use crate::error::{validation_error, AppError};
use crate::models::trimmed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Validate)]
pub struct NewFeedback {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    pub email: String,
    #[validate(length(max = 1000, message = "Message must be at most 1000 characters"))]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl FeedbackRequest {
    pub fn into_feedback(self) -> Result<NewFeedback, AppError> {
        let (Some(name), Some(email), Some(message)) =
            (trimmed(self.name), trimmed(self.email), trimmed(self.message))
        else {
            return Err(validation_error("Name, email, and message are required"));
        };

        let feedback = NewFeedback {
            name,
            email: email.to_lowercase(),
            message,
        };
        feedback.validate()?;
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_is_trimmed_and_lowercased() {
        let feedback = FeedbackRequest {
            name: Some(" Vee ".into()),
            email: Some("  Vee@Example.COM ".into()),
            message: Some(" Lovely shelter ".into()),
        }
        .into_feedback()
        .unwrap();
        assert_eq!(feedback.name, "Vee");
        assert_eq!(feedback.email, "vee@example.com");
        assert_eq!(feedback.message, "Lovely shelter");
    }

    #[test]
    fn test_feedback_limits() {
        let missing = FeedbackRequest {
            name: Some("Vee".into()),
            email: None,
            message: Some("hi".into()),
        };
        assert!(missing.into_feedback().is_err());

        let long = FeedbackRequest {
            name: Some("Vee".into()),
            email: Some("v@x.com".into()),
            message: Some("x".repeat(1001)),
        };
        assert!(matches!(long.into_feedback(), Err(AppError::Validation(_))));
    }
}

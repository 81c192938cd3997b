use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    pub question_type: QuestionType,
    pub image_id: String, // Created together with the question, never shared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    OpenEnded,
}

impl Question {
    pub fn new(quiz_id: &str, text: &str, question_type: QuestionType, image_id: &str) -> Self {
        let now = Utc::now();
        Question {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            text: text.to_string(),
            question_type,
            image_id: image_id.to_string(),
            created_at: Some(now),
            modified_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_uses_screaming_case() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"MULTIPLE_CHOICE\"");

        let parsed: QuestionType = serde_json::from_str("\"TRUE_FALSE\"").unwrap();
        assert_eq!(parsed, QuestionType::TrueFalse);
    }

    #[test]
    fn question_type_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<QuestionType>("\"ESSAY\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn new_question_links_quiz_and_image() {
        let question = Question::new("quiz-1", "What is ownership?", QuestionType::MultipleChoice, "image-1");

        assert_eq!(question.quiz_id, "quiz-1");
        assert_eq!(question.image_id, "image-1");
        assert_ne!(question.id, question.image_id);
    }
}

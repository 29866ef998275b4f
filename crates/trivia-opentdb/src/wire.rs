//! Response bodies of the Open Trivia Database API.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use trivia_core::model::{Category, CategoryCount, CategoryId, Difficulty, QuestionCount, QuestionKind};
use trivia_core::remote::RemoteQuestion;

use crate::error::OpenTdbError;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub response_code: u8,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionsResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<EncodedQuestion>,
}

/// A question with every string field base64-encoded.
#[derive(Debug, Deserialize)]
pub(crate) struct EncodedQuestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryListResponse {
    pub trivia_categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryEntry {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GlobalCountResponse {
    pub categories: HashMap<String, GlobalCategoryCount>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GlobalCategoryCount {
    pub total_num_of_verified_questions: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryCountResponse {
    pub category_question_count: CategoryQuestionCount,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
pub(crate) struct CategoryQuestionCount {
    pub total_question_count: u32,
    pub total_easy_question_count: u32,
    pub total_medium_question_count: u32,
    pub total_hard_question_count: u32,
}

impl From<CategoryQuestionCount> for QuestionCount {
    fn from(count: CategoryQuestionCount) -> Self {
        QuestionCount {
            total: count.total_question_count,
            easy: count.total_easy_question_count,
            medium: count.total_medium_question_count,
            hard: count.total_hard_question_count,
        }
    }
}

fn decode(field: &'static str, value: &str) -> Result<String, OpenTdbError> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|source| OpenTdbError::Base64 { field, source })?;
    String::from_utf8(bytes).map_err(|_| OpenTdbError::Utf8 { field })
}

impl EncodedQuestion {
    pub(crate) fn decode(self) -> Result<RemoteQuestion, OpenTdbError> {
        let difficulty = decode("difficulty", &self.difficulty)?;
        let difficulty: Difficulty = difficulty.parse().map_err(|_| OpenTdbError::UnknownValue {
            field: "difficulty",
            value: difficulty,
        })?;
        let kind = match decode("type", &self.kind)?.as_str() {
            "multiple" => QuestionKind::Multiple,
            "boolean" => QuestionKind::Boolean,
            other => {
                return Err(OpenTdbError::UnknownValue {
                    field: "type",
                    value: other.to_owned(),
                });
            }
        };
        Ok(RemoteQuestion {
            category: decode("category", &self.category)?,
            difficulty,
            kind,
            text: decode("question", &self.question)?,
            correct_answer: decode("correct_answer", &self.correct_answer)?,
            incorrect_answers: self
                .incorrect_answers
                .iter()
                .map(|answer| decode("incorrect_answers", answer))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Joins the category list with the global counts. Categories without a
/// count entry get a total of 0.
pub(crate) fn join_counts(list: CategoryListResponse, global: &GlobalCountResponse) -> Vec<CategoryCount> {
    list.trivia_categories
        .into_iter()
        .map(|entry| {
            let total = global
                .categories
                .get(&entry.id.to_string())
                .map_or(0, |c| c.total_num_of_verified_questions);
            CategoryCount {
                category: Category::new(entry.id, entry.name),
                count: QuestionCount::provisional(total),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &str) -> String {
        STANDARD.encode(value)
    }

    #[test]
    fn test_encoded_question_decodes_every_field() {
        // Arrange
        let body = serde_json::json!({
            "response_code": 0,
            "results": [{
                "type": encode("multiple"),
                "difficulty": encode("hard"),
                "category": encode("Entertainment: Books"),
                "question": encode("Who wrote \"Dune\"?"),
                "correct_answer": encode("Frank Herbert"),
                "incorrect_answers": [encode("Isaac Asimov"), encode("Ursula K. Le Guin"), encode("Arthur C. Clarke")]
            }]
        });

        // Act
        let response: QuestionsResponse = serde_json::from_value(body).unwrap();
        let question = response.results.into_iter().next().unwrap().decode().unwrap();

        // Assert
        assert_eq!(question.kind, QuestionKind::Multiple);
        assert_eq!(question.difficulty, Difficulty::Hard);
        assert_eq!(question.category, "Entertainment: Books");
        assert_eq!(question.text, "Who wrote \"Dune\"?");
        assert_eq!(question.incorrect_answers.len(), 3);
    }

    #[test]
    fn test_decode_rejects_bad_base64_and_unknown_values() {
        let bad_base64 = EncodedQuestion {
            kind: "***".into(),
            difficulty: encode("easy"),
            category: encode("Film"),
            question: encode("Q"),
            correct_answer: encode("A"),
            incorrect_answers: vec![],
        };
        let unknown_kind = EncodedQuestion {
            kind: encode("essay"),
            difficulty: encode("easy"),
            category: encode("Film"),
            question: encode("Q"),
            correct_answer: encode("A"),
            incorrect_answers: vec![],
        };

        assert!(matches!(
            bad_base64.decode(),
            Err(OpenTdbError::Base64 { field: "type", .. })
        ));
        assert!(matches!(
            unknown_kind.decode(),
            Err(OpenTdbError::UnknownValue { field: "type", .. })
        ));
    }

    #[test]
    fn test_failed_responses_parse_without_payload() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"response_code":5,"response_message":"Rate limit"}"#).unwrap();
        let questions: QuestionsResponse = serde_json::from_str(r#"{"response_code":1}"#).unwrap();

        assert_eq!(token.response_code, 5);
        assert!(token.token.is_empty());
        assert!(questions.results.is_empty());
    }

    #[test]
    fn test_join_counts_uses_verified_totals() {
        // Arrange
        let list: CategoryListResponse = serde_json::from_str(
            r#"{"trivia_categories":[{"id":9,"name":"General Knowledge"},{"id":10,"name":"Entertainment: Books"}]}"#,
        )
        .unwrap();
        let global: GlobalCountResponse = serde_json::from_str(
            r#"{"overall":{"total_num_of_questions":10},"categories":{"9":{"total_num_of_questions":330,"total_num_of_pending_questions":20,"total_num_of_verified_questions":310,"total_num_of_rejected_questions":0}}}"#,
        )
        .unwrap();

        // Act
        let counts = join_counts(list, &global);

        // Assert
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].count, QuestionCount::provisional(310));
        assert!(!counts[0].count.is_authoritative());
        assert_eq!(counts[1].count.total, 0);
    }

    #[test]
    fn test_category_count_maps_breakdown() {
        let response: CategoryCountResponse = serde_json::from_str(
            r#"{"category_id":9,"category_question_count":{"total_question_count":12,"total_easy_question_count":5,"total_medium_question_count":3,"total_hard_question_count":4}}"#,
        )
        .unwrap();

        let count = QuestionCount::from(response.category_question_count);

        assert_eq!(count, QuestionCount::from_breakdown(5, 3, 4));
    }
}

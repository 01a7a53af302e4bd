use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};

pub const QUESTIONS_JSON_FIELD: &str = "questions_json";

/// One parsed answer, waiting for the teacher to confirm the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnswerDraft {
    #[validate(length(min = 1, message = "answer text must not be empty"))]
    pub answer_text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// A question parsed from one spreadsheet row. Never stored until confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestionDraft {
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: String,
    #[validate(length(min = 1, message = "at least one answer is required"), nested)]
    pub answers: Vec<AnswerDraft>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreQuestionsForm {
    pub questions_json: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UploadFormQuery {
    pub status: Option<String>,
}

/// Encodes drafts for the hidden `questions_json` field of the preview page.
pub fn encode_drafts(drafts: &[QuestionDraft]) -> Result<String> {
    Ok(serde_json::to_string(drafts)?)
}

/// Decodes a resubmitted `questions_json` payload. Anything that is not a list of
/// well-formed drafts is rejected as a whole so nothing gets written.
pub fn decode_drafts(raw: &str) -> Result<Vec<QuestionDraft>> {
    let drafts: Vec<QuestionDraft> = serde_json::from_str(raw).map_err(|e| {
        Error::field(
            QUESTIONS_JSON_FIELD,
            format!("The questions json field must be a valid list of questions: {}", e),
        )
    })?;

    for (idx, draft) in drafts.iter().enumerate() {
        draft.validate().map_err(|e| {
            Error::field(
                QUESTIONS_JSON_FIELD,
                format!("Question #{} is invalid: {}", idx + 1, e),
            )
        })?;
    }

    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<QuestionDraft> {
        vec![
            QuestionDraft {
                question_text: "What is 2+2?".into(),
                question_type: "mcq".into(),
                answers: vec![
                    AnswerDraft {
                        answer_text: "3".into(),
                        is_correct: false,
                    },
                    AnswerDraft {
                        answer_text: "4".into(),
                        is_correct: true,
                    },
                ],
            },
            QuestionDraft {
                question_text: "Capital of France? \"Paris\" <b>".into(),
                question_type: "".into(),
                answers: vec![AnswerDraft {
                    answer_text: "Paris & more".into(),
                    is_correct: true,
                }],
            },
        ]
    }

    #[test]
    fn payload_survives_the_client_round_trip() {
        let drafts = sample();
        let encoded = encode_drafts(&drafts).unwrap();
        assert_eq!(decode_drafts(&encoded).unwrap(), drafts);
    }

    #[test]
    fn payload_uses_snake_case_keys_and_type() {
        let encoded = encode_drafts(&sample()[..1]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value[0]["question_text"], "What is 2+2?");
        assert_eq!(value[0]["type"], "mcq");
        assert_eq!(value[0]["answers"][1]["answer_text"], "4");
        assert_eq!(value[0]["answers"][1]["is_correct"], true);
    }

    #[test]
    fn missing_is_correct_defaults_to_false() {
        let raw = r#"[{"question_text":"Q","type":"mcq","answers":[{"answer_text":"A"}]}]"#;
        let drafts = decode_drafts(raw).unwrap();
        assert!(!drafts[0].answers[0].is_correct);
    }

    #[test]
    fn invalid_json_is_a_field_error() {
        match decode_drafts("not json") {
            Err(Error::Field { field, .. }) => assert_eq!(field, QUESTIONS_JSON_FIELD),
            other => panic!("expected field error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_shape_is_a_field_error() {
        let raw = r#"{"question_text":"Q"}"#;
        assert!(matches!(decode_drafts(raw), Err(Error::Field { .. })));
    }

    #[test]
    fn drafts_violating_invariants_are_rejected() {
        let no_answers = r#"[{"question_text":"Q","type":"mcq","answers":[]}]"#;
        assert!(matches!(decode_drafts(no_answers), Err(Error::Field { .. })));

        let empty_text = r#"[{"question_text":"","type":"mcq","answers":[{"answer_text":"A","is_correct":true}]}]"#;
        assert!(matches!(decode_drafts(empty_text), Err(Error::Field { .. })));

        let empty_answer = r#"[{"question_text":"Q","type":"mcq","answers":[{"answer_text":"","is_correct":true}]}]"#;
        let err = decode_drafts(empty_answer).unwrap_err();
        assert!(err.to_string().contains("Question #1"));
    }

    #[test]
    fn empty_list_is_accepted() {
        assert!(decode_drafts("[]").unwrap().is_empty());
    }
}

use maud::{html, Markup};

use crate::dto::question_dto::{QuestionDraft, QUESTIONS_JSON_FIELD};
use crate::routes::questions::{
    EXCEL_FILE_FIELD, PREVIEW_PATH, STORE_PATH, TEMPLATE_PATH, UPLOAD_PATH,
};

use super::page;

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Questions uploaded successfully!";

pub fn upload_form(success: bool) -> Markup {
    page(
        "Upload Questions",
        html! {
            h1 { "Upload Questions Excel" }

            @if success {
                div class="notice success" role="status" { (UPLOAD_SUCCESS_MESSAGE) }
            }

            form action=(PREVIEW_PATH) method="post" enctype="multipart/form-data" {
                p {
                    label for=(EXCEL_FILE_FIELD) { "Spreadsheet (.xlsx or .xls)" }
                }
                p {
                    input type="file" name=(EXCEL_FILE_FIELD) id=(EXCEL_FILE_FIELD) accept=".xlsx,.xls" required;
                }
                p {
                    a href=(TEMPLATE_PATH) { "Download sample Excel template" }
                }
                button type="submit" { "Preview Questions" }
            }
        },
    )
}

fn question_row(question: &QuestionDraft) -> Markup {
    html! {
        tr {
            td { (question.question_text) }
            td { span class="badge" { (question.question_type) } }
            td {
                ul {
                    @for answer in &question.answers {
                        @if answer.is_correct {
                            li class="correct" { (answer.answer_text) " (correct)" }
                        } @else {
                            li { (answer.answer_text) }
                        }
                    }
                }
            }
        }
    }
}

/// Preview table plus the confirm form. The drafts travel back to the server
/// only through the hidden `questions_json` field.
pub fn preview(questions: &[QuestionDraft], payload: &str, skipped_rows: &[usize]) -> Markup {
    page(
        "Preview Questions",
        html! {
            h1 { "Preview Questions Before Upload" }

            @if !skipped_rows.is_empty() {
                div class="notice warning" role="status" {
                    (skipped_rows.len()) " row(s) were skipped because they had no question text or no answers: rows "
                    (skipped_rows.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", "))
                }
            }

            form action=(STORE_PATH) method="post" {
                table {
                    thead {
                        tr {
                            th { "Question Text" }
                            th { "Type" }
                            th { "Answers" }
                        }
                    }
                    tbody {
                        @for question in questions {
                            (question_row(question))
                        }
                    }
                }

                input type="hidden" name=(QUESTIONS_JSON_FIELD) value=(payload);

                p {
                    button type="submit" { "Confirm and Upload Questions" }
                    " "
                    a href=(UPLOAD_PATH) { "Cancel" }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::question_dto::AnswerDraft;

    #[test]
    fn upload_form_shows_acknowledgment_only_after_store() {
        assert!(upload_form(true).into_string().contains(UPLOAD_SUCCESS_MESSAGE));
        assert!(!upload_form(false).into_string().contains(UPLOAD_SUCCESS_MESSAGE));
    }

    #[test]
    fn preview_escapes_question_content() {
        let questions = vec![QuestionDraft {
            question_text: "<script>alert(1)</script>".into(),
            question_type: "mcq".into(),
            answers: vec![AnswerDraft {
                answer_text: "ok".into(),
                is_correct: true,
            }],
        }];
        let html = preview(&questions, r#"[{"a":"<b>"}]"#, &[]).into_string();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("ok (correct)"));
        assert!(!html.contains("skipped"));
    }

    #[test]
    fn preview_lists_skipped_rows() {
        let html = preview(&[], "[]", &[3, 7]).into_string();
        assert!(html.contains("2 row(s) were skipped"));
        assert!(html.contains("rows 3, 7"));
    }
}

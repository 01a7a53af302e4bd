use crate::dto::question_dto::{AnswerDraft, QuestionDraft};

/// Tokens in a correctness cell that mark an answer as correct.
const TRUTHY_TOKENS: [&str; 3] = ["true", "1", "yes"];

const QUESTION_COL: usize = 0;
const TYPE_COL: usize = 1;
const FIRST_ANSWER_COL: usize = 2;

/// Result of importing a sheet, with the rows that did not make it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub questions: Vec<QuestionDraft>,
    /// Rows after the header with every cell blank.
    pub blank_rows: usize,
    /// 1-based sheet row numbers that had content but produced no question.
    pub skipped_rows: Vec<usize>,
}

fn cell<S: AsRef<str>>(row: &[S], idx: usize) -> Option<&str> {
    row.get(idx).map(|c| c.as_ref())
}

pub fn is_correct_token(token: &str) -> bool {
    let token = token.trim().to_lowercase();
    TRUTHY_TOKENS.contains(&token.as_str())
}

/// Turns one sheet row into a question draft.
///
/// Column A holds the question, column B its type, and the remaining columns
/// come in `(answer, correct?)` pairs. Answers with empty text are dropped.
/// Returns `None` if the question text is empty or no answer survives.
pub fn parse_row<S: AsRef<str>>(row: &[S]) -> Option<QuestionDraft> {
    let question_text = cell(row, QUESTION_COL).unwrap_or("").trim().to_string();
    let question_type = cell(row, TYPE_COL).unwrap_or("").trim().to_lowercase();

    let mut answers = Vec::new();
    let mut i = FIRST_ANSWER_COL;
    while i < row.len() {
        let answer_text = cell(row, i).unwrap_or("").trim();
        let token = cell(row, i + 1).unwrap_or("false");
        i += 2;

        if answer_text.is_empty() {
            continue;
        }

        answers.push(AnswerDraft {
            answer_text: answer_text.to_string(),
            is_correct: is_correct_token(token),
        });
    }

    if question_text.is_empty() || answers.is_empty() {
        return None;
    }

    Some(QuestionDraft {
        question_text,
        question_type,
        answers,
    })
}

fn is_blank_row<S: AsRef<str>>(row: &[S]) -> bool {
    row.iter().all(|c| c.as_ref().trim().is_empty())
}

/// Parses every row after the header, keeping the ones that form a question.
pub fn import_sheet<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<QuestionDraft> {
    import_sheet_with_report(rows).questions
}

/// Same as [`import_sheet`], but also reports which rows were dropped.
pub fn import_sheet_with_report<S: AsRef<str>>(rows: &[Vec<S>]) -> ImportReport {
    let mut report = ImportReport::default();

    for (idx, row) in rows.iter().enumerate().skip(1) {
        let row_number = idx + 1;

        if is_blank_row(row) {
            tracing::debug!(row = row_number, "skipping blank row");
            report.blank_rows += 1;
            continue;
        }

        match parse_row(row) {
            Some(question) => report.questions.push(question),
            None => {
                tracing::debug!(row = row_number, "skipping row without question text or answers");
                report.skipped_rows.push(row_number);
            }
        }
    }

    report
}

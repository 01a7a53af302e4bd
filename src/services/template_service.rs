use crate::error::Result;
use rust_xlsxwriter::*;

/// Number of `(answer, correct)` column pairs in the template.
const ANSWER_PAIRS: u16 = 4;

pub struct TemplateService;

impl TemplateService {
    fn sample_rows() -> Vec<Vec<&'static str>> {
        vec![
            vec![
                "What is the primary purpose of a firewall?",
                "mcq",
                "To filter network traffic",
                "true",
                "To store passwords",
                "false",
                "To cool the server",
                "false",
                "To back up data",
                "false",
            ],
            vec![
                "HTTPS encrypts traffic between the browser and the server.",
                "true_false",
                "True",
                "yes",
                "False",
                "no",
            ],
        ]
    }

    fn headers() -> Vec<String> {
        let mut headers = vec!["Question".to_string(), "Type".to_string()];
        for n in 1..=ANSWER_PAIRS {
            headers.push(format!("Answer {}", n));
            headers.push(format!("Correct {}", n));
        }
        headers
    }

    /// Sample upload workbook: a header row followed by two example questions.
    ///
    /// The header must stay on the first row, the importer skips exactly one row.
    pub fn generate_template_xlsx() -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Questions")?;

        let header_format = Format::new()
            .set_bold()
            .set_font_size(11)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(0x1E293B))
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);
        let text_format = Format::new().set_text_wrap().set_align(FormatAlign::Top);

        for (col, header) in Self::headers().iter().enumerate() {
            let col = col as u16;
            let width = match col {
                0 => 50.0,
                1 => 14.0,
                c if c % 2 == 0 => 28.0,
                _ => 12.0,
            };
            worksheet.set_column_width(col, width)?;
            worksheet.write_string_with_format(0, col, header, &header_format)?;
        }

        for (idx, row) in Self::sample_rows().iter().enumerate() {
            let row_idx = idx as u32 + 1;
            for (col, value) in row.iter().enumerate() {
                worksheet.write_string_with_format(row_idx, col as u16, *value, &text_format)?;
            }
        }

        worksheet.set_freeze_panes(1, 0)?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::import_service::import_sheet;
    use crate::utils::spreadsheet::{read_first_sheet, SpreadsheetFormat};

    #[test]
    fn template_is_a_valid_xlsx() {
        let bytes = TemplateService::generate_template_xlsx().unwrap();
        assert!(SpreadsheetFormat::Xlsx.matches_content(&bytes));
    }

    #[test]
    fn template_imports_as_two_questions() {
        let bytes = TemplateService::generate_template_xlsx().unwrap();
        let rows = read_first_sheet(&bytes).unwrap();
        assert_eq!(rows[0][0], "Question");

        let questions = import_sheet(&rows);
        assert_eq!(questions.len(), 2);

        assert_eq!(questions[0].question_type, "mcq");
        assert_eq!(questions[0].answers.len(), 4);
        assert!(questions[0].answers[0].is_correct);
        assert!(questions[0].answers[1..].iter().all(|a| !a.is_correct));

        assert_eq!(questions[1].question_type, "true_false");
        assert_eq!(questions[1].answers.len(), 2);
        assert!(questions[1].answers[0].is_correct);
        assert!(!questions[1].answers[1].is_correct);
    }
}

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::FormRejection, Multipart, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
    Form,
};
use maud::Markup;

use crate::{
    dto::question_dto::{
        decode_drafts, encode_drafts, StoreQuestionsForm, UploadFormQuery, QUESTIONS_JSON_FIELD,
    },
    error::{Error, Result},
    services::{import_service, template_service::TemplateService},
    utils::spreadsheet::{read_first_sheet, SpreadsheetFormat},
    views, AppState,
};

pub const UPLOAD_PATH: &str = "/teacher/questions/upload";
pub const PREVIEW_PATH: &str = "/teacher/questions/preview";
pub const STORE_PATH: &str = "/teacher/questions/store";
pub const TEMPLATE_PATH: &str = "/teacher/questions/template";

pub const EXCEL_FILE_FIELD: &str = "excel_file";
pub const UPLOADED_STATUS: &str = "uploaded";

struct UploadedFile {
    filename: String,
    data: bytes::Bytes,
}

/// Finds the `excel_file` part, ignoring any other form fields.
async fn read_excel_file(mut multipart: Multipart) -> Result<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(EXCEL_FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            tracing::error!("Failed to read spreadsheet bytes: {}", e);
            Error::BadRequest("Failed to read file upload".into())
        })?;

        if filename.is_empty() && data.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadedFile { filename, data }));
    }
    Ok(None)
}

fn validate_spreadsheet(file: &UploadedFile) -> Result<()> {
    if file.data.is_empty() {
        return Err(Error::field(
            EXCEL_FILE_FIELD,
            "The excel file field is required.",
        ));
    }

    let format = SpreadsheetFormat::from_extension(&file.filename).ok_or_else(|| {
        Error::field(
            EXCEL_FILE_FIELD,
            "The excel file field must be a file of type: xlsx, xls.",
        )
    })?;

    if !format.matches_content(&file.data) {
        return Err(Error::field(
            EXCEL_FILE_FIELD,
            "The excel file content does not match its extension.",
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn upload_form(Query(query): Query<UploadFormQuery>) -> Markup {
    let success = query.status.as_deref() == Some(UPLOADED_STATUS);
    views::questions::upload_form(success)
}

#[axum::debug_handler]
pub async fn preview_upload(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Markup> {
    // A request without a multipart body carries no file at all.
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "preview request is not multipart");
        Error::field(EXCEL_FILE_FIELD, "The excel file field is required.")
    })?;
    let file = read_excel_file(multipart)
        .await?
        .ok_or_else(|| Error::field(EXCEL_FILE_FIELD, "The excel file field is required."))?;
    validate_spreadsheet(&file)?;

    let rows = read_first_sheet(&file.data)?;
    let report = import_service::import_sheet_with_report(&rows);
    tracing::info!(
        file = %file.filename,
        rows = rows.len(),
        questions = report.questions.len(),
        blank_rows = report.blank_rows,
        skipped_rows = report.skipped_rows.len(),
        "parsed question upload"
    );

    let payload = encode_drafts(&report.questions)?;
    Ok(views::questions::preview(
        &report.questions,
        &payload,
        &report.skipped_rows,
    ))
}

#[axum::debug_handler]
pub async fn store_uploaded(
    State(state): State<AppState>,
    form: std::result::Result<Form<StoreQuestionsForm>, FormRejection>,
) -> Result<Redirect> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(%rejection, "store request is not a urlencoded form");
            StoreQuestionsForm::default()
        }
    };
    let raw = form
        .questions_json
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| {
            Error::field(QUESTIONS_JSON_FIELD, "The questions json field is required.")
        })?;

    let drafts = decode_drafts(&raw)?;
    state.question_service.store_drafts(&drafts).await?;

    Ok(Redirect::to(&format!(
        "{}?status={}",
        UPLOAD_PATH, UPLOADED_STATUS
    )))
}

#[axum::debug_handler]
pub async fn download_template() -> Result<impl IntoResponse> {
    let buffer = TemplateService::generate_template_xlsx()?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sample_question_template.xlsx\"",
            ),
        ],
        buffer,
    ))
}

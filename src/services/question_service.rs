use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::dto::question_dto::{AnswerDraft, QuestionDraft};
use crate::error::Result;
use crate::models::answer::Answer;
use crate::models::question::Question;

/// Write side of the question bank. Answers are always created after, and
/// scoped to, the question they belong to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create_question(&self, draft: &QuestionDraft) -> Result<i64>;
    async fn create_answer(&self, question_id: i64, draft: &AnswerDraft) -> Result<i64>;
}

#[derive(Clone)]
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn create_question(&self, draft: &QuestionDraft) -> Result<i64> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (question_text, type)
            VALUES ($1, $2)
            RETURNING id, question_text, type, difficulty, created_at, updated_at
            "#,
        )
        .bind(&draft.question_text)
        .bind(&draft.question_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(question.id)
    }

    async fn create_answer(&self, question_id: i64, draft: &AnswerDraft) -> Result<i64> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (question_id, answer_text, is_correct)
            VALUES ($1, $2, $3)
            RETURNING id, question_id, answer_text, is_correct, created_at, updated_at
            "#,
        )
        .bind(question_id)
        .bind(&draft.answer_text)
        .bind(draft.is_correct)
        .fetch_one(&self.pool)
        .await?;

        Ok(answer.id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub questions: usize,
    pub answers: usize,
}

#[derive(Clone)]
pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    /// Persists confirmed drafts one question at a time.
    ///
    /// The batch is not wrapped in a transaction: when a write fails, the
    /// questions stored before it stay committed and the error is returned.
    pub async fn store_drafts(&self, drafts: &[QuestionDraft]) -> Result<StoreSummary> {
        let mut summary = StoreSummary::default();

        for draft in drafts {
            if let Err(e) = self.store_one(draft, &mut summary).await {
                tracing::error!(
                    error = %e,
                    stored_questions = summary.questions,
                    remaining = drafts.len() - summary.questions,
                    "question upload aborted mid-batch"
                );
                return Err(e);
            }
        }

        tracing::info!(
            questions = summary.questions,
            answers = summary.answers,
            "stored uploaded questions"
        );
        Ok(summary)
    }

    async fn store_one(&self, draft: &QuestionDraft, summary: &mut StoreSummary) -> Result<()> {
        let question_id = self.repository.create_question(draft).await?;
        summary.questions += 1;

        for answer in &draft.answers {
            self.repository.create_answer(question_id, answer).await?;
            summary.answers += 1;
        }
        Ok(())
    }
}

impl From<PgPool> for QuestionService {
    fn from(pool: PgPool) -> Self {
        Self::new(Arc::new(PgQuestionRepository::new(pool)))
    }
}

//! In-memory `QuestionRepository` used when no database is configured.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{
    QuestionFilter, QuestionRepository, QuestionRepositoryError, QuestionSort,
};
use crate::domain::{Question, QuestionId};

/// Process-local question store. Each `save` replaces the whole aggregate.
#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<QuestionId, Question>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> QuestionRepositoryError {
    QuestionRepositoryError::query("question store lock poisoned")
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn find_by_id(
        &self,
        id: &QuestionId,
    ) -> Result<Option<Question>, QuestionRepositoryError> {
        let questions = self.questions.read().map_err(|_| poisoned())?;
        Ok(questions.get(id).cloned())
    }

    async fn save(&self, question: &Question) -> Result<(), QuestionRepositoryError> {
        let mut questions = self.questions.write().map_err(|_| poisoned())?;
        questions.insert(*question.id(), question.clone());
        Ok(())
    }

    async fn delete(&self, id: &QuestionId) -> Result<bool, QuestionRepositoryError> {
        let mut questions = self.questions.write().map_err(|_| poisoned())?;
        Ok(questions.remove(id).is_some())
    }

    async fn find(
        &self,
        filter: &QuestionFilter,
        sort: QuestionSort,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        let mut found: Vec<Question> = {
            let questions = self.questions.read().map_err(|_| poisoned())?;
            questions
                .values()
                .filter(|question| filter.matches(question))
                .cloned()
                .collect()
        };
        found.sort_by(|a, b| sort.compare(a, b));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuestionDraft, UserId};
    use chrono::Utc;
    use rstest::rstest;

    fn question(title: &str, tags: &[&str]) -> Question {
        let tags: Vec<String> = tags.iter().map(|tag| (*tag).to_owned()).collect();
        let draft = QuestionDraft::try_from_parts(
            Some(title),
            Some("Body long enough to pass"),
            Some(&tags),
        )
        .expect("draft");
        Question::new(UserId::random(), draft, Utc::now())
    }

    #[rstest]
    #[tokio::test]
    async fn save_replaces_and_delete_reports_removal() {
        let repo = InMemoryQuestionRepository::new();
        let mut stored = question("Replaceable question", &["rust"]);
        repo.save(&stored).await.expect("save");

        stored.record_view();
        repo.save(&stored).await.expect("save again");
        let found = repo
            .find_by_id(stored.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found.views(), 1);

        assert!(repo.delete(stored.id()).await.expect("delete"));
        assert!(!repo.delete(stored.id()).await.expect("second delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn find_applies_filter_and_sort() {
        let repo = InMemoryQuestionRepository::new();
        let mut popular = question("Popular borrow checker question", &["rust", "borrowck"]);
        popular.record_view();
        popular.record_view();
        let quiet = question("Quiet borrow checker question", &["rust"]);
        let other = question("Unrelated python question", &["python"]);
        for q in [&popular, &quiet, &other] {
            repo.save(q).await.expect("save");
        }

        let filter = QuestionFilter {
            title_contains: Some("BORROW".to_owned()),
            tags: vec!["rust".to_owned()],
            favorited_by: None,
        };
        let found = repo
            .find(&filter, QuestionSort::ViewsAsc)
            .await
            .expect("find");

        let ids: Vec<_> = found.iter().map(|q| *q.id()).collect();
        assert_eq!(ids, [*quiet.id(), *popular.id()]);
    }
}

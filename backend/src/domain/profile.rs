//! Per-user statistics aggregated from questions and answers.

use super::question::Question;
use super::user::{User, UserId};

/// Running totals for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileStats {
    pub questions_asked: u64,
    pub question_score: i64,
    pub answers_given: u64,
    pub answer_score: i64,
    pub helpful_answers: u64,
}

impl ProfileStats {
    /// Scan `questions` and their answers for content authored by `user`.
    pub fn collect<'a>(user: &UserId, questions: impl IntoIterator<Item = &'a Question>) -> Self {
        questions
            .into_iter()
            .fold(Self::default(), |mut stats, question| {
                if question.author() == user {
                    stats.questions_asked += 1;
                    stats.question_score += question.score();
                }
                for answer in question.answers().iter().filter(|a| a.author() == user) {
                    stats.answers_given += 1;
                    stats.answer_score += answer.score();
                    if answer.is_helpful() {
                        stats.helpful_answers += 1;
                    }
                }
                stats
            })
    }
}

/// Public profile: identity plus aggregated statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user: User,
    pub stats: ProfileStats,
}

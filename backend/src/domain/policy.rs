//! Authorization policy for question and answer mutations.
//!
//! All permission checks go through [`authorize`], so HTTP handlers never
//! reimplement ownership rules.

use super::auth::Actor;
use super::error::Error;
use super::question::{Answer, Question, VoteTarget};
use super::user::{Role, UserId};

/// Mutation an actor wants to perform.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    DeleteQuestion(&'a Question),
    UpdateQuestion(&'a Question),
    /// Toggle the helpful flag on one of the question's answers.
    MarkHelpful(&'a Question),
    /// Edit or delete an answer.
    ModifyAnswer(&'a Answer),
    /// Vote on content written by `author`.
    Vote { target: VoteTarget, author: UserId },
    CreateAnswer(&'a Question),
    PromoteUser,
}

/// Reason an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyDenial {
    #[error("You are not allowed to modify this content.")]
    NotOwner,
    #[error("Administrator role required.")]
    AdminRequired,
    #[error("Cannot vote your own question.")]
    SelfVoteQuestion,
    #[error("Cannot vote your own answer.")]
    SelfVoteAnswer,
    #[error("You can write one answer.")]
    DuplicateAnswer,
}

impl From<PolicyDenial> for Error {
    fn from(denial: PolicyDenial) -> Self {
        match denial {
            PolicyDenial::NotOwner | PolicyDenial::AdminRequired => {
                Error::unauthorized(denial.to_string())
            }
            PolicyDenial::SelfVoteQuestion
            | PolicyDenial::SelfVoteAnswer
            | PolicyDenial::DuplicateAnswer => Error::invalid_request(denial.to_string()),
        }
    }
}

fn owner_or_moderator(actor: &Actor, owner: &UserId) -> Result<(), PolicyDenial> {
    if &actor.id == owner || actor.is_moderator() {
        Ok(())
    } else {
        Err(PolicyDenial::NotOwner)
    }
}

/// Decide whether `actor` may perform `action`.
///
/// # Examples
/// ```
/// use backend::domain::{authorize, Action, Actor, PolicyDenial, Role, UserId, VoteTarget};
///
/// let actor = Actor { id: UserId::random(), role: Role::User, promoted: false };
/// let denial = authorize(&actor, Action::Vote { target: VoteTarget::Question, author: actor.id })
///     .expect_err("self-votes are refused");
/// assert_eq!(denial, PolicyDenial::SelfVoteQuestion);
/// ```
pub fn authorize(actor: &Actor, action: Action<'_>) -> Result<(), PolicyDenial> {
    match action {
        Action::DeleteQuestion(question)
        | Action::UpdateQuestion(question)
        | Action::MarkHelpful(question) => owner_or_moderator(actor, question.author()),
        Action::ModifyAnswer(answer) => owner_or_moderator(actor, answer.author()),
        Action::Vote { target, author } if author == actor.id => Err(match target {
            VoteTarget::Question => PolicyDenial::SelfVoteQuestion,
            VoteTarget::Answer(_) => PolicyDenial::SelfVoteAnswer,
        }),
        Action::Vote { .. } => Ok(()),
        Action::CreateAnswer(question) => match question.answer_by(&actor.id) {
            Some(_) => Err(PolicyDenial::DuplicateAnswer),
            None => Ok(()),
        },
        Action::PromoteUser => match actor.role {
            Role::Admin => Ok(()),
            Role::User => Err(PolicyDenial::AdminRequired),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{AnswerText, QuestionDraft};
    use crate::domain::error::ErrorCode;
    use crate::domain::question::AnswerId;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn actor(role: Role, promoted: bool) -> Actor {
        Actor {
            id: UserId::random(),
            role,
            promoted,
        }
    }

    fn question_by(author: UserId) -> Question {
        let draft = QuestionDraft::try_from_parts(
            Some("Policy test question"),
            Some("Who may edit this question?"),
            Some(&["policy".to_owned()]),
        )
        .expect("valid draft");
        Question::new(author, draft, Utc::now())
    }

    #[fixture]
    fn member() -> Actor {
        actor(Role::User, false)
    }

    #[rstest]
    #[case(Role::User, true)]
    #[case(Role::Admin, false)]
    fn moderators_may_delete_any_question(#[case] role: Role, #[case] promoted: bool) {
        let question = question_by(UserId::random());
        let moderator = actor(role, promoted);
        assert_eq!(authorize(&moderator, Action::DeleteQuestion(&question)), Ok(()));
        assert_eq!(authorize(&moderator, Action::UpdateQuestion(&question)), Ok(()));
        assert_eq!(authorize(&moderator, Action::MarkHelpful(&question)), Ok(()));
    }

    #[rstest]
    fn authors_may_modify_their_question(member: Actor) {
        let question = question_by(member.id);
        assert_eq!(authorize(&member, Action::DeleteQuestion(&question)), Ok(()));
    }

    #[rstest]
    fn strangers_may_not_modify_questions(member: Actor) {
        let question = question_by(UserId::random());
        assert_eq!(
            authorize(&member, Action::UpdateQuestion(&question)),
            Err(PolicyDenial::NotOwner)
        );
        assert_eq!(
            authorize(&member, Action::MarkHelpful(&question)),
            Err(PolicyDenial::NotOwner)
        );
    }

    #[rstest]
    fn answer_modification_follows_answer_author(member: Actor) {
        let mut question = question_by(UserId::random());
        let text = AnswerText::new("Policy answer body").expect("valid text");
        let answer = question
            .add_answer(member.id, text, Utc::now())
            .expect("answer")
            .clone();

        assert_eq!(authorize(&member, Action::ModifyAnswer(&answer)), Ok(()));
        assert_eq!(
            authorize(&actor(Role::User, false), Action::ModifyAnswer(&answer)),
            Err(PolicyDenial::NotOwner)
        );
    }

    #[rstest]
    #[case(VoteTarget::Question, PolicyDenial::SelfVoteQuestion)]
    #[case(VoteTarget::Answer(AnswerId::random()), PolicyDenial::SelfVoteAnswer)]
    fn self_votes_are_denied(
        member: Actor,
        #[case] target: VoteTarget,
        #[case] expected: PolicyDenial,
    ) {
        let action = Action::Vote {
            target,
            author: member.id,
        };
        assert_eq!(authorize(&member, action), Err(expected));
    }

    #[rstest]
    fn self_vote_denial_applies_to_admins_too() {
        let admin = actor(Role::Admin, true);
        let action = Action::Vote {
            target: VoteTarget::Question,
            author: admin.id,
        };
        assert!(authorize(&admin, action).is_err());
    }

    #[rstest]
    fn votes_on_others_content_are_allowed(member: Actor) {
        let action = Action::Vote {
            target: VoteTarget::Question,
            author: UserId::random(),
        };
        assert_eq!(authorize(&member, action), Ok(()));
    }

    #[rstest]
    fn second_answer_is_denied(member: Actor) {
        let mut question = question_by(UserId::random());
        assert_eq!(authorize(&member, Action::CreateAnswer(&question)), Ok(()));

        let text = AnswerText::new("First answer body").expect("valid text");
        question
            .add_answer(member.id, text, Utc::now())
            .expect("answer");

        assert_eq!(
            authorize(&member, Action::CreateAnswer(&question)),
            Err(PolicyDenial::DuplicateAnswer)
        );
    }

    #[rstest]
    fn only_admins_promote(member: Actor) {
        assert_eq!(
            authorize(&member, Action::PromoteUser),
            Err(PolicyDenial::AdminRequired)
        );
        assert_eq!(
            authorize(&actor(Role::User, true), Action::PromoteUser),
            Err(PolicyDenial::AdminRequired)
        );
        assert_eq!(authorize(&actor(Role::Admin, false), Action::PromoteUser), Ok(()));
    }

    #[rstest]
    #[case(PolicyDenial::NotOwner, ErrorCode::Unauthorized)]
    #[case(PolicyDenial::AdminRequired, ErrorCode::Unauthorized)]
    #[case(PolicyDenial::SelfVoteAnswer, ErrorCode::InvalidRequest)]
    #[case(PolicyDenial::DuplicateAnswer, ErrorCode::InvalidRequest)]
    fn denials_map_to_error_codes(#[case] denial: PolicyDenial, #[case] expected: ErrorCode) {
        let error = Error::from(denial);
        assert_eq!(error.code(), expected);
        assert_eq!(error.message(), denial.to_string());
    }
}

//! Per-votable ledger of user votes and the score derived from them.
//!
//! A ledger holds at most one [`Vote`] per voter. Applying a command first
//! withdraws the voter's previous vote from the score, then either drops the
//! record (retraction) or stores and adds the new value. Repeating a command
//! therefore leaves the ledger unchanged, and the score always equals the sum
//! of the stored vote values.

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Direction of a stored vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Upvote,
    Downvote,
}

impl VoteChoice {
    /// Score contribution of the vote. The weights are intentionally uneven.
    pub const fn weight(self) -> i64 {
        match self {
            Self::Upvote => 10,
            Self::Downvote => -5,
        }
    }

    /// Recover a choice from its stored weight.
    pub fn from_weight(weight: i64) -> Option<Self> {
        match weight {
            10 => Some(Self::Upvote),
            -5 => Some(Self::Downvote),
            _ => None,
        }
    }
}

/// Vote request as issued by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteCommand {
    Upvote,
    Downvote,
    /// Retract any existing vote.
    Unvote,
}

impl VoteCommand {
    /// Stored choice produced by the command; `None` means retraction.
    pub const fn choice(self) -> Option<VoteChoice> {
        match self {
            Self::Upvote => Some(VoteChoice::Upvote),
            Self::Downvote => Some(VoteChoice::Downvote),
            Self::Unvote => None,
        }
    }
}

/// Error returned when parsing an unknown vote command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vote command: {0}")]
pub struct UnknownVoteCommand(String);

impl std::str::FromStr for VoteCommand {
    type Err = UnknownVoteCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(Self::Upvote),
            "downvote" => Ok(Self::Downvote),
            "unvote" => Ok(Self::Unvote),
            other => Err(UnknownVoteCommand(other.to_owned())),
        }
    }
}

/// A single user's vote on a question or answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: UserId,
    pub choice: VoteChoice,
}

/// What a call to [`VoteLedger::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// A vote was recorded for a voter who had none.
    Cast,
    /// An existing vote was overwritten, possibly with the same value.
    Changed,
    /// An existing vote was removed.
    Retracted,
    /// Retraction requested with no vote on record.
    Unchanged,
}

/// Ordered votes plus the score derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteLedger {
    score: i64,
    votes: Vec<Vote>,
}

impl VoteLedger {
    /// Rebuild a ledger from stored votes, recomputing the score.
    ///
    /// Later duplicates for the same voter are discarded.
    pub fn from_votes(votes: impl IntoIterator<Item = Vote>) -> Self {
        let mut ledger = Self::default();
        for vote in votes {
            if ledger.vote_of(&vote.voter).is_none() {
                ledger.score += vote.choice.weight();
                ledger.votes.push(vote);
            }
        }
        ledger
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Current vote of `voter`, if any.
    pub fn vote_of(&self, voter: &UserId) -> Option<VoteChoice> {
        self.votes
            .iter()
            .find(|vote| &vote.voter == voter)
            .map(|vote| vote.choice)
    }

    /// Apply `command` on behalf of `voter`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{UserId, VoteCommand, VoteLedger};
    ///
    /// let voter = UserId::random();
    /// let mut ledger = VoteLedger::default();
    /// ledger.apply(voter, VoteCommand::Downvote);
    /// ledger.apply(voter, VoteCommand::Upvote);
    /// assert_eq!(ledger.score(), 10);
    /// assert_eq!(ledger.votes().len(), 1);
    /// ```
    pub fn apply(&mut self, voter: UserId, command: VoteCommand) -> VoteOutcome {
        let Some(stored) = self.votes.iter_mut().find(|vote| vote.voter == voter) else {
            return match command.choice() {
                Some(choice) => {
                    self.votes.push(Vote { voter, choice });
                    self.score += choice.weight();
                    VoteOutcome::Cast
                }
                None => VoteOutcome::Unchanged,
            };
        };
        let previous = stored.choice;
        match command.choice() {
            Some(choice) => {
                stored.choice = choice;
                self.score += choice.weight() - previous.weight();
                VoteOutcome::Changed
            }
            None => {
                self.votes.retain(|vote| vote.voter != voter);
                self.score -= previous.weight();
                VoteOutcome::Retracted
            }
        }
    }
}

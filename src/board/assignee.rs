//! AI assignee suggestions.

use crate::error::BoardError;
use crate::model::user::find_user;
use crate::model::{TaskDraft, User};
use crate::ports::AssigneeChoice;

/// A suggested assignee, resolved against the known users.
#[derive(Debug, Clone, PartialEq)]
pub struct AssigneeSuggestion {
    /// The recommended user.
    pub user: User,
    /// Estimated hours for that user to finish the task.
    pub hours_to_complete: f64,
    /// Justification, with the user's id replaced by their name.
    pub reason: String,
}

impl AssigneeSuggestion {
    /// Resolves a raw service answer.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownUser`] when the suggested id is not
    /// among `users`.
    pub fn resolve(choice: AssigneeChoice, users: &[User]) -> Result<Self, BoardError> {
        let user = find_user(users, &choice.user_id)
            .cloned()
            .ok_or_else(|| BoardError::UnknownUser(choice.user_id.clone()))?;
        let reason = humanize_reason(&choice.reason, &user);
        Ok(Self { user, hours_to_complete: choice.hours_to_complete, reason })
    }
}

/// Replaces every standalone occurrence of the user's raw id with their
/// display name.
///
/// An occurrence only counts when it is not glued to other letters or
/// digits, so id `1` leaves "12 hours" alone.
#[must_use]
pub fn humanize_reason(reason: &str, user: &User) -> String {
    if user.id.is_empty() {
        return reason.to_string();
    }
    let mut out = String::with_capacity(reason.len());
    let mut copied = 0;
    for (start, _) in reason.match_indices(user.id.as_str()) {
        let end = start + user.id.len();
        if !is_boundary(reason, start, end) {
            continue;
        }
        out.push_str(&reason[copied..start]);
        out.push_str(&user.name);
        copied = end;
    }
    out.push_str(&reason[copied..]);
    out
}

fn is_boundary(text: &str, start: usize, end: usize) -> bool {
    let word = |c: char| c.is_alphanumeric() || c == '_';
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(word) && !after.is_some_and(word)
}

impl TaskDraft {
    /// Takes the suggested user as assignee.
    pub fn accept_suggestion(&mut self, suggestion: &AssigneeSuggestion) {
        self.assignee = Some(suggestion.user.clone());
    }
}

//! Replacement policy: decides what happens to a selected token when the user
//! interacts with it.

use super::token::{ReplacementAction, Token, UserInteraction};

/// Strategy consulted by the controller on delete, enter and double click.
pub trait ReplacementPolicy {
    fn decide_replacement_action(
        &self,
        interaction: UserInteraction,
        token: &Token,
    ) -> ReplacementAction;
}

/// Enter inserts the token's text; delete and double click remove it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultReplacementPolicy;

impl ReplacementPolicy for DefaultReplacementPolicy {
    fn decide_replacement_action(
        &self,
        interaction: UserInteraction,
        _token: &Token,
    ) -> ReplacementAction {
        match interaction {
            UserInteraction::Enter => ReplacementAction::Insert,
            UserInteraction::Delete | UserInteraction::DoubleClick => ReplacementAction::Delete,
        }
    }
}

impl<F> ReplacementPolicy for F
where
    F: Fn(UserInteraction, &Token) -> ReplacementAction,
{
    fn decide_replacement_action(
        &self,
        interaction: UserInteraction,
        token: &Token,
    ) -> ReplacementAction {
        self(interaction, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let token = Token::new("x");
        let policy = DefaultReplacementPolicy;
        assert_eq!(
            policy.decide_replacement_action(UserInteraction::Enter, &token),
            ReplacementAction::Insert
        );
        assert_eq!(
            policy.decide_replacement_action(UserInteraction::Delete, &token),
            ReplacementAction::Delete
        );
        assert_eq!(
            policy.decide_replacement_action(UserInteraction::DoubleClick, &token),
            ReplacementAction::Delete
        );
    }

    #[test]
    fn test_closure_policy() {
        let token = Token::new("keep");
        let policy = |_: UserInteraction, token: &Token| {
            if token.content_text() == "keep" {
                ReplacementAction::Ignore
            } else {
                ReplacementAction::Delete
            }
        };
        assert_eq!(
            policy.decide_replacement_action(UserInteraction::Delete, &token),
            ReplacementAction::Ignore
        );
    }
}

use crate::models::domain::{Difficulty, QuizSession};

/// Moves a session's difficulty along with the rolling outcome window.
/// The transition rule is a pure function of (window, current level);
/// everything else lives on the session.
pub struct DifficultyAdapter;

impl DifficultyAdapter {
    /// Transition rule over the graded-outcome window.
    ///
    /// Windows with fewer than two entries never move the level, so a
    /// single answer cannot flap the difficulty. An all-correct window
    /// promotes one level, an all-incorrect window demotes one level,
    /// and a mixed window leaves it unchanged. Promotion clamps at
    /// `Hard`, demotion at `Easy`.
    pub fn evaluate(window: &[bool], current: Difficulty) -> Difficulty {
        if window.len() < 2 {
            return current;
        }

        if window.iter().all(|outcome| *outcome) {
            current.promote()
        } else if window.iter().all(|outcome| !outcome) {
            current.demote()
        } else {
            current
        }
    }

    /// Pushes a graded outcome into the session window and applies the
    /// transition rule. Ungraded outcomes (`None`) are excluded
    /// entirely: they neither enter the window nor count as incorrect.
    ///
    /// When the session pins a fixed difficulty the window is still
    /// tracked, but the level never moves. Returns the level in effect
    /// after recording.
    pub fn record(session: &mut QuizSession, outcome: Option<bool>) -> Difficulty {
        let Some(outcome) = outcome else {
            log::info!("Ungraded result excluded from the difficulty window");
            return session.current_difficulty();
        };

        session.push_outcome(outcome);

        if !session.config.difficulty.is_adaptive() {
            return session.current_difficulty();
        }

        let current = session.current_difficulty();
        let next = Self::evaluate(&session.outcome_window(), current);
        if next != current {
            log::info!(
                "Difficulty adjusted from {} to {} after outcome window {:?}",
                current.as_str(),
                next.as_str(),
                session.outcome_window()
            );
            session.set_difficulty(next);
        }

        session.current_difficulty()
    }
}

//! Step controller as an explicit finite state machine.
//!
//! Step indices for a wizard with `n` data-entry steps:
//! `Entry(0..n)` → `0..n`, `Review`/`Submitting` → `n`, `Confirmed` → `n + 1`.
//! The machine only knows which moves are legal; whether the current step is
//! valid is decided by the session before it sends `Advance`.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Entry(usize),
    Review,
    /// Review step with a submission in flight
    Submitting,
    /// Terminal for this run; only `Close` leaves it
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Advance,
    Retreat,
    SubmitSucceeded,
    SubmitFailed,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("cannot {event:?} from {from:?}")]
    IllegalTransition { from: WizardState, event: WizardEvent },
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("cannot prepare submission: {0}")]
    Mapping(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMachine {
    entry_steps: usize,
    state: WizardState,
}

impl StepMachine {
    pub fn new(entry_steps: usize) -> Self {
        Self {
            entry_steps,
            state: Self::initial(entry_steps),
        }
    }

    fn initial(entry_steps: usize) -> WizardState {
        if entry_steps == 0 {
            WizardState::Review
        } else {
            WizardState::Entry(0)
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// Number of declared steps, review and confirmation included
    pub fn step_count(&self) -> usize {
        self.entry_steps + 2
    }

    pub fn index(&self) -> usize {
        match self.state {
            WizardState::Entry(i) => i,
            WizardState::Review | WizardState::Submitting => self.entry_steps,
            WizardState::Confirmed => self.entry_steps + 1,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state == WizardState::Submitting
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == WizardState::Confirmed
    }

    pub fn can_retreat(&self) -> bool {
        self.transition(WizardEvent::Retreat).is_ok()
    }

    /// Transition table. Does not mutate.
    pub fn transition(&self, event: WizardEvent) -> Result<WizardState, WizardError> {
        use WizardEvent::*;
        use WizardState::*;

        let next = match (self.state, event) {
            (_, Close) => Some(Self::initial(self.entry_steps)),
            (Entry(i), Advance) if i + 1 < self.entry_steps => Some(Entry(i + 1)),
            (Entry(_), Advance) => Some(Review),
            (Review, Advance) => Some(Submitting),
            (Submitting, Advance) => return Err(WizardError::SubmissionInFlight),
            (Submitting, SubmitSucceeded) => Some(Confirmed),
            (Submitting, SubmitFailed) => Some(Review),
            (Entry(i), Retreat) if i > 0 => Some(Entry(i - 1)),
            (Review, Retreat) if self.entry_steps > 0 => Some(Entry(self.entry_steps - 1)),
            _ => None,
        };

        next.ok_or(WizardError::IllegalTransition {
            from: self.state,
            event,
        })
    }

    pub fn apply(&mut self, event: WizardEvent) -> Result<WizardState, WizardError> {
        let next = self.transition(event)?;
        self.state = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_walk() {
        let mut m = StepMachine::new(3);
        assert_eq!(m.step_count(), 5);
        assert_eq!(m.index(), 0);
        assert_eq!(m.apply(WizardEvent::Advance), Ok(WizardState::Entry(1)));
        assert_eq!(m.apply(WizardEvent::Advance), Ok(WizardState::Entry(2)));
        assert_eq!(m.apply(WizardEvent::Advance), Ok(WizardState::Review));
        assert_eq!(m.index(), 3);
        assert_eq!(m.apply(WizardEvent::Advance), Ok(WizardState::Submitting));
        assert_eq!(m.index(), 3);
        assert_eq!(m.apply(WizardEvent::SubmitSucceeded), Ok(WizardState::Confirmed));
        assert_eq!(m.index(), 4);
    }

    #[test]
    fn test_retreat_from_every_step_above_zero() {
        for start in 1..=3 {
            let mut m = StepMachine::new(3);
            for _ in 0..start {
                m.apply(WizardEvent::Advance).unwrap();
            }
            let index = m.index();
            m.apply(WizardEvent::Retreat).unwrap();
            assert_eq!(m.index(), index - 1);
        }
    }

    #[test]
    fn test_illegal_moves() {
        let mut m = StepMachine::new(2);
        assert_eq!(
            m.apply(WizardEvent::Retreat),
            Err(WizardError::IllegalTransition {
                from: WizardState::Entry(0),
                event: WizardEvent::Retreat
            })
        );
        assert!(m.apply(WizardEvent::SubmitSucceeded).is_err());

        m.apply(WizardEvent::Advance).unwrap();
        m.apply(WizardEvent::Advance).unwrap();
        m.apply(WizardEvent::Advance).unwrap();
        assert!(m.is_busy());
        assert_eq!(m.apply(WizardEvent::Advance), Err(WizardError::SubmissionInFlight));
        assert!(!m.can_retreat());

        m.apply(WizardEvent::SubmitSucceeded).unwrap();
        assert!(m.apply(WizardEvent::Advance).is_err());
        assert!(m.apply(WizardEvent::Retreat).is_err());
        assert_eq!(m.state(), WizardState::Confirmed);
    }

    #[test]
    fn test_failed_submission_returns_to_review() {
        let mut m = StepMachine::new(1);
        m.apply(WizardEvent::Advance).unwrap();
        m.apply(WizardEvent::Advance).unwrap();
        assert_eq!(m.apply(WizardEvent::SubmitFailed), Ok(WizardState::Review));
        assert_eq!(m.apply(WizardEvent::Advance), Ok(WizardState::Submitting));
    }

    #[test]
    fn test_close_resets_from_any_state() {
        let mut m = StepMachine::new(2);
        m.apply(WizardEvent::Advance).unwrap();
        m.apply(WizardEvent::Advance).unwrap();
        m.apply(WizardEvent::Advance).unwrap();
        m.apply(WizardEvent::SubmitSucceeded).unwrap();
        assert_eq!(m.apply(WizardEvent::Close), Ok(WizardState::Entry(0)));
        assert_eq!(m.index(), 0);
    }

    #[test]
    fn test_review_only_wizard() {
        let mut m = StepMachine::new(0);
        assert_eq!(m.state(), WizardState::Review);
        assert!(!m.can_retreat());
        assert_eq!(m.apply(WizardEvent::Advance), Ok(WizardState::Submitting));
    }
}

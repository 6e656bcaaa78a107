//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ChatContext {
    ChatContext::new(Uuid::nil())
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_714_554_000 + secs, 0).unwrap()
}

fn open_state() -> ChatState {
    transition(&ChatState::default(), &test_context(), Event::Open { at: at(0) })
        .unwrap()
        .new_state
}

/// What the user (or the sink) does next. Acks are resolved against the
/// current state so that sequences actually make progress.
#[derive(Debug, Clone)]
enum Action {
    Open,
    Respond(String),
    Close,
    AckPending { delivered: bool },
    AckStale(u64),
}

impl Action {
    fn to_event(&self, state: &ChatState, t: i64) -> Event {
        match self {
            Action::Open => Event::Open { at: at(t) },
            Action::Respond(text) => Event::UserResponse {
                text: text.clone(),
                at: at(t),
            },
            Action::Close => Event::Close,
            Action::AckPending { delivered } => Event::SinkAck {
                submission: state.pending.unwrap_or(u64::MAX),
                delivered: *delivered,
                at: at(t),
            },
            Action::AckStale(offset) => Event::SinkAck {
                submission: state.next_submission + offset,
                delivered: true,
                at: at(t),
            },
        }
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_option_value(step: Step) -> impl Strategy<Value = String> {
    prop::sample::select(step.options().to_vec()).prop_map(|o| o.value.to_string())
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        1 => Just(Action::Open),
        3 => "[a-zA-Z ]{0,20}".prop_map(Action::Respond),
        1 => Just(Action::Close),
        3 => any::<bool>().prop_map(|delivered| Action::AckPending { delivered }),
        1 => (0u64..3).prop_map(Action::AckStale),
    ]
}

fn arb_open_state() -> impl Strategy<Value = ChatState> {
    (
        prop::sample::select(Step::ALL.to_vec()),
        proptest::option::of(0u64..10),
        1usize..6,
    )
        .prop_map(|(step, pending, log_len)| {
            let mut state = open_state();
            state.step = step;
            state.pending = pending;
            state.next_submission = pending.map_or(0, |p| p + 1);
            for i in 1..log_len {
                state.messages.push(Message::user(format!("m{i}"), at(0)));
            }
            state
        })
}

fn run(actions: &[Action]) -> Vec<(ChatState, Result<TransitionResult, TransitionError>, ChatState)> {
    let mut state = ChatState::default();
    let mut trace = Vec::new();
    for (t, action) in (1i64..).zip(actions) {
        let event = action.to_event(&state, t);
        let result = transition(&state, &test_context(), event);
        let before = state.clone();
        if let Ok(r) = &result {
            state = r.new_state.clone();
        }
        trace.push((before, result, state.clone()));
    }
    trace
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: the log only grows, and rejected events change nothing
    #[test]
    fn prop_log_is_append_only(actions in proptest::collection::vec(arb_action(), 0..40)) {
        for (before, result, after) in run(&actions) {
            prop_assert!(after.messages.len() >= before.messages.len());
            prop_assert_eq!(&after.messages[..before.messages.len()], &before.messages[..]);
            if result.is_err() {
                prop_assert_eq!(before, after);
            }
        }
    }

    // Invariant 2: the step only moves forward by one, except on reopen
    #[test]
    fn prop_step_monotonic_except_reopen(actions in proptest::collection::vec(arb_action(), 0..40)) {
        for (before, _result, after) in run(&actions) {
            let reopened = !before.is_open && after.is_open;
            if reopened {
                prop_assert_eq!(after.step, Step::AskClass);
            } else {
                prop_assert!(after.step.index() == before.step.index()
                    || after.step.index() == before.step.index() + 1,
                    "step jumped from {:?} to {:?}", before.step, after.step);
            }
        }
    }

    // Invariant 3: an accepted response appends exactly one user message
    #[test]
    fn prop_accepted_response_appends_one_user_message(
        state in arb_open_state(),
        text in "[a-zA-Z0-9 ]{0,30}",
    ) {
        let result = transition(&state, &test_context(), Event::UserResponse { text: text.clone(), at: at(1) });
        if state.is_loading() {
            prop_assert_eq!(result.unwrap_err(), TransitionError::Busy);
        } else {
            let result = result.unwrap();
            prop_assert_eq!(result.new_state.messages.len(), state.messages.len() + 1);
            let last = result.new_state.messages.last().unwrap();
            prop_assert_eq!(last.sender, Sender::User);
            prop_assert_eq!(&last.message, &text);
            prop_assert!(result.new_state.is_loading());
            prop_assert_eq!(result.new_state.step, state.step);
        }
    }

    // Invariant 4: a matching ack clears loading and emits at most one system message
    #[test]
    fn prop_matching_ack_advances_once(state in arb_open_state(), delivered in any::<bool>()) {
        prop_assume!(state.pending.is_some());
        let submission = state.pending.unwrap();
        let result = transition(&state, &test_context(), Event::SinkAck { submission, delivered, at: at(2) }).unwrap();

        prop_assert!(!result.new_state.is_loading());
        match state.step.next() {
            Some(next) => {
                prop_assert_eq!(result.new_state.step, next);
                prop_assert_eq!(result.new_state.messages.len(), state.messages.len() + 1);
                let last = result.new_state.messages.last().unwrap();
                prop_assert_eq!(last.sender, Sender::System);
                prop_assert_eq!(last.message.as_str(), next.prompt());
            }
            None => {
                prop_assert_eq!(result.new_state.step, Step::Finished);
                prop_assert_eq!(result.new_state.messages.len(), state.messages.len());
            }
        }
    }

    // Invariant 5: three acknowledged option selections finish the script
    #[test]
    fn prop_three_selections_finish(
        class in arb_option_value(Step::AskClass),
        exam in arb_option_value(Step::AskExam),
        subject in arb_option_value(Step::AskSubject),
        deliveries in proptest::collection::vec(any::<bool>(), 3),
    ) {
        let mut state = open_state();
        for (i, (text, delivered)) in [class, exam, subject].into_iter().zip(deliveries).enumerate() {
            prop_assert_eq!(usize::from(state.step.index()), i);
            state = transition(&state, &test_context(), Event::UserResponse { text, at: at(1) }).unwrap().new_state;
            let submission = state.pending.unwrap();
            state = transition(&state, &test_context(), Event::SinkAck { submission, delivered, at: at(2) }).unwrap().new_state;
        }
        prop_assert_eq!(state.step, Step::Finished);
        prop_assert_eq!(state.messages.len(), 7);
        prop_assert!(state.can_close());
    }

    // Invariant 6: PublishState emitted exactly when the state changes
    #[test]
    fn prop_state_changes_publish(actions in proptest::collection::vec(arb_action(), 0..30)) {
        for (before, result, after) in run(&actions) {
            if let Ok(result) = result {
                let published = result.effects.contains(&Effect::PublishState);
                prop_assert_eq!(published, before != after);
            }
        }
    }

    // Invariant 7: every appended message has exactly one matching persist effect
    #[test]
    fn prop_appended_messages_are_persisted(actions in proptest::collection::vec(arb_action(), 0..30)) {
        for (before, result, after) in run(&actions) {
            if let Ok(result) = result {
                let persisted: Vec<&Message> = result
                    .effects
                    .iter()
                    .filter_map(|e| match e {
                        Effect::PersistMessage { message, .. } => Some(message),
                        Effect::PublishState => None,
                    })
                    .collect();
                let appended: Vec<&Message> = after.messages[before.messages.len()..].iter().collect();
                prop_assert_eq!(persisted, appended);
            }
        }
    }
}

#[test]
fn test_double_submission_resolves_to_step_one() {
    let state = open_state();
    let first = transition(&state, &test_context(), Event::UserResponse { text: "tenth".into(), at: at(1) })
        .unwrap()
        .new_state;
    let second = transition(&first, &test_context(), Event::UserResponse { text: "ninth".into(), at: at(1) });
    assert_eq!(second.unwrap_err(), TransitionError::Busy);

    let done = transition(&first, &test_context(), Event::SinkAck { submission: 0, delivered: true, at: at(2) })
        .unwrap()
        .new_state;
    assert_eq!(done.step, Step::AskExam);
    assert_eq!(done.messages.len(), 3);
}

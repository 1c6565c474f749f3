use serde::Serialize;

use crate::relay::FormRelay;

pub const GENERIC_REJECTION: &str = "Something went wrong. Please try again.";
pub const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Name,
    Email,
    Message,
}

impl FieldKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::Email => "email",
            FieldKey::Message => "message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    MultiLine { rows: u16 },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub kind: InputKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub placeholder: &'static str,
}

pub const CONTACT_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        key: FieldKey::Name,
        kind: InputKind::Text,
        label: "Name",
        icon: "👤",
        placeholder: "Your name",
    },
    FieldSpec {
        key: FieldKey::Email,
        kind: InputKind::Email,
        label: "Email",
        icon: "✉",
        placeholder: "your.email@example.com",
    },
    FieldSpec {
        key: FieldKey::Message,
        kind: InputKind::MultiLine { rows: 4 },
        label: "Message",
        icon: "💬",
        placeholder: "What would you like to discuss?",
    },
];

/// The request body posted to the form relay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Draft {
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Name => &self.name,
            FieldKey::Email => &self.email,
            FieldKey::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::Name => &mut self.name,
            FieldKey::Email => &mut self.email,
            FieldKey::Message => &mut self.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    /// The relay answered with a non-ok status. Blank when the body carried no message.
    Rejected(String),
    TransportFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Backspace,
    Clear,
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub draft: Draft,
    pub status: Status,
    pub error_message: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            draft: Draft::default(),
            status: Status::Idle,
            error_message: String::new(),
        }
    }

    pub fn edit(&mut self, key: FieldKey, op: EditOp) {
        if self.status == Status::Submitting {
            return;
        }

        let field = self.draft.field_mut(key);
        match op {
            EditOp::Insert(c) => field.push(c),
            EditOp::Backspace => {
                field.pop();
            }
            EditOp::Clear => field.clear(),
        }

        // A fresh edit leaves the terminal display state.
        if matches!(self.status, Status::Success | Status::Error) {
            self.status = Status::Idle;
        }
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.status != Status::Submitting
    }

    /// Keys that fail the required-field check, in schema order.
    pub fn missing_fields(&self) -> Vec<FieldKey> {
        CONTACT_FIELDS
            .iter()
            .map(|f| f.key)
            .filter(|&key| self.draft.get(key).trim().is_empty())
            .collect()
    }

    /// Enters `Submitting` and hands back the body to post, unless a request is
    /// already in flight or a required field is blank.
    pub fn begin_submit(&mut self) -> Option<Draft> {
        if !self.is_submit_enabled() || !self.missing_fields().is_empty() {
            return None;
        }
        self.status = Status::Submitting;
        self.error_message.clear();
        Some(self.draft.clone())
    }

    pub fn finish(&mut self, outcome: Outcome) {
        if self.status != Status::Submitting {
            log::warn!("Ignoring submission outcome outside of submitting state: {:?}", outcome);
            return;
        }

        match outcome {
            Outcome::Accepted => {
                self.status = Status::Success;
                self.draft = Draft::default();
            }
            Outcome::Rejected(message) => {
                self.status = Status::Error;
                self.error_message = if message.trim().is_empty() {
                    GENERIC_REJECTION.to_string()
                } else {
                    message
                };
            }
            Outcome::TransportFailed => {
                self.status = Status::Error;
                self.error_message = GENERIC_FAILURE.to_string();
            }
        }
    }
}

/// Couples a form's state with a single awaited delivery per submission.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub state: FormState,
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            state: FormState::new(),
        }
    }

    /// Returns `None` when the submission was refused before anything was sent.
    pub async fn submit(&mut self, relay: &dyn FormRelay) -> Option<Outcome> {
        let draft = self.state.begin_submit()?;
        let outcome = relay.deliver(&draft).await;
        self.state.finish(outcome.clone());
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeRelay {
        outcome: Outcome,
        seen: Mutex<Vec<Draft>>,
    }

    impl FakeRelay {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FormRelay for FakeRelay {
        async fn deliver(&self, draft: &Draft) -> Outcome {
            self.seen.lock().unwrap().push(draft.clone());
            self.outcome.clone()
        }
    }

    fn type_str(state: &mut FormState, key: FieldKey, text: &str) {
        for c in text.chars() {
            state.edit(key, EditOp::Insert(c));
        }
    }

    fn filled() -> FormState {
        let mut state = FormState::new();
        type_str(&mut state, FieldKey::Name, "Ada");
        type_str(&mut state, FieldKey::Email, "ada@example.com");
        type_str(&mut state, FieldKey::Message, "Hello there");
        state
    }

    #[test]
    fn test_initial_state() {
        let state = FormState::new();
        assert_eq!(state.draft, Draft::default());
        assert_eq!(state.status, Status::Idle);
        assert!(state.error_message.is_empty());
        assert!(state.is_submit_enabled());
    }

    #[test]
    fn test_field_echo_only_touches_its_key() {
        let mut state = FormState::new();
        type_str(&mut state, FieldKey::Email, "bob@exampel");
        state.edit(FieldKey::Email, EditOp::Backspace);
        state.edit(FieldKey::Email, EditOp::Backspace);
        state.edit(FieldKey::Email, EditOp::Backspace);
        type_str(&mut state, FieldKey::Email, "ple.com");

        assert_eq!(state.draft.email, "bob@example.com");
        assert_eq!(state.draft.name, "");
        assert_eq!(state.draft.message, "");

        state.edit(FieldKey::Email, EditOp::Clear);
        assert_eq!(state.draft.email, "");
    }

    #[test]
    fn test_backspace_on_empty_field_is_harmless() {
        let mut state = FormState::new();
        state.edit(FieldKey::Name, EditOp::Backspace);
        assert_eq!(state.draft.name, "");
    }

    #[test]
    fn test_multibyte_backspace() {
        let mut state = FormState::new();
        type_str(&mut state, FieldKey::Message, "héllo 👋");
        state.edit(FieldKey::Message, EditOp::Backspace);
        assert_eq!(state.draft.message, "héllo ");
    }

    #[test]
    fn test_begin_submit_requires_all_fields() {
        let mut state = FormState::new();
        type_str(&mut state, FieldKey::Name, "Ada");
        type_str(&mut state, FieldKey::Message, "   ");

        assert_eq!(state.missing_fields(), vec![FieldKey::Email, FieldKey::Message]);
        assert!(state.begin_submit().is_none());
        assert_eq!(state.status, Status::Idle);
    }

    #[test]
    fn test_begin_submit_guards_double_submission() {
        let mut state = filled();
        let draft = state.begin_submit().unwrap();
        assert_eq!(draft.name, "Ada");
        assert_eq!(state.status, Status::Submitting);
        assert!(!state.is_submit_enabled());

        assert!(state.begin_submit().is_none());
        assert_eq!(state.status, Status::Submitting);
    }

    #[test]
    fn test_edits_ignored_while_submitting() {
        let mut state = filled();
        state.begin_submit().unwrap();
        state.edit(FieldKey::Name, EditOp::Insert('!'));
        assert_eq!(state.draft.name, "Ada");
    }

    #[test]
    fn test_success_clears_draft() {
        let mut state = filled();
        state.begin_submit().unwrap();
        state.finish(Outcome::Accepted);

        assert_eq!(state.status, Status::Success);
        assert_eq!(state.draft, Draft::default());
        assert!(state.error_message.is_empty());
    }

    #[test]
    fn test_rejection_keeps_draft_and_message() {
        let mut state = filled();
        state.begin_submit().unwrap();
        state.finish(Outcome::Rejected("Too many requests".to_string()));

        assert_eq!(state.status, Status::Error);
        assert_eq!(state.error_message, "Too many requests");
        assert_eq!(state.draft.name, "Ada");
        assert_eq!(state.draft.message, "Hello there");
    }

    #[test]
    fn test_blank_rejection_uses_generic_message() {
        let mut state = filled();
        state.begin_submit().unwrap();
        state.finish(Outcome::Rejected(String::new()));
        assert_eq!(state.error_message, GENERIC_REJECTION);
    }

    #[test]
    fn test_transport_failure_keeps_draft() {
        let mut state = filled();
        state.begin_submit().unwrap();
        state.finish(Outcome::TransportFailed);

        assert_eq!(state.status, Status::Error);
        assert_eq!(state.error_message, GENERIC_FAILURE);
        assert_eq!(state.draft.email, "ada@example.com");
    }

    #[test]
    fn test_resubmit_from_error_clears_previous_message() {
        let mut state = filled();
        state.begin_submit().unwrap();
        state.finish(Outcome::TransportFailed);

        assert!(state.begin_submit().is_some());
        assert!(state.error_message.is_empty());
        assert_eq!(state.status, Status::Submitting);
    }

    #[test]
    fn test_finish_outside_submitting_is_ignored() {
        let mut state = filled();
        state.finish(Outcome::Accepted);
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.draft.name, "Ada");
    }

    #[test]
    fn test_edit_after_success_returns_to_idle() {
        let mut state = filled();
        state.begin_submit().unwrap();
        state.finish(Outcome::Accepted);
        state.edit(FieldKey::Name, EditOp::Insert('B'));
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.draft.name, "B");
    }

    #[test]
    fn test_edit_after_error_returns_to_idle_and_keeps_draft() {
        let mut state = filled();
        state.begin_submit().unwrap();
        state.finish(Outcome::TransportFailed);
        state.edit(FieldKey::Message, EditOp::Insert('!'));
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.draft.message, "Hello there!");
    }

    #[test]
    fn test_draft_serializes_to_relay_shape() {
        let draft = Draft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hi".to_string(),
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "Ada", "email": "ada@example.com", "message": "Hi"})
        );
    }

    #[test]
    fn test_schema_keys_are_unique_and_ordered() {
        let keys: Vec<&str> = CONTACT_FIELDS.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "email", "message"]);
        assert_eq!(CONTACT_FIELDS[2].kind, InputKind::MultiLine { rows: 4 });
    }

    #[tokio::test]
    async fn test_contact_form_success_sends_once() {
        let relay = FakeRelay::new(Outcome::Accepted);
        let mut form = ContactForm::new();
        form.state = filled();

        let outcome = form.submit(&relay).await;
        assert_eq!(outcome, Some(Outcome::Accepted));
        assert_eq!(form.state.status, Status::Success);
        assert_eq!(form.state.draft, Draft::default());

        let seen = relay.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "Hello there");
    }

    #[tokio::test]
    async fn test_contact_form_rejection() {
        let relay = FakeRelay::new(Outcome::Rejected("Too many requests".to_string()));
        let mut form = ContactForm::new();
        form.state = filled();

        form.submit(&relay).await;
        assert_eq!(form.state.status, Status::Error);
        assert_eq!(form.state.error_message, "Too many requests");
        assert_eq!(form.state.draft.name, "Ada");
    }

    #[tokio::test]
    async fn test_contact_form_refuses_blank_draft() {
        let relay = FakeRelay::new(Outcome::Accepted);
        let mut form = ContactForm::new();

        assert_eq!(form.submit(&relay).await, None);
        assert!(relay.seen.lock().unwrap().is_empty());
        assert_eq!(form.state.status, Status::Idle);
    }
}

//! Form definitions and the per-instance submission cycle.
//!
//! A [`FormDefinition`] knows how to mount empty state, validate it, and assemble the wire
//! payload. A [`FormInstance`] owns one mounted state and tracks the submission cycle:
//!
//! ```text
//! Idle -> Submitting -> Idle (state reset)          on success
//!                    -> Idle (state kept, error set) on failure
//!                    -> Idle (state kept)            when abandoned
//! ```
//!
//! [`FormInstance::submission`] wraps the cycle in a guard so a caller that is cancelled while
//! awaiting the backend cannot leave the instance stuck in `Submitting`.

use crate::checkbox::CheckboxGroup;
use crate::error::{FormError, FormResult};
use crate::form_state::FormState;
use crate::validation::ValidationErrors;
use chrono::NaiveDate;
use serde::Serialize;

/// Inputs to assembly that do not come from the form itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssembleContext {
    /// Calendar day used for derived dates and "not in the future" checks.
    pub today: NaiveDate,
    /// Therapist id of the signed-in user, if known.
    pub therapist_id: Option<u64>,
}

impl AssembleContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            therapist_id: None,
        }
    }

    pub fn with_therapist(mut self, therapist_id: Option<u64>) -> Self {
        self.therapist_id = therapist_id;
        self
    }
}

/// A form that assembles one backend payload.
pub trait FormDefinition {
    type Payload: Serialize;

    /// Collection path the payload is posted to, e.g. `/intakes`.
    const ENDPOINT: &'static str;

    /// Short name used in logs and CLI output.
    const NAME: &'static str;

    /// Checkbox groups rendered by this form.
    fn groups(&self) -> &[CheckboxGroup];

    /// Fresh state with every checkbox group bound.
    fn mount(&self) -> FormState {
        let mut state = FormState::new();
        for group in self.groups() {
            group.bind(&mut state);
        }
        state
    }

    fn validate(&self, state: &FormState, ctx: &AssembleContext) -> Result<(), ValidationErrors>;

    /// Builds the payload from state that already passed [`FormDefinition::validate`].
    fn build(&self, state: &FormState, ctx: &AssembleContext) -> FormResult<Self::Payload>;

    /// Validates then builds.
    fn assemble(&self, state: &FormState, ctx: &AssembleContext) -> FormResult<Self::Payload> {
        self.validate(state, ctx)?;
        self.build(state, ctx)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

/// One mounted form and its submission cycle.
#[derive(Debug)]
pub struct FormInstance<F: FormDefinition> {
    definition: F,
    state: FormState,
    phase: SubmissionPhase,
    last_error: Option<String>,
}

impl<F: FormDefinition> FormInstance<F> {
    pub fn mount(definition: F) -> Self {
        let state = definition.mount();
        Self {
            definition,
            state,
            phase: SubmissionPhase::Idle,
            last_error: None,
        }
    }

    pub fn definition(&self) -> &F {
        &self.definition
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True when the submit control would be enabled.
    pub fn is_valid(&self, ctx: &AssembleContext) -> bool {
        self.phase == SubmissionPhase::Idle && self.definition.validate(&self.state, ctx).is_ok()
    }

    /// Assembles the payload and moves to `Submitting`.
    ///
    /// Validation failures leave the instance `Idle` with its state untouched.
    pub fn begin_submit(&mut self, ctx: &AssembleContext) -> FormResult<F::Payload> {
        if self.phase == SubmissionPhase::Submitting {
            return Err(FormError::SubmissionInProgress);
        }
        let payload = self.definition.assemble(&self.state, ctx)?;
        self.phase = SubmissionPhase::Submitting;
        self.last_error = None;
        Ok(payload)
    }

    /// Success: back to `Idle` with freshly mounted state.
    pub fn finish_success(&mut self) {
        self.state = self.definition.mount();
        self.phase = SubmissionPhase::Idle;
        self.last_error = None;
    }

    /// Failure: back to `Idle` keeping the user's input.
    pub fn finish_failure(&mut self, message: impl Into<String>) {
        self.phase = SubmissionPhase::Idle;
        self.last_error = Some(message.into());
    }

    /// Starts a guarded submission. Dropping the guard without settling it returns the
    /// instance to `Idle` with its input kept.
    pub fn submission(&mut self, ctx: &AssembleContext) -> FormResult<Submission<'_, F>> {
        let payload = self.begin_submit(ctx)?;
        Ok(Submission {
            form: self,
            payload,
            settled: false,
        })
    }

    /// User-initiated reset.
    pub fn reset(&mut self) {
        if self.phase == SubmissionPhase::Idle {
            self.state = self.definition.mount();
            self.last_error = None;
        }
    }
}

/// An in-flight submission holding the assembled payload.
pub struct Submission<'a, F: FormDefinition> {
    form: &'a mut FormInstance<F>,
    payload: F::Payload,
    settled: bool,
}

impl<F: FormDefinition> Submission<'_, F> {
    pub fn payload(&self) -> &F::Payload {
        &self.payload
    }

    pub fn succeed(mut self) {
        self.form.finish_success();
        self.settled = true;
    }

    pub fn fail(mut self, message: impl Into<String>) {
        self.form.finish_failure(message);
        self.settled = true;
    }
}

impl<F: FormDefinition> Drop for Submission<'_, F> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!(form = F::NAME, "submission abandoned");
            self.form.phase = SubmissionPhase::Idle;
        }
    }
}

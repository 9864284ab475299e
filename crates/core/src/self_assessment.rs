//! Therapist self-assessment form.
//!
//! Only a handful of columns exist server-side; the reflection answers and group selections travel
//! together as a JSON document in `notes`.

use crate::checkbox::CheckboxGroup;
use crate::constants::{SELF_ASSESSMENT_GROUPS, SELF_ASSESSMENT_QUESTIONS};
use crate::dates::parse_ymd;
use crate::error::{FormError, FormResult};
use crate::form::{AssembleContext, FormDefinition};
use crate::form_state::FormState;
use crate::normalize::text_field;
use crate::validation::{parse_id, ValidationErrors, Validator};
use chrono::NaiveDate;
use serde::Serialize;

pub const PATIENT_ID: &str = "patientId";
pub const THERAPIST_ID: &str = "therapistId";
pub const DATE_OF_SESSION: &str = "dateOfSession";
pub const OTHER_MINDFULNESS: &str = "otherMindfulness";
pub const OTHER_PRANAYAMA: &str = "otherPranayama";

/// Field holding the answer to reflection question `index`.
pub fn question_field(index: usize) -> String {
    format!("q{index}")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReflectionAnswer {
    pub question: String,
    pub answer: String,
}

/// Document stored in the `notes` column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfAssessmentNotes {
    pub answers: Vec<ReflectionAnswer>,
    pub koshas: Vec<String>,
    pub asana: Vec<String>,
    pub mindfulness: Vec<String>,
    pub kleshas: Vec<String>,
    pub chakras: Vec<String>,
    pub pranayama: Vec<String>,
    pub other_mindfulness: String,
    pub other_pranayama: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfAssessmentPayload {
    pub date_of_session: NaiveDate,
    pub goal_of_session: String,
    pub assessment: String,
    pub patient_id: u64,
    pub therapist_id: u64,
    /// [`SelfAssessmentNotes`] as a JSON string.
    pub notes: String,
}

#[derive(Clone, Debug)]
pub struct SelfAssessmentForm {
    groups: Vec<CheckboxGroup>,
}

impl SelfAssessmentForm {
    pub fn new() -> FormResult<Self> {
        let groups = SELF_ASSESSMENT_GROUPS
            .iter()
            .map(|(prefix, title, options)| CheckboxGroup::new(*title, *prefix, options))
            .collect::<FormResult<Vec<_>>>()?;
        Ok(Self { groups })
    }

    fn selected(&self, prefix: &str, state: &FormState) -> Vec<String> {
        self.groups
            .iter()
            .find(|g| g.name_prefix() == prefix)
            .map(|g| g.selected(state))
            .unwrap_or_default()
    }

    pub fn notes(&self, state: &FormState) -> SelfAssessmentNotes {
        SelfAssessmentNotes {
            answers: SELF_ASSESSMENT_QUESTIONS
                .iter()
                .enumerate()
                .map(|(i, question)| ReflectionAnswer {
                    question: question.to_string(),
                    answer: text_field(state, &question_field(i)),
                })
                .collect(),
            koshas: self.selected("koshas", state),
            asana: self.selected("asana", state),
            mindfulness: self.selected("mindfulness", state),
            kleshas: self.selected("kleshas", state),
            chakras: self.selected("chakras", state),
            pranayama: self.selected("pranayama", state),
            other_mindfulness: text_field(state, OTHER_MINDFULNESS),
            other_pranayama: text_field(state, OTHER_PRANAYAMA),
        }
    }
}

impl FormDefinition for SelfAssessmentForm {
    type Payload = SelfAssessmentPayload;

    const ENDPOINT: &'static str = "/self-assessments";
    const NAME: &'static str = "self-assessment";

    fn groups(&self) -> &[CheckboxGroup] {
        &self.groups
    }

    fn validate(&self, state: &FormState, ctx: &AssembleContext) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(state);
        v.selected_id(PATIENT_ID, "Please pick a patient from the list.")
            .required(DATE_OF_SESSION, "Date of session is required")
            .date(DATE_OF_SESSION);
        if parse_id(state, THERAPIST_ID).or(ctx.therapist_id).is_none() {
            v.push(THERAPIST_ID, "Therapist is required");
        }
        v.finish()
    }

    fn build(&self, state: &FormState, ctx: &AssembleContext) -> FormResult<SelfAssessmentPayload> {
        let patient_id = parse_id(state, PATIENT_ID)
            .ok_or_else(|| FormError::InvalidInput("patient is required".into()))?;
        let therapist_id = parse_id(state, THERAPIST_ID)
            .or(ctx.therapist_id)
            .ok_or_else(|| FormError::InvalidInput("therapist is required".into()))?;
        let date_of_session = parse_ymd(state.text_trimmed(DATE_OF_SESSION).unwrap_or_default())?;
        let notes =
            serde_json::to_string(&self.notes(state)).map_err(FormError::Serialization)?;

        Ok(SelfAssessmentPayload {
            date_of_session,
            goal_of_session: text_field(state, &question_field(0)),
            assessment: text_field(state, &question_field(1)),
            patient_id,
            therapist_id,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AssembleContext {
        AssembleContext::new(parse_ymd("2025-06-14").unwrap())
    }

    fn filled(form: &SelfAssessmentForm) -> FormState {
        let mut state = form.mount();
        state.set_text(PATIENT_ID, "12");
        state.set_text(DATE_OF_SESSION, "2025-06-10");
        state.set_text("q0", "Calm focus");
        state.set_text("q1", "Responded well");
        state
    }

    #[test]
    fn binds_all_six_groups() {
        let form = SelfAssessmentForm::new().unwrap();
        let state = form.mount();
        assert_eq!(state.groups().count(), 6);
        assert_eq!(state.group("chakras").unwrap().keys().count(), 7);
    }

    #[test]
    fn notes_carry_answers_and_selections() {
        let form = SelfAssessmentForm::new().unwrap();
        let mut state = filled(&form);
        state.set_checked("chakras.Third-Eye", true).unwrap();
        state.set_checked("chakras.Root", true).unwrap();
        state.set_checked("mindfulness.Other", true).unwrap();
        state.set_text(OTHER_MINDFULNESS, "Body scan");

        let payload = form
            .assemble(&state, &ctx().with_therapist(Some(5)))
            .unwrap();
        assert_eq!(payload.goal_of_session, "Calm focus");
        assert_eq!(payload.assessment, "Responded well");
        assert_eq!(payload.therapist_id, 5);

        let notes: serde_json::Value = serde_json::from_str(&payload.notes).unwrap();
        assert_eq!(notes["chakras"], serde_json::json!(["Root", "Third-Eye"]));
        assert_eq!(notes["mindfulness"], serde_json::json!(["Other"]));
        assert_eq!(notes["otherMindfulness"], "Body scan");
        assert_eq!(notes["answers"].as_array().unwrap().len(), 8);
        assert_eq!(notes["answers"][2]["answer"], "");
    }

    #[test]
    fn therapist_has_no_silent_default() {
        let form = SelfAssessmentForm::new().unwrap();
        let errors = form.validate(&filled(&form), &ctx()).unwrap_err();
        assert_eq!(errors.message_for(THERAPIST_ID), Some("Therapist is required"));
    }
}

//! Client intake form.
//!
//! The intake form creates the patient and their first intake record in one `POST /intakes`.
//! It carries four checkbox groups (styles, goals, interests, physical history) and a set of
//! personal and contact fields.

use crate::checkbox::CheckboxGroup;
use crate::constants::{
    ACTIVITY_LEVELS, GOALS_GROUP, INTERESTS_GROUP, MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN,
    MEDICATIONS_KEY, PHYSICAL_HISTORY, PHYSICAL_HISTORY_GROUP, PRACTICE_FREQUENCIES,
    STRESS_LEVEL_MAX, STRESS_LEVEL_MIN, STYLES_GROUP, US_STATES, YOGA_GOALS, YOGA_INTERESTS,
    YOGA_STYLES,
};
use crate::dates::parse_ymd;
use crate::error::{FormError, FormResult};
use crate::form::{AssembleContext, FormDefinition};
use crate::form_state::FormState;
use crate::normalize::{
    choice_field, date_field, phone_field, required_text, text_field, trimmed_field,
};
use crate::validation::{parse_id, ValidationErrors, Validator};
use chrono::NaiveDate;
use pies_types::{NonEmptyText, ZipCode};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field names bound by the intake form.
pub mod fields {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const DOB: &str = "dob";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const ZIP_CODE: &str = "zipCode";
    pub const HOME_PHONE: &str = "homePhone";
    pub const CELL_PHONE: &str = "cellPhone";
    pub const WORK_PHONE: &str = "workPhone";
    pub const EMAIL: &str = "email";
    pub const EMERGENCY_CONTACT_NAME: &str = "emergencyContactName";
    pub const EMERGENCY_CONTACT_PHONE: &str = "emergencyContactPhone";
    pub const REFERRED_BY: &str = "referredBy";
    pub const THERAPIST_ID: &str = "therapistId";
    pub const PRACTICED_BEFORE: &str = "practicedBefore";
    pub const LAST_PRACTICE_DATE: &str = "lastPracticeDate";
    pub const PRACTICE_FREQUENCY: &str = "practiceFrequency";
    pub const GOALS_OTHER: &str = "goalsOther";
    pub const GOAL_EXPLANATION: &str = "goalExplanation";
    pub const INTERESTS_OTHER: &str = "interestsOther";
    pub const ACTIVITY_LEVEL: &str = "activityLevel";
    pub const STRESS_LEVEL: &str = "stressLevel";
    pub const OTHER_CONDITIONS: &str = "otherConditionsExplanation";
    pub const MEDICATIONS: &str = "medications";
    pub const ADDITIONAL_DETAILS: &str = "additionalDetails";
    pub const PREGNANCY_EDD: &str = "pregnancyEdd";
}

use fields::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub first_name: NonEmptyText,
    pub last_name: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub city: String,
    /// Two-letter code.
    pub state: String,
    pub zip_code: String,
    pub email: String,
    pub home_phone_number: String,
    pub cell_phone_number: String,
    pub work_phone_number: String,
    pub emergency_contact_name: NonEmptyText,
    pub emergency_contact_phone: String,
    pub referred_by: String,
    pub date_created: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthHistoryPayload {
    /// One explicit flag per known condition key.
    #[serde(flatten)]
    pub conditions: BTreeMap<String, bool>,
    pub medications_list: String,
    pub additional_notes: String,
    pub pregnancy_edd: Option<NaiveDate>,
    pub other_conditions_explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakePayload {
    pub patient: PatientPayload,
    pub therapist_id: u64,
    pub intake_date: NaiveDate,
    pub practiced_yoga_before: bool,
    pub last_practiced_date: Option<NaiveDate>,
    pub yoga_frequency: Option<String>,
    pub yoga_styles: Vec<String>,
    /// Kept for backend compatibility; the form has no free-text style input.
    pub yoga_style_other: String,
    pub yoga_goals: Vec<String>,
    pub yoga_goals_other: String,
    pub yoga_goals_explanation: String,
    pub yoga_interests: Vec<String>,
    pub yoga_interests_other: String,
    pub activity_level: Option<String>,
    pub stress_level: Option<u8>,
    pub health_history: HealthHistoryPayload,
}

const STYLES: usize = 0;
const GOALS: usize = 1;
const INTERESTS: usize = 2;
const PHYSICAL: usize = 3;

#[derive(Clone, Debug)]
pub struct IntakeForm {
    groups: [CheckboxGroup; 4],
}

impl IntakeForm {
    pub fn new() -> FormResult<Self> {
        Ok(Self {
            groups: [
                CheckboxGroup::new(
                    "Style(s) of yoga practiced most frequently: (select all that apply)",
                    STYLES_GROUP,
                    YOGA_STYLES,
                )?,
                CheckboxGroup::new("Goals / Expectations", GOALS_GROUP, YOGA_GOALS)?,
                CheckboxGroup::new("Personal Yoga Interests", INTERESTS_GROUP, YOGA_INTERESTS)?,
                CheckboxGroup::new("Physical History", PHYSICAL_HISTORY_GROUP, PHYSICAL_HISTORY)?,
            ],
        })
    }

    /// Every health-history condition key, in form order.
    pub fn condition_keys(&self) -> impl Iterator<Item = &str> {
        self.groups[PHYSICAL].options().keys()
    }

    fn health_history(&self, state: &FormState) -> HealthHistoryPayload {
        let group = state.group(PHYSICAL_HISTORY_GROUP);
        let mut conditions: BTreeMap<String, bool> = self
            .condition_keys()
            .map(|key| (key.to_string(), group.is_some_and(|g| g.is_checked(key))))
            .collect();

        let medications_list = text_field(state, MEDICATIONS);
        if !medications_list.trim().is_empty() {
            conditions.insert(MEDICATIONS_KEY.to_string(), true);
        }

        HealthHistoryPayload {
            conditions,
            medications_list,
            additional_notes: text_field(state, ADDITIONAL_DETAILS),
            pregnancy_edd: date_field(state, PREGNANCY_EDD),
            other_conditions_explanation: text_field(state, OTHER_CONDITIONS),
        }
    }
}

impl FormDefinition for IntakeForm {
    type Payload = IntakePayload;

    const ENDPOINT: &'static str = "/intakes";
    const NAME: &'static str = "intake";

    fn groups(&self) -> &[CheckboxGroup] {
        &self.groups
    }

    fn validate(&self, state: &FormState, ctx: &AssembleContext) -> Result<(), ValidationErrors> {
        let state_codes: Vec<&str> = US_STATES.iter().map(|(code, _)| *code).collect();

        Validator::new(state)
            .required(FIRST_NAME, "First name is required")
            .max_len(FIRST_NAME, MAX_NAME_LEN)
            .required(LAST_NAME, "Last name is required")
            .max_len(LAST_NAME, MAX_NAME_LEN)
            .required(DOB, "Date of birth is required")
            .date_not_after(DOB, ctx.today, "DOB cannot be in the future")
            .required(ADDRESS, "Address is required")
            .max_len(ADDRESS, MAX_ADDRESS_LEN)
            .required(CITY, "City is required")
            .max_len(CITY, MAX_NAME_LEN)
            .required(STATE, "State is required")
            .one_of(STATE, &state_codes, "Select a US state")
            .zip_code(ZIP_CODE)
            .phone(HOME_PHONE, None)
            .phone(CELL_PHONE, None)
            .phone(WORK_PHONE, None)
            .email(EMAIL)
            .required(EMERGENCY_CONTACT_NAME, "Emergency contact name is required")
            .max_len(EMERGENCY_CONTACT_NAME, MAX_NAME_LEN)
            .phone(
                EMERGENCY_CONTACT_PHONE,
                Some("Emergency contact phone is required"),
            )
            .selected_id(THERAPIST_ID, "Therapist is required")
            .one_of(PRACTICED_BEFORE, &["yes", "no"], "Answer yes or no")
            .date_not_after(LAST_PRACTICE_DATE, ctx.today, "Date cannot be in the future")
            .one_of(PRACTICE_FREQUENCY, PRACTICE_FREQUENCIES, "Pick daily, weekly or monthly")
            .one_of(ACTIVITY_LEVEL, ACTIVITY_LEVELS, "Invalid activity level")
            .integer_in_range(
                STRESS_LEVEL,
                STRESS_LEVEL_MIN.into(),
                STRESS_LEVEL_MAX.into(),
                "Pick 1-10",
            )
            .max_len(OTHER_CONDITIONS, MAX_NOTE_LEN)
            .max_len(MEDICATIONS, MAX_NOTE_LEN)
            .max_len(ADDITIONAL_DETAILS, MAX_NOTE_LEN)
            .max_len(GOAL_EXPLANATION, MAX_NOTE_LEN)
            .date(PREGNANCY_EDD)
            .finish()
    }

    fn build(&self, state: &FormState, ctx: &AssembleContext) -> FormResult<IntakePayload> {
        let date_of_birth = parse_ymd(state.text_trimmed(DOB).unwrap_or_default())?;
        let therapist_id = parse_id(state, THERAPIST_ID)
            .ok_or_else(|| FormError::InvalidInput("therapist is required".into()))?;
        let zip_code = ZipCode::from_input(state.text(ZIP_CODE).unwrap_or_default())
            .map_err(|e| FormError::InvalidInput(format!("zip code: {e}")))?;

        let practiced = state.text_trimmed(PRACTICED_BEFORE) == Some("yes");
        let stress_level = state
            .text_trimmed(STRESS_LEVEL)
            .and_then(|v| v.parse::<u8>().ok());

        let patient = PatientPayload {
            first_name: required_text(state, FIRST_NAME)?,
            last_name: required_text(state, LAST_NAME)?,
            date_of_birth,
            address: trimmed_field(state, ADDRESS),
            city: trimmed_field(state, CITY),
            state: trimmed_field(state, STATE),
            zip_code: zip_code.as_str().to_string(),
            email: trimmed_field(state, EMAIL),
            home_phone_number: phone_field(state, HOME_PHONE),
            cell_phone_number: phone_field(state, CELL_PHONE),
            work_phone_number: phone_field(state, WORK_PHONE),
            emergency_contact_name: required_text(state, EMERGENCY_CONTACT_NAME)?,
            emergency_contact_phone: phone_field(state, EMERGENCY_CONTACT_PHONE),
            referred_by: trimmed_field(state, REFERRED_BY),
            date_created: ctx.today,
        };

        Ok(IntakePayload {
            patient,
            therapist_id,
            intake_date: ctx.today,
            practiced_yoga_before: practiced,
            last_practiced_date: practiced
                .then(|| date_field(state, LAST_PRACTICE_DATE))
                .flatten(),
            yoga_frequency: practiced
                .then(|| choice_field(state, PRACTICE_FREQUENCY))
                .flatten(),
            yoga_styles: self.groups[STYLES].selected(state),
            yoga_style_other: String::new(),
            yoga_goals: self.groups[GOALS].selected(state),
            yoga_goals_other: text_field(state, GOALS_OTHER),
            yoga_goals_explanation: text_field(state, GOAL_EXPLANATION),
            yoga_interests: self.groups[INTERESTS].selected(state),
            yoga_interests_other: text_field(state, INTERESTS_OTHER),
            activity_level: choice_field(state, ACTIVITY_LEVEL),
            stress_level,
            health_history: self.health_history(state),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormInstance, SubmissionPhase};
    use serde_json::json;

    fn today() -> NaiveDate {
        parse_ymd("2025-06-14").unwrap()
    }

    fn ctx() -> AssembleContext {
        AssembleContext::new(today())
    }

    fn filled(form: &IntakeForm) -> FormState {
        let mut state = form.mount();
        for (field, value) in [
            (FIRST_NAME, "Sarah"),
            (LAST_NAME, "Williams"),
            (DOB, "2000-06-15"),
            (ADDRESS, "1 Main St"),
            (CITY, "Springfield"),
            (STATE, "IL"),
            (ZIP_CODE, "12345-"),
            (CELL_PHONE, "(555) 555-1234"),
            (EMERGENCY_CONTACT_NAME, "Tom Williams"),
            (EMERGENCY_CONTACT_PHONE, "(555) 555-9876"),
            (THERAPIST_ID, "3"),
        ] {
            state.set_text(field, value);
        }
        state
    }

    #[test]
    fn normalises_contact_fields() {
        let form = IntakeForm::new().unwrap();
        let payload = form.assemble(&filled(&form), &ctx()).unwrap();

        assert_eq!(payload.patient.cell_phone_number, "5555551234");
        assert_eq!(payload.patient.emergency_contact_phone, "5555559876");
        assert_eq!(payload.patient.home_phone_number, "");
        assert_eq!(payload.patient.zip_code, "12345");
        assert_eq!(payload.therapist_id, 3);
        assert_eq!(payload.intake_date, today());
    }

    #[test]
    fn overlong_phone_input_is_capped_at_ten_digits() {
        let form = IntakeForm::new().unwrap();
        let mut state = filled(&form);
        state.set_text(CELL_PHONE, "(555) 555-123499");
        state.set_text(EMERGENCY_CONTACT_PHONE, "555-555-98761234");
        state.set_text(WORK_PHONE, "555.555.4321 x99");

        let patient = form.assemble(&state, &ctx()).unwrap().patient;
        assert_eq!(patient.cell_phone_number, "5555551234");
        assert_eq!(patient.emergency_contact_phone, "5555559876");
        assert_eq!(patient.work_phone_number, "5555554321");
    }

    #[test]
    fn text_fields_are_sent_trimmed() {
        let form = IntakeForm::new().unwrap();
        let mut state = filled(&form);
        state.set_text(FIRST_NAME, "  Sarah ");
        state.set_text(ADDRESS, " 1 Main St  ");
        state.set_text(CITY, "Springfield ");
        state.set_text(EMERGENCY_CONTACT_NAME, " Tom Williams");
        state.set_text(REFERRED_BY, "  Dr. Lee ");

        let patient = form.assemble(&state, &ctx()).unwrap().patient;
        assert_eq!(patient.first_name.as_str(), "Sarah");
        assert_eq!(patient.address, "1 Main St");
        assert_eq!(patient.city, "Springfield");
        assert_eq!(patient.emergency_contact_name.as_str(), "Tom Williams");
        assert_eq!(patient.referred_by, "Dr. Lee");
    }

    #[test]
    fn every_condition_key_is_present_when_nothing_is_checked() {
        let form = IntakeForm::new().unwrap();
        let payload = form.assemble(&filled(&form), &ctx()).unwrap();
        let history = &payload.health_history.conditions;

        assert_eq!(history.len(), 21);
        for key in form.condition_keys() {
            assert_eq!(history.get(key), Some(&false), "missing {key}");
        }
    }

    #[test]
    fn medication_text_sets_the_medications_flag() {
        let form = IntakeForm::new().unwrap();
        let mut state = filled(&form);
        state.set_text(MEDICATIONS, "Ibuprofen");
        state.set_checked("physicalHistory.asthma", true).unwrap();

        let history = form.assemble(&state, &ctx()).unwrap().health_history;
        assert_eq!(history.conditions.get("medications"), Some(&true));
        assert_eq!(history.conditions.get("asthma"), Some(&true));
        assert_eq!(history.medications_list, "Ibuprofen");
    }

    #[test]
    fn selections_follow_option_order() {
        let form = IntakeForm::new().unwrap();
        let mut state = filled(&form);
        state.set_checked("styles.Yin", true).unwrap();
        state.set_checked("styles.Vinyasa/Flow", true).unwrap();
        state.set_checked("styles.Hatha", true).unwrap();
        state.set_checked("styles.Jazzercise", true).unwrap();

        let payload = form.assemble(&state, &ctx()).unwrap();
        assert_eq!(payload.yoga_styles, vec!["Hatha", "Vinyasa/Flow", "Yin"]);
    }

    #[test]
    fn missing_therapist_blocks_assembly() {
        let form = IntakeForm::new().unwrap();
        let mut state = filled(&form);
        state.set_text(THERAPIST_ID, "");

        match form.assemble(&state, &ctx()) {
            Err(FormError::Validation(errors)) => {
                assert_eq!(errors.message_for(THERAPIST_ID), Some("Therapist is required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn practice_details_only_sent_when_practiced_before() {
        let form = IntakeForm::new().unwrap();
        let mut state = filled(&form);
        state.set_text(PRACTICED_BEFORE, "no");
        state.set_text(LAST_PRACTICE_DATE, "2024-01-01");
        state.set_text(PRACTICE_FREQUENCY, "weekly");

        let payload = form.assemble(&state, &ctx()).unwrap();
        assert!(!payload.practiced_yoga_before);
        assert_eq!(payload.last_practiced_date, None);
        assert_eq!(payload.yoga_frequency, None);

        state.set_text(PRACTICED_BEFORE, "yes");
        let payload = form.assemble(&state, &ctx()).unwrap();
        assert_eq!(payload.last_practiced_date, parse_ymd("2024-01-01").ok());
        assert_eq!(payload.yoga_frequency.as_deref(), Some("weekly"));
    }

    #[test]
    fn serialises_to_backend_schema() {
        let form = IntakeForm::new().unwrap();
        let mut state = filled(&form);
        state.set_checked("goals.Other", true).unwrap();
        state.set_text(GOALS_OTHER, "Sleep better");

        let payload = form.assemble(&state, &ctx()).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["patient"]["dateOfBirth"], json!("2000-06-15"));
        assert_eq!(value["patient"]["zipCode"], json!("12345"));
        assert_eq!(value["patient"]["firstName"], json!("Sarah"));
        assert_eq!(value["yogaGoals"], json!(["Other"]));
        assert_eq!(value["yogaGoalsOther"], json!("Sleep better"));
        assert_eq!(value["stressLevel"], json!(null));
        assert_eq!(value["lastPracticedDate"], json!(null));
        assert_eq!(value["healthHistory"]["asthma"], json!(false));
        assert_eq!(value["healthHistory"]["pregnancyEdd"], json!(null));
        assert_eq!(value["healthHistory"]["additionalNotes"], json!(""));
    }

    #[test]
    fn rejects_bad_contact_input() {
        let form = IntakeForm::new().unwrap();
        let mut state = filled(&form);
        state.set_text(ZIP_CODE, "123");
        state.set_text(STATE, "ZZ");
        state.set_text(STRESS_LEVEL, "0");
        state.set_text(DOB, "2025-06-15");

        let errors = form.validate(&state, &ctx()).unwrap_err();
        assert_eq!(errors.message_for(ZIP_CODE), Some("Use exactly 5 digits"));
        assert_eq!(errors.message_for(STATE), Some("Select a US state"));
        assert_eq!(errors.message_for(STRESS_LEVEL), Some("Pick 1-10"));
        assert_eq!(errors.message_for(DOB), Some("DOB cannot be in the future"));
    }

    #[test]
    fn successful_submit_resets_the_instance() {
        let form = IntakeForm::new().unwrap();
        let state = filled(&form);
        let mut instance = FormInstance::mount(form);
        instance.state_mut().merge(state);
        assert!(instance.is_valid(&ctx()));

        instance.begin_submit(&ctx()).unwrap();
        assert!(matches!(
            instance.begin_submit(&ctx()),
            Err(FormError::SubmissionInProgress)
        ));
        instance.finish_success();

        assert!(instance.state().is_pristine());
        assert_eq!(instance.state().group(STYLES_GROUP).unwrap().keys().count(), 12);
    }

    #[test]
    fn failed_submit_keeps_input() {
        let form = IntakeForm::new().unwrap();
        let state = filled(&form);
        let mut instance = FormInstance::mount(form);
        instance.state_mut().merge(state);

        instance.begin_submit(&ctx()).unwrap();
        instance.finish_failure("Duplicate email");

        assert_eq!(instance.last_error(), Some("Duplicate email"));
        assert_eq!(instance.state().text(FIRST_NAME), Some("Sarah"));
    }

    #[test]
    fn abandoned_submission_returns_to_idle() {
        let form = IntakeForm::new().unwrap();
        let state = filled(&form);
        let mut instance = FormInstance::mount(form);
        instance.state_mut().merge(state);

        {
            let submission = instance.submission(&ctx()).unwrap();
            assert_eq!(submission.payload().therapist_id, 3);
        }

        assert_eq!(instance.phase(), SubmissionPhase::Idle);
        assert_eq!(instance.last_error(), None);
        assert_eq!(instance.state().text(FIRST_NAME), Some("Sarah"));
        assert!(instance.submission(&ctx()).is_ok());
    }

    #[test]
    fn settled_submission_reports_failure() {
        let form = IntakeForm::new().unwrap();
        let state = filled(&form);
        let mut instance = FormInstance::mount(form);
        instance.state_mut().merge(state);

        instance.submission(&ctx()).unwrap().fail("Duplicate email");

        assert_eq!(instance.phase(), SubmissionPhase::Idle);
        assert_eq!(instance.last_error(), Some("Duplicate email"));
        assert_eq!(instance.state().text(CITY), Some("Springfield"));
    }
}

use crate::{ClientConfig, ClientError, ClientResult};
use pies_core::dates::{Clock, SystemClock};
use pies_core::notes::{merge_newest_first, NoteKind, NoteSummary};
use pies_core::records::{
    IntakeRecord, LoginRequest, LoginResponse, Page, PatientSummary, Profile, SimpleResponse,
    TherapistOption, TherapistRecord,
};
use pies_core::{
    AssembleContext, FormDefinition, FormInstance, Session, SessionState, SoapAutofill,
    TherapistEdit,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Page size used when loading full lists for pickers and the notes feed.
const LIST_PAGE_SIZE: u32 = 500;
const NOTES_PAGE_SIZE: u32 = 100;

#[derive(Debug)]
struct TherapistCache {
    token: String,
    therapists: Vec<TherapistOption>,
}

/// REST client for the PIES backend.
pub struct PiesClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionState>,
    clock: Arc<dyn Clock>,
    active_therapists: Mutex<Option<TherapistCache>>,
}

impl PiesClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionState>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            session,
            clock: Arc::new(SystemClock),
            active_therapists: Mutex::new(None),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Assembly inputs for the current session and day.
    pub fn context(&self) -> AssembleContext {
        AssembleContext::new(self.clock.today()).with_therapist(self.session.therapist_id())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends and returns the response when it is a success, otherwise the interpreted error.
    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        tracing::debug!(status = %status, url = %response.url(), "response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.map_err(ClientError::Transport)?;
        Err(ClientError::from_response_body(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &'static str,
    ) -> ClientResult<T> {
        let body = self
            .send(builder)
            .await?
            .text()
            .await
            .map_err(ClientError::Transport)?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            what,
            message: e.to_string(),
        })
    }

    /// Like [`Self::send_json`] but an empty body decodes as `null`.
    async fn send_value(&self, builder: RequestBuilder) -> ClientResult<Value> {
        let body = self
            .send(builder)
            .await?
            .text()
            .await
            .map_err(ClientError::Transport)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            what: "response",
            message: e.to_string(),
        })
    }

    // Session

    /// Logs in and stores the session. The therapist id is looked up from `/auth/me` when the
    /// backend provides it.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let builder = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { username, password });
        let resp: LoginResponse = self.send_json(builder, "login response").await?;
        self.session.login(resp.token, resp.role)?;
        *self.active_therapists.lock().await = None;

        match self.me().await {
            Ok(profile) => self.session.set_therapist_id(profile.id)?,
            Err(e) => tracing::warn!(error = %e, "could not load profile after login"),
        }
        self.session.current().ok_or(ClientError::NotLoggedIn)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.session.logout()?;
        *self.active_therapists.lock().await = None;
        Ok(())
    }

    pub async fn me(&self) -> ClientResult<Profile> {
        if !self.session.is_logged_in() {
            return Err(ClientError::NotLoggedIn);
        }
        self.send_json(self.request(Method::GET, "/auth/me"), "profile")
            .await
    }

    // Forms

    /// Runs one submission cycle for `form`.
    ///
    /// Validation failures return before any request is made. On success the form is reset to
    /// its mounted state; on failure its input is kept and the message recorded. If this future
    /// is dropped mid-request the form returns to `Idle` with its input kept.
    pub async fn submit<F: FormDefinition>(&self, form: &mut FormInstance<F>) -> ClientResult<Value> {
        let submission = form.submission(&self.context())?;
        let builder = self
            .request(Method::POST, F::ENDPOINT)
            .json(submission.payload());

        match self.send_value(builder).await {
            Ok(created) => {
                submission.succeed();
                tracing::info!(form = F::NAME, "submitted");
                Ok(created)
            }
            Err(e) => {
                submission.fail(e.to_string());
                tracing::warn!(form = F::NAME, error = %e, "submission failed");
                Err(e)
            }
        }
    }

    // Patients

    pub async fn list_patients(&self, page: u32, size: u32) -> ClientResult<Page<PatientSummary>> {
        let path = format!("/patients?page={page}&size={size}");
        self.send_json(self.request(Method::GET, &path), "patient page")
            .await
    }

    /// Every patient, for pickers.
    pub async fn all_patients(&self) -> ClientResult<Vec<PatientSummary>> {
        Ok(self.list_patients(0, LIST_PAGE_SIZE).await?.into_content())
    }

    pub async fn delete_patient(&self, id: u64) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, &format!("/patients/{id}")))
            .await?;
        tracing::info!(patient_id = id, "deleted patient");
        Ok(())
    }

    // Therapists

    /// Active therapists, fetched once per session token.
    pub async fn active_therapists(&self) -> ClientResult<Vec<TherapistOption>> {
        let Some(token) = self.session.token() else {
            return self
                .send_json(self.request(Method::GET, "/therapists/active"), "therapist list")
                .await;
        };

        let mut cache = self.active_therapists.lock().await;
        if let Some(cached) = cache.as_ref().filter(|c| c.token == token) {
            return Ok(cached.therapists.clone());
        }
        let therapists: Vec<TherapistOption> = self
            .send_json(self.request(Method::GET, "/therapists/active"), "therapist list")
            .await?;
        *cache = Some(TherapistCache {
            token,
            therapists: therapists.clone(),
        });
        Ok(therapists)
    }

    pub async fn list_therapists(&self, page: u32, size: u32) -> ClientResult<Page<TherapistRecord>> {
        let path = format!("/therapists?page={page}&size={size}");
        self.send_json(self.request(Method::GET, &path), "therapist page")
            .await
    }

    pub async fn get_therapist(&self, id: u64) -> ClientResult<TherapistRecord> {
        self.send_json(
            self.request(Method::GET, &format!("/therapists/{id}")),
            "therapist",
        )
        .await
    }

    /// Sends `edit` as the signed-in user; see [`TherapistEdit::payload`].
    pub async fn update_therapist(&self, id: u64, edit: &TherapistEdit) -> ClientResult<SimpleResponse> {
        let payload = edit.payload(self.session.role());
        let builder = self
            .request(Method::PUT, &format!("/therapists/{id}"))
            .json(&payload);
        let resp: SimpleResponse = self.send_json(builder, "update response").await?;
        *self.active_therapists.lock().await = None;
        tracing::info!(therapist_id = id, "updated therapist");
        Ok(resp)
    }

    pub async fn delete_therapist(&self, id: u64) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, &format!("/therapists/{id}")))
            .await?;
        *self.active_therapists.lock().await = None;
        tracing::info!(therapist_id = id, "deleted therapist");
        Ok(())
    }

    // Records

    pub async fn get_intake(&self, id: u64) -> ClientResult<IntakeRecord> {
        self.send_json(self.request(Method::GET, &format!("/intakes/{id}")), "intake")
            .await
    }

    pub async fn intake_for_patient(&self, patient_id: u64) -> ClientResult<IntakeRecord> {
        self.send_json(
            self.request(Method::GET, &format!("/intakes/patient/{patient_id}")),
            "intake",
        )
        .await
    }

    /// SOAP autofill for `patient_id`, tagged with the id so a late reply can be discarded.
    pub async fn soap_autofill(&self, patient_id: u64) -> ClientResult<SoapAutofill> {
        let intake = self.intake_for_patient(patient_id).await?;
        Ok(SoapAutofill::from_intake(
            patient_id,
            &intake,
            self.clock.today(),
        ))
    }

    pub async fn get_soap_note(&self, id: u64) -> ClientResult<Value> {
        self.send_value(self.request(Method::GET, &format!("/soap-notes/{id}")))
            .await
    }

    pub async fn get_self_assessment(&self, id: u64) -> ClientResult<Value> {
        self.send_value(self.request(Method::GET, &format!("/self-assessments/{id}")))
            .await
    }

    pub async fn list_notes(&self, kind: NoteKind, page: u32, size: u32) -> ClientResult<Page<Value>> {
        let path = format!("{}?page={page}&size={size}", kind.endpoint());
        self.send_json(self.request(Method::GET, &path), "note page")
            .await
    }

    /// SOAP notes, self-assessments and intakes in one list, newest first.
    pub async fn notes_feed(&self) -> ClientResult<Vec<NoteSummary>> {
        let (soap, selfs, intakes) = tokio::try_join!(
            self.list_notes(NoteKind::Soap, 0, NOTES_PAGE_SIZE),
            self.list_notes(NoteKind::SelfAssessment, 0, NOTES_PAGE_SIZE),
            self.list_notes(NoteKind::Intake, 0, NOTES_PAGE_SIZE),
        )?;
        Ok(merge_newest_first([
            NoteSummary::from_rows(NoteKind::Soap, &soap.content),
            NoteSummary::from_rows(NoteKind::SelfAssessment, &selfs.content),
            NoteSummary::from_rows(NoteKind::Intake, &intakes.content),
        ]))
    }
}

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pies_client::{ClientConfig, ClientError, PiesClient};
use pies_core::dates::{display_wire_date, format_month_year};
use pies_core::notes::{NoteKind, filter_notes, search_patients};
use pies_core::session::{FileSessionStore, available_actions, jwt_subject};
use pies_core::soap::fields::PATIENT_ID;
use pies_core::validation::parse_id;
use pies_types::PhoneNumber;
use pies_core::{
    FormDefinition, FormError, FormInstance, FormState, IntakeForm, RegisterForm, Role,
    SelfAssessmentForm, SessionState, SoapForm, TherapistEdit,
};

#[derive(Parser)]
#[command(name = "pies")]
#[command(about = "PIES practice client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormKind {
    Intake,
    Soap,
    SelfAssessment,
    Register,
}

#[derive(Clone, Copy, ValueEnum)]
enum NoteKindArg {
    Soap,
    #[value(name = "self")]
    SelfAssessment,
    Intake,
}

impl From<NoteKindArg> for NoteKind {
    fn from(kind: NoteKindArg) -> Self {
        match kind {
            NoteKindArg::Soap => NoteKind::Soap,
            NoteKindArg::SelfAssessment => NoteKind::SelfAssessment,
            NoteKindArg::Intake => NoteKind::Intake,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    Intake,
    Soap,
    SelfAssessment,
    Therapist,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        username: String,
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user and the actions their role allows
    Whoami,
    /// List patients
    Patients {
        /// Case-insensitive name filter
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 500)]
        size: u32,
    },
    /// Delete a patient
    DeletePatient { id: u64 },
    /// List therapists
    Therapists {
        /// Only active therapists (id and name)
        #[arg(long)]
        active: bool,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        size: u32,
    },
    /// Update a therapist; unset options keep their current value
    UpdateTherapist {
        id: u64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// ADMIN, SENIOR or JUNIOR (admins only)
        #[arg(long)]
        role: Option<Role>,
    },
    /// Delete a therapist
    DeleteTherapist { id: u64 },
    /// Print a blank form with its checkbox field paths
    ShowForm { form: FormKind },
    /// Submit a form from a JSON or YAML file
    Submit {
        form: FormKind,
        file: PathBuf,
        /// SOAP only: prefill from the patient's intake first
        #[arg(long)]
        autofill: bool,
    },
    /// Fetch one record
    Show { kind: RecordKind, id: u64 },
    /// SOAP notes, self-assessments and intakes, newest first
    Notes {
        #[arg(long)]
        query: Option<String>,
        #[arg(long, value_enum)]
        kind: Vec<NoteKindArg>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("pies=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'pies --help' for commands");
        return Ok(());
    };

    let config = ClientConfig::from_env()?;
    let store = FileSessionStore::new(config.session_file());
    let session = Arc::new(SessionState::new(Box::new(store))?);
    let client = PiesClient::new(&config, session)?;

    match command {
        Commands::Login { username, password } => {
            let session = client.login(&username, &password).await?;
            println!("Logged in as {} ({})", username, session.role);
        }
        Commands::Logout => {
            client.logout().await?;
            println!("Logged out");
        }
        Commands::Whoami => whoami(&client).await?,
        Commands::Patients { query, page, size } => {
            let patients = client.list_patients(page, size).await?.into_content();
            let hits = search_patients(&patients, query.as_deref().unwrap_or_default());
            if hits.is_empty() {
                println!("No patients found.");
            }
            for p in hits {
                let dob = p
                    .date_of_birth
                    .as_deref()
                    .map(display_wire_date)
                    .unwrap_or_default();
                let phone = p
                    .cell_phone_number
                    .as_deref()
                    .and_then(|n| PhoneNumber::from_input(n).ok())
                    .map(|n| n.display())
                    .unwrap_or_default();
                println!(
                    "ID: {}, Name: {}, DOB: {}, Phone: {}",
                    p.id,
                    p.full_name(),
                    dob,
                    phone
                );
            }
        }
        Commands::DeletePatient { id } => {
            client.delete_patient(id).await?;
            println!("Deleted patient {id}");
        }
        Commands::Therapists { active, page, size } => {
            if active {
                for t in client.active_therapists().await? {
                    println!("ID: {}, Name: {}", t.id, t.name);
                }
            } else {
                for t in client.list_therapists(page, size).await?.into_content() {
                    let role = t.role.map(|r| r.label()).unwrap_or("-");
                    println!("ID: {}, Name: {}, Role: {}", t.id, t.full_name(), role);
                }
            }
        }
        Commands::UpdateTherapist {
            id,
            first_name,
            last_name,
            email,
            phone,
            password,
            role,
        } => {
            let mut edit = TherapistEdit::from_record(&client.get_therapist(id).await?);
            if let Some(v) = first_name {
                edit.first_name = v;
            }
            if let Some(v) = last_name {
                edit.last_name = v;
            }
            if let Some(v) = email {
                edit.email = v;
            }
            if let Some(v) = phone {
                edit.phone_number = v;
            }
            if let Some(v) = password {
                edit.password = v;
            }
            if let Some(v) = role {
                edit.role = v;
            }
            let resp = client.update_therapist(id, &edit).await?;
            println!("{}", resp.message);
            // A self-edit may have changed the caller's role.
            if let Ok(profile) = client.me().await {
                if let (Some(role), Some(token)) = (profile.role, client.session().token()) {
                    if Some(role) != client.session().role() {
                        client.session().login(token, role)?;
                        client.session().set_therapist_id(profile.id)?;
                    }
                }
            }
        }
        Commands::DeleteTherapist { id } => {
            client.delete_therapist(id).await?;
            println!("Deleted therapist {id}");
        }
        Commands::ShowForm { form } => match form {
            FormKind::Intake => show_form(&IntakeForm::new()?),
            FormKind::Soap => show_form(&SoapForm::new()),
            FormKind::SelfAssessment => show_form(&SelfAssessmentForm::new()?),
            FormKind::Register => show_form(&RegisterForm),
        },
        Commands::Submit {
            form,
            file,
            autofill,
        } => match form {
            FormKind::Intake => submit_file(&client, IntakeForm::new()?, &file).await?,
            FormKind::Soap => submit_soap(&client, &file, autofill).await?,
            FormKind::SelfAssessment => {
                submit_file(&client, SelfAssessmentForm::new()?, &file).await?
            }
            FormKind::Register => submit_file(&client, RegisterForm, &file).await?,
        },
        Commands::Show { kind, id } => {
            let value = match kind {
                RecordKind::Intake => serde_json::to_value(client.get_intake(id).await?)?,
                RecordKind::Soap => client.get_soap_note(id).await?,
                RecordKind::SelfAssessment => client.get_self_assessment(id).await?,
                RecordKind::Therapist => serde_json::to_value(client.get_therapist(id).await?)?,
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Notes { query, kind } => {
            let kinds: Vec<NoteKind> = kind.into_iter().map(NoteKind::from).collect();
            let feed = client.notes_feed().await?;
            let notes = filter_notes(&feed, query.as_deref().unwrap_or_default(), &kinds);
            if notes.is_empty() {
                println!("No notes found.");
            }
            for n in notes {
                let when = n.date.map(format_month_year).unwrap_or_else(|| "-".into());
                println!(
                    "{:<16} {:<24} {}  (id {})",
                    n.kind.label(),
                    n.patient_name,
                    when,
                    n.id.map(|id| id.to_string()).unwrap_or_else(|| "?".into())
                );
            }
        }
    }

    Ok(())
}

async fn whoami(client: &PiesClient) -> anyhow::Result<()> {
    let Some(session) = client.session().current() else {
        println!("Not logged in. Use 'pies login <username> <password>'.");
        return Ok(());
    };
    let name = match client.me().await {
        Ok(profile) => profile.first_name.or(profile.username),
        Err(e) => {
            tracing::warn!(error = %e, "could not load profile");
            None
        }
    }
    .or_else(|| jwt_subject(&session.token))
    .unwrap_or_else(|| "there".into());

    println!("Hi, {name} ({})", session.role);
    for action in available_actions(session.role) {
        println!("  - {}", action.label());
    }
    Ok(())
}

fn show_form<F: FormDefinition>(form: &F) {
    println!("{} -> POST {}", F::NAME, F::ENDPOINT);
    let state = form.mount();
    for group in form.groups() {
        print!("\n{}", group.render(&state));
    }
}

fn load_state(path: &Path) -> anyhow::Result<FormState> {
    FormState::from_path(path).with_context(|| format!("loading {}", path.display()))
}

fn report(err: ClientError) -> anyhow::Error {
    if let ClientError::Form(FormError::Validation(errors)) = &err {
        for v in errors.violations() {
            eprintln!("  {}: {}", v.field, v.message);
        }
    }
    err.into()
}

async fn submit_file<F: FormDefinition>(
    client: &PiesClient,
    definition: F,
    path: &Path,
) -> anyhow::Result<()> {
    let mut form = FormInstance::mount(definition);
    form.state_mut().merge(load_state(path)?);
    submit(client, &mut form).await
}

async fn submit_soap(client: &PiesClient, path: &Path, autofill: bool) -> anyhow::Result<()> {
    let file_state = load_state(path)?;
    let mut form = FormInstance::mount(SoapForm::new());
    form.state_mut().merge(file_state.clone());

    if autofill {
        let Some(patient_id) = parse_id(form.state(), PATIENT_ID) else {
            bail!("--autofill needs a patientId in {}", path.display());
        };
        let fill = client.soap_autofill(patient_id).await?;
        fill.apply(form.state_mut());
        // Values given in the file win over the intake.
        form.state_mut().merge(file_state);
    }
    submit(client, &mut form).await
}

async fn submit<F: FormDefinition>(
    client: &PiesClient,
    form: &mut FormInstance<F>,
) -> anyhow::Result<()> {
    let created = client.submit(form).await.map_err(report)?;
    match created.get("id") {
        Some(id) => println!("Submitted {} (id {id})", F::NAME),
        None => println!("Submitted {}", F::NAME),
    }
    Ok(())
}

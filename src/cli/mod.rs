//! `mediscope` 명령줄 인터페이스
//!
//! 세션은 `FileStorage`에 저장되므로 명령 실행 간에 로그인 상태가 유지됩니다.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde_json::Value;

use mediscope_client::config::{ApiConfig, ClientSettings};
use mediscope_client::domain::dto::{PatientProfile, SignupPayload};
use mediscope_client::domain::entities::session_user::{Gender, Role};
use mediscope_client::errors::ApiResult;
use mediscope_client::routes::AppRoute;
use mediscope_client::services::client::{ApiClient, RequestOptions};
use mediscope_client::services::session::SessionState;
use mediscope_client::storage::FileStorage;
use mediscope_client::utils::display_terminal::{print_json, print_session_summary};

#[derive(Debug, Parser)]
#[command(name = "mediscope", about = "MediScope clinical-records API client", long_about = None)]
pub(crate) struct Cli {
    /// Remote API origin
    #[arg(long, global = true, env = "API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and store the session locally
    Login(LoginArgs),
    /// Self-register a patient account
    Signup(SignupArgs),
    /// Show the stored session
    Whoami,
    /// Issue an authenticated GET request
    Get(GetArgs),
    /// Sign out; the local session is always cleared
    Logout,
}

#[derive(Debug, Args)]
struct LoginArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "MEDISCOPE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenderArg {
    M,
    W,
}

impl From<GenderArg> for Gender {
    fn from(value: GenderArg) -> Self {
        match value {
            GenderArg::M => Gender::Man,
            GenderArg::W => Gender::Woman,
        }
    }
}

#[derive(Debug, Args)]
struct SignupArgs {
    #[arg(long)]
    email: String,

    #[arg(long, env = "MEDISCOPE_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long, default_value = "")]
    phone: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    birthday: NaiveDate,

    #[arg(long, value_enum)]
    gender: GenderArg,

    #[arg(long, default_value = "")]
    family_history: String,

    #[arg(long, default_value = "")]
    risk_factors: String,

    #[arg(long, default_value = "")]
    insurance_provider: String,
}

impl SignupArgs {
    fn into_payload(self) -> SignupPayload {
        SignupPayload {
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            birthday: self.birthday,
            gender: self.gender.into(),
            role: Role::Patient,
            doctor_profile: None,
            patient_profile: Some(PatientProfile {
                family_history: self.family_history,
                risk_factors: self.risk_factors,
                insurance_provider: self.insurance_provider,
                ..PatientProfile::default()
            }),
        }
    }
}

#[derive(Debug, Args)]
struct GetArgs {
    /// Path relative to the API base URL, e.g. /analyses/
    path: String,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "query", short = 'q', value_parser = parse_key_value)]
    query: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

impl Cli {
    pub(crate) async fn run(self) -> ApiResult<()> {
        let session = build_session(self.base_url.as_deref())?;

        match self.command {
            Commands::Login(args) => {
                let user = session.login(&args.email, &args.password).await?;
                info!("🧭 이동할 화면: {}", AppRoute::home_for(user.role));
                print_session_summary(&session.snapshot());
            }
            Commands::Signup(args) => {
                session.signup_patient(args.into_payload()).await?;
                print_session_summary(&session.snapshot());
            }
            Commands::Whoami => print_session_summary(&session.snapshot()),
            Commands::Get(args) => {
                let options = args
                    .query
                    .into_iter()
                    .fold(RequestOptions::new(), |options, (key, value)| options.query(key, value));
                let body: Value = session.api().get(&args.path, options).await?;
                print_json(&body);
            }
            Commands::Logout => {
                session.logout().await;
                print_session_summary(&session.snapshot());
            }
        }

        Ok(())
    }
}

fn build_session(base_url: Option<&str>) -> ApiResult<SessionState> {
    let settings = match base_url {
        Some(base_url) => ClientSettings::from_env_with_base_url(base_url)?,
        None => ClientSettings::from_env()?,
    };

    let storage_dir = ApiConfig::storage_dir();
    info!("📁 세션 저장 위치: {}", storage_dir.display());

    let storage = Arc::new(FileStorage::new(storage_dir));
    let api = ApiClient::with_reqwest(settings, storage)?;
    Ok(SessionState::new(api))
}

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use partnerdesk_core::AppError;
use partnerdesk_domain::PASSWORD_MIN_LENGTH;
use tracing_subscriber::EnvFilter;

/// One week.
const MAX_SESSION_IDLE_MINUTES: i64 = 10_080;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub session_idle_minutes: i64,
    pub seed_demo_data: bool,
    pub demo_user_password: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_env(&lookup, "API_PORT")?.unwrap_or(3001);
        let cookie_secure = flag_env(&lookup, "SESSION_COOKIE_SECURE")?;

        let session_idle_minutes = parse_env::<i64>(&lookup, "SESSION_IDLE_MINUTES")?.unwrap_or(30);
        if !(1..=MAX_SESSION_IDLE_MINUTES).contains(&session_idle_minutes) {
            return Err(AppError::Validation(format!(
                "SESSION_IDLE_MINUTES must be between 1 and {MAX_SESSION_IDLE_MINUTES} minutes"
            )));
        }

        let seed_demo_data = flag_env(&lookup, "SEED_DEMO_DATA")?;
        let demo_user_password = lookup("DEMO_USER_PASSWORD").filter(|value| !value.is_empty());
        if seed_demo_data {
            match demo_user_password.as_deref() {
                None => {
                    return Err(AppError::Validation(
                        "DEMO_USER_PASSWORD is required when SEED_DEMO_DATA is enabled".to_owned(),
                    ));
                }
                Some(password) if password.chars().count() < PASSWORD_MIN_LENGTH => {
                    return Err(AppError::Validation(format!(
                        "DEMO_USER_PASSWORD must be at least {PASSWORD_MIN_LENGTH} characters"
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            session_idle_minutes,
            seed_demo_data,
            demo_user_password,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
        })
        .transpose()
}

fn flag_env(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<bool, AppError> {
    match lookup(name) {
        None => Ok(false),
        Some(value) if value.eq_ignore_ascii_case("true") || value == "1" => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("false") || value == "0" || value.is_empty() => {
            Ok(false)
        }
        Some(value) => Err(AppError::Validation(format!(
            "{name} must be 'true' or 'false', got '{value}'"
        ))),
    }
}

use crate::error::{BsidesError, Result};
use log::debug;
use std::env;
use std::path::{Path, PathBuf};

pub const CLIENT_ID_VAR: &str = "SPOTIPY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIPY_CLIENT_SECRET";

/// Required environment variables for the application
const REQUIRED_ENV_VARS: &[&str] = &[CLIENT_ID_VAR, CLIENT_SECRET_VAR];

pub const DATASET_PATH: &str = "resources/bubbleflexe-rv.csv";
pub const API_BASE_URL: &str = "https://api.spotify.com/v1/";
pub const AUTH_BASE_URL: &str = "https://accounts.spotify.com/";

/// Loads variables from a `.env` file into the process environment.
///
/// Variables that are already set are left untouched, and a missing `.env`
/// file is not an error.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {e}"),
    }
}

/// Loads variables from the given env file, leaving already set variables untouched.
///
/// # Errors
/// Returns `BsidesError::Env` if the file is missing or malformed.
pub fn load_env_from<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    dotenv::from_path(path)?;
    debug!("Loaded environment from {}", path.display());
    Ok(())
}

/// Validates that all required environment variables are set
///
/// # Errors
/// Returns `BsidesError::MissingEnvVar` listing every missing variable
///
/// # Returns
/// * `Result<()>` - Ok if all required environment variables are present
pub fn validate_env_vars() -> Result<()> {
    validate_vars(REQUIRED_ENV_VARS, |name| env::var(name).ok())
}

fn validate_vars<F>(var_names: &[&str], lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let missing_vars: Vec<&str> = var_names
        .iter()
        .copied()
        .filter(|var_name| required(var_name, lookup(var_name)).is_err())
        .collect();

    if !missing_vars.is_empty() {
        return Err(BsidesError::MissingEnvVar(missing_vars.join(", ")));
    }

    Ok(())
}

/// Gets a required environment variable
///
/// # Arguments
/// * `var_name` - The name of the environment variable to retrieve
///
/// # Errors
/// Returns `BsidesError::MissingEnvVar` if the variable is unset or empty
///
/// # Returns
/// * `Result<String>` - The value of the environment variable
pub fn get_required_env_var(var_name: &str) -> Result<String> {
    required(var_name, env::var(var_name).ok())
}

fn required(var_name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(BsidesError::MissingEnvVar(var_name.to_string())),
    }
}

/// Client identifier and secret for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

// keep the secret out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Credentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads the credentials from the process environment.
    ///
    /// # Errors
    /// Returns `BsidesError::MissingEnvVar` naming every missing variable
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the credentials through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `BsidesError::MissingEnvVar` naming every missing variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        validate_vars(REQUIRED_ENV_VARS, &lookup)?;

        Ok(Credentials {
            client_id: required(CLIENT_ID_VAR, lookup(CLIENT_ID_VAR))?,
            client_secret: required(CLIENT_SECRET_VAR, lookup(CLIENT_SECRET_VAR))?,
        })
    }
}

/// Paths and endpoints used by the bootstrap.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dataset_path: PathBuf,
    pub api_base_url: String,
    pub auth_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dataset_path: PathBuf::from(DATASET_PATH),
            api_base_url: API_BASE_URL.to_string(),
            auth_base_url: AUTH_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_credentials_from_complete_lookup() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "secret"),
        ]))
        .unwrap();

        assert_eq!(creds, Credentials::new("id", "secret"));
    }

    #[test]
    fn test_credentials_missing_secret() {
        let err = Credentials::from_lookup(lookup_from(&[(CLIENT_ID_VAR, "id")])).unwrap_err();

        match err {
            BsidesError::MissingEnvVar(var) => assert_eq!(var, CLIENT_SECRET_VAR),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_credentials_missing_both() {
        let err = Credentials::from_lookup(lookup_from(&[])).unwrap_err();

        match err {
            BsidesError::MissingEnvVar(vars) => {
                assert_eq!(vars, "SPOTIPY_CLIENT_ID, SPOTIPY_CLIENT_SECRET");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "  "),
            (CLIENT_SECRET_VAR, "secret"),
        ]))
        .unwrap_err();

        assert!(matches!(err, BsidesError::MissingEnvVar(var) if var == CLIENT_ID_VAR));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("id", "hunter2");

        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_default_settings_use_fixed_paths() {
        let settings = Settings::default();

        assert_eq!(settings.dataset_path, PathBuf::from("resources/bubbleflexe-rv.csv"));
        assert_eq!(settings.auth_base_url, AUTH_BASE_URL);
    }

    fn write_env_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("bsides_loader_{}_{name}.env", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_env_from_file() {
        let path = write_env_file("load", "BSIDES_TEST_FROM_FILE=loaded\n");

        load_env_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(get_required_env_var("BSIDES_TEST_FROM_FILE").unwrap(), "loaded");
    }

    #[test]
    fn test_load_env_keeps_existing_values() {
        env::set_var("BSIDES_TEST_PRESET", "from-process");
        let path = write_env_file("preset", "BSIDES_TEST_PRESET=from-file\n");

        load_env_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(env::var("BSIDES_TEST_PRESET").unwrap(), "from-process");
    }

    #[test]
    fn test_load_env_from_missing_file() {
        let err = load_env_from("does/not/exist.env").unwrap_err();

        assert!(matches!(err, BsidesError::Env(_)));
    }

    #[test]
    fn test_credentials_from_env_file() {
        let path = write_env_file(
            "creds",
            "SPOTIPY_CLIENT_ID=file-id\nSPOTIPY_CLIENT_SECRET=file-secret\n",
        );

        load_env_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        // values already in the process environment would win over the file
        assert!(validate_env_vars().is_ok());
        assert!(Credentials::from_env().is_ok());
    }

    #[test]
    fn test_validate_lists_every_missing_var() {
        let lookup = lookup_from(&[("PRESENT", "x"), ("BLANK", " ")]);

        let err = validate_vars(&["PRESENT", "BLANK", "ABSENT"], lookup).unwrap_err();

        assert!(matches!(err, BsidesError::MissingEnvVar(vars) if vars == "BLANK, ABSENT"));
    }

    #[test]
    fn test_get_required_env_var_missing() {
        let err = get_required_env_var("BSIDES_TEST_NEVER_SET").unwrap_err();

        assert!(matches!(err, BsidesError::MissingEnvVar(var) if var == "BSIDES_TEST_NEVER_SET"));
    }
}

use crate::config::{self, Credentials, Settings};
use crate::dataset::DataFrame;
use crate::error::Result;
use crate::file_handler::FileHandler;
use crate::spotify_handler::SpotifyHandler;

use log::info;

/// CSV field positions kept from the dataset, and their column names.
pub const DATASET_POSITIONS: &[usize] = &[1, 2];
pub const DATASET_COLUMNS: &[&str] = &["bsides", "tt"];

/// Everything the program holds after start-up.
#[derive(Debug)]
pub struct Session {
    pub client: SpotifyHandler,
    pub dataset: DataFrame,
}

impl Session {
    /// Loads `.env`, builds the API client from the environment and reads the
    /// dataset at its fixed path.
    ///
    /// # Errors
    /// * `BsidesError::MissingEnvVar` - If the client id or secret is not set.
    /// * `BsidesError::Io` - If the dataset file is missing.
    /// * `BsidesError::InvalidRow` / `BsidesError::Csv` - If the dataset is malformed.
    pub fn bootstrap() -> Result<Self> {
        config::load_env();
        Self::bootstrap_with(Credentials::from_env()?, &Settings::default())
    }

    /// Same as `bootstrap`, with explicit credentials and settings.
    ///
    /// # Errors
    /// See `bootstrap`.
    pub fn bootstrap_with(credentials: Credentials, settings: &Settings) -> Result<Self> {
        let client = SpotifyHandler::with_settings(credentials, settings);
        info!("Spotify client ready for {}", client.client_id());

        let dataset = FileHandler::load_columns(
            &settings.dataset_path,
            DATASET_POSITIONS,
            DATASET_COLUMNS,
        )?;
        info!(
            "Loaded {} rows from {}",
            dataset.len(),
            settings.dataset_path.display()
        );

        Ok(Session { client, dataset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;
    use crate::error::BsidesError;
    use std::fs;
    use std::path::PathBuf;

    fn settings_for(path: PathBuf) -> Settings {
        Settings {
            dataset_path: path,
            ..Settings::default()
        }
    }

    #[test]
    fn test_bootstrap_with_dataset() {
        let path = std::env::temp_dir().join(format!("bsides_session_{}.csv", std::process::id()));
        fs::write(&path, "a,1,x\nb,2,y\n").unwrap();

        let session =
            Session::bootstrap_with(Credentials::new("id", "secret"), &settings_for(path.clone()));
        fs::remove_file(&path).unwrap();
        let session = session.unwrap();

        assert_eq!(session.client.client_id(), "id");
        assert_eq!(session.dataset.column_names(), vec!["bsides", "tt"]);
        assert_eq!(
            session.dataset.column("bsides").unwrap().cells(),
            &[Cell::Int(1), Cell::Int(2)]
        );
    }

    #[test]
    fn test_bootstrap_missing_dataset() {
        let result = Session::bootstrap_with(
            Credentials::new("id", "secret"),
            &settings_for(PathBuf::from("resources/missing.csv")),
        );

        assert!(matches!(result, Err(BsidesError::Io(_))));
    }
}

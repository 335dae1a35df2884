use crate::errors::{AppError, AppResult};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Access key pair read from the credentials CSV.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Reads the access key id and secret from a credentials CSV file.
///
/// The first line is a header and is discarded. The second line holds the
/// access key id in column 0 and the secret in column 1; further columns and
/// lines are ignored.
///
/// # Errors
///
/// Returns `CredentialsError` if the file cannot be read, has fewer than two
/// lines, or the second line has fewer than two comma-separated fields.
pub fn read_credentials(path: &Path) -> AppResult<Credentials> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::CredentialsError(format!(
            "Failed to read credentials file {}: {e}",
            path.display()
        ))
    })?;

    let credentials = parse_credentials(&contents).map_err(|e| match e {
        AppError::CredentialsError(msg) => {
            AppError::CredentialsError(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;

    debug!(
        file = %path.display(),
        access_key_id = credentials.access_key_id.as_str(),
        "Credentials loaded"
    );
    Ok(credentials)
}

/// Parses the contents of a credentials CSV.
pub fn parse_credentials(contents: &str) -> AppResult<Credentials> {
    let line = contents.lines().nth(1).ok_or_else(|| {
        AppError::CredentialsError("expected a header line followed by a data line".to_string())
    })?;

    let mut fields = line.split(',').map(str::trim);
    match (fields.next(), fields.next()) {
        (Some(access_key_id), Some(secret_access_key)) => Ok(Credentials {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        }),
        _ => Err(AppError::CredentialsError(
            "data line must contain `access key id,secret access key`".to_string(),
        )),
    }
}

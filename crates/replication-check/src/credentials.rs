//! Credential resolution
//!
//! Connection parameters come either from discrete flags or from a MySQL
//! option (INI) file. The two sources are exclusive: when an option file is
//! given, its section fully replaces the flag values, and a section lacking
//! a required key is an error rather than a reason to consult the flags.

use std::fmt;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use crate::error::CheckError;

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_INI_SECTION: &str = "client";

/// Canonical connection parameters for one check.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub user: String,
    pub password: String,
    pub socket: Option<String>,
    pub port: u16,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("socket", &self.socket)
            .field("port", &self.port)
            .finish()
    }
}

/// Raw, unvalidated credential inputs as they arrive from the command line.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSource {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub socket: Option<String>,
    pub port: u16,
    /// Option file to read instead of the discrete values above
    pub ini_file: Option<PathBuf>,
    /// Section of `ini_file` holding the credentials
    pub ini_section: String,
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self {
            host: None,
            user: None,
            password: None,
            socket: None,
            port: DEFAULT_PORT,
            ini_file: None,
            ini_section: DEFAULT_INI_SECTION.to_string(),
        }
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSource")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("socket", &self.socket)
            .field("port", &self.port)
            .field("ini_file", &self.ini_file)
            .field("ini_section", &self.ini_section)
            .finish()
    }
}

/// Resolve `source` into a complete set of credentials.
///
/// Fails with [`CheckError::MissingCredentials`] when host, user or password
/// is absent or empty in whichever source is in effect, and with
/// [`CheckError::IniFile`] when the option file cannot be used at all.
pub fn resolve_credentials(source: &CredentialSource) -> Result<Credentials, CheckError> {
    match &source.ini_file {
        Some(path) => from_ini_file(path, &source.ini_section, source.port),
        None => from_flags(source),
    }
}

fn from_flags(source: &CredentialSource) -> Result<Credentials, CheckError> {
    debug!("Resolving credentials from command line flags");
    let (host, user, password) = require(
        source.host.as_deref(),
        source.user.as_deref(),
        source.password.as_deref(),
    )?;

    Ok(Credentials {
        host,
        user,
        password,
        socket: non_empty(source.socket.as_deref()),
        port: source.port,
    })
}

fn from_ini_file(
    path: &Path,
    section: &str,
    default_port: u16,
) -> Result<Credentials, CheckError> {
    debug!(path = %path.display(), section = %section, "Resolving credentials from option file");

    let ini = Ini::load_from_file_noescape(path).map_err(|e| CheckError::IniFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let props = ini.section(Some(section)).ok_or_else(|| CheckError::IniFile {
        path: path.to_path_buf(),
        reason: format!("section [{section}] not found"),
    })?;

    let (host, user, password) = require(
        props.get("host"),
        props.get("user"),
        props.get("password"),
    )?;

    // Port is not part of the identity triple; a missing or garbled value
    // keeps the flag/default port.
    let port = props
        .get("port")
        .and_then(|p| p.trim().parse::<u16>().ok())
        .unwrap_or(default_port);

    Ok(Credentials {
        host,
        user,
        password,
        socket: non_empty(props.get("socket")),
        port,
    })
}

fn require(
    host: Option<&str>,
    user: Option<&str>,
    password: Option<&str>,
) -> Result<(String, String, String), CheckError> {
    let fields = [("host", host), ("user", user), ("password", password)];
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| non_empty(*value).is_none())
        .map(|(name, _)| *name)
        .collect();

    match (non_empty(host), non_empty(user), non_empty(password)) {
        (Some(host), Some(user), Some(password)) => Ok((host, user, password)),
        _ => Err(CheckError::MissingCredentials { missing }),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

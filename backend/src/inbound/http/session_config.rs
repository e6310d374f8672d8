//! Session cookie settings read from `SESSION_*` environment variables.
//!
//! Debug builds tolerate missing or malformed values and fall back to
//! development defaults with a warning; release builds reject them.
//!
//! | Variable | Meaning | Debug default |
//! |---|---|---|
//! | `SESSION_KEY_FILE` | signing key, at least 64 bytes in release | ephemeral key |
//! | `SESSION_COOKIE_SECURE` | `Secure` cookie flag | `true` |
//! | `SESSION_SAMESITE` | `Strict`, `Lax` or `None` | `Lax` |
//! | `SESSION_ALLOW_EPHEMERAL` | generate a key when the file is unreadable | `false` |
//! | `SESSION_TTL_HOURS` | cookie lifetime | `8` |

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const DEFAULT_TTL_HOURS: i64 = 8;
const MAX_TTL_HOURS: i64 = 24 * 30;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const TTL_HOURS_ENV: &str = "SESSION_TTL_HOURS";

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "whole hours between 1 and 720";

/// Build flavour driving how strictly settings are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// `Debug` when compiled with debug assertions.
    ///
    /// # Examples
    /// ```
    /// use hr_assistant::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) { BuildMode::Debug } else { BuildMode::Release };
    /// assert_eq!(BuildMode::from_debug_assertions(), expected);
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session cookie settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    pub ttl_hours: i64,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("same_site", &self.same_site)
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

/// Errors raised while validating session settings.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate session settings.
///
/// # Errors
///
/// Release builds fail on any missing or malformed variable, a short or
/// unreadable key file, `SameSite=None` without `Secure`, or ephemeral keys.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_setting(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_setting(env, mode, cookie_secure)?;
    let allow_ephemeral = bool_setting(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let ttl_hours = ttl_setting(env, mode)?;
    let key = session_key(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl_hours,
    })
}

/// In debug builds, log and fall back to `default`; in release, fail.
fn lenient<T>(
    mode: BuildMode,
    default: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "using development default for session setting");
        Ok(default)
    } else {
        Err(error)
    }
}

fn bool_setting<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    match env.string(name) {
        None => lenient(mode, default, SessionConfigError::MissingEnv { name }),
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => lenient(
                mode,
                default,
                SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected: BOOL_EXPECTED,
                },
            ),
        },
    }
}

fn same_site_setting<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return lenient(
            mode,
            SameSite::Lax,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
        );
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => lenient(
            mode,
            SameSite::Lax,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn ttl_setting<E: Env>(env: &E, mode: BuildMode) -> Result<i64, SessionConfigError> {
    match env.string(TTL_HOURS_ENV) {
        None => Ok(DEFAULT_TTL_HOURS),
        Some(value) => match value.trim().parse::<i64>() {
            Ok(hours) if (1..=MAX_TTL_HOURS).contains(&hours) => Ok(hours),
            _ => lenient(
                mode,
                DEFAULT_TTL_HOURS,
                SessionConfigError::InvalidEnv {
                    name: TTL_HOURS_ENV,
                    value,
                    expected: TTL_EXPECTED,
                },
            ),
        },
    }
}

fn session_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            // Key::derive_from panics below 32 bytes, whatever the build mode.
            if length < SESSION_KEY_MIN_LEN && (!mode.is_debug() || length < 32) {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn key_file(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; len]).expect("write key");
        file
    }

    fn env_with(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn release_env(key: &NamedTempFile, overrides: &[(&str, &str)]) -> MockEnv {
        let path = key.path().to_str().expect("utf8 path").to_owned();
        let mut vars: Vec<(&str, &str)> = vec![
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Strict"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ];
        vars.retain(|(name, _)| !overrides.iter().any(|(o, _)| o == name));
        vars.extend_from_slice(overrides);
        let mut owned: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        owned.push((KEY_FILE_ENV.to_owned(), path));
        let borrowed: Vec<(&str, &str)> =
            owned.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        env_with(&borrowed)
    }

    #[rstest]
    fn release_accepts_complete_settings() {
        let key = key_file(SESSION_KEY_MIN_LEN);
        let settings = session_settings_from_env(
            &release_env(&key, &[(TTL_HOURS_ENV, "12")]),
            BuildMode::Release,
        )
        .expect("valid settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
        assert_eq!(settings.ttl_hours, 12);
    }

    #[rstest]
    fn debug_tolerates_an_empty_environment() {
        let settings =
            session_settings_from_env(&env_with(&[(KEY_FILE_ENV, "/nonexistent/key")]), BuildMode::Debug)
                .expect("debug defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
        assert_eq!(settings.ttl_hours, DEFAULT_TTL_HOURS);
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV, "maybe")]
    #[case(SAMESITE_ENV, "Sometimes")]
    #[case(TTL_HOURS_ENV, "0")]
    #[case(TTL_HOURS_ENV, "forever")]
    fn release_rejects_malformed_values(#[case] name: &str, #[case] value: &str) {
        let key = key_file(SESSION_KEY_MIN_LEN);
        let err = session_settings_from_env(&release_env(&key, &[(name, value)]), BuildMode::Release)
            .expect_err("malformed value");
        assert!(matches!(err, SessionConfigError::InvalidEnv { .. }), "{err}");
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let key = key_file(SESSION_KEY_MIN_LEN - 1);
        let err = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
            .expect_err("short key");
        assert!(matches!(err, SessionConfigError::KeyTooShort { length: 63, .. }));
    }

    #[rstest]
    fn release_rejects_insecure_same_site_none() {
        let key = key_file(SESSION_KEY_MIN_LEN);
        let err = session_settings_from_env(
            &release_env(&key, &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]),
            BuildMode::Release,
        )
        .expect_err("None without Secure");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[rstest]
    fn release_rejects_ephemeral_keys() {
        let key = key_file(SESSION_KEY_MIN_LEN);
        let err = session_settings_from_env(
            &release_env(&key, &[(ALLOW_EPHEMERAL_ENV, "1")]),
            BuildMode::Release,
        )
        .expect_err("ephemeral in release");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_requires_a_readable_key() {
        let env = env_with(&[
            (KEY_FILE_ENV, "/nonexistent/key"),
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Lax"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ]);
        let err = session_settings_from_env(&env, BuildMode::Release).expect_err("missing key");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn settings_debug_output_hides_the_key() {
        let key = key_file(SESSION_KEY_MIN_LEN);
        let settings = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
            .expect("valid settings");
        assert!(format!("{settings:?}").contains("<redacted>"));
    }

    #[rstest]
    fn process_environment_is_read_through_default_env() {
        let key = key_file(SESSION_KEY_MIN_LEN);
        let path = key.path().to_str().expect("utf8 path").to_owned();
        let _guard = env_lock::lock_env([
            (KEY_FILE_ENV, Some(path)),
            (COOKIE_SECURE_ENV, Some("1".to_owned())),
            (SAMESITE_ENV, Some("Strict".to_owned())),
            (ALLOW_EPHEMERAL_ENV, Some("0".to_owned())),
            (TTL_HOURS_ENV, Some("24".to_owned())),
        ]);
        let settings =
            session_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::Release)
                .expect("valid settings");
        assert_eq!(settings.same_site, SameSite::Strict);
        assert_eq!(settings.ttl_hours, 24);
    }
}

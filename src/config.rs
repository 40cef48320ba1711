use std::env;

pub const API_KEY_VAR: &str = "PORKBUN_API_KEY";
pub const SECRET_KEY_VAR: &str = "PORKBUN_SECRET_KEY";
pub const GET_MUDDY_VAR: &str = "PORKBUN_GET_MUDDY";

/// Process configuration, resolved once at startup. No runtime reload.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    /// Write operations enabled. Defaults to false: the server starts
    /// read-only unless `--get-muddy` or `PORKBUN_GET_MUDDY` says otherwise.
    pub get_muddy: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            secret_key: None,
            get_muddy: false,
        }
    }
}

impl Settings {
    /// Resolves settings from the environment. `cli_get_muddy` is the CLI
    /// flag value and takes precedence over the environment variable.
    pub fn resolve(cli_get_muddy: bool) -> Self {
        let get_muddy = if cli_get_muddy {
            true
        } else {
            write_enabled_from(env::var(GET_MUDDY_VAR).ok().as_deref())
        };

        Self {
            api_key: non_empty(env::var(API_KEY_VAR).ok()),
            secret_key: non_empty(env::var(SECRET_KEY_VAR).ok()),
            get_muddy,
        }
    }
}

/// Interprets the write-enable environment value. Anything other than an
/// explicit affirmative reads as read-only.
pub fn write_enabled_from(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim),
        Some("1") | Some("true") | Some("yes")
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

use std::path::PathBuf;

use crate::error::SolvemarkError;

#[derive(Debug, Clone)]
pub struct Config {
    pub solver_url: String,
    pub domain: Option<String>,
    pub request_timeout_ms: u64,
    pub prefs_file: PathBuf,
}

pub fn load_config() -> Result<Config, SolvemarkError> {
    dotenvy::dotenv().ok();

    let solver_url = std::env::var("SOLVER_URL")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    if solver_url.is_empty() {
        return Err(SolvemarkError::Config(
            "SOLVER_URL is required. Set it in .env file.".into(),
        ));
    }

    let domain = std::env::var("SOLVER_DOMAIN")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let request_timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(60_000);

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));

    let prefs_file = std::env::var("SOLVEMARK_PREFS_FILE")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if let Some(stripped) = s.strip_prefix('~') {
                home.join(stripped.trim_start_matches('/'))
            } else {
                PathBuf::from(s)
            }
        })
        .unwrap_or_else(|| home.join(".solvemark").join("prefs.json"));

    Ok(Config {
        solver_url,
        domain,
        request_timeout_ms,
        prefs_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_missing_url() {
        std::env::remove_var("SOLVER_URL");
        let result = load_config();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("SOLVER_URL"));
    }
}

/// Service endpoints and tunables, fixed at build time

use url::Url;

use crate::error::NetworkError;

const DEFAULT_USER_DATA_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_RECOMMENDER_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_WEB_APP_URL: &str = "https://leetpath.vercel.app";
const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_TOP_K: usize = 10;

/// Endpoints the extension talks to.
///
/// Values come from environment variables present when the wasm bundle is
/// built (`LEETPATH_USER_DATA_URL`, `LEETPATH_RECOMMENDER_URL`,
/// `LEETPATH_WEB_APP_URL`, `LEETPATH_IDENTITY_URL`, `LEETPATH_IDENTITY_API_KEY`).
/// The browser has no process environment, so nothing is read at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// User-data service (profile, solved questions)
    pub user_data_url: String,
    /// Recommendation service, which also hosts avatar images
    pub recommender_url: String,
    /// Web application where interactive sign-in happens
    pub web_app_url: String,
    /// Identity provider REST base
    pub identity_url: String,
    pub identity_api_key: String,
    /// Number of recommendations requested and displayed
    pub top_k: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            user_data_url: option_env!("LEETPATH_USER_DATA_URL")
                .unwrap_or(DEFAULT_USER_DATA_URL)
                .to_string(),
            recommender_url: option_env!("LEETPATH_RECOMMENDER_URL")
                .unwrap_or(DEFAULT_RECOMMENDER_URL)
                .to_string(),
            web_app_url: option_env!("LEETPATH_WEB_APP_URL")
                .unwrap_or(DEFAULT_WEB_APP_URL)
                .to_string(),
            identity_url: option_env!("LEETPATH_IDENTITY_URL")
                .unwrap_or(DEFAULT_IDENTITY_URL)
                .to_string(),
            identity_api_key: option_env!("LEETPATH_IDENTITY_API_KEY")
                .unwrap_or_default()
                .to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl ServiceConfig {
    pub fn user_data_endpoint(&self, path: &str) -> Result<Url, NetworkError> {
        join(&self.user_data_url, path)
    }

    pub fn recommender_endpoint(&self, path: &str) -> Result<Url, NetworkError> {
        join(&self.recommender_url, path)
    }

    pub fn identity_endpoint(&self, path: &str) -> Result<Url, NetworkError> {
        let mut url = join(&self.identity_url, path)?;
        url.query_pairs_mut().append_pair("key", &self.identity_api_key);
        Ok(url)
    }

    pub fn web_login_url(&self) -> String {
        format!("{}/login", self.web_app_url.trim_end_matches('/'))
    }

    pub fn web_register_url(&self) -> String {
        format!("{}/register", self.web_app_url.trim_end_matches('/'))
    }
}

/// Join a path onto a base URL, keeping any path prefix the base already has.
fn join(base: &str, path: &str) -> Result<Url, NetworkError> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    // "./" stops segments like "accounts:signUp" parsing as a scheme
    Ok(base.join(&format!("./{}", path.trim_start_matches('/')))?)
}

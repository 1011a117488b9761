//! Clients for the external user-data and recommendation services
//!
//! Every user-data response carries a boolean `status`; `false` becomes
//! `NetworkError::Rejected` whatever the HTTP status code was.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ServiceConfig;
use crate::error::NetworkError;

/// Solved counts per difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedCounts {
    #[serde(default)]
    pub easy: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub hard: u32,
}

/// Profile as returned by `/getUserData`. The service owns the canonical
/// shape; unknown fields such as `_id` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub solved: SolvedCounts,
}

/// Editable fields sent with `PATCH /updateUser`
#[derive(Debug, Serialize)]
struct ProfileUpdate<'a> {
    email: &'a str,
    username: &'a str,
    name: &'a str,
    institution: &'a str,
}

/// One ranked entry from `/recommend`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Recommendation {
    pub slug: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    #[serde(default)]
    recommendations: Vec<(String, f64)>,
}

#[derive(Debug, Default, Deserialize)]
struct Empty {}

#[derive(Debug, Deserialize)]
struct SolvedQuestions {
    #[serde(default)]
    solved_questions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    body: T,
}

impl<T> Envelope<T> {
    fn into_result(self, endpoint: &str) -> Result<T, NetworkError> {
        if self.status {
            Ok(self.body)
        } else {
            Err(NetworkError::rejected(endpoint, self.message))
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait UserDataService {
    async fn add_user(&self, email: &str) -> Result<(), NetworkError>;
    async fn get_user_data(&self, email: &str) -> Result<UserProfile, NetworkError>;
    async fn update_user(&self, profile: &UserProfile) -> Result<(), NetworkError>;
    async fn update_solved_with_leetcode(&self, email: &str) -> Result<(), NetworkError>;
    /// `None` when the service answered without a `solved_questions` field
    async fn solved_questions(&self, email: &str) -> Result<Option<Vec<String>>, NetworkError>;
    async fn add_solved_question(&self, email: &str, slug: &str) -> Result<(), NetworkError>;
    async fn remove_solved_question(&self, email: &str, slug: &str) -> Result<(), NetworkError>;
}

#[allow(async_fn_in_trait)]
pub trait RecommendationService {
    /// Ranked recommendations, best first
    async fn recommend(
        &self,
        solved: &[String],
        count: usize,
    ) -> Result<Vec<Recommendation>, NetworkError>;
}

/// Profile images stored by derived filename
#[allow(async_fn_in_trait)]
pub trait AvatarService {
    async fn download(&self, filename: &str) -> Result<Vec<u8>, NetworkError>;
    async fn upload(&self, filename: &str, image: Vec<u8>) -> Result<(), NetworkError>;
    async fn delete(&self, filename: &str) -> Result<(), NetworkError>;
}

/// HTTP client for all three services
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl ApiClient {
    pub fn new(config: ServiceConfig) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn user_data<B, T>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, NetworkError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.user_data_endpoint(path)?;
        debug!("{} {}", method, url);

        let response = self
            .http
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| NetworkError::transport(path, e))?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| NetworkError::body(path, e))?;

        envelope.into_result(path)
    }

    async fn recommender(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, NetworkError> {
        let url = self.config.recommender_endpoint(path)?;
        debug!("{} {}", method, url);

        let response = self
            .http
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| NetworkError::transport(path, e))?;

        check_status(path, response)
    }
}

fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response, NetworkError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(NetworkError::Status {
            endpoint: path.to_string(),
            status: response.status().as_u16(),
        })
    }
}

impl UserDataService for ApiClient {
    async fn add_user(&self, email: &str) -> Result<(), NetworkError> {
        self.user_data::<_, Empty>(reqwest::Method::POST, "addUser", &json!({ "email": email }))
            .await
            .map(|_| ())
    }

    async fn get_user_data(&self, email: &str) -> Result<UserProfile, NetworkError> {
        self.user_data(reqwest::Method::POST, "getUserData", &json!({ "email": email }))
            .await
    }

    async fn update_user(&self, profile: &UserProfile) -> Result<(), NetworkError> {
        let update = ProfileUpdate {
            email: &profile.email,
            username: &profile.username,
            name: &profile.name,
            institution: &profile.institution,
        };
        self.user_data::<_, Empty>(reqwest::Method::PATCH, "updateUser", &update)
            .await
            .map(|_| ())
    }

    async fn update_solved_with_leetcode(&self, email: &str) -> Result<(), NetworkError> {
        self.user_data::<_, Empty>(
            reqwest::Method::POST,
            "updateSolvedWithLeetCode",
            &json!({ "email": email }),
        )
        .await
        .map(|_| ())
    }

    async fn solved_questions(&self, email: &str) -> Result<Option<Vec<String>>, NetworkError> {
        self.user_data::<_, SolvedQuestions>(
            reqwest::Method::POST,
            "getSolvedQuestions",
            &json!({ "email": email }),
        )
        .await
        .map(|body| body.solved_questions)
    }

    async fn add_solved_question(&self, email: &str, slug: &str) -> Result<(), NetworkError> {
        self.user_data::<_, Empty>(
            reqwest::Method::POST,
            "addSolvedQuestion",
            &json!({ "email": email, "question_slug": slug }),
        )
        .await
        .map(|_| ())
    }

    async fn remove_solved_question(&self, email: &str, slug: &str) -> Result<(), NetworkError> {
        self.user_data::<_, Empty>(
            reqwest::Method::POST,
            "removeSolvedQuestion",
            &json!({ "email": email, "question_slug": slug }),
        )
        .await
        .map(|_| ())
    }
}

impl RecommendationService for ApiClient {
    async fn recommend(
        &self,
        solved: &[String],
        count: usize,
    ) -> Result<Vec<Recommendation>, NetworkError> {
        let body = json!({ "solved_questions": solved, "count": count });
        let response = self
            .recommender(reqwest::Method::POST, "recommend", &body)
            .await?;

        let parsed: RecommendResponse = response
            .json()
            .await
            .map_err(|e| NetworkError::body("recommend", e))?;

        Ok(parsed
            .recommendations
            .into_iter()
            .map(|(slug, score)| Recommendation { slug, score })
            .collect())
    }
}

impl AvatarService for ApiClient {
    async fn download(&self, filename: &str) -> Result<Vec<u8>, NetworkError> {
        let response = self
            .recommender(reqwest::Method::POST, "download", &json!({ "filename": filename }))
            .await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NetworkError::body("download", e))?;
        Ok(bytes.to_vec())
    }

    async fn upload(&self, filename: &str, image: Vec<u8>) -> Result<(), NetworkError> {
        let url = self.config.recommender_endpoint("upload")?;
        debug!("POST {}", url);

        let part = reqwest::multipart::Part::bytes(image)
            .file_name(filename.to_string())
            .mime_str("image/png")
            .map_err(|e| NetworkError::body("upload", e))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("filename", filename.to_string());

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| NetworkError::transport("upload", e))?;

        check_status("upload", response).map(|_| ())
    }

    async fn delete(&self, filename: &str) -> Result<(), NetworkError> {
        self.recommender(reqwest::Method::DELETE, "delete", &json!({ "filename": filename }))
            .await
            .map(|_| ())
    }
}

//! In-memory fakes for the injected capabilities

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::api::{
    AvatarService, Recommendation, RecommendationService, UserDataService, UserProfile,
};
use crate::auth::{IdentityProvider, provider_error};
use crate::bridge::PageStorage;
use crate::error::{AuthError, MessageError, NetworkError, StorageError};
use crate::protocol::{MessageClient, RelayRequest, RelayResponse};
use crate::relay::BackgroundRelay;
use crate::storage::{StorageClient, USER_TOKEN_KEY};
use crate::token::{AuthToken, encode_test_token};

#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Rc<RefCell<HashMap<String, String>>>,
    failing: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn failing() -> Self {
        MemoryStorage {
            failing: true,
            ..MemoryStorage::default()
        }
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }
}

impl StorageClient for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing {
            return Err(StorageError::Unavailable("storage offline".to_string()));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.insert(key, value);
        Ok(())
    }
}

pub struct FakePage {
    token: Option<String>,
}

impl FakePage {
    pub fn with_token(token: &str) -> Self {
        FakePage {
            token: Some(token.to_string()),
        }
    }

    pub fn empty() -> Self {
        FakePage { token: None }
    }
}

impl PageStorage for FakePage {
    fn get_item(&self, key: &str) -> Option<String> {
        if key == USER_TOKEN_KEY {
            self.token.clone()
        } else {
            None
        }
    }
}

/// Delivers messages straight to a relay, recording what was sent
pub struct RelayMessenger<S> {
    relay: Rc<BackgroundRelay<S>>,
    sent: Rc<RefCell<Vec<RelayRequest>>>,
}

impl<S> Clone for RelayMessenger<S> {
    fn clone(&self) -> Self {
        RelayMessenger {
            relay: Rc::clone(&self.relay),
            sent: Rc::clone(&self.sent),
        }
    }
}

impl<S: StorageClient> RelayMessenger<S> {
    pub fn new(relay: BackgroundRelay<S>) -> Self {
        RelayMessenger {
            relay: Rc::new(relay),
            sent: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn sent(&self) -> Vec<RelayRequest> {
        self.sent.borrow().clone()
    }
}

impl<S: StorageClient> MessageClient for RelayMessenger<S> {
    async fn send(&self, request: RelayRequest) -> Result<RelayResponse, MessageError> {
        self.sent.borrow_mut().push(request.clone());
        Ok(self.relay.handle(request).await)
    }
}

pub struct FailingMessenger;

impl MessageClient for FailingMessenger {
    async fn send(&self, _request: RelayRequest) -> Result<RelayResponse, MessageError> {
        Err(MessageError::Unreachable("receiving end does not exist".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserDataCall {
    AddUser(String),
    GetUserData(String),
    UpdateUser(UserProfile),
    UpdateSolvedWithLeetCode(String),
    SolvedQuestions(String),
    AddSolved(String, String),
    RemoveSolved(String, String),
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Ok,
    Rejecting,
    Failing,
}

#[derive(Clone)]
pub struct FakeUserData {
    mode: Mode,
    profile: UserProfile,
    solved: Option<Vec<String>>,
    calls: Rc<RefCell<Vec<UserDataCall>>>,
}

impl FakeUserData {
    fn with_mode(mode: Mode) -> Self {
        FakeUserData {
            mode,
            profile: UserProfile::default(),
            solved: None,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn new() -> Self {
        FakeUserData::with_mode(Mode::Ok)
    }

    /// Every call answers `status: false`
    pub fn rejecting() -> Self {
        FakeUserData::with_mode(Mode::Rejecting)
    }

    /// Every call fails in transport
    pub fn failing() -> Self {
        FakeUserData::with_mode(Mode::Failing)
    }

    pub fn with_solved(solved: Vec<&str>) -> Self {
        FakeUserData {
            solved: Some(solved.into_iter().map(String::from).collect()),
            ..FakeUserData::new()
        }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn calls(&self) -> Vec<UserDataCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, endpoint: &str, call: UserDataCall) -> Result<(), NetworkError> {
        self.calls.borrow_mut().push(call);
        match self.mode {
            Mode::Ok => Ok(()),
            Mode::Rejecting => Err(NetworkError::rejected(endpoint, Some("nope".to_string()))),
            Mode::Failing => Err(NetworkError::transport(endpoint, "connection refused")),
        }
    }
}

impl UserDataService for FakeUserData {
    async fn add_user(&self, email: &str) -> Result<(), NetworkError> {
        self.record("addUser", UserDataCall::AddUser(email.to_string()))
    }

    async fn get_user_data(&self, email: &str) -> Result<UserProfile, NetworkError> {
        self.record("getUserData", UserDataCall::GetUserData(email.to_string()))?;
        Ok(self.profile.clone())
    }

    async fn update_user(&self, profile: &UserProfile) -> Result<(), NetworkError> {
        self.record("updateUser", UserDataCall::UpdateUser(profile.clone()))
    }

    async fn update_solved_with_leetcode(&self, email: &str) -> Result<(), NetworkError> {
        self.record(
            "updateSolvedWithLeetCode",
            UserDataCall::UpdateSolvedWithLeetCode(email.to_string()),
        )
    }

    async fn solved_questions(&self, email: &str) -> Result<Option<Vec<String>>, NetworkError> {
        self.record("getSolvedQuestions", UserDataCall::SolvedQuestions(email.to_string()))?;
        Ok(self.solved.clone())
    }

    async fn add_solved_question(&self, email: &str, slug: &str) -> Result<(), NetworkError> {
        self.record(
            "addSolvedQuestion",
            UserDataCall::AddSolved(email.to_string(), slug.to_string()),
        )
    }

    async fn remove_solved_question(&self, email: &str, slug: &str) -> Result<(), NetworkError> {
        self.record(
            "removeSolvedQuestion",
            UserDataCall::RemoveSolved(email.to_string(), slug.to_string()),
        )
    }
}

pub struct FakeRecommender {
    ranked: Option<Vec<Recommendation>>,
    requests: RefCell<Vec<(Vec<String>, usize)>>,
}

impl FakeRecommender {
    pub fn returning(ranked: Vec<Recommendation>) -> Self {
        FakeRecommender {
            ranked: Some(ranked),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        FakeRecommender {
            ranked: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Vec<String>, usize)> {
        self.requests.borrow().clone()
    }
}

impl RecommendationService for FakeRecommender {
    async fn recommend(
        &self,
        solved: &[String],
        count: usize,
    ) -> Result<Vec<Recommendation>, NetworkError> {
        self.requests.borrow_mut().push((solved.to_vec(), count));
        self.ranked
            .clone()
            .ok_or_else(|| NetworkError::transport("recommend", "connection refused"))
    }
}

#[derive(Default)]
pub struct FakeAvatars {
    images: RefCell<HashMap<String, Vec<u8>>>,
    names: RefCell<Vec<String>>,
}

impl FakeAvatars {
    pub fn new() -> Self {
        FakeAvatars::default()
    }

    pub fn names(&self) -> Vec<String> {
        self.names.borrow().clone()
    }
}

impl AvatarService for FakeAvatars {
    async fn download(&self, filename: &str) -> Result<Vec<u8>, NetworkError> {
        self.names.borrow_mut().push(filename.to_string());
        self.images
            .borrow()
            .get(filename)
            .cloned()
            .ok_or(NetworkError::Status {
                endpoint: "download".to_string(),
                status: 404,
            })
    }

    async fn upload(&self, filename: &str, image: Vec<u8>) -> Result<(), NetworkError> {
        self.names.borrow_mut().push(filename.to_string());
        self.images.borrow_mut().insert(filename.to_string(), image);
        Ok(())
    }

    async fn delete(&self, filename: &str) -> Result<(), NetworkError> {
        self.names.borrow_mut().push(filename.to_string());
        self.images.borrow_mut().remove(filename);
        Ok(())
    }
}

pub struct FakeIdentity {
    email: Option<String>,
    error_code: Option<String>,
    attempts: Cell<usize>,
}

impl FakeIdentity {
    pub fn issuing(email: &str) -> Self {
        FakeIdentity {
            email: Some(email.to_string()),
            error_code: None,
            attempts: Cell::new(0),
        }
    }

    pub fn rejecting(code: &str) -> Self {
        FakeIdentity {
            email: None,
            error_code: Some(code.to_string()),
            attempts: Cell::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }

    fn issue(&self) -> Result<AuthToken, AuthError> {
        self.attempts.set(self.attempts.get() + 1);
        match (&self.email, &self.error_code) {
            (_, Some(code)) => Err(provider_error(code)),
            (Some(email), None) => Ok(encode_test_token(&serde_json::json!({ "email": email }))),
            (None, None) => Err(AuthError::Provider("no account".to_string())),
        }
    }
}

impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthToken, AuthError> {
        self.issue()
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<AuthToken, AuthError> {
        self.issue()
    }
}

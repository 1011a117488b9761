/// Profile view state: load, edit/save, avatar

use log::{error, info, warn};

use crate::api::{AvatarService, UserDataService, UserProfile};
use crate::error::NetworkError;

pub const MSG_PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const MSG_PROFILE_REJECTED: &str = "Failed to update user data.";
pub const MSG_PROFILE_ERROR: &str = "An error occurred while updating.";

/// How long a notification stays on screen
pub const NOTIFICATION_MILLIS: u64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    fn success(message: &str) -> Self {
        Notification {
            message: message.to_string(),
            kind: NotificationKind::Success,
        }
    }

    fn error(message: &str) -> Self {
        Notification {
            message: message.to_string(),
            kind: NotificationKind::Error,
        }
    }
}

/// Which field of the profile form changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Username,
    Name,
    Institution,
}

/// State transitions of the profile form. Async work happens outside; its
/// result comes back as `SaveFinished`.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    Loaded(Option<UserProfile>),
    BeginEdit,
    SetField(ProfileField, String),
    SaveStarted,
    SaveFinished(Result<(), NetworkError>),
    /// Carries the notice number it was scheduled for; stale timers are ignored
    ClearNotification(u32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEditor {
    pub profile: Option<UserProfile>,
    pub editing: bool,
    pub saving: bool,
    pub error: Option<String>,
    pub notification: Option<Notification>,
    /// Bumped each time a save result sets a notification
    pub notice: u32,
}

impl ProfileEditor {
    pub fn with_profile(profile: UserProfile) -> Self {
        ProfileEditor {
            profile: Some(profile),
            ..ProfileEditor::default()
        }
    }

    pub fn apply(&mut self, action: EditorAction) {
        match action {
            EditorAction::Loaded(profile) => {
                *self = profile.map(ProfileEditor::with_profile).unwrap_or_default();
            }
            EditorAction::BeginEdit => self.editing = true,
            EditorAction::SetField(field, value) => self.set_field(field, value),
            EditorAction::SaveStarted => self.saving = true,
            EditorAction::SaveFinished(result) => self.finish_save(result),
            EditorAction::ClearNotification(notice) => {
                if notice == self.notice {
                    self.clear_notification();
                }
            }
        }
    }

    /// Edits are accepted only while in editing mode and not mid-save.
    pub fn set_field(&mut self, field: ProfileField, value: String) {
        if !self.editing || self.saving {
            return;
        }
        if let Some(profile) = self.profile.as_mut() {
            match field {
                ProfileField::Username => profile.username = value,
                ProfileField::Name => profile.name = value,
                ProfileField::Institution => profile.institution = value,
            }
        }
    }

    /// Profile to PATCH when the button is in its Save role and no save is
    /// already running.
    pub fn save_request(&self) -> Option<UserProfile> {
        if !self.editing || self.saving {
            return None;
        }
        self.profile.clone()
    }

    /// Notice number the next save result will carry.
    pub fn next_notice(&self) -> u32 {
        self.notice.wrapping_add(1)
    }

    fn finish_save(&mut self, result: Result<(), NetworkError>) {
        match result {
            Ok(()) => {
                info!("Profile updated");
                self.error = None;
                self.notification = Some(Notification::success(MSG_PROFILE_UPDATED));
            }
            Err(NetworkError::Rejected { message, .. }) => {
                warn!("Profile update rejected: {}", message);
                self.error = Some(MSG_PROFILE_REJECTED.to_string());
                self.notification = Some(Notification::error(MSG_PROFILE_REJECTED));
            }
            Err(e) => {
                error!("Error updating user data: {}", e);
                self.error = Some(MSG_PROFILE_ERROR.to_string());
                self.notification = Some(Notification::error(MSG_PROFILE_ERROR));
            }
        }
        self.notice = self.next_notice();
        self.saving = false;
        self.editing = false;
    }

    /// The Edit/Save button. Outside editing mode it only enters editing;
    /// inside, it saves and always leaves editing mode.
    pub async fn edit_or_save<U: UserDataService>(&mut self, user_data: &U) {
        if !self.editing {
            self.apply(EditorAction::BeginEdit);
            return;
        }
        let Some(profile) = self.save_request() else {
            self.editing = false;
            return;
        };

        self.apply(EditorAction::SaveStarted);
        let result = user_data.update_user(&profile).await;
        self.apply(EditorAction::SaveFinished(result));
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }
}

/// Refresh solved counts from LeetCode, then read the profile.
/// Both calls are best effort; `None` means the profile is unavailable.
pub async fn load_profile<U: UserDataService>(user_data: &U, email: &str) -> Option<UserProfile> {
    if let Err(e) = user_data.update_solved_with_leetcode(email).await {
        warn!("Failed to update solved problems with LeetCode: {}", e);
    }

    match user_data.get_user_data(email).await {
        Ok(mut profile) => {
            if profile.email.is_empty() {
                profile.email = email.to_string();
            }
            Some(profile)
        }
        Err(e) => {
            warn!("Failed to fetch user data: {}", e);
            None
        }
    }
}

/// Storage name of a user's avatar: the first `@` and the first `.` each
/// become `-`, then `.png` is appended.
pub fn avatar_filename(email: &str) -> String {
    format!("{}.png", email.replacen('@', "-", 1).replacen('.', "-", 1))
}

pub async fn fetch_avatar<A: AvatarService>(avatars: &A, email: &str) -> Option<Vec<u8>> {
    match avatars.download(&avatar_filename(email)).await {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => None,
        Err(e) => {
            info!("Failed to fetch image: {}", e);
            None
        }
    }
}

pub async fn upload_avatar<A: AvatarService>(avatars: &A, email: &str, image: Vec<u8>) {
    if let Err(e) = avatars.upload(&avatar_filename(email), image).await {
        warn!("Image upload failed: {}", e);
    }
}

pub async fn delete_avatar<A: AvatarService>(avatars: &A, email: &str) {
    if let Err(e) = avatars.delete(&avatar_filename(email)).await {
        warn!("Failed to delete image: {}", e);
    }
}

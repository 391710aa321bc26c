use super::{super::error::*, client::*, models::*};

use {
    bytes::*,
    http::{request::*, response::*},
    serde_json::json,
    std::result::Result,
    tower::*,
};

/// Users resource.
pub const USERS: &str = "/dashboard/users";

/// Notifications resource.
pub const NOTIFICATIONS: &str = "/dashboard/users/notifications";

/// Profiles resource.
pub const PROFILES: &str = "/dashboard/profiles";

/// Namespaces resource.
pub const NAMESPACES: &str = "/dashboard/namespaces";

impl<ServiceT> ApiClient<ServiceT>
where
    ServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone,
{
    /// The current user.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let response: UserResponse = self.get(&format!("{}/current", USERS)).await?;
        Ok(response.user)
    }

    /// Get a user.
    pub async fn user(&self, id: &str) -> Result<User, ApiError> {
        let response: UserResponse = self.get(&format!("{}/{}", USERS, id)).await?;
        Ok(response.user)
    }

    /// Register with email and password.
    pub async fn register(&self, user: &User) -> Result<Acknowledgement, ApiError> {
        self.post("/register", user).await
    }

    /// Register the identity provider's account.
    pub async fn register_with_identity_provider(&self) -> Result<Acknowledgement, ApiError> {
        self.post("/register/msal", &json!({})).await
    }

    /// Log in with email and password.
    ///
    /// On success the returned token becomes the current token.
    pub async fn login(&self, user: &User) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.post("/login", user).await?;
        if !response.token.is_empty() {
            tracing::info!("login: {}", user.email);
            self.tokens().set_token(response.token.clone());
        }
        Ok(response)
    }

    /// The current user's notifications.
    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let response: NotificationsResponse = self.get(NOTIFICATIONS).await?;
        Ok(response.notifications)
    }

    /// Mark a notification as read.
    pub async fn read_notification(&self, notification: &Notification) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.patch(NOTIFICATIONS, notification).await?;
        self.invalidate(&[NOTIFICATIONS]);
        Ok(acknowledgement)
    }

    /// Mark all notifications as read.
    pub async fn read_all_notifications(&self) -> Result<Acknowledgement, ApiError> {
        let acknowledgement = self.delete(NOTIFICATIONS).await?;
        self.invalidate(&[NOTIFICATIONS]);
        Ok(acknowledgement)
    }

    /// All member profiles.
    pub async fn profiles(&self) -> Result<Vec<Profile>, ApiError> {
        let response: ProfilesResponse = self.get(PROFILES).await?;
        Ok(response.profiles)
    }

    /// Name of a namespace.
    pub async fn namespace(&self, id: &str) -> Result<String, ApiError> {
        let response: NamespaceResponse = self.get(&format!("{}/{}", NAMESPACES, id)).await?;
        Ok(response.namespace)
    }

    /// Whether the server is up.
    ///
    /// Any response at all counts as up: only a transport failure means down.
    pub async fn health(&self) -> Result<bool, ApiError> {
        match self.get::<serde_json::Value>("/health").await {
            Ok(_) | Err(ApiError::Status { .. } | ApiError::Decode(_)) => Ok(true),
            Err(ApiError::Pipeline(error)) if error.is_transport() => Ok(false),
            Err(error) => Err(error),
        }
    }
}

use crate::api::{CurrentUser, DeviceTokenRequest};

/// Pairs the signed-in user reported by the page with the device's push token.
///
/// A registration is produced once per distinct (user, model, token) triple.
#[derive(Debug, Default)]
pub struct TokenRegistrar {
    user: Option<CurrentUser>,
    device_token: Option<String>,
    last_sent: Option<DeviceTokenRequest>,
}

impl TokenRegistrar {
    pub fn new(device_token: Option<String>) -> Self {
        Self {
            device_token,
            ..Self::default()
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Feeds the page-script payload (JSON text or `null`).
    pub fn observe_page_message(&mut self, payload: &str) -> Option<DeviceTokenRequest> {
        match CurrentUser::from_page_message(payload) {
            Some(user) => self.user = Some(user),
            None => log::debug!("page message carries no user"),
        }
        self.pending()
    }

    fn pending(&mut self) -> Option<DeviceTokenRequest> {
        let (user_id, model) = self.user.as_ref()?.registration_key()?;
        let request = DeviceTokenRequest {
            user_id: user_id.clone(),
            model: model.to_string(),
            device_token: self.device_token.clone()?,
        };
        if self.last_sent.as_ref() == Some(&request) {
            return None;
        }
        self.last_sent = Some(request.clone());
        Some(request)
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the device-token registration call.
///
/// `userId` is forwarded exactly as the page published it, string or number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceTokenRequest {
    #[serde(rename = "userId")]
    pub user_id: Value,
    pub model: String,
    pub device_token: String,
}

/// The signed-in user as published by the page script.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CurrentUser {
    /// A non-empty string or a number, kept in its JSON form.
    pub id: Option<Value>,
    pub model: Option<String>,
}

impl CurrentUser {
    /// Parses the page message. `null`, non-objects and garbage yield `None`.
    ///
    /// The site is inconsistent about key names: the id comes from `id` or
    /// `user_id`, the model from `modal` or `model`, first non-empty wins.
    pub fn from_page_message(payload: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(payload).ok()?;
        let object = value.as_object()?;
        let pick = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| object.get(*key))
                .find(|value| is_present(value))
                .cloned()
        };
        Some(Self {
            id: pick(&["id", "user_id"][..]),
            model: pick(&["modal", "model"][..]).and_then(|model| match model {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
        })
    }

    /// Both identifiers needed by the registration endpoint.
    pub fn registration_key(&self) -> Option<(&Value, &str)> {
        Some((self.id.as_ref()?, self.model.as_deref()?))
    }

    /// The id as text, without JSON quoting.
    pub fn id_label(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
        _ => false,
    }
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub token_endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token_endpoint: crate::config::DEFAULT_TOKEN_ENDPOINT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_with_primary_keys() {
        let user = CurrentUser::from_page_message(r#"{"id":"17","model":"student"}"#).unwrap();
        assert_eq!(
            user.registration_key(),
            Some((&Value::from("17"), "student"))
        );
    }

    #[test]
    fn test_parse_user_with_alternate_keys() {
        let user =
            CurrentUser::from_page_message(r#"{"user_id":42,"modal":"staff","name":"A"}"#).unwrap();
        assert_eq!(user.registration_key(), Some((&Value::from(42), "staff")));
        assert_eq!(user.id_label().as_deref(), Some("42"));
    }

    #[test]
    fn test_null_and_garbage_are_ignored() {
        assert!(CurrentUser::from_page_message("null").is_none());
        assert!(CurrentUser::from_page_message("\"null\"").is_none());
        assert!(CurrentUser::from_page_message("not json").is_none());
        assert!(CurrentUser::from_page_message("[1,2]").is_none());
    }

    #[test]
    fn test_first_non_empty_key_wins() {
        let user =
            CurrentUser::from_page_message(r#"{"id":"","user_id":"9","modal":"a","model":"b"}"#)
                .unwrap();
        assert_eq!(user.registration_key(), Some((&Value::from("9"), "a")));
    }

    #[test]
    fn test_user_without_model_has_no_key() {
        let user = CurrentUser::from_page_message(r#"{"id":"17"}"#).unwrap();
        assert!(user.registration_key().is_none());
    }

    #[test]
    fn test_request_wire_keys() {
        let request = DeviceTokenRequest {
            user_id: Value::from("17"),
            model: "student".into(),
            device_token: "tok".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"userId": "17", "model": "student", "device_token": "tok"})
        );
    }

    #[test]
    fn test_numeric_id_stays_a_number_on_the_wire() {
        let user =
            CurrentUser::from_page_message(r#"{"user_id":42,"modal":"student"}"#).unwrap();
        let (id, model) = user.registration_key().unwrap();
        let request = DeviceTokenRequest {
            user_id: id.clone(),
            model: model.to_string(),
            device_token: "tok".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["userId"], serde_json::json!(42));
        assert!(json["userId"].is_number());
    }
}

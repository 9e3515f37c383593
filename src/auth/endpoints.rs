//! The endpoints for the authorization gate, allow-list administration, and
//! the identity mirror.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, FieldError,
    user::{User, UserDraft},
};

/// The ID under which the single local profile is mirrored.
const LOCAL_USER_ID: &str = "local-user";

/// A JSON body carrying a single email address.
#[derive(Debug, Default, Deserialize)]
pub struct EmailPayload {
    /// The email to check, add, or remove.
    pub email: Option<String>,
}

impl EmailPayload {
    fn require_email(self) -> Result<String, Error> {
        match self.email {
            Some(email) if !email.trim().is_empty() => Ok(email),
            _ => Err(Error::Validation(vec![FieldError::new(
                "email",
                "is required",
            )])),
        }
    }
}

/// One allow-list entry as shown by the admin view.
#[derive(Debug, Serialize)]
pub struct AdminUser {
    /// The email on the list.
    pub email: String,
    /// Always true; only authorized entries are stored.
    pub authorized: bool,
}

/// A route handler that checks an email against the allow-list.
///
/// Responds with 403 for an email that is not on the list, and 400 when the
/// email is missing. The check never fails open: membership is decided
/// entirely in memory.
pub async fn check_authorization_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> Result<Response, Error> {
    let email = payload.require_email()?;

    let authorized = state.allow_list.lock().unwrap().is_authorized(&email);

    if authorized {
        Ok(Json(serde_json::json!({ "authorized": true })).into_response())
    } else {
        Ok((
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "authorized": false,
                "message": "This email is not authorized to access the application",
            })),
        )
            .into_response())
    }
}

/// A route handler listing the emails on the allow-list.
pub async fn get_authorized_emails_endpoint(State(state): State<AppState>) -> Response {
    let emails = state.allow_list.lock().unwrap().emails().to_vec();

    Json(serde_json::json!({ "emails": emails })).into_response()
}

/// A route handler adding an email to the allow-list.
///
/// The addition lasts until the process restarts.
pub async fn add_email_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> Result<Response, Error> {
    let email = payload.require_email()?;

    let emails = {
        let mut allow_list = state.allow_list.lock().unwrap();
        allow_list.add(&email);
        allow_list.emails().to_vec()
    };

    Ok(Json(serde_json::json!({ "message": "Email added", "emails": emails })).into_response())
}

/// A route handler removing an email from the allow-list.
///
/// Removing an email that is not on the list is a no-op.
pub async fn remove_email_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> Result<Response, Error> {
    let email = payload.require_email()?;

    let emails = {
        let mut allow_list = state.allow_list.lock().unwrap();
        allow_list.remove(&email);
        allow_list.emails().to_vec()
    };

    Ok(Json(serde_json::json!({ "message": "Email removed", "emails": emails })).into_response())
}

/// A route handler listing the allow-list as admin user records.
pub async fn get_admin_users_endpoint(State(state): State<AppState>) -> Json<Vec<AdminUser>> {
    let users = state
        .allow_list
        .lock()
        .unwrap()
        .emails()
        .iter()
        .map(|email| AdminUser {
            email: email.clone(),
            authorized: true,
        })
        .collect();

    Json(users)
}

/// A route handler adding an allow-list entry through the admin view.
pub async fn add_admin_user_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> Result<Response, Error> {
    let email = payload.require_email()?;

    state.allow_list.lock().unwrap().add(&email);

    Ok(Json(serde_json::json!({ "message": "User added", "email": email })).into_response())
}

/// A route handler removing an allow-list entry through the admin view.
pub async fn remove_admin_user_endpoint(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Json<serde_json::Value> {
    state.allow_list.lock().unwrap().remove(&email);

    Json(serde_json::json!({ "message": "User removed" }))
}

/// A route handler serving the mirrored identity record.
///
/// The external auth collaborator expects a stable profile to exist; the
/// first request mirrors a default local profile and later requests return
/// it unchanged.
pub async fn get_current_user_endpoint(
    State(state): State<AppState>,
) -> Result<Json<User>, Error> {
    if let Some(user) = state.storage.get_user(LOCAL_USER_ID).await? {
        return Ok(Json(user));
    }

    let email = state.allow_list.lock().unwrap().emails().first().cloned();

    let user = state
        .storage
        .upsert_user(UserDraft {
            id: LOCAL_USER_ID.to_string(),
            email,
            first_name: Some("Local".to_string()),
            last_name: Some("User".to_string()),
            profile_image_url: None,
        })
        .await?;

    Ok(Json(user))
}

#[cfg(test)]
mod auth_endpoint_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{AUTHORIZED_EMAIL, test_server},
    };

    #[tokio::test]
    async fn authorizes_a_listed_email_case_insensitively() {
        let server = test_server();

        let response = server
            .post(endpoints::CHECK_AUTHORIZATION)
            .json(&serde_json::json!({ "email": AUTHORIZED_EMAIL.to_uppercase() }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["authorized"], true);
    }

    #[tokio::test]
    async fn refuses_an_unlisted_email() {
        let server = test_server();

        let response = server
            .post(endpoints::CHECK_AUTHORIZATION)
            .json(&serde_json::json!({ "email": "stranger@elsewhere.com" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: serde_json::Value = response.json();
        assert_eq!(body["authorized"], false);
    }

    #[tokio::test]
    async fn requires_an_email() {
        let server = test_server();

        let response = server
            .post(endpoints::CHECK_AUTHORIZATION)
            .json(&serde_json::json!({}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["errors"][0]["field"], "email");
    }

    #[tokio::test]
    async fn added_emails_authorize_until_removed() {
        let server = test_server();
        let email = "guest@elsewhere.com";

        server
            .post(endpoints::ADD_EMAIL)
            .json(&serde_json::json!({ "email": email }))
            .await
            .assert_status_ok();
        server
            .post(endpoints::CHECK_AUTHORIZATION)
            .json(&serde_json::json!({ "email": email }))
            .await
            .assert_status_ok();

        server
            .delete(endpoints::REMOVE_EMAIL)
            .json(&serde_json::json!({ "email": email }))
            .await
            .assert_status_ok();
        server
            .post(endpoints::CHECK_AUTHORIZATION)
            .json(&serde_json::json!({ "email": email }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn lists_the_allow_list_both_ways() {
        let server = test_server();

        let emails: serde_json::Value = server.get(endpoints::AUTHORIZED_EMAILS).await.json();
        assert_eq!(emails["emails"][0], AUTHORIZED_EMAIL);

        let admin: serde_json::Value = server.get(endpoints::ADMIN_USERS).await.json();
        assert_eq!(admin[0]["email"], AUTHORIZED_EMAIL);
        assert_eq!(admin[0]["authorized"], true);
    }

    #[tokio::test]
    async fn admin_can_add_and_remove_entries() {
        let server = test_server();
        let email = "second@elsewhere.com";

        server
            .post(endpoints::ADMIN_USERS)
            .json(&serde_json::json!({ "email": email }))
            .await
            .assert_status_ok();

        let admin: serde_json::Value = server.get(endpoints::ADMIN_USERS).await.json();
        assert_eq!(admin.as_array().unwrap().len(), 2);

        server
            .delete(&format!("/api/admin/users/{email}"))
            .await
            .assert_status_ok();

        let admin: serde_json::Value = server.get(endpoints::ADMIN_USERS).await.json();
        assert_eq!(admin.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mirrors_a_stable_local_profile() {
        let server = test_server();

        let first: serde_json::Value = server.get(endpoints::AUTH_USER).await.json();
        let second: serde_json::Value = server.get(endpoints::AUTH_USER).await.json();

        assert_eq!(first["id"], "local-user");
        assert_eq!(first["email"], AUTHORIZED_EMAIL);
        assert_eq!(second["createdAt"], first["createdAt"]);
    }
}

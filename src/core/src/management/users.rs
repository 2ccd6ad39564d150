use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;
use uuid::Uuid;

use crate::error_handling::types::DataError;
use crate::models::{Role, User};
use crate::storage::{Collection, Store};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub display_name: String,
    pub email: String,
    pub password_secret: String,
    pub role: Role,
    #[serde(default)]
    pub profile_image_ref: Option<String>,
}

/// Fields a user may change. `None` leaves the field as it is; role is not editable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the image.
    pub profile_image_ref: Option<Option<String>>,
}

fn check_email(users: &[User], email: &str, except_id: Option<&str>) -> Result<(), DataError> {
    if !email.contains('@') {
        return Err(DataError::Malformed(format!("'{}' is not an email address", email)));
    }
    let taken = users
        .iter()
        .any(|u| Some(u.id.as_str()) != except_id && u.email.eq_ignore_ascii_case(email));
    if taken {
        return Err(DataError::Malformed(format!("email {} is already registered", email)));
    }
    Ok(())
}

/// Creates an account. Only one admin may ever exist.
pub fn register_user(store: &Store, new_user: NewUser, now: DateTime<Utc>) -> Result<User, DataError> {
    let display_name = new_user.display_name.trim().to_string();
    let email = new_user.email.trim().to_string();
    if display_name.is_empty() || email.is_empty() {
        return Err(DataError::Malformed("display name and email are required".into()));
    }

    let user = store.update(Collection::Users, |users: &mut Vec<User>| {
        check_email(users, &email, None)?;
        if new_user.role == Role::Admin && users.iter().any(|u| u.role == Role::Admin) {
            return Err(DataError::Malformed("an admin account already exists".into()));
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            display_name,
            email,
            password_secret: new_user.password_secret,
            role: new_user.role,
            profile_image_ref: new_user.profile_image_ref,
            joined_at: now,
            last_active_at: now,
        };
        users.push(user.clone());
        Ok(user)
    })?;
    info!("Registered {} {}", user.role.as_str(), user.id);
    Ok(user)
}

pub fn update_profile(store: &Store, user_id: &str, update: ProfileUpdate) -> Result<User, DataError> {
    store.update(Collection::Users, |users: &mut Vec<User>| {
        if let Some(email) = &update.email {
            check_email(users, email.trim(), Some(user_id))?;
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DataError::not_found("user", user_id))?;
        if let Some(name) = update.display_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DataError::Malformed("display name cannot be empty".into()));
            }
            user.display_name = name.to_string();
        }
        if let Some(email) = update.email {
            user.email = email.trim().to_string();
        }
        if let Some(image) = update.profile_image_ref {
            user.profile_image_ref = image;
        }
        Ok(user.clone())
    })
}

pub fn touch_last_active(store: &Store, user_id: &str, at: DateTime<Utc>) -> Result<(), DataError> {
    store.update(Collection::Users, |users: &mut Vec<User>| {
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DataError::not_found("user", user_id))?;
        user.last_active_at = user.last_active_at.max(at);
        Ok(())
    })
}

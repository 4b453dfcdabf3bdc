//! Account commands: register, login, logout, whoami, profile, recover.
//!
//! # Usage
//!
//! ```bash
//! shopfront register -u alice -e alice@example.com
//! SHOPFRONT_PASSWORD='Pa$w0rd' shopfront login -e alice@example.com
//! shopfront profile -u alice2 -e alice2@example.com
//! shopfront recover -e alice@example.com
//! shopfront logout
//! ```

use std::error::Error;

use shopfront_client::recovery;
use shopfront_core::forms::{EditProfileForm, LoginForm, RecoverForm, RegisterForm};

use super::{App, say};
use crate::telemetry;

/// Validate the registration form, register and log in.
pub async fn register(app: &App, form: RegisterForm) -> Result<(), Box<dyn Error>> {
    let registration = form.validate()?;
    let identity = app.auth().register_and_login(&registration).await?;

    telemetry::set_sentry_user(&identity);
    say(format_args!(
        "Registered and logged in as {} <{}>",
        identity.username, identity.email
    ))?;
    Ok(())
}

/// Validate the login form and log in.
pub async fn login(app: &App, form: LoginForm) -> Result<(), Box<dyn Error>> {
    let credentials = form.validate()?;
    let identity = app.auth().authenticate(&credentials).await?;

    telemetry::set_sentry_user(&identity);
    say(format_args!(
        "Logged in as {} <{}>",
        identity.username, identity.email
    ))?;
    Ok(())
}

/// End the session.
pub fn logout(app: &App) -> Result<(), Box<dyn Error>> {
    app.auth().logout();
    telemetry::clear_sentry_user();
    say("Logged out")?;
    Ok(())
}

/// Show the current session.
pub fn whoami(app: &App) -> Result<(), Box<dyn Error>> {
    match app.sessions().current_session() {
        Some(identity) => say(format_args!(
            "{} <{}> (id {}, {})",
            identity.username, identity.email, identity.id, identity.role
        ))?,
        None => say("Not logged in")?,
    }
    Ok(())
}

/// Change the current user's username and email.
pub async fn edit_profile(app: &App, form: EditProfileForm) -> Result<(), Box<dyn Error>> {
    let update = form.validate()?;
    let identity = app.profiles().update_profile(&update).await?;

    telemetry::set_sentry_user(&identity);
    say(format_args!(
        "Profile updated: {} <{}>",
        identity.username, identity.email
    ))?;
    Ok(())
}

/// Request a password recovery email.
pub fn recover(form: &RecoverForm) -> Result<(), Box<dyn Error>> {
    let notice = recovery::request_recovery(form)?;
    say(notice)?;
    Ok(())
}

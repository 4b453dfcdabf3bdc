//! User directory commands.

use std::error::Error;

use shopfront_core::UserId;

use super::{App, say};

/// List every user in the directory.
pub async fn list(app: &App) -> Result<(), Box<dyn Error>> {
    for user in app.users().list_users().await? {
        say(format_args!(
            "{:>4}  {:<20} {:<32} {}",
            user.id, user.username, user.email, user.role
        ))?;
    }
    Ok(())
}

/// Delete a user from the directory.
pub async fn delete(app: &App, id: UserId) -> Result<(), Box<dyn Error>> {
    app.users().delete_user(id).await?;

    // Deleting yourself ends your session too.
    let sessions = app.sessions();
    if sessions.current_session().is_some_and(|session| session.id == id) {
        sessions.end();
    }

    say(format_args!("Deleted user {id}"))?;
    Ok(())
}

use chrono::DateTime;
use diary_api_client::Session;
use serde_json::json;

use crate::commands::output::print_json;
use crate::{Error, Result};

pub async fn login(session: &Session, username: &str, password: &str) -> Result<()> {
    let claims = session
        .login(username, password)
        .await
        .map_err(Error::api("log in"))?;

    // Tokens stay stored for an unknown role; only the landing page is missing.
    let Some(home) = session.home_route() else {
        return Err(Error::InvalidRole);
    };
    let role = claims.role.map(|r| r.as_str()).unwrap_or("none");
    println!("Logged in as {username} ({role}). Home: {home}");
    Ok(())
}

pub fn logout(session: &Session) -> Result<()> {
    session.logout();
    println!("Logged out.");
    Ok(())
}

pub fn whoami(session: &Session) -> Result<()> {
    let Some(claims) = session.current_user() else {
        println!("Not logged in.");
        return Ok(());
    };

    let expires = DateTime::from_timestamp(claims.exp, 0).map(|t| t.to_rfc3339());
    print_json(&json!({
        "user_id": claims.subject.to_string(),
        "role": claims.role.map(|r| r.as_str()),
        "expires_at": expires,
        "authenticated": claims.is_valid_at(session.now()),
        "home": session.home_route().map(|r| r.to_string()),
    }))
}

use diary_api_client::Session;
use diary_core::routes::GuardDecision;

use crate::Result;

/// Print the guard's decision for `path`. Redirects are an answer, not an
/// error.
pub fn navigate(session: &Session, path: &str) -> Result<()> {
    let (route, decision) = session.navigate(path);
    match decision {
        GuardDecision::Allow => println!("allow {route}"),
        GuardDecision::Redirect(target) => println!("redirect {target} (from {route})"),
    }
    Ok(())
}

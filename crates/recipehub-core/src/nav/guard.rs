use super::Route;

/// Outcome of checking one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(Route),
}

/// Decide whether `target` may be shown given the authentication state.
///
/// Editing views need a token; the login and registration views are skipped
/// once signed in.
pub fn evaluate(target: &Route, authenticated: bool) -> GuardDecision {
    if target.is_guarded() && !authenticated {
        GuardDecision::Redirect(Route::Login)
    } else if target.is_auth_page() && authenticated {
        GuardDecision::Redirect(Route::home())
    } else {
        GuardDecision::Pass
    }
}

use crate::session::SessionState;

/// What the caller should render for the current session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    /// Session resolution still in flight: show a neutral loading indicator.
    Loading,
    /// Unauthenticated: render nothing while the redirect side effect fires.
    Nothing,
    /// Authenticated: render the protected content.
    Protected,
}

/// Navigation sink. Redirects are explicit side effects issued by the guard,
/// never values produced by rendering.
pub trait Navigator {
    fn redirect_to_login(&mut self);
}

/// Gates protected views on the presence of an authenticated session.
///
/// Re-evaluated on every session-state change; there is no terminal state.
/// An unauthenticated resolution issues exactly one redirect, re-arming only
/// once the state leaves `Unauthenticated`.
#[derive(Debug, Default)]
pub struct SessionGuard {
    redirect_issued: bool,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, state: &SessionState, nav: &mut dyn Navigator) -> RenderDecision {
        match state {
            SessionState::Resolving => {
                self.redirect_issued = false;
                RenderDecision::Loading
            }
            SessionState::Unauthenticated => {
                if !self.redirect_issued {
                    self.redirect_issued = true;
                    nav.redirect_to_login();
                }
                RenderDecision::Nothing
            }
            SessionState::Authenticated(_) => {
                self.redirect_issued = false;
                RenderDecision::Protected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AdminUser, Role, Session};

    #[derive(Default)]
    struct RecordingNavigator {
        redirects: usize,
    }

    impl Navigator for RecordingNavigator {
        fn redirect_to_login(&mut self) {
            self.redirects += 1;
        }
    }

    fn authenticated() -> SessionState {
        SessionState::Authenticated(Session {
            token: "tok".to_string(),
            user: AdminUser { id: "a1".to_string(), role: Role::Admin },
        })
    }

    #[test]
    fn resolving_shows_loading_without_redirect() {
        let mut guard = SessionGuard::new();
        let mut nav = RecordingNavigator::default();

        let decision = guard.evaluate(&SessionState::Resolving, &mut nav);
        assert_eq!(decision, RenderDecision::Loading);
        assert_eq!(nav.redirects, 0);
    }

    #[test]
    fn unauthenticated_renders_nothing_and_redirects_exactly_once() {
        let mut guard = SessionGuard::new();
        let mut nav = RecordingNavigator::default();

        for _ in 0..3 {
            let decision = guard.evaluate(&SessionState::Unauthenticated, &mut nav);
            assert_eq!(decision, RenderDecision::Nothing);
        }
        assert_eq!(nav.redirects, 1);
    }

    #[test]
    fn authenticated_renders_protected_content() {
        let mut guard = SessionGuard::new();
        let mut nav = RecordingNavigator::default();

        let decision = guard.evaluate(&authenticated(), &mut nav);
        assert_eq!(decision, RenderDecision::Protected);
        assert_eq!(nav.redirects, 0);
    }

    #[test]
    fn redirect_rearms_after_leaving_unauthenticated() {
        let mut guard = SessionGuard::new();
        let mut nav = RecordingNavigator::default();

        guard.evaluate(&SessionState::Unauthenticated, &mut nav);
        guard.evaluate(&authenticated(), &mut nav);
        guard.evaluate(&SessionState::Unauthenticated, &mut nav);
        assert_eq!(nav.redirects, 2);
    }
}

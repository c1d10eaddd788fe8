//! Authentication and role gate for portal paths.
//!
//! The guard is a four-state machine evaluated on every change of the
//! auth snapshot or the current path. The auth check runs before the role
//! check, and the only side effect is a navigation through [`Navigator`].

/// Public entry route for sessions without authentication.
pub const ENTRY_ROUTE: &str = "/";
/// Subtree the restricted selection-process role may visit.
pub const RESTRICTED_PREFIX: &str = "/coord/processo-seletivo";
/// Where a restricted session lands when it strays outside its subtree.
pub const RESTRICTED_DEFAULT: &str = "/coord/processo-seletivo";

/// Auth state as reported by the external auth provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub is_equipe_ps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Unauthenticated,
    AuthenticatedUnrestricted,
    AuthenticatedRestricted,
}

/// What the guarded subtree should show after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    Loading,
    Nothing,
    Children,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: GuardState,
    pub redirect: Option<&'static str>,
    pub view: GuardView,
}

pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub visits: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, path: &str) {
        self.visits.push(path.to_string());
    }
}

pub fn transition(auth: AuthSnapshot, pathname: &str) -> Transition {
    if auth.is_loading {
        return Transition {
            state: GuardState::Loading,
            redirect: None,
            view: GuardView::Loading,
        };
    }

    if !auth.is_authenticated {
        return Transition {
            state: GuardState::Unauthenticated,
            redirect: Some(ENTRY_ROUTE),
            view: GuardView::Nothing,
        };
    }

    if auth.is_equipe_ps {
        if pathname.starts_with(RESTRICTED_PREFIX) {
            return Transition {
                state: GuardState::AuthenticatedRestricted,
                redirect: None,
                view: GuardView::Children,
            };
        }
        return Transition {
            state: GuardState::AuthenticatedRestricted,
            redirect: Some(RESTRICTED_DEFAULT),
            view: GuardView::Nothing,
        };
    }

    Transition {
        state: GuardState::AuthenticatedUnrestricted,
        redirect: None,
        view: GuardView::Children,
    }
}

#[derive(Debug)]
pub struct RouteGuard {
    state: GuardState,
    issued: Option<(AuthSnapshot, String)>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self {
            state: GuardState::Loading,
            issued: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Re-evaluates the guard. A redirect already issued for the same
    /// inputs is not issued again.
    pub fn evaluate<N: Navigator>(
        &mut self,
        auth: AuthSnapshot,
        pathname: &str,
        navigator: &mut N,
    ) -> GuardView {
        let next = transition(auth, pathname);
        self.state = next.state;

        match next.redirect {
            Some(target) => {
                let already_issued = self
                    .issued
                    .as_ref()
                    .is_some_and(|(seen, path)| *seen == auth && path == pathname);
                if !already_issued {
                    tracing::debug!(from = pathname, to = target, state = ?next.state, "guard redirect");
                    navigator.navigate(target);
                    self.issued = Some((auth, pathname.to_string()));
                }
            }
            None => self.issued = None,
        }

        next.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(is_loading: bool, is_authenticated: bool, is_equipe_ps: bool) -> AuthSnapshot {
        AuthSnapshot {
            is_loading,
            is_authenticated,
            is_equipe_ps,
        }
    }

    #[test]
    fn loading_wins_regardless_of_auth() {
        for (authenticated, equipe_ps) in [(false, false), (true, false), (true, true)] {
            let mut guard = RouteGuard::new();
            let mut nav = RecordingNavigator::default();
            let view = guard.evaluate(auth(true, authenticated, equipe_ps), "/coord/other", &mut nav);
            assert_eq!(view, GuardView::Loading);
            assert_eq!(guard.state(), GuardState::Loading);
            assert!(nav.visits.is_empty());
        }
    }

    #[test]
    fn unauthenticated_goes_to_entry_route() {
        let mut guard = RouteGuard::new();
        let mut nav = RecordingNavigator::default();
        let view = guard.evaluate(auth(false, false, false), "/coord/ciclos", &mut nav);
        assert_eq!(view, GuardView::Nothing);
        assert_eq!(guard.state(), GuardState::Unauthenticated);
        assert_eq!(nav.visits, vec!["/".to_string()]);
    }

    #[test]
    fn restricted_role_outside_subtree_is_redirected() {
        let mut guard = RouteGuard::new();
        let mut nav = RecordingNavigator::default();
        let view = guard.evaluate(auth(false, true, true), "/coord/other", &mut nav);
        assert_eq!(view, GuardView::Nothing);
        assert_eq!(guard.state(), GuardState::AuthenticatedRestricted);
        assert_eq!(nav.visits, vec!["/coord/processo-seletivo".to_string()]);
    }

    #[test]
    fn restricted_role_inside_subtree_renders_children() {
        let mut guard = RouteGuard::new();
        let mut nav = RecordingNavigator::default();
        let view = guard.evaluate(auth(false, true, true), "/coord/processo-seletivo/x", &mut nav);
        assert_eq!(view, GuardView::Children);
        assert_eq!(guard.state(), GuardState::AuthenticatedRestricted);
        assert!(nav.visits.is_empty());
    }

    #[test]
    fn unrestricted_session_renders_everything() {
        let mut guard = RouteGuard::new();
        let mut nav = RecordingNavigator::default();
        assert_eq!(
            guard.evaluate(auth(false, true, false), "/coord/ciclos/2", &mut nav),
            GuardView::Children
        );
        assert_eq!(guard.state(), GuardState::AuthenticatedUnrestricted);
        assert!(nav.visits.is_empty());
    }

    #[test]
    fn auth_check_precedes_role_check() {
        let next = transition(auth(false, false, true), "/coord/other");
        assert_eq!(next.state, GuardState::Unauthenticated);
        assert_eq!(next.redirect, Some(ENTRY_ROUTE));
    }

    #[test]
    fn same_inputs_do_not_navigate_twice() {
        let mut guard = RouteGuard::new();
        let mut nav = RecordingNavigator::default();
        guard.evaluate(auth(false, false, false), "/coord", &mut nav);
        guard.evaluate(auth(false, false, false), "/coord", &mut nav);
        assert_eq!(nav.visits.len(), 1);

        guard.evaluate(auth(false, false, false), "/coord/membros", &mut nav);
        assert_eq!(nav.visits.len(), 2);
    }

    #[test]
    fn loading_then_login_walks_through_states() {
        let mut guard = RouteGuard::new();
        let mut nav = RecordingNavigator::default();

        assert_eq!(guard.evaluate(auth(true, false, false), "/coord", &mut nav), GuardView::Loading);
        assert_eq!(guard.evaluate(auth(false, true, true), "/coord", &mut nav), GuardView::Nothing);
        assert_eq!(
            guard.evaluate(auth(false, true, true), "/coord/processo-seletivo", &mut nav),
            GuardView::Children
        );
        assert_eq!(nav.visits, vec!["/coord/processo-seletivo".to_string()]);
    }
}

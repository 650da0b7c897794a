use genmed_core::{Identity, Navigator, Role, Screen, SessionToken, TransitionError, Trigger};

fn init_logging() {
    genmed_logging::initialize_for_tests();
}

fn doctor() -> Identity {
    Identity {
        role: Role::Doctor,
        display_name: "Dr. Rao".to_string(),
        email: "rao@example.com".to_string(),
        session_token: Some(SessionToken::new("abc", "bearer")),
    }
}

fn at_role_selection() -> Navigator {
    let mut nav = Navigator::new();
    nav.fire(Trigger::GetStarted).unwrap();
    nav
}

#[test]
fn starts_on_landing_without_identity() {
    let nav = Navigator::new();
    assert_eq!(nav.screen(), Screen::Landing);
    assert!(nav.session().is_empty());
    assert_eq!(nav.selected_role(), None);
}

#[test]
fn healthcare_roles_go_through_authentication() {
    init_logging();
    for role in [Role::Doctor, Role::CommunityHealthWorker] {
        let mut nav = at_role_selection();
        let screen = nav.fire(Trigger::SelectRole(role)).unwrap();
        assert_eq!(screen, Screen::Authenticating(role));
        assert_eq!(nav.selected_role(), Some(role));
        assert!(nav.session().is_empty());
    }
}

#[test]
fn guest_bypasses_authentication() {
    let mut nav = at_role_selection();
    assert_eq!(nav.fire(Trigger::SelectRole(Role::Guest)), Ok(Screen::GuestMode));
    let identity = nav.session().identity().expect("guest identity");
    assert_eq!(identity.role, Role::Guest);
    assert!(identity.session_token.is_none());
}

#[test]
fn back_walks_towards_landing_and_clears_role() {
    let mut nav = at_role_selection();
    nav.fire(Trigger::SelectRole(Role::Doctor)).unwrap();

    assert_eq!(nav.fire(Trigger::Back), Ok(Screen::RoleSelection));
    assert_eq!(nav.selected_role(), None);
    assert_eq!(nav.fire(Trigger::Back), Ok(Screen::Landing));
}

#[test]
fn guest_back_returns_to_role_selection_without_identity() {
    let mut nav = at_role_selection();
    nav.fire(Trigger::SelectRole(Role::Guest)).unwrap();
    assert_eq!(nav.fire(Trigger::Back), Ok(Screen::RoleSelection));
    assert!(nav.session().is_empty());
}

#[test]
fn auth_success_stores_session_and_opens_dashboard() {
    let mut nav = at_role_selection();
    nav.fire(Trigger::SelectRole(Role::Doctor)).unwrap();
    assert_eq!(nav.fire(Trigger::AuthSucceeded(doctor())), Ok(Screen::Dashboard));
    assert_eq!(nav.session().identity(), Some(&doctor()));
}

#[test]
fn auth_success_outside_authentication_is_rejected() {
    init_logging();
    let mut nav = at_role_selection();
    nav.fire(Trigger::SelectRole(Role::Doctor)).unwrap();
    nav.fire(Trigger::AuthSucceeded(doctor())).unwrap();

    let intruder = Identity {
        email: "other@example.com".to_string(),
        ..doctor()
    };
    let err = nav.fire(Trigger::AuthSucceeded(intruder)).unwrap_err();
    assert_eq!(
        err,
        TransitionError::NotAuthenticating {
            from: Screen::Dashboard
        }
    );
    assert_eq!(nav.session().identity(), Some(&doctor()));
}

#[test]
fn auth_success_with_wrong_role_is_rejected() {
    let mut nav = at_role_selection();
    nav.fire(Trigger::SelectRole(Role::CommunityHealthWorker)).unwrap();
    let err = nav.fire(Trigger::AuthSucceeded(doctor())).unwrap_err();
    assert_eq!(
        err,
        TransitionError::RoleMismatch {
            expected: Role::CommunityHealthWorker,
            actual: Role::Doctor,
        }
    );
    assert_eq!(nav.screen(), Screen::Authenticating(Role::CommunityHealthWorker));
    assert!(nav.session().is_empty());
}

#[test]
fn logout_always_lands_on_landing_without_identity() {
    for role in [Role::Doctor, Role::CommunityHealthWorker] {
        let mut nav = at_role_selection();
        nav.fire(Trigger::SelectRole(role)).unwrap();
        nav.fire(Trigger::AuthSucceeded(Identity { role, ..doctor() }))
            .unwrap();

        assert_eq!(nav.fire(Trigger::Logout), Ok(Screen::Landing));
        assert!(nav.session().is_empty());
        assert_eq!(nav.selected_role(), None);
    }
}

#[test]
fn unlisted_triggers_leave_state_untouched() {
    let mut nav = Navigator::new();
    let before = nav.clone();

    assert_eq!(
        nav.fire(Trigger::Back),
        Err(TransitionError::NotAllowed {
            from: Screen::Landing,
            trigger: "back",
        })
    );
    assert!(nav.fire(Trigger::Logout).is_err());
    assert!(nav.fire(Trigger::SelectRole(Role::Doctor)).is_err());
    assert_eq!(nav, before);

    let mut guest = at_role_selection();
    guest.fire(Trigger::SelectRole(Role::Guest)).unwrap();
    assert!(guest.fire(Trigger::Logout).is_err());
    assert_eq!(guest.screen(), Screen::GuestMode);
}

#[test]
fn repeating_a_trigger_is_deterministic() {
    let mut a = at_role_selection();
    let mut b = at_role_selection();
    a.fire(Trigger::SelectRole(Role::Doctor)).unwrap();
    a.fire(Trigger::Back).unwrap();
    a.fire(Trigger::SelectRole(Role::Doctor)).unwrap();
    b.fire(Trigger::SelectRole(Role::Doctor)).unwrap();
    assert_eq!(a, b);
}

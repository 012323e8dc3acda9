mod common;

use action_filters::controller::{
    mark_controller, ControllerClass, ControllerKey, ControllerOptions, MemberKind,
};
use action_filters::filter::{ConfigError, ConfigStore};
use common::*;

#[test]
fn test_mark_controller_sets_inited() {
    let store = ConfigStore::new();

    let class = mark_controller::<UserController>(&store, &ControllerOptions::default()).unwrap();

    let config = store.get(&ControllerKey::of::<UserController>()).unwrap();
    assert!(config.is_inited);
    assert_eq!(class.name(), "UserController");
    assert_eq!(class.action_names().collect::<Vec<_>>(), vec!["login", "logout"]);
}

#[test]
fn test_suffix_is_enforced() {
    let store = ConfigStore::new();

    let err = mark_controller::<Accounts>(&store, &ControllerOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ConfigError::SuffixIllegal {
            controller: "Accounts".to_string(),
            suffix: "Controller".to_string(),
        }
    );
    assert!(store.get(&ControllerKey::of::<Accounts>()).is_none());
}

#[test]
fn test_custom_and_empty_suffix() {
    let store = ConfigStore::new();

    assert!(mark_controller::<Accounts>(&store, &ControllerOptions::suffix("")).is_ok());
    assert!(mark_controller::<UserController>(&store, &ControllerOptions::suffix("Ctrl")).is_err());
}

#[test]
fn test_duplicate_action_names_rejected() {
    let store = ConfigStore::new();

    let err = mark_controller::<ShadowController>(&store, &ControllerOptions::default()).unwrap_err();
    assert_eq!(
        err,
        ConfigError::DuplicateAction {
            controller: "ShadowController".to_string(),
            action: "GetUser".to_string(),
        }
    );
}

#[test]
fn test_constructor_member_is_not_an_action() {
    let store = ConfigStore::new();

    let class = mark_controller::<LegacyController>(&store, &ControllerOptions::default()).unwrap();
    assert_eq!(class.action_names().collect::<Vec<_>>(), vec!["index"]);
}

#[test]
fn test_lookup_table_is_case_insensitive() {
    let class = ControllerClass::<UserController>::new();

    assert!(matches!(class.find("LoGiN").map(|m| &m.kind), Some(MemberKind::Action(_))));
    assert!(matches!(class.find("PROFILE").map(|m| &m.kind), Some(MemberKind::Property)));
    assert!(class.find("unknown").is_none());
}

#[test]
fn test_controller_keys_are_distinct_per_type() {
    assert_eq!(ControllerKey::of::<UserController>(), ControllerKey::of::<UserController>());
    assert_ne!(ControllerKey::of::<UserController>(), ControllerKey::of::<OrderController>());
}

#[test]
fn test_errors_display() {
    let err = ConfigError::DuplicateController {
        controller: "UserController".to_string(),
    };
    assert!(err.to_string().contains("UserController"));
}

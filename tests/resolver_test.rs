mod common;

use action_filters::controller::{mark_controller, ControllerClass, ControllerOptions};
use action_filters::dispatch::{resolve, RequestContext, Resolution};
use action_filters::filter::{ConfigStore, FilterBinding, ScopeConfig, TargetKind};
use common::*;
use hyper::{Method, Uri};

fn request() -> RequestContext {
    RequestContext::new(Method::POST, Uri::from_static("/user/login"))
}

fn names(resolution: Resolution<UserController>) -> Vec<String> {
    resolution
        .matched()
        .expect("액션이 매칭되어야 함")
        .execution_list
        .iter()
        .map(|entry| entry.binding.name.to_string())
        .collect()
}

fn marked(store: &ConfigStore) -> ControllerClass<UserController> {
    mark_controller::<UserController>(store, &ControllerOptions::default()).unwrap()
}

#[test]
fn test_tiers_are_not_interleaved_by_weight() {
    let store = ConfigStore::new();
    let class = marked(&store);

    recorder("RateLimit", 10).bind_controller::<UserController>(&store).unwrap();
    recorder("Validate", 5).bind_action::<UserController>(&store, "login").unwrap();
    let globals = vec![recorder("Audit", 20).config()];

    let resolution = resolve(&class, &store, "login", &request(), &globals);
    assert_eq!(names(resolution), vec!["Validate", "RateLimit", "Audit"]);
}

#[test]
fn test_low_weight_action_filter_runs_before_heavy_controller_filter() {
    let store = ConfigStore::new();
    let class = marked(&store);

    recorder("Heavy", 100).bind_controller::<UserController>(&store).unwrap();
    recorder("Light", 1).bind_action::<UserController>(&store, "login").unwrap();

    let resolution = resolve(&class, &store, "login", &request(), &[]);
    assert_eq!(names(resolution), vec!["Light", "Heavy"]);
}

#[test]
fn test_weight_descending_and_stable_within_tier() {
    let store = ConfigStore::new();
    let class = marked(&store);

    for (name, weight) in [("A", 0), ("B", 5), ("C", 0), ("D", -3), ("E", 5), ("F", 12)] {
        recorder(name, weight).bind_controller::<UserController>(&store).unwrap();
    }

    let resolution = resolve(&class, &store, "login", &request(), &[]);
    assert_eq!(names(resolution), vec!["F", "B", "E", "A", "C", "D"]);
}

#[test]
fn test_global_filters_are_stably_sorted() {
    let store = ConfigStore::new();
    let class = marked(&store);

    let globals: Vec<FilterBinding> = [("G1", 1), ("G2", 3), ("G3", 1), ("G4", 3)]
        .into_iter()
        .map(|(name, weight)| recorder(name, weight).config())
        .collect();

    let resolution = resolve(&class, &store, "login", &request(), &globals);
    assert_eq!(names(resolution), vec!["G2", "G4", "G1", "G3"]);
}

#[test]
fn test_filter_bound_at_both_scopes_runs_once_as_action() {
    let store = ConfigStore::new();
    let class = marked(&store);

    let auth = record_filter("Auth");
    auth.with("controller".to_string()).weight(50).bind_controller::<UserController>(&store).unwrap();
    auth.with("action".to_string()).bind_action::<UserController>(&store, "login").unwrap();
    let globals = vec![auth.with("global".to_string()).config()];

    let resolved = resolve(&class, &store, "login", &request(), &globals)
        .matched()
        .unwrap();

    assert_eq!(resolved.execution_list.len(), 1);
    let entry = &resolved.execution_list[0];
    assert_eq!(entry.kind(), TargetKind::Action);
    assert_eq!(entry.binding.param::<String>().map(String::as_str), Some("action"));
    assert!(matches!(entry.options.target_info.config, Some(ScopeConfig::Action(_))));
}

#[test]
fn test_global_duplicates_are_not_deduplicated_among_themselves() {
    let store = ConfigStore::new();
    let class = marked(&store);

    let audit = recorder("Audit", 0).config();
    let globals = vec![audit.clone(), audit];

    let resolution = resolve(&class, &store, "login", &request(), &globals);
    assert_eq!(names(resolution), vec!["Audit", "Audit"]);
}

#[test]
fn test_global_entry_skipped_when_bound_on_controller() {
    let store = ConfigStore::new();
    let class = marked(&store);

    let audit = record_filter("Audit");
    audit.with("controller".to_string()).bind_controller::<UserController>(&store).unwrap();
    let globals = vec![audit.with("global".to_string()).weight(99).config()];

    let resolved = resolve(&class, &store, "login", &request(), &globals)
        .matched()
        .unwrap();
    assert_eq!(resolved.execution_list.len(), 1);
    assert_eq!(resolved.execution_list[0].kind(), TargetKind::Controller);
}

#[test]
fn test_target_info_per_tier() {
    let store = ConfigStore::new();
    let class = marked(&store);

    recorder("Ctrl", 0).bind_controller::<UserController>(&store).unwrap();
    recorder("Act", 0).bind_action::<UserController>(&store, "Login").unwrap();
    let globals = vec![recorder("Glob", 0).config()];

    let resolved = resolve(&class, &store, "LOGIN", &request(), &globals)
        .matched()
        .unwrap();
    let infos: Vec<_> = resolved
        .execution_list
        .iter()
        .map(|entry| (entry.options.target_info.kind, entry.options.target_info.name.clone()))
        .collect();

    assert_eq!(
        infos,
        vec![
            (TargetKind::Action, "LOGIN".to_string()),
            (TargetKind::Controller, "UserController".to_string()),
            (TargetKind::Global, "global".to_string()),
        ]
    );
    assert!(resolved.execution_list[2].options.target_info.config.is_none());
}

#[test]
fn test_action_filters_do_not_leak_to_other_actions() {
    let store = ConfigStore::new();
    let class = marked(&store);

    recorder("OnlyLogin", 0).bind_action::<UserController>(&store, "login").unwrap();

    let resolution = resolve(&class, &store, "logout", &request(), &[]);
    assert!(names(resolution).is_empty());
}

#[test]
fn test_no_match_cases() {
    let store = ConfigStore::new();
    let class = marked(&store);
    let ctx = request();

    assert!(resolve(&class, &store, "missing", &ctx, &[]).is_no_match());
    assert!(resolve(&class, &store, "profile", &ctx, &[]).is_no_match());
    assert!(resolve(&class, &store, "constructor", &ctx, &[]).is_no_match());

    let legacy = mark_controller::<LegacyController>(&store, &ControllerOptions::default()).unwrap();
    assert!(resolve(&legacy, &store, "Constructor", &ctx, &[]).is_no_match());
    assert!(!resolve(&legacy, &store, "INDEX", &ctx, &[]).is_no_match());
}

#[test]
fn test_first_case_insensitive_member_wins() {
    let store = ConfigStore::new();
    let class = ControllerClass::<ShadowController>::new();

    let found = class.find("GETUSER").unwrap();
    assert_eq!(found.name, "getUser");
    assert!(!resolve(&class, &store, "getuser", &RequestContext::new(Method::GET, Uri::from_static("/")), &[])
        .is_no_match());
}

#[test]
fn test_resolution_reads_latest_store_state() {
    let store = ConfigStore::new();
    let class = marked(&store);

    assert!(names(resolve(&class, &store, "login", &request(), &[])).is_empty());

    recorder("Late", 0).bind_controller::<UserController>(&store).unwrap();
    assert_eq!(names(resolve(&class, &store, "login", &request(), &[])), vec!["Late"]);
}

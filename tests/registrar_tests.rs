//! Registration boundary: raw options ingestion and host forwarding

use page_mixin::{
    ComposeError, Composer, ComposerConfig, Descriptor, LifecycleEvent, PageOptions,
    PageRegistrar,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

type Log = Vec<String>;

/// Registrar whose host sink records every forwarded descriptor
fn recording_registrar(
    composer: Composer<Log>,
) -> (PageRegistrar<Log>, Arc<Mutex<Vec<Descriptor<Log>>>>) {
    let received: Arc<Mutex<Vec<Descriptor<Log>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let registrar = PageRegistrar::new(composer, move |descriptor| {
        sink.lock().unwrap().push(descriptor);
    });
    (registrar, received)
}

#[test]
fn raw_options_compose_and_reach_the_host() {
    let (mut registrar, received) = recording_registrar(Composer::new());

    registrar
        .register_value(json!({
            "data": {"name": "page"},
            "mixins": [
                {"data": {"name": "m1", "extra": "e1"}},
                {"data": {"name": "m2"}, "helper": "h"}
            ]
        }))
        .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let merged = &received[0];

    let data = merged.data().unwrap();
    assert_eq!(data["name"], json!("page"));
    assert_eq!(data["extra"], json!("e1"));
    assert_eq!(merged.field("helper").unwrap().as_value(), Some(&json!("h")));
    assert!(!merged.contains("mixins"));
}

#[test]
fn a_non_object_mixin_element_fails_the_whole_registration() {
    let (mut registrar, received) = recording_registrar(Composer::new());

    let err = registrar
        .register_value(json!({
            "data": {"name": "page"},
            "mixins": [{"data": {"a": 1}}, 42, {"data": {"b": 2}}]
        }))
        .unwrap_err();

    assert_eq!(
        err,
        ComposeError::NotAMapping {
            position: 1,
            found: "number".to_string(),
        }
    );
    // Nothing was forwarded; no field from any element was applied.
    assert!(received.lock().unwrap().is_empty());
}

#[test]
fn typed_options_carry_callbacks_through_registration() {
    let (mut registrar, received) = recording_registrar(Composer::new());

    let options = PageOptions::new(
        Descriptor::new()
            .on(LifecycleEvent::Load, |log: &mut Log, _| {
                log.push("page".to_string());
                json!(null)
            })
            .data_entry("name", json!("page")),
    )
    .with_mixin(
        Descriptor::new()
            .on(LifecycleEvent::Load, |log: &mut Log, _| {
                log.push("analytics".to_string());
                json!(null)
            })
            .data_entry("pageviews", json!(0)),
    );

    registrar.register(options).unwrap();

    let received = received.lock().unwrap();
    let merged = &received[0];
    let mut log = Log::new();
    (merged.callback(LifecycleEvent::Load).unwrap())(&mut log, &[json!({"id": 7})]);
    assert_eq!(log, vec!["analytics", "page"]);
    assert_eq!(merged.data().unwrap()["pageviews"], json!(0));
}

#[test]
fn global_mixin_applies_to_every_registration() {
    let global: Descriptor<Log> = Descriptor::new()
        .on(LifecycleEvent::Show, |log: &mut Log, _| {
            log.push("global".to_string());
            json!(null)
        })
        .data_entry("theme", json!("dark"));
    let composer = Composer::with_config(ComposerConfig::with_global_mixin(global));
    let (mut registrar, received) = recording_registrar(composer);

    registrar
        .register(PageOptions::new(Descriptor::new().on(
            LifecycleEvent::Show,
            |log: &mut Log, _| {
                log.push("first".to_string());
                json!(null)
            },
        )))
        .unwrap();
    registrar
        .register(PageOptions::new(Descriptor::new().on(
            LifecycleEvent::Show,
            |log: &mut Log, _| {
                log.push("second".to_string());
                json!(null)
            },
        )))
        .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 2);
    for (page, name) in received.iter().zip(["first", "second"]) {
        let mut log = Log::new();
        (page.callback(LifecycleEvent::Show).unwrap())(&mut log, &[]);
        assert_eq!(log, vec!["global".to_string(), name.to_string()]);
        assert_eq!(page.data().unwrap()["theme"], json!("dark"));
    }
}

#[test]
fn options_from_value_tolerates_a_missing_mixin_list() {
    let options: PageOptions<Log> =
        PageOptions::from_value(json!({"data": {"name": "plain"}})).unwrap();
    assert!(options.mixins.is_empty());

    let merged = Composer::new()
        .compose(options.descriptor, options.mixins)
        .unwrap();
    assert_eq!(merged.data().unwrap()["name"], json!("plain"));
}

#[test]
fn options_from_value_rejects_non_object_options() {
    let err = PageOptions::<Log>::from_value(Value::Array(vec![])).unwrap_err();
    assert!(matches!(err, ComposeError::NotAMapping { .. }));
}

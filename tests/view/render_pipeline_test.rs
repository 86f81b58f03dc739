//! Render pipeline: parameter merging, event channels, result short-circuit,
//! delegation order, and helper registration through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use viewkit::{Event, FnHelper, Helper, HelperError, Parameters, View, ViewError};

use crate::common::{params, RecordingEngine};

fn view_with(engines: &[&RecordingEngine]) -> View {
    let mut view = View::new();
    for engine in engines {
        view.add_engine((*engine).clone());
    }
    view
}

#[test]
fn test_home_scenario_merges_globals_under_parameters() -> anyhow::Result<()> {
    let engine = RecordingEngine::new("mock", &["home"]);
    let recorder = engine.recorder();
    let mut view = view_with(&[&engine]);
    view.add_global("site", "Demo");

    let out = view.render("home", params(json!({"title": "Welcome"})))?;

    assert_eq!(out, Some(json!("mock:home")));
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].template, "home");
    assert_eq!(
        calls[0].parameters,
        params(json!({"site": "Demo", "title": "Welcome"}))
    );
    Ok(())
}

#[test]
fn test_parameters_win_on_every_overlapping_key() -> anyhow::Result<()> {
    let engine = RecordingEngine::new("mock", &["page"]);
    let recorder = engine.recorder();
    let mut view = view_with(&[&engine]);
    view.add_global("a", 1).add_global("b", 2).add_global("c", 3);

    view.render("page", params(json!({"a": "x", "c": null})))?;

    assert_eq!(
        recorder.calls()[0].parameters,
        params(json!({"a": "x", "b": 2, "c": null}))
    );
    Ok(())
}

#[test]
fn test_override_scenario_skips_engine() -> anyhow::Result<()> {
    let engine = RecordingEngine::new("mock", &["home"]);
    let recorder = engine.recorder();
    let mut view = view_with(&[&engine]);
    view.on("home", |event| {
        event.set_result("override");
        Ok(())
    });

    assert_eq!(view.render("home", Parameters::new())?, Some(json!("override")));
    assert_eq!(recorder.count(), 0);
    Ok(())
}

#[test]
fn test_listener_invoked_once_per_render() -> anyhow::Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut view = View::new();
    let counter = Arc::clone(&hits);
    view.on("profile", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    for expected in 1..=3 {
        view.render("profile", Parameters::new())?;
        assert_eq!(hits.load(Ordering::SeqCst), expected);
    }
    Ok(())
}

#[test]
fn test_generic_channel_runs_before_specific() -> anyhow::Result<()> {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut view = View::new();

    let seen = Arc::clone(&order);
    view.on("home", move |_| {
        seen.lock().unwrap().push("specific");
        Ok(())
    });
    let seen = Arc::clone(&order);
    view.on("render", move |event| {
        seen.lock().unwrap().push("generic");
        assert_eq!(event.name(), "home");
        Ok(())
    });

    view.render("home", Parameters::new())?;
    assert_eq!(*order.lock().unwrap(), vec!["generic", "specific"]);
    Ok(())
}

#[test]
fn test_stop_on_render_skips_named_channel() -> anyhow::Result<()> {
    let engine = RecordingEngine::new("mock", &["home"]);
    let recorder = engine.recorder();
    let hits = Arc::new(AtomicUsize::new(0));
    let mut view = view_with(&[&engine]);

    view.on("render", |event| {
        event.stop_propagation();
        Ok(())
    });
    let counter = Arc::clone(&hits);
    view.on("home", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    // No result was set, so the engine still renders.
    assert_eq!(view.render("home", Parameters::new())?, Some(json!("mock:home")));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(recorder.count(), 1);
    Ok(())
}

#[test]
fn test_stop_within_channel_skips_lower_priorities() -> anyhow::Result<()> {
    let mut view = View::new();
    view.on_with_priority(
        "home",
        |event| {
            event.set_result("first");
            event.stop_propagation();
            Ok(())
        },
        5,
    );
    view.on_with_priority(
        "home",
        |event| {
            event.set_result("second");
            Ok(())
        },
        0,
    );

    assert_eq!(view.render("home", Parameters::new())?, Some(json!("first")));
    Ok(())
}

#[test]
fn test_unsupported_template_without_result_is_none() -> anyhow::Result<()> {
    let engine = RecordingEngine::new("mock", &["home"]);
    let recorder = engine.recorder();
    let view = view_with(&[&engine]);

    assert_eq!(view.render("nope", Parameters::new())?, None);
    assert_eq!(view.render_to_string("nope", Parameters::new())?, None);
    assert_eq!(recorder.count(), 0);
    Ok(())
}

#[test]
fn test_first_registered_engine_wins() -> anyhow::Result<()> {
    let first = RecordingEngine::new("first", &["shared"]);
    let second = RecordingEngine::new("second", &["shared", "only-second"]);
    let view = view_with(&[&first, &second]);

    assert_eq!(view.render("shared", Parameters::new())?, Some(json!("first:shared")));
    assert_eq!(
        view.render("only-second", Parameters::new())?,
        Some(json!("second:only-second"))
    );
    assert_eq!(first.recorder().count(), 1);
    assert_eq!(second.recorder().count(), 1);
    Ok(())
}

#[test]
fn test_listener_rewrites_template_and_parameters() -> anyhow::Result<()> {
    let engine = RecordingEngine::new("mock", &["mobile/home"]);
    let recorder = engine.recorder();
    let mut view = view_with(&[&engine]);
    view.on("render", |event| {
        let template = format!("mobile/{}", event.template());
        event.set_template(template);
        event.set_parameter("layout", "compact");
        Ok(())
    });

    let out = view.render("home", params(json!({"title": "Hi"})))?;
    assert_eq!(out, Some(json!("mock:mobile/home")));
    let call = &recorder.calls()[0];
    assert_eq!(call.template, "mobile/home");
    assert_eq!(call.parameters, params(json!({"title": "Hi", "layout": "compact"})));
    Ok(())
}

#[test]
fn test_null_result_still_delegates() -> anyhow::Result<()> {
    let engine = RecordingEngine::new("mock", &["home"]);
    let mut view = view_with(&[&engine]);
    view.on("home", |event| {
        event.set_result(Value::Null);
        Ok(())
    });

    assert_eq!(view.render("home", Parameters::new())?, Some(json!("mock:home")));

    let empty = View::new();
    assert_eq!(empty.render("home", Parameters::new())?, None);
    Ok(())
}

#[test]
fn test_listener_error_aborts_render() {
    let engine = RecordingEngine::new("mock", &["home"]);
    let recorder = engine.recorder();
    let mut view = view_with(&[&engine]);
    view.on("home", |_| anyhow::bail!("permission denied"));

    let err = view.render("home", Parameters::new()).unwrap_err();
    let ViewError::Listener(dispatch) = &err else {
        panic!("expected a listener error, got {err:?}");
    };
    assert_eq!(dispatch.event, "view.home");
    assert!(dispatch.to_string().contains("permission denied"));
    assert_eq!(recorder.count(), 0);
}

#[test]
fn test_custom_prefix() -> anyhow::Result<()> {
    let mut view = View::new().with_prefix("theme.");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    view.on("render", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    view.render("home", Parameters::new())?;
    assert!(view.events().has_listeners("theme.render"));
    assert!(!view.events().has_listeners("view.render"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_helpers_reach_engine() -> anyhow::Result<()> {
    let engine = RecordingEngine::new("mock", &["home"]);
    let recorder = engine.recorder();
    let mut view = view_with(&[&engine]);
    view.add_helper(FnHelper::new("url", |_: &[Value]| Ok(json!("/"))))?;

    view.render("home", Parameters::new())?;
    assert_eq!(recorder.calls()[0].helpers, vec!["url".to_string()]);
    Ok(())
}

#[test]
fn test_helper_invocation_modes() -> anyhow::Result<()> {
    let mut view = View::new();
    view.add_helper(FnHelper::new("sum", |args: &[Value]| {
        let total = args
            .iter()
            .map(|v| v.as_i64().ok_or_else(|| HelperError::failed("not a number")))
            .sum::<Result<i64, _>>()?;
        Ok(json!(total))
    }))?;

    let value = view.invoke_helper("sum", &[json!(1), json!(2), json!(3)])?;
    assert_eq!(value.into_value(), Some(json!(6)));

    let helper = view.invoke_helper("sum", &[])?;
    assert_eq!(helper.as_helper().map(|h| h.name()), Some("sum"));

    let err = view.invoke_helper("sum", &[json!("x")]).unwrap_err();
    assert!(matches!(err, ViewError::Helper { ref name, .. } if name == "sum"));

    let err = view.invoke_helper("missing", &[]).unwrap_err();
    assert!(matches!(err, ViewError::UndefinedHelper { .. }));
    Ok(())
}

#[test]
fn test_invalid_helper_is_rejected() {
    struct Hyphenated;

    impl Helper for Hyphenated {
        fn name(&self) -> &str {
            "not-valid"
        }

        fn call(&self, _args: &[Value]) -> Result<Value, HelperError> {
            Ok(Value::Null)
        }
    }

    let mut view = View::new();
    let err = view.add_helper(Hyphenated).unwrap_err();
    assert!(err.is_helper_misuse());
    assert!(err.to_string().contains("Hyphenated"));
    assert!(view.helper("not-valid").is_none());
}

#[test]
fn test_add_helpers_same_name_keeps_last() -> anyhow::Result<()> {
    let a: Arc<dyn Helper> = Arc::new(FnHelper::new("label", |_: &[Value]| Ok(json!("a"))));
    let b: Arc<dyn Helper> = Arc::new(FnHelper::new("label", |_: &[Value]| Ok(json!("b"))));

    let mut view = View::new();
    view.add_helpers(vec![a, b])?;

    assert_eq!(view.helpers().len(), 1);
    let out = view.invoke_helper("label", &[json!(true)])?;
    assert_eq!(out.into_value(), Some(json!("b")));
    Ok(())
}

#[test]
fn test_event_trait_is_reexported() {
    let mut event = viewkit::RenderEvent::new("home", Parameters::new());
    assert!(!event.is_propagation_stopped());
    event.stop_propagation();
    assert!(event.is_propagation_stopped());
}

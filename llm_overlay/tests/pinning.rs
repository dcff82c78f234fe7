//! Integration tests for version pinning across simulated upgrades.

use llm_overlay::spec::{RouteSpec, RouterSpec};
use llm_overlay::{OverlayResolver, ResolverConfig};
use test_helpers::builders::{service_with_model, spec_from_yaml};
use test_helpers::store::InMemoryStore;

const SYSTEM_NS: &str = "llm-system";
const PIN_PREFIX: &str = "overlays.serving.llm.dev/";

fn overlay_with_image(image: &str) -> llm_overlay::spec::ServiceSpec {
    spec_from_yaml(&format!(
        r#"
template:
  containers:
    - name: main
      image: "{image}"
"#
    ))
    .unwrap()
}

#[test]
fn the_first_resolution_pins_every_well_known_overlay() {
    let store = InMemoryStore::new().with(
        SYSTEM_NS,
        "llmsvc-llm-template",
        overlay_with_image("serving:v1"),
    );
    let resolver = OverlayResolver::new(store, ResolverConfig::default());

    let mut svc = service_with_model("chat", "apps", "llama-x");
    resolver.resolve(&mut svc).unwrap();

    assert_eq!(
        svc.status
            .annotations
            .get(&format!("{PIN_PREFIX}llm-template"))
            .map(String::as_str),
        Some("llmsvc-llm-template")
    );
    // Pipeline-parallel presets are not pinnable yet.
    assert!(
        !svc.status
            .annotations
            .keys()
            .any(|k| k.contains("pipeline-parallel"))
    );
}

#[test]
fn pinned_names_survive_a_default_prefix_change() {
    // First resolution under the original defaults.
    let store_v1 = InMemoryStore::new().with(
        SYSTEM_NS,
        "llmsvc-llm-template",
        overlay_with_image("serving:v1"),
    );
    let resolver_v1 = OverlayResolver::new(store_v1, ResolverConfig::default());
    let mut svc = service_with_model("chat", "apps", "llama-x");
    let first = resolver_v1.resolve(&mut svc).unwrap();
    assert_eq!(
        first.workload.template.unwrap().containers[0].image,
        "serving:v1"
    );

    // Controller upgrade: the configured prefix now points at v2 presets,
    // but the old preset is still available under its original name.
    let upgraded = ResolverConfig {
        overlay_prefix: "llmsvc-v2-".to_owned(),
        ..ResolverConfig::default()
    };
    let store_v2 = InMemoryStore::new()
        .with(
            SYSTEM_NS,
            "llmsvc-llm-template",
            overlay_with_image("serving:v1"),
        )
        .with(
            SYSTEM_NS,
            "llmsvc-v2-llm-template",
            overlay_with_image("serving:v2"),
        );
    let resolver_v2 = OverlayResolver::new(store_v2, upgraded);

    let second = resolver_v2.resolve(&mut svc).unwrap();
    assert_eq!(
        second.workload.template.unwrap().containers[0].image,
        "serving:v1",
        "a pinned resource must keep resolving its original overlay"
    );
}

#[test]
fn disabled_pinning_always_follows_the_configured_default() {
    let config = ResolverConfig {
        versioned_overlays: false,
        ..ResolverConfig::default()
    };
    let store = InMemoryStore::new().with(
        SYSTEM_NS,
        "llmsvc-llm-template",
        overlay_with_image("serving:v1"),
    );
    let resolver = OverlayResolver::new(store, config);

    let mut svc = service_with_model("chat", "apps", "llama-x");
    resolver.resolve(&mut svc).unwrap();
    assert!(svc.status.annotations.is_empty());
}

#[test]
fn route_overlay_selection_ignores_pins() {
    // Pre-pin the route key to a name that does not exist in the store. The
    // route overlay is provider-specific and must resolve unversioned, so
    // resolution still succeeds through the plain name.
    let store = InMemoryStore::new()
        .with(
            SYSTEM_NS,
            "llmsvc-llm-template",
            overlay_with_image("serving:v1"),
        )
        .with(
            SYSTEM_NS,
            "llmsvc-llm-router-route",
            spec_from_yaml(
                r"
router:
  route:
    http:
      spec:
        rules: []
",
            )
            .unwrap(),
        );
    let resolver = OverlayResolver::new(store, ResolverConfig::default());

    let mut svc = service_with_model("chat", "apps", "llama-x");
    svc.spec.router = Some(RouterSpec {
        route: Some(RouteSpec::default()),
        ..RouterSpec::default()
    });
    svc.status.annotations.insert(
        format!("{PIN_PREFIX}llm-router-route"),
        "llmsvc-llm-router-route-v9".to_owned(),
    );

    resolver.resolve(&mut svc).unwrap();
}

use std::sync::Arc;
use tableau_engine::{AnimatedProperty, Renderer, SceneDescription};

const BOUNCE: &str = r##"{
    "surface": { "width": 40, "height": 40, "background": "#000000" },
    "root": {
        "kind": "container", "width": 40, "height": 40, "timed": false,
        "children": [
            {
                "kind": "rectangle", "width": 40, "height": 10, "anchor": "bottom",
                "origin": "bottom", "fill": "#00ff00"
            },
            {
                "kind": "circle", "radius": 5, "z_index": 1, "fill": "#ffffff",
                "animations": [
                    {
                        "property": "y",
                        "segments": [
                            { "op": "tween", "to": 20, "duration": 500, "easing": "ease_in" },
                            { "op": "tween", "to": 0, "duration": 500, "easing": "ease_out" }
                        ]
                    },
                    { "property": "x", "base": 0, "segments": [{ "op": "to_be_ignored" }] }
                ]
            }
        ]
    }
}"##;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn unknown_segment_ops_are_rejected() {
    init_tracing();
    assert!(SceneDescription::from_json(BOUNCE).is_err());
}

#[test]
fn loads_and_renders_an_animated_scene() -> anyhow::Result<()> {
    init_tracing();
    let json = BOUNCE.replace(r#"{ "op": "to_be_ignored" }"#, r#"{ "op": "set", "value": 15 }"#);
    let mut scene = SceneDescription::from_json(&json)?.build()?;
    assert_eq!(scene.duration, 1000.0);

    let mut renderer = Renderer::from_config(&scene.surface)?;
    let at_rest = renderer.render_frame(&mut scene.graph, scene.root, 0.0)?;
    // Ground strip along the bottom edge.
    assert_eq!(renderer.surface().pixel(20, 35), Some([0, 255, 0, 255]));
    // Ball at its starting place, shifted by the `set` on x.
    assert_eq!(renderer.surface().pixel(20, 5), Some([255, 255, 255, 255]));

    let bottom = renderer.render_frame(&mut scene.graph, scene.root, 500.0)?;
    assert!(!Arc::ptr_eq(&at_rest, &bottom));
    assert_eq!(renderer.surface().pixel(20, 25), Some([255, 255, 255, 255]));
    assert_eq!(renderer.surface().pixel(20, 5), Some([0, 0, 0, 255]));

    // The ground never changes, so its snapshot is shared across frames.
    assert!(Arc::ptr_eq(&at_rest.children()[0], &bottom.children()[0]));

    let circle = scene.graph.node(scene.root)?.children()[1];
    let y = scene
        .graph
        .get_animation_for(circle, AnimatedProperty::Y)
        .map(|t| t.total_duration());
    assert_eq!(y, Some(1000.0));
    Ok(())
}

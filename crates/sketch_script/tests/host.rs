//! End-to-end behaviour of the script host: loading, reloading, frame
//! driving and fault containment.

use sketch_core::math::Color;
use sketch_script::{EntryPoint, ModuleState, ResourceKind, ScriptHost, Severity};
use sketch_services::Settings;

fn host() -> ScriptHost {
    let mut settings = Settings::default();
    settings.script.random_seed = Some(42);
    settings.script.fixed_timestep = Some(1.0 / 60.0);
    ScriptHost::new(&settings).expect("host")
}

/// Run one frame and return its clear colour.
fn frame_clear(host: &mut ScriptHost) -> Option<Color> {
    host.frame();
    host.take_frame().clear_color()
}

#[test]
fn successful_compile_leaves_no_error() {
    let mut host = host();
    assert!(host.load_script("function setup() {}\nfunction draw() { clear(0.5); }"));
    assert_eq!(host.state(), ModuleState::Ready { setup_done: false });
    assert_eq!(host.last_error(), "");
}

#[test]
fn failed_compile_reports_location() {
    let mut host = host();
    assert!(!host.load_script("function draw() {\n  clear(0.5;\n}"));
    assert_eq!(host.state(), ModuleState::Failed);
    let error = host.last_error();
    assert!(error.starts_with("script ("), "{error}");
    assert!(error.contains("SyntaxError"), "{error}");
    assert!(host.resolved_entry_points().is_empty());
}

#[test]
fn failed_module_is_not_driven() {
    let mut host = host();
    assert!(!host.load_script("function draw() { clear(1); "));
    assert!(!host.frame());
    assert_eq!(host.take_frame().clear_color(), None);
}

#[test]
fn top_level_throw_fails_the_load() {
    let mut host = host();
    assert!(!host.load_script("function draw() {}\nthrow new Error('refusing');"));
    assert!(host.last_error().contains("refusing"));
}

#[test]
fn reload_is_idempotent() {
    let a = "function setup() {}\nfunction draw() {}\nfunction keyPressed(k) {}";
    let b = "function update() {}\nfunction mouseMoved(x, y) {}";
    let mut host = host();

    assert!(host.load_script(a));
    let first = host.resolved_entry_points();
    assert_eq!(
        first,
        vec![EntryPoint::Setup, EntryPoint::Draw, EntryPoint::KeyPressed]
    );

    assert!(host.load_script(b));
    assert_eq!(
        host.resolved_entry_points(),
        vec![EntryPoint::Update, EntryPoint::MouseMoved]
    );

    assert!(host.load_script(a));
    assert_eq!(host.resolved_entry_points(), first);
}

#[test]
fn globals_do_not_survive_a_reload() {
    let mut host = host();
    assert!(host.load_script("var leftover = 1;"));
    assert!(host.load_script(
        "function draw() { clear(typeof leftover === 'undefined' ? 1 : 0); }"
    ));
    assert_eq!(frame_clear(&mut host), Some(Color::gray(1.0)));
}

#[test]
fn reload_releases_every_resource() {
    let mut host = host();
    assert!(host.load_script(
        r#"
        var kept = [];
        function setup() {
            kept.push(createImage(), createMesh(), createPath(), createFbo());
            kept.push(createChipNote().build(), createCamera(), createTween());
        }
        function update() { kept.push(createPixels()); }
        "#
    ));
    for _ in 0..5 {
        host.frame();
    }
    assert_eq!(host.resource_count(ResourceKind::Pixels), 5);
    // the chip note plus the sound it built
    assert_eq!(host.resource_count(ResourceKind::Sound), 1);
    assert_eq!(host.arena_stats().total_created(), 13);

    assert!(host.load_script("function draw() {}"));
    let stats = host.arena_stats();
    assert!(stats.is_balanced());
    assert_eq!(stats.total_destroyed(), 13);
    for kind in ResourceKind::ALL {
        assert_eq!(host.resource_count(kind), 0, "{kind}");
    }
}

#[test]
fn image_scenario() {
    let mut host = host();
    assert!(host.load_script("function setup() { createImage(); }\nfunction draw() {}"));
    host.call_setup();
    assert_eq!(host.resource_count(ResourceKind::Image), 1);
    host.frame();
    assert_eq!(host.resource_count(ResourceKind::Image), 1);

    assert!(host.load_script(""));
    assert_eq!(host.resource_count(ResourceKind::Image), 0);
}

#[test]
fn draw_only_script_runs_every_frame() {
    let mut host = host();
    assert!(host.load_script("var n = 0;\nfunction draw() { n++; clear(n / 10); }"));
    assert_eq!(host.resolved_entry_points(), vec![EntryPoint::Draw]);
    for n in 1..=3 {
        assert_eq!(frame_clear(&mut host), Some(Color::gray(n as f32 / 10.0)));
    }
    assert!(host.diagnostics().is_empty());
}

#[test]
fn update_fault_is_contained() {
    let mut host = host();
    assert!(host.load_script(
        r#"
        var frame = 0;
        var draws = 0;
        function update() {
            frame++;
            if (frame === 3) {
                throw new Error('frame three');
            }
        }
        function draw() {
            draws++;
            clear(draws / 10);
        }
        "#
    ));

    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.1)));
    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.2)));
    assert!(host.last_error().is_empty());

    // draw still runs on the faulting frame
    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.3)));
    let error = host.last_error();
    assert!(error.starts_with("update ("), "{error}");
    assert!(error.contains("frame three"), "{error}");
    assert_eq!(
        host.diagnostics().latest().map(|d| d.severity),
        Some(Severity::Exception)
    );

    // and the module keeps running
    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.4)));
    assert!(host.is_ready());
}

#[test]
fn repeating_fault_is_logged_once() {
    let mut host = host();
    assert!(host.load_script("function draw() { null.boom(); }"));
    for _ in 0..10 {
        host.frame();
    }
    assert_eq!(host.diagnostics().len(), 1);
    assert!(host.last_error().contains("TypeError"));
}

#[test]
fn event_faults_are_not_diagnostics() {
    let mut host = host();
    assert!(host.load_script(
        "function keyPressed(k) { throw new Error('bad key'); }\nfunction draw() {}"
    ));
    host.frame();
    host.key_pressed(65);
    assert!(host.diagnostics().is_empty());
    assert!(host.is_ready());
}

#[test]
fn events_reach_hooks_and_queries() {
    let mut host = host();
    assert!(host.load_script(
        r#"
        var pressed = -1;
        var size = 0;
        function mousePressed(x, y, button) { pressed = button; }
        function windowResized(w, h) { size = w * h; }
        function draw() {
            if (pressed === MouseButton.Right && isMousePressed(MouseButton.Right)
                && getMouseX() === 10 && size === 12) {
                clear(1, 0, 0);
            }
            if (isKeyPressed(Key.A)) {
                clear(0, 1, 0);
            }
        }
        "#
    ));
    host.frame();
    host.take_frame();

    host.mouse_pressed(10.0, 20.0, 1);
    host.window_resized(3, 4);
    assert_eq!(frame_clear(&mut host), Some(Color::rgb(1.0, 0.0, 0.0)));

    host.key_pressed(65);
    assert_eq!(frame_clear(&mut host), Some(Color::rgb(0.0, 1.0, 0.0)));
}

#[test]
fn deferred_reload_applies_at_frame_boundary() {
    let mut host = host();
    assert!(host.load_script("function draw() { clear(0.1); }"));
    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.1)));

    host.request_reload("function draw() { clear(0.9); }");
    assert!(host.has_pending_reload());
    // still the old module until the next frame
    assert_eq!(host.resolved_entry_points(), vec![EntryPoint::Draw]);
    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.9)));
    assert!(!host.has_pending_reload());
}

#[test]
fn sections_share_one_scope() {
    let mut host = host();
    assert!(host.load_sections([
        ("palette.js", "function shade() { return 0.75; }"),
        ("main.js", "function draw() { clear(shade()); }"),
    ]));
    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.75)));
}

#[test]
fn failing_section_is_named() {
    let mut host = host();
    assert!(!host.load_sections([
        ("ok.js", "function draw() {}"),
        ("broken.js", "\n\nfunction ( {"),
    ]));
    let error = host.last_error();
    assert!(error.starts_with("broken.js ("), "{error}");
}

#[test]
fn sections_may_call_later_sections() {
    let mut host = host();
    assert!(host.load_sections([
        ("a.js", "var level = helper();\nfunction draw() { clear(level); }"),
        ("b.js", "function helper() { return 0.5; }"),
    ]), "{}", host.last_error());
    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.5)));
}

#[test]
fn syntax_error_in_any_section_runs_nothing() {
    let mut host = host();
    assert!(!host.load_sections([
        ("a.js", "var img = createImage();"),
        ("b.js", "function ( {"),
    ]));
    assert!(host.last_error().starts_with("b.js ("), "{}", host.last_error());
    assert_eq!(host.arena_stats().total_created(), 0);
}

#[test]
fn faults_report_the_section_line() {
    let mut host = host();
    assert!(!host.load_sections([
        ("a.js", "var x = 1;\nvar y = 2;"),
        ("b.js", "\n\nthrow new Error('third line');"),
    ]));
    let error = host.last_error();
    assert!(error.starts_with("b.js (3, "), "{error}");

    assert!(host.load_sections([
        ("a.js", "function draw() { boom(); }"),
        ("b.js", "function boom() {\n  throw new Error('deep');\n}"),
    ]));
    host.frame();
    let error = host.last_error();
    assert!(error.starts_with("draw (2, "), "{error}");
    assert!(error.contains("[b.js]"), "{error}");
}

#[test]
fn loads_files_as_named_sections() {
    let dir = tempfile::tempdir().unwrap();
    let util = dir.path().join("util.js");
    let main = dir.path().join("main.js");
    std::fs::write(&util, "function level() { return 0.25; }").unwrap();
    std::fs::write(&main, "function draw() { clear(level()); }").unwrap();

    let mut host = host();
    assert!(host.load_files(&[&util, &main]));
    assert_eq!(frame_clear(&mut host), Some(Color::gray(0.25)));

    let missing = dir.path().join("missing.js");
    assert!(!host.load_files(&[&main, &missing]));
    assert_eq!(host.state(), ModuleState::Failed);
    assert!(host.last_error().starts_with("missing.js ("));
}

#[test]
fn diagnostics_serialize_to_json() {
    let mut host = host();
    assert!(host.load_script("function update() { throw new Error('x'); }"));
    host.frame();
    let json = host.diagnostics().to_json().unwrap();
    assert!(json.contains("\"section\": \"update\""), "{json}");
    assert!(json.contains("\"severity\": \"exception\""), "{json}");
}

#[test]
fn constants_are_read_only() {
    let mut host = host();
    assert!(!host.load_script("const PI = 3;"));
    assert!(host.last_error().contains("SyntaxError"));
}

#[test]
fn idle_until_loaded() {
    let mut host = host();
    assert!(!host.frame());
    host.draw_idle_screen();
    let frame = host.take_frame();
    assert_eq!(frame.texts().collect::<Vec<_>>(), vec!["Waiting for script..."]);
}

#[test]
fn chip_sounds_reach_the_mixer() {
    let mut host = host();
    assert!(host.load_script(
        r#"
        function setup() {
            var bundle = createChipBundle();
            bundle.add(createChipNote(Waveform.Square, 220, 0.8, 0.2), 0);
            bundle.add(createChipNote(Waveform.Sine, 440, 0.8, 0.2), 0.1);
            var sound = bundle.build();
            if (!sound.isLoaded()) throw new Error('empty bundle');
            sound.play();
        }
        "#
    ));
    host.frame();
    assert!(host.last_error().is_empty(), "{}", host.last_error());

    let mut out = vec![0.0f32; 2048];
    host.render_audio(&mut out);
    assert!(out.iter().any(|s| s.abs() > 0.0));
}

#[test]
fn oversized_sounds_are_refused() {
    let mut settings = Settings::default();
    settings.audio.max_sound_seconds = 2.0;
    let mut host = ScriptHost::new(&settings).expect("host");
    assert!(host.load_script(
        r#"
        function setup() {
            var huge = createChipNote(Waveform.Sine, 440, 1, 1e9).build();
            if (huge.isLoaded()) throw new Error('huge note built');
            var bundle = createChipBundle();
            bundle.add(createChipNote(), 1e9);
            if (bundle.build().isLoaded()) throw new Error('huge bundle built');
            var endless = createChipNote(Waveform.Sine, 440, 1, Infinity).build();
            if (endless.isLoaded()) throw new Error('endless note built');
            if (!createChipNote(Waveform.Sine, 440, 1, 1).build().isLoaded()) {
                throw new Error('short note refused');
            }
        }
        "#
    ));
    host.frame();
    assert!(host.last_error().is_empty(), "{}", host.last_error());
}

#[test]
fn oversized_geometry_is_clamped() {
    let mut host = host();
    assert!(host.load_script(
        r#"
        function setup() {
            var sphere = createSphereMesh(1, 1000000);
            if (sphere.getNumVertices() > 257 * 513) throw new Error('sphere unbounded');
            var path = createPath();
            path.setCurveResolution(1000000000);
            path.addVertex(0, 0);
            path.quadBezierTo(Vec3(1, 1, 0), Vec3(2, 0, 0));
            if (path.size() > 1025) throw new Error('curve unbounded');
        }
        "#
    ));
    host.frame();
    assert!(host.last_error().is_empty(), "{}", host.last_error());
}

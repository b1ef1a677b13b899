//! The capability surface as scripts see it: overloads, value types,
//! resources and the errors raised for bad calls.

use sketch_core::math::Color;
use sketch_render::{DrawCommand, Shape};
use sketch_script::{ResourceKind, ScriptHost};
use sketch_services::Settings;

const CHECK: &str = "function check(ok, what) { if (!ok) throw new Error('check failed: ' + what); }\n";

fn host() -> ScriptHost {
    let mut settings = Settings::default();
    settings.script.random_seed = Some(1);
    settings.script.fixed_timestep = Some(1.0 / 60.0);
    ScriptHost::new(&settings).expect("host")
}

/// Run `body` as `setup` and return the error text it produced.
fn run_setup(host: &mut ScriptHost, body: &str) -> String {
    let source = format!("{CHECK}function setup() {{\n{body}\n}}");
    assert!(host.load_script(&source), "{}", host.last_error());
    host.frame();
    host.last_error()
}

fn assert_runs(body: &str) {
    let mut host = host();
    let error = run_setup(&mut host, body);
    assert!(error.is_empty(), "{error}");
}

#[test]
fn clear_overloads_pick_distinct_natives() {
    let cases = [
        ("clear(0.5);", Color::gray(0.5)),
        ("clear(0.25, 0.5, 0.75);", Color::rgb(0.25, 0.5, 0.75)),
        ("clear(0.25, 0.5, 0.75, 0.5);", Color::new(0.25, 0.5, 0.75, 0.5)),
        ("clear(Color(1, 0, 0));", Color::rgb(1.0, 0.0, 0.0)),
    ];
    let mut host = host();
    for (call, expected) in cases {
        assert!(host.load_script(&format!("function draw() {{ {call} }}")));
        host.frame();
        assert_eq!(host.take_frame().clear_color(), Some(expected), "{call}");
    }
}

#[test]
fn unmatched_overload_is_a_type_error() {
    let mut host = host();
    let error = run_setup(&mut host, "clear('red');");
    assert!(error.contains("TypeError"), "{error}");
    assert!(error.contains("no overload of clear"), "{error}");
    assert!(error.contains("void clear(float)"), "{error}");
}

#[test]
fn type_errors_can_be_caught_by_scripts() {
    assert_runs(
        r#"
        var caught = false;
        try { drawCircle(Vec2(1, 2)); } catch (e) { caught = e instanceof TypeError; }
        check(caught, 'TypeError');
        "#,
    );
}

#[test]
fn value_types_behave_like_values() {
    assert_runs(
        r#"
        var a = Vec2(1, 2);
        var b = a.add(Vec2(3, 4));
        check(b.x === 4 && b.y === 6, 'add');
        check(a.x === 1, 'operands untouched');
        check(Vec2(3, 4).length() === 5, 'length');
        check(Vec3(1, 0, 0).cross(Vec3(0, 1, 0)).equals(Vec3(0, 0, 1)), 'cross');
        var c = Color(0.5).withAlpha(0.25);
        check(c.r === 0.5 && c.a === 0.25, 'withAlpha');
        check(Rect(0, 0, 10, 10).contains(5, 5), 'contains');
        check(!Rect(0, 0, 10, 10).contains(Vec2(11, 5)), 'contains Vec2');
        var m = mat4Translation(1, 2, 3);
        var p = m.mul(Vec3(0, 0, 0));
        check(p.x === 1 && p.y === 2 && p.z === 3, 'translate point');
        var q = m.inverse().mul(p);
        check(q.x === 0 && q.y === 0 && q.z === 0, 'inverse');
        "#,
    );
}

#[test]
fn plain_objects_are_not_value_types() {
    let mut host = host();
    let error = run_setup(&mut host, "drawCircle({ x: 1, y: 2 }, 3);");
    assert!(error.contains("no overload of drawCircle"), "{error}");
}

#[test]
fn enumerations_are_namespaced() {
    assert_runs(
        r#"
        check(StrokeCap.Round === 1, 'cap');
        check(StrokeJoin.Round === 1, 'join');
        check(typeof Round === 'undefined', 'no bare member');
        setStrokeCap(StrokeCap.Square);
        check(Math.abs(PI - Math.PI) < 1e-12, 'PI');
        check(TAU === 2 * PI, 'TAU');
        "#,
    );
}

#[test]
fn out_of_range_enum_is_rejected() {
    let mut host = host();
    let error = run_setup(&mut host, "setStrokeCap(9);");
    assert!(error.contains("not a valid StrokeCap"), "{error}");
}

#[test]
fn pixels_round_trip_through_an_image() {
    let mut host = host();
    let error = run_setup(
        &mut host,
        r#"
        var px = createPixels();
        check(px.allocate(4, 4), 'allocate');
        check(px.setColor(1, 2, Color(1, 0, 0)), 'set');
        check(!px.setColor(9, 9, Color(1)), 'out of range');
        var img = createImage();
        img.setFromPixels(px);
        check(img.getWidth() === 4, 'width');
        var c = img.getColor(1, 2);
        check(c.r === 1 && c.g === 0, 'color');
        img.draw(0, 0);
        "#,
    );
    assert!(error.is_empty(), "{error}");
    assert_eq!(host.resource_count(ResourceKind::Pixels), 1);
    assert_eq!(host.resource_count(ResourceKind::Image), 1);
    let frame = host.take_frame();
    assert!(frame
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Texture { .. })));
}

#[test]
fn missing_files_return_false() {
    assert_runs(
        r#"
        check(!createImage().load('no/such/image.png'), 'image');
        check(!createSound().load('no/such/sound.wav'), 'sound');
        check(!createFont().load('no/such/font.ttf', 12), 'font');
        "#,
    );
}

#[test]
fn handles_cannot_be_forged_or_mixed() {
    let mut host = host();
    let error = run_setup(
        &mut host,
        r#"
        var mesh = createMesh();
        var image = createImage();
        var forged = Object.create(Object.getPrototypeOf(image));
        var threw = 0;
        try { forged.getWidth(); } catch (e) { threw++; }
        try { image.getWidth.call(mesh); } catch (e) { threw++; }
        check(threw === 2, 'both rejected');
        "#,
    );
    assert!(error.is_empty(), "{error}");
}

#[test]
fn meshes_and_paths_record_geometry() {
    let mut host = host();
    let error = run_setup(
        &mut host,
        r#"
        var mesh = createMesh(PrimitiveMode.Triangles);
        mesh.addVertices([Vec3(0, 0, 0), Vec3(1, 0, 0), Vec3(0, 1, 0)]);
        mesh.addIndices([0, 1, 2]);
        check(mesh.getNumVertices() === 3, 'vertices');
        check(mesh.getVertices()[1].x === 1, 'read back');
        mesh.draw();

        var path = createPath();
        path.addVertex(0, 0);
        path.lineTo(10, 0);
        path.lineTo(10, 10);
        path.close();
        check(path.isClosed(), 'closed');
        check(path.getBoundingBox().width === 10, 'bounds');
        var stroke = createStrokeMesh();
        stroke.setShape(path);
        stroke.setWidth(2);
        stroke.update();
        check(stroke.getTriangleCount() > 0, 'stroked');
        stroke.draw();
        "#,
    );
    assert!(error.is_empty(), "{error}");
    let frame = host.take_frame();
    assert!(frame.commands.iter().any(|c| matches!(c, DrawCommand::Mesh { .. })));
    assert!(frame
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Triangles { .. })));
}

#[test]
fn drawing_calls_record_shapes() {
    let mut host = host();
    assert!(host.load_script(
        "function draw() { drawRect(1, 2, 3, 4); drawCircle(Vec2(5, 5), 2); drawText('hi', 1, 1); }"
    ));
    host.frame();
    let frame = host.take_frame();
    let shapes: Vec<_> = frame.shapes().collect();
    assert_eq!(shapes.len(), 2);
    assert!(matches!(shapes[0], Shape::Rect(_)));
    assert_eq!(frame.texts().collect::<Vec<_>>(), vec!["hi"]);
}

#[test]
fn stack_underflow_is_absorbed_by_the_renderer() {
    let mut host = host();
    let error = run_setup(&mut host, "popMatrix(); popStyle();");
    assert!(error.is_empty(), "{error}");
    assert_eq!(host.render_faults(), 2);
}

#[test]
fn seeded_random_is_repeatable() {
    let script = "function draw() { clear(random()); }";
    let mut first = host();
    assert!(first.load_script(script));
    first.frame();
    let a = first.take_frame().clear_color();

    let mut second = host();
    assert!(second.load_script(script));
    second.frame();
    assert_eq!(second.take_frame().clear_color(), a);
}

#[test]
fn tweens_follow_the_frame_clock() {
    assert_runs(
        r#"
        var t = createTween();
        t.setup(0, 10, 1, EaseType.Linear, EaseMode.In);
        t.start();
        t.update(0.5);
        check(Math.abs(t.getValue() - 5) < 1e-4, 'halfway');
        t.update(1);
        check(t.isComplete(), 'done');
        check(ease(0.5, EaseType.Linear, EaseMode.InOut) === 0.5, 'ease');
        "#,
    );
}

#[test]
fn cameras_orbit_their_target() {
    assert_runs(
        r#"
        var cam = createCamera();
        cam.setTarget(0, 0, 0);
        cam.setDistance(10);
        var p = cam.getPosition();
        check(Math.abs(Math.sqrt(p.x * p.x + p.y * p.y + p.z * p.z) - 10) < 1e-3, 'distance');
        cam.begin();
        drawPoint(0, 0, 0);
        cam.end();
        "#,
    );
}

#[test]
fn capability_signatures_are_listed() {
    let host = host();
    let signatures = host.capabilities();
    for expected in [
        "void clear(float)",
        "void clear(float, float, float)",
        "void clear(float, float, float, float)",
        "Image createImage()",
        "Vec2 Vec2.add(Vec2)",
    ] {
        assert!(signatures.iter().any(|s| s == expected), "{expected}");
    }
}

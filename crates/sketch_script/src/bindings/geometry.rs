//! Meshes, paths and stroked outlines

use crate::error::RegistrationError;
use crate::handle::Handle;
use crate::registry::Registry;
use sketch_core::math::{Color, Rect, Vec3};
use sketch_render::{Mesh, Path, PrimitiveMode, StrokeCap, StrokeJoin, StrokeMesh};

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    mesh(reg)?;
    path(reg)?;
    stroke_mesh(reg)?;
    Ok(())
}

fn mesh(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createMesh", |s| -> Handle<Mesh> { s.arena.insert(Mesh::new()) });
    bind_fn!(reg, "createMesh", |s, mode: PrimitiveMode| -> Handle<Mesh> {
        s.arena.insert(Mesh::with_mode(mode))
    });
    bind_fn!(reg, "createPlaneMesh", |s, w: f32, h: f32| -> Handle<Mesh> {
        s.arena.insert(Mesh::plane(w, h))
    });
    bind_fn!(reg, "createBoxMesh", |s, w: f32, h: f32, d: f32| -> Handle<Mesh> {
        s.arena.insert(Mesh::box_mesh(w, h, d))
    });
    bind_fn!(reg, "createBoxMesh", |s, size: f32| -> Handle<Mesh> {
        s.arena.insert(Mesh::box_mesh(size, size, size))
    });
    bind_fn!(reg, "createSphereMesh", |s, radius: f32, resolution: u32| -> Handle<Mesh> {
        s.arena.insert(Mesh::sphere(radius, resolution))
    });

    bind_method!(reg, "Mesh", "setMode", |s, this: Handle<Mesh>, mode: PrimitiveMode| -> () {
        s.arena.get_mut(this)?.set_mode(mode)
    });
    bind_method!(reg, "Mesh", "getMode", |s, this: Handle<Mesh>| -> PrimitiveMode {
        s.arena.get(this)?.mode()
    });
    bind_method!(reg, "Mesh", "addVertex", |s, this: Handle<Mesh>, v: Vec3| -> () {
        s.arena.get_mut(this)?.add_vertex(v)
    });
    bind_method!(reg, "Mesh", "addVertex", |s, this: Handle<Mesh>, x: f32, y: f32, z: f32| -> () {
        s.arena.get_mut(this)?.add_vertex(Vec3::new(x, y, z))
    });
    bind_method!(reg, "Mesh", "addVertices", |s, this: Handle<Mesh>, vs: Vec<Vec3>| -> () {
        s.arena.get_mut(this)?.add_vertices(&vs)
    });
    bind_method!(reg, "Mesh", "addColor", |s, this: Handle<Mesh>, c: Color| -> () {
        s.arena.get_mut(this)?.add_color(c)
    });
    bind_method!(reg, "Mesh", "addColors", |s, this: Handle<Mesh>, cs: Vec<Color>| -> () {
        s.arena.get_mut(this)?.add_colors(&cs)
    });
    bind_method!(reg, "Mesh", "addNormal", |s, this: Handle<Mesh>, n: Vec3| -> () {
        s.arena.get_mut(this)?.add_normal(n)
    });
    bind_method!(reg, "Mesh", "addIndex", |s, this: Handle<Mesh>, i: u32| -> () {
        s.arena.get_mut(this)?.add_index(i)
    });
    bind_method!(reg, "Mesh", "addIndices", |s, this: Handle<Mesh>, is: Vec<u32>| -> () {
        s.arena.get_mut(this)?.add_indices(&is)
    });
    bind_method!(reg, "Mesh", "addTriangle", |s, this: Handle<Mesh>, a: u32, b: u32, c: u32| -> () {
        s.arena.get_mut(this)?.add_triangle(a, b, c)
    });
    bind_method!(reg, "Mesh", "clear", |s, this: Handle<Mesh>| -> () {
        s.arena.get_mut(this)?.clear()
    });
    bind_method!(reg, "Mesh", "getNumVertices", |s, this: Handle<Mesh>| -> usize {
        s.arena.get(this)?.vertex_count()
    });
    bind_method!(reg, "Mesh", "getNumIndices", |s, this: Handle<Mesh>| -> usize {
        s.arena.get(this)?.index_count()
    });
    bind_method!(reg, "Mesh", "getVertices", |s, this: Handle<Mesh>| -> Vec<Vec3> {
        s.arena.get(this)?.vertices().to_vec()
    });
    bind_method!(reg, "Mesh", "draw", |s, this: Handle<Mesh>| -> () {
        s.renderer.draw_mesh(s.arena.get(this)?, false)
    });
    bind_method!(reg, "Mesh", "drawWireframe", |s, this: Handle<Mesh>| -> () {
        s.renderer.draw_mesh(s.arena.get(this)?, true)
    });
    Ok(())
}

fn path(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createPath", |s| -> Handle<Path> { s.arena.insert(Path::new()) });

    bind_method!(reg, "Path", "addVertex", |s, this: Handle<Path>, v: Vec3| -> () {
        s.arena.get_mut(this)?.add_vertex(v)
    });
    bind_method!(reg, "Path", "addVertex", |s, this: Handle<Path>, x: f32, y: f32| -> () {
        s.arena.get_mut(this)?.add_vertex(Vec3::new(x, y, 0.0))
    });
    bind_method!(reg, "Path", "addVertices", |s, this: Handle<Path>, vs: Vec<Vec3>| -> () {
        s.arena.get_mut(this)?.add_vertices(&vs)
    });
    bind_method!(reg, "Path", "lineTo", |s, this: Handle<Path>, v: Vec3| -> () {
        s.arena.get_mut(this)?.line_to(v)
    });
    bind_method!(reg, "Path", "lineTo", |s, this: Handle<Path>, x: f32, y: f32| -> () {
        s.arena.get_mut(this)?.line_to(Vec3::new(x, y, 0.0))
    });
    bind_method!(reg, "Path", "bezierTo", |s, this: Handle<Path>, cp1: Vec3, cp2: Vec3, to: Vec3| -> () {
        s.arena.get_mut(this)?.bezier_to(cp1, cp2, to)
    });
    bind_method!(reg, "Path", "quadBezierTo", |s, this: Handle<Path>, cp: Vec3, to: Vec3| -> () {
        s.arena.get_mut(this)?.quad_bezier_to(cp, to)
    });
    bind_method!(reg, "Path", "arc", |s, this: Handle<Path>, center: Vec3, rx: f32, ry: f32, start: f32, end: f32| -> () {
        s.arena.get_mut(this)?.arc(center, rx, ry, start, end)
    });
    bind_method!(reg, "Path", "setCurveResolution", |s, this: Handle<Path>, resolution: u32| -> () {
        s.arena.get_mut(this)?.set_curve_resolution(resolution)
    });
    bind_method!(reg, "Path", "close", |s, this: Handle<Path>| -> () {
        s.arena.get_mut(this)?.close()
    });
    bind_method!(reg, "Path", "isClosed", |s, this: Handle<Path>| -> bool {
        s.arena.get(this)?.is_closed()
    });
    bind_method!(reg, "Path", "clear", |s, this: Handle<Path>| -> () {
        s.arena.get_mut(this)?.clear()
    });
    bind_method!(reg, "Path", "size", |s, this: Handle<Path>| -> usize {
        s.arena.get(this)?.len()
    });
    bind_method!(reg, "Path", "getPerimeter", |s, this: Handle<Path>| -> f32 {
        s.arena.get(this)?.perimeter()
    });
    bind_method!(reg, "Path", "getBoundingBox", |s, this: Handle<Path>| -> Rect {
        s.arena.get(this)?.bounding_box()
    });
    bind_method!(reg, "Path", "getVertices", |s, this: Handle<Path>| -> Vec<Vec3> {
        s.arena.get(this)?.vertices().to_vec()
    });
    bind_method!(reg, "Path", "draw", |s, this: Handle<Path>| -> () {
        let path = s.arena.get(this)?;
        s.renderer.draw_polyline(path.vertices(), path.is_closed())
    });
    Ok(())
}

fn stroke_mesh(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createStrokeMesh", |s| -> Handle<StrokeMesh> {
        s.arena.insert(StrokeMesh::new())
    });

    bind_method!(reg, "StrokeMesh", "setWidth", |s, this: Handle<StrokeMesh>, w: f32| -> () {
        s.arena.get_mut(this)?.set_width(w)
    });
    bind_method!(reg, "StrokeMesh", "getWidth", |s, this: Handle<StrokeMesh>| -> f32 {
        s.arena.get(this)?.width()
    });
    bind_method!(reg, "StrokeMesh", "setCap", |s, this: Handle<StrokeMesh>, cap: StrokeCap| -> () {
        s.arena.get_mut(this)?.set_cap(cap)
    });
    bind_method!(reg, "StrokeMesh", "setJoin", |s, this: Handle<StrokeMesh>, join: StrokeJoin| -> () {
        s.arena.get_mut(this)?.set_join(join)
    });
    bind_method!(reg, "StrokeMesh", "setColor", |s, this: Handle<StrokeMesh>, c: Color| -> () {
        s.arena.get_mut(this)?.set_color(c)
    });
    bind_method!(reg, "StrokeMesh", "addVertex", |s, this: Handle<StrokeMesh>, v: Vec3| -> () {
        s.arena.get_mut(this)?.add_vertex(v)
    });
    bind_method!(reg, "StrokeMesh", "addVertex", |s, this: Handle<StrokeMesh>, x: f32, y: f32| -> () {
        s.arena.get_mut(this)?.add_vertex(Vec3::new(x, y, 0.0))
    });
    bind_method!(reg, "StrokeMesh", "setShape", |s, this: Handle<StrokeMesh>, path: Handle<Path>| -> () {
        let path = s.arena.get(path)?.clone();
        s.arena.get_mut(this)?.set_shape(&path)
    });
    bind_method!(reg, "StrokeMesh", "setClosed", |s, this: Handle<StrokeMesh>, closed: bool| -> () {
        s.arena.get_mut(this)?.set_closed(closed)
    });
    bind_method!(reg, "StrokeMesh", "clear", |s, this: Handle<StrokeMesh>| -> () {
        s.arena.get_mut(this)?.clear()
    });
    bind_method!(reg, "StrokeMesh", "update", |s, this: Handle<StrokeMesh>| -> () {
        s.arena.get_mut(this)?.update()
    });
    bind_method!(reg, "StrokeMesh", "getTriangleCount", |s, this: Handle<StrokeMesh>| -> usize {
        s.arena.get(this)?.triangle_count()
    });
    bind_method!(reg, "StrokeMesh", "draw", |s, this: Handle<StrokeMesh>| -> () {
        s.arena.get_mut(this)?.draw(&mut s.renderer)
    });
    Ok(())
}

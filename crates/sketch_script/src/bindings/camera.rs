use crate::error::RegistrationError;
use crate::handle::Handle;
use crate::registry::Registry;
use sketch_core::math::Vec3;
use sketch_render::OrbitCamera;

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createCamera", |s| -> Handle<OrbitCamera> { s.arena.insert(OrbitCamera::new()) });

    bind_method!(reg, "Camera", "begin", |s, this: Handle<OrbitCamera>| -> () {
        s.arena.get_mut(this)?.begin(&mut s.renderer)
    });
    bind_method!(reg, "Camera", "end", |s, this: Handle<OrbitCamera>| -> () {
        s.arena.get_mut(this)?.end(&mut s.renderer)
    });
    bind_method!(reg, "Camera", "setTarget", |s, this: Handle<OrbitCamera>, target: Vec3| -> () {
        s.arena.get_mut(this)?.set_target(target)
    });
    bind_method!(reg, "Camera", "setTarget", |s, this: Handle<OrbitCamera>, x: f32, y: f32, z: f32| -> () {
        s.arena.get_mut(this)?.set_target(Vec3::new(x, y, z))
    });
    bind_method!(reg, "Camera", "getTarget", |s, this: Handle<OrbitCamera>| -> Vec3 {
        s.arena.get(this)?.target()
    });
    bind_method!(reg, "Camera", "setDistance", |s, this: Handle<OrbitCamera>, d: f32| -> () {
        s.arena.get_mut(this)?.set_distance(d)
    });
    bind_method!(reg, "Camera", "getDistance", |s, this: Handle<OrbitCamera>| -> f32 {
        s.arena.get(this)?.distance()
    });
    bind_method!(reg, "Camera", "setOrbit", |s, this: Handle<OrbitCamera>, yaw_deg: f32, pitch_deg: f32| -> () {
        s.arena.get_mut(this)?.set_orbit(yaw_deg, pitch_deg)
    });
    bind_method!(reg, "Camera", "orbit", |s, this: Handle<OrbitCamera>, d_yaw: f32, d_pitch: f32| -> () {
        s.arena.get_mut(this)?.orbit(d_yaw, d_pitch)
    });
    bind_method!(reg, "Camera", "zoom", |s, this: Handle<OrbitCamera>, factor: f32| -> () {
        s.arena.get_mut(this)?.zoom(factor)
    });
    bind_method!(reg, "Camera", "setFov", |s, this: Handle<OrbitCamera>, fov_deg: f32| -> () {
        s.arena.get_mut(this)?.set_fov(fov_deg)
    });
    bind_method!(reg, "Camera", "getFov", |s, this: Handle<OrbitCamera>| -> f32 {
        s.arena.get(this)?.fov()
    });
    bind_method!(reg, "Camera", "setNearFar", |s, this: Handle<OrbitCamera>, near: f32, far: f32| -> () {
        s.arena.get_mut(this)?.set_near_far(near, far)
    });
    bind_method!(reg, "Camera", "reset", |s, this: Handle<OrbitCamera>| -> () {
        s.arena.get_mut(this)?.reset()
    });
    bind_method!(reg, "Camera", "getPosition", |s, this: Handle<OrbitCamera>| -> Vec3 {
        s.arena.get(this)?.position()
    });
    Ok(())
}

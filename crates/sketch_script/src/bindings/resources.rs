//! Pixel buffers, images, textures, render targets and fonts
//!
//! Loaders report failure as `false` and log the reason; they never raise.

use crate::error::RegistrationError;
use crate::handle::Handle;
use crate::registry::Registry;
use crate::services::HostServices;
use sketch_core::math::{Color, Rect};
use sketch_render::{Fbo, Font, Image, Pixels, Texture};

fn fits(s: &HostServices, kind: &str, width: u32, height: u32) -> bool {
    let fits = s.capabilities.fits(width, height);
    if !fits {
        tracing::warn!(
            kind,
            width,
            height,
            max = s.capabilities.max_texture_size,
            "allocation exceeds device limits"
        );
    }
    fits
}

pub fn register(reg: &mut Registry) -> Result<(), RegistrationError> {
    pixels(reg)?;
    image(reg)?;
    texture(reg)?;
    fbo(reg)?;
    font(reg)?;
    Ok(())
}

fn pixels(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createPixels", |s| -> Handle<Pixels> { s.arena.insert(Pixels::new()) });

    bind_method!(reg, "Pixels", "allocate", |s, this: Handle<Pixels>, w: u32, h: u32| -> bool {
        let ok = fits(s, "Pixels", w, h);
        if ok {
            s.arena.get_mut(this)?.allocate(w, h);
        }
        ok
    });
    bind_method!(reg, "Pixels", "isAllocated", |s, this: Handle<Pixels>| -> bool {
        s.arena.get(this)?.is_allocated()
    });
    bind_method!(reg, "Pixels", "getWidth", |s, this: Handle<Pixels>| -> u32 {
        s.arena.get(this)?.width()
    });
    bind_method!(reg, "Pixels", "getHeight", |s, this: Handle<Pixels>| -> u32 {
        s.arena.get(this)?.height()
    });
    bind_method!(reg, "Pixels", "getColor", |s, this: Handle<Pixels>, x: i32, y: i32| -> Color {
        s.arena.get(this)?.get_color(x, y).unwrap_or(Color::TRANSPARENT)
    });
    bind_method!(reg, "Pixels", "setColor", |s, this: Handle<Pixels>, x: i32, y: i32, c: Color| -> bool {
        s.arena.get_mut(this)?.set_color(x, y, c)
    });
    bind_method!(reg, "Pixels", "fill", |s, this: Handle<Pixels>, c: Color| -> () {
        s.arena.get_mut(this)?.fill(c)
    });
    bind_method!(reg, "Pixels", "clear", |s, this: Handle<Pixels>| -> () {
        s.arena.get_mut(this)?.clear()
    });
    Ok(())
}

fn image(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createImage", |s| -> Handle<Image> { s.arena.insert(Image::new()) });

    bind_method!(reg, "Image", "allocate", |s, this: Handle<Image>, w: u32, h: u32| -> bool {
        let ok = fits(s, "Image", w, h);
        if ok {
            s.arena.get_mut(this)?.allocate(w, h);
        }
        ok
    });
    bind_method!(reg, "Image", "load", |s, this: Handle<Image>, path: String| -> bool {
        let pixels = match s.assets.load_image(&path) {
            Ok(decoded) => Pixels::from_rgba(decoded.width, decoded.height, decoded.rgba),
            Err(err) => {
                tracing::warn!(%err, "Image.load failed");
                None
            }
        };
        match pixels {
            Some(pixels) => {
                let image = s.arena.get_mut(this)?;
                image.set_pixels(pixels);
                image.update();
                true
            }
            None => false,
        }
    });
    bind_method!(reg, "Image", "save", |s, this: Handle<Image>, path: String| -> bool {
        let image = s.arena.get(this)?;
        if !image.is_allocated() {
            tracing::warn!(path = %path, "Image.save on an unallocated image");
            false
        } else {
            match s.assets.save_image(
                &path,
                image.width(),
                image.height(),
                image.pixels().as_bytes(),
            ) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(%err, "Image.save failed");
                    false
                }
            }
        }
    });
    bind_method!(reg, "Image", "isAllocated", |s, this: Handle<Image>| -> bool {
        s.arena.get(this)?.is_allocated()
    });
    bind_method!(reg, "Image", "getWidth", |s, this: Handle<Image>| -> u32 {
        s.arena.get(this)?.width()
    });
    bind_method!(reg, "Image", "getHeight", |s, this: Handle<Image>| -> u32 {
        s.arena.get(this)?.height()
    });
    bind_method!(reg, "Image", "getColor", |s, this: Handle<Image>, x: i32, y: i32| -> Color {
        s.arena.get(this)?.get_color(x, y).unwrap_or(Color::TRANSPARENT)
    });
    bind_method!(reg, "Image", "setColor", |s, this: Handle<Image>, x: i32, y: i32, c: Color| -> bool {
        s.arena.get_mut(this)?.set_color(x, y, c)
    });
    bind_method!(reg, "Image", "setFromPixels", |s, this: Handle<Image>, pixels: Handle<Pixels>| -> () {
        let pixels = s.arena.get(pixels)?.clone();
        s.arena.get_mut(this)?.set_pixels(pixels)
    });
    bind_method!(reg, "Image", "update", |s, this: Handle<Image>| -> () {
        s.arena.get_mut(this)?.update()
    });
    bind_method!(reg, "Image", "draw", |s, this: Handle<Image>, x: f32, y: f32| -> () {
        let image = s.arena.get_mut(this)?;
        image.update();
        let rect = Rect::new(x, y, image.width() as f32, image.height() as f32);
        s.renderer.draw_texture(image.texture(), rect)
    });
    bind_method!(reg, "Image", "draw", |s, this: Handle<Image>, x: f32, y: f32, w: f32, h: f32| -> () {
        let image = s.arena.get_mut(this)?;
        image.update();
        s.renderer.draw_texture(image.texture(), Rect::new(x, y, w, h))
    });
    Ok(())
}

fn texture(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createTexture", |s| -> Handle<Texture> { s.arena.insert(Texture::new()) });

    bind_method!(reg, "Texture", "allocate", |s, this: Handle<Texture>, w: u32, h: u32| -> bool {
        let ok = fits(s, "Texture", w, h);
        if ok {
            s.arena.get_mut(this)?.allocate(w, h);
        }
        ok
    });
    bind_method!(reg, "Texture", "loadData", |s, this: Handle<Texture>, pixels: Handle<Pixels>| -> () {
        let pixels = s.arena.get(pixels)?.clone();
        s.arena.get_mut(this)?.load_data(&pixels)
    });
    bind_method!(reg, "Texture", "isAllocated", |s, this: Handle<Texture>| -> bool {
        s.arena.get(this)?.is_allocated()
    });
    bind_method!(reg, "Texture", "getWidth", |s, this: Handle<Texture>| -> u32 {
        s.arena.get(this)?.width()
    });
    bind_method!(reg, "Texture", "getHeight", |s, this: Handle<Texture>| -> u32 {
        s.arena.get(this)?.height()
    });
    bind_method!(reg, "Texture", "draw", |s, this: Handle<Texture>, x: f32, y: f32| -> () {
        let texture = s.arena.get(this)?;
        let rect = Rect::new(x, y, texture.width() as f32, texture.height() as f32);
        s.renderer.draw_texture(texture, rect)
    });
    bind_method!(reg, "Texture", "draw", |s, this: Handle<Texture>, x: f32, y: f32, w: f32, h: f32| -> () {
        let texture = s.arena.get(this)?;
        s.renderer.draw_texture(texture, Rect::new(x, y, w, h))
    });
    Ok(())
}

fn fbo(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createFbo", |s| -> Handle<Fbo> { s.arena.insert(Fbo::new()) });

    bind_method!(reg, "Fbo", "allocate", |s, this: Handle<Fbo>, w: u32, h: u32| -> bool {
        let ok = fits(s, "Fbo", w, h);
        if ok {
            s.arena.get_mut(this)?.allocate(w, h);
        }
        ok
    });
    bind_method!(reg, "Fbo", "isAllocated", |s, this: Handle<Fbo>| -> bool {
        s.arena.get(this)?.is_allocated()
    });
    bind_method!(reg, "Fbo", "getWidth", |s, this: Handle<Fbo>| -> u32 {
        s.arena.get(this)?.width()
    });
    bind_method!(reg, "Fbo", "getHeight", |s, this: Handle<Fbo>| -> u32 {
        s.arena.get(this)?.height()
    });
    bind_method!(reg, "Fbo", "begin", |s, this: Handle<Fbo>| -> bool {
        s.arena.get_mut(this)?.begin(&mut s.renderer)
    });
    bind_method!(reg, "Fbo", "end", |s, this: Handle<Fbo>| -> () {
        s.arena.get_mut(this)?.end(&mut s.renderer)
    });
    bind_method!(reg, "Fbo", "draw", |s, this: Handle<Fbo>, x: f32, y: f32| -> () {
        s.arena.get(this)?.draw(&mut s.renderer, x, y)
    });
    bind_method!(reg, "Fbo", "draw", |s, this: Handle<Fbo>, x: f32, y: f32, w: f32, h: f32| -> () {
        s.arena.get(this)?.draw_sized(&mut s.renderer, Rect::new(x, y, w, h))
    });
    Ok(())
}

fn font(reg: &mut Registry) -> Result<(), RegistrationError> {
    bind_fn!(reg, "createFont", |s| -> Handle<Font> { s.arena.insert(Font::new()) });

    bind_method!(reg, "Font", "load", |s, this: Handle<Font>, path: String, size: f32| -> bool {
        match s.assets.read_bytes(&path) {
            Ok(bytes) => {
                let loaded = s.arena.get_mut(this)?.load_from_bytes(&path, &bytes, size);
                if !loaded {
                    tracing::warn!(path = %path, size, "Font.load: not a font file");
                }
                loaded
            }
            Err(err) => {
                tracing::warn!(%err, "Font.load failed");
                false
            }
        }
    });
    bind_method!(reg, "Font", "isLoaded", |s, this: Handle<Font>| -> bool {
        s.arena.get(this)?.is_loaded()
    });
    bind_method!(reg, "Font", "getSize", |s, this: Handle<Font>| -> f32 {
        s.arena.get(this)?.size()
    });
    bind_method!(reg, "Font", "getLineHeight", |s, this: Handle<Font>| -> f32 {
        s.arena.get(this)?.line_height()
    });
    bind_method!(reg, "Font", "getStringWidth", |s, this: Handle<Font>, text: String| -> f32 {
        s.arena.get(this)?.string_width(&text)
    });
    bind_method!(reg, "Font", "getStringHeight", |s, this: Handle<Font>, text: String| -> f32 {
        s.arena.get(this)?.string_height(&text)
    });
    bind_method!(reg, "Font", "drawString", |s, this: Handle<Font>, text: String, x: f32, y: f32| -> () {
        s.arena.get(this)?.draw_string(&mut s.renderer, &text, x, y)
    });
    Ok(())
}

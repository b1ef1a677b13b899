//! Gradient noise
//!
//! Improved Perlin noise over a seeded permutation table. Output is remapped
//! to `0.0..=1.0` so scripts can feed it straight into colors and positions.

use crate::math::DeterministicRng;

pub struct Noise {
    perm: [u8; 512],
}

impl Noise {
    pub fn new(seed: u64) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut rng = DeterministicRng::new(seed);
        for i in (1..table.len()).rev() {
            let j = (rng.next_u32() as usize) % (i + 1);
            table.swap(i, j);
        }
        let perm = std::array::from_fn(|i| table[i & 255]);
        Self { perm }
    }

    pub fn noise1(&self, x: f32) -> f32 {
        self.noise3(x, 0.0, 0.0)
    }

    pub fn noise2(&self, x: f32, y: f32) -> f32 {
        self.noise3(x, y, 0.0)
    }

    pub fn noise3(&self, x: f32, y: f32, z: f32) -> f32 {
        ((self.signed3(x, y, z) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Raw noise in roughly `-1.0..=1.0`.
    pub fn signed3(&self, x: f32, y: f32, z: f32) -> f32 {
        let xi = (x.floor() as i32 & 255) as usize;
        let yi = (y.floor() as i32 & 255) as usize;
        let zi = (z.floor() as i32 & 255) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();
        let (u, v, w) = (fade(xf), fade(yf), fade(zf));

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        let x1 = lerp(
            u,
            grad(p[aa], xf, yf, zf),
            grad(p[ba], xf - 1.0, yf, zf),
        );
        let x2 = lerp(
            u,
            grad(p[ab], xf, yf - 1.0, zf),
            grad(p[bb], xf - 1.0, yf - 1.0, zf),
        );
        let y1 = lerp(v, x1, x2);

        let x3 = lerp(
            u,
            grad(p[aa + 1], xf, yf, zf - 1.0),
            grad(p[ba + 1], xf - 1.0, yf, zf - 1.0),
        );
        let x4 = lerp(
            u,
            grad(p[ab + 1], xf, yf - 1.0, zf - 1.0),
            grad(p[bb + 1], xf - 1.0, yf - 1.0, zf - 1.0),
        );
        let y2 = lerp(v, x3, x4);

        lerp(w, y1, y2)
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new(0)
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_normalised() {
        let noise = Noise::new(3);
        for i in 0..500 {
            let t = i as f32 * 0.173;
            let v = noise.noise3(t, t * 0.5, -t);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn lattice_points_are_midpoint() {
        let noise = Noise::new(11);
        assert_eq!(noise.noise2(4.0, 9.0), 0.5);
    }

    #[test]
    fn same_seed_same_field() {
        let a = Noise::new(99);
        let b = Noise::new(99);
        assert_eq!(a.noise2(1.3, 2.7), b.noise2(1.3, 2.7));
    }
}

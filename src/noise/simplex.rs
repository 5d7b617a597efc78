use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::NoiseSource;

// -------------------------------------------------------------------------------------------------

/// 2D simplex noise, based on Stefan Gustavson's reference implementation.
///
/// The gradient permutation table gets shuffled from the given seed, so two instances
/// with the same seed produce the same noise field.
#[derive(Clone)]
pub struct SimplexNoise {
    /// Permutation table (256 values, doubled to avoid index wrapping).
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Skewing factor: (sqrt(3) - 1) / 2
    const F2: f64 = 0.366_025_403_784_438_6;
    /// Unskewing factor: (3 - sqrt(3)) / 6
    const G2: f64 = 0.211_324_865_405_187_13;

    const GRAD2: [[f64; 2]; 12] = [
        [1.0, 1.0],
        [-1.0, 1.0],
        [1.0, -1.0],
        [-1.0, -1.0],
        [1.0, 0.0],
        [-1.0, 0.0],
        [1.0, 0.0],
        [-1.0, 0.0],
        [0.0, 1.0],
        [0.0, -1.0],
        [0.0, 1.0],
        [0.0, -1.0],
    ];

    /// Create a new noise field from the given seed.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    /// Create a new noise field with a random seed.
    pub fn random() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    fn with_rng(mut rng: SmallRng) -> Self {
        let mut source = [0u8; 256];
        for (index, value) in source.iter_mut().enumerate() {
            *value = index as u8;
        }
        // Fisher-Yates shuffle
        for i in (1..source.len()).rev() {
            let j = rng.random_range(0..=i);
            source.swap(i, j);
        }
        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&source);
        perm[256..].copy_from_slice(&source);
        Self { perm }
    }

    #[inline]
    fn grad(hash: usize, x: f64, y: f64) -> f64 {
        let g = &Self::GRAD2[hash % 12];
        g[0] * x + g[1] * y
    }

    #[inline]
    fn corner(t: f64, hash: usize, x: f64, y: f64) -> f64 {
        if t < 0.0 {
            0.0
        } else {
            let t2 = t * t;
            t2 * t2 * Self::grad(hash, x, y)
        }
    }
}

impl NoiseSource for SimplexNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        // skew input space to find the simplex cell
        let s = (x + y) * Self::F2;
        let i = (x + s).floor();
        let j = (y + s).floor();

        let t = (i + j) * Self::G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // lower or upper triangle of the cell
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let perm = &self.perm;
        let gi0 = perm[ii + perm[jj] as usize] as usize;
        let gi1 = perm[ii + i1 + perm[jj + j1] as usize] as usize;
        let gi2 = perm[ii + 1 + perm[jj + 1] as usize] as usize;

        let n0 = Self::corner(0.5 - x0 * x0 - y0 * y0, gi0, x0, y0);
        let n1 = Self::corner(0.5 - x1 * x1 - y1 * y1, gi1, x1, y1);
        let n2 = Self::corner(0.5 - x2 * x2 - y2 * y2, gi2, x2, y2);

        // scale into [-1, 1]
        70.0 * (n0 + n1 + n2)
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let noise1 = SimplexNoise::new(42);
        let noise2 = SimplexNoise::new(42);
        for i in 0..100 {
            let x = i as f64 * 0.1;
            let y = i as f64 * 0.13;
            assert_eq!(noise1.sample(x, y), noise2.sample(x, y));
        }
    }

    #[test]
    fn seeds_differ() {
        let noise1 = SimplexNoise::new(42);
        let noise2 = SimplexNoise::new(43);
        let different = (0..10).any(|i| {
            let x = i as f64 * 0.1 + 0.05;
            noise1.sample(x, 0.0) != noise2.sample(x, 0.0)
        });
        assert!(different);
    }

    #[test]
    fn range() {
        let noise = SimplexNoise::random();
        for i in 0..500 {
            for j in 0..50 {
                let v = noise.sample(i as f64 * 0.037, j as f64 * 0.11 - 2.0);
                assert!((-1.0..=1.0).contains(&v), "noise value {v} out of range");
            }
        }
    }

    #[test]
    fn continuity() {
        // small steps in time must only produce small steps in value
        let noise = SimplexNoise::new(7);
        let mut last = noise.sample(0.0, 0.0);
        for i in 1..10000 {
            let value = noise.sample(i as f64 * 0.0001, 0.0);
            assert!((value - last).abs() < 0.01);
            last = value;
        }
    }
}

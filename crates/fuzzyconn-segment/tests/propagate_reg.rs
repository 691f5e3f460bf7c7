//! Propagation regression test
//!
//! Checks the fuzzy scene against the max-min path definition on small
//! random grids, and the ordering properties the scene must satisfy:
//!
//! 1. Brute-force agreement: every pixel's strength equals the best
//!    min-affinity over all simple paths from a seed
//! 2. Idempotence and seed-order independence
//! 3. Widening either variance never lowers any strength
//! 4. Raising the threshold only shrinks the object
//! 5. Unreachable components stay at zero
//!
//! Run with:
//! ```
//! cargo test -p fuzzyconn-segment --test propagate_reg
//! ```

use fuzzyconn_core::{Connectivity, FuzzyScene, Image, MAX_STRENGTH, NeighborOffsets, Strength};
use fuzzyconn_segment::{
    Affinity, GaussianAffinity, GaussianParams, PropagationOptions, SeedSet, extract, propagate,
};
use fuzzyconn_test::RegParams;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random image with intensities around 100 and occasional outliers.
fn random_image(rng: &mut StdRng, dims: &[usize]) -> Image<u8> {
    Image::from_fn(dims, |_| {
        if rng.random_bool(0.15) {
            250
        } else {
            rng.random_range(85..=115)
        }
    })
    .unwrap()
}

fn random_seeds(rng: &mut StdRng, image: &Image<u8>, count: usize) -> SeedSet {
    let mut seeds = SeedSet::new(image.shape());
    while seeds.len() < count {
        let index: Vec<usize> = image.dims().iter().map(|&d| rng.random_range(0..d)).collect();
        seeds.insert(&index).unwrap();
    }
    seeds
}

fn model(variance: f64, diff_var: f64) -> GaussianAffinity {
    GaussianAffinity::new(GaussianParams::new(100.0, variance, 4.0, diff_var).unwrap())
}

/// Best min-affinity over all simple paths from any seed, by exhaustive
/// depth-first enumeration.
fn brute_force<A: Affinity<u8>>(
    image: &Image<u8>,
    seeds: &SeedSet,
    affinity: &A,
    connectivity: Connectivity,
) -> Vec<Strength> {
    struct Walk<'a, A> {
        image: &'a Image<u8>,
        affinity: &'a A,
        offsets: NeighborOffsets,
        visited: Vec<bool>,
        best: Vec<Strength>,
    }

    impl<A: Affinity<u8>> Walk<'_, A> {
        fn visit(&mut self, node: usize, strength: Strength) {
            let image = self.image;
            let data = image.as_slice();
            let index = image.shape().unravel(node).unwrap();
            let neighbors: Vec<usize> = self.offsets.neighbors(image.dims(), &index, node).collect();
            for n in neighbors {
                if self.visited[n] {
                    continue;
                }
                let s = strength.min(self.affinity.affinity(data[node], data[n]));
                if s == 0 {
                    continue;
                }
                self.best[n] = self.best[n].max(s);
                self.visited[n] = true;
                self.visit(n, s);
                self.visited[n] = false;
            }
        }
    }

    let mut walk = Walk {
        image,
        affinity,
        offsets: NeighborOffsets::new(image.shape(), connectivity),
        visited: vec![false; image.len()],
        best: vec![0; image.len()],
    };
    for &s in seeds.linear_indices() {
        walk.best[s] = MAX_STRENGTH;
    }
    for &s in seeds.linear_indices() {
        walk.visited[s] = true;
        walk.visit(s, MAX_STRENGTH);
        walk.visited[s] = false;
    }
    walk.best
}

fn all_at_least(a: &FuzzyScene, b: &FuzzyScene) -> bool {
    a.as_slice().iter().zip(b.as_slice()).all(|(x, y)| x >= y)
}

#[test]
fn propagate_reg() {
    let mut rp = RegParams::new("propagate");
    let mut rng = StdRng::seed_from_u64(0x5eed);

    // --- Test 1: brute-force agreement, face connectivity, 4x4 ---
    eprintln!("=== Brute force, face connectivity ===");
    let affinity = model(60.0, 20.0);
    let face = PropagationOptions::new();
    for trial in 0..25 {
        let image = random_image(&mut rng, &[4, 4]);
        let seeds = random_seeds(&mut rng, &image, 1 + trial % 2);
        let (scene, stats) = propagate(&image, &seeds, &affinity, &face).unwrap();
        let expected = brute_force(&image, &seeds, &affinity, Connectivity::Face);
        let expected = Image::from_data(&[4, 4], expected).unwrap();
        rp.compare_images(&expected, &scene);
        rp.compare_values(stats.pushes as f64, stats.pops as f64, 0.0);
        if trial == 0 {
            rp.display_image("image", &image);
            rp.display_image("scene", &scene);
        }
    }

    // --- Test 2: brute-force agreement, full connectivity, 3x3 ---
    eprintln!("=== Brute force, full connectivity ===");
    let full = PropagationOptions::new().with_connectivity(Connectivity::Full);
    for _ in 0..15 {
        let image = random_image(&mut rng, &[3, 3]);
        let seeds = random_seeds(&mut rng, &image, 1);
        let (scene, _) = propagate(&image, &seeds, &affinity, &full).unwrap();
        let expected = brute_force(&image, &seeds, &affinity, Connectivity::Full);
        let expected = Image::from_data(&[3, 3], expected).unwrap();
        rp.compare_images(&expected, &scene);
    }

    // --- Test 3: brute-force agreement in 3-D, 2x2x3 ---
    eprintln!("=== Brute force, 3-D ===");
    for _ in 0..10 {
        let image = random_image(&mut rng, &[2, 2, 3]);
        let seeds = random_seeds(&mut rng, &image, 1);
        let (scene, _) = propagate(&image, &seeds, &affinity, &face).unwrap();
        let expected = brute_force(&image, &seeds, &affinity, Connectivity::Face);
        let expected = Image::from_data(&[2, 2, 3], expected).unwrap();
        rp.compare_images(&expected, &scene);
    }

    assert!(rp.cleanup());
}

#[test]
fn propagate_properties_reg() {
    let mut rp = RegParams::new("propagate_properties");
    let mut rng = StdRng::seed_from_u64(17);
    let options = PropagationOptions::new();

    for _ in 0..10 {
        let image = random_image(&mut rng, &[12, 9]);
        let seeds = random_seeds(&mut rng, &image, 3);
        let narrow = model(40.0, 10.0);

        // --- Idempotence ---
        let (first, _) = propagate(&image, &seeds, &narrow, &options).unwrap();
        let (second, _) = propagate(&image, &seeds, &narrow, &options).unwrap();
        rp.compare_images(&first, &second);

        // --- Seed order does not matter ---
        let mut reversed_indices = seeds.indices();
        reversed_indices.reverse();
        let reversed = SeedSet::from_indices(image.shape(), &reversed_indices).unwrap();
        let (third, _) = propagate(&image, &reversed, &narrow, &options).unwrap();
        rp.compare_images(&first, &third);

        // --- Widening variance or diff_var never lowers a strength ---
        let (wide_var, _) = propagate(&image, &seeds, &model(160.0, 10.0), &options).unwrap();
        let (wide_diff, _) = propagate(&image, &seeds, &model(40.0, 90.0), &options).unwrap();
        rp.check(all_at_least(&wide_var, &first));
        rp.check(all_at_least(&wide_diff, &first));

        // --- Threshold monotonicity ---
        let mut previous = extract(&first, 0);
        for t in [1, 5_000, 20_000, 40_000, 60_000, MAX_STRENGTH] {
            let mask = extract(&first, t);
            rp.check(mask.is_subset_of(&previous).unwrap());
            previous = mask;
        }

        // --- Every seed is at full strength ---
        for &s in seeds.linear_indices() {
            rp.compare_values(MAX_STRENGTH as f64, first.as_slice()[s] as f64, 0.0);
        }
    }

    assert!(rp.cleanup());
}

#[test]
fn propagate_unreachable_reg() {
    let mut rp = RegParams::new("propagate_unreachable");

    // A column of outliers splits the grid in two
    let image = Image::from_fn(&[7, 5], |idx| if idx[0] == 3 { 255u8 } else { 100 }).unwrap();
    let seeds = SeedSet::from_indices(image.shape(), [[0usize, 0]]).unwrap();
    let affinity = GaussianAffinity::new(GaussianParams::new(100.0, 10.0, 0.0, 10.0).unwrap());

    for connectivity in [Connectivity::Face, Connectivity::Full] {
        let options = PropagationOptions::new().with_connectivity(connectivity);
        let (scene, stats) = propagate(&image, &seeds, &affinity, &options).unwrap();
        rp.display_image("scene", &scene);

        for y in 0..5 {
            for x in 0..7 {
                let s = *scene.get(&[x, y]).unwrap();
                let expected = if x < 3 { MAX_STRENGTH } else { 0 };
                rp.compare_values(expected as f64, s as f64, 0.0);
            }
        }
        rp.compare_values(15.0, stats.settled as f64, 0.0);
    }

    assert!(rp.cleanup());
}

use rand::Rng;

/// Fisher-Yates shuffle returning a new vector; the input is left untouched.
///
/// The RNG is injected so puzzle generation stays deterministic under a
/// seeded generator in tests.
pub fn shuffle<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

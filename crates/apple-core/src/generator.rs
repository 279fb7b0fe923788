use crate::grid::{Grid, DEFAULT_GRID_SIZE};

/// Configuration for grid generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Grid dimension (the board is size x size)
    pub size: usize,
    /// Attempt budget multiplier; the fill loop runs at most
    /// `attempt_factor * size * size` placement rounds
    pub attempt_factor: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            attempt_factor: 3,
        }
    }
}

/// The eight unit directions a combination can be laid out along
const DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),
    (1, 0),
    (1, 1),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Apple grid generator
///
/// Seeds the board with runs of values summing to ten so that a dense set
/// of clearable rectangles exists, then fills whatever is left with
/// independent random values. Every cell ends up with a value in 1..=9
/// and the fill always terminates within the attempt budget.
pub struct Generator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Create a seeded generator with custom configuration
    pub fn with_config_and_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Generate a fully populated grid
    pub fn generate(&mut self) -> Grid {
        let size = self.config.size;
        let mut values: Vec<Option<u8>> = vec![None; size * size];

        let mut combos = sum_combinations();
        self.shuffle(&mut combos);

        let max_attempts = self.config.attempt_factor * size * size;
        for _ in 0..max_attempts {
            if !self.place_round(&mut values, size, &combos) {
                break;
            }
        }

        // Whatever survived the budget gets an independent random value
        for slot in values.iter_mut() {
            if slot.is_none() {
                *slot = Some(self.random_value());
            }
        }

        let filled: Vec<u8> = values.into_iter().flatten().collect();
        Grid::from_values(size, &filled)
    }

    /// One placement round: pick a random empty cell and lay a combination
    /// from it, or a lone value if nothing fits. Returns false once the
    /// board has no empty cells left.
    fn place_round(&mut self, values: &mut [Option<u8>], size: usize, combos: &[Vec<u8>]) -> bool {
        let empty: Vec<usize> = values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.is_none().then_some(i))
            .collect();
        if empty.is_empty() {
            return false;
        }

        let start = empty[self.rng.next_usize(empty.len())];
        let (start_row, start_col) = (start / size, start % size);

        for combo in combos {
            let mut directions = DIRECTIONS;
            self.shuffle(&mut directions);

            for &(dr, dc) in &directions {
                if let Some(span) = free_span(values, size, start_row, start_col, dr, dc, combo.len())
                {
                    for (&idx, &value) in span.iter().zip(combo) {
                        values[idx] = Some(value);
                    }
                    return true;
                }
            }
        }

        // No combination fits at this start cell in any direction
        values[start] = Some(self.random_value());
        true
    }

    fn random_value(&mut self) -> u8 {
        self.rng.next_usize(9) as u8 + 1
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.rng.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Indices of `len` consecutive empty cells from (row, col) along (dr, dc),
/// or None if the run leaves the board or hits an occupied cell
fn free_span(
    values: &[Option<u8>],
    size: usize,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    len: usize,
) -> Option<Vec<usize>> {
    let mut span = Vec::with_capacity(len);
    for step in 0..len {
        let r = row as isize + step as isize * dr;
        let c = col as isize + step as isize * dc;
        if r < 0 || c < 0 || r >= size as isize || c >= size as isize {
            return None;
        }
        let idx = r as usize * size + c as usize;
        if values[idx].is_some() {
            return None;
        }
        span.push(idx);
    }
    Some(span)
}

/// All value tuples of length 2-4 summing to exactly ten
///
/// Pairs are `(i, 10 - i)` for i in 1..=9; triples and quadruples only use
/// pairwise-distinct values, which keeps the seeded runs varied instead of
/// degenerate repeats.
pub(crate) fn sum_combinations() -> Vec<Vec<u8>> {
    let mut combos: Vec<Vec<u8>> = Vec::new();

    for i in 1..=9u8 {
        combos.push(vec![i, 10 - i]);
    }

    for i in 1..=7u8 {
        for j in 1..=7u8 {
            let k = 10i8 - i as i8 - j as i8;
            if (1..=9).contains(&k) {
                let k = k as u8;
                if i != j && j != k && i != k {
                    combos.push(vec![i, j, k]);
                }
            }
        }
    }

    for i in 1..=5u8 {
        for j in 1..=5u8 {
            for k in 1..=5u8 {
                let l = 10i8 - i as i8 - j as i8 - k as i8;
                if (1..=9).contains(&l) {
                    let l = l as u8;
                    if i != j && i != k && i != l && j != k && j != l && k != l {
                        combos.push(vec![i, j, k, l]);
                    }
                }
            }
        }
    }

    combos
}

/// Simple PRNG for no-std compatibility
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        // Use getrandom for WASM-compatible random seeding
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        let seed = u64::from_le_bytes(seed_bytes);
        Self::with_seed(seed)
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // PCG-like PRNG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    #[test]
    fn test_combination_families() {
        let combos = sum_combinations();

        assert!(!combos.is_empty());
        for combo in &combos {
            assert!((2..=4).contains(&combo.len()));
            assert_eq!(combo.iter().map(|&v| v as u32).sum::<u32>(), 10);
            assert!(combo.iter().all(|v| (1..=9).contains(v)));

            // Triples and quadruples never repeat a value
            if combo.len() > 2 {
                for (i, a) in combo.iter().enumerate() {
                    assert!(!combo[i + 1..].contains(a), "repeat in {:?}", combo);
                }
            }
        }

        // The (5, 5) pair is the only legal repeat
        assert!(combos.contains(&vec![5, 5]));
    }

    #[test]
    fn test_generate_fills_every_cell() {
        for size in [5, 10] {
            let mut generator = Generator::with_config_and_seed(
                GeneratorConfig {
                    size,
                    ..GeneratorConfig::default()
                },
                7,
            );
            let grid = generator.generate();

            assert_eq!(grid.size(), size);
            assert_eq!(grid.cells().len(), size * size);
            for cell in grid.cells() {
                assert!((1..=9).contains(&cell.value()));
                assert!(!cell.is_removed());
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let grid_a = Generator::with_seed(42).generate();
        let grid_b = Generator::with_seed(42).generate();
        assert_eq!(grid_a, grid_b);

        let grid_c = Generator::with_seed(43).generate();
        assert_ne!(grid_a, grid_c);
    }

    #[test]
    fn test_generated_board_has_an_adjacent_pair() {
        // Seeded so the assertion is stable; the placement strategy makes
        // an adjacent sum-to-ten pair all but certain on a 10x10 board.
        let grid = Generator::with_seed(42).generate();
        let size = grid.size() as isize;

        let mut found = false;
        'outer: for row in 0..size {
            for col in 0..size {
                let a = grid.value(Position::new(row as usize, col as usize));
                for (dr, dc) in [(0, 1), (1, 0), (1, 1), (1, -1)] {
                    let (r, c) = (row + dr, col + dc);
                    if r < 0 || c < 0 || r >= size || c >= size {
                        continue;
                    }
                    let b = grid.value(Position::new(r as usize, c as usize));
                    if a + b == 10 {
                        found = true;
                        break 'outer;
                    }
                }
            }
        }
        assert!(found, "no adjacent pair summing to ten");
    }
}

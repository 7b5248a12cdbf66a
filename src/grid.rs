use rand::Rng;

/// An n×n Schulte table: the numbers 1..=n² in shuffled order, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    cells: Vec<u32>,
}

impl Grid {
    pub fn shuffled<R: Rng + ?Sized>(size: u32, rng: &mut R) -> Self {
        let mut cells: Vec<u32> = (1..=size * size).collect();
        fisher_yates(&mut cells, rng);
        Self { size, cells }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.cells.get(index).copied()
    }
}

/// In-place Fisher–Yates: walk down from the last index, swapping each
/// element with a uniformly drawn index in [0, i].
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

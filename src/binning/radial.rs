use crate::types::SpacePointId;

/// Fixed-width radial bins. Each bin keeps its points in insertion order and
/// the set of non-empty bins is tracked so clearing costs O(occupied).
#[derive(Clone, Debug)]
pub struct RadialBins {
    bin_size: f32,
    inv_bin_size: f32,
    bins: Vec<Vec<SpacePointId>>,
    occupied: Vec<usize>,
    points: usize,
}

impl RadialBins {
    /// Covers `[0, r_max + 0.1)` with bins of `bin_size` millimetres.
    pub fn new(bin_size: f32, r_max: f32) -> Self {
        let bin_size = if bin_size > 0.0 { bin_size } else { 2.0 };
        let count = (((r_max + 0.1) / bin_size) as usize).max(1);
        Self {
            bin_size,
            inv_bin_size: 1.0 / bin_size,
            bins: vec![Vec::new(); count],
            occupied: Vec::new(),
            points: 0,
        }
    }

    /// Bin holding `radius`; radii past the last bin land in it.
    #[inline]
    pub fn bin_index(&self, radius: f32) -> usize {
        let raw = (radius * self.inv_bin_size) as isize;
        raw.clamp(0, self.bins.len() as isize - 1) as usize
    }

    pub fn insert(&mut self, id: SpacePointId, radius: f32) -> usize {
        let idx = self.bin_index(radius);
        let bin = &mut self.bins[idx];
        if bin.is_empty() {
            self.occupied.push(idx);
        }
        bin.push(id);
        self.points += 1;
        idx
    }

    pub fn clear(&mut self) {
        for &idx in &self.occupied {
            self.bins[idx].clear();
        }
        self.occupied.clear();
        self.points = 0;
    }

    #[inline]
    pub fn bin(&self, idx: usize) -> &[SpacePointId] {
        &self.bins[idx]
    }

    /// Lower edge of bin `idx` in millimetres.
    #[inline]
    pub fn lower_edge(&self, idx: usize) -> f32 {
        idx as f32 * self.bin_size
    }

    pub fn bin_size(&self) -> f32 {
        self.bin_size
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points == 0
    }

    pub fn point_count(&self) -> usize {
        self.points
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }
}

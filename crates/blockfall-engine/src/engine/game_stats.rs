/// Points for a lock, indexed by how many rows it completed (capped at 4).
const LINE_CLEAR_POINTS: [usize; 5] = [0, 100, 300, 500, 800];

/// Running totals of a game.
///
/// `score` is what a session reports and what training uses as fitness.
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::default();
/// stats.record_lock(2);
/// stats.record_lock(4);
/// stats.record_detonation();
///
/// assert_eq!(stats.score(), 1100);
/// assert_eq!(stats.placed_pieces(), 3);
/// assert_eq!(stats.cleared_lines(), 6);
/// assert_eq!(stats.clears_by_size(), &[0, 0, 1, 0, 1]);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    placed_pieces: usize,
    cleared_lines: usize,
    clears_by_size: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Pieces that left play, either locked or detonated.
    #[must_use]
    pub fn placed_pieces(&self) -> usize {
        self.placed_pieces
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Number of locks that completed 0, 1, 2, 3 and 4 rows.
    #[must_use]
    pub fn clears_by_size(&self) -> &[usize; 5] {
        &self.clears_by_size
    }

    /// Records a lock that completed `rows` rows.
    pub fn record_lock(&mut self, rows: usize) {
        let bucket = rows.min(LINE_CLEAR_POINTS.len() - 1);
        self.placed_pieces += 1;
        self.cleared_lines += rows;
        self.clears_by_size[bucket] += 1;
        self.score += LINE_CLEAR_POINTS[bucket];
    }

    /// Records a bomb; it scores nothing and is not a lock.
    pub fn record_detonation(&mut self) {
        self.placed_pieces += 1;
    }
}

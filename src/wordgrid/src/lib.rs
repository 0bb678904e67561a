use std::cmp::Reverse;
use std::fmt::{Debug, Formatter};

use bit_set::BitSet;
use instant::{Duration, Instant};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize, Serializer};
use smallvec::{SmallVec, smallvec};

pub mod candidates;
pub mod errors;
pub mod logging;

pub use errors::{CandidateError, PlacementError, WordgridError};

/// Side length of the square grid used by the quiz form.
pub const DEFAULT_GRID_SIZE: usize = 10;

/// The largest grid side length accepted by `place_words`.
pub const MAX_GRID_SIZE: usize = 1024;

/// The expected maximum length for a single word.
pub const MAX_WORD_LENGTH: usize = 16;

/// The expected maximum number of crossing positions found for a single word.
pub const MAX_PROPOSAL_COUNT: usize = 32;

/// Zero-indexed (row, col) coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);

/// The letters of a word, one per grid cell.
type Glyphs = SmallVec<[char; MAX_WORD_LENGTH]>;

/// Direction that a word runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// The (row, col) offset from one letter of a word to the next.
    fn step(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

/// A word offered for placement, along with its clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCandidate {
    pub text: String,

    /// Carried through to the clue lists untouched.
    pub hint: String,

    /// Preferred direction. Placement may end up using the other one.
    #[serde(default)]
    pub orientation: Orientation,
}

impl WordCandidate {
    pub fn new(
        text: impl Into<String>,
        hint: impl Into<String>,
        orientation: Orientation,
    ) -> WordCandidate {
        WordCandidate { text: text.into(), hint: hint.into(), orientation }
    }

    /// Number of grid cells the word occupies.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn glyphs(&self) -> Glyphs {
        self.text.chars().collect()
    }
}

/// A word that made it into the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedWord {
    pub text: String,
    pub hint: String,
    pub row: usize,
    pub col: usize,

    /// The direction actually used, which may differ from the candidate's preference.
    pub orientation: Orientation,

    /// 1-based position in placement order, shown as the clue number.
    pub sequence_number: usize,

    /// How many letters were already in the grid when this word was written.
    pub intersections: usize,

    /// True if `orientation` is not the direction the candidate asked for.
    pub flipped: bool,
}

impl PlacedWord {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Generate the coords for each cell of this word.
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.len()).map(|cell_idx| {
            match self.orientation {
                Orientation::Horizontal => (self.row, self.col + cell_idx),
                Orientation::Vertical => (self.row + cell_idx, self.col),
            }
        }).collect()
    }
}

/// How a proposed word may interact with letters that are already in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlacementMode {
    /// Existing letters may be reused where they match.
    Crossing,

    /// Every cell of the word must start out empty.
    Standalone,
}

/// A square board of cells, each either empty or holding a single letter.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<char>>,
}

impl Grid {
    /// `size` must already be checked against `MAX_GRID_SIZE`.
    pub(crate) fn new(size: usize) -> Grid {
        Grid { size, cells: vec![None; size * size] }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The letter at the given cell, or `None` if it is empty or off the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col]
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<char>]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn letter_at(&self, row: isize, col: isize) -> Option<char> {
        if row < 0 || col < 0 {
            None
        } else {
            self.get(row as usize, col as usize)
        }
    }

    /// Off-grid cells count as vacant.
    fn is_vacant(&self, row: isize, col: isize) -> bool {
        self.letter_at(row, col).is_none()
    }

    /// Decide whether `glyphs` can be written starting at `start` in the given orientation. On
    /// success, return the number of cells that already hold the matching letter.
    ///
    /// A placement is legal when the whole run is on the grid, no existing letter would be
    /// overwritten with a different one, every newly filled cell has vacant neighbours on both
    /// sides perpendicular to the run, and the cells just before and just after the run are
    /// vacant. This keeps a word from merging into a longer run or lying flush against a parallel
    /// word.
    fn check_placement(
        &self,
        glyphs: &[char],
        start: (isize, isize),
        orientation: Orientation,
        mode: PlacementMode,
    ) -> Option<usize> {
        if glyphs.is_empty() {
            return None;
        }

        let size = self.size as isize;
        let (start_row, start_col) = start;
        let (row_step, col_step) = orientation.step();
        let last_idx = glyphs.len() as isize - 1;
        let (end_row, end_col) = (start_row + row_step * last_idx, start_col + col_step * last_idx);

        if start_row < 0 || start_col < 0 || end_row >= size || end_col >= size {
            return None;
        }

        let mut intersections = 0;

        for (cell_idx, &glyph) in glyphs.iter().enumerate() {
            let row = start_row + row_step * cell_idx as isize;
            let col = start_col + col_step * cell_idx as isize;

            match self.letter_at(row, col) {
                Some(existing) if existing != glyph => return None,
                Some(_) => {
                    if mode == PlacementMode::Standalone {
                        return None;
                    }
                    intersections += 1;
                }
                None => {
                    // The perpendicular neighbours of (row, col) are one step across the run.
                    if {
                        !self.is_vacant(row + col_step, col + row_step) ||
                            !self.is_vacant(row - col_step, col - row_step)
                    } {
                        return None;
                    }
                }
            }
        }

        // A word has to contribute at least one letter of its own.
        if intersections == glyphs.len() {
            return None;
        }

        if {
            !self.is_vacant(start_row - row_step, start_col - col_step) ||
                !self.is_vacant(end_row + row_step, end_col + col_step)
        } {
            return None;
        }

        Some(intersections)
    }

    /// Write a word whose placement has already been checked.
    fn write_word(&mut self, glyphs: &[char], start: GridCoord, orientation: Orientation) {
        for (cell_idx, &glyph) in glyphs.iter().enumerate() {
            let (row, col) = match orientation {
                Orientation::Horizontal => (start.0, start.1 + cell_idx),
                Orientation::Vertical => (start.0 + cell_idx, start.1),
            };

            self.cells[row * self.size + col] = Some(glyph);
        }
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("filled_cells", &self.filled_cells())
            .finish()
    }
}

/// Serialized as rows of one-letter strings, with `""` for empty cells.
impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows().map(|row| {
            row.iter()
                .map(|cell| cell.map(String::from).unwrap_or_default())
                .collect::<Vec<String>>()
        }))
    }
}

/// One numbered entry in a clue list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clue {
    pub sequence_number: usize,
    pub row: usize,
    pub col: usize,
    pub hint: String,
    pub text: String,
}

/// Horizontal and vertical clues, each in the order the grid is read: top to bottom, then left to
/// right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClueList {
    pub horizontal: Vec<Clue>,
    pub vertical: Vec<Clue>,
}

impl ClueList {
    pub fn from_placed_words(placed_words: &[PlacedWord]) -> ClueList {
        let clues_for = |orientation: Orientation| -> Vec<Clue> {
            let mut clues: Vec<Clue> = placed_words.iter()
                .filter(|word| word.orientation == orientation)
                .map(|word| Clue {
                    sequence_number: word.sequence_number,
                    row: word.row,
                    col: word.col,
                    hint: word.hint.clone(),
                    text: word.text.clone(),
                })
                .collect();

            clues.sort_by_key(|clue| (clue.row, clue.col));
            clues
        };

        ClueList {
            horizontal: clues_for(Orientation::Horizontal),
            vertical: clues_for(Orientation::Vertical),
        }
    }
}

/// Settings for a single call to `place_words_with_config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub grid_size: usize,

    /// Stop once this many words are in the grid, even if candidates remain.
    pub max_placements: usize,
}

impl Default for PlacementConfig {
    fn default() -> PlacementConfig {
        PlacementConfig { grid_size: DEFAULT_GRID_SIZE, max_placements: usize::MAX }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> Result<(), PlacementError> {
        if !(1..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(PlacementError::InvalidGridSize(self.grid_size));
        }
        if self.max_placements == 0 {
            return Err(PlacementError::InvalidMaxPlacements(self.max_placements));
        }
        Ok(())
    }
}

/// A struct tracking statistics about the placement process.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlacementStatistics {
    pub candidates_tried: usize,
    pub crossing_placements: usize,
    pub standalone_placements: usize,
    pub flipped: usize,
    pub skipped: usize,
    pub duration: Duration,
}

/// The outcome of a placement run.
#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub grid: Grid,
    pub placed_words: Vec<PlacedWord>,
    pub clues: ClueList,

    /// Indices into the candidate slice of the words that are not in the grid, in input order.
    pub unplaced: Vec<usize>,

    pub statistics: PlacementStatistics,
}

/// A position for a word, worked out without touching the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Proposal {
    start: GridCoord,
    orientation: Orientation,
    intersections: usize,
}

/// The first word anchors the layout: horizontal, on the middle row, centred across it.
fn propose_anchor(grid: &Grid, glyphs: &[char]) -> Option<Proposal> {
    let size = grid.size();
    let start = (size / 2, size.saturating_sub(glyphs.len()) / 2);

    grid.check_placement(
        glyphs,
        (start.0 as isize, start.1 as isize),
        Orientation::Horizontal,
        PlacementMode::Standalone,
    ).map(|intersections| Proposal { start, orientation: Orientation::Horizontal, intersections })
}

/// Collect every legal position where `glyphs`, running in `orientation`, shares a letter with an
/// already-placed word running the other way. Proposals come out in discovery order.
fn propose_crossings(
    grid: &Grid,
    glyphs: &[char],
    orientation: Orientation,
    placed_words: &[PlacedWord],
) -> SmallVec<[Proposal; MAX_PROPOSAL_COUNT]> {
    let (row_step, col_step) = orientation.step();
    let mut proposals: SmallVec<[Proposal; MAX_PROPOSAL_COUNT]> = smallvec![];

    for placed_word in placed_words {
        if placed_word.orientation == orientation {
            continue;
        }

        let (placed_row_step, placed_col_step) = placed_word.orientation.step();

        for (word_idx, &glyph) in glyphs.iter().enumerate() {
            for (placed_idx, placed_glyph) in placed_word.text.chars().enumerate() {
                if glyph != placed_glyph {
                    continue;
                }

                // Line the shared letter of the new word up with the placed one.
                let shared_row = placed_word.row as isize + placed_row_step * placed_idx as isize;
                let shared_col = placed_word.col as isize + placed_col_step * placed_idx as isize;
                let start = (
                    shared_row - row_step * word_idx as isize,
                    shared_col - col_step * word_idx as isize,
                );

                if let Some(intersections) =
                    grid.check_placement(glyphs, start, orientation, PlacementMode::Crossing)
                {
                    proposals.push(Proposal {
                        start: (start.0 as usize, start.1 as usize),
                        orientation,
                        intersections,
                    });
                }
            }
        }
    }

    proposals
}

/// Pick the crossing position with the most shared letters. The sort is stable, so among equally
/// good positions the first one found wins.
fn best_crossing(
    grid: &Grid,
    glyphs: &[char],
    orientation: Orientation,
    placed_words: &[PlacedWord],
) -> Option<Proposal> {
    let mut proposals = propose_crossings(grid, glyphs, orientation, placed_words);
    proposals.sort_by_key(|proposal| Reverse(proposal.intersections));
    proposals.first().copied()
}

/// Find an empty stretch of grid for a word that crosses nothing, as close as possible to the
/// centre. Positions in the preferred orientation are scanned first, so they win ties.
fn best_standalone(grid: &Grid, glyphs: &[char], preferred: Orientation) -> Option<Proposal> {
    let size = grid.size();
    let mut best: Option<(usize, Proposal)> = None;

    for orientation in [preferred, preferred.flipped()] {
        for row in 0..size {
            for col in 0..size {
                if {
                    grid.check_placement(
                        glyphs,
                        (row as isize, col as isize),
                        orientation,
                        PlacementMode::Standalone,
                    ).is_none()
                } {
                    continue;
                }

                // Manhattan distance to (size / 2, size / 2), doubled to stay in integers.
                let distance = (2 * row).abs_diff(size) + (2 * col).abs_diff(size);

                if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                    best = Some((distance, Proposal { start: (row, col), orientation, intersections: 0 }));
                }
            }
        }
    }

    best.map(|(_, proposal)| proposal)
}

/// Try, in order: crossing in the preferred orientation, crossing in the other orientation, and
/// standing alone in whichever orientation fits closest to the centre.
fn find_proposal(
    grid: &Grid,
    glyphs: &[char],
    preferred: Orientation,
    placed_words: &[PlacedWord],
) -> Option<Proposal> {
    best_crossing(grid, glyphs, preferred, placed_words)
        .or_else(|| best_crossing(grid, glyphs, preferred.flipped(), placed_words))
        .or_else(|| best_standalone(grid, glyphs, preferred))
}

/// Place as many candidates as possible into a `grid_size` square grid, stopping after
/// `max_placements` words.
pub fn place_words(
    candidates: &[WordCandidate],
    grid_size: usize,
    max_placements: usize,
) -> Result<Placement, PlacementError> {
    place_words_with_config(candidates, &PlacementConfig { grid_size, max_placements })
}

/// Place candidates into a fresh grid according to `config`.
///
/// Candidates are tried longest first (ties keep input order). Words that are empty, longer than
/// the grid, or simply have nowhere to go are left out; that is reported through
/// `Placement::unplaced` rather than as an error.
pub fn place_words_with_config(
    candidates: &[WordCandidate],
    config: &PlacementConfig,
) -> Result<Placement, PlacementError> {
    config.validate()?;
    if candidates.is_empty() {
        return Err(PlacementError::EmptyCandidateList);
    }

    let start = Instant::now();

    let mut statistics = PlacementStatistics::default();
    let mut grid = Grid::new(config.grid_size);
    let mut placed_words: Vec<PlacedWord> = Vec::with_capacity(candidates.len());
    let mut placed_candidate_ids = BitSet::with_capacity(candidates.len());

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by_key(|&candidate_id| Reverse(candidates[candidate_id].len()));

    for candidate_id in order {
        if placed_words.len() >= config.max_placements {
            debug!("Reached {} placements, not trying the remaining words", config.max_placements);
            break;
        }

        let candidate = &candidates[candidate_id];
        let glyphs = candidate.glyphs();
        statistics.candidates_tried += 1;

        if glyphs.is_empty() || glyphs.len() > grid.size() {
            warn!("Skipping {:?}: length {} does not fit a {}x{} grid",
                candidate.text, glyphs.len(), grid.size(), grid.size());
            statistics.skipped += 1;
            continue;
        }

        let proposal = if placed_words.is_empty() {
            propose_anchor(&grid, &glyphs)
        } else {
            find_proposal(&grid, &glyphs, candidate.orientation, &placed_words)
        };

        let Some(proposal) = proposal else {
            warn!("No room for {:?}, skipping it", candidate.text);
            statistics.skipped += 1;
            continue;
        };

        grid.write_word(&glyphs, proposal.start, proposal.orientation);

        let flipped = proposal.orientation != candidate.orientation;
        if flipped {
            statistics.flipped += 1;
        }
        if proposal.intersections > 0 {
            statistics.crossing_placements += 1;
        } else {
            statistics.standalone_placements += 1;
        }

        debug!(
            "Placed {:?} {:?} at ({}, {}) with {} intersection(s){}",
            candidate.text,
            proposal.orientation,
            proposal.start.0,
            proposal.start.1,
            proposal.intersections,
            if flipped { ", flipped" } else { "" },
        );

        placed_words.push(PlacedWord {
            text: candidate.text.clone(),
            hint: candidate.hint.clone(),
            row: proposal.start.0,
            col: proposal.start.1,
            orientation: proposal.orientation,
            sequence_number: placed_words.len() + 1,
            intersections: proposal.intersections,
            flipped,
        });
        placed_candidate_ids.insert(candidate_id);
    }

    let unplaced: Vec<usize> = (0..candidates.len())
        .filter(|&candidate_id| !placed_candidate_ids.contains(candidate_id))
        .collect();
    let clues = ClueList::from_placed_words(&placed_words);

    statistics.duration = start.elapsed();

    info!(
        "Placed {}/{} words ({} crossing, {} standalone) in {:?}",
        placed_words.len(),
        candidates.len(),
        statistics.crossing_placements,
        statistics.standalone_placements,
        statistics.duration,
    );

    Ok(Placement { grid, placed_words, clues, unplaced, statistics })
}

/// Turn the given grid into a rendered string, with `.` for empty cells.
pub fn render_grid(grid: &Grid) -> String {
    grid.rows()
        .map(|row| row.iter().map(|cell| cell.unwrap_or('.')).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn the given clue lists into a rendered string, one numbered clue per line.
pub fn render_clues(clues: &ClueList) -> String {
    let mut lines: Vec<String> = vec![];

    for (heading, section) in [("Horizontal", &clues.horizontal), ("Vertical", &clues.vertical)] {
        lines.push(heading.to_string());
        for clue in section {
            lines.push(format!(
                "  {}. {} ({})",
                clue.sequence_number,
                clue.hint,
                clue.text.chars().count(),
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use crate::{
        best_crossing, best_standalone, find_proposal, place_words, propose_crossings,
        render_clues, render_grid, ClueList, Grid, Orientation, PlacedWord, PlacementConfig,
        PlacementError, PlacementMode, WordCandidate, MAX_GRID_SIZE,
    };
    use crate::Orientation::{Horizontal, Vertical};

    fn glyphs(word: &str) -> Vec<char> {
        word.chars().collect()
    }

    fn candidate(text: &str, orientation: Orientation) -> WordCandidate {
        WordCandidate::new(text, format!("hint for {}", text.to_lowercase()), orientation)
    }

    fn placed(text: &str, row: usize, col: usize, orientation: Orientation, sequence_number: usize) -> PlacedWord {
        PlacedWord {
            text: text.to_string(),
            hint: String::new(),
            row,
            col,
            orientation,
            sequence_number,
            intersections: 0,
            flipped: false,
        }
    }

    /// ..........
    /// ..........
    /// ..........
    /// ..........
    /// ..........
    /// ..GHOST...
    /// ..........
    fn grid_with_ghost() -> (Grid, Vec<PlacedWord>) {
        let mut grid = Grid::new(10);
        grid.write_word(&glyphs("GHOST"), (5, 2), Horizontal);
        (grid, vec![placed("GHOST", 5, 2, Horizontal, 1)])
    }

    /// ..........
    /// ..........
    /// ...XAX....
    /// ..........
    /// ...XCX....
    /// ..........
    /// ..........
    /// BQ........
    /// ..........
    fn grid_with_bars() -> (Grid, Vec<PlacedWord>) {
        let mut grid = Grid::new(10);
        let placed_words = vec![
            placed("BQ", 7, 0, Horizontal, 1),
            placed("XAX", 2, 3, Horizontal, 2),
            placed("XCX", 4, 3, Horizontal, 3),
        ];
        for word in &placed_words {
            grid.write_word(&glyphs(&word.text), (word.row, word.col), word.orientation);
        }
        (grid, placed_words)
    }

    #[test]
    fn test_check_placement_rejects_out_of_bounds() {
        let grid = Grid::new(10);

        assert_eq!(grid.check_placement(&glyphs("SUN"), (0, 7), Horizontal, PlacementMode::Crossing), Some(0));
        assert_eq!(grid.check_placement(&glyphs("SUN"), (0, 8), Horizontal, PlacementMode::Crossing), None);
        assert_eq!(grid.check_placement(&glyphs("SUN"), (8, 0), Vertical, PlacementMode::Crossing), None);
        assert_eq!(grid.check_placement(&glyphs("SUN"), (-1, 0), Vertical, PlacementMode::Crossing), None);
        assert_eq!(grid.check_placement(&glyphs("SUN"), (0, -1), Horizontal, PlacementMode::Crossing), None);
    }

    #[test]
    fn test_check_placement_counts_intersections() {
        let (grid, _) = grid_with_ghost();

        // HOST down through the H of GHOST.
        assert_eq!(grid.check_placement(&glyphs("HOST"), (5, 3), Vertical, PlacementMode::Crossing), Some(1));
        assert_eq!(grid.check_placement(&glyphs("HOST"), (5, 3), Vertical, PlacementMode::Standalone), None);
    }

    #[test]
    fn test_check_placement_rejects_conflicting_letter() {
        let (grid, _) = grid_with_ghost();

        assert_eq!(grid.check_placement(&glyphs("CAT"), (4, 3), Vertical, PlacementMode::Crossing), None);
    }

    #[test]
    fn test_check_placement_rejects_parallel_neighbours() {
        let (grid, _) = grid_with_ghost();

        // Directly above GHOST, and directly below it.
        assert_eq!(grid.check_placement(&glyphs("ABC"), (4, 3), Horizontal, PlacementMode::Crossing), None);
        assert_eq!(grid.check_placement(&glyphs("ABC"), (6, 0), Horizontal, PlacementMode::Crossing), None);
        // Diagonal contact is fine.
        assert_eq!(grid.check_placement(&glyphs("ABC"), (6, 7), Horizontal, PlacementMode::Crossing), Some(0));
    }

    #[test]
    fn test_check_placement_rejects_collinear_contact() {
        let (grid, _) = grid_with_ghost();

        // Would read GHOSTAB along row 5.
        assert_eq!(grid.check_placement(&glyphs("AB"), (5, 7), Horizontal, PlacementMode::Crossing), None);
        // Would read ABGHOST.
        assert_eq!(grid.check_placement(&glyphs("AB"), (5, 0), Horizontal, PlacementMode::Crossing), None);
        // Leaves one empty cell of margin.
        assert_eq!(grid.check_placement(&glyphs("AB"), (5, 8), Horizontal, PlacementMode::Crossing), Some(0));
        // Vertical word ending right above the G.
        assert_eq!(grid.check_placement(&glyphs("AB"), (3, 2), Vertical, PlacementMode::Crossing), None);
    }

    #[test]
    fn test_check_placement_rejects_word_already_in_grid() {
        let (grid, _) = grid_with_ghost();

        assert_eq!(grid.check_placement(&glyphs("GHOST"), (5, 2), Horizontal, PlacementMode::Crossing), None);
    }

    #[test]
    fn test_propose_crossings_in_discovery_order() {
        let (grid, placed) = grid_with_ghost();

        let proposals = propose_crossings(&grid, &glyphs("HOST"), Vertical, &placed);
        let starts: Vec<_> = proposals.iter().map(|proposal| proposal.start).collect();

        assert_eq!(starts, vec![(5, 3), (4, 4), (3, 5), (2, 6)]);
        assert!(proposals.iter().all(|proposal| proposal.intersections == 1));

        // Nothing to cross when running the same way as every placed word.
        assert!(propose_crossings(&grid, &glyphs("HOST"), Horizontal, &placed).is_empty());
    }

    #[test]
    fn test_best_crossing_prefers_most_intersections() {
        let (grid, placed) = grid_with_bars();

        // ABC can hang from the B of BQ, or run down column 4 through both the A and the C.
        let proposals = propose_crossings(&grid, &glyphs("ABC"), Vertical, &placed);
        let found: Vec<_> = proposals.iter().map(|proposal| (proposal.start, proposal.intersections)).collect();
        assert_eq!(found, vec![((6, 0), 1), ((2, 4), 2), ((2, 4), 2)]);

        let best = best_crossing(&grid, &glyphs("ABC"), Vertical, &placed).expect("ABC crosses the bars");
        assert_eq!(best.start, (2, 4));
        assert_eq!(best.intersections, 2);
    }

    #[test]
    fn test_find_proposal_flips_when_needed() {
        let (grid, placed) = grid_with_ghost();

        let proposal = find_proposal(&grid, &glyphs("HOST"), Horizontal, &placed)
            .expect("HOST should cross GHOST");

        assert_eq!(proposal.orientation, Vertical);
        assert_eq!(proposal.start, (5, 3));
    }

    #[test]
    fn test_best_standalone_prefers_centre() {
        let grid = Grid::new(10);

        let proposal = best_standalone(&grid, &glyphs("AB"), Vertical).expect("empty grid has room");

        assert_eq!(proposal.start, (5, 5));
        assert_eq!(proposal.orientation, Vertical);
        assert_eq!(proposal.intersections, 0);
    }

    #[test]
    fn test_best_standalone_falls_back_to_other_orientation() {
        // A 3x3 grid with the middle row taken has no room for a horizontal 3-letter word, but
        // the same is true vertically, so nothing fits.
        let mut grid = Grid::new(3);
        grid.write_word(&glyphs("ABC"), (1, 0), Horizontal);
        assert_eq!(best_standalone(&grid, &glyphs("XYZ"), Horizontal), None);

        // In a 5x5 grid with a word along the top row, the only 5-letter runs are the bottom
        // rows and none of the columns, so a vertical preference still ends up horizontal.
        let mut grid = Grid::new(5);
        grid.write_word(&glyphs("ABCDE"), (0, 0), Horizontal);
        let proposal = best_standalone(&grid, &glyphs("VWXYZ"), Vertical).expect("bottom rows are free");
        assert_eq!(proposal.orientation, Horizontal);
        assert_eq!(proposal.start, (2, 0));
    }

    #[test]
    fn test_place_words_rejects_bad_input() {
        let candidates = vec![candidate("SUN", Horizontal)];

        assert_eq!(place_words(&[], 10, 5).unwrap_err(), PlacementError::EmptyCandidateList);
        assert_eq!(place_words(&candidates, 0, 5).unwrap_err(), PlacementError::InvalidGridSize(0));
        assert_eq!(
            place_words(&candidates, MAX_GRID_SIZE + 1, 5).unwrap_err(),
            PlacementError::InvalidGridSize(MAX_GRID_SIZE + 1),
        );
        assert_eq!(
            place_words(&candidates, 1 << 32, 5).unwrap_err(),
            PlacementError::InvalidGridSize(1 << 32),
        );
        assert_eq!(
            place_words(&candidates, usize::MAX, 5).unwrap_err(),
            PlacementError::InvalidGridSize(usize::MAX),
        );
        assert_eq!(place_words(&candidates, 10, 0).unwrap_err(), PlacementError::InvalidMaxPlacements(0));
    }

    #[test]
    fn test_default_config() {
        let config = PlacementConfig::default();

        assert_eq!(config.grid_size, 10);
        assert_eq!(config.max_placements, usize::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_anchor_is_centered() {
        let result = place_words(&[candidate("GHOST", Vertical)], 10, 1).expect("valid input");
        let anchor = &result.placed_words[0];

        assert_eq!((anchor.row, anchor.col, anchor.orientation), (5, 2, Horizontal));
        assert!(anchor.flipped);
        assert_eq!(result.statistics.standalone_placements, 1);
    }

    #[test]
    fn test_statistics() {
        let result = place_words(
            &[
                candidate("GHOST", Horizontal),
                candidate("HOST", Horizontal),
                candidate("ABCDEFGHIJK", Horizontal),
            ],
            10,
            10,
        ).expect("valid input");

        assert_eq!(result.statistics.candidates_tried, 3);
        assert_eq!(result.statistics.crossing_placements, 1);
        assert_eq!(result.statistics.standalone_placements, 1);
        assert_eq!(result.statistics.flipped, 1);
        assert_eq!(result.statistics.skipped, 1);
        assert_eq!(result.unplaced, vec![2]);
    }

    #[test]
    fn test_render_grid_and_clues() {
        let result = place_words(
            &[candidate("GHOST", Horizontal), candidate("HOST", Vertical)],
            6,
            2,
        ).expect("valid input");

        // GHOST fills row 3 from column 0. HOST cannot hang from the H (it would run off the
        // bottom), so it crosses at the O instead.
        assert_eq!((result.placed_words[1].row, result.placed_words[1].col), (2, 2));
        assert_eq!(render_grid(&result.grid).lines().count(), 6);
        assert!(render_grid(&result.grid).lines().nth(3).unwrap().starts_with("GHOST"));

        let clues = render_clues(&result.clues);
        assert!(clues.starts_with("Horizontal\n  1. hint for ghost (5)"));
        assert!(clues.contains("Vertical\n  2. hint for host (4)"));
    }

    #[test]
    fn test_clue_list_sorted_by_position_not_number() {
        let word = |text: &str, row, col, sequence_number| placed(text, row, col, Horizontal, sequence_number);

        let clues = ClueList::from_placed_words(&[
            word("CCC", 5, 0, 1),
            word("AAA", 1, 6, 2),
            word("BBB", 1, 2, 3),
        ]);

        let numbers: Vec<_> = clues.horizontal.iter().map(|clue| clue.sequence_number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
        assert!(clues.vertical.is_empty());
    }

    #[test]
    fn test_grid_serializes_as_rows_of_strings() {
        let mut grid = Grid::new(2);
        grid.write_word(&glyphs("AB"), (0, 0), Horizontal);

        let json = serde_json::to_string(&grid).expect("grid serializes");
        assert_eq!(json, r#"[["A","B"],["",""]]"#);
    }
}

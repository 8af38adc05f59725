//! Board features: named measurements combined by the heuristic evaluator.
//!
//! Features form an open, ordered list. Each feature reads one value from a
//! [`BoardAnalysis`] and declares whether a larger value is good
//! ([`FeatureSignal::Positive`]) or bad ([`FeatureSignal::Negative`]). The position of a
//! feature in the list is the index of its weight in the
//! [`WeightVector`](crate::heuristic::WeightVector).
//!
//! The default list, in weight order:
//!
//! | # | feature | signal |
//! |---|---|---|
//! | 0 | [`NumHoles`] | negative |
//! | 1 | [`FilledCells`] | negative |
//! | 2 | [`GreatestHeight`] | negative |
//! | 3 | [`Bumpiness`] | negative |
//! | 4 | [`LinesCleared`] | positive |
//! | 5 | [`WellPenalty`] | negative |
//! | 6 | [`TetrisPotential`] | positive |
//!
//! [`EmptyPillars`] and [`SixThreeStack`] are not part of the default list but can be
//! appended to a custom one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board_analysis::BoardAnalysis;

#[must_use]
pub fn default_board_features() -> Vec<BoxedBoardFeature> {
    vec![
        Box::new(NumHoles),
        Box::new(FilledCells),
        Box::new(GreatestHeight),
        Box::new(Bumpiness),
        Box::new(LinesCleared),
        Box::new(WellPenalty),
        Box::new(TetrisPotential),
    ]
}

/// The default features followed by the optional ones.
#[must_use]
pub fn all_board_features() -> Vec<BoxedBoardFeature> {
    let mut features = default_board_features();
    features.push(Box::new(EmptyPillars));
    features.push(Box::new(SixThreeStack));
    features
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSignal {
    Positive,
    Negative,
}

impl FeatureSignal {
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            FeatureSignal::Positive => 1.0,
            FeatureSignal::Negative => -1.0,
        }
    }
}

pub trait BoardFeature: fmt::Debug + Send + Sync {
    #[must_use]
    fn id(&self) -> &str;
    #[must_use]
    fn name(&self) -> &str;
    #[must_use]
    fn signal(&self) -> FeatureSignal;
    #[must_use]
    fn clone_boxed(&self) -> BoxedBoardFeature;
    #[must_use]
    fn extract(&self, analysis: &BoardAnalysis) -> f64;
}

pub type BoxedBoardFeature = Box<dyn BoardFeature>;

impl Clone for BoxedBoardFeature {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl BoardFeature for BoxedBoardFeature {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn signal(&self) -> FeatureSignal {
        self.as_ref().signal()
    }

    fn clone_boxed(&self) -> BoxedBoardFeature {
        self.as_ref().clone_boxed()
    }

    fn extract(&self, analysis: &BoardAnalysis) -> f64 {
        self.as_ref().extract(analysis)
    }
}

macro_rules! count_feature {
    ($(#[$meta:meta])* $ty:ident, $id:literal, $name:literal, $signal:ident, $method:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $ty;

        impl BoardFeature for $ty {
            fn id(&self) -> &'static str {
                $id
            }
            fn name(&self) -> &'static str {
                $name
            }
            fn signal(&self) -> FeatureSignal {
                FeatureSignal::$signal
            }
            fn clone_boxed(&self) -> BoxedBoardFeature {
                Box::new(self.clone())
            }
            #[expect(clippy::cast_precision_loss)]
            fn extract(&self, analysis: &BoardAnalysis) -> f64 {
                analysis.$method() as f64
            }
        }
    };
}

count_feature!(
    /// Empty cells whose immediate upper neighbour is filled.
    ///
    /// Only the cell directly below a filled cell counts; an empty cell further down
    /// the same gap does not.
    NumHoles,
    "num_holes",
    "Number of Holes",
    Negative,
    holes
);

count_feature!(
    /// Number of settled cells on the board.
    FilledCells,
    "filled_cells",
    "Filled Cells",
    Negative,
    filled_count
);

count_feature!(
    /// Height of the tallest column.
    GreatestHeight,
    "greatest_height",
    "Greatest Height",
    Negative,
    greatest_height
);

count_feature!(
    /// Sum of absolute height differences between adjacent columns.
    Bumpiness,
    "bumpiness",
    "Bumpiness",
    Negative,
    bumpiness
);

count_feature!(
    /// Rows that are completely filled after the placement.
    LinesCleared,
    "lines_cleared",
    "Lines Cleared",
    Positive,
    lines_cleared
);

count_feature!(
    /// `1` when some adjacent column pair differs in height by more than four.
    WellPenalty,
    "well_penalty",
    "Well Penalty",
    Negative,
    well_penalty
);

count_feature!(
    /// Ten points per row missing exactly one cell.
    TetrisPotential,
    "tetris_potential",
    "Tetris Potential",
    Positive,
    tetris_potential
);

count_feature!(
    /// Columns that contain no filled cell.
    EmptyPillars,
    "empty_pillars",
    "Empty Pillars",
    Negative,
    empty_columns
);

count_feature!(
    /// Filled cells in column 6, counted positively in incomplete rows and negatively
    /// in full rows.
    SixThreeStack,
    "six_three_stack",
    "Six-Three Stack",
    Negative,
    six_three_stack
);

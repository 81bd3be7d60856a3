//! Separation scores of labelled groups and their ranking.
//!
//! For a group with intra-group average distance `a` and average distance `b`
//! from its members to all other points, the separation ratio is
//! `(b - a) / max(a, b)`. It approaches `+1` for a tight group that is far from
//! everything else, `-1` for a diffuse group, and sits near `0` when members
//! are as close to outsiders as to each other.

use distances::Number;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    groups::check_members,
    kernel::{average_distance, par_average_distance},
    EvalError, GroupIndex, IndexSet, PointMatrix,
};

/// The separation of one labelled group from the rest of the points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparationScore {
    /// The label of the group.
    pub label: String,
    /// The number of points in the group.
    pub members: usize,
    /// The number of points outside the group.
    pub complement: usize,
    /// The average distance between distinct members.
    pub intra: f64,
    /// The average distance from members to non-members.
    pub inter: f64,
    /// The separation ratio, `(inter - intra) / max(intra, inter)`.
    pub ratio: f64,
}

impl SeparationScore {
    /// The reported score: the ratio scaled by 100 and truncated toward zero.
    #[must_use]
    pub fn score(&self) -> i32 {
        (self.ratio * 100.0).as_i32()
    }
}

/// Why a group was not scored.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The group has the empty label, which is never scored.
    EmptyLabel,
    /// The group is degenerate.
    Failed(EvalError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLabel => write!(f, "empty label"),
            Self::Failed(e) => write!(f, "{}: {e}", e.kind()),
        }
    }
}

/// A group that was not scored, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedGroup {
    /// The label of the group.
    pub label: String,
    /// The reason it was skipped.
    pub reason: SkipReason,
}

/// The outcome of scoring every group in a `GroupIndex`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeparationReport {
    /// The scored groups, by descending reported score. Groups with equal
    /// reported scores keep the order in which their labels were first seen.
    pub ranked: Vec<SeparationScore>,
    /// The skipped groups, in the order in which their labels were first seen.
    pub skipped: Vec<SkippedGroup>,
}

impl SeparationReport {
    /// Splits outcomes, given in label encounter order, into ranked scores and
    /// skipped groups.
    fn from_outcomes(outcomes: Vec<Result<SeparationScore, SkippedGroup>>) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                Ok(score) => report.ranked.push(score),
                Err(skipped) => report.skipped.push(skipped),
            }
        }
        // `sort_by_key` is stable.
        report.ranked.sort_by_key(|s| core::cmp::Reverse(s.score()));
        report
    }

    /// The score of the group with `label`, if it was scored.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&SeparationScore> {
        self.ranked.iter().find(|s| s.label == label)
    }
}

/// The separation ratio for intra-group distance `a` and inter-group distance
/// `b`, or `None` if both are zero.
#[must_use]
pub fn separation_ratio(a: f64, b: f64) -> Option<f64> {
    let m = a.max(b);
    if m > 0.0 {
        Some((b - a) / m)
    } else {
        None
    }
}

/// Checks that a group can be scored against `n` points.
fn check_group(label: &str, members: &IndexSet, n: usize) -> Result<(), EvalError> {
    check_members(label, members, n)?;
    let complement = members.complement_len(n);
    if members.len() < 2 || complement == 0 {
        return Err(EvalError::InsufficientGroupSize {
            label: label.to_string(),
            members: members.len(),
            complement,
        });
    }
    Ok(())
}

/// Builds the score record from the two average distances.
fn make_score(label: &str, members: usize, complement: usize, a: f64, b: f64) -> Result<SeparationScore, EvalError> {
    let ratio = separation_ratio(a, b).ok_or_else(|| EvalError::Indistinguishable {
        label: label.to_string(),
    })?;
    Ok(SeparationScore {
        label: label.to_string(),
        members,
        complement,
        intra: a,
        inter: b,
        ratio,
    })
}

/// Scores one group against all the other points.
///
/// # Errors
///
/// * `IndexOutOfBounds` if a member is not a row of `points`.
/// * `InsufficientGroupSize` if the group has fewer than two members or no
///   points lie outside it.
/// * `Indistinguishable` if every point in the matrix is identical.
pub fn score_group<T: Number>(
    points: &PointMatrix<T>,
    label: &str,
    members: &IndexSet,
) -> Result<SeparationScore, EvalError> {
    let n = points.cardinality();
    check_group(label, members, n)?;

    let inside = points.rows_at(members);
    let outside = points.rows_except(members);
    let a = average_distance(&inside, None)?;
    let b = average_distance(&inside, Some(&outside))?;
    make_score(label, inside.len(), outside.len(), a, b)
}

/// Parallelized version of [`score_group`].
///
/// # Errors
///
/// See [`score_group`].
pub fn par_score_group<T: Number>(
    points: &PointMatrix<T>,
    label: &str,
    members: &IndexSet,
) -> Result<SeparationScore, EvalError> {
    let n = points.cardinality();
    check_group(label, members, n)?;

    let inside = points.rows_at(members);
    let outside = points.rows_except(members);
    let (a, b) = rayon::join(
        || par_average_distance(&inside, None),
        || par_average_distance(&inside, Some(&outside)),
    );
    make_score(label, inside.len(), outside.len(), a?, b?)
}

/// Applies the skipping policy around a scoring function.
fn outcome<F>(label: &str, score: F) -> Result<SeparationScore, SkippedGroup>
where
    F: FnOnce() -> Result<SeparationScore, EvalError>,
{
    if label.is_empty() {
        ftlog::debug!("Skipping the group with the empty label");
        return Err(SkippedGroup {
            label: String::new(),
            reason: SkipReason::EmptyLabel,
        });
    }
    match score() {
        Ok(s) => {
            ftlog::debug!(
                "Scored {label:?}: intra {:.6}, inter {:.6}, ratio {:.6}",
                s.intra,
                s.inter,
                s.ratio
            );
            Ok(s)
        }
        Err(e) => {
            ftlog::warn!("Skipping group {label:?}: {e}");
            Err(SkippedGroup {
                label: label.to_string(),
                reason: SkipReason::Failed(e),
            })
        }
    }
}

/// Scores every group with a non-empty label and ranks them by descending
/// reported score.
///
/// A degenerate group is skipped with its reason; it does not stop the other
/// groups from being scored.
pub fn score_groups<T: Number>(points: &PointMatrix<T>, groups: &GroupIndex) -> SeparationReport {
    ftlog::info!(
        "Scoring {} groups over {} points in {} dimensions",
        groups.len(),
        points.cardinality(),
        points.dimensionality()
    );
    let outcomes = groups
        .iter()
        .map(|(label, members)| outcome(label, || score_group(points, label, members)))
        .collect();
    SeparationReport::from_outcomes(outcomes)
}

/// Parallelized version of [`score_groups`].
///
/// Groups are scored concurrently. The outcomes are collected in label order
/// before ranking, so the report is the same as the sequential one.
pub fn par_score_groups<T: Number>(points: &PointMatrix<T>, groups: &GroupIndex) -> SeparationReport {
    ftlog::info!(
        "Scoring {} groups over {} points in {} dimensions, in parallel",
        groups.len(),
        points.cardinality(),
        points.dimensionality()
    );
    let groups = groups.iter().collect::<Vec<_>>();
    let outcomes = groups
        .par_iter()
        .map(|&(label, members)| outcome(label, || par_score_group(points, label, members)))
        .collect();
    SeparationReport::from_outcomes(outcomes)
}

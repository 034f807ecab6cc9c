//! Name resolution against the server's project tables.
//!
//! Candidate names are matched case-insensitively (simple lower-casing, no
//! other normalisation) and every candidate is classified independently, so
//! duplicate names in the input resolve twice.
//!
//! - **Standard store**: the category tables are searched in
//!   [`ProjectCategory::SEARCH_ORDER`] and the first hit wins.
//! - **Archive store**: every snapshot with a matching name is a target,
//!   unless keep-latest is on and the snapshot is the newest of its
//!   `version_id` group.

use std::collections::HashMap;

use crate::types::{
    ArchivedProjectRecord, MatchReport, ProjectCategory, ProjectRecord, ResolvedDeletionTarget,
};

/// Standard-store project tables keyed by category.
#[derive(Debug, Clone, Default)]
pub struct StandardTables {
    tables: HashMap<ProjectCategory, Vec<ProjectRecord>>,
}

impl StandardTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows held for `category`.
    pub fn insert(&mut self, category: ProjectCategory, rows: Vec<ProjectRecord>) {
        self.tables.insert(category, rows);
    }

    pub fn rows(&self, category: ProjectCategory) -> &[ProjectRecord] {
        self.tables.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of rows across all categories.
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, lowered: &str) -> Option<&ProjectRecord> {
        ProjectCategory::SEARCH_ORDER.iter().find_map(|category| {
            self.rows(*category)
                .iter()
                .find(|row| row.name.to_lowercase() == lowered)
        })
    }
}

/// Whether a candidate name matched anything on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameOutcome {
    pub candidate: String,
    pub found: bool,
}

/// Result of resolving a full candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Targets in input order.
    pub targets: Vec<ResolvedDeletionTarget>,
    /// One entry per candidate, in input order.
    pub outcomes: Vec<NameOutcome>,
    pub report: MatchReport,
}

/// Resolve candidates against the standard-store tables.
pub fn resolve_standard(candidates: &[String], tables: &StandardTables) -> Resolution {
    let mut resolution = Resolution {
        report: MatchReport {
            table_size: tables.len(),
            ..Default::default()
        },
        ..Default::default()
    };

    for candidate in candidates {
        resolution.report.input_lines += 1;

        let found = match tables.find(&candidate.to_lowercase()) {
            Some(row) => {
                resolution.targets.push(ResolvedDeletionTarget {
                    name: row.name.clone(),
                    project_id: row.project_id,
                    version_id: None,
                });
                true
            }
            None => {
                resolution.report.not_found += 1;
                false
            }
        };

        resolution.outcomes.push(NameOutcome {
            candidate: candidate.clone(),
            found,
        });
    }

    resolution
}

/// Resolve candidates against the archive table.
///
/// With `keep_latest`, each matching snapshot is checked on its own: it is a
/// target only when another snapshot sharing its `version_id` is strictly
/// newer. A candidate whose matches are all kept still counts as found.
pub fn resolve_archived(
    candidates: &[String],
    archive: &[ArchivedProjectRecord],
    keep_latest: bool,
) -> Resolution {
    let mut resolution = Resolution {
        report: MatchReport {
            table_size: archive.len(),
            ..Default::default()
        },
        ..Default::default()
    };

    for candidate in candidates {
        resolution.report.input_lines += 1;
        let lowered = candidate.to_lowercase();
        let mut found = false;

        for row in archive.iter().filter(|row| row.name.to_lowercase() == lowered) {
            found = true;

            if keep_latest && is_latest_in_group(row, archive) {
                resolution.report.kept_latest += 1;
                continue;
            }

            resolution.targets.push(ResolvedDeletionTarget {
                name: row.name.clone(),
                project_id: row.project_id,
                version_id: Some(row.version_id),
            });
        }

        if !found {
            resolution.report.not_found += 1;
        }

        resolution.outcomes.push(NameOutcome {
            candidate: candidate.clone(),
            found,
        });
    }

    resolution
}

/// True when no snapshot in `row`'s `version_id` group is strictly newer.
fn is_latest_in_group(row: &ArchivedProjectRecord, archive: &[ArchivedProjectRecord]) -> bool {
    !archive
        .iter()
        .any(|other| other.version_id == row.version_id && other.version_date > row.version_date)
}

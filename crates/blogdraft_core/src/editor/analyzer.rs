//! Structure analyzer.
//!
//! # Responsibility
//! - Derive read-only diagnostics over one `(containers, paragraphs)`
//!   snapshot: per-container counts, empty containers and issue flags.
//!
//! # Invariants
//! - Pure and presentation-agnostic; callers re-derive after every change.
//! - All applicable issues are emitted, in a fixed order.

use super::assembler::sorted_containers;
use crate::model::container::{Container, ContainerId};
use crate::model::paragraph::Paragraph;
use serde::Serialize;

/// Below this many assigned paragraphs the document is flagged as thin.
pub const FEW_PARAGRAPHS_THRESHOLD: usize = 3;

/// Issue severity used to split errors from warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// One structural issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StructureIssue {
    /// No paragraph is assigned to any container.
    NoParagraphs,
    /// Some, but fewer than [`FEW_PARAGRAPHS_THRESHOLD`], paragraphs assigned.
    FewParagraphs { count: usize },
    /// Containers that hold no paragraph.
    EmptyContainers { count: usize, names: String },
}

impl StructureIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            Self::NoParagraphs => IssueSeverity::Error,
            Self::FewParagraphs { .. } | Self::EmptyContainers { .. } => IssueSeverity::Warning,
        }
    }

    /// Stable issue code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoParagraphs => "no-paragraphs",
            Self::FewParagraphs { .. } => "few-paragraphs",
            Self::EmptyContainers { .. } => "empty-containers",
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> String {
        match self {
            Self::NoParagraphs => "no paragraph is assigned to any section".to_string(),
            Self::FewParagraphs { count } => {
                format!("only {count} paragraph(s) assigned; consider adding more content")
            }
            Self::EmptyContainers { count, names } => {
                format!("{count} empty section(s): {names}")
            }
        }
    }
}

/// Paragraph count for one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerStats {
    pub container_id: ContainerId,
    pub name: String,
    pub order: i64,
    pub paragraph_count: usize,
}

/// Diagnostics derived from one model snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureAnalysis {
    /// Per-container stats in assembly order.
    pub containers: Vec<ContainerStats>,
    pub total_paragraphs: usize,
    pub total_assigned_paragraphs: usize,
    pub unassigned_paragraph_count: usize,
    /// Ids of containers without paragraphs, in assembly order.
    pub empty_containers: Vec<ContainerId>,
    pub issues: Vec<StructureIssue>,
}

impl StructureAnalysis {
    pub fn empty_container_count(&self) -> usize {
        self.empty_containers.len()
    }

    pub fn error_issues(&self) -> Vec<&StructureIssue> {
        self.issues_with(IssueSeverity::Error)
    }

    pub fn warning_issues(&self) -> Vec<&StructureIssue> {
        self.issues_with(IssueSeverity::Warning)
    }

    pub fn has_issue(&self, code: &str) -> bool {
        self.issues.iter().any(|issue| issue.code() == code)
    }

    /// No error-severity issue is present.
    pub fn is_ready(&self) -> bool {
        self.error_issues().is_empty()
    }

    fn issues_with(&self, severity: IssueSeverity) -> Vec<&StructureIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == severity)
            .collect()
    }
}

/// Analyzes one `(containers, paragraphs)` snapshot.
pub fn analyze_structure(containers: &[Container], paragraphs: &[Paragraph]) -> StructureAnalysis {
    let stats: Vec<ContainerStats> = sorted_containers(containers)
        .into_iter()
        .map(|container| ContainerStats {
            container_id: container.id.clone(),
            name: container.name.clone(),
            order: container.order,
            paragraph_count: paragraphs
                .iter()
                .filter(|paragraph| paragraph.container_id.as_ref() == Some(&container.id))
                .count(),
        })
        .collect();

    let total_assigned_paragraphs: usize = stats.iter().map(|stat| stat.paragraph_count).sum();
    let empty: Vec<&ContainerStats> = stats
        .iter()
        .filter(|stat| stat.paragraph_count == 0)
        .collect();

    let mut issues = Vec::new();
    if total_assigned_paragraphs == 0 {
        issues.push(StructureIssue::NoParagraphs);
    } else if total_assigned_paragraphs < FEW_PARAGRAPHS_THRESHOLD {
        issues.push(StructureIssue::FewParagraphs {
            count: total_assigned_paragraphs,
        });
    }
    if !empty.is_empty() {
        issues.push(StructureIssue::EmptyContainers {
            count: empty.len(),
            names: empty
                .iter()
                .map(|stat| stat.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    StructureAnalysis {
        empty_containers: empty.iter().map(|stat| stat.container_id.clone()).collect(),
        total_paragraphs: paragraphs.len(),
        unassigned_paragraph_count: paragraphs
            .iter()
            .filter(|paragraph| paragraph.is_unassigned())
            .count(),
        total_assigned_paragraphs,
        containers: stats,
        issues,
    }
}

use blogdraft_core::{
    analyze_structure, Container, ContainerId, IssueSeverity, Paragraph, StructureIssue,
};

#[test]
fn empty_model_reports_no_paragraphs_only() {
    let analysis = analyze_structure(&[], &[]);

    assert_eq!(analysis.issues, vec![StructureIssue::NoParagraphs]);
    assert_eq!(analysis.total_paragraphs, 0);
    assert!(!analysis.is_ready());
}

#[test]
fn unassigned_paragraphs_do_not_count_as_assigned() {
    let containers = vec![Container::with_id("c1", "Intro", 0)];
    let paragraphs = vec![
        Paragraph::with_id("p1", "Hello", 0).in_container("c1"),
        Paragraph::with_id("p2", "Orphan", 0),
    ];

    let analysis = analyze_structure(&containers, &paragraphs);

    assert_eq!(analysis.total_paragraphs, 2);
    assert_eq!(analysis.total_assigned_paragraphs, 1);
    assert_eq!(analysis.unassigned_paragraph_count, 1);
    assert_eq!(analysis.containers[0].paragraph_count, 1);
    assert_eq!(
        analysis.issues,
        vec![StructureIssue::FewParagraphs { count: 1 }]
    );
    assert!(analysis.is_ready());
}

#[test]
fn every_applicable_issue_is_reported_in_fixed_order() {
    let containers = vec![
        Container::with_id("c2", "Outro", 2),
        Container::with_id("c1", "Intro", 0),
        Container::with_id("c3", "Body", 1),
    ];
    let paragraphs = vec![Paragraph::with_id("p1", "Hello", 0).in_container("c1")];

    let analysis = analyze_structure(&containers, &paragraphs);

    let codes: Vec<&str> = analysis.issues.iter().map(|issue| issue.code()).collect();
    assert_eq!(codes, vec!["few-paragraphs", "empty-containers"]);
    assert_eq!(
        analysis.empty_containers,
        vec![ContainerId::new("c3"), ContainerId::new("c2")]
    );
    assert_eq!(analysis.empty_container_count(), 2);
    assert_eq!(
        analysis.issues[1],
        StructureIssue::EmptyContainers {
            count: 2,
            names: "Body, Outro".to_string(),
        }
    );
    assert!(analysis
        .warning_issues()
        .iter()
        .all(|issue| issue.severity() == IssueSeverity::Warning));
}

#[test]
fn three_assigned_paragraphs_clear_thin_content_warning() {
    let containers = vec![Container::with_id("c1", "Intro", 0)];
    let paragraphs: Vec<Paragraph> = (0..3)
        .map(|index| Paragraph::with_id(format!("p{index}"), "text", index).in_container("c1"))
        .collect();

    let analysis = analyze_structure(&containers, &paragraphs);

    assert!(analysis.issues.is_empty());
    assert!(!analysis.has_issue("few-paragraphs"));
}

#[test]
fn whitespace_paragraph_still_counts() {
    let containers = vec![Container::with_id("c1", "Intro", 0)];
    let paragraphs = vec![Paragraph::with_id("p1", "   ", 0).in_container("c1")];

    let analysis = analyze_structure(&containers, &paragraphs);

    assert_eq!(analysis.total_assigned_paragraphs, 1);
    assert!(!analysis.has_issue("no-paragraphs"));
}

#[test]
fn issue_messages_name_empty_sections() {
    let containers = vec![Container::with_id("c1", "Intro", 0)];

    let analysis = analyze_structure(&containers, &[]);

    assert_eq!(analysis.error_issues().len(), 1);
    let empty = analysis
        .issues
        .iter()
        .find(|issue| issue.code() == "empty-containers")
        .expect("empty container issue");
    assert!(empty.message().contains("Intro"));
}

//! Markdown rendering of a learning report

use crate::analysis::{Journey, LearningReport};

pub fn render_report(report: &LearningReport) -> String {
    let mut content = String::with_capacity(4096);
    let s = &report.summary;

    content.push_str("# Learning Report\n\n");
    content.push_str(&format!(
        "_Generated {}_\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    content.push_str("## Summary\n\n");
    content.push_str(&format!("- Total experiences: {}\n", s.total_experiences));
    content.push_str(&format!("- Unique learners: {}\n", s.unique_learners));
    content.push_str(&format!("- Unique locations: {}\n", s.unique_locations));
    content.push_str(&format!("- Unique domains: {}\n", s.unique_domains));
    content.push_str(&format!(
        "- Interdisciplinary experiences: {}\n\n",
        s.interdisciplinary_experiences
    ));

    content.push_str("## Learning Hotspots\n\n");
    if report.learning_hotspots.is_empty() {
        content.push_str("No hotspots yet.\n\n");
    } else {
        content.push_str("| Location | Diversity | Experiences | Learners | Domains |\n");
        content.push_str("|---|---|---|---|---|\n");
        for loc in &report.learning_hotspots {
            content.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                loc.name,
                loc.diversity,
                loc.count,
                loc.learners,
                loc.domains.join(", ")
            ));
        }
        content.push('\n');
    }

    content.push_str("## Interdisciplinary Connections\n\n");
    if report.interdisciplinary_connections.is_empty() {
        content.push_str("None recorded.\n\n");
    } else {
        for conn in &report.interdisciplinary_connections {
            content.push_str(&format!(
                "- **{}** @ {}: {}\n",
                conn.domains.join(" + "),
                conn.location,
                conn.description
            ));
            for unexpected in &conn.unexpected {
                content.push_str(&format!("  - {}\n", unexpected));
            }
        }
        content.push('\n');
    }

    content.push_str("## Domain Network\n\n");
    for node in &report.domain_network.nodes {
        content.push_str(&format!("- {} ({})\n", node.id, node.size));
    }
    if !report.domain_network.edges.is_empty() {
        content.push('\n');
        for edge in &report.domain_network.edges {
            content.push_str(&format!(
                "- {} — {}: {}\n",
                edge.source, edge.target, edge.weight
            ));
        }
    }
    content
}

pub fn render_journey(journey: &Journey) -> String {
    let mut content = format!("# Journey of {}\n\n## Timeline\n\n", journey.learner);
    for entry in &journey.timeline {
        content.push_str(&format!(
            "- {} [{}] @ {}: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.kind,
            entry.location,
            entry.description
        ));
        if !entry.domains.is_empty() {
            content.push_str(&format!(" ({})", entry.domains.join(", ")));
        }
        content.push('\n');
    }

    if !journey.domain_evolution.is_empty() {
        content.push_str("\n## New Domains\n\n");
        for step in &journey.domain_evolution {
            content.push_str(&format!(
                "- {}: {} (at {})\n",
                step.timestamp.format("%Y-%m-%d"),
                step.new_domains.join(", "),
                step.context
            ));
        }
    }

    if !journey.questions_emerged.is_empty() {
        content.push_str("\n## Open Questions\n\n");
        for question in &journey.questions_emerged {
            content.push_str(&format!("- {}\n", question));
        }
    }
    content
}

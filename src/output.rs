//! Human-readable rendering for CLI commands.

use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::resourceids::{ParsedResourceId, ResourceIdType, SegmentKind};
use crate::validate::Diagnostics;

#[derive(Debug, Tabled)]
struct IdTypeRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Template")]
    template: String,
}

#[derive(Debug, Tabled)]
struct DiagnosticRow {
    #[tabled(rename = "Level")]
    level: &'static str,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub fn id_types_table(types: &[ResourceIdType]) -> String {
    let rows: Vec<IdTypeRow> = types
        .iter()
        .map(|t| IdTypeRow {
            key: t.key,
            name: t.name,
            template: t.template(),
        })
        .collect();
    Table::new(rows).with(Style::sharp()).to_string()
}

/// Empty diagnostics render as a single line rather than an empty table.
pub fn diagnostics_table(diags: &Diagnostics) -> String {
    if diags.errors.is_empty() && diags.warnings.is_empty() {
        return "valid".to_string();
    }

    let errors = diags.errors.iter().map(|e| DiagnosticRow {
        level: "error",
        key: e.key.clone(),
        message: e.message.clone(),
    });
    let warnings = diags.warnings.iter().map(|w| DiagnosticRow {
        level: "warning",
        key: String::new(),
        message: w.clone(),
    });
    let rows: Vec<DiagnosticRow> = errors.chain(warnings).collect();
    Table::new(rows).with(Style::sharp()).to_string()
}

/// One leaf per segment: literals as written, user values as `name: value`.
pub fn segment_tree(id_type: &ResourceIdType, parsed: &ParsedResourceId) -> Tree<String> {
    let mut tree = Tree::new(id_type.name.to_string());
    for segment in id_type.segments {
        let leaf = match segment.kind {
            SegmentKind::Static(literal) | SegmentKind::ResourceProvider(literal) => {
                literal.to_string()
            }
            _ => format!(
                "{}: {}",
                segment.name,
                parsed.get(segment.name).unwrap_or_default()
            ),
        };
        tree.push(Tree::new(leaf));
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resourceids::{KNOWN_TYPES, ResourceGroupId, ResourceId};
    use crate::validate::ValidationError;

    #[test]
    fn test_id_types_table_lists_every_type() {
        let table = id_types_table(KNOWN_TYPES);
        for t in KNOWN_TYPES {
            assert!(table.contains(t.key), "missing {}", t.key);
        }
        assert!(table.contains("Template"));
    }

    #[test]
    fn test_diagnostics_table_valid() {
        assert_eq!(diagnostics_table(&Diagnostics::default()), "valid");
    }

    #[test]
    fn test_diagnostics_table_rows() {
        let diags = Diagnostics {
            warnings: vec!["deprecated".to_string()],
            errors: vec![ValidationError::new("name", "must not be empty")],
        };
        let table = diagnostics_table(&diags);
        assert!(table.contains("must not be empty"));
        assert!(table.contains("warning"));
        assert!(table.contains("deprecated"));
    }

    #[test]
    fn test_segment_tree() {
        let parsed = ResourceGroupId::TYPE
            .parse("/subscriptions/sub/resourceGroups/example", false)
            .unwrap();
        let tree = segment_tree(&ResourceGroupId::TYPE, &parsed).to_string();
        assert!(tree.starts_with("Resource Group"));
        assert!(tree.contains("subscriptions"));
        assert!(tree.contains("subscriptionId: sub"));
        assert!(tree.contains("resourceGroupName: example"));
    }
}

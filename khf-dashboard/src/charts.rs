//! Statistics section: summary cards and the four distribution charts.

use khf_db::models::{CategoryCount, HierarchyCount, SummaryStats};
use khf_db::Database;
use khf_facility::{FacilityColumn, Predicates};
use serde::Serialize;

/// A node of the County → Sub-County → Type treemap.
///
/// `value` is the number of facilities below the node. Leaves have no children.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HierarchyNode {
    pub name: String,
    pub value: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: 0,
            children: Vec::new(),
        }
    }

    /// Child named `name`, appended if missing. Input is sorted by key, so
    /// only the last child can match.
    fn child(&mut self, name: &str) -> &mut HierarchyNode {
        let found = self.children.last().is_some_and(|c| c.name == name);
        if !found {
            self.children.push(HierarchyNode::new(name));
        }
        let last = self.children.len() - 1;
        &mut self.children[last]
    }
}

/// Fold (county, sub-county, type) counts, sorted by those keys, into a tree
/// rooted at `"Kenya"`.
pub fn build_hierarchy(leaves: &[HierarchyCount]) -> HierarchyNode {
    let mut root = HierarchyNode::new("Kenya");
    for leaf in leaves {
        root.value += leaf.count;
        let county = root.child(&leaf.county);
        county.value += leaf.count;
        let sub_county = county.child(&leaf.sub_county);
        sub_county.value += leaf.count;
        let facility_type = sub_county.child(&leaf.facility_type);
        facility_type.value += leaf.count;
    }
    root
}

/// Everything the statistics section draws for one filtered view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSet {
    pub summary: SummaryStats,
    pub by_county: Vec<CategoryCount>,
    pub by_type: Vec<CategoryCount>,
    pub by_owner: Vec<CategoryCount>,
    pub hierarchy: HierarchyNode,
}

impl ChartSet {
    pub fn query(db: &Database, predicates: &Predicates) -> anyhow::Result<Self> {
        let summary = db.summary(predicates)?;
        let by_county = db.count_by(FacilityColumn::County, predicates)?;
        let by_type = db.count_by(FacilityColumn::Type, predicates)?;
        let by_owner = db.count_by(FacilityColumn::Owner, predicates)?;
        let hierarchy = build_hierarchy(&db.hierarchy_counts(predicates)?);
        log::debug!(
            "charts: {} facilities across {} counties",
            summary.total,
            by_county.len()
        );
        Ok(Self {
            summary,
            by_county,
            by_type,
            by_owner,
            hierarchy,
        })
    }

    /// True when the filtered view has no rows; charts show a placeholder.
    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }
}

//! Aktivitätsvorlagen aus dem Katalog-Dienst.
//!
//! Der Katalog liefert pro Segment je eine Liste körperlicher und mentaler
//! Aktivitäten. wellrl liest ihn nur; Anpassungen entstehen immer als Kopie.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::segment::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Exercise,
    Meditation,
    Journaling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Dauer in Minuten.
    pub duration: u32,
    pub intensity: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentCatalog {
    #[serde(default)]
    pub physical: Vec<ActivityTemplate>,
    #[serde(default)]
    pub mental: Vec<ActivityTemplate>,
}

impl SegmentCatalog {
    /// Alle Vorlagen, körperliche zuerst.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityTemplate> {
        self.physical.iter().chain(self.mental.iter())
    }
}

/// Katalog, indiziert über das Segment-Label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityCatalog(pub BTreeMap<String, SegmentCatalog>);

impl ActivityCatalog {
    #[must_use]
    pub fn for_segment(&self, segment: Segment) -> Option<&SegmentCatalog> {
        self.0.get(segment.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn template_reads_type_field() {
        let template: ActivityTemplate = serde_json::from_value(json!({
            "name": "Body Scan Meditation (10 min)",
            "type": "meditation",
            "duration": 10,
            "intensity": "Low"
        }))
        .expect("deserialize");
        assert_eq!(template.kind, ActivityKind::Meditation);
        assert!(template.instructions.is_empty());

        let back = serde_json::to_value(&template).expect("serialize");
        assert_eq!(back["type"], "meditation");
    }

    #[test]
    fn catalog_lookup_by_segment() {
        let catalog: ActivityCatalog = serde_json::from_value(json!({
            "Wellness Seekers": {
                "physical": [{"name": "Walk", "type": "exercise", "duration": 20, "intensity": "Moderate"}]
            }
        }))
        .expect("deserialize");
        let seekers = catalog
            .for_segment(Segment::WellnessSeekers)
            .expect("segment present");
        assert_eq!(seekers.physical.len(), 1);
        assert!(seekers.mental.is_empty());
        assert_eq!(seekers.iter().count(), 1);
        assert!(catalog.for_segment(Segment::PhysicalHealthRisk).is_none());
    }
}

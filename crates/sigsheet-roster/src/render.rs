//! Render model for presentation adapters
//!
//! A pure projection of a roster snapshot: one row per slot, labelled with
//! the fixed name at that position. Adapters draw it; they never write back.

use crate::names::NameList;
use crate::reconcile::{self, RosterStatus};
use crate::roster::Roster;
use crate::slot::SlotIndex;
use serde::Serialize;

/// Banner shown once every slot is signed
pub const COMPLETE_BANNER: &str = "All signatures collected!";

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRow {
    /// Slot position
    pub index: SlotIndex,
    /// Participant name
    pub label: String,
    /// Image payload, if signed
    pub image: Option<String>,
}

/// Everything a presentation or export adapter needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    /// Rows in slot order
    pub rows: Vec<RenderRow>,
    /// Completion status
    pub status: RosterStatus,
}

impl RenderModel {
    /// Project a snapshot onto the name list
    ///
    /// The roster and name list have the same length by construction.
    #[must_use]
    pub fn build(roster: &Roster, names: &NameList) -> Self {
        debug_assert_eq!(roster.len(), names.len());
        let rows = names
            .iter()
            .zip(roster.slots())
            .map(|((index, label), slot)| RenderRow {
                index,
                label: label.to_string(),
                image: slot.image().map(|i| i.as_str().to_string()),
            })
            .collect();

        Self {
            rows,
            status: reconcile::status(roster),
        }
    }

    /// Completion banner, if any
    #[must_use]
    pub fn banner(&self) -> Option<&'static str> {
        self.status.complete.then_some(COMPLETE_BANNER)
    }

    /// Whether any row carries an image
    #[must_use]
    pub fn has_images(&self) -> bool {
        self.rows.iter().any(|r| r.image.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::ImageData;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_follow_name_order() {
        let names = NameList::new(["Ahsan", "Nasa"]).unwrap();
        let roster = Roster::empty(2)
            .with_signature(SlotIndex::new(1), ImageData::new("data:image/png;base64,AA==").unwrap())
            .unwrap();

        let model = RenderModel::build(&roster, &names);

        assert_eq!(
            model.rows,
            vec![
                RenderRow {
                    index: SlotIndex::new(0),
                    label: "Ahsan".to_string(),
                    image: None,
                },
                RenderRow {
                    index: SlotIndex::new(1),
                    label: "Nasa".to_string(),
                    image: Some("data:image/png;base64,AA==".to_string()),
                },
            ]
        );
        assert!(model.has_images());
        assert_eq!(model.banner(), None);
    }

    #[test]
    fn banner_when_complete() {
        let names = NameList::new(["Umar"]).unwrap();
        let roster = Roster::empty(1)
            .with_signature(SlotIndex::new(0), ImageData::new("data:image/png;base64,AA==").unwrap())
            .unwrap();

        assert_eq!(RenderModel::build(&roster, &names).banner(), Some(COMPLETE_BANNER));
    }
}

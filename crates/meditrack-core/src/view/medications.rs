//! Medication renderers.

use super::{status_display, Action, ViewNode, EMPTY_STATE};
use crate::models::{MedicationRecord, PrescriberLink, RecordId};
use crate::reconcile::sort_by_time;
use crate::schedule::{classify, display_time, TimeOfDay};

// =========================================================================
// Schedule list
// =========================================================================

/// Schedule list, sorted by raw time. An empty list renders the
/// `emptyState` placeholder instead of the list.
pub fn render_medicine_list(records: &[MedicationRecord]) -> ViewNode {
    if records.is_empty() {
        return ViewNode::new("div")
            .id(EMPTY_STATE)
            .class("empty-state")
            .child(ViewNode::icon("fas fa-pills"))
            .child(ViewNode::new("p").text("No medicines scheduled yet. Add your first medicine!"))
            .child(
                ViewNode::new("button")
                    .id("addMedicineEmptyBtn")
                    .class("add-btn")
                    .child(ViewNode::icon("fas fa-plus"))
                    .child(ViewNode::span(" Add Medicine"))
                    .on_click(Action::OpenMedicationModal),
            );
    }

    let mut sorted = records.to_vec();
    sort_by_time(&mut sorted);

    ViewNode::new("ul")
        .class("medicine-list")
        .children(sorted.iter().map(medicine_item))
}

fn medicine_item(med: &MedicationRecord) -> ViewNode {
    let status = status_display(med.status);
    let time = med.time.as_deref().map(display_time).unwrap_or_default();

    let details = ViewNode::new("div")
        .class("medicine-details")
        .child(
            ViewNode::new("span")
                .class("dosage-badge")
                .child(ViewNode::icon("fas fa-prescription-bottle-alt"))
                .child(ViewNode::span(med.dosage.as_str())),
        )
        .child(
            ViewNode::new("span")
                .class("medicine-time")
                .child(ViewNode::icon("far fa-clock"))
                .child(ViewNode::span(time)),
        )
        .child(
            ViewNode::new("span")
                .class("status")
                .class(status.class)
                .child(ViewNode::icon(status.icon))
                .child(ViewNode::span(status.label)),
        );

    let info = ViewNode::new("div")
        .class("medicine-info")
        .child(
            ViewNode::new("div")
                .class("medicine-name")
                .child(ViewNode::icon("fas fa-capsules"))
                .child(ViewNode::span(med.name.as_str())),
        )
        .child(details)
        .child_opt(
            med.notes
                .as_deref()
                .map(|notes| ViewNode::new("div").class("medicine-notes").text(notes)),
        );

    let actions = ViewNode::new("div")
        .class("medicine-actions")
        .child(action_button(
            "mark-taken-btn",
            "fas fa-check",
            "Mark as taken",
            Action::MarkTaken(med.id.clone()),
        ))
        .child(action_button(
            "edit-btn",
            "fas fa-edit",
            "Edit medicine",
            Action::EditMedication(med.id.clone()),
        ))
        .child(action_button(
            "delete-btn",
            "fas fa-trash",
            "Delete medicine",
            Action::DeleteMedication(med.id.clone()),
        ));

    ViewNode::new("li")
        .class("medicine-item")
        .attr("data-id", med.id.as_str())
        .child(info)
        .child(actions)
}

fn action_button(class: &str, icon: &str, title: &str, action: Action) -> ViewNode {
    ViewNode::new("button")
        .class("action-btn")
        .class(class)
        .attr("title", title)
        .child(ViewNode::icon(icon))
        .on_click(action)
}

// =========================================================================
// Today, grouped by time of day
// =========================================================================

/// Records in each bucket, in input order. Unclassifiable times are left out.
pub fn group_by_time_of_day(records: &[MedicationRecord]) -> Vec<(TimeOfDay, Vec<&MedicationRecord>)> {
    TimeOfDay::ALL
        .iter()
        .map(|bucket| {
            let members = records
                .iter()
                .filter(|r| r.time.as_deref().and_then(classify) == Some(*bucket))
                .collect();
            (*bucket, members)
        })
        .collect()
}

/// Morning, Afternoon and Evening groups. A record whose time cannot be
/// parsed appears in none of them.
pub fn render_today(records: &[MedicationRecord]) -> ViewNode {
    let groups = group_by_time_of_day(records);
    ViewNode::new("div")
        .class("today-groups")
        .children(groups.into_iter().map(|(bucket, members)| time_slot(bucket, &members)))
}

fn time_slot(bucket: TimeOfDay, members: &[&MedicationRecord]) -> ViewNode {
    let group = ViewNode::new("div")
        .class("medication-time-group")
        .attr("data-slot", bucket.label().to_lowercase())
        .child(ViewNode::new("h4").text(bucket.label()));

    if members.is_empty() {
        return group.child(
            ViewNode::new("div")
                .class("no-medications")
                .text("No medications scheduled"),
        );
    }
    group.children(members.iter().map(|med| today_item(med)))
}

fn today_item(med: &MedicationRecord) -> ViewNode {
    let time = med.time.as_deref().map(display_time).unwrap_or_default();
    let button = if med.is_taken() {
        ViewNode::new("button")
            .class("status-btn taken")
            .attr("disabled", "true")
            .text("Taken")
    } else {
        ViewNode::new("button")
            .class("status-btn pending")
            .text("Mark Taken")
            .on_click(Action::MarkTaken(med.id.clone()))
    };

    ViewNode::new("div")
        .class("medication-item")
        .attr("data-id", med.id.as_str())
        .child(
            ViewNode::new("div")
                .class("med-info")
                .child(ViewNode::new("div").class("med-icon"))
                .child(
                    ViewNode::new("div")
                        .child(ViewNode::new("h5").text(med.name.as_str()))
                        .child(ViewNode::new("p").text(format!("{} · {}", med.dosage, time)))
                        .child_opt(
                            med.notes
                                .as_deref()
                                .map(|n| ViewNode::span(n).class("med-notes")),
                        ),
                ),
        )
        .child(button)
}

// =========================================================================
// My medications grid
// =========================================================================

const NOT_SPECIFIED: &str = "Not specified";

/// Detail cards with the locally cached prescriber for each medication.
pub fn render_my_medications<F>(records: &[MedicationRecord], prescriber_for: F) -> ViewNode
where
    F: Fn(&RecordId) -> Option<PrescriberLink>,
{
    if records.is_empty() {
        return ViewNode::new("div")
            .class("no-results")
            .child(ViewNode::icon("fas fa-search"))
            .child(ViewNode::new("p").text("No medications found matching your search."));
    }

    ViewNode::new("div")
        .class("medications-cards")
        .children(records.iter().map(|med| {
            let prescriber = prescriber_for(&med.id)
                .map(|link| link.label())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string());
            medication_card(med, prescriber)
        }))
}

fn detail_item(label: &str, value: impl Into<String>) -> ViewNode {
    ViewNode::new("div")
        .class("detail-item")
        .child(ViewNode::span(label).class("detail-label"))
        .child(ViewNode::span(value).class("detail-value"))
}

fn medication_card(med: &MedicationRecord, prescriber: String) -> ViewNode {
    let detail = med.detail.clone().unwrap_or_default();
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    let status = status_display(med.status);

    let details = ViewNode::new("div")
        .class("medication-details")
        .child(detail_item("Frequency:", or_dash(detail.frequency)))
        .child(detail_item("Purpose:", or_dash(detail.purpose)))
        .child(detail_item("Prescriber:", prescriber))
        .child(detail_item("Start Date:", or_dash(detail.start_date)))
        .child(detail_item(
            "Refills:",
            match detail.refills {
                Some(n) => format!("{} remaining", n),
                None => "-".to_string(),
            },
        ))
        .child(
            ViewNode::new("div")
                .class("detail-item")
                .child(ViewNode::span("Status:").class("detail-label"))
                .child(
                    ViewNode::span(status.label)
                        .class("detail-value status-badge")
                        .class(status.class),
                ),
        )
        .child_opt(med.notes.as_deref().map(|n| detail_item("Notes:", n)));

    ViewNode::new("div")
        .class("medication-card")
        .attr("data-id", med.id.as_str())
        .child(
            ViewNode::new("div")
                .class("medication-header")
                .child(ViewNode::new("h3").class("medication-name").text(med.name.as_str()))
                .child(ViewNode::span(med.dosage.as_str()).class("medication-dosage")),
        )
        .child(details)
        .child(
            ViewNode::new("div")
                .class("medication-actions")
                .child(
                    ViewNode::new("button")
                        .class("action-btn edit-btn")
                        .attr("title", "Edit medication")
                        .child(ViewNode::icon("fas fa-edit"))
                        .child(ViewNode::span(" Edit"))
                        .on_click(Action::EditMedication(med.id.clone())),
                )
                .child(
                    ViewNode::new("button")
                        .class("action-btn delete-btn")
                        .attr("title", "Delete medication")
                        .child(ViewNode::icon("fas fa-trash-alt"))
                        .child(ViewNode::span(" Delete"))
                        .on_click(Action::DeleteMedication(med.id.clone())),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MedicationDetail, MedicationStatus};

    fn med(id: i64, name: &str, time: &str, status: MedicationStatus) -> MedicationRecord {
        MedicationRecord::new(id, name, "100mg")
            .with_time(time)
            .with_status(status)
    }

    #[test]
    fn test_empty_list_renders_placeholder_only() {
        let node = render_medicine_list(&[]);
        assert_eq!(node.id.as_deref(), Some("emptyState"));
        assert!(node.find_by_class("medicine-item").is_empty());
        assert_eq!(
            node.find_by_id("addMedicineEmptyBtn").unwrap().action,
            Some(Action::OpenMedicationModal)
        );
    }

    #[test]
    fn test_list_sorted_with_status_and_actions() {
        let records = vec![
            med(1, "Later", "2026-10-17 20:00:00", MedicationStatus::Pending),
            med(2, "Earlier", "2026-10-17 08:05:00", MedicationStatus::Completed),
        ];
        let node = render_medicine_list(&records);

        let items = node.find_by_class("medicine-item");
        assert_eq!(items.len(), 2);
        assert!(items[0].text_content().contains("Earlier"));
        assert!(items[0].text_content().contains("8:05 AM"));
        assert!(items[0].text_content().contains("Taken"));
        assert!(items[1].text_content().contains("Upcoming"));

        let actions: Vec<_> = node
            .descendants()
            .into_iter()
            .filter_map(|n| n.action.clone())
            .collect();
        assert_eq!(actions.len(), 6);
        assert_eq!(actions[0], Action::MarkTaken(RecordId::from(2)));
    }

    #[test]
    fn test_today_groups() {
        let records = vec![
            med(1, "Breakfast", "2026-10-17 07:30:00", MedicationStatus::Pending),
            med(2, "Late", "2026-10-17 23:00:00", MedicationStatus::Completed),
            med(3, "Garbled", "sometime", MedicationStatus::Pending),
        ];
        let node = render_today(&records);

        let groups = node.find_by_class("medication-time-group");
        assert_eq!(groups.len(), 3);
        assert!(groups[0].text_content().contains("Breakfast"));
        assert_eq!(
            groups[1].find_by_class("no-medications")[0].text_content(),
            "No medications scheduled"
        );
        assert!(groups[2].text_content().contains("Late"));
        assert!(!node.text_content().contains("Garbled"));

        let evening_buttons = groups[2].find_by_class("status-btn");
        let taken = evening_buttons[0];
        assert_eq!(taken.text_content(), "Taken");
        assert!(taken.action.is_none());
        assert_eq!(taken.attrs.get("disabled").map(String::as_str), Some("true"));

        let morning_buttons = groups[0].find_by_class("status-btn");
        let pending = morning_buttons[0];
        assert_eq!(pending.action, Some(Action::MarkTaken(RecordId::from(1))));
    }

    #[test]
    fn test_my_medications_prescriber() {
        let mut record = MedicationRecord::new(4, "Metformin", "500mg");
        record.detail = Some(MedicationDetail {
            frequency: Some("Once daily".into()),
            refills: Some(2),
            ..Default::default()
        });
        let other = MedicationRecord::new(5, "Ibuprofen", "200mg");

        let node = render_my_medications(&[record, other], |id| {
            (id == &RecordId::from(4)).then(|| PrescriberLink {
                doctor_id: None,
                name: "Dr. Lee".into(),
                specialty: None,
            })
        });

        let cards = node.find_by_class("medication-card");
        assert_eq!(cards.len(), 2);
        let first = cards[0].text_content();
        assert!(first.contains("Dr. Lee (General Practitioner)"));
        assert!(first.contains("2 remaining"));
        assert!(cards[1].text_content().contains("Not specified"));
    }

    #[test]
    fn test_my_medications_empty() {
        let node = render_my_medications(&[], |_| None);
        assert!(node.has_class("no-results"));
        assert!(node.find_by_class("medication-card").is_empty());
    }
}

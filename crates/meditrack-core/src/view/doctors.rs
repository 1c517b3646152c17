//! Doctor renderers.

use super::{
    Action, Screen, ViewNode, ACTIVITY_LIST, DOCTORS_COUNT, SPECIALTIES_COUNT, TOTAL_DOCTORS,
};
use crate::models::DoctorRecord;

pub fn render_doctors(doctors: &[DoctorRecord]) -> ViewNode {
    if doctors.is_empty() {
        return ViewNode::new("div")
            .class("no-doctors")
            .child(ViewNode::icon("fas fa-user-md"))
            .child(
                ViewNode::new("p")
                    .text("No doctors added yet. Add your first doctor to get started!"),
            )
            .child(
                ViewNode::new("button")
                    .id("addDoctorEmptyBtn")
                    .class("add-doctor-main-btn")
                    .child(ViewNode::icon("fas fa-plus"))
                    .child(ViewNode::span(" Add Your First Doctor"))
                    .on_click(Action::OpenDoctorModal),
            );
    }

    ViewNode::new("div")
        .class("doctor-cards")
        .children(doctors.iter().map(doctor_card))
}

fn contact_item(icon: &str, value: Option<&str>) -> Option<ViewNode> {
    value.map(|v| {
        ViewNode::new("div")
            .class("contact-item")
            .child(ViewNode::icon(icon))
            .child(ViewNode::span(v))
    })
}

fn doctor_card(doctor: &DoctorRecord) -> ViewNode {
    ViewNode::new("div")
        .class("doctor-card")
        .attr("data-id", doctor.id.as_str())
        .child(
            ViewNode::new("div")
                .class("doctor-header")
                .child(ViewNode::new("h3").class("doctor-name").text(doctor.name.as_str()))
                .child(ViewNode::span(doctor.specialty_label()).class("doctor-specialty")),
        )
        .child(
            ViewNode::new("div")
                .class("doctor-contact")
                .child_opt(contact_item("fas fa-phone", doctor.phone.as_deref()))
                .child_opt(contact_item("fas fa-envelope", doctor.email.as_deref()))
                .child_opt(contact_item("fas fa-map-marker-alt", doctor.address.as_deref())),
        )
        .child(
            ViewNode::new("div")
                .class("doctor-actions")
                .child(
                    ViewNode::new("button")
                        .class("doctor-action-btn edit-doctor-btn")
                        .child(ViewNode::icon("fas fa-edit"))
                        .child(ViewNode::span(" Edit"))
                        .on_click(Action::EditDoctor(doctor.id.clone())),
                )
                .child(
                    ViewNode::new("button")
                        .class("doctor-action-btn delete-doctor-btn")
                        .child(ViewNode::icon("fas fa-trash-alt"))
                        .child(ViewNode::span(" Delete"))
                        .on_click(Action::DeleteDoctor(doctor.id.clone())),
                ),
        )
}

/// Prescriber dropdown for the medication modal.
pub fn render_prescriber_options(doctors: &[DoctorRecord]) -> ViewNode {
    ViewNode::new("select")
        .child(ViewNode::new("option").attr("value", "").text("Select a doctor"))
        .children(doctors.iter().map(|d| {
            ViewNode::new("option")
                .attr("value", d.id.as_str())
                .text(format!("{} - {}", d.name, d.specialty_label()))
        }))
}

/// Unique specialties in first-seen order. Doctors without one are skipped.
pub fn unique_specialties(doctors: &[DoctorRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for specialty in doctors.iter().filter_map(|d| d.specialty.as_deref()) {
        if !seen.iter().any(|s| s == specialty) {
            seen.push(specialty.to_string());
        }
    }
    seen
}

/// "1 doctor", "3 doctors".
pub fn doctor_count_label(count: usize) -> String {
    format!("{} doctor{}", count, if count == 1 { "" } else { "s" })
}

/// Last three doctors in the list, newest first.
pub fn render_recent_activity(doctors: &[DoctorRecord]) -> ViewNode {
    let list = ViewNode::new("div").class("activity-items");
    if doctors.is_empty() {
        return list.child(
            ViewNode::new("div")
                .class("activity-item")
                .child(ViewNode::icon("fas fa-info-circle"))
                .child(ViewNode::span("No recent activity")),
        );
    }

    let start = doctors.len().saturating_sub(3);
    list.children(doctors[start..].iter().rev().map(|d| {
        ViewNode::new("div")
            .class("activity-item")
            .child(ViewNode::icon("fas fa-user-plus"))
            .child(ViewNode::span(format!("Added {}", d.name)))
    }))
}

/// Mount the doctor counters and the recent activity list.
pub fn paint_doctor_stats(screen: &mut Screen, doctors: &[DoctorRecord]) {
    let specialties = unique_specialties(doctors);
    let title = if specialties.is_empty() {
        "None".to_string()
    } else {
        specialties.join(", ")
    };

    screen.set_text(DOCTORS_COUNT, doctor_count_label(doctors.len()));
    screen.set_text(TOTAL_DOCTORS, doctors.len().to_string());
    screen.mount(
        SPECIALTIES_COUNT,
        ViewNode::span(specialties.len().to_string())
            .attr("title", format!("Unique specialties: {}", title)),
    );
    screen.mount(ACTIVITY_LIST, render_recent_activity(doctors));
}

use crate::components::form::{Field, Form, Outcome};
use crate::components::table::TableView;
use crate::db::Registry;
use crate::input;
use crate::models::StaffMember;
use crate::report;
use anyhow::Result;

pub fn add_form() -> Form {
    Form::new(
        "Add Medical Staff",
        vec![
            Field::required("Staff ID", "e.g. 101143"),
            Field::required("Name", "e.g. Dr. Santosh"),
            Field::required("Role", "Doctor, Nurse, ..."),
            Field::required("Department", "e.g. Orthopaedics"),
            Field::optional("Schedule", "day|shift|start|end|location; ..."),
            Field::required("Contact", "phone"),
        ],
        add_staff,
    )
}

fn add_staff(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let staff = StaffMember {
        id: input::parse_id("Staff ID", &values[0])?,
        name: values[1].trim().to_string(),
        role: values[2].trim().to_string(),
        department: values[3].trim().to_string(),
        schedule: input::parse_schedule(&values[4])?,
        contact: values[5].trim().to_string(),
    };
    registry.add_medical_staff(&staff)?;

    let message = if staff.is_doctor() {
        format!("Doctor {} added to the system", staff.name)
    } else {
        format!("{} {} added to the system", staff.role, staff.name)
    };
    Ok(Outcome::message(message).with_details(report::staff_details(&staff)))
}

const STAFF_COLUMNS: &[(&str, u16)] = &[
    ("ID", 10),
    ("Name", 22),
    ("Role", 14),
    ("Department", 20),
    ("Contact", 14),
    ("Shifts", 20),
];

fn staff_rows(staff: Vec<StaffMember>) -> Vec<Vec<String>> {
    staff
        .into_iter()
        .map(|s| {
            let working = s.schedule.iter().filter(|e| e.shift != "Off").count();
            vec![
                s.id.to_string(),
                s.name,
                s.role,
                s.department,
                s.contact,
                format!("{working} of {} days", s.schedule.len()),
            ]
        })
        .collect()
}

pub fn staff_list() -> TableView {
    TableView::new("Medical Staff", STAFF_COLUMNS, |registry| {
        Ok(staff_rows(registry.get_all_staff()?))
    })
}

pub fn doctor_list() -> TableView {
    TableView::new("Doctors", STAFF_COLUMNS, |registry| {
        Ok(staff_rows(registry.list_doctors()?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    #[test]
    fn only_doctors_reach_the_doctor_index() {
        let mut registry = fixtures::registry();
        let nurse = [
            "7", "Meera", "Nurse", "Ward", "Monday|Night|20:00|08:00|Ward", "99",
        ]
        .map(String::from);
        let outcome = add_staff(&mut registry, &nurse).unwrap();
        assert_eq!(outcome.message, "Nurse Meera added to the system");

        let doctor = ["8", "Dr. Rao", "doctor", "General", "", "98"].map(String::from);
        add_staff(&mut registry, &doctor).unwrap();

        assert_eq!(registry.get_all_staff().unwrap().len(), 2);
        let doctors = staff_rows(registry.list_doctors().unwrap());
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0][1], "Dr. Rao");
        assert_eq!(doctors[0][5], "0 of 0 days");

        assert!(add_staff(&mut registry, &doctor)
            .unwrap_err()
            .to_string()
            .contains("already exists"));
    }
}

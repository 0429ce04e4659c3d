//! Bed assignment, discharge and emergency admission screens.

use crate::components::form::{Field, Form, Outcome};
use crate::components::table::TableView;
use crate::dates;
use crate::db::Registry;
use crate::input;
use anyhow::Result;

pub fn assign_form() -> Form {
    Form::new(
        "Assign Room",
        vec![
            Field::required("Patient ID", ""),
            Field::required("Room Type", "general room, private room, ..."),
            Field::required("Admission Date", "DD-MM-YYYY"),
            Field::required("Expected Days", "e.g. 5"),
        ],
        assign,
    )
}

fn assign(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient_id = input::parse_id("Patient ID", &values[0])?;
    let admitted = dates::parse_date(&values[2])?;
    let expected = input::parse_count("Expected Days", &values[3])?;

    let assignment = registry.assign_room(patient_id, &values[1], admitted, expected)?;
    let room = registry.room_category(&assignment.room_type)?;
    Ok(Outcome::message(format!(
        "Patient {} assigned to the {}",
        patient_id, assignment.room_type
    ))
    .with_details(vec![
        format!("Admitted: {}", dates::long_date(admitted)),
        format!("Expected stay: {expected} day(s)"),
        format!("{} beds left in the {}", room.available_beds, room.name),
    ]))
}

pub fn discharge_form() -> Form {
    Form::new(
        "Discharge Patient",
        vec![
            Field::required("Patient ID", ""),
            Field::required("Admission Date", "DD-MM-YYYY"),
            Field::required("Discharge Date", "DD-MM-YYYY"),
            Field::optional("Follow-up", "instructions"),
        ],
        discharge,
    )
}

fn discharge(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient_id = input::parse_id("Patient ID", &values[0])?;
    let admitted = dates::parse_date(&values[1])?;
    let discharged = dates::parse_date(&values[2])?;

    let room = registry
        .get_patient(patient_id)
        .ok()
        .and_then(|p| p.room_type);
    let record =
        registry.manage_discharge_process(patient_id, admitted, discharged, values[3].trim())?;

    let message = match room {
        Some(room) => format!("The patient has been discharged from the {room}"),
        None => format!("Patient {patient_id} discharged"),
    };
    Ok(Outcome::message(message).with_details(vec![
        format!("Discharge date: {}", dates::long_date(record.discharge_date)),
        format!("Follow-up: {}", record.follow_up),
    ]))
}

pub fn emergency_form() -> Form {
    Form::new(
        "Emergency Admission",
        vec![
            Field::required("Patient ID", "new ids get a placeholder record"),
            Field::optional("Admission Date", "DD-MM-YYYY, blank for today"),
            Field::required("Emergency Type", "e.g. Road accident"),
            Field::required("Severity", "e.g. Critical"),
        ],
        emergency,
    )
}

fn emergency(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient_id = input::parse_id("Patient ID", &values[0])?;
    let admitted = if values[1].trim().is_empty() {
        dates::today()
    } else {
        dates::parse_date(&values[1])?
    };

    let admission = registry.manage_emergency_admission(
        patient_id,
        admitted,
        values[2].trim(),
        values[3].trim(),
    )?;
    let patient = registry.get_patient(patient_id)?;
    Ok(Outcome::message(format!(
        "Patient {patient_id} admitted to the emergency room"
    ))
    .with_details(vec![
        format!("Patient: {}", patient.name),
        format!("Emergency: {}", admission.emergency_type),
        format!("Severity: {}", admission.severity),
        format!("Admitted: {}", dates::long_date(admission.admission_date)),
    ]))
}

pub fn occupancy_list() -> TableView {
    TableView::new(
        "Room Occupancy",
        &[
            ("Category", 28),
            ("Total Beds", 18),
            ("Occupied", 18),
            ("Available", 18),
            ("Nightly Price", 18),
        ],
        load_rooms,
    )
}

fn load_rooms(registry: &Registry) -> Result<Vec<Vec<String>>> {
    Ok(registry
        .room_categories()?
        .into_iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.total_beds.to_string(),
                r.occupied_beds().to_string(),
                r.available_beds.to_string(),
                format!("{:.2}", r.nightly_price),
            ]
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomSetup;
    use crate::db::fixtures;

    #[test]
    fn two_bed_ward_fills_and_frees() {
        let mut registry =
            fixtures::registry_with_rooms(&[RoomSetup::new("general room", 2, 1500.0)]);
        for id in 1..=3 {
            registry
                .register_patient(&fixtures::patient(id, "Patient"))
                .unwrap();
        }

        for id in ["1", "2"] {
            let form = [id, "General Room", "01-07-2025", "3"].map(String::from);
            assign(&mut registry, &form).unwrap();
        }
        let third = ["3", "general room", "01-07-2025", "3"].map(String::from);
        let err = assign(&mut registry, &third).unwrap_err();
        assert!(err
            .to_string()
            .contains("Currently the general room is unavailable"));

        let leave = ["1", "01-07-2025", "04-07-2025", "Eat oil free food"].map(String::from);
        let outcome = discharge(&mut registry, &leave).unwrap();
        assert_eq!(
            outcome.message,
            "The patient has been discharged from the general room"
        );

        let outcome = assign(&mut registry, &third).unwrap();
        assert!(outcome.details.last().unwrap().starts_with("0 beds left"));
    }

    #[test]
    fn emergency_creates_a_placeholder() {
        let mut registry = fixtures::registry();
        let form = ["900", "03-07-2025", "Road accident", "Critical"].map(String::from);
        let outcome = emergency(&mut registry, &form).unwrap();
        assert_eq!(outcome.details[0], "Patient: Emergency patient 900");
        assert_eq!(
            registry.room_category("emergency room").unwrap().available_beds,
            9
        );
        let rows = load_rooms(&registry).unwrap();
        let emergency = rows.iter().find(|r| r[0] == "emergency room").unwrap();
        assert_eq!(emergency[2], "1");
    }
}

use crate::components::form::{Field, Form, Outcome};
use crate::components::table::TableView;
use crate::dates;
use crate::db::Registry;
use crate::input;
use crate::report;
use anyhow::Result;

pub fn schedule_form() -> Form {
    Form::new(
        "Schedule Appointment",
        vec![
            Field::required("Patient ID", ""),
            Field::required("Doctor ID", ""),
            Field::required("Date & Time", "DD-MM-YYYY HH:MM"),
            Field::required("Type", "Consultation, Follow Up, ..."),
        ],
        schedule,
    )
}

fn schedule(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient_id = input::parse_id("Patient ID", &values[0])?;
    let doctor_id = input::parse_id("Doctor ID", &values[1])?;
    let at = dates::parse_date_time(&values[2])?;

    let appointment =
        registry.schedule_appointment(patient_id, doctor_id, at, values[3].trim())?;
    let doctor = registry.get_staff(doctor_id)?;
    Ok(Outcome::message(format!(
        "Appointment scheduled at {}",
        dates::short_date_time(appointment.scheduled_at)
    ))
    .with_details(vec![
        format!("Patient ID: {}", appointment.patient_id),
        format!("Doctor: {} ({})", doctor.name, doctor.department),
        format!("Type: {}", appointment.kind),
    ]))
}

pub fn doctor_schedule_form() -> Form {
    Form::new(
        "Doctor's Schedule",
        vec![
            Field::required("Doctor ID", ""),
            Field::optional("Day", "DD-MM-YYYY, blank for today"),
        ],
        doctor_schedule,
    )
}

fn doctor_schedule(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let doctor_id = input::parse_id("Doctor ID", &values[0])?;
    let day = if values[1].trim().is_empty() {
        dates::today()
    } else {
        dates::parse_date(&values[1])?
    };

    let schedule = registry.doctors_schedule(doctor_id, day)?;
    Ok(Outcome::message(format!(
        "{} appointment(s) on {}",
        schedule.appointments.len(),
        dates::short_date(day)
    ))
    .with_details(report::doctor_schedule(&schedule)))
}

pub fn appointment_list() -> TableView {
    TableView::new(
        "Appointments",
        &[
            ("#", 6),
            ("Patient ID", 14),
            ("Doctor ID", 14),
            ("When", 26),
            ("Type", 40),
        ],
        load_appointments,
    )
}

fn load_appointments(registry: &Registry) -> Result<Vec<Vec<String>>> {
    Ok(registry
        .get_all_appointments()?
        .into_iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.patient_id.to_string(),
                a.doctor_id.to_string(),
                dates::short_date_time(a.scheduled_at),
                a.kind,
            ]
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    fn seeded() -> Registry {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(183, "Alex"))
            .unwrap();
        registry
            .add_medical_staff(&fixtures::doctor(101143, "Dr. Santosh"))
            .unwrap();
        registry
    }

    #[test]
    fn books_and_shows_the_day() {
        let mut registry = seeded();
        let booked = ["183", "101143", "1-7-2025 9:00", "Follow Up"].map(String::from);
        let outcome = schedule(&mut registry, &booked).unwrap();
        assert_eq!(outcome.message, "Appointment scheduled at 01-07-2025 09:00");

        let err = schedule(&mut registry, &booked).unwrap_err();
        assert!(err.to_string().contains("Appointment conflict"));

        let day = ["101143", "01-07-2025"].map(String::from);
        let outcome = doctor_schedule(&mut registry, &day).unwrap();
        assert_eq!(
            outcome.details.last().unwrap(),
            "09:00 - Patient ID: 183 (Follow Up)"
        );
        assert_eq!(load_appointments(&registry).unwrap().len(), 1);
    }

    #[test]
    fn malformed_slots_are_rejected() {
        let mut registry = seeded();
        let booked = ["183", "101143", "2025-07-01 09:00", "Follow Up"].map(String::from);
        let err = schedule(&mut registry, &booked).unwrap_err();
        assert!(err.to_string().contains("DD-MM-YYYY HH:MM"));
        assert!(registry.get_all_appointments().unwrap().is_empty());
    }
}

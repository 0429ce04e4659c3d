use crate::components::form::{Field, Form, Outcome};
use crate::db::Registry;
use crate::input;
use crate::models::MedicalRecord;
use crate::report;
use anyhow::Result;

pub fn create_form() -> Form {
    Form::new(
        "Create Medical Record",
        vec![
            Field::required("Patient ID", ""),
            Field::required("Doctor ID", "must have seen the patient"),
            Field::required("Diagnosis", "e.g. Fracture in right arm"),
            Field::required("Treatment", "e.g. Cast for 6 weeks"),
            Field::optional("Prescription", "medicine|dosage|frequency; ..."),
        ],
        create,
    )
}

fn create(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let record = MedicalRecord {
        patient_id: input::parse_id("Patient ID", &values[0])?,
        doctor_id: input::parse_id("Doctor ID", &values[1])?,
        diagnosis: values[2].trim().to_string(),
        treatment: values[3].trim().to_string(),
        prescription: input::parse_prescriptions(&values[4])?,
    };
    registry.create_medical_record(&record)?;

    let details = record
        .prescription
        .iter()
        .map(|p| format!("{} ({}): {}", p.medicine, p.dosage, p.frequency))
        .collect();
    Ok(Outcome::message(format!(
        "Medical record of patient {} created",
        record.patient_id
    ))
    .with_details(details))
}

pub fn report_form() -> Form {
    Form::new(
        "Patient Report",
        vec![
            Field::required("Patient ID", ""),
            Field::optional("Vitals", "name=value; e.g. Blood Pressure=120/80"),
        ],
        patient_report,
    )
}

fn patient_report(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient_id = input::parse_id("Patient ID", &values[0])?;
    let vitals = input::parse_vitals(&values[1])?;

    let report = registry.generate_patient_report(patient_id, &vitals)?;
    Ok(
        Outcome::message(format!("Report for {}", report.patient.name))
            .with_details(report::patient_report(&report)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates;
    use crate::db::fixtures;

    #[test]
    fn record_needs_an_appointment_first() {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(183, "Alex"))
            .unwrap();
        registry
            .add_medical_staff(&fixtures::doctor(101143, "Dr. Santosh"))
            .unwrap();

        let form = [
            "183",
            "101143",
            "Fracture in right arm",
            "Cast for 6 weeks",
            "Ibuprofen|400mg|Every 6 hours",
        ]
        .map(String::from);
        let err = create(&mut registry, &form).unwrap_err();
        assert!(err.to_string().contains("register the patient first"));

        let at = dates::parse_date_time("01-07-2025 09:00").unwrap();
        registry
            .schedule_appointment(183, 101143, at, "Consultation")
            .unwrap();
        let outcome = create(&mut registry, &form).unwrap();
        assert_eq!(outcome.details, ["Ibuprofen (400mg): Every 6 hours"]);

        let report = ["183", "Blood Pressure=120/80; Pulse=72"].map(String::from);
        let outcome = patient_report(&mut registry, &report).unwrap();
        assert_eq!(outcome.message, "Report for Alex");
        assert!(outcome
            .details
            .contains(&"Current Status: Outpatient".to_string()));
        assert!(outcome.details.contains(&"  Pulse: 72".to_string()));
    }

    #[test]
    fn report_without_record_is_refused() {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(5, "Romi"))
            .unwrap();
        let err = patient_report(&mut registry, &["5".to_string(), String::new()]).unwrap_err();
        assert!(err.to_string().contains("Create the medical record"));
    }
}

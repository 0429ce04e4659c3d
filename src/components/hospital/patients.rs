//! Patient registration and listing.

use crate::components::form::{Field, Form, Outcome};
use crate::components::table::TableView;
use crate::dates;
use crate::db::Registry;
use crate::input;
use crate::models::{Gender, InsuranceInfo, NewPatient, PersonalInfo};
use crate::report;
use anyhow::{anyhow, Context, Result};

pub fn register_form() -> Form {
    Form::new(
        "Patient Registration",
        vec![
            Field::required("Patient ID", "e.g. 183"),
            Field::required("Name", "full name"),
            Field::required("Age", "years"),
            Field::required("Gender", "M / F / O"),
            Field::required("Blood Type", "e.g. A+"),
            Field::optional("Medical History", "e.g. Fracture"),
            Field::optional("Insurance Provider", "blank if uninsured"),
            Field::optional("Policy Number", ""),
            Field::optional("Coverage %", "0-100"),
        ],
        register,
    )
}

fn register(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient = NewPatient {
        id: input::parse_id("Patient ID", &values[0])?,
        name: values[1].trim().to_string(),
        personal: PersonalInfo {
            age: values[2]
                .trim()
                .parse()
                .context("Age must be a whole number of years")?,
            gender: values[3].parse::<Gender>().map_err(|e| anyhow!(e))?,
            blood_type: values[4].trim().to_uppercase(),
        },
        medical_history: values[5].trim().to_string(),
        insurance: InsuranceInfo {
            provider: values[6].trim().to_string(),
            policy_number: values[7].trim().to_string(),
            coverage_percent: input::parse_percent(&values[8])?,
        },
    };

    registry.register_patient(&patient)?;
    let stored = registry.get_patient(patient.id)?;
    let mut details = report::patient_details(&stored);
    if let Some(admission) = registry.emergency_admission(patient.id)? {
        details.push(format!(
            "Admitted via emergency on {}: {} ({})",
            dates::long_date(admission.admission_date),
            admission.emergency_type,
            admission.severity
        ));
    }
    Ok(
        Outcome::message(format!("Registration of patient {} successful", patient.id))
            .with_details(details),
    )
}

pub fn patient_list() -> TableView {
    TableView::new(
        "Patients",
        &[
            ("ID", 8),
            ("Name", 20),
            ("Age", 6),
            ("Gender", 8),
            ("Status", 12),
            ("Room", 14),
            ("Doctor", 10),
            ("History", 22),
        ],
        load_patients,
    )
}

fn load_patients(registry: &Registry) -> Result<Vec<Vec<String>>> {
    Ok(registry
        .get_all_patients()?
        .into_iter()
        .map(|p| {
            let (age, gender) = match &p.personal {
                Some(info) => (info.age.to_string(), info.gender.as_str().to_string()),
                None => ("-".to_string(), "-".to_string()),
            };
            vec![
                p.id.to_string(),
                p.name,
                age,
                gender,
                p.status.as_str().to_string(),
                p.room_type.unwrap_or_else(|| "-".to_string()),
                p.doctor_id.map_or_else(|| "-".to_string(), |d| d.to_string()),
                p.medical_history,
            ]
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn registers_from_form_values() {
        let mut registry = fixtures::registry();
        let outcome = register(
            &mut registry,
            &values(&[
                "183", "Alex", "27", "m", "a+", "Fracture", "TX Health", "67677676", "80",
            ]),
        )
        .unwrap();
        assert!(outcome.message.contains("183"));

        let patient = registry.get_patient(183).unwrap();
        let personal = patient.personal.unwrap();
        assert_eq!(personal.gender, Gender::Male);
        assert_eq!(personal.blood_type, "A+");
        assert_eq!(patient.insurance.unwrap().coverage_percent, 80.0);
    }

    #[test]
    fn bad_numbers_and_duplicates_are_reported() {
        let mut registry = fixtures::registry();
        let form = values(&["1", "Asha", "old", "f", "O+", "", "", "", ""]);
        assert!(register(&mut registry, &form).is_err());

        let form = values(&["1", "Asha", "30", "f", "O+", "", "", "", ""]);
        register(&mut registry, &form).unwrap();
        let err = register(&mut registry, &form).unwrap_err();
        assert!(err.to_string().contains("already registered"));
        assert_eq!(load_patients(&registry).unwrap().len(), 1);
    }

    #[test]
    fn registering_an_emergency_placeholder_shows_the_admission() {
        let mut registry = fixtures::registry();
        let admitted = dates::parse_date("03-07-2025").unwrap();
        registry
            .manage_emergency_admission(900, admitted, "Road accident", "Critical")
            .unwrap();

        let form = values(&["900", "Ravi", "41", "m", "B+", "", "", "", ""]);
        let outcome = register(&mut registry, &form).unwrap();
        assert_eq!(
            outcome.details.last().unwrap(),
            "Admitted via emergency on July 03, 2025: Road accident (Critical)"
        );
    }
}

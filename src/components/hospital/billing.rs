//! Billing, estimates and bill history.

use crate::components::form::{Field, Form, Outcome};
use crate::dates;
use crate::db::Registry;
use crate::input;
use crate::report;
use anyhow::Result;

/// Coverage typed on the form, or the patient's policy when left blank.
fn coverage(registry: &Registry, patient_id: i64, raw: &str) -> Result<f64> {
    if !raw.trim().is_empty() {
        return input::parse_percent(raw);
    }
    let patient = registry.get_patient(patient_id)?;
    Ok(patient.insurance.map_or(0.0, |i| i.coverage_percent))
}

pub fn process_form() -> Form {
    Form::new(
        "Process Billing",
        vec![
            Field::required("Patient ID", "discharged patients only"),
            Field::required("Services", "name=cost; e.g. X-Ray=800; Medicines=1000"),
            Field::optional("Coverage %", "blank uses the patient's policy"),
        ],
        process,
    )
}

fn process(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient_id = input::parse_id("Patient ID", &values[0])?;
    let services = input::parse_services(&values[1])?;
    let coverage = coverage(registry, patient_id, &values[2])?;

    let bill = registry.process_billing(patient_id, &services, coverage)?;
    Ok(
        Outcome::message(format!("Bill #{} issued to {}", bill.id, bill.patient_name))
            .with_details(report::billing_summary(&bill)),
    )
}

pub fn estimate_form() -> Form {
    Form::new(
        "Treatment Cost",
        vec![
            Field::required("Patient ID", ""),
            Field::required("Plan", "name=cost; e.g. Physiotherapy=2500"),
            Field::optional("Coverage %", "blank uses the patient's policy"),
        ],
        estimate,
    )
}

fn estimate(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient_id = input::parse_id("Patient ID", &values[0])?;
    let plan = input::parse_services(&values[1])?;
    let coverage = coverage(registry, patient_id, &values[2])?;

    let estimate = registry.calculate_treatment_cost(patient_id, &plan, coverage)?;
    Ok(Outcome::message(format!(
        "Estimated cost for {}: {:.2}",
        estimate.patient_name, estimate.total
    ))
    .with_details(report::treatment_cost(&estimate)))
}

pub fn history_form() -> Form {
    Form::new(
        "Billing History",
        vec![Field::required("Patient ID", "")],
        history,
    )
}

fn history(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let patient_id = input::parse_id("Patient ID", &values[0])?;
    let bills = registry.bills_for_patient(patient_id)?;
    if bills.is_empty() {
        return Ok(Outcome::message(format!(
            "No bills issued to patient {patient_id}"
        )));
    }

    let mut details = Vec::new();
    for bill in &bills {
        details.push(format!(
            "Bill #{} ({} to {}): total {:.2}, due {:.2}",
            bill.id,
            dates::short_date(bill.admission_date),
            dates::short_date(bill.discharge_date),
            bill.total,
            bill.due
        ));
    }
    let due: f64 = bills.iter().map(|b| b.due).sum();
    Ok(Outcome::message(format!(
        "{} bill(s), {:.2} due in total",
        bills.len(),
        due
    ))
    .with_details(details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    fn discharged() -> Registry {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(183, "Alex"))
            .unwrap();
        let admitted = dates::parse_date("02-07-2025").unwrap();
        let left = dates::parse_date("07-07-2025").unwrap();
        registry
            .assign_room(183, "private room", admitted, 5)
            .unwrap();
        registry
            .manage_discharge_process(183, admitted, left, "Rest")
            .unwrap();
        registry
    }

    #[test]
    fn blank_coverage_uses_the_policy() {
        let mut registry = discharged();
        let form = ["183", "Room Charges=15000; X-Ray=800", ""].map(String::from);
        let outcome = process(&mut registry, &form).unwrap();
        assert_eq!(outcome.message, "Bill #1 issued to Alex");
        assert!(outcome
            .details
            .contains(&"Insurance (80%): 12640.00".to_string()));

        let outcome = history(&mut registry, &["183".to_string()]).unwrap();
        assert_eq!(outcome.message, "1 bill(s), 3160.00 due in total");
        assert_eq!(
            outcome.details,
            ["Bill #1 (02-07-2025 to 07-07-2025): total 15800.00, due 3160.00"]
        );
    }

    #[test]
    fn billing_before_discharge_is_refused() {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(7, "Romi"))
            .unwrap();
        let form = ["7", "X-Ray=800", "70"].map(String::from);
        let err = process(&mut registry, &form).unwrap_err();
        assert!(err.to_string().contains("no room assignment and discharge"));

        let outcome = estimate(&mut registry, &form).unwrap();
        assert_eq!(outcome.message, "Estimated cost for Romi: 800.00");
        assert!(outcome
            .details
            .contains(&"Patient responsibility: 240.00".to_string()));

        let outcome = history(&mut registry, &["7".to_string()]).unwrap();
        assert_eq!(outcome.message, "No bills issued to patient 7");
    }
}

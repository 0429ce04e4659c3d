use crate::components::form::{Field, Form, Outcome};
use crate::dates;
use crate::db::Registry;
use crate::report;
use anyhow::Result;

pub fn efficiency_form() -> Form {
    Form::new(
        "Hospital Efficiency",
        vec![
            Field::required(
                "Metric",
                "average_length_of_stay, bed_occupancy_rate, patient_throughput",
            ),
            Field::required("Start Date", "DD-MM-YYYY"),
            Field::required("End Date", "DD-MM-YYYY"),
        ],
        analyze,
    )
}

fn analyze(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    let start = dates::parse_date(&values[1])?;
    let end = dates::parse_date(&values[2])?;

    let report = registry.analyze_hospital_efficiency(&values[0], start, end)?;
    Ok(Outcome::message(format!(
        "{} over {} patient(s)",
        report.metric, report.total_patients
    ))
    .with_details(report::efficiency(&report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    #[test]
    fn reports_the_chosen_metric() {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(183, "Alex"))
            .unwrap();
        let admitted = dates::parse_date("02-07-2025").unwrap();
        let left = dates::parse_date("07-07-2025").unwrap();
        registry
            .manage_discharge_process(183, admitted, left, "Rest")
            .unwrap();

        let form = ["patient_throughput", "01-07-2025", "07-07-2025"].map(String::from);
        let outcome = analyze(&mut registry, &form).unwrap();
        assert_eq!(outcome.message, "patient_throughput over 1 patient(s)");
        assert_eq!(
            outcome.details,
            ["Period: 01-07-2025 to 07-07-2025", "Patient Throughput: 1 patients"]
        );

        let form = ["bed_turnover", "01-07-2025", "07-07-2025"].map(String::from);
        let err = analyze(&mut registry, &form).unwrap_err();
        assert!(err.to_string().contains("Invalid metric 'bed_turnover'"));
    }

    #[test]
    fn empty_window_has_no_data() {
        let mut registry = fixtures::registry();
        let form = ["average_length_of_stay", "01-07-2025", "07-07-2025"].map(String::from);
        let err = analyze(&mut registry, &form).unwrap_err();
        assert!(err.to_string().contains("No patient data available"));
    }
}

use crate::components::form::{Field, Form, Outcome};
use crate::components::table::TableView;
use crate::dates;
use crate::db::Registry;
use crate::input;
use crate::models::Medication;
use anyhow::Result;
use time::Date;

pub fn stock_form() -> Form {
    Form::new(
        "Medication Stock",
        vec![
            Field::required("Medication ID", "e.g. 501"),
            Field::required("Quantity", "units on hand"),
            Field::required("Expiry Date", "DD-MM-YYYY"),
            Field::required("Supplier", "e.g. MedSupply Co."),
        ],
        stock,
    )
}

fn stock(registry: &mut Registry, values: &[String]) -> Result<Outcome> {
    stock_on(registry, values, dates::today())
}

fn stock_on(registry: &mut Registry, values: &[String], today: Date) -> Result<Outcome> {
    let medication = Medication {
        id: input::parse_id("Medication ID", &values[0])?,
        quantity: input::parse_count("Quantity", &values[1])?,
        expiry_date: dates::parse_date(&values[2])?,
        supplier: values[3].trim().to_string(),
    };
    registry.track_medication_inventory(&medication, today)?;

    Ok(Outcome::message(format!(
        "Medication {} stocked: {} unit(s)",
        medication.id, medication.quantity
    ))
    .with_details(vec![
        format!("Expires: {}", dates::long_date(medication.expiry_date)),
        format!("Supplier: {}", medication.supplier),
    ]))
}

pub fn inventory_list() -> TableView {
    TableView::new(
        "Medication Inventory",
        &[
            ("ID", 10),
            ("Quantity", 12),
            ("Expiry", 16),
            ("Supplier", 30),
        ],
        |registry| {
            Ok(registry
                .get_all_medications()?
                .into_iter()
                .map(|m| {
                    vec![
                        m.id.to_string(),
                        m.quantity.to_string(),
                        dates::short_date(m.expiry_date),
                        m.supplier,
                    ]
                })
                .collect())
        },
    )
}

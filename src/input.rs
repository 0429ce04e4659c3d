//! Parsers for the text typed into forms.
//!
//! List-valued fields use one line with `;` between entries:
//!
//! - services and treatment plans: `name=cost; name=cost`
//! - prescriptions: `medicine|dosage|frequency; ...`
//! - shift schedules: `day|shift|start|end|location; ...`
//! - vitals: `name=value; ...`

use crate::models::{Prescription, ServiceCharge, ShiftEntry};
use anyhow::{bail, Context, Result};

fn entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|entry| !entry.is_empty())
}

fn columns<const N: usize>(entry: &str, shape: &str) -> Result<[String; N]> {
    let parts: Vec<String> = entry.split('|').map(|p| p.trim().to_string()).collect();
    match <[String; N]>::try_from(parts) {
        Ok(columns) => Ok(columns),
        Err(_) => bail!("'{entry}' should look like {shape}"),
    }
}

pub fn parse_id(label: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{label} must be a whole number"))
}

pub fn parse_count(label: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .with_context(|| format!("{label} must be a non-negative whole number"))
}

/// Coverage percentage; blank means none.
pub fn parse_percent(raw: &str) -> Result<f64> {
    let raw = raw.trim().trim_end_matches('%').trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse().context("Coverage must be a number")
}

pub fn parse_services(raw: &str) -> Result<Vec<ServiceCharge>> {
    let services = entries(raw)
        .map(|entry| {
            let Some((name, cost)) = entry.rsplit_once('=') else {
                bail!("'{entry}' should look like name=cost");
            };
            let cost: f64 = cost
                .trim()
                .parse()
                .with_context(|| format!("Cost of '{}' is not a number", name.trim()))?;
            Ok(ServiceCharge {
                name: name.trim().to_string(),
                cost,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if services.is_empty() {
        bail!("At least one service is required");
    }
    Ok(services)
}

pub fn parse_prescriptions(raw: &str) -> Result<Vec<Prescription>> {
    entries(raw)
        .map(|entry| {
            let [medicine, dosage, frequency] =
                columns::<3>(entry, "medicine|dosage|frequency")?;
            Ok(Prescription {
                medicine,
                dosage,
                frequency,
            })
        })
        .collect()
}

pub fn parse_schedule(raw: &str) -> Result<Vec<ShiftEntry>> {
    entries(raw)
        .map(|entry| {
            let [day, shift, start, end, location] =
                columns::<5>(entry, "day|shift|start|end|location")?;
            Ok(ShiftEntry {
                day,
                shift,
                start,
                end,
                location,
            })
        })
        .collect()
}

pub fn parse_vitals(raw: &str) -> Result<Vec<(String, String)>> {
    entries(raw)
        .map(|entry| match entry.split_once('=') {
            Some((name, value)) => Ok((name.trim().to_string(), value.trim().to_string())),
            None => bail!("'{entry}' should look like name=value"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn services_keep_their_order() {
        let services =
            parse_services("Room Charges (5 days)=15000; Doctor Charges=2000;X-Ray = 800;")
                .unwrap();
        let names: Vec<_> = services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Room Charges (5 days)", "Doctor Charges", "X-Ray"]);
        assert_eq!(services[2].cost, 800.0);
    }

    #[test]
    fn services_reject_bad_costs_and_empty_lists() {
        assert!(parse_services("X-Ray=cheap").is_err());
        assert!(parse_services("X-Ray").is_err());
        assert!(parse_services(" ; ").is_err());
    }

    #[test]
    fn prescriptions_need_three_columns() {
        let items = parse_prescriptions("Ibuprofen|500mg|Twice a day; Shelcal|500mg|Once a day")
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].frequency, "Once a day");
        assert!(parse_prescriptions("Ibuprofen|500mg").is_err());
        assert!(parse_prescriptions("").unwrap().is_empty());
    }

    #[test]
    fn schedule_entries() {
        let schedule =
            parse_schedule("Monday|Morning|08:00|14:00|OPD; Sunday|Off|-|-|-").unwrap();
        assert_eq!(schedule[0].location, "OPD");
        assert_eq!(schedule[1].shift, "Off");
        assert!(parse_schedule("Monday|Morning").is_err());
    }

    #[test]
    fn vitals_and_numbers() {
        let vitals = parse_vitals("xray=X-Ray; ecg = ECG").unwrap();
        assert_eq!(vitals[1], ("ecg".to_string(), "ECG".to_string()));
        assert!(parse_vitals("xray").is_err());

        assert_eq!(parse_percent("80%").unwrap(), 80.0);
        assert_eq!(parse_percent("").unwrap(), 0.0);
        assert!(parse_percent("most").is_err());
        assert_eq!(parse_id("Patient ID", " 183 ").unwrap(), 183);
        assert!(parse_count("Beds", "-1").is_err());
    }
}

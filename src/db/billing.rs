//! Billing and treatment cost estimates.

use super::{date_column, require_patient, Registry};
use crate::dates;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{BillingRecord, ServiceCharge, TreatmentCost};
use rusqlite::params;
use tracing::{info, warn};

/// Splits `total` into the insured and the patient's share.
///
/// A zero percentage means no coverage. Percentages outside 0-100 are
/// applied as given, so anything above 100 leaves a negative amount due.
pub fn apply_coverage(total: f64, coverage_percent: f64) -> (f64, f64) {
    if coverage_percent != 0.0 {
        let covered = total * coverage_percent / 100.0;
        (covered, total - covered)
    } else {
        (0.0, total)
    }
}

fn sum_services(services: &[ServiceCharge]) -> f64 {
    services.iter().map(|s| s.cost).sum()
}

impl Registry {
    /// Bills a completed stay and stores the result.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::PatientNotFound`] if the patient is unknown.
    /// - [`RegistryError::MissingStay`] unless the patient's latest room
    ///   assignment has been released by a discharge dated on or after it.
    ///   A readmitted patient still in a bed cannot be billed.
    pub fn process_billing(
        &mut self,
        patient_id: i64,
        services: &[ServiceCharge],
        coverage_percent: f64,
    ) -> RegistryResult<BillingRecord> {
        let patient = require_patient(&self.conn, patient_id)?;
        let (Some(assignment), Some(discharge)) = (
            self.room_assignment(patient_id)?,
            self.discharge_record(patient_id)?,
        ) else {
            return Err(RegistryError::MissingStay(patient_id));
        };
        if assignment.active || discharge.discharge_date < assignment.admission_date {
            warn!(patient_id, "billing an open stay");
            return Err(RegistryError::MissingStay(patient_id));
        }

        let total = sum_services(services);
        let (covered, due) = apply_coverage(total, coverage_percent);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO bills (patient_id, coverage_percent, total, covered, due, admission_date, discharge_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                patient_id,
                coverage_percent,
                total,
                covered,
                due,
                dates::to_iso_date(assignment.admission_date),
                dates::to_iso_date(discharge.discharge_date)
            ],
        )?;
        let id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO bill_items (bill_id, position, service, cost) VALUES (?, ?, ?, ?)",
            )?;
            for (position, service) in services.iter().enumerate() {
                stmt.execute(params![id, position as i64, service.name, service.cost])?;
            }
        }
        tx.commit()?;

        info!(patient_id, bill_id = id, total, covered, due, "bill processed");

        Ok(BillingRecord {
            id,
            patient_id,
            patient_name: patient.name,
            services: services.to_vec(),
            coverage_percent,
            total,
            covered,
            due,
            admission_date: assignment.admission_date,
            discharge_date: discharge.discharge_date,
        })
    }

    /// Estimates a treatment plan without storing anything.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PatientNotFound`] if the patient is unknown.
    pub fn calculate_treatment_cost(
        &self,
        patient_id: i64,
        plan: &[ServiceCharge],
        coverage_percent: f64,
    ) -> RegistryResult<TreatmentCost> {
        let patient = require_patient(&self.conn, patient_id)?;
        let total = sum_services(plan);
        let (covered, due) = apply_coverage(total, coverage_percent);

        Ok(TreatmentCost {
            patient_id,
            patient_name: patient.name,
            coverage_percent,
            total,
            covered,
            due,
            admission_date: self.room_assignment(patient_id)?.map(|a| a.admission_date),
            discharge_date: self.discharge_record(patient_id)?.map(|d| d.discharge_date),
        })
    }

    /// Every bill issued to the patient, oldest first, with the stay dates
    /// it was issued for.
    pub fn bills_for_patient(&self, patient_id: i64) -> RegistryResult<Vec<BillingRecord>> {
        let patient = require_patient(&self.conn, patient_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, coverage_percent, total, covered, due, admission_date, discharge_date \
             FROM bills WHERE patient_id = ? ORDER BY id",
        )?;
        let headers = stmt
            .query_map(params![patient_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    date_column(row, 5)?,
                    date_column(row, 6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut items = self.conn.prepare(
            "SELECT service, cost FROM bill_items WHERE bill_id = ? ORDER BY position",
        )?;
        let mut bills = Vec::with_capacity(headers.len());
        for (id, coverage_percent, total, covered, due, admission_date, discharge_date) in headers {
            let services = items
                .query_map(params![id], |row| {
                    Ok(ServiceCharge {
                        name: row.get(0)?,
                        cost: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            bills.push(BillingRecord {
                id,
                patient_id,
                patient_name: patient.name.clone(),
                services,
                coverage_percent,
                total,
                covered,
                due,
                admission_date,
                discharge_date,
            });
        }
        Ok(bills)
    }
}

//! Medication inventory.

use super::{date_column, Registry};
use crate::dates;
use crate::error::{RegistryError, RegistryResult};
use crate::models::Medication;
use rusqlite::params;
use time::Date;
use tracing::{info, warn};

impl Registry {
    /// Records stock of a medication, replacing any previous entry with the
    /// same id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MedicationExpired`] if `expiry_date` is before
    /// `today`. Stock expiring today is still accepted.
    pub fn track_medication_inventory(
        &mut self,
        medication: &Medication,
        today: Date,
    ) -> RegistryResult<()> {
        if medication.expiry_date < today {
            warn!(medication_id = medication.id, "expired medication rejected");
            return Err(RegistryError::MedicationExpired(medication.id));
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO medications (id, quantity, expiry_date, supplier) VALUES (?, ?, ?, ?)",
            params![
                medication.id,
                medication.quantity,
                dates::to_iso_date(medication.expiry_date),
                medication.supplier
            ],
        )?;

        info!(
            medication_id = medication.id,
            quantity = medication.quantity,
            "medication stocked"
        );
        Ok(())
    }

    pub fn get_all_medications(&self) -> RegistryResult<Vec<Medication>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, quantity, expiry_date, supplier FROM medications ORDER BY id")?;
        let medications = stmt
            .query_map([], |row| {
                Ok(Medication {
                    id: row.get(0)?,
                    quantity: row.get(1)?,
                    expiry_date: date_column(row, 2)?,
                    supplier: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(medications)
    }
}

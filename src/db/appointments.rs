//! Appointment scheduling.

use super::{date_time_column, require_patient, require_staff, Registry};
use crate::dates;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{Appointment, DoctorSchedule};
use rusqlite::{params, Row};
use time::{Date, PrimitiveDateTime};
use tracing::{info, warn};

impl Registry {
    /// Books an appointment between a registered patient and a staff member.
    ///
    /// On success the patient's current doctor becomes `doctor_id` and a
    /// `Registered` patient moves to `Scheduled`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::PatientNotFound`] / [`RegistryError::StaffNotFound`]
    ///   if either side is unknown.
    /// - [`RegistryError::AppointmentConflict`] if the doctor is already
    ///   booked at exactly `scheduled_at`. Nothing is recorded.
    pub fn schedule_appointment(
        &mut self,
        patient_id: i64,
        doctor_id: i64,
        scheduled_at: PrimitiveDateTime,
        kind: &str,
    ) -> RegistryResult<Appointment> {
        let tx = self.conn.transaction()?;

        let patient = require_patient(&tx, patient_id)?;
        let doctor = require_staff(&tx, doctor_id)?;

        let slot = dates::to_iso_date_time(scheduled_at);
        let booked: i64 = tx.query_row(
            "SELECT COUNT(*) FROM appointments WHERE doctor_id = ? AND scheduled_at = ?",
            params![doctor_id, slot],
            |row| row.get(0),
        )?;
        if booked > 0 {
            warn!(doctor_id, at = %slot, "appointment conflict");
            return Err(RegistryError::AppointmentConflict {
                doctor_id,
                at: dates::short_date_time(scheduled_at),
            });
        }

        tx.execute(
            "INSERT INTO appointments (patient_id, doctor_id, scheduled_at, kind) VALUES (?, ?, ?, ?)",
            params![patient_id, doctor_id, slot, kind],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE patients SET doctor_id = ?, status = ? WHERE id = ?",
            params![doctor_id, patient.status.on_appointment().as_str(), patient_id],
        )?;

        tx.commit()?;
        info!(patient_id, doctor_id, doctor = %doctor.name, at = %slot, "appointment scheduled");

        Ok(Appointment {
            id,
            patient_id,
            doctor_id,
            scheduled_at,
            kind: kind.to_string(),
        })
    }

    /// Retrieves a doctor's appointments on `day`, ordered by time.
    ///
    /// An empty list means the doctor has nothing booked that day.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::StaffNotFound`] if the doctor is unknown.
    pub fn doctors_schedule(&self, doctor_id: i64, day: Date) -> RegistryResult<DoctorSchedule> {
        let doctor = require_staff(&self.conn, doctor_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, patient_id, doctor_id, scheduled_at, kind FROM appointments \
             WHERE doctor_id = ? AND substr(scheduled_at, 1, 10) = ? ORDER BY scheduled_at, id",
        )?;
        let appointments = stmt
            .query_map(
                params![doctor_id, dates::to_iso_date(day)],
                appointment_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DoctorSchedule {
            doctor,
            day,
            appointments,
        })
    }

    /// Retrieves every appointment in booking order.
    pub fn get_all_appointments(&self) -> RegistryResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, patient_id, doctor_id, scheduled_at, kind FROM appointments ORDER BY id",
        )?;
        let appointments = stmt
            .query_map([], appointment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(appointments)
    }

    /// Whether the patient has ever been booked with this doctor.
    pub fn has_appointment(&self, patient_id: i64, doctor_id: i64) -> RegistryResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM appointments WHERE patient_id = ? AND doctor_id = ?",
            params![patient_id, doctor_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        scheduled_at: date_time_column(row, 3)?,
        kind: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::db::fixtures;
    use crate::error::RegistryError;
    use crate::models::PatientStatus;
    use time::macros::{date, datetime};

    fn seeded() -> crate::db::Registry {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(183, "Alex"))
            .unwrap();
        registry
            .register_patient(&fixtures::patient(123, "Romi"))
            .unwrap();
        registry
            .add_medical_staff(&fixtures::doctor(101143, "Dr. Santosh"))
            .unwrap();
        registry
    }

    #[test]
    fn scheduling_sets_the_current_doctor() {
        let mut registry = seeded();
        let appointment = registry
            .schedule_appointment(183, 101143, datetime!(2025 - 07 - 01 9:00), "Follow Up")
            .unwrap();
        assert_eq!(appointment.kind, "Follow Up");

        let patient = registry.get_patient(183).unwrap();
        assert_eq!(patient.doctor_id, Some(101143));
        assert_eq!(patient.status, PatientStatus::Scheduled);
        assert!(registry.has_appointment(183, 101143).unwrap());
    }

    #[test]
    fn same_doctor_same_slot_is_a_conflict() {
        let mut registry = seeded();
        let slot = datetime!(2025 - 07 - 01 9:00);
        registry
            .schedule_appointment(183, 101143, slot, "Follow Up")
            .unwrap();

        let err = registry
            .schedule_appointment(123, 101143, slot, "Consultation")
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::AppointmentConflict {
                doctor_id: 101143,
                ..
            }
        ));
        assert_eq!(registry.get_all_appointments().unwrap().len(), 1);
        assert_eq!(registry.get_patient(123).unwrap().doctor_id, None);
        assert_eq!(
            registry.get_patient(123).unwrap().status,
            PatientStatus::Registered
        );
    }

    #[test]
    fn different_slots_do_not_conflict() {
        let mut registry = seeded();
        registry
            .schedule_appointment(183, 101143, datetime!(2025 - 07 - 01 9:00), "Follow Up")
            .unwrap();
        registry
            .schedule_appointment(123, 101143, datetime!(2025 - 07 - 01 9:30), "Consultation")
            .unwrap();
        assert_eq!(registry.get_all_appointments().unwrap().len(), 2);
    }

    #[test]
    fn unknown_patient_or_doctor_is_rejected() {
        let mut registry = seeded();
        let slot = datetime!(2025 - 07 - 01 9:00);
        assert!(matches!(
            registry.schedule_appointment(999, 101143, slot, "Consultation"),
            Err(RegistryError::PatientNotFound(999))
        ));
        assert!(matches!(
            registry.schedule_appointment(183, 7, slot, "Consultation"),
            Err(RegistryError::StaffNotFound(7))
        ));
        assert!(registry.get_all_appointments().unwrap().is_empty());
    }

    #[test]
    fn schedule_lists_only_that_day_in_time_order() {
        let mut registry = seeded();
        registry
            .schedule_appointment(183, 101143, datetime!(2025 - 07 - 01 14:00), "Follow Up")
            .unwrap();
        registry
            .schedule_appointment(123, 101143, datetime!(2025 - 07 - 01 8:30), "Consultation")
            .unwrap();
        registry
            .schedule_appointment(123, 101143, datetime!(2025 - 07 - 02 8:30), "Review")
            .unwrap();

        let schedule = registry
            .doctors_schedule(101143, date!(2025 - 07 - 01))
            .unwrap();
        let kinds: Vec<_> = schedule
            .appointments
            .iter()
            .map(|a| a.kind.as_str())
            .collect();
        assert_eq!(kinds, ["Consultation", "Follow Up"]);

        let empty = registry
            .doctors_schedule(101143, date!(2025 - 07 - 05))
            .unwrap();
        assert!(empty.appointments.is_empty());
    }
}

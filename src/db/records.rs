//! Medical records and patient reports.

use super::{find_staff, require_patient, Registry};
use crate::error::{RegistryError, RegistryResult};
use crate::models::{MedicalRecord, PatientReport, Prescription};
use rusqlite::{params, OptionalExtension};
use tracing::{info, warn};

impl Registry {
    /// Stores the patient's active medical record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoAppointment`] unless the patient has been
    /// booked with `record.doctor_id` at least once. No record is created.
    pub fn create_medical_record(&mut self, record: &MedicalRecord) -> RegistryResult<()> {
        if !self.has_appointment(record.patient_id, record.doctor_id)? {
            warn!(
                patient_id = record.patient_id,
                doctor_id = record.doctor_id,
                "medical record without appointment"
            );
            return Err(RegistryError::NoAppointment {
                patient_id: record.patient_id,
                doctor_id: record.doctor_id,
            });
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM prescriptions WHERE patient_id = ?",
            params![record.patient_id],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO medical_records (patient_id, doctor_id, diagnosis, treatment) VALUES (?, ?, ?, ?)",
            params![
                record.patient_id,
                record.doctor_id,
                record.diagnosis,
                record.treatment
            ],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO prescriptions (patient_id, position, medicine, dosage, frequency) VALUES (?, ?, ?, ?, ?)",
            )?;
            for (position, item) in record.prescription.iter().enumerate() {
                stmt.execute(params![
                    record.patient_id,
                    position as i64,
                    item.medicine,
                    item.dosage,
                    item.frequency
                ])?;
            }
        }
        tx.commit()?;

        info!(patient_id = record.patient_id, "medical record created");
        Ok(())
    }

    /// Retrieves the patient's active medical record.
    pub fn get_medical_record(&self, patient_id: i64) -> RegistryResult<Option<MedicalRecord>> {
        let header: Option<(i64, String, String)> = self
            .conn
            .query_row(
                "SELECT doctor_id, diagnosis, treatment FROM medical_records WHERE patient_id = ?",
                params![patient_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((doctor_id, diagnosis, treatment)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT medicine, dosage, frequency FROM prescriptions WHERE patient_id = ? ORDER BY position",
        )?;
        let prescription = stmt
            .query_map(params![patient_id], |row| {
                Ok(Prescription {
                    medicine: row.get(0)?,
                    dosage: row.get(1)?,
                    frequency: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(MedicalRecord {
            patient_id,
            doctor_id,
            diagnosis,
            treatment,
            prescription,
        }))
    }

    /// Gathers everything printed on a patient report.
    ///
    /// The attending doctor is the patient's current doctor, falling back to
    /// the doctor on the medical record.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::PatientNotFound`] if the patient is unknown.
    /// - [`RegistryError::NoMedicalRecord`] if no record has been created yet.
    pub fn generate_patient_report(
        &self,
        patient_id: i64,
        vitals: &[(String, String)],
    ) -> RegistryResult<PatientReport> {
        let patient = require_patient(&self.conn, patient_id)?;
        let record = self
            .get_medical_record(patient_id)?
            .ok_or(RegistryError::NoMedicalRecord(patient_id))?;

        let doctor_id = patient.doctor_id.unwrap_or(record.doctor_id);
        let attending = find_staff(&self.conn, doctor_id)?;
        let room = self.room_assignment(patient_id)?;

        Ok(PatientReport {
            patient,
            room,
            attending,
            record,
            vitals: vitals.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::fixtures;
    use crate::error::RegistryError;
    use crate::models::{MedicalRecord, Prescription};
    use time::macros::{date, datetime};

    fn fracture_record(doctor_id: i64) -> MedicalRecord {
        MedicalRecord {
            patient_id: 183,
            doctor_id,
            diagnosis: "Hairline fracture in radius bone".to_string(),
            treatment: "Immobilization, physiotherapy".to_string(),
            prescription: vec![
                Prescription {
                    medicine: "Ibuprofen".to_string(),
                    dosage: "500mg".to_string(),
                    frequency: "Twice a day".to_string(),
                },
                Prescription {
                    medicine: "Shelcal".to_string(),
                    dosage: "500mg".to_string(),
                    frequency: "Once a day".to_string(),
                },
            ],
        }
    }

    fn seeded() -> crate::db::Registry {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(183, "Alex"))
            .unwrap();
        registry
            .add_medical_staff(&fixtures::doctor(101143, "Dr. Santosh"))
            .unwrap();
        registry
            .add_medical_staff(&fixtures::doctor(101123, "Dr. Subhash Rao"))
            .unwrap();
        registry
    }

    #[test]
    fn record_requires_an_appointment_with_that_doctor() {
        let mut registry = seeded();
        let err = registry
            .create_medical_record(&fracture_record(101143))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NoAppointment { .. }));
        assert!(err.to_string().contains("register the patient"));
        assert!(registry.get_medical_record(183).unwrap().is_none());

        registry
            .schedule_appointment(183, 101123, datetime!(2025 - 07 - 01 9:00), "Consultation")
            .unwrap();
        assert!(registry
            .create_medical_record(&fracture_record(101143))
            .is_err());
        assert!(registry.get_medical_record(183).unwrap().is_none());
    }

    #[test]
    fn a_new_record_replaces_the_previous_one() {
        let mut registry = seeded();
        registry
            .schedule_appointment(183, 101143, datetime!(2025 - 07 - 01 9:00), "Follow Up")
            .unwrap();
        registry
            .create_medical_record(&fracture_record(101143))
            .unwrap();

        let mut revised = fracture_record(101143);
        revised.diagnosis = "Healing fracture".to_string();
        revised.prescription.truncate(1);
        registry.create_medical_record(&revised).unwrap();

        let stored = registry.get_medical_record(183).unwrap().unwrap();
        assert_eq!(stored, revised);
    }

    #[test]
    fn report_needs_a_medical_record() {
        let registry = seeded();
        assert!(matches!(
            registry.generate_patient_report(183, &[]),
            Err(RegistryError::NoMedicalRecord(183))
        ));
    }

    #[test]
    fn report_status_follows_the_visit() {
        let mut registry = seeded();
        registry
            .schedule_appointment(183, 101143, datetime!(2025 - 07 - 01 9:00), "Follow Up")
            .unwrap();
        registry
            .create_medical_record(&fracture_record(101143))
            .unwrap();
        let vitals = vec![("xray".to_string(), "X-Ray".to_string())];

        let report = registry.generate_patient_report(183, &vitals).unwrap();
        assert_eq!(report.care_status(), "Outpatient");
        assert!(report.room.is_none());
        assert_eq!(report.attending.as_ref().unwrap().name, "Dr. Santosh");
        assert_eq!(report.vitals, vitals);

        registry
            .assign_room(183, "private room", date!(2025 - 07 - 02), 5)
            .unwrap();
        let report = registry.generate_patient_report(183, &vitals).unwrap();
        assert_eq!(report.care_status(), "Inpatient");

        registry
            .manage_discharge_process(183, date!(2025 - 07 - 02), date!(2025 - 07 - 07), "Rest")
            .unwrap();
        let report = registry.generate_patient_report(183, &vitals).unwrap();
        assert_eq!(report.care_status(), "Discharged");
        assert_eq!(
            report.room.unwrap().admission_date,
            date!(2025 - 07 - 02)
        );
        assert_eq!(report.record.prescription.len(), 2);
    }
}

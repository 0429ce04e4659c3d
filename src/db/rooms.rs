//! Bed bookkeeping: room assignment, emergency admission and discharge.
//!
//! Available beds only move through the guarded `UPDATE`s below, and the
//! table's CHECK constraint keeps them within `[0, total_beds]`.

use super::{date_column, find_patient, normalize_room, require_patient, require_room, Registry};
use crate::config::EMERGENCY_ROOM;
use crate::dates;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{DischargeRecord, EmergencyAdmission, PatientStatus, RoomAssignment, Stay};
use rusqlite::{params, Connection, OptionalExtension, Row};
use time::Date;
use tracing::{info, warn};

impl Registry {
    /// Puts a patient in a bed of the requested category.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::PatientNotFound`] if the patient is unknown.
    /// - [`RegistryError::UnknownRoomType`] if no category matches
    ///   (case-insensitive).
    /// - [`RegistryError::AlreadyAdmitted`] if the patient already holds a bed.
    /// - [`RegistryError::RoomUnavailable`] if the category has no free bed.
    pub fn assign_room(
        &mut self,
        patient_id: i64,
        room_type: &str,
        admission_date: Date,
        expected_days: u32,
    ) -> RegistryResult<RoomAssignment> {
        let tx = self.conn.transaction()?;
        let assignment = admit(&tx, patient_id, room_type, admission_date, Some(expected_days))?;
        tx.commit()?;

        info!(patient_id, room = %assignment.room_type, "room assigned");
        Ok(assignment)
    }

    /// Discharges a patient.
    ///
    /// If the patient holds a bed it is returned to its category and the
    /// patient's room is cleared. The discharge record and a stay summary
    /// for the efficiency analysis are always written.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PatientNotFound`] if the patient is unknown.
    pub fn manage_discharge_process(
        &mut self,
        patient_id: i64,
        admission_date: Date,
        discharge_date: Date,
        follow_up: &str,
    ) -> RegistryResult<DischargeRecord> {
        let tx = self.conn.transaction()?;
        let patient = require_patient(&tx, patient_id)?;

        if let Some(assignment) = active_assignment(&tx, patient_id)? {
            tx.execute(
                "UPDATE room_categories SET available_beds = available_beds + 1 WHERE name = ? AND available_beds < total_beds",
                params![assignment.room_type],
            )?;
            tx.execute(
                "UPDATE room_assignments SET active = 0 WHERE patient_id = ?",
                params![patient_id],
            )?;
            info!(patient_id, room = %assignment.room_type, "bed released");
        }

        tx.execute(
            "INSERT OR REPLACE INTO discharges (patient_id, discharge_date, follow_up) VALUES (?, ?, ?)",
            params![patient_id, dates::to_iso_date(discharge_date), follow_up],
        )?;
        tx.execute(
            "INSERT INTO stays (patient_id, admission_date, discharge_date) VALUES (?, ?, ?)",
            params![
                patient_id,
                dates::to_iso_date(admission_date),
                dates::to_iso_date(discharge_date)
            ],
        )?;
        tx.execute(
            "UPDATE patients SET room_type = NULL, status = ?, discharged_on = ? WHERE id = ?",
            params![
                PatientStatus::Discharged.as_str(),
                dates::to_iso_date(discharge_date),
                patient.id
            ],
        )?;

        tx.commit()?;
        info!(patient_id, "patient discharged");

        Ok(DischargeRecord {
            patient_id,
            discharge_date,
            follow_up: follow_up.to_string(),
        })
    }

    /// Admits a patient through the emergency department.
    ///
    /// Unknown ids get a placeholder record that a later
    /// [`Registry::register_patient`] call completes.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownRoomType`] if no emergency room is configured.
    /// - [`RegistryError::RoomUnavailable`] if it is full; nothing is recorded.
    /// - [`RegistryError::AlreadyAdmitted`] if the patient already holds a bed.
    pub fn manage_emergency_admission(
        &mut self,
        patient_id: i64,
        admission_date: Date,
        emergency_type: &str,
        severity: &str,
    ) -> RegistryResult<EmergencyAdmission> {
        let tx = self.conn.transaction()?;

        if find_patient(&tx, patient_id)?.is_none() {
            tx.execute(
                "INSERT INTO patients (id, name, medical_history, status, emergency) VALUES (?, ?, ?, ?, 1)",
                params![
                    patient_id,
                    format!("Emergency patient {patient_id}"),
                    "Emergency",
                    PatientStatus::Registered.as_str()
                ],
            )?;
        }

        admit(&tx, patient_id, EMERGENCY_ROOM, admission_date, None)?;
        tx.execute(
            "INSERT OR REPLACE INTO emergencies (patient_id, emergency_type, severity, admission_date) VALUES (?, ?, ?, ?)",
            params![
                patient_id,
                emergency_type,
                severity,
                dates::to_iso_date(admission_date)
            ],
        )?;
        tx.execute(
            "UPDATE patients SET emergency = 1 WHERE id = ?",
            params![patient_id],
        )?;

        tx.commit()?;
        warn!(patient_id, emergency_type, severity, "emergency admission");

        Ok(EmergencyAdmission {
            patient_id,
            admission_date,
            emergency_type: emergency_type.to_string(),
            severity: severity.to_string(),
        })
    }

    /// The patient's latest room assignment, released or not.
    pub fn room_assignment(&self, patient_id: i64) -> RegistryResult<Option<RoomAssignment>> {
        let assignment = self
            .conn
            .query_row(
                "SELECT patient_id, room_type, admission_date, expected_days, active FROM room_assignments WHERE patient_id = ?",
                params![patient_id],
                assignment_from_row,
            )
            .optional()?;
        Ok(assignment)
    }

    /// The patient's latest discharge record.
    pub fn discharge_record(&self, patient_id: i64) -> RegistryResult<Option<DischargeRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT patient_id, discharge_date, follow_up FROM discharges WHERE patient_id = ?",
                params![patient_id],
                |row| {
                    Ok(DischargeRecord {
                        patient_id: row.get(0)?,
                        discharge_date: date_column(row, 1)?,
                        follow_up: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Emergency details recorded for a patient, if any.
    pub fn emergency_admission(
        &self,
        patient_id: i64,
    ) -> RegistryResult<Option<EmergencyAdmission>> {
        let admission = self
            .conn
            .query_row(
                "SELECT patient_id, admission_date, emergency_type, severity FROM emergencies WHERE patient_id = ?",
                params![patient_id],
                |row| {
                    Ok(EmergencyAdmission {
                        patient_id: row.get(0)?,
                        admission_date: date_column(row, 1)?,
                        emergency_type: row.get(2)?,
                        severity: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(admission)
    }

    /// Every recorded stay in discharge order.
    pub fn stays(&self) -> RegistryResult<Vec<Stay>> {
        let mut stmt = self.conn.prepare(
            "SELECT patient_id, admission_date, discharge_date FROM stays ORDER BY id",
        )?;
        let stays = stmt
            .query_map([], |row| {
                Ok(Stay {
                    patient_id: row.get(0)?,
                    admission_date: date_column(row, 1)?,
                    discharge_date: date_column(row, 2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stays)
    }
}

/// Takes a bed for `patient_id` inside the caller's transaction.
fn admit(
    conn: &Connection,
    patient_id: i64,
    room_type: &str,
    admission_date: Date,
    expected_days: Option<u32>,
) -> RegistryResult<RoomAssignment> {
    let patient = require_patient(conn, patient_id)?;
    let room = require_room(conn, room_type)?;

    let Some(status) = patient.status.on_admission() else {
        warn!(patient_id, "patient already occupies a bed");
        return Err(RegistryError::AlreadyAdmitted(patient_id));
    };

    let taken = conn.execute(
        "UPDATE room_categories SET available_beds = available_beds - 1 WHERE name = ? AND available_beds > 0",
        params![room.name],
    )?;
    if taken == 0 {
        warn!(patient_id, room = %room.name, "no bed available");
        return Err(RegistryError::RoomUnavailable(room.name));
    }

    conn.execute(
        "INSERT OR REPLACE INTO room_assignments (patient_id, room_type, admission_date, expected_days, active) VALUES (?, ?, ?, ?, 1)",
        params![
            patient_id,
            room.name,
            dates::to_iso_date(admission_date),
            expected_days
        ],
    )?;
    conn.execute(
        "UPDATE patients SET room_type = ?, status = ?, admitted_on = ?, discharged_on = NULL WHERE id = ?",
        params![
            room.name,
            status.as_str(),
            dates::to_iso_date(admission_date),
            patient_id
        ],
    )?;

    Ok(RoomAssignment {
        patient_id,
        room_type: normalize_room(&room.name),
        admission_date,
        expected_days,
        active: true,
    })
}

fn active_assignment(conn: &Connection, patient_id: i64) -> RegistryResult<Option<RoomAssignment>> {
    let assignment = conn
        .query_row(
            "SELECT patient_id, room_type, admission_date, expected_days, active FROM room_assignments WHERE patient_id = ? AND active = 1",
            params![patient_id],
            assignment_from_row,
        )
        .optional()?;
    Ok(assignment)
}

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<RoomAssignment> {
    Ok(RoomAssignment {
        patient_id: row.get(0)?,
        room_type: row.get(1)?,
        admission_date: date_column(row, 2)?,
        expected_days: row.get(3)?,
        active: row.get(4)?,
    })
}

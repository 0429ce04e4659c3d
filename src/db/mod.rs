//! Registry module for Wardbook.
//!
//! The registry owns every record the front desk keeps: patients, staff,
//! appointments, room categories and the records derived from them. The
//! tables live in an in-memory SQLite database created from `schema.sql`;
//! nothing is written to disk. Operations are split by concern into the
//! submodules, all as methods on [`Registry`].

use crate::config::RoomSetup;
use crate::dates;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{
    is_doctor_role, Gender, InsuranceInfo, NewPatient, Patient, PatientStatus, PersonalInfo,
    RoomCategory, ShiftEntry, StaffMember,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use time::{Date, PrimitiveDateTime};
use tracing::{debug, info, warn};

mod analytics;
mod appointments;
mod billing;
mod pharmacy;
mod records;
mod rooms;

/// Columns read by [`patient_from_row`], in order.
const PATIENT_COLUMNS: &str = "id, name, age, gender, blood_type, medical_history, \
     insurance_provider, policy_number, coverage_percent, doctor_id, room_type, status, \
     admitted_on, discharged_on, emergency";

/// The hospital's in-memory record store.
pub struct Registry {
    conn: Connection,
}

impl Registry {
    /// Creates an empty registry with the given room categories.
    ///
    /// Room names are stored lowercased; lookups are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created or two categories
    /// share a name.
    pub fn new(rooms: &[RoomSetup]) -> RegistryResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;

        {
            let mut stmt = conn.prepare(
                "INSERT INTO room_categories (name, total_beds, nightly_price, available_beds) VALUES (?, ?, ?, ?)",
            )?;
            for room in rooms {
                stmt.execute(params![
                    normalize_room(&room.name),
                    room.beds,
                    room.nightly_price,
                    room.beds
                ])?;
            }
        }

        info!(categories = rooms.len(), "registry initialised");
        Ok(Self { conn })
    }

    /// Registers a new patient.
    ///
    /// An emergency placeholder (admitted before anyone took their details)
    /// is completed in place instead of being rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if the id is taken; the
    /// existing record is left untouched.
    pub fn register_patient(&mut self, patient: &NewPatient) -> RegistryResult<()> {
        let tx = self.conn.transaction()?;

        let existing: Option<(bool, Option<i64>)> = tx
            .query_row(
                "SELECT emergency, age FROM patients WHERE id = ?",
                params![patient.id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match existing {
            Some((true, None)) => {
                tx.execute(
                    "UPDATE patients SET name = ?, age = ?, gender = ?, blood_type = ?, medical_history = ?, insurance_provider = ?, policy_number = ?, coverage_percent = ? WHERE id = ?",
                    params![
                        patient.name,
                        patient.personal.age,
                        patient.personal.gender.as_str(),
                        patient.personal.blood_type,
                        patient.medical_history,
                        patient.insurance.provider,
                        patient.insurance.policy_number,
                        patient.insurance.coverage_percent,
                        patient.id,
                    ],
                )?;
                info!(patient_id = patient.id, "emergency placeholder completed");
            }
            Some(_) => {
                warn!(patient_id = patient.id, "patient already registered");
                return Err(RegistryError::AlreadyRegistered(patient.id));
            }
            None => {
                tx.execute(
                    "INSERT INTO patients (id, name, age, gender, blood_type, medical_history, insurance_provider, policy_number, coverage_percent, status) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    params![
                        patient.id,
                        patient.name,
                        patient.personal.age,
                        patient.personal.gender.as_str(),
                        patient.personal.blood_type,
                        patient.medical_history,
                        patient.insurance.provider,
                        patient.insurance.policy_number,
                        patient.insurance.coverage_percent,
                        PatientStatus::Registered.as_str(),
                    ],
                )?;
                info!(patient_id = patient.id, "patient registered");
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Adds a staff member and their ordered shift schedule.
    ///
    /// Staff whose role is "doctor" also appear in [`Registry::list_doctors`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::StaffExists`] if the id is taken.
    pub fn add_medical_staff(&mut self, staff: &StaffMember) -> RegistryResult<()> {
        let tx = self.conn.transaction()?;

        if find_staff(&tx, staff.id)?.is_some() {
            warn!(staff_id = staff.id, "staff member already exists");
            return Err(RegistryError::StaffExists(staff.id));
        }

        tx.execute(
            "INSERT INTO staff (id, name, role, department, contact, is_doctor) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                staff.id,
                staff.name,
                staff.role,
                staff.department,
                staff.contact,
                is_doctor_role(&staff.role),
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO shifts (staff_id, position, day, shift, start_time, end_time, location) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (position, entry) in staff.schedule.iter().enumerate() {
                stmt.execute(params![
                    staff.id,
                    position as i64,
                    entry.day,
                    entry.shift,
                    entry.start,
                    entry.end,
                    entry.location,
                ])?;
            }
        }

        tx.commit()?;
        info!(staff_id = staff.id, role = %staff.role, "staff member added");
        Ok(())
    }

    /// Retrieves a single patient by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PatientNotFound`] if no such patient exists.
    pub fn get_patient(&self, patient_id: i64) -> RegistryResult<Patient> {
        require_patient(&self.conn, patient_id)
    }

    /// Retrieves all patients ordered by id.
    pub fn get_all_patients(&self) -> RegistryResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id"))?;
        let patients = stmt
            .query_map([], patient_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(patients)
    }

    /// Retrieves a single staff member, schedule included.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::StaffNotFound`] if no such staff member exists.
    pub fn get_staff(&self, staff_id: i64) -> RegistryResult<StaffMember> {
        require_staff(&self.conn, staff_id)
    }

    /// Retrieves all staff members ordered by id.
    pub fn get_all_staff(&self) -> RegistryResult<Vec<StaffMember>> {
        self.staff_where("1 = 1")
    }

    /// Retrieves the doctor index: staff whose role is "doctor".
    pub fn list_doctors(&self) -> RegistryResult<Vec<StaffMember>> {
        self.staff_where("is_doctor = 1")
    }

    fn staff_where(&self, filter: &str) -> RegistryResult<Vec<StaffMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, role, department, contact FROM staff WHERE {filter} ORDER BY id"
        ))?;
        let mut staff = stmt
            .query_map([], staff_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        for member in &mut staff {
            member.schedule = load_schedule(&self.conn, member.id)?;
        }
        Ok(staff)
    }

    /// Retrieves every room category with its current availability.
    pub fn room_categories(&self) -> RegistryResult<Vec<RoomCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, total_beds, nightly_price, available_beds FROM room_categories ORDER BY name",
        )?;
        let rooms = stmt
            .query_map([], room_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rooms)
    }

    /// Retrieves one room category; the name is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownRoomType`] if no category matches.
    pub fn room_category(&self, name: &str) -> RegistryResult<RoomCategory> {
        require_room(&self.conn, name)
    }
}

pub(crate) fn normalize_room(name: &str) -> String {
    name.trim().to_lowercase()
}

fn find_patient(conn: &Connection, patient_id: i64) -> RegistryResult<Option<Patient>> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
            params![patient_id],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

fn require_patient(conn: &Connection, patient_id: i64) -> RegistryResult<Patient> {
    find_patient(conn, patient_id)?.ok_or_else(|| {
        debug!(patient_id, "patient lookup failed");
        RegistryError::PatientNotFound(patient_id)
    })
}

fn find_staff(conn: &Connection, staff_id: i64) -> RegistryResult<Option<StaffMember>> {
    let staff = conn
        .query_row(
            "SELECT id, name, role, department, contact FROM staff WHERE id = ?",
            params![staff_id],
            staff_from_row,
        )
        .optional()?;

    match staff {
        Some(mut member) => {
            member.schedule = load_schedule(conn, staff_id)?;
            Ok(Some(member))
        }
        None => Ok(None),
    }
}

fn require_staff(conn: &Connection, staff_id: i64) -> RegistryResult<StaffMember> {
    find_staff(conn, staff_id)?.ok_or_else(|| {
        debug!(staff_id, "staff lookup failed");
        RegistryError::StaffNotFound(staff_id)
    })
}

fn require_room(conn: &Connection, name: &str) -> RegistryResult<RoomCategory> {
    conn.query_row(
        "SELECT name, total_beds, nightly_price, available_beds FROM room_categories WHERE name = ?",
        params![normalize_room(name)],
        room_from_row,
    )
    .optional()?
    .ok_or_else(|| RegistryError::UnknownRoomType(name.to_string()))
}

fn load_schedule(conn: &Connection, staff_id: i64) -> RegistryResult<Vec<ShiftEntry>> {
    let mut stmt = conn.prepare(
        "SELECT day, shift, start_time, end_time, location FROM shifts WHERE staff_id = ? ORDER BY position",
    )?;
    let schedule = stmt
        .query_map(params![staff_id], |row| {
            Ok(ShiftEntry {
                day: row.get(0)?,
                shift: row.get(1)?,
                start: row.get(2)?,
                end: row.get(3)?,
                location: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(schedule)
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    let age: Option<u8> = row.get(2)?;
    let personal = match age {
        Some(age) => {
            let gender: String = row.get(3)?;
            Some(PersonalInfo {
                age,
                gender: gender.parse::<Gender>().map_err(|e| {
                    rusqlite::Error::InvalidColumnType(3, e, Type::Text)
                })?,
                blood_type: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        }
        None => None,
    };

    let provider: Option<String> = row.get(6)?;
    let insurance = match provider {
        Some(provider) => Some(InsuranceInfo {
            provider,
            policy_number: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            coverage_percent: row.get::<_, Option<f64>>(8)?.unwrap_or(0.0),
        }),
        None => None,
    };

    let status: String = row.get(11)?;
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        personal,
        medical_history: row.get(5)?,
        insurance,
        doctor_id: row.get(9)?,
        room_type: row.get(10)?,
        status: PatientStatus::parse(&status).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(11, format!("Invalid status: {status}"), Type::Text)
        })?,
        admitted_on: optional_date_column(row, 12)?,
        discharged_on: optional_date_column(row, 13)?,
        emergency: row.get(14)?,
    })
}

fn staff_from_row(row: &Row<'_>) -> rusqlite::Result<StaffMember> {
    Ok(StaffMember {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        department: row.get(3)?,
        contact: row.get(4)?,
        schedule: Vec::new(),
    })
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<RoomCategory> {
    Ok(RoomCategory {
        name: row.get(0)?,
        total_beds: row.get(1)?,
        nightly_price: row.get(2)?,
        available_beds: row.get(3)?,
    })
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Date> {
    let raw: String = row.get(idx)?;
    dates::from_iso_date(&raw).map_err(|_| {
        rusqlite::Error::InvalidColumnType(idx, format!("Invalid date: {raw}"), Type::Text)
    })
}

fn optional_date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Date>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        dates::from_iso_date(&raw).map_err(|_| {
            rusqlite::Error::InvalidColumnType(idx, format!("Invalid date: {raw}"), Type::Text)
        })
    })
    .transpose()
}

fn date_time_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<PrimitiveDateTime> {
    let raw: String = row.get(idx)?;
    dates::from_iso_date_time(&raw).map_err(|_| {
        rusqlite::Error::InvalidColumnType(idx, format!("Invalid date-time: {raw}"), Type::Text)
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Registry;
    use crate::config::{Config, RoomSetup};
    use crate::models::{Gender, InsuranceInfo, NewPatient, PersonalInfo, ShiftEntry, StaffMember};

    pub fn registry() -> Registry {
        Registry::new(&Config::default().rooms).unwrap()
    }

    pub fn registry_with_rooms(rooms: &[RoomSetup]) -> Registry {
        Registry::new(rooms).unwrap()
    }

    pub fn patient(id: i64, name: &str) -> NewPatient {
        NewPatient {
            id,
            name: name.to_string(),
            personal: PersonalInfo {
                age: 27,
                gender: Gender::Male,
                blood_type: "A+".to_string(),
            },
            medical_history: "Fracture".to_string(),
            insurance: InsuranceInfo {
                provider: "TX Health".to_string(),
                policy_number: "67677676".to_string(),
                coverage_percent: 80.0,
            },
        }
    }

    pub fn doctor(id: i64, name: &str) -> StaffMember {
        StaffMember {
            id,
            name: name.to_string(),
            role: "Doctor".to_string(),
            department: "Orthopaedics".to_string(),
            schedule: vec![
                ShiftEntry {
                    day: "Monday".to_string(),
                    shift: "Evening".to_string(),
                    start: "14:00".to_string(),
                    end: "20:00".to_string(),
                    location: "Ortho OPD".to_string(),
                },
                ShiftEntry {
                    day: "Tuesday".to_string(),
                    shift: "Morning".to_string(),
                    start: "08:00".to_string(),
                    end: "14:00".to_string(),
                    location: "Ward".to_string(),
                },
            ],
            contact: "7800978543".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures;
    use super::*;

    #[test]
    fn registers_a_patient_with_empty_derived_fields() {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(183, "Alex"))
            .unwrap();

        let patient = registry.get_patient(183).unwrap();
        assert_eq!(patient.name, "Alex");
        assert_eq!(patient.status, PatientStatus::Registered);
        assert_eq!(patient.doctor_id, None);
        assert_eq!(patient.room_type, None);
        assert_eq!(patient.discharged_on, None);
        assert_eq!(patient.personal.unwrap().blood_type, "A+");
        assert_eq!(patient.insurance.unwrap().coverage_percent, 80.0);
    }

    #[test]
    fn duplicate_registration_keeps_the_original() {
        let mut registry = fixtures::registry();
        registry
            .register_patient(&fixtures::patient(123, "Romi"))
            .unwrap();

        let err = registry
            .register_patient(&fixtures::patient(123, "Impostor"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered(123)));
        assert!(err.to_string().contains("already registered"));
        assert_eq!(registry.get_patient(123).unwrap().name, "Romi");
        assert_eq!(registry.get_all_patients().unwrap().len(), 1);
    }

    #[test]
    fn staff_keep_their_schedule_order() {
        let mut registry = fixtures::registry();
        registry
            .add_medical_staff(&fixtures::doctor(101143, "Dr. Santosh"))
            .unwrap();

        let staff = registry.get_staff(101143).unwrap();
        let days: Vec<_> = staff.schedule.iter().map(|s| s.day.as_str()).collect();
        assert_eq!(days, ["Monday", "Tuesday"]);
        assert!(staff.is_doctor());
    }

    #[test]
    fn duplicate_staff_is_rejected() {
        let mut registry = fixtures::registry();
        registry
            .add_medical_staff(&fixtures::doctor(1, "Dr. One"))
            .unwrap();
        let err = registry
            .add_medical_staff(&fixtures::doctor(1, "Dr. Two"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::StaffExists(1)));
        assert_eq!(registry.get_staff(1).unwrap().name, "Dr. One");
    }

    #[test]
    fn only_doctors_land_in_the_doctor_index() {
        let mut registry = fixtures::registry();
        registry
            .add_medical_staff(&fixtures::doctor(1, "Dr. One"))
            .unwrap();
        let mut nurse = fixtures::doctor(2, "Nurse Two");
        nurse.role = "Nurse".to_string();
        registry.add_medical_staff(&nurse).unwrap();

        assert_eq!(registry.get_all_staff().unwrap().len(), 2);
        let doctors = registry.list_doctors().unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].id, 1);
    }

    #[test]
    fn room_lookup_ignores_case() {
        let registry = fixtures::registry();
        let room = registry.room_category("Private Room").unwrap();
        assert_eq!(room.name, "private room");
        assert_eq!(room.available_beds, 15);
        assert!(matches!(
            registry.room_category("suite"),
            Err(RegistryError::UnknownRoomType(_))
        ));
    }
}

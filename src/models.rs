//! Data models for Wardbook.

use std::fmt;
use std::str::FromStr;
use time::{Date, PrimitiveDateTime};

/// Gender as recorded at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            "o" | "other" => Ok(Gender::Other),
            _ => Err(format!("Invalid gender '{value}'. Use Male, Female or Other")),
        }
    }
}

/// Demographics captured at the desk.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalInfo {
    pub age: u8,
    pub gender: Gender,
    pub blood_type: String,
}

/// Insurance details; `coverage_percent` is nominally 0-100 but never clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceInfo {
    pub provider: String,
    pub policy_number: String,
    pub coverage_percent: f64,
}

/// Where a patient is in their visit.
///
/// Legal transitions:
/// - `Registered` -> `Scheduled` when an appointment is booked.
/// - any status other than `Admitted` -> `Admitted` when a bed is assigned.
/// - any status -> `Discharged` on discharge.
///
/// Booking an appointment does not move `Admitted` or `Discharged` patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientStatus {
    Registered,
    Scheduled,
    Admitted,
    Discharged,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Registered => "Registered",
            PatientStatus::Scheduled => "Scheduled",
            PatientStatus::Admitted => "Admitted",
            PatientStatus::Discharged => "Discharged",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Registered" => Some(PatientStatus::Registered),
            "Scheduled" => Some(PatientStatus::Scheduled),
            "Admitted" => Some(PatientStatus::Admitted),
            "Discharged" => Some(PatientStatus::Discharged),
            _ => None,
        }
    }

    /// Status after an appointment is booked.
    pub fn on_appointment(self) -> Self {
        match self {
            PatientStatus::Registered => PatientStatus::Scheduled,
            other => other,
        }
    }

    /// Status after a bed is assigned, `None` when the patient already holds one.
    pub fn on_admission(self) -> Option<Self> {
        match self {
            PatientStatus::Admitted => None,
            _ => Some(PatientStatus::Admitted),
        }
    }

    /// Status shown on patient reports.
    pub fn care_status(&self) -> &'static str {
        match self {
            PatientStatus::Discharged => "Discharged",
            PatientStatus::Admitted => "Inpatient",
            PatientStatus::Registered | PatientStatus::Scheduled => "Outpatient",
        }
    }
}

/// Represents a patient in the hospital registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    /// `None` only for emergency placeholders that were never registered.
    pub personal: Option<PersonalInfo>,
    pub medical_history: String,
    pub insurance: Option<InsuranceInfo>,
    pub doctor_id: Option<i64>,
    pub room_type: Option<String>,
    pub status: PatientStatus,
    pub admitted_on: Option<Date>,
    pub discharged_on: Option<Date>,
    pub emergency: bool,
}

/// Input for [`crate::db::Registry::register_patient`].
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub id: i64,
    pub name: String,
    pub personal: PersonalInfo,
    pub medical_history: String,
    pub insurance: InsuranceInfo,
}

/// One row of a weekly shift schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftEntry {
    pub day: String,
    pub shift: String,
    pub start: String,
    pub end: String,
    pub location: String,
}

/// Represents a staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub department: String,
    pub schedule: Vec<ShiftEntry>,
    pub contact: String,
}

impl StaffMember {
    pub fn is_doctor(&self) -> bool {
        is_doctor_role(&self.role)
    }
}

pub(crate) fn is_doctor_role(role: &str) -> bool {
    role.trim().eq_ignore_ascii_case("doctor")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub scheduled_at: PrimitiveDateTime,
    pub kind: String,
}

/// A doctor's appointments for a single day, ordered by time.
#[derive(Debug, Clone)]
pub struct DoctorSchedule {
    pub doctor: StaffMember,
    pub day: Date,
    pub appointments: Vec<Appointment>,
}

/// A named class of room with fixed capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomCategory {
    pub name: String,
    pub total_beds: u32,
    pub nightly_price: f64,
    pub available_beds: u32,
}

impl RoomCategory {
    pub fn occupied_beds(&self) -> u32 {
        self.total_beds.saturating_sub(self.available_beds)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomAssignment {
    pub patient_id: i64,
    pub room_type: String,
    pub admission_date: Date,
    /// Expected stay in days; emergency admissions have none.
    pub expected_days: Option<u32>,
    /// Cleared on discharge once the bed is returned.
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DischargeRecord {
    pub patient_id: i64,
    pub discharge_date: Date,
    pub follow_up: String,
}

/// Admission-to-discharge interval used by the efficiency analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    pub patient_id: i64,
    pub admission_date: Date,
    pub discharge_date: Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCharge {
    pub name: String,
    pub cost: f64,
}

/// A stored billing event.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingRecord {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub services: Vec<ServiceCharge>,
    pub coverage_percent: f64,
    pub total: f64,
    pub covered: f64,
    pub due: f64,
    pub admission_date: Date,
    pub discharge_date: Date,
}

/// Cost estimate for a proposed treatment plan. Nothing is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentCost {
    pub patient_id: i64,
    pub patient_name: String,
    pub coverage_percent: f64,
    pub total: f64,
    pub covered: f64,
    pub due: f64,
    pub admission_date: Option<Date>,
    pub discharge_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prescription {
    pub medicine: String,
    pub dosage: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecord {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub diagnosis: String,
    pub treatment: String,
    pub prescription: Vec<Prescription>,
}

/// Everything the desk prints on a patient report.
#[derive(Debug, Clone)]
pub struct PatientReport {
    pub patient: Patient,
    pub room: Option<RoomAssignment>,
    pub attending: Option<StaffMember>,
    pub record: MedicalRecord,
    pub vitals: Vec<(String, String)>,
}

impl PatientReport {
    pub fn care_status(&self) -> &'static str {
        self.patient.status.care_status()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyAdmission {
    pub patient_id: i64,
    pub admission_date: Date,
    pub emergency_type: String,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Medication {
    pub id: i64,
    pub quantity: u32,
    pub expiry_date: Date,
    pub supplier: String,
}

/// Hospital efficiency metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    AverageLengthOfStay,
    BedOccupancyRate,
    PatientThroughput,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::AverageLengthOfStay => "average_length_of_stay",
            Metric::BedOccupancyRate => "bed_occupancy_rate",
            Metric::PatientThroughput => "patient_throughput",
        }
    }
}

impl FromStr for Metric {
    type Err = crate::error::RegistryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "average_length_of_stay" => Ok(Metric::AverageLengthOfStay),
            "bed_occupancy_rate" => Ok(Metric::BedOccupancyRate),
            "patient_throughput" => Ok(Metric::PatientThroughput),
            other => Err(crate::error::RegistryError::InvalidMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one efficiency analysis over a reporting window.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyReport {
    pub metric: Metric,
    pub start: Date,
    pub end: Date,
    pub value: f64,
    pub total_patients: u32,
    pub total_stay_days: i64,
}

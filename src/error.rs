//! Error types returned by the registry.
//!
//! Every guard failure is a soft error: the operation returns before touching
//! any table, and the caller decides how to present the message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Patient {0} is already registered")]
    AlreadyRegistered(i64),

    #[error("Staff member {0} already exists")]
    StaffExists(i64),

    #[error("Patient {0} not found")]
    PatientNotFound(i64),

    #[error("Staff member {0} not found")]
    StaffNotFound(i64),

    #[error("Appointment conflict: doctor {doctor_id} is already booked at {at}")]
    AppointmentConflict { doctor_id: i64, at: String },

    #[error("Unknown room type '{0}'")]
    UnknownRoomType(String),

    #[error("Currently the {0} is unavailable, opt for other rooms")]
    RoomUnavailable(String),

    #[error("Patient {0} already occupies a bed")]
    AlreadyAdmitted(i64),

    #[error("No appointment between patient {patient_id} and doctor {doctor_id}, register the patient first")]
    NoAppointment { patient_id: i64, doctor_id: i64 },

    #[error("Create the medical record of patient {0} first")]
    NoMedicalRecord(i64),

    #[error("Patient {0} has no room assignment and discharge to bill")]
    MissingStay(i64),

    #[error("No patient data available for the selected period")]
    NoStayData,

    #[error("Invalid metric '{0}'. Choose from: 'average_length_of_stay', 'bed_occupancy_rate', or 'patient_throughput'")]
    InvalidMetric(String),

    #[error("Invalid date '{input}', expected {expected}")]
    InvalidDateFormat {
        input: String,
        expected: &'static str,
    },

    #[error("Medication {0} has expired")]
    MedicationExpired(i64),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

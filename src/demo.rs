//! Scripted front-desk scenario used by `--demo`.
//!
//! Walks one orthopaedic patient from registration to the efficiency
//! analysis and writes every report to `out`. Guard failures are printed
//! and the script moves on, like a desk clerk would.

use crate::dates;
use crate::db::Registry;
use crate::error::RegistryResult;
use crate::models::{
    Gender, InsuranceInfo, MedicalRecord, Medication, NewPatient, PersonalInfo, Prescription,
    ServiceCharge, ShiftEntry, StaffMember,
};
use anyhow::Result;
use std::io::Write;
use time::macros::{date, datetime};
use tracing::info;

fn week(slots: [(&str, &str, &str, &str, &str); 7]) -> Vec<ShiftEntry> {
    slots
        .into_iter()
        .map(|(day, shift, start, end, location)| ShiftEntry {
            day: day.to_string(),
            shift: shift.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            location: location.to_string(),
        })
        .collect()
}

fn patient(
    id: i64,
    name: &str,
    (age, blood_type): (u8, &str),
    history: &str,
    (provider, policy, coverage): (&str, &str, f64),
) -> NewPatient {
    NewPatient {
        id,
        name: name.to_string(),
        personal: PersonalInfo {
            age,
            gender: Gender::Male,
            blood_type: blood_type.to_string(),
        },
        medical_history: history.to_string(),
        insurance: InsuranceInfo {
            provider: provider.to_string(),
            policy_number: policy.to_string(),
            coverage_percent: coverage,
        },
    }
}

fn doctor(
    id: i64,
    name: &str,
    department: &str,
    contact: &str,
    schedule: Vec<ShiftEntry>,
) -> StaffMember {
    StaffMember {
        id,
        name: name.to_string(),
        role: "Doctor".to_string(),
        department: department.to_string(),
        schedule,
        contact: contact.to_string(),
    }
}

fn charges(items: &[(&str, f64)]) -> Vec<ServiceCharge> {
    items
        .iter()
        .map(|(name, cost)| ServiceCharge {
            name: name.to_string(),
            cost: *cost,
        })
        .collect()
}

/// Writes `lines` on success or the error message on a guard failure.
fn show<T>(
    out: &mut impl Write,
    result: RegistryResult<T>,
    render: impl FnOnce(&T) -> Vec<String>,
) -> Result<()> {
    match result {
        Ok(value) => {
            for line in render(&value) {
                writeln!(out, "{line}")?;
            }
        }
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(())
}

/// Runs the scenario against `registry`.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn run(registry: &mut Registry, out: &mut impl Write) -> Result<()> {
    info!("demo started");

    for new in [
        patient(123, "Romi", (21, "O+"), "Diabetes", ("Star Health", "92394412", 70.0)),
        patient(183, "Alex", (27, "A+"), "Fracture", ("TX Health", "67677676", 80.0)),
    ] {
        let (id, name) = (new.id, new.name.clone());
        show(out, registry.register_patient(&new), |_| {
            vec![format!("Registered patient {name} (ID {id})")]
        })?;
    }

    let doctors = [
        doctor(
            101123,
            "Dr. Subhash Rao",
            "General Medicine",
            "9929929292",
            week([
                ("Monday", "Morning", "08:00", "14:00", "OPD"),
                ("Tuesday", "Evening", "14:00", "20:00", "OPD"),
                ("Wednesday", "Morning", "08:00", "14:00", "Wards"),
                ("Thursday", "Evening", "14:00", "20:00", "Emergency"),
                ("Friday", "Morning", "08:00", "14:00", "OPD"),
                ("Saturday", "Full Day", "08:00", "20:00", "OPD/Wards"),
                ("Sunday", "Off", "-", "-", "-"),
            ]),
        ),
        doctor(
            101243,
            "Dr. Jay Kumar",
            "Emergency",
            "8800978213",
            week([
                ("Monday", "Morning", "08:00", "14:00", "Cardiology OPD"),
                ("Tuesday", "Morning", "08:00", "14:00", "Cardiology Ward"),
                ("Wednesday", "Evening", "14:00", "20:00", "ICU"),
                ("Thursday", "Morning", "08:00", "14:00", "Cath Lab"),
                ("Friday", "Full Day", "08:00", "20:00", "OPD & Ward"),
                ("Saturday", "On Call", "-", "-", "-"),
                ("Sunday", "Off", "-", "-", "-"),
            ]),
        ),
        doctor(
            101143,
            "Dr. Santosh",
            "Orthopaedics",
            "7800978543",
            week([
                ("Monday", "Evening", "14:00", "20:00", "Ortho OPD"),
                ("Tuesday", "Morning", "08:00", "14:00", "Ortho Ward"),
                ("Wednesday", "Full Day", "08:00", "20:00", "Ortho & ICU"),
                ("Thursday", "Off", "-", "-", "-"),
                ("Friday", "Evening", "14:00", "20:00", "Ortho OPD"),
                ("Saturday", "Morning", "08:00", "14:00", "Ortho Ward"),
                ("Sunday", "Off", "-", "-", "-"),
            ]),
        ),
    ];
    for staff in &doctors {
        show(out, registry.add_medical_staff(staff), |_| {
            vec![format!("Medical staff {} (ID {}) added", staff.name, staff.id)]
        })?;
    }

    let slot = datetime!(2025 - 07 - 01 9:00);
    show(
        out,
        registry.schedule_appointment(183, 101143, slot, "Follow Up"),
        |a| {
            vec![format!(
                "Appointment scheduled at {} for patient {} with doctor {}",
                dates::short_date_time(a.scheduled_at),
                a.patient_id,
                a.doctor_id
            )]
        },
    )?;
    // Same doctor, same slot.
    show(
        out,
        registry.schedule_appointment(123, 101143, slot, "Consultation"),
        |_| Vec::new(),
    )?;

    writeln!(out)?;
    show(
        out,
        registry.doctors_schedule(101143, slot.date()),
        crate::report::doctor_schedule,
    )?;

    writeln!(out)?;
    let record = MedicalRecord {
        patient_id: 183,
        doctor_id: 101143,
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
    };
    show(out, registry.create_medical_record(&record), |_| {
        vec!["Medical record created".to_string()]
    })?;

    show(
        out,
        registry.assign_room(183, "Private Room", date!(2025 - 07 - 02), 5),
        |a| vec![format!("Patient {} assigned to the {}", a.patient_id, a.room_type)],
    )?;
    show(
        out,
        registry.manage_discharge_process(
            183,
            date!(2025 - 07 - 02),
            date!(2025 - 07 - 07),
            "Bed rest and physiotherapy",
        ),
        |d| {
            vec![format!(
                "Patient {} discharged on {}",
                d.patient_id,
                dates::long_date(d.discharge_date)
            )]
        },
    )?;

    writeln!(out)?;
    let services = charges(&[
        ("Room Charges (5 days)", 15000.0),
        ("Doctor Charges", 2000.0),
        ("X-Ray", 800.0),
        ("Blood Test", 500.0),
        ("Fracture Plaster (POP)", 2500.0),
    ]);
    show(
        out,
        registry.process_billing(183, &services, 80.0),
        crate::report::billing_summary,
    )?;

    writeln!(out)?;
    let vitals: Vec<(String, String)> = [
        ("blood_test", "Blood Test"),
        ("xray", "X-Ray"),
        ("mri", "MRI Scan"),
        ("ecg", "ECG"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    show(
        out,
        registry.generate_patient_report(183, &vitals),
        crate::report::patient_report,
    )?;

    writeln!(out)?;
    show(
        out,
        registry.analyze_hospital_efficiency(
            "bed_occupancy_rate",
            date!(2025 - 07 - 01),
            date!(2025 - 07 - 07),
        ),
        crate::report::efficiency,
    )?;

    writeln!(out)?;
    show(
        out,
        registry.manage_emergency_admission(
            900,
            date!(2025 - 07 - 03),
            "Road accident",
            "Critical",
        ),
        |e| {
            vec![format!(
                "Emergency admission of patient {} ({}, {})",
                e.patient_id, e.emergency_type, e.severity
            )]
        },
    )?;
    let stock = Medication {
        id: 501,
        quantity: 200,
        expiry_date: date!(2026 - 01 - 31),
        supplier: "MedSupply".to_string(),
    };
    show(
        out,
        registry.track_medication_inventory(&stock, date!(2025 - 07 - 01)),
        |_| vec!["The medicine has been added to the inventory".to_string()],
    )?;
    show(out, registry.room_categories(), |rooms| {
        crate::report::room_occupancy(rooms)
    })?;

    info!("demo finished");
    Ok(())
}

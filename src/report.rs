//! Plain-text renderings of registry results.
//!
//! The same lines back the TUI output panels and the `--demo` run, so every
//! function returns owned lines instead of printing.

use crate::dates;
use crate::models::{
    BillingRecord, DoctorSchedule, EfficiencyReport, Metric, Patient, PatientReport,
    RoomCategory, StaffMember, TreatmentCost,
};

fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Insurance and patient share lines shared by bills and estimates.
fn coverage_lines(lines: &mut Vec<String>, coverage_percent: f64, covered: f64, due: f64) {
    if coverage_percent != 0.0 {
        lines.push(format!(
            "Insurance ({coverage_percent}%): {}",
            money(covered)
        ));
        lines.push(format!("Patient responsibility: {}", money(due)));
    } else {
        lines.push("You have no insurance coverage".to_string());
        lines.push(format!("Patient responsibility: {}", money(due)));
    }
}

pub fn billing_summary(bill: &BillingRecord) -> Vec<String> {
    let mut lines = vec![
        "=== BILLING SUMMARY ===".to_string(),
        format!("Patient: {}", bill.patient_name),
        format!("Admission Date: {}", dates::long_date(bill.admission_date)),
        format!("Discharge Date: {}", dates::long_date(bill.discharge_date)),
        "Service Charges:".to_string(),
    ];
    for service in &bill.services {
        lines.push(format!("  {}: {}", service.name, money(service.cost)));
    }
    lines.push(format!("Total bill: {}", money(bill.total)));
    coverage_lines(&mut lines, bill.coverage_percent, bill.covered, bill.due);
    lines
}

pub fn treatment_cost(estimate: &TreatmentCost) -> Vec<String> {
    let mut lines = vec![
        "=== TREATMENT ESTIMATE ===".to_string(),
        format!("Patient: {}", estimate.patient_name),
    ];
    if let Some(admitted) = estimate.admission_date {
        lines.push(format!("Admission Date: {}", dates::long_date(admitted)));
    }
    if let Some(discharged) = estimate.discharge_date {
        lines.push(format!("Discharge Date: {}", dates::long_date(discharged)));
    }
    lines.push(format!("Cost of treatment: {}", money(estimate.total)));
    coverage_lines(
        &mut lines,
        estimate.coverage_percent,
        estimate.covered,
        estimate.due,
    );
    lines
}

pub fn patient_report(report: &PatientReport) -> Vec<String> {
    let patient = &report.patient;
    let mut lines = vec![
        "--- PATIENT REPORT ---".to_string(),
        format!("Patient Name: {} (ID {})", patient.name, patient.id),
    ];

    match &patient.personal {
        Some(personal) => lines.push(format!(
            "Age: {} | Gender: {} | Blood Type: {}",
            personal.age,
            personal.gender.as_str(),
            personal.blood_type
        )),
        None => lines.push("Personal details not yet recorded".to_string()),
    }
    if let Some(insurance) = &patient.insurance {
        lines.push(format!(
            "Insurance: {} (Policy {})",
            insurance.provider, insurance.policy_number
        ));
    }

    lines.push(format!("Current Status: {}", report.care_status()));
    if let Some(room) = &report.room {
        lines.push(format!("Room: {}", room.room_type));
        lines.push(format!("Admitted: {}", dates::long_date(room.admission_date)));
    }
    match &report.attending {
        Some(doctor) => lines.push(format!("Attending Doctor: {}", doctor.name)),
        None => lines.push("Attending Doctor: unassigned".to_string()),
    }

    lines.push(format!("Diagnosis: {}", report.record.diagnosis));
    lines.push(format!("Treatment: {}", report.record.treatment));

    if !report.vitals.is_empty() {
        lines.push("Recent Vitals:".to_string());
        for (name, value) in &report.vitals {
            lines.push(format!("  {name}: {value}"));
        }
    }

    lines.push("Active Medications:".to_string());
    if report.record.prescription.is_empty() {
        lines.push("  none".to_string());
    }
    for item in &report.record.prescription {
        lines.push(format!(
            "  {} ({}): {}",
            item.medicine, item.dosage, item.frequency
        ));
    }
    lines
}

pub fn doctor_schedule(schedule: &DoctorSchedule) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} ({})",
            schedule.doctor.name, schedule.doctor.department
        ),
        dates::long_date(schedule.day),
    ];
    if schedule.appointments.is_empty() {
        lines.push("No appointments today.".to_string());
        return lines;
    }

    lines.push("Appointments:".to_string());
    lines.push("----------------------".to_string());
    for appointment in &schedule.appointments {
        lines.push(format!(
            "{} - Patient ID: {} ({})",
            dates::clock(appointment.scheduled_at),
            appointment.patient_id,
            appointment.kind
        ));
    }
    lines
}

pub fn efficiency(report: &EfficiencyReport) -> Vec<String> {
    let headline = match report.metric {
        Metric::AverageLengthOfStay => {
            format!("Average Length of Stay: {:.2} days", report.value)
        }
        Metric::BedOccupancyRate => format!("Bed Occupancy Rate: {:.2}%", report.value),
        Metric::PatientThroughput => {
            format!("Patient Throughput: {} patients", report.total_patients)
        }
    };
    vec![
        format!(
            "Period: {} to {}",
            dates::short_date(report.start),
            dates::short_date(report.end)
        ),
        headline,
    ]
}

pub fn patient_details(patient: &Patient) -> Vec<String> {
    let mut lines = vec![
        format!("Patient ID: {}", patient.id),
        format!("Name: {}", patient.name),
        format!("Status: {}", patient.status.as_str()),
        format!("Medical History: {}", patient.medical_history),
    ];
    if let Some(room) = &patient.room_type {
        lines.push(format!("Room: {room}"));
    }
    if let Some(admitted) = patient.admitted_on {
        lines.push(format!("Admitted: {}", dates::long_date(admitted)));
    }
    if let Some(discharged) = patient.discharged_on {
        lines.push(format!("Discharged: {}", dates::long_date(discharged)));
    }
    if patient.emergency {
        lines.push("Emergency admission".to_string());
    }
    lines
}

pub fn staff_details(staff: &StaffMember) -> Vec<String> {
    let mut lines = vec![
        format!("Staff ID: {}", staff.id),
        format!("Name: {}", staff.name),
        format!("Role: {}", staff.role),
        format!("Department: {}", staff.department),
        format!("Contact: {}", staff.contact),
    ];
    for shift in &staff.schedule {
        lines.push(format!(
            "  {:<10} {:<9} {}-{} @ {}",
            shift.day, shift.shift, shift.start, shift.end, shift.location
        ));
    }
    lines
}

pub fn room_occupancy(rooms: &[RoomCategory]) -> Vec<String> {
    rooms
        .iter()
        .map(|room| {
            format!(
                "{}: {}/{} beds free, {} per night",
                room.name,
                room.available_beds,
                room.total_beds,
                money(room.nightly_price)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Appointment, ServiceCharge};
    use time::macros::{date, datetime};

    fn doctor() -> StaffMember {
        StaffMember {
            id: 101143,
            name: "Dr. Santosh".to_string(),
            role: "Doctor".to_string(),
            department: "Ortho Surgeon".to_string(),
            schedule: Vec::new(),
            contact: "7800978543".to_string(),
        }
    }

    #[test]
    fn bill_lists_services_and_shares() {
        let bill = BillingRecord {
            id: 1,
            patient_id: 183,
            patient_name: "Alex".to_string(),
            services: vec![ServiceCharge {
                name: "X-Ray".to_string(),
                cost: 800.0,
            }],
            coverage_percent: 80.0,
            total: 800.0,
            covered: 640.0,
            due: 160.0,
            admission_date: date!(2025 - 07 - 02),
            discharge_date: date!(2025 - 07 - 07),
        };
        let lines = billing_summary(&bill);
        assert!(lines.contains(&"Admission Date: July 02, 2025".to_string()));
        assert!(lines.contains(&"  X-Ray: 800.00".to_string()));
        assert!(lines.contains(&"Insurance (80%): 640.00".to_string()));
        assert_eq!(lines.last().unwrap(), "Patient responsibility: 160.00");
    }

    #[test]
    fn estimate_without_coverage() {
        let estimate = TreatmentCost {
            patient_id: 1,
            patient_name: "Asha".to_string(),
            coverage_percent: 0.0,
            total: 500.0,
            covered: 0.0,
            due: 500.0,
            admission_date: None,
            discharge_date: None,
        };
        let lines = treatment_cost(&estimate);
        assert!(lines.contains(&"You have no insurance coverage".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Admission")));
    }

    #[test]
    fn empty_schedule_says_so() {
        let schedule = DoctorSchedule {
            doctor: doctor(),
            day: date!(2025 - 07 - 01),
            appointments: Vec::new(),
        };
        assert_eq!(
            doctor_schedule(&schedule),
            [
                "Dr. Santosh (Ortho Surgeon)",
                "July 01, 2025",
                "No appointments today."
            ]
        );
    }

    #[test]
    fn schedule_shows_clock_times() {
        let schedule = DoctorSchedule {
            doctor: doctor(),
            day: date!(2025 - 07 - 01),
            appointments: vec![Appointment {
                id: 1,
                patient_id: 183,
                doctor_id: 101143,
                scheduled_at: datetime!(2025 - 07 - 01 9:00),
                kind: "Follow Up".to_string(),
            }],
        };
        let lines = doctor_schedule(&schedule);
        assert_eq!(lines.last().unwrap(), "09:00 - Patient ID: 183 (Follow Up)");
    }

    #[test]
    fn efficiency_headlines() {
        let mut report = EfficiencyReport {
            metric: Metric::BedOccupancyRate,
            start: date!(2025 - 07 - 01),
            end: date!(2025 - 07 - 07),
            value: 1.904_761_9,
            total_patients: 1,
            total_stay_days: 6,
        };
        assert_eq!(efficiency(&report)[1], "Bed Occupancy Rate: 1.90%");
        report.metric = Metric::PatientThroughput;
        assert_eq!(efficiency(&report)[1], "Patient Throughput: 1 patients");
        assert_eq!(efficiency(&report)[0], "Period: 01-07-2025 to 07-07-2025");
    }
}

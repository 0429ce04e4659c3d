//! Hospital screens.
//!
//! Each submodule builds the forms and listings for one area of the front
//! desk. [`open`] maps a menu entry to its screen.

use crate::app::Screen;
use crate::components::Component;

pub mod analytics;
pub mod appointments;
pub mod billing;
pub mod patients;
pub mod pharmacy;
pub mod records;
pub mod rooms;
pub mod staff;

pub fn open(screen: Screen) -> Box<dyn Component> {
    match screen {
        Screen::PatientRegister => Box::new(patients::register_form()),
        Screen::PatientList => Box::new(patients::patient_list()),
        Screen::StaffAdd => Box::new(staff::add_form()),
        Screen::StaffList => Box::new(staff::staff_list()),
        Screen::DoctorList => Box::new(staff::doctor_list()),
        Screen::AppointmentSchedule => Box::new(appointments::schedule_form()),
        Screen::DoctorSchedule => Box::new(appointments::doctor_schedule_form()),
        Screen::AppointmentList => Box::new(appointments::appointment_list()),
        Screen::RoomAssign => Box::new(rooms::assign_form()),
        Screen::Discharge => Box::new(rooms::discharge_form()),
        Screen::EmergencyAdmission => Box::new(rooms::emergency_form()),
        Screen::RoomOccupancy => Box::new(rooms::occupancy_list()),
        Screen::RecordCreate => Box::new(records::create_form()),
        Screen::PatientReport => Box::new(records::report_form()),
        Screen::BillingProcess => Box::new(billing::process_form()),
        Screen::TreatmentCost => Box::new(billing::estimate_form()),
        Screen::BillingHistory => Box::new(billing::history_form()),
        Screen::Efficiency => Box::new(analytics::efficiency_form()),
        Screen::MedicationStock => Box::new(pharmacy::stock_form()),
        Screen::MedicationList => Box::new(pharmacy::inventory_list()),
    }
}

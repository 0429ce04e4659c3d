//! Hospital efficiency analysis over the recorded stays.

use super::Registry;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{EfficiencyReport, Metric, Stay};
use time::Date;
use tracing::{debug, info};

/// Days of `stay` that fall inside `[start, end]`, both ends counted.
///
/// `None` when the stay lies entirely outside the window.
fn days_in_window(stay: &Stay, start: Date, end: Date) -> Option<i64> {
    let from = stay.admission_date.max(start);
    let to = stay.discharge_date.min(end);
    (from <= to).then(|| (to - from).whole_days() + 1)
}

impl Registry {
    /// Computes `metric` over every stay overlapping `[start, end]`.
    ///
    /// Stays are clipped to the window and their days counted inclusively.
    /// Bed occupancy is measured against the summed bed count of all room
    /// categories.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NoStayData`] if no stay overlaps the window. This
    ///   is checked first, so an empty window hides a bad metric name.
    /// - [`RegistryError::InvalidMetric`] for an unrecognised metric.
    pub fn analyze_hospital_efficiency(
        &self,
        metric: &str,
        start: Date,
        end: Date,
    ) -> RegistryResult<EfficiencyReport> {
        let mut total_patients = 0u32;
        let mut total_stay_days = 0i64;
        for stay in self.stays()? {
            if let Some(days) = days_in_window(&stay, start, end) {
                total_patients += 1;
                total_stay_days += days;
            }
        }

        if total_patients == 0 {
            debug!(%start, %end, "no stays in window");
            return Err(RegistryError::NoStayData);
        }

        let metric: Metric = metric.parse()?;
        let value = match metric {
            Metric::AverageLengthOfStay => total_stay_days as f64 / f64::from(total_patients),
            Metric::BedOccupancyRate => {
                let capacity: u32 = self.room_categories()?.iter().map(|r| r.total_beds).sum();
                let window_days = (end - start).whole_days() + 1;
                let bed_days = f64::from(capacity) * window_days as f64;
                if bed_days > 0.0 {
                    total_stay_days as f64 / bed_days * 100.0
                } else {
                    0.0
                }
            }
            Metric::PatientThroughput => f64::from(total_patients),
        };

        info!(%metric, value, total_patients, total_stay_days, "efficiency analysed");
        Ok(EfficiencyReport {
            metric,
            start,
            end,
            value,
            total_patients,
            total_stay_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RoomSetup;
    use crate::db::{fixtures, Registry};
    use crate::error::RegistryError;
    use crate::models::Metric;
    use time::macros::date;
    use time::Date;

    fn discharge(registry: &mut Registry, id: i64, room: &str, admitted: Date, discharged: Date) {
        registry
            .register_patient(&fixtures::patient(id, "Patient"))
            .unwrap();
        registry.assign_room(id, room, admitted, 5).unwrap();
        registry
            .manage_discharge_process(id, admitted, discharged, "Rest")
            .unwrap();
    }

    #[test]
    fn average_length_counts_both_ends() {
        let mut registry = fixtures::registry();
        discharge(&mut registry, 183, "private room", date!(2025 - 07 - 02), date!(2025 - 07 - 07));

        let report = registry
            .analyze_hospital_efficiency(
                "average_length_of_stay",
                date!(2025 - 07 - 01),
                date!(2025 - 07 - 31),
            )
            .unwrap();
        assert_eq!(report.metric, Metric::AverageLengthOfStay);
        assert_eq!(report.total_stay_days, 6);
        assert_eq!(report.value, 6.0);
    }

    #[test]
    fn stays_are_clipped_to_the_window() {
        let mut registry = fixtures::registry();
        discharge(&mut registry, 1, "general room", date!(2025 - 06 - 28), date!(2025 - 07 - 03));
        discharge(&mut registry, 2, "general room", date!(2025 - 07 - 05), date!(2025 - 07 - 06));
        discharge(&mut registry, 3, "general room", date!(2025 - 05 - 01), date!(2025 - 05 - 04));

        let report = registry
            .analyze_hospital_efficiency(
                "patient_throughput",
                date!(2025 - 07 - 01),
                date!(2025 - 07 - 07),
            )
            .unwrap();
        assert_eq!(report.value, 2.0);
        assert_eq!(report.total_stay_days, 3 + 2);
    }

    #[test]
    fn occupancy_uses_every_bed_in_the_hospital() {
        let mut registry = fixtures::registry();
        discharge(&mut registry, 183, "private room", date!(2025 - 07 - 02), date!(2025 - 07 - 07));

        let report = registry
            .analyze_hospital_efficiency(
                "bed_occupancy_rate",
                date!(2025 - 07 - 01),
                date!(2025 - 07 - 07),
            )
            .unwrap();
        let expected = 6.0 / (45.0 * 7.0) * 100.0;
        assert!((report.value - expected).abs() < 1e-9);
    }

    #[test]
    fn a_full_single_bed_ward_is_fully_occupied() {
        let mut registry =
            fixtures::registry_with_rooms(&[RoomSetup::new("general room", 1, 1500.0)]);
        discharge(&mut registry, 1, "general room", date!(2025 - 07 - 02), date!(2025 - 07 - 03));
        let report = registry
            .analyze_hospital_efficiency(
                "bed_occupancy_rate",
                date!(2025 - 07 - 02),
                date!(2025 - 07 - 03),
            )
            .unwrap();
        assert_eq!(report.value, 100.0);
    }

    #[test]
    fn empty_window_is_reported_before_the_metric() {
        let mut registry = fixtures::registry();
        assert!(matches!(
            registry.analyze_hospital_efficiency(
                "bed_occupancy_rate",
                date!(2025 - 07 - 01),
                date!(2025 - 07 - 31)
            ),
            Err(RegistryError::NoStayData)
        ));
        assert!(matches!(
            registry.analyze_hospital_efficiency(
                "nonsense",
                date!(2025 - 07 - 01),
                date!(2025 - 07 - 31)
            ),
            Err(RegistryError::NoStayData)
        ));

        discharge(&mut registry, 183, "private room", date!(2025 - 07 - 02), date!(2025 - 07 - 07));
        let err = registry
            .analyze_hospital_efficiency("nonsense", date!(2025 - 07 - 01), date!(2025 - 07 - 31))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidMetric(ref m) if m == "nonsense"));
        assert!(err.to_string().contains("patient_throughput"));
    }

    #[test]
    fn reversed_window_has_no_data() {
        let mut registry = fixtures::registry();
        discharge(&mut registry, 183, "private room", date!(2025 - 07 - 02), date!(2025 - 07 - 07));
        assert!(matches!(
            registry.analyze_hospital_efficiency(
                "patient_throughput",
                date!(2025 - 07 - 07),
                date!(2025 - 07 - 02)
            ),
            Err(RegistryError::NoStayData)
        ));
    }
}

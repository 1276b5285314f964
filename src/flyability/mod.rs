//! Flyability rules: per-hour verdicts, parameter assessment and daily windows

pub mod assessment;
pub mod evaluator;
pub mod windows;

pub use assessment::{Parameter, ParameterAssessment, Safety, assess, overall};
pub use evaluator::{
    CONFIGURATION_ERROR_REASON, EvaluationOptions, FlightConditions, RuleOutcome, WindDetail,
    check_flying_conditions, check_flying_conditions_with, evaluate_rules,
};
pub use windows::{DailySummary, FlyableRange, HourlyScore, flight_windows};

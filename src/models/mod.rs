pub mod patient;
pub mod plan;
pub mod session;

pub use patient::{NewPatient, Patient};
pub use plan::{AnnualPlan, Prescription, ScheduledExercise, WeekSchedule};
pub use session::{NewSessionLog, SessionLog};

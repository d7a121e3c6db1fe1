pub mod retirement;

pub use retirement::{
    compute_remaining_duration, compute_retirement_date, parse_birth_date, retirement_instant,
    RemainingDuration,
};

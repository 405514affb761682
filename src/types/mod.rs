pub mod daily_variable;
pub mod location;
pub mod month;
pub mod period;

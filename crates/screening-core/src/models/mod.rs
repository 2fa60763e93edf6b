pub mod answer;
pub mod correction;
pub mod patient;

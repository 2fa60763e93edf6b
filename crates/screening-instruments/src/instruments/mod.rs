pub mod audit;
pub mod findrisc;
pub mod gad7;
pub mod nicotine;
pub mod phq9;
pub mod score2;

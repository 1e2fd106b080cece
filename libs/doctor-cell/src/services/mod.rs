pub mod doctor;

pub use doctor::DoctorDirectory;

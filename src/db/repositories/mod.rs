mod certification_repository;
mod program_repository;

pub use certification_repository::CertificationRepository;
pub use program_repository::ProgramRepository;

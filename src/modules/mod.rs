pub mod certifications;
pub mod compliance;
pub mod ocr;

pub mod burst_service;
pub mod seed_service;
pub mod session_service;
pub mod smoke_service;

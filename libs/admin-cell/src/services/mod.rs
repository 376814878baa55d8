pub mod dashboard;
pub mod doctor_admin;

pub use dashboard::DashboardService;
pub use doctor_admin::DoctorAdminService;

pub mod company;
pub mod job;

pub use company::CompanyFilter;
pub use job::JobFilter;

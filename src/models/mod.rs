pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail, CompanyUpdate, NewCompany};
pub use job::{Job, JobDetail, JobListing, JobUpdate, NewJob};
pub use user::{NewUser, User, UserDetail, UserUpdate};

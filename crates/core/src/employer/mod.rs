mod records;
mod requests;
mod types;

pub use records::{ENTITY_TYPE_EMPLOYER, ENTITY_TYPE_EMPLOYER_JOB};
pub use requests::{
    parse_website, validate_answers, validate_job, CreateEmployerJobRequest,
    CreateEmployerRequest, EmployerError, UpdateEmployerRequest,
};
pub use types::{
    Address, Employer, EmployerJob, JobScope, ScreeningAnswer, TimeWindow, MAX_SCREENING_ANSWERS,
};

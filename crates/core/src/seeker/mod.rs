mod records;
mod requests;
mod types;

pub use records::{
    answer_attribute, ENTITY_TYPE_EXPERIENCE, ENTITY_TYPE_JOB_SEEKER,
    ENTITY_TYPE_JOB_SEEKER_ANSWERS,
};
pub use requests::{
    AnswersRequest, CreateJobSeekerRequest, ExperienceRequest, SeekerError,
    UpdateJobSeekerRequest,
};
pub use types::{Experience, JobSeeker, JobSeekerAnswers};

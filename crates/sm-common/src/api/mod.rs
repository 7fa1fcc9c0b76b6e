//! Wire types for the matching endpoints.

pub mod match_request;
pub mod match_response;

pub use match_request::{
    JobCandidate, JobPayload, JobsForStudentRequest, RankingWeights, StudentCandidate,
    StudentPayload, StudentsForJobRequest,
};
pub use match_response::{
    JobMatch, JobMatchInsights, JobsForStudentResponse, SkillsBreakdownDto, StudentMatch,
    StudentMatchInsights, StudentsForJobResponse,
};

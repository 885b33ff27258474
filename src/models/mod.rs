//! Marketplace entities
//!
//! Timestamps and derived values (profile completeness, review average,
//! list projections) are computed by explicit methods called from the
//! service layer. Nothing here mutates itself behind the caller's back.

pub mod booking;
pub mod idea;
pub mod mentor;
pub mod user;

pub use booking::{
    Booking, BookingStatus, Feedback, MenteeInfo, Payment, PaymentStatus, SessionDetails,
};
pub use idea::{
    AnalysisReport, IdeaAnalysis, IdeaStatus, IdeaSummary, NewIdea, UserInteraction, Visibility,
};
pub use mentor::{Mentor, MentorProfile, MentorStatus, MentorSummary, NewMentor, Review};
pub use user::{User, UserActivity, UserCard, UserProfile};

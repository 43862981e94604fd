//! Data access layer.
//!
//! Repositories are zero-sized structs with async methods taking `&PgPool`
//! as the first argument. Steps that must run inside an engine transaction
//! take `&mut sqlx::Transaction` instead.

pub mod challenge_points_repo;
pub mod challenge_repo;
pub mod checkin_repo;
pub mod notification_repo;
pub mod participant_repo;
pub mod ranking_repo;
pub mod user_repo;
pub mod weekly_points_repo;
pub mod weekly_update_repo;

pub use challenge_points_repo::ChallengePointsRepo;
pub use challenge_repo::ChallengeRepo;
pub use checkin_repo::CheckInRepo;
pub use notification_repo::NotificationRepo;
pub use participant_repo::ParticipantRepo;
pub use ranking_repo::RankingRepo;
pub use user_repo::UserRepo;
pub use weekly_points_repo::WeeklyPointsRepo;
pub use weekly_update_repo::WeeklyUpdateRepo;

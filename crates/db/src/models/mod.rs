//! Row structs and request DTOs.
//!
//! The pattern per submodule: a `FromRow` + `Serialize` entity mirroring
//! the table, a `Deserialize` create DTO, and where the API allows patching,
//! an update DTO whose fields are all `Option`.

pub mod challenge;
pub mod checkin;
pub mod notification;
pub mod participant;
pub mod points;
pub mod ranking;
pub mod user;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod history_repo;
pub mod listing_repo;
pub mod media_slot_repo;
pub mod settings_repo;
pub mod status_repo;
pub mod user_repo;

pub use history_repo::HistoryRepo;
pub use listing_repo::ListingRepo;
pub use media_slot_repo::MediaSlotRepo;
pub use settings_repo::SettingsRepo;
pub use status_repo::StatusRepo;
pub use user_repo::UserRepo;

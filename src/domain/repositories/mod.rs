pub mod preferences_repository;

pub use preferences_repository::PreferencesRepository;

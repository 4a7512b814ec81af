pub mod beta_service;

pub use beta_service::BetaSignupService;

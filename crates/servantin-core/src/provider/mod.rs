pub mod model;

pub use model::{
    AdminProvider, MatchRequest, ProviderMatch, ProviderProfile, ProviderProfileRequest,
};

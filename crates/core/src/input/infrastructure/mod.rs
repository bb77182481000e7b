pub mod background_inference;
pub mod face_provider;
pub mod face_sampler;
pub mod keyboard_provider;
pub mod provider_factory;

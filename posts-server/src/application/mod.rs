pub(crate) mod auth_service;
pub(crate) mod credentials;
pub(crate) mod envelope;
pub(crate) mod post_service;

// HTTP middleware implementations

pub mod auth; // Bearer token decoding into the request's AuthContext

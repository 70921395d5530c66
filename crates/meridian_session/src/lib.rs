pub mod animation;
pub mod session;
pub mod session_params;
pub mod session_state;

pub mod identifier;
pub mod lockout;
pub mod login_attempt;
pub mod login_data;
pub mod member;
